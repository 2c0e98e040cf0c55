// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

/// Which backdrop an instance animates. Chosen once per mount.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    #[value(name = "rain")]
    Rain,
    #[value(name = "cloud", alias = "clouds")]
    Cloud,
    #[value(name = "sun", alias = "sunny")]
    Sun,
}

impl Variant {
    pub fn label(self) -> &'static str {
        match self {
            Variant::Rain => "rain",
            Variant::Cloud => "cloud",
            Variant::Sun => "sun",
        }
    }
}
