// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;

use clap::Parser;

use crate::color::{BLACK, SKY_BLUE};
use crate::error::ConfigError;
use crate::runtime::{ColorMode, Variant};

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  skyfield --variant rain --fps 60 --scale 8 --color-bg black --duration 0";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_heading(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));
        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();
        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else if let Some(rest) = line.strip_prefix("  skyfield") {
            out.push_str("  \x1b[1;34mskyfield\x1b[0m");
            out.push_str(rest);
        } else {
            out.push_str(line);
        }
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_heading(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "sky")]
    Sky,
    #[value(name = "default-background")]
    DefaultBackground,
    #[value(name = "transparent")]
    Transparent,
}

impl ColorBg {
    pub fn backdrop(self) -> Option<(u8, u8, u8)> {
        match self {
            ColorBg::Black => Some(BLACK),
            ColorBg::Sky => Some(SKY_BLUE),
            ColorBg::DefaultBackground | ColorBg::Transparent => None,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "skyfield", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'V',
        long = "variant",
        default_value_t = Variant::Rain,
        value_enum,
        help_heading = "GENERAL",
        help = "Backdrop to animate (rain, cloud, sun)"
    )]
    pub variant: Variant,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed for particle randomness (default: from the OS)"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Backdrop behind the animation (black, sky, default-background, transparent)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "PERFORMANCE",
        help = "Refresh rate the frame loop is driven at (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "scale",
        default_value_t = 8,
        help_heading = "PERFORMANCE",
        help = "Surface units per half-cell pixel (min 1 max 64)"
    )]
    pub scale: u32,

    #[arg(
        long = "perf-stats",
        help_heading = "PERFORMANCE",
        help = "Print performance statistics summary on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "list-variants",
        help_heading = "HELP",
        help = "List available backdrops and exit"
    )]
    pub list_variants: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

/// Validated run parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub variant: Variant,
    pub fps: f64,
    pub scale: u32,
    pub duration_s: Option<f64>,
    pub color_mode: ColorMode,
    pub backdrop: Option<(u8, u8, u8)>,
    pub seed: Option<u64>,
}

impl Settings {
    pub fn from_args(args: &Args, env: &ColorEnv) -> Result<Self, ConfigError> {
        let fps = require_f64_range("--fps", args.fps, 1.0, 240.0)?;
        let scale = require_f64_range("--scale", args.scale as f64, 1.0, 64.0)? as u32;
        let duration_s = match args.duration {
            Some(s) if !s.is_finite() => {
                return Err(ConfigError::NotFinite {
                    name: "--duration",
                    value: s,
                })
            }
            Some(s) if s > 0.0 => Some(require_f64_range("--duration", s, 0.1, 86400.0)?),
            _ => None,
        };
        let color_mode = match args.colormode {
            Some(m) => parse_color_mode(m)?,
            None => env.detect(),
        };

        Ok(Self {
            variant: args.variant,
            fps,
            scale,
            duration_s,
            color_mode,
            backdrop: args.color_bg.backdrop(),
            seed: args.seed,
        })
    }
}

pub fn require_f64_range(
    name: &'static str,
    v: f64,
    min: f64,
    max: f64,
) -> Result<f64, ConfigError> {
    if !v.is_finite() {
        return Err(ConfigError::NotFinite { name, value: v });
    }
    if v < min || v > max {
        return Err(ConfigError::OutOfRange {
            name,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

pub fn parse_color_mode(m: u16) -> Result<ColorMode, ConfigError> {
    match m {
        0 => Ok(ColorMode::Mono),
        16 => Ok(ColorMode::Color16),
        8 | 256 => Ok(ColorMode::Color256),
        24 | 32 => Ok(ColorMode::TrueColor),
        other => Err(ConfigError::ColorMode(other)),
    }
}

/// The environment variables color detection looks at.
#[derive(Clone, Debug, Default)]
pub struct ColorEnv {
    pub colorterm: String,
    pub term: String,
}

impl ColorEnv {
    pub fn from_process() -> Self {
        Self {
            colorterm: std::env::var("COLORTERM").unwrap_or_default(),
            term: std::env::var("TERM").unwrap_or_default(),
        }
    }

    pub fn detect(&self) -> ColorMode {
        let colorterm = self.colorterm.to_ascii_lowercase();
        if colorterm.contains("truecolor") || colorterm.contains("24bit") {
            return ColorMode::TrueColor;
        }
        let term = self.term.to_ascii_lowercase();
        if term == "dumb" {
            return ColorMode::Mono;
        }
        if term.contains("256color") {
            return ColorMode::Color256;
        }
        if term.starts_with("linux") || term == "vt100" {
            return ColorMode::Color16;
        }
        ColorMode::Color256
    }
}

pub fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Color16 => "16-color",
        ColorMode::Mono => "mono",
    }
}

pub fn print_list_variants() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE BACKDROPS:\x1b[0m");
        println!("\x1b[2mNOTE: Use only the VALUE (left side) with --variant.\x1b[0m");
    } else {
        println!("AVAILABLE BACKDROPS:");
        println!("NOTE: Use only the VALUE (left side) with --variant.");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    println!("rain         200 falling streaks");
    println!("cloud        10 drifting clouds (alias: clouds)");
    println!("sun          Glowing sun with turning rays (alias: sunny)");
}
