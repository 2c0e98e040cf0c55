// Copyright (c) 2026 rezky_nightky

use rand::rngs::StdRng;

use crate::cloud::CloudField;
use crate::rain::RainField;
use crate::runtime::Variant;
use crate::sun::SunField;
use crate::surface::{Surface, Viewport};

/// One backdrop variant: builds its particles, paints them, advances them.
///
/// `render` never mutates and `step` only draws randomness when a particle
/// respawns.
pub trait Animation {
    fn init(bounds: Viewport, rng: &mut StdRng) -> Self
    where
        Self: Sized;

    fn step(&mut self, bounds: Viewport, rng: &mut StdRng);

    fn render(&self, surface: &mut dyn Surface);

    fn particle_count(&self) -> usize;
}

pub fn spawn(variant: Variant, bounds: Viewport, rng: &mut StdRng) -> Box<dyn Animation> {
    match variant {
        Variant::Rain => Box::new(RainField::init(bounds, rng)),
        Variant::Cloud => Box::new(CloudField::init(bounds, rng)),
        Variant::Sun => Box::new(SunField::init(bounds, rng)),
    }
}
