// Copyright (c) 2026 rezky_nightky

use std::f32::consts::PI;

use rand::rngs::StdRng;

use crate::color::{GLOW_GOLD, SUN_GOLD};
use crate::field::Animation;
use crate::surface::{Point, RadialGradient, Surface, Viewport};

pub const SUN_RADIUS: f32 = 80.0;
pub const RAY_COUNT: usize = 12;
/// Radians per tick.
pub const SPIN: f32 = 0.005;
const RAY_WIDTH: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunField {
    pub center: Point,
    pub radius: f32,
    pub angle: f32,
}

impl SunField {
    pub fn ray_angles(&self) -> impl Iterator<Item = f32> + '_ {
        (0..RAY_COUNT).map(move |i| i as f32 * PI / 6.0 + self.angle)
    }

    fn glow(&self) -> RadialGradient {
        RadialGradient::new(self.center, self.radius * 0.5, self.radius * 3.0)
            .stop(0.0, GLOW_GOLD.with_alpha(0.8))
            .stop(0.3, GLOW_GOLD.with_alpha(0.2))
            .stop(1.0, GLOW_GOLD.with_alpha(0.0))
    }
}

impl Animation for SunField {
    fn init(bounds: Viewport, _rng: &mut StdRng) -> Self {
        Self {
            center: Point::new(bounds.w() * 0.8, bounds.h() * 0.2),
            radius: SUN_RADIUS,
            angle: 0.0,
        }
    }

    // Position and radius are fixed at mount; only the rays turn.
    fn step(&mut self, _bounds: Viewport, _rng: &mut StdRng) {
        self.angle += SPIN;
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.fill_radial_gradient(&self.glow());
        surface.fill_circle(self.center, self.radius, SUN_GOLD);

        let inner = self.radius * 1.2;
        let outer = self.radius * 1.8;
        for a in self.ray_angles() {
            surface.stroke_line(
                self.center.polar(inner, a),
                self.center.polar(outer, a),
                RAY_WIDTH,
                SUN_GOLD,
            );
        }
    }

    fn particle_count(&self) -> usize {
        1
    }
}
