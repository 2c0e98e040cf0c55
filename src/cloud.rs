// Copyright (c) 2026 rezky_nightky

use rand::{
    distr::{Distribution, Uniform},
    rngs::StdRng,
    Rng,
};

use crate::color::CLOUD_WHITE;
use crate::field::Animation;
use crate::surface::{Point, Surface, Viewport};

pub const CLOUD_COUNT: usize = 10;

/// Silhouette height as a fraction of width.
const ASPECT: f32 = 0.6;

/// Extra puffs around the main body: offset as fractions of (width, height)
/// and radius as a fraction of the main radii.
const PUFFS: [(f32, f32, f32); 3] = [(-0.25, 0.1, 0.6), (0.25, -0.1, 0.7), (0.4, 0.15, 0.5)];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudPuff {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub speed: f32,
    pub opacity: f32,
}

impl CloudPuff {
    pub fn height(&self) -> f32 {
        self.width * ASPECT
    }

    /// Drifts right; once fully past the right edge it re-enters from the
    /// left at a new altitude in the upper half.
    pub fn advance(&mut self, bounds: Viewport, rng: &mut StdRng) {
        self.x += self.speed;
        if self.x > bounds.w() + self.width {
            self.x = -self.width;
            self.y = rng.random_range(0.0..bounds.h() / 2.0);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let h = self.height();
        let rx = self.width * 0.4;
        let ry = h * 0.4;
        let color = CLOUD_WHITE.with_alpha(self.opacity);

        surface.fill_ellipse(Point::new(self.x, self.y), rx, ry, color);
        for (ox, oy, k) in PUFFS {
            surface.fill_ellipse(
                Point::new(self.x + self.width * ox, self.y + h * oy),
                rx * k,
                ry * k,
                color,
            );
        }
    }
}

#[derive(Clone, Debug)]
pub struct CloudField {
    clouds: Vec<CloudPuff>,
}

impl CloudField {
    #[allow(dead_code)]
    pub fn clouds(&self) -> &[CloudPuff] {
        &self.clouds
    }

    #[cfg(test)]
    pub(crate) fn clouds_mut(&mut self) -> &mut [CloudPuff] {
        &mut self.clouds
    }
}

impl Animation for CloudField {
    fn init(bounds: Viewport, rng: &mut StdRng) -> Self {
        let rand_width = Uniform::new(100.0f32, 300.0).expect("valid range");
        let rand_speed = Uniform::new(0.1f32, 0.6).expect("valid range");
        let rand_opacity = Uniform::new(0.1f32, 0.6).expect("valid range");

        let clouds = (0..CLOUD_COUNT)
            .map(|_| CloudPuff {
                x: rng.random_range(0.0..bounds.w()),
                y: rng.random_range(0.0..bounds.h() / 2.0),
                width: rand_width.sample(rng),
                speed: rand_speed.sample(rng),
                opacity: rand_opacity.sample(rng),
            })
            .collect();
        Self { clouds }
    }

    fn step(&mut self, bounds: Viewport, rng: &mut StdRng) {
        for c in &mut self.clouds {
            c.advance(bounds, rng);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        for c in &self.clouds {
            c.draw(surface);
        }
    }

    fn particle_count(&self) -> usize {
        self.clouds.len()
    }
}
