// Copyright (c) 2026 rezky_nightky

use rand::{
    distr::{Distribution, Uniform},
    rngs::StdRng,
    Rng,
};

use crate::color::RAIN_STROKE;
use crate::field::Animation;
use crate::surface::{Point, Surface, Viewport};

pub const RAINDROP_COUNT: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Raindrop {
    pub x: f32,
    pub y: f32,
    pub length: f32,
    pub speed: f32,
}

impl Raindrop {
    /// Falls one tick; past the bottom edge it restarts just above the top
    /// at a fresh column.
    pub fn advance(&mut self, bounds: Viewport, rng: &mut StdRng) {
        self.y += self.speed;
        if self.y > bounds.h() {
            self.y = -self.length;
            self.x = rng.random_range(0.0..bounds.w());
        }
    }
}

#[derive(Clone, Debug)]
pub struct RainField {
    drops: Vec<Raindrop>,
}

impl RainField {
    #[allow(dead_code)]
    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    #[cfg(test)]
    pub(crate) fn drops_mut(&mut self) -> &mut [Raindrop] {
        &mut self.drops
    }
}

impl Animation for RainField {
    fn init(bounds: Viewport, rng: &mut StdRng) -> Self {
        let rand_len = Uniform::new(10.0f32, 30.0).expect("valid range");
        let rand_speed = Uniform::new(5.0f32, 15.0).expect("valid range");

        let drops = (0..RAINDROP_COUNT)
            .map(|_| Raindrop {
                x: rng.random_range(0.0..bounds.w()),
                y: rng.random_range(0.0..bounds.h()),
                length: rand_len.sample(rng),
                speed: rand_speed.sample(rng),
            })
            .collect();
        Self { drops }
    }

    fn step(&mut self, bounds: Viewport, rng: &mut StdRng) {
        for d in &mut self.drops {
            d.advance(bounds, rng);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        for d in &self.drops {
            surface.stroke_line(
                Point::new(d.x, d.y),
                Point::new(d.x, d.y + d.length),
                1.0,
                RAIN_STROKE,
            );
        }
    }

    fn particle_count(&self) -> usize {
        self.drops.len()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::surface::recording::{DrawCall, RecordingSurface};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn init_draws_attributes_in_range() {
        let mut rng = rng();
        let field = RainField::init(Viewport::new(800, 600), &mut rng);
        assert_eq!(field.drops().len(), 200);
        for d in field.drops() {
            assert!((0.0..800.0).contains(&d.x));
            assert!((0.0..600.0).contains(&d.y));
            assert!((10.0..30.0).contains(&d.length));
            assert!((5.0..15.0).contains(&d.speed));
        }
    }

    #[test]
    fn drop_below_bottom_respawns_above_top() {
        let mut rng = rng();
        let bounds = Viewport::new(800, 600);
        let mut d = Raindrop {
            x: 12.0,
            y: 601.0,
            length: 20.0,
            speed: 7.0,
        };
        d.advance(bounds, &mut rng);
        assert_eq!(d.y, -20.0);
        assert!((0.0..800.0).contains(&d.x));
        assert_eq!(d.length, 20.0);
        assert_eq!(d.speed, 7.0);
    }

    #[test]
    fn drop_inside_bounds_only_falls() {
        let mut rng = rng();
        let mut d = Raindrop {
            x: 12.0,
            y: 100.0,
            length: 20.0,
            speed: 7.5,
        };
        d.advance(Viewport::new(800, 600), &mut rng);
        assert_eq!(d, Raindrop { y: 107.5, ..d });
    }

    #[test]
    fn y_stays_within_one_speed_of_the_bounds() {
        let mut rng = rng();
        let bounds = Viewport::new(320, 240);
        let mut field = RainField::init(bounds, &mut rng);
        for _ in 0..2000 {
            field.step(bounds, &mut rng);
            for d in field.drops() {
                assert!(d.y >= -d.length);
                assert!(d.y <= bounds.h() + d.speed);
                assert!((0.0..bounds.w()).contains(&d.x));
            }
        }
        assert_eq!(field.particle_count(), 200);
    }

    #[test]
    fn shrinking_bounds_respawns_against_new_height() {
        let mut rng = rng();
        let mut field = RainField::init(Viewport::new(800, 600), &mut rng);
        field.drops_mut()[0] = Raindrop {
            x: 700.0,
            y: 500.0,
            length: 15.0,
            speed: 5.0,
        };
        let small = Viewport::new(200, 100);
        field.step(small, &mut rng);
        let d = field.drops()[0];
        assert_eq!(d.y, -15.0);
        assert!((0.0..200.0).contains(&d.x));
    }

    #[test]
    fn render_strokes_one_vertical_line_per_drop() {
        let mut rng = rng();
        let field = RainField::init(Viewport::new(800, 600), &mut rng);
        let mut surface = RecordingSurface::new(800, 600);
        field.render(&mut surface);
        assert_eq!(surface.calls.len(), 200);
        for (call, d) in surface.calls.iter().zip(field.drops()) {
            assert_eq!(
                *call,
                DrawCall::Line {
                    from: Point::new(d.x, d.y),
                    to: Point::new(d.x, d.y + d.length),
                    width: 1.0,
                    color: RAIN_STROKE,
                }
            );
        }
    }
}
