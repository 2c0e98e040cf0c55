// Copyright (c) 2026 rezky_nightky

//! The 2D drawing contract the animations paint into.
//!
//! Coordinates are surface units (device pixels) with the origin at the top
//! left and y growing downwards, the same orientation as a browser canvas.

use crate::color::Rgba;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `self` in direction `angle` (radians).
    pub fn polar(self, radius: f32, angle: f32) -> Self {
        Self {
            x: self.x + radius * angle.cos(),
            y: self.y + radius * angle.sin(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Dimensions are clamped to at least 1x1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn w(self) -> f32 {
        self.width as f32
    }

    pub fn h(self) -> f32 {
        self.height as f32
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub inner: f32,
    pub outer: f32,
    /// Offsets in `0.0..=1.0`, ascending.
    pub stops: Vec<(f32, Rgba)>,
}

impl RadialGradient {
    pub fn new(center: Point, inner: f32, outer: f32) -> Self {
        Self {
            center,
            inner,
            outer,
            stops: Vec::new(),
        }
    }

    pub fn stop(mut self, offset: f32, color: Rgba) -> Self {
        self.stops.push((offset.clamp(0.0, 1.0), color));
        self
    }

    /// Color at `distance` from the center. Inside the inner circle the first
    /// stop is padded, beyond the outer circle the last one.
    pub fn color_at(&self, distance: f32) -> Rgba {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => return Rgba::rgba(0, 0, 0, 0.0),
        };

        let span = self.outer - self.inner;
        let t = if span <= f32::EPSILON {
            if distance < self.outer {
                0.0
            } else {
                1.0
            }
        } else {
            ((distance - self.inner) / span).clamp(0.0, 1.0)
        };

        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }
        for pair in self.stops.windows(2) {
            let (o0, c0) = pair[0];
            let (o1, c1) = pair[1];
            if t >= o0 && t <= o1 {
                let seg = o1 - o0;
                if seg <= f32::EPSILON {
                    return c1;
                }
                return c0.lerp(c1, (t - o0) / seg);
            }
        }
        last.1
    }
}

/// A resizable 2D drawing context.
pub trait Surface {
    fn size(&self) -> Viewport;

    fn resize(&mut self, viewport: Viewport);

    /// Resets every pixel to fully transparent.
    fn clear(&mut self);

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba);

    fn fill_ellipse(&mut self, center: Point, rx: f32, ry: f32, color: Rgba);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        self.fill_ellipse(center, radius, radius, color);
    }

    /// Fills the disc of radius `gradient.outer` around its center.
    fn fill_radial_gradient(&mut self, gradient: &RadialGradient);
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum DrawCall {
        Clear,
        Line {
            from: Point,
            to: Point,
            width: f32,
            color: Rgba,
        },
        Ellipse {
            center: Point,
            rx: f32,
            ry: f32,
            color: Rgba,
        },
        Gradient(RadialGradient),
    }

    /// Surface that remembers every call instead of drawing.
    #[derive(Debug)]
    pub struct RecordingSurface {
        pub viewport: Viewport,
        pub calls: Vec<DrawCall>,
        pub resizes: usize,
    }

    impl RecordingSurface {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                viewport: Viewport::new(width, height),
                calls: Vec::new(),
                resizes: 0,
            }
        }

        pub fn lines(&self) -> Vec<(Point, Point)> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    DrawCall::Line { from, to, .. } => Some((*from, *to)),
                    _ => None,
                })
                .collect()
        }

        pub fn clears(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Clear))
                .count()
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> Viewport {
            self.viewport
        }

        fn resize(&mut self, viewport: Viewport) {
            self.viewport = viewport;
            self.resizes += 1;
        }

        fn clear(&mut self) {
            self.calls.push(DrawCall::Clear);
        }

        fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
            self.calls.push(DrawCall::Line {
                from,
                to,
                width,
                color,
            });
        }

        fn fill_ellipse(&mut self, center: Point, rx: f32, ry: f32, color: Rgba) {
            self.calls.push(DrawCall::Ellipse {
                center,
                rx,
                ry,
                color,
            });
        }

        fn fill_radial_gradient(&mut self, gradient: &RadialGradient) {
            self.calls.push(DrawCall::Gradient(gradient.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glow() -> RadialGradient {
        RadialGradient::new(Point::new(0.0, 0.0), 10.0, 110.0)
            .stop(0.0, Rgba::rgba(255, 200, 64, 0.8))
            .stop(0.3, Rgba::rgba(255, 200, 64, 0.2))
            .stop(1.0, Rgba::rgba(255, 200, 64, 0.0))
    }

    #[test]
    fn gradient_pads_inside_inner_circle() {
        let g = glow();
        assert!((g.color_at(0.0).a - 0.8).abs() < 1e-6);
        assert!((g.color_at(9.9).a - 0.8).abs() < 1e-6);
    }

    #[test]
    fn gradient_hits_stops_and_interpolates() {
        let g = glow();
        // t = 0.3 at distance 40
        assert!((g.color_at(40.0).a - 0.2).abs() < 1e-5);
        // halfway between 0.0 and 0.3
        assert!((g.color_at(25.0).a - 0.5).abs() < 1e-5);
        assert!(g.color_at(110.0).a.abs() < 1e-6);
        assert!(g.color_at(500.0).a.abs() < 1e-6);
    }

    #[test]
    fn gradient_without_stops_is_transparent() {
        let g = RadialGradient::new(Point::new(0.0, 0.0), 0.0, 10.0);
        assert_eq!(g.color_at(5.0).a, 0.0);
    }

    #[test]
    fn viewport_is_at_least_one_by_one() {
        assert_eq!(Viewport::new(0, 0), Viewport::new(1, 1));
    }

    #[test]
    fn polar_offsets_along_angle() {
        let p = Point::new(10.0, 10.0).polar(5.0, std::f32::consts::FRAC_PI_2);
        assert!((p.x - 10.0).abs() < 1e-5);
        assert!((p.y - 15.0).abs() < 1e-5);
    }
}
