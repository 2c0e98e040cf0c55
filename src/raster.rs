// Copyright (c) 2026 rezky_nightky

use crate::color::Rgba;
use crate::surface::{Point, RadialGradient, Surface, Viewport};

/// Premultiplied RGBA, channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Px {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Px {
    pub const TRANSPARENT: Px = Px {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    fn from_rgba(c: Rgba) -> Px {
        let a = c.a.clamp(0.0, 1.0);
        Px {
            r: c.r as f32 / 255.0 * a,
            g: c.g as f32 / 255.0 * a,
            b: c.b as f32 / 255.0 * a,
            a,
        }
    }

    /// Source-over.
    fn over(self, dst: Px) -> Px {
        let k = 1.0 - self.a;
        Px {
            r: self.r + dst.r * k,
            g: self.g + dst.g * k,
            b: self.b + dst.b * k,
            a: self.a + dst.a * k,
        }
    }

    /// Flattens onto an opaque backdrop.
    pub fn composite(self, backdrop: (u8, u8, u8)) -> (u8, u8, u8) {
        let k = 1.0 - self.a;
        let ch = |src: f32, bg: u8| {
            ((src + bg as f32 / 255.0 * k) * 255.0)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        (
            ch(self.r, backdrop.0),
            ch(self.g, backdrop.1),
            ch(self.b, backdrop.2),
        )
    }
}

/// Software surface. One raster pixel covers `scale x scale` surface units
/// and shapes are sampled at pixel centers.
#[derive(Clone, Debug)]
pub struct Raster {
    viewport: Viewport,
    scale: f32,
    cols: usize,
    rows: usize,
    pixels: Vec<Px>,
    scratch: Vec<usize>,
}

impl Raster {
    pub fn new(viewport: Viewport, scale: f32) -> Self {
        let scale = scale.max(1.0);
        let mut r = Self {
            viewport,
            scale,
            cols: 0,
            rows: 0,
            pixels: Vec::new(),
            scratch: Vec::new(),
        };
        r.alloc();
        r
    }

    fn alloc(&mut self) {
        self.cols = (self.viewport.w() / self.scale).ceil().max(1.0) as usize;
        self.rows = (self.viewport.h() / self.scale).ceil().max(1.0) as usize;
        self.pixels = vec![Px::TRANSPARENT; self.cols * self.rows];
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn pixel(&self, col: usize, row: usize) -> Px {
        if col >= self.cols || row >= self.rows {
            return Px::TRANSPARENT;
        }
        self.pixels[row * self.cols + col]
    }

    fn center_of(&self, col: usize, row: usize) -> Point {
        Point::new(
            (col as f32 + 0.5) * self.scale,
            (row as f32 + 0.5) * self.scale,
        )
    }

    /// Pixel range whose centers may fall in `[lo, hi]` surface units, clipped.
    fn span(&self, lo: f32, hi: f32, limit: usize) -> std::ops::Range<usize> {
        let a = (lo / self.scale - 0.5).ceil().max(0.0);
        let b = (hi / self.scale - 0.5).floor() + 1.0;
        let a = a.min(limit as f32) as usize;
        let b = b.clamp(0.0, limit as f32) as usize;
        a..b.max(a)
    }

    fn blend(&mut self, idx: usize, src: Px) {
        if let Some(dst) = self.pixels.get_mut(idx) {
            *dst = src.over(*dst);
        }
    }
}

impl Surface for Raster {
    fn size(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.alloc();
    }

    fn clear(&mut self) {
        self.pixels.fill(Px::TRANSPARENT);
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        if color.a <= 0.0 {
            return;
        }
        let src = Px::from_rgba(color);
        let thick = (width / self.scale).round().max(1.0) as i64;
        let lo = -(thick - 1) / 2;
        let hi = thick / 2;

        let (fx, fy) = (from.x / self.scale, from.y / self.scale);
        let (tx, ty) = (to.x / self.scale, to.y / self.scale);
        let len = (tx - fx).abs().max((ty - fy).abs());
        let steps = (len * 2.0).ceil().max(1.0) as usize;

        self.scratch.clear();
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let px = (fx + (tx - fx) * t).floor() as i64;
            let py = (fy + (ty - fy) * t).floor() as i64;
            for dy in lo..=hi {
                for dx in lo..=hi {
                    let (x, y) = (px + dx, py + dy);
                    if x < 0 || y < 0 || x >= self.cols as i64 || y >= self.rows as i64 {
                        continue;
                    }
                    self.scratch.push(y as usize * self.cols + x as usize);
                }
            }
        }
        self.scratch.sort_unstable();
        self.scratch.dedup();

        let touched = std::mem::take(&mut self.scratch);
        for &idx in &touched {
            self.blend(idx, src);
        }
        self.scratch = touched;
    }

    fn fill_ellipse(&mut self, center: Point, rx: f32, ry: f32, color: Rgba) {
        if rx <= 0.0 || ry <= 0.0 || color.a <= 0.0 {
            return;
        }
        let src = Px::from_rgba(color);
        let rows = self.span(center.y - ry, center.y + ry, self.rows);
        let cols = self.span(center.x - rx, center.x + rx, self.cols);
        for row in rows {
            for col in cols.clone() {
                let p = self.center_of(col, row);
                let nx = (p.x - center.x) / rx;
                let ny = (p.y - center.y) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    self.blend(row * self.cols + col, src);
                }
            }
        }
    }

    fn fill_radial_gradient(&mut self, gradient: &RadialGradient) {
        let c = gradient.center;
        let r = gradient.outer;
        if r <= 0.0 {
            return;
        }
        let rows = self.span(c.y - r, c.y + r, self.rows);
        let cols = self.span(c.x - r, c.x + r, self.cols);
        for row in rows {
            for col in cols.clone() {
                let p = self.center_of(col, row);
                let d = ((p.x - c.x).powi(2) + (p.y - c.y).powi(2)).sqrt();
                if d > r {
                    continue;
                }
                let color = gradient.color_at(d);
                if color.a > 0.0 {
                    self.blend(row * self.cols + col, Px::from_rgba(color));
                }
            }
        }
    }
}
