// Copyright (c) 2026 rezky_nightky

use crate::cell::{Cell, FULL_BLOCK, LOWER_HALF, UPPER_HALF};
use crate::color::{luminance, term_color, BLACK};
use crate::raster::{Px, Raster};
use crate::runtime::ColorMode;

/// Pixels fainter than this count as empty when there is no backdrop.
const ALPHA_FLOOR: f32 = 0.02;
/// Mono mode lights a half cell above this luminance.
const MONO_THRESHOLD: f32 = 0.12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Presentation {
    pub mode: ColorMode,
    /// Opaque color behind the animation; `None` keeps the terminal's own.
    pub backdrop: Option<(u8, u8, u8)>,
}

impl Presentation {
    fn resolve(&self, px: Px) -> Option<(u8, u8, u8)> {
        match self.backdrop {
            Some(bg) => Some(px.composite(bg)),
            None if px.a < ALPHA_FLOOR => None,
            None => Some(px.composite(BLACK)),
        }
    }

    fn lit(&self, px: Px) -> bool {
        luminance(px.composite(BLACK)) > MONO_THRESHOLD
    }

    /// Two stacked raster pixels become one terminal cell.
    pub fn cell(&self, top: Px, bottom: Px) -> Cell {
        if self.mode == ColorMode::Mono {
            let ch = match (self.lit(top), self.lit(bottom)) {
                (true, true) => FULL_BLOCK,
                (true, false) => UPPER_HALF,
                (false, true) => LOWER_HALF,
                (false, false) => ' ',
            };
            return Cell::glyph(ch, None, None);
        }

        let tc = |rgb| term_color(rgb, self.mode);
        match (self.resolve(top), self.resolve(bottom)) {
            (None, None) => Cell::blank_with_bg(None),
            (Some(t), Some(b)) if t == b => Cell::blank_with_bg(tc(t)),
            (Some(t), Some(b)) => Cell::glyph(UPPER_HALF, tc(t), tc(b)),
            (Some(t), None) => Cell::glyph(UPPER_HALF, tc(t), None),
            (None, Some(b)) => Cell::glyph(LOWER_HALF, tc(b), None),
        }
    }

    pub fn blank(&self) -> Cell {
        self.cell(Px::TRANSPARENT, Px::TRANSPARENT)
    }
}

/// Terminal cell grid with change tracking, so only touched cells are
/// re-emitted.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16, blank: Cell) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![blank; len],
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn has_changes(&self) -> bool {
        self.dirty_all || !self.dirty.is_empty()
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty_all = true;
        self.dirty.clear();
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
            self.dirty.clear();
            return;
        }
        for &i in &self.dirty {
            if let Some(v) = self.dirty_map.get_mut(i) {
                *v = false;
            }
        }
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells[i]
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if self.cells[i] == cell {
            return;
        }
        self.cells[i] = cell;
        if !self.dirty_all && !self.dirty_map[i] {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }

    /// Rebuilds the cell grid from a raster; a size change starts a full
    /// redraw.
    pub fn paint(&mut self, raster: &Raster, look: &Presentation) {
        let width = raster.cols().min(u16::MAX as usize) as u16;
        let height = raster.rows().div_ceil(2).min(u16::MAX as usize) as u16;
        if width != self.width || height != self.height {
            *self = Frame::new(width, height, look.blank());
        }

        for y in 0..height {
            let row = y as usize * 2;
            for x in 0..width {
                let col = x as usize;
                let cell = look.cell(raster.pixel(col, row), raster.pixel(col, row + 1));
                self.set(x, y, cell);
            }
        }
    }
}
