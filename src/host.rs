// Copyright (c) 2026 rezky_nightky

use std::io::Result;
use std::time::{Duration, Instant};

use crate::animator::{FrameHandle, Host};
use crate::frame::{Frame, Presentation};
use crate::raster::Raster;
use crate::surface::Viewport;
use crate::terminal::Terminal;

/// Refresh-driven scheduling: at most one outstanding request, due on the
/// next tick of a fixed period.
#[derive(Debug)]
pub struct FrameClock {
    period: Duration,
    next_tick: Instant,
    pending: Option<(FrameHandle, Instant)>,
    next_id: u64,
}

impl FrameClock {
    pub fn new(fps: f64, now: Instant) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / fps),
            next_tick: now,
            pending: None,
            next_id: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn request(&mut self, now: Instant) -> FrameHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = FrameHandle(self.next_id);
        // late frames snap to now rather than bursting to catch up
        if self.next_tick < now {
            self.next_tick = now;
        }
        self.pending = Some((handle, self.next_tick));
        self.next_tick += self.period;
        handle
    }

    pub fn cancel(&mut self, handle: FrameHandle) {
        if self.pending.is_some_and(|(h, _)| h == handle) {
            self.pending = None;
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, at)| at)
    }

    /// Hands out the pending request once it is due.
    pub fn take_due(&mut self, now: Instant) -> Option<FrameHandle> {
        match self.pending {
            Some((h, at)) if at <= now => {
                self.pending = None;
                Some(h)
            }
            _ => None,
        }
    }
}

/// Each terminal cell shows two raster pixels stacked vertically, and one
/// raster pixel spans `scale` surface units.
pub fn viewport_for(cols: u16, rows: u16, scale: u32) -> Viewport {
    Viewport::new(cols as u32 * scale, rows as u32 * 2 * scale)
}

pub struct TerminalHost {
    term: Terminal,
    cols: u16,
    rows: u16,
    scale: u32,
    clock: FrameClock,
    listening: bool,
}

impl TerminalHost {
    pub fn new(term: Terminal, scale: u32, fps: f64) -> Result<Self> {
        let (cols, rows) = term.size()?;
        Ok(Self {
            term,
            cols,
            rows,
            scale,
            clock: FrameClock::new(fps, Instant::now()),
            listening: false,
        })
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn take_due(&mut self, now: Instant) -> Option<FrameHandle> {
        self.clock.take_due(now)
    }

    /// Records the new terminal size and returns the viewport to forward,
    /// or `None` when nobody is listening.
    pub fn terminal_resized(&mut self, cols: u16, rows: u16) -> Option<Viewport> {
        self.cols = cols;
        self.rows = rows;
        self.listening.then(|| self.viewport())
    }

    pub fn present(
        &mut self,
        raster: &Raster,
        frame: &mut Frame,
        look: &Presentation,
    ) -> Result<()> {
        frame.paint(raster, look);
        if frame.has_changes() {
            self.term.draw(frame)?;
        }
        Ok(())
    }

    pub fn blank(&mut self, frame: &mut Frame, look: &Presentation) -> Result<()> {
        *frame = Frame::new(self.cols, self.rows, look.blank());
        self.term.draw(frame)
    }
}

impl Host for TerminalHost {
    type Surface = Raster;

    fn viewport(&self) -> Viewport {
        viewport_for(self.cols, self.rows, self.scale)
    }

    fn create_surface(&mut self, viewport: Viewport) -> Option<Raster> {
        if self.cols == 0 || self.rows == 0 {
            return None;
        }
        Some(Raster::new(viewport, self.scale as f32))
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.clock.request(Instant::now())
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.clock.cancel(handle);
    }

    fn listen_resize(&mut self) {
        self.listening = true;
    }

    fn unlisten_resize(&mut self) {
        self.listening = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_maps_cells_to_square_pixels() {
        assert_eq!(viewport_for(100, 30, 8), Viewport::new(800, 480));
        assert_eq!(viewport_for(0, 0, 8), Viewport::new(1, 1));
    }

    #[test]
    fn requests_fall_on_successive_ticks() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(50.0, t0);
        let a = clock.request(t0);
        assert_eq!(clock.deadline(), Some(t0));
        assert_eq!(clock.take_due(t0), Some(a));
        assert_eq!(clock.take_due(t0), None);

        let b = clock.request(t0);
        assert_ne!(a, b);
        let at = clock.deadline().expect("pending");
        assert_eq!(at, t0 + clock.period());
        assert_eq!(clock.take_due(t0), None);
        assert_eq!(clock.take_due(at), Some(b));
    }

    #[test]
    fn late_request_snaps_to_now() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(60.0, t0);
        clock.request(t0);
        clock.take_due(t0);
        let late = t0 + Duration::from_secs(2);
        clock.request(late);
        assert_eq!(clock.deadline(), Some(late));
    }

    #[test]
    fn cancelled_request_never_fires() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(30.0, t0);
        let h = clock.request(t0);
        clock.cancel(h);
        assert_eq!(clock.deadline(), None);
        assert_eq!(clock.take_due(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn cancelling_a_stale_handle_keeps_the_current_one() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(30.0, t0);
        let old = clock.request(t0);
        clock.take_due(t0);
        let cur = clock.request(t0);
        clock.cancel(old);
        assert!(clock.deadline().is_some());
        assert_eq!(clock.take_due(t0 + Duration::from_secs(1)), Some(cur));
    }
}
