// Copyright (c) 2026 rezky_nightky

//! Mount/unmount lifecycle and the self-rescheduling frame loop.

use rand::rngs::StdRng;

use crate::field::{self, Animation};
use crate::runtime::Variant;
use crate::surface::{Surface, Viewport};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// What the embedding environment provides: a viewport, a drawing surface,
/// refresh-driven frame scheduling and resize notifications.
pub trait Host {
    type Surface: Surface;

    fn viewport(&self) -> Viewport;

    /// `None` when no usable 2D context exists.
    fn create_surface(&mut self, viewport: Viewport) -> Option<Self::Surface>;

    /// Ask to be called back on the next refresh opportunity.
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);

    fn listen_resize(&mut self);

    fn unlisten_resize(&mut self);
}

pub struct Animator<S: Surface> {
    variant: Variant,
    rng: StdRng,
    surface: Option<S>,
    field: Option<Box<dyn Animation>>,
    active: bool,
    pending: Option<FrameHandle>,
    frames: u64,
}

impl<S: Surface> Animator<S> {
    pub fn new(variant: Variant, rng: StdRng) -> Self {
        Self {
            variant,
            rng,
            surface: None,
            field: None,
            active: false,
            pending: None,
            frames: 0,
        }
    }

    #[allow(dead_code)]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    #[allow(dead_code)]
    pub fn field(&self) -> Option<&dyn Animation> {
        self.field.as_deref()
    }

    /// Sizes a fresh surface to the viewport, builds the particle set and
    /// requests the first frame. Returns `false` and stays idle when the host
    /// has no surface to offer.
    pub fn activate<H: Host<Surface = S>>(&mut self, host: &mut H) -> bool {
        if self.active {
            return true;
        }

        let viewport = host.viewport();
        let Some(surface) = host.create_surface(viewport) else {
            log::warn!(
                "no drawing surface for {}x{}; {} backdrop stays blank",
                viewport.width,
                viewport.height,
                self.variant.label()
            );
            return false;
        };

        let bounds = surface.size();
        self.field = Some(field::spawn(self.variant, bounds, &mut self.rng));
        self.surface = Some(surface);
        self.active = true;
        host.listen_resize();
        self.pending = Some(host.request_frame());

        log::debug!(
            "{} backdrop mounted at {}x{}",
            self.variant.label(),
            bounds.width,
            bounds.height
        );
        true
    }

    /// One clear-render-step cycle, then reschedules. A tick that arrives
    /// after deactivation draws nothing and schedules nothing.
    pub fn on_frame<H: Host<Surface = S>>(&mut self, host: &mut H) -> bool {
        if !self.active {
            return false;
        }
        self.pending = None;

        let (Some(surface), Some(field)) = (self.surface.as_mut(), self.field.as_mut()) else {
            return false;
        };

        surface.clear();
        field.render(&mut *surface);
        field.step(surface.size(), &mut self.rng);
        self.frames = self.frames.wrapping_add(1);

        self.pending = Some(host.request_frame());
        true
    }

    /// Particles keep their positions; they respawn against the new bounds
    /// on their next cycle.
    pub fn resize(&mut self, viewport: Viewport) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if surface.size() == viewport {
            return;
        }
        surface.resize(viewport);
        log::debug!("surface resized to {}x{}", viewport.width, viewport.height);
    }

    pub fn deactivate<H: Host<Surface = S>>(&mut self, host: &mut H) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
        host.unlisten_resize();
        self.field = None;
        self.surface = None;
        log::debug!(
            "{} backdrop unmounted after {} frames",
            self.variant.label(),
            self.frames
        );
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::surface::recording::{DrawCall, RecordingSurface};

    #[derive(Default)]
    struct FakeHost {
        viewport: (u32, u32),
        no_surface: bool,
        next_id: u64,
        pending: Vec<FrameHandle>,
        cancelled: Vec<FrameHandle>,
        listening: bool,
    }

    impl FakeHost {
        fn new(w: u32, h: u32) -> Self {
            Self {
                viewport: (w, h),
                ..Default::default()
            }
        }

        /// Fires whatever frame is due, as a refresh would.
        fn tick(&mut self, animator: &mut Animator<RecordingSurface>) -> bool {
            self.pending.clear();
            animator.on_frame(self)
        }
    }

    impl Host for FakeHost {
        type Surface = RecordingSurface;

        fn viewport(&self) -> Viewport {
            Viewport::new(self.viewport.0, self.viewport.1)
        }

        fn create_surface(&mut self, viewport: Viewport) -> Option<RecordingSurface> {
            if self.no_surface {
                return None;
            }
            Some(RecordingSurface::new(viewport.width, viewport.height))
        }

        fn request_frame(&mut self) -> FrameHandle {
            self.next_id += 1;
            let h = FrameHandle(self.next_id);
            self.pending.push(h);
            h
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.pending.retain(|&h| h != handle);
            self.cancelled.push(handle);
        }

        fn listen_resize(&mut self) {
            self.listening = true;
        }

        fn unlisten_resize(&mut self) {
            self.listening = false;
        }
    }

    fn animator(variant: Variant) -> Animator<RecordingSurface> {
        Animator::new(variant, StdRng::seed_from_u64(99))
    }

    #[test]
    fn activation_builds_field_and_requests_first_frame() {
        let mut host = FakeHost::new(800, 600);
        let mut a = animator(Variant::Rain);
        assert!(a.activate(&mut host));
        assert!(a.is_active());
        assert!(host.listening);
        assert_eq!(host.pending.len(), 1);
        assert_eq!(a.field().map(|f| f.particle_count()), Some(200));
        assert_eq!(a.surface().map(|s| s.size()), Some(Viewport::new(800, 600)));
    }

    #[test]
    fn missing_surface_never_starts_loop() {
        let mut host = FakeHost::new(800, 600);
        host.no_surface = true;
        let mut a = animator(Variant::Sun);
        assert!(!a.activate(&mut host));
        assert!(!a.is_active());
        assert!(host.pending.is_empty());
        assert!(!host.listening);
        assert!(!host.tick(&mut a));
        assert_eq!(a.frames(), 0);
    }

    #[test]
    fn each_frame_clears_renders_and_reschedules() {
        let mut host = FakeHost::new(1000, 500);
        let mut a = animator(Variant::Sun);
        a.activate(&mut host);
        for _ in 0..3 {
            assert!(host.tick(&mut a));
            assert_eq!(host.pending.len(), 1);
        }
        let s = a.surface().expect("mounted");
        assert_eq!(s.clears(), 3);
        assert_eq!(s.calls.first(), Some(&DrawCall::Clear));
        // clear + glow + disc + 12 rays per frame
        assert_eq!(s.calls.len(), 3 * 15);
        assert_eq!(a.frames(), 3);
    }

    #[test]
    fn no_render_after_deactivation_even_if_host_ticks() {
        let mut host = FakeHost::new(800, 600);
        let mut a = animator(Variant::Rain);
        a.activate(&mut host);
        host.tick(&mut a);
        host.tick(&mut a);
        let outstanding = host.pending[0];

        a.deactivate(&mut host);
        assert!(!a.is_active());
        assert!(host.pending.is_empty());
        assert_eq!(host.cancelled, vec![outstanding]);
        assert!(!host.listening);

        assert!(!host.tick(&mut a));
        assert!(!a.on_frame(&mut host));
        assert!(host.pending.is_empty());
        assert_eq!(a.frames(), 2);
        assert!(a.surface().is_none());
    }

    #[test]
    fn resize_to_same_size_twice_changes_nothing() {
        let mut host = FakeHost::new(640, 480);
        let mut a = animator(Variant::Cloud);
        a.activate(&mut host);

        let mut before = RecordingSurface::new(640, 480);
        a.field().expect("mounted").render(&mut before);

        a.resize(Viewport::new(640, 480));
        a.resize(Viewport::new(640, 480));

        let mut after = RecordingSurface::new(640, 480);
        a.field().expect("mounted").render(&mut after);
        assert_eq!(before.calls, after.calls);

        let s = a.surface().expect("mounted");
        assert_eq!(s.size(), Viewport::new(640, 480));
        assert_eq!(s.resizes, 0);
    }

    #[test]
    fn resize_keeps_particles_where_they_were() {
        let mut host = FakeHost::new(800, 600);
        let mut a = animator(Variant::Rain);
        a.activate(&mut host);

        let mut before = RecordingSurface::new(800, 600);
        a.field().expect("mounted").render(&mut before);

        a.resize(Viewport::new(200, 150));
        assert_eq!(
            a.surface().map(|s| s.size()),
            Some(Viewport::new(200, 150))
        );

        let mut after = RecordingSurface::new(200, 150);
        a.field().expect("mounted").render(&mut after);
        assert_eq!(before.calls, after.calls);
    }

    #[test]
    fn reactivation_builds_a_fresh_field() {
        let mut host = FakeHost::new(800, 600);
        let mut a = animator(Variant::Rain);
        a.activate(&mut host);
        let mut first = RecordingSurface::new(800, 600);
        a.field().expect("mounted").render(&mut first);

        a.deactivate(&mut host);
        assert!(a.activate(&mut host));
        let mut second = RecordingSurface::new(800, 600);
        a.field().expect("mounted").render(&mut second);
        assert_ne!(first.calls, second.calls);
        assert!(host.tick(&mut a));
    }
}
