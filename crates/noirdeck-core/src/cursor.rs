//! Cursor follower: an instant pointer dot and a lag-smoothed trailing circle.

use tracing::debug;

use crate::config::PointerSetting;
use crate::frame::FrameTask;

/// Input device precision, decided once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Fine,
    Coarse,
}

impl PointerKind {
    /// Resolve the configured setting; `auto` treats the Linux VT console,
    /// which reports no pointer motion, as coarse
    pub fn resolve(setting: PointerSetting, term: Option<&str>) -> Self {
        match setting {
            PointerSetting::Fine => Self::Fine,
            PointerSetting::Coarse => Self::Coarse,
            PointerSetting::Auto => match term {
                Some("linux") => Self::Coarse,
                _ => Self::Fine,
            },
        }
    }

    /// Resolve against the current `TERM`
    pub fn detect(setting: PointerSetting) -> Self {
        let term = std::env::var("TERM").ok();
        let kind = Self::resolve(setting, term.as_deref());
        debug!("Pointer kind {:?} (TERM={:?})", kind, term);
        kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct CursorFollower {
    pointer: Point,
    trail: Point,
    smoothing: f64,
    interacting: bool,
}

impl CursorFollower {
    /// Both trackers start at the viewport centre
    pub fn new(width: f64, height: f64, smoothing: f64) -> Self {
        let centre = Point::new(width / 2.0, height / 2.0);
        Self {
            pointer: centre,
            trail: centre,
            smoothing: smoothing.clamp(0.0, 1.0),
            interacting: false,
        }
    }

    /// Instant tracker; authoritative pointer position
    #[inline]
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Smoothed tracker
    #[inline]
    pub fn trail(&self) -> Point {
        self.trail
    }

    #[inline]
    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    /// Pointer moved; `over_control` marks a hovered interactive control
    pub fn pointer_moved(&mut self, x: f64, y: f64, over_control: bool) {
        self.pointer = Point::new(x, y);
        self.interacting = over_control;
    }

    /// One step of exponential smoothing toward the pointer
    pub fn follow(&mut self) {
        self.trail.x += (self.pointer.x - self.trail.x) * self.smoothing;
        self.trail.y += (self.pointer.y - self.trail.y) * self.smoothing;
    }
}

impl FrameTask for CursorFollower {
    fn on_frame(&mut self) {
        self.follow();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_centre() {
        let c = CursorFollower::new(800.0, 600.0, 0.15);
        assert_eq!(c.pointer(), Point::new(400.0, 300.0));
        assert_eq!(c.trail(), Point::new(400.0, 300.0));
    }

    #[test]
    fn test_pointer_is_instant_trail_is_smoothed() {
        let mut c = CursorFollower::new(0.0, 0.0, 0.15);
        c.pointer_moved(100.0, 200.0, false);
        assert_eq!(c.pointer(), Point::new(100.0, 200.0));
        assert_eq!(c.trail(), Point::new(0.0, 0.0));

        c.follow();
        assert!((c.trail().x - 15.0).abs() < 1e-9);
        assert!((c.trail().y - 30.0).abs() < 1e-9);

        c.follow();
        assert!((c.trail().x - 27.75).abs() < 1e-9);
    }

    #[test]
    fn test_trail_converges() {
        let mut c = CursorFollower::new(0.0, 0.0, 0.15);
        c.pointer_moved(50.0, 50.0, false);
        for _ in 0..200 {
            c.on_frame();
        }
        assert!((c.trail().x - 50.0).abs() < 1e-6);
        assert!((c.trail().y - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_interacting_follows_hover() {
        let mut c = CursorFollower::new(10.0, 10.0, 0.15);
        c.pointer_moved(1.0, 1.0, true);
        assert!(c.is_interacting());
        c.pointer_moved(2.0, 2.0, false);
        assert!(!c.is_interacting());
    }

    #[test]
    fn test_pointer_kind_resolution() {
        assert_eq!(PointerKind::resolve(PointerSetting::Auto, Some("linux")), PointerKind::Coarse);
        assert_eq!(PointerKind::resolve(PointerSetting::Auto, Some("xterm-256color")), PointerKind::Fine);
        assert_eq!(PointerKind::resolve(PointerSetting::Auto, None), PointerKind::Fine);
        assert_eq!(PointerKind::resolve(PointerSetting::Coarse, Some("xterm")), PointerKind::Coarse);
        assert_eq!(PointerKind::resolve(PointerSetting::Fine, Some("linux")), PointerKind::Fine);
    }
}
