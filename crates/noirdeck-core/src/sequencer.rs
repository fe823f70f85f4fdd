//! Screen sequencer: current index plus a three-phase transition machine.
//!
//! ```text
//!   Idle --advance()--> FadingOut --fade_out--> Settling --settle--> Idle
//!                                   (index += 1)
//! ```
//!
//! Any `advance()` outside `Idle`, or on the last screen, is dropped.

use std::time::{Duration, Instant};

use tracing::{debug, info};

/// Transition phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Outgoing screen is fading; index not yet moved
    FadingOut { since: Instant },
    /// New screen is in; further advances still blocked
    Settling { since: Instant },
}

/// Emitted by `tick` when the fade-out completes and the index moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    /// Screen that just became current
    pub index: usize,
    /// When the fade-out edge fell
    pub at: Instant,
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    index: usize,
    total: usize,
    phase: Phase,
    fade_out: Duration,
    settle: Duration,
}

impl Sequencer {
    pub fn new(total: usize, fade_out: Duration, settle: Duration) -> Self {
        Self {
            index: 0,
            total,
            phase: Phase::Idle,
            fade_out,
            settle,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.phase != Phase::Idle
    }

    #[inline]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    #[inline]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }

    /// Strictly between the first and the last screen
    #[inline]
    pub fn is_middle(&self) -> bool {
        !self.is_first() && !self.is_last()
    }

    /// Whether `advance` would be accepted right now
    pub fn can_advance(&self) -> bool {
        !self.is_transitioning() && !self.is_last()
    }

    /// Begin a transition to the next screen. Returns false when dropped.
    pub fn advance(&mut self, now: Instant) -> bool {
        if !self.can_advance() {
            debug!(
                "Advance dropped at screen {} (phase {:?})",
                self.index, self.phase
            );
            return false;
        }

        self.phase = Phase::FadingOut { since: now };
        debug!("Fading out screen {}", self.index);
        true
    }

    /// Apply the timed edges due by `now`. Both edges may fall in one call;
    /// the settle edge is measured from the fade edge, not from `now`.
    pub fn tick(&mut self, now: Instant) -> Option<Arrival> {
        let mut arrival = None;

        if let Phase::FadingOut { since } = self.phase {
            let edge = since + self.fade_out;
            if now >= edge {
                self.index += 1;
                self.phase = Phase::Settling { since: edge };
                info!("Arrived at screen {}/{}", self.index + 1, self.total);
                arrival = Some(Arrival {
                    index: self.index,
                    at: edge,
                });
            }
        }

        if let Phase::Settling { since } = self.phase {
            if now >= since + self.settle {
                self.phase = Phase::Idle;
                debug!("Transition settled on screen {}", self.index);
            }
        }

        arrival
    }

    /// Back to the first screen; any in-flight transition is discarded
    pub fn restart(&mut self) {
        self.index = 0;
        self.phase = Phase::Idle;
        info!("Sequencer restarted");
    }

    /// When the current transition will settle, if one is running
    pub fn settles_at(&self) -> Option<Instant> {
        match self.phase {
            Phase::Idle => None,
            Phase::FadingOut { since } => Some(since + self.fade_out + self.settle),
            Phase::Settling { since } => Some(since + self.settle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const D1: Duration = Duration::from_millis(800);
    const D2: Duration = Duration::from_millis(1000);

    fn seq(total: usize) -> Sequencer {
        Sequencer::new(total, D1, D2)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_advance_moves_after_fade_and_settles_after_both() {
        let mut s = seq(4);
        let t0 = Instant::now();
        assert!(s.advance(t0));
        assert!(s.is_transitioning());
        assert_eq!(s.index(), 0);

        assert_eq!(s.tick(t0 + ms(799)), None);
        assert_eq!(s.index(), 0);

        let arrival = s.tick(t0 + ms(800)).unwrap();
        assert_eq!(arrival.index, 1);
        assert_eq!(arrival.at, t0 + D1);
        assert!(s.is_transitioning());

        s.tick(t0 + ms(1799));
        assert!(s.is_transitioning());
        s.tick(t0 + ms(1800));
        assert!(!s.is_transitioning());
        assert_eq!(s.index(), 1);
    }

    #[test]
    fn test_every_index_reaches_next() {
        let total = 6;
        let mut s = seq(total);
        let mut t = Instant::now();
        for i in 0..total - 1 {
            assert_eq!(s.index(), i);
            assert!(s.advance(t));
            t += D1 + D2;
            s.tick(t);
            assert_eq!(s.index(), i + 1);
            assert!(!s.is_transitioning());
        }
    }

    #[test]
    fn test_advance_while_transitioning_is_noop() {
        let mut s = seq(4);
        let t0 = Instant::now();
        assert!(s.advance(t0));
        let before = s.phase();

        assert!(!s.advance(t0 + ms(100)));
        assert_eq!(s.phase(), before);
        assert_eq!(s.index(), 0);

        // Also dropped while settling
        s.tick(t0 + ms(900));
        assert!(!s.advance(t0 + ms(1000)));
        assert_eq!(s.index(), 1);

        // Dropped requests are not queued
        s.tick(t0 + ms(5000));
        assert_eq!(s.index(), 1);
        assert!(!s.is_transitioning());
    }

    #[test]
    fn test_advance_on_last_is_noop() {
        let mut s = seq(2);
        let t0 = Instant::now();
        s.advance(t0);
        s.tick(t0 + D1 + D2);
        assert!(s.is_last());
        assert!(!s.advance(t0 + ms(5000)));
        assert_eq!(s.index(), 1);
        assert!(!s.is_transitioning());
    }

    #[test]
    fn test_advance_on_last_while_settling_is_noop() {
        let mut s = seq(2);
        let t0 = Instant::now();
        s.advance(t0);
        s.tick(t0 + D1);
        assert!(s.is_last());
        assert!(matches!(s.phase(), Phase::Settling { .. }));
        let settles = s.settles_at();

        assert!(!s.advance(t0 + D1 + ms(100)));
        assert_eq!(s.index(), 1);
        assert_eq!(s.settles_at(), settles);
        assert_eq!(settles, Some(t0 + D1 + D2));
    }

    #[test]
    fn test_single_screen_never_advances() {
        let mut s = seq(1);
        assert!(s.is_first() && s.is_last());
        assert!(!s.advance(Instant::now()));
    }

    #[test]
    fn test_late_tick_processes_both_edges() {
        let mut s = seq(3);
        let t0 = Instant::now();
        s.advance(t0);
        let arrival = s.tick(t0 + ms(10_000)).unwrap();
        assert_eq!(arrival.index, 1);
        assert_eq!(arrival.at, t0 + D1);
        assert!(!s.is_transitioning());
    }

    #[test]
    fn test_restart_discards_transition() {
        let mut s = seq(3);
        let t0 = Instant::now();
        s.advance(t0);
        s.tick(t0 + D1);
        s.restart();
        assert_eq!(s.index(), 0);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.tick(t0 + ms(10_000)), None);
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn test_settles_at() {
        let mut s = seq(3);
        let t0 = Instant::now();
        assert_eq!(s.settles_at(), None);
        s.advance(t0);
        assert_eq!(s.settles_at(), Some(t0 + D1 + D2));
        s.tick(t0 + D1);
        assert_eq!(s.settles_at(), Some(t0 + D1 + D2));
    }

    #[test]
    fn test_middle_bounds() {
        let mut s = seq(3);
        assert!(!s.is_middle());
        let t0 = Instant::now();
        s.advance(t0);
        s.tick(t0 + D1 + D2);
        assert!(s.is_middle());
        s.advance(t0 + ms(2000));
        s.tick(t0 + ms(4000));
        assert!(!s.is_middle());
        assert!(s.is_last());
    }
}
