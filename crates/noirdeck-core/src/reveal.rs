//! Reveal choreography: staggered visibility of a screen's fragments.
//!
//! Invoking the choreographer on a screen hides every fragment and gives each
//! one an independent reveal deadline. `tick` turns deadlines into visibility.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::deck::Screen;

/// Reveal-delay classification of a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealClass {
    /// Explicit ordinal tier `k`
    Tier(u32),
    /// Always last
    Hint,
    Default,
}

/// Delay constants for the reveal rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTimings {
    pub base: Duration,
    pub tier_step: Duration,
    pub hint: Duration,
    pub default: Duration,
    /// Added to the default delay on every screen but the first
    pub stagger: Duration,
}

impl Default for RevealTimings {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            tier_step: Duration::from_millis(1200),
            hint: Duration::from_millis(4000),
            default: Duration::from_millis(300),
            stagger: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Choreographer {
    timings: RevealTimings,
}

impl Choreographer {
    pub fn new(timings: RevealTimings) -> Self {
        Self { timings }
    }

    pub fn timings(&self) -> &RevealTimings {
        &self.timings
    }

    /// Delay from choreograph time until a fragment of `class` on screen `screen_index` shows
    pub fn delay_for(&self, class: RevealClass, screen_index: usize) -> Duration {
        match class {
            RevealClass::Tier(k) => self.timings.base + self.timings.tier_step * k,
            RevealClass::Hint => self.timings.hint,
            RevealClass::Default if screen_index == 0 => self.timings.default,
            RevealClass::Default => self.timings.default + self.timings.stagger,
        }
    }

    /// Hide every fragment of `screen`, then schedule each one's reveal from `now`
    pub fn choreograph(&self, screen: &mut Screen, screen_index: usize, now: Instant) {
        self.choreograph_after(screen, screen_index, now, Duration::ZERO);
    }

    /// Like `choreograph`, with every deadline pushed back by `offset`
    pub fn choreograph_after(
        &self,
        screen: &mut Screen,
        screen_index: usize,
        now: Instant,
        offset: Duration,
    ) {
        for fragment in &mut screen.fragments {
            fragment.visible = false;
            fragment.revealed_at = None;
            let delay = offset + self.delay_for(fragment.reveal_class(), screen_index);
            fragment.reveal_at = Some(now + delay);
        }
        debug!(
            "Scheduled {} reveals for screen {}",
            screen.fragments.len(),
            screen_index
        );
    }

    /// Reveal fragments whose deadline has passed; returns how many became visible
    pub fn tick(&self, screen: &mut Screen, now: Instant) -> usize {
        let mut revealed = 0;
        for fragment in &mut screen.fragments {
            if let Some(at) = fragment.reveal_at {
                if now >= at {
                    fragment.visible = true;
                    fragment.revealed_at = Some(at);
                    fragment.reveal_at = None;
                    revealed += 1;
                }
            }
        }
        revealed
    }
}
