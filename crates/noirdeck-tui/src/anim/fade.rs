use std::time::{Duration, Instant};

use noirdeck_core::config::TimingConfig;
use noirdeck_core::deck::{Fragment, Screen};

use super::easing::{EasingType, EasingTypeExt};
use super::timing::progress;

/// Durations and curve for every fade on screen
#[derive(Debug, Clone, Copy)]
pub struct FadeTimings {
    pub screen_in: Duration,
    pub screen_out: Duration,
    pub fragment_in: Duration,
    pub easing: EasingType,
}

impl FadeTimings {
    pub fn from_config(timing: &TimingConfig) -> Self {
        Self {
            screen_in: timing.screen_fade_in(),
            screen_out: timing.fade_out(),
            fragment_in: timing.fragment_fade(),
            easing: timing.easing,
        }
    }
}

/// Opacity of a whole screen: fading in after activation, out after deactivation
pub fn screen_opacity(screen: &Screen, now: Instant, fades: &FadeTimings) -> f64 {
    let Some(changed_at) = screen.changed_at else {
        return if screen.active { 1.0 } else { 0.0 };
    };

    if screen.active {
        fades.easing.apply(progress(changed_at, now, fades.screen_in))
    } else {
        1.0 - fades.easing.apply(progress(changed_at, now, fades.screen_out))
    }
}

/// Opacity of a fragment on its own, ignoring the screen's fade
pub fn fragment_opacity(fragment: &Fragment, now: Instant, fades: &FadeTimings) -> f64 {
    if !fragment.visible {
        return 0.0;
    }
    match fragment.revealed_at {
        Some(at) => fades.easing.apply(progress(at, now, fades.fragment_in)),
        None => 1.0,
    }
}
