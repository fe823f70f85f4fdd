//! Fade animation for screens, fragments and controls
//!
//! - `easing` - easing curves over [0, 1]
//! - `timing` - progress against a start instant, interpolation, color blending
//! - `fade` - opacity of screens and fragments at a given instant

pub mod easing;
pub mod fade;
pub mod timing;

pub use easing::{EasingType, EasingTypeExt};
pub use fade::{fragment_opacity, screen_opacity, FadeTimings};
pub use timing::{blend, lerp, progress};
