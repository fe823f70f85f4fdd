//! Time and interpolation helpers. Every function takes `now` explicitly so
//! a frame renders against a single instant.

use std::time::{Duration, Instant};

use ratatui::style::Color;

/// Fraction of `duration` elapsed between `start` and `now`, clamped to [0, 1]
#[inline]
pub fn progress(start: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Mix `to` over `from` with opacity `t`. Terminals have no alpha channel, so
/// fades blend the foreground toward the background color. Non-RGB colors
/// switch at the halfway point.
pub fn blend(from: Color, to: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| lerp(a as f64, b as f64, t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        let start = Instant::now();
        let d = Duration::from_millis(800);
        assert_eq!(progress(start, start, d), 0.0);
        assert!((progress(start, start + Duration::from_millis(400), d) - 0.5).abs() < 1e-9);
        assert_eq!(progress(start, start + Duration::from_secs(5), d), 1.0);
    }

    #[test]
    fn test_progress_before_start_is_zero() {
        let now = Instant::now();
        let start = now + Duration::from_millis(100);
        assert_eq!(progress(start, now, Duration::from_millis(10)), 0.0);
    }

    #[test]
    fn test_progress_zero_duration() {
        let start = Instant::now();
        assert_eq!(progress(start, start, Duration::ZERO), 1.0);
    }

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.25) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend_rgb() {
        let black = Color::Rgb(0, 0, 0);
        let white = Color::Rgb(255, 255, 255);
        assert_eq!(blend(black, white, 0.0), black);
        assert_eq!(blend(black, white, 1.0), white);
        assert_eq!(blend(black, white, 0.5), Color::Rgb(128, 128, 128));
    }

    #[test]
    fn test_blend_named_colors_switch() {
        assert_eq!(blend(Color::Black, Color::Red, 0.2), Color::Black);
        assert_eq!(blend(Color::Black, Color::Red, 0.8), Color::Red);
    }
}
