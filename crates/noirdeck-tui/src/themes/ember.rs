//! Ember: warm charcoal with amber light

use ratatui::style::Color;
use crate::theme::Theme;

pub fn default() -> Theme {
    Theme {
        background: Color::Rgb(0x1c, 0x19, 0x17),
        foreground: Color::Rgb(0xf5, 0xe6, 0xd3),
        muted: Color::Rgb(0x8a, 0x7a, 0x6a),
        accent: Color::Rgb(0xf5, 0x9e, 0x0b),
        highlight: Color::Rgb(0xfd, 0xe6, 0x8a),
    }
}
