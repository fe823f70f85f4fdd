//! Paper: light newsprint

use ratatui::style::Color;
use crate::theme::Theme;

pub fn default() -> Theme {
    Theme {
        background: Color::Rgb(0xf5, 0xf1, 0xe8),
        foreground: Color::Rgb(0x1f, 0x1f, 0x1f),
        muted: Color::Rgb(0x6b, 0x65, 0x5b),
        accent: Color::Rgb(0xb9, 0x1c, 0x1c),
        highlight: Color::Rgb(0x00, 0x00, 0x00),
    }
}
