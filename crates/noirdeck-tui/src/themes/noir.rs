//! Noir: near-black with a blood-red accent

use ratatui::style::Color;
use crate::theme::Theme;

pub fn default() -> Theme {
    Theme {
        background: Color::Rgb(0x0a, 0x0a, 0x0a),
        foreground: Color::Rgb(0xe5, 0xe5, 0xe5),
        muted: Color::Rgb(0x73, 0x73, 0x73),
        accent: Color::Rgb(0xdc, 0x26, 0x26), // red-600
        highlight: Color::Rgb(0xff, 0xff, 0xff),
    }
}
