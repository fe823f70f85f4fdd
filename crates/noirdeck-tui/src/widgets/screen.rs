use std::f64::consts::TAU;
use std::time::Instant;

use noirdeck_core::deck::{Fragment, FragmentStyle, Screen};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::anim::{blend, fragment_opacity, screen_opacity, FadeTimings};
use crate::theme::Theme;

/// Widest text column, in cells
const MAX_TEXT_WIDTH: u16 = 64;
/// Seconds per pulse of the tap hint
const HINT_PULSE_SECS: f64 = 2.0;

pub struct ScreenWidget;

impl ScreenWidget {
    /// Draw a screen's fragments centred in `area`. Hidden fragments keep
    /// their rows so revealing one never shifts the others. Returns the row
    /// just below the text block.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        screen: &Screen,
        theme: &Theme,
        fades: &FadeTimings,
        now: Instant,
    ) -> u16 {
        let width = area.width.saturating_sub(4).min(MAX_TEXT_WIDTH).max(1) as usize;
        let blocks = layout_fragments(&screen.fragments, width);
        let total: u16 = blocks.iter().map(|b| b.gap + b.lines.len() as u16).sum();

        let mut y = area.y + area.height.saturating_sub(total) / 2;
        let screen_alpha = screen_opacity(screen, now, fades);

        for (fragment, block) in screen.fragments.iter().zip(&blocks) {
            y = y.saturating_add(block.gap);
            let alpha = screen_alpha * fragment_opacity(fragment, now, fades) * pulse(fragment, now);

            for line in &block.lines {
                if y >= area.bottom() {
                    break;
                }
                if alpha > 0.0 {
                    let style = fragment_style(fragment.style, theme, alpha);
                    render_centered(frame, area, y, line, style);
                }
                y += 1;
            }
        }

        y.min(area.bottom())
    }
}

/// A fragment's wrapped lines and the blank rows above it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub gap: u16,
    pub lines: Vec<String>,
}

pub fn layout_fragments(fragments: &[Fragment], width: usize) -> Vec<TextBlock> {
    fragments
        .iter()
        .enumerate()
        .map(|(idx, fragment)| {
            let text = match fragment.style {
                FragmentStyle::Huge => letter_spaced(&fragment.text),
                _ => fragment.text.clone(),
            };
            let gap = match (idx, fragment.style) {
                (0, _) => 0,
                (_, FragmentStyle::Hint) | (_, FragmentStyle::Huge) => 2,
                _ => 1,
            };
            TextBlock {
                gap,
                lines: wrap_text(&text, width),
            }
        })
        .collect()
}

/// Word-wrap by display width; words wider than `width` get a line of their own
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_whitespace() {
            let w = word.width();
            if line_width > 0 && line_width + 1 + w > width {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if line_width > 0 {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += w;
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn letter_spaced(text: &str) -> String {
    text.chars()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tap hints breathe once revealed
fn pulse(fragment: &Fragment, now: Instant) -> f64 {
    match (fragment.style, fragment.revealed_at) {
        (FragmentStyle::Hint, Some(at)) => {
            let t = now.saturating_duration_since(at).as_secs_f64() / HINT_PULSE_SECS;
            0.7 + 0.3 * (t * TAU).cos()
        }
        _ => 1.0,
    }
}

fn fragment_style(style: FragmentStyle, theme: &Theme, alpha: f64) -> Style {
    let (color, modifier): (Color, Modifier) = match style {
        FragmentStyle::Title => (theme.foreground, Modifier::BOLD),
        FragmentStyle::Text => (theme.foreground, Modifier::empty()),
        FragmentStyle::Manifesto => (theme.foreground, Modifier::ITALIC),
        FragmentStyle::Huge => (theme.accent, Modifier::BOLD),
        FragmentStyle::FinalSub => (theme.muted, Modifier::ITALIC),
        FragmentStyle::Hint => (theme.muted, Modifier::empty()),
    };
    Style::default()
        .fg(blend(theme.background, color, alpha))
        .add_modifier(modifier)
}

fn render_centered(frame: &mut Frame, area: Rect, y: u16, line: &str, style: Style) {
    let w = (line.width() as u16).min(area.width);
    if w == 0 {
        return;
    }
    let x = area.x + (area.width - w) / 2;
    frame.render_widget(
        Paragraph::new(Line::styled(line.to_string(), style)),
        Rect::new(x, y, w, 1),
    );
}
