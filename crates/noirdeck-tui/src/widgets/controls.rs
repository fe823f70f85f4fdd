//! Clickable chrome: the enter / restart button, the audio toggle (visualizer
//! bars plus label), and screen progress dots.

use std::time::Instant;

use noirdeck_core::{ClickTarget, ControlKind, Presentation};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::anim::{blend, screen_opacity, FadeTimings};
use crate::hitmap::HitMap;
use crate::theme::Theme;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const BAR_COUNT: usize = 5;

/// Everything the controls need for one draw
pub struct ControlsView<'a> {
    pub presentation: &'a Presentation,
    pub theme: &'a Theme,
    pub fades: &'a FadeTimings,
    pub hover: ClickTarget,
    /// Animation clock origin
    pub epoch: Instant,
    pub now: Instant,
}

pub struct ControlsWidget;

impl ControlsWidget {
    /// Draw the controls and register their click regions. `text_bottom` is
    /// the first row below the screen's text.
    pub fn render(frame: &mut Frame, area: Rect, view: &ControlsView, hits: &mut HitMap, text_bottom: u16) {
        Self::render_audio(frame, area, view, hits);
        Self::render_button(frame, area, view, hits, text_bottom);
        Self::render_progress(frame, area, view);
    }

    fn render_button(frame: &mut Frame, area: Rect, view: &ControlsView, hits: &mut HitMap, text_bottom: u16) {
        let presentation = view.presentation;
        let Some(control) = presentation.visible_control() else {
            return;
        };
        let Some(screen) = presentation.deck().screen(presentation.current_index()) else {
            return;
        };

        let alpha = screen_opacity(screen, view.now, view.fades);
        if alpha <= 0.0 {
            return;
        }

        let deck = presentation.deck();
        let label = match control {
            ControlKind::Restart => deck.restart_label.as_str(),
            _ => deck.enter_label.as_str(),
        };
        let text = format!("[ {} ]", label);
        let width = (text.width() as u16).min(area.width);
        let y = text_bottom.saturating_add(1).min(area.bottom().saturating_sub(3));
        let rect = Rect::new(area.x + (area.width - width) / 2, y, width, 1);

        let target = ClickTarget::Control(control);
        let theme = view.theme;
        let style = if view.hover == target {
            Style::default()
                .fg(blend(theme.background, theme.highlight, alpha))
                .bg(blend(theme.background, theme.accent, alpha))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(blend(theme.background, theme.accent, alpha))
        };

        frame.render_widget(Paragraph::new(Line::styled(text, style)), rect);
        hits.register(rect, target);
    }

    fn render_audio(frame: &mut Frame, area: Rect, view: &ControlsView, hits: &mut HitMap) {
        let theme = view.theme;
        let paused = view.presentation.audio().indicator_paused();
        let secs = view.now.saturating_duration_since(view.epoch).as_secs_f64();

        let bars: String = if paused {
            std::iter::repeat(BARS[0]).take(BAR_COUNT).collect()
        } else {
            (0..BAR_COUNT).map(|i| BARS[bar_level(i, secs)]).collect()
        };
        let label = if paused { " sound off" } else { " sound on" };

        let bars_width = BAR_COUNT as u16;
        let label_width = label.width() as u16;
        let total = bars_width + label_width;
        if area.width < total + 2 || area.height < 2 {
            return;
        }

        let x = area.right() - total - 2;
        let y = area.y + 1;
        let bars_rect = Rect::new(x, y, bars_width, 1);
        let label_rect = Rect::new(x + bars_width, y, label_width, 1);

        let toggle = ClickTarget::Control(ControlKind::AudioToggle);
        let hovered = view.hover == toggle;
        let label_color = if hovered { theme.highlight } else { theme.muted };
        let bar_color = match (hovered, paused) {
            (true, _) => theme.highlight,
            (false, true) => theme.muted,
            (false, false) => theme.accent,
        };

        frame.render_widget(Paragraph::new(Span::styled(bars, Style::default().fg(bar_color))), bars_rect);
        frame.render_widget(Paragraph::new(Span::styled(label, Style::default().fg(label_color))), label_rect);

        // Bars and label form one toggle
        hits.register(Rect::new(x, y, total, 1), toggle);
    }

    fn render_progress(frame: &mut Frame, area: Rect, view: &ControlsView) {
        let presentation = view.presentation;
        let total = presentation.deck().len();
        let width = (total * 2).saturating_sub(1) as u16;
        if total < 2 || area.height < 3 || width > area.width {
            return;
        }

        let current = presentation.current_index();
        let theme = view.theme;
        let mut spans = Vec::with_capacity(total * 2);
        for i in 0..total {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let (symbol, color) = if i == current {
                ("●", theme.accent)
            } else {
                ("·", theme.muted)
            };
            spans.push(Span::styled(symbol, Style::default().fg(color)));
        }

        let rect = Rect::new(area.x + (area.width - width) / 2, area.bottom() - 2, width, 1);
        frame.render_widget(Paragraph::new(Line::from(spans)), rect);
    }
}

/// Visualizer bar height for bar `i` at `secs`
fn bar_level(i: usize, secs: f64) -> usize {
    let phase = i as f64 * 1.7;
    let speed = 3.0 + i as f64 * 0.9;
    let level = 0.5 + 0.5 * (secs * speed + phase).sin();
    ((level * (BARS.len() - 1) as f64).round() as usize).min(BARS.len() - 1)
}
