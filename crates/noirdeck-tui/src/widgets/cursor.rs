use noirdeck_core::cursor::CursorFollower;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::theme::Theme;

/// Cell under a logical-pixel point, clamped to `area`
pub fn px_to_cell(area: Rect, cell_px: (f64, f64), x: f64, y: f64) -> (u16, u16) {
    let (cw, ch) = cell_px;
    let col = (x / cw).floor().max(0.0) as u16;
    let row = (y / ch).floor().max(0.0) as u16;
    (
        area.x + col.min(area.width.saturating_sub(1)),
        area.y + row.min(area.height.saturating_sub(1)),
    )
}

pub struct CursorWidget;

impl CursorWidget {
    /// The instant-tracking dot; the trailing ring lives on the backdrop canvas
    pub fn render(frame: &mut Frame, area: Rect, cursor: &CursorFollower, cell_px: (f64, f64), theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let pointer = cursor.pointer();
        let (col, row) = px_to_cell(area, cell_px, pointer.x, pointer.y);
        let style = if cursor.is_interacting() {
            Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.accent)
        };
        frame.render_widget(Paragraph::new(Span::styled("•", style)), Rect::new(col, row, 1, 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_to_cell() {
        let area = Rect::new(0, 0, 10, 5);
        assert_eq!(px_to_cell(area, (8.0, 16.0), 12.0, 8.0), (1, 0));
        assert_eq!(px_to_cell(area, (8.0, 16.0), -5.0, -5.0), (0, 0));
        assert_eq!(px_to_cell(area, (8.0, 16.0), 1000.0, 1000.0), (9, 4));
    }
}
