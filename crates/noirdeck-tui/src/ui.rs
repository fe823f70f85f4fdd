use std::time::Instant;

use ratatui::Frame;

use crate::app::App;
use crate::widgets::{BackdropWidget, ControlsView, ControlsWidget, CursorWidget, ScreenWidget};

/// Draw one frame: backdrop canvas, the displayed screen, controls, then the
/// pointer dot on top. Click regions are rebuilt from scratch.
pub fn draw(frame: &mut Frame, app: &mut App, now: Instant) {
    let area = frame.area();
    app.hits.clear();

    BackdropWidget::render(frame, area, app);

    let presentation = &app.presentation;
    // Mid fade-out nothing is active; keep drawing the outgoing screen
    let displayed = presentation
        .deck()
        .active_index()
        .unwrap_or_else(|| presentation.current_index());

    let text_bottom = match presentation.deck().screen(displayed) {
        Some(screen) => ScreenWidget::render(frame, area, screen, &app.theme, &app.fades, now),
        None => area.y + area.height / 2,
    };

    let view = ControlsView {
        presentation,
        theme: &app.theme,
        fades: &app.fades,
        hover: app.hover,
        epoch: app.epoch,
        now,
    };
    ControlsWidget::render(frame, area, &view, &mut app.hits, text_bottom);

    if let Some(cursor) = app.presentation.cursor() {
        CursorWidget::render(frame, area, cursor, app.cell_size_px(), &app.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noirdeck_core::audio::AudioControl;
    use noirdeck_core::cursor::PointerKind;
    use noirdeck_core::deck::Deck;
    use noirdeck_core::{AppConfig, ClickTarget, ControlKind, Presentation};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    #[test]
    fn test_draw_registers_controls_and_shows_revealed_text() {
        let t0 = Instant::now();
        let config = AppConfig::default();
        let presentation = Presentation::new(
            Deck::builtin().unwrap(),
            &config,
            config.ui.viewport_px(100, 30),
            PointerKind::Coarse,
            AudioControl::disabled(),
            t0,
        );
        let mut app = App::new(presentation, &config, crate::Theme::default(), t0);

        // Long enough for every reveal on the first screen
        let now = t0 + Duration::from_secs(6);
        app.on_frame(now);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app, now)).unwrap();

        let first = &app.presentation.deck().screens[0].fragments[0].text;
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        let probe: String = first.split_whitespace().next().unwrap_or_default().to_string();
        assert!(text.contains(&probe));

        let has_enter = (0..30u16)
            .flat_map(|row| (0..100u16).map(move |col| (col, row)))
            .any(|(col, row)| app.hits.target_at(col, row) == ClickTarget::Control(ControlKind::Enter));
        assert!(has_enter);
    }
}
