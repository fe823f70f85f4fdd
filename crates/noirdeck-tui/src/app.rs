use std::time::Instant;

use noirdeck_core::config::UiConfig;
use noirdeck_core::{AppConfig, ClickTarget, Presentation};
use ratatui::style::Color;
use tracing::debug;

use crate::anim::FadeTimings;
use crate::hitmap::HitMap;
use crate::input::Action;
use crate::keymap::Keymap;
use crate::theme::Theme;
use crate::themes::parse_hex_color;

/// Terminal-side state around a running presentation
pub struct App {
    pub presentation: Presentation,
    pub theme: Theme,
    pub keymap: Keymap,
    /// Regions registered by the last draw
    pub hits: HitMap,
    /// What the pointer is over
    pub hover: ClickTarget,
    pub fades: FadeTimings,
    pub particle_color: Color,
    pub should_quit: bool,
    /// Origin of free-running animations (visualizer bars)
    pub epoch: Instant,
    ui: UiConfig,
}

impl App {
    pub fn new(presentation: Presentation, config: &AppConfig, theme: Theme, now: Instant) -> Self {
        let particle_color = parse_hex_color(&config.particles.color).unwrap_or(theme.accent);
        Self {
            presentation,
            keymap: Keymap::from_config(&config.keymap),
            hits: HitMap::new(),
            hover: ClickTarget::Screen,
            fades: FadeTimings::from_config(&config.timing),
            particle_color,
            should_quit: false,
            epoch: now,
            ui: config.ui.clone(),
            theme,
        }
    }

    /// Centre of a terminal cell in logical pixels
    pub fn cell_to_px(&self, col: u16, row: u16) -> (f64, f64) {
        let (cw, ch) = self.cell_size_px();
        ((col as f64 + 0.5) * cw, (row as f64 + 0.5) * ch)
    }

    /// Logical pixels per cell
    pub fn cell_size_px(&self) -> (f64, f64) {
        self.ui.viewport_px(1, 1)
    }

    /// Terminal resized (in cells)
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (width, height) = self.ui.viewport_px(cols, rows);
        debug!("Viewport {}x{} cells -> {}x{}px", cols, rows, width, height);
        self.presentation.resize(width, height);
    }

    /// One animation frame
    pub fn on_frame(&mut self, now: Instant) {
        self.presentation.frame(now);
    }

    pub fn apply(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Advance => {
                self.presentation.key_advance(now);
            }
            Action::Enter => {
                if let Some(control) = self.presentation.visible_control() {
                    self.presentation.press(control, now);
                }
            }
            Action::Restart => self.presentation.jump_to_first_and_play(now),
            Action::ToggleAudio => self.presentation.toggle_audio(),
            Action::Click { col, row } => match self.hits.target_at(col, row) {
                ClickTarget::Control(control) => self.presentation.press(control, now),
                target => {
                    self.presentation.screen_click(target, now);
                }
            },
            Action::PointerMove { col, row } => {
                let target = self.hits.target_at(col, row);
                self.hover = target;
                let (x, y) = self.cell_to_px(col, row);
                self.presentation.pointer_moved(x, y, target);
            }
            Action::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui;
    use noirdeck_core::audio::{AudioControl, AudioSink};
    use noirdeck_core::cursor::PointerKind;
    use noirdeck_core::deck::Deck;
    use noirdeck_core::ControlKind;
    use ratatui::layout::Rect;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    struct FakeSink {
        paused: bool,
    }

    impl AudioSink for FakeSink {
        fn play(&mut self) -> noirdeck_core::Result<()> {
            self.paused = false;
            Ok(())
        }
        fn pause(&mut self) {
            self.paused = true;
        }
        fn rewind(&mut self) {
            self.paused = true;
        }
        fn is_paused(&self) -> bool {
            self.paused
        }
    }

    fn app_with_audio(now: Instant, audio: AudioControl) -> App {
        let config = AppConfig::default();
        let deck = Deck::builtin().unwrap();
        let presentation = Presentation::new(
            deck,
            &config,
            config.ui.viewport_px(100, 40),
            PointerKind::Fine,
            audio,
            now,
        );
        App::new(presentation, &config, Theme::default(), now)
    }

    fn app(now: Instant) -> App {
        app_with_audio(now, AudioControl::disabled())
    }

    fn settle(app: &mut App, from: Instant) -> Instant {
        let done = from + Duration::from_millis(1800);
        app.on_frame(from + Duration::from_millis(800));
        app.on_frame(done);
        done
    }

    #[test]
    fn test_first_screen_needs_enter() {
        let t0 = Instant::now();
        let mut app = app(t0);

        app.apply(Action::Click { col: 1, row: 1 }, t0);
        app.apply(Action::Advance, t0);
        assert!(!app.presentation.is_transitioning());

        app.apply(Action::Enter, t0);
        assert!(app.presentation.is_transitioning());
        settle(&mut app, t0);
        assert_eq!(app.presentation.current_index(), 1);
    }

    #[test]
    fn test_click_on_control_region_presses_it() {
        let t0 = Instant::now();
        let mut app = app(t0);
        app.hits.register(Rect::new(40, 30, 10, 1), ClickTarget::Control(ControlKind::Enter));
        app.apply(Action::Click { col: 45, row: 30 }, t0);
        assert!(app.presentation.is_transitioning());
    }

    #[test]
    fn test_visualizer_bars_toggle_audio_without_advancing() {
        let t0 = Instant::now();
        let audio = AudioControl::new(Box::new(FakeSink { paused: true }));
        let mut app = app_with_audio(t0, audio);
        app.apply(Action::Enter, t0);
        let t = settle(&mut app, t0);
        assert!(!app.presentation.audio().indicator_paused());

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| ui::draw(frame, &mut app, t)).unwrap();

        // Leftmost cell of the toggle region is the first visualizer bar
        let toggle = ClickTarget::Control(ControlKind::AudioToggle);
        let col = (0..100u16).find(|&col| app.hits.target_at(col, 1) == toggle).unwrap();
        let bar = terminal.backend().buffer()[(col, 1)].symbol().to_string();
        assert!("▁▂▃▄▅▆▇█".contains(bar.as_str()));

        app.apply(Action::PointerMove { col, row: 1 }, t);
        assert!(app.presentation.cursor().unwrap().is_interacting());

        app.apply(Action::Click { col, row: 1 }, t);
        assert!(app.presentation.audio().indicator_paused());
        assert!(!app.presentation.is_transitioning());

        app.apply(Action::Click { col, row: 1 }, t);
        assert!(!app.presentation.audio().indicator_paused());

        // Elsewhere on a middle screen a click still advances
        app.apply(Action::Click { col: 50, row: 20 }, t);
        assert!(app.presentation.is_transitioning());
    }

    #[test]
    fn test_pointer_move_tracks_hover_and_cursor() {
        let t0 = Instant::now();
        let mut app = app(t0);
        app.hits.register(Rect::new(0, 0, 3, 1), ClickTarget::Control(ControlKind::AudioToggle));

        app.apply(Action::PointerMove { col: 1, row: 0 }, t0);
        assert_eq!(app.hover, ClickTarget::Control(ControlKind::AudioToggle));
        let cursor = app.presentation.cursor().unwrap();
        assert!(cursor.is_interacting());
        assert_eq!(cursor.pointer().x, 12.0);
        assert_eq!(cursor.pointer().y, 8.0);

        app.apply(Action::PointerMove { col: 10, row: 10 }, t0);
        assert_eq!(app.hover, ClickTarget::Screen);
        assert!(!app.presentation.cursor().unwrap().is_interacting());
    }

    #[test]
    fn test_restart_key_returns_to_first() {
        let t0 = Instant::now();
        let mut app = app(t0);
        app.apply(Action::Enter, t0);
        let t = settle(&mut app, t0);
        app.apply(Action::Restart, t);
        assert_eq!(app.presentation.current_index(), 0);
        assert_eq!(app.presentation.deck().active_index(), Some(0));
    }

    #[test]
    fn test_quit() {
        let t0 = Instant::now();
        let mut app = app(t0);
        app.apply(Action::Quit, t0);
        assert!(app.should_quit);
    }
}
