use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

use noirdeck_core::{
    audio::{AudioControl, AudioEvent, ProcessPlayer},
    config::expand_tilde,
    cursor::PointerKind,
    deck::Deck,
    AppConfig, Presentation,
};
use noirdeck_tui::{
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_mouse_event},
    load_theme, ui, App,
};

use super::load_deck;
use crate::RunArgs;

pub async fn run(config: AppConfig, args: RunArgs) -> Result<()> {
    let deck = load_deck(&config, args.deck.as_deref())?;

    let setting = args.pointer.map(Into::into).unwrap_or(config.cursor.pointer);
    let pointer = PointerKind::detect(setting);

    // Channel for asynchronous audio player reports
    let (audio_tx, mut audio_rx) = mpsc::unbounded_channel::<AudioEvent>();
    let audio = build_audio(&config, &deck, args.no_audio, audio_tx);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle(deck.title.as_str()))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let now = Instant::now();
    let viewport = config.ui.viewport_px(size.width, size.height);
    info!(
        "Playing '{}' on {}x{} cells, pointer {:?}",
        deck.title, size.width, size.height, pointer
    );

    let presentation = Presentation::new(deck, &config, viewport, pointer, audio, now);
    let theme = load_theme(&config.ui.theme);
    let mut app = App::new(presentation, &config, theme, now);

    let result = run_loop(&mut terminal, &mut app, &mut audio_rx, config.ui.frame_duration());

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    audio_rx: &mut mpsc::UnboundedReceiver<AudioEvent>,
    frame_duration: Duration,
) -> Result<()> {
    let events = EventHandler::new();
    let mut next_frame = Instant::now();

    loop {
        // Process audio player reports (non-blocking)
        while let Ok(event) = audio_rx.try_recv() {
            app.presentation.handle_audio_event(event);
        }

        let now = Instant::now();
        if now >= next_frame {
            app.on_frame(now);
            terminal.draw(|frame| ui::draw(frame, app, now))?;
            // Skip missed frames rather than replaying them
            next_frame = (next_frame + frame_duration).max(now);
        }

        match events.next_until(next_frame)? {
            Some(AppEvent::Key(key)) => {
                let action = handle_key_event(key, &app.keymap);
                app.apply(action, Instant::now());
            }
            Some(AppEvent::Mouse(mouse)) => {
                app.apply(handle_mouse_event(mouse), Instant::now());
            }
            Some(AppEvent::Resize(cols, rows)) => app.resize(cols, rows),
            Some(AppEvent::Frame) | None => {}
        }

        if app.should_quit {
            info!("Quit requested");
            break;
        }
    }

    Ok(())
}

/// The audio backend, or a disabled control when there is nothing to play
fn build_audio(
    config: &AppConfig,
    deck: &Deck,
    no_audio: bool,
    events: mpsc::UnboundedSender<AudioEvent>,
) -> AudioControl {
    if no_audio || !config.audio.enabled {
        info!("Audio disabled");
        return AudioControl::disabled();
    }

    let file: Option<PathBuf> = config
        .audio
        .file
        .as_deref()
        .map(expand_tilde)
        .or_else(|| deck.audio.clone());

    match file {
        Some(file) if file.exists() => {
            info!("Audio track {}", file.display());
            AudioControl::new(Box::new(ProcessPlayer::new(&config.audio, &file, events)))
        }
        Some(file) => {
            warn!("Audio file {} not found, playing silently", file.display());
            AudioControl::disabled()
        }
        None => {
            info!("No audio track configured");
            AudioControl::disabled()
        }
    }
}
