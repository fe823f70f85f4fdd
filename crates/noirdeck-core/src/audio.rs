//! Background audio: a sink abstraction, an external-player backend and the
//! control that keeps the on-screen "paused" indicator in sync.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::AudioConfig;
use crate::{Error, Result};

/// Something that can play a single looping track
pub trait AudioSink: Send {
    /// Start (or resume) playback. An error means playback was refused.
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    /// Seek back to the start; leaves the sink paused
    fn rewind(&mut self);
    fn is_paused(&self) -> bool;
    /// Playback ended on its own (process exit, device loss)
    fn stopped(&mut self, _generation: u64) {}
}

/// Reported asynchronously by a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// The player went away without being asked to
    Stopped {
        generation: u64,
        /// Set when the exit looks like a refused start
        error: Option<String>,
    },
}

/// Plays a file by running an external player process
pub struct ProcessPlayer {
    program: String,
    args: Vec<String>,
    file: PathBuf,
    grace: Duration,
    /// Playback position accumulated over previous runs
    position: Duration,
    /// Set while a player process is running
    started_at: Option<Instant>,
    stop_tx: Option<oneshot::Sender<()>>,
    generation: u64,
    events: mpsc::UnboundedSender<AudioEvent>,
}

impl ProcessPlayer {
    pub fn new(config: &AudioConfig, file: &Path, events: mpsc::UnboundedSender<AudioEvent>) -> Self {
        Self {
            program: config.player.clone(),
            args: config.player_args.clone(),
            file: file.to_path_buf(),
            grace: Duration::from_millis(config.startup_grace_ms),
            position: Duration::ZERO,
            started_at: None,
            stop_tx: None,
            generation: 0,
            events,
        }
    }

    /// Current playback position
    pub fn position(&self) -> Duration {
        self.position + self.started_at.map(|t| t.elapsed()).unwrap_or_default()
    }

    fn stop_process(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(started) = self.started_at.take() {
            self.position += started.elapsed();
        }
    }
}

/// Substitute `{file}` and `{start}` in player arguments
pub fn render_args(args: &[String], file: &Path, start: Duration) -> Vec<String> {
    let file = file.to_string_lossy();
    let start = format!("{:.3}", start.as_secs_f64());
    args.iter()
        .map(|arg| arg.replace("{file}", &file).replace("{start}", &start))
        .collect()
}

impl AudioSink for ProcessPlayer {
    fn play(&mut self) -> Result<()> {
        if self.started_at.is_some() {
            return Ok(());
        }

        let args = render_args(&self.args, &self.file, self.position);
        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Audio(format!("failed to start '{}': {}", self.program, e)))?;

        self.generation += 1;
        let (stop_tx, stop_rx) = oneshot::channel();
        tokio::spawn(watch_player(
            child,
            stop_rx,
            self.events.clone(),
            self.generation,
            self.grace,
        ));

        self.stop_tx = Some(stop_tx);
        self.started_at = Some(Instant::now());
        info!("Audio playing from {:.1}s", self.position.as_secs_f64());
        Ok(())
    }

    fn pause(&mut self) {
        self.stop_process();
        debug!("Audio paused at {:.1}s", self.position.as_secs_f64());
    }

    fn rewind(&mut self) {
        self.stop_process();
        self.position = Duration::ZERO;
    }

    fn is_paused(&self) -> bool {
        self.started_at.is_none()
    }

    fn stopped(&mut self, generation: u64) {
        if generation == self.generation && self.started_at.is_some() {
            self.stop_tx = None;
            if let Some(started) = self.started_at.take() {
                self.position += started.elapsed();
            }
        }
    }
}

async fn watch_player(
    mut child: Child,
    stop_rx: oneshot::Receiver<()>,
    events: mpsc::UnboundedSender<AudioEvent>,
    generation: u64,
    grace: Duration,
) {
    let started = Instant::now();

    tokio::select! {
        status = child.wait() => {
            let error = match status {
                Ok(status) if status.success() => None,
                Ok(status) if started.elapsed() <= grace => {
                    Some(format!("player exited immediately ({})", status))
                }
                Ok(status) => {
                    warn!("Audio player exited ({})", status);
                    None
                }
                Err(e) => Some(format!("waiting on player failed: {}", e)),
            };
            let _ = events.send(AudioEvent::Stopped { generation, error });
        }
        _ = stop_rx => {
            if let Err(e) = child.kill().await {
                debug!("Audio player already gone: {}", e);
            }
        }
    }
}

/// Owns the optional sink and mirrors its state in a "paused" indicator.
/// Playback failures are logged and shown only through the indicator.
pub struct AudioControl {
    sink: Option<Box<dyn AudioSink>>,
    paused_indicator: bool,
}

impl AudioControl {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink: Some(sink),
            paused_indicator: true,
        }
    }

    /// No audio configured; every action is skipped
    pub fn disabled() -> Self {
        Self {
            sink: None,
            paused_indicator: true,
        }
    }

    pub fn is_available(&self) -> bool {
        self.sink.is_some()
    }

    /// What the paused indicator currently shows
    pub fn indicator_paused(&self) -> bool {
        self.paused_indicator
    }

    /// Best-effort start; a refusal only flips the indicator
    pub fn start(&mut self) {
        self.try_play();
    }

    pub fn toggle(&mut self) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if sink.is_paused() {
            self.try_play();
        } else {
            sink.pause();
            self.sync();
        }
    }

    /// Rewind to the start and play
    pub fn restart(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.rewind();
        }
        self.try_play();
    }

    pub fn handle_event(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::Stopped { generation, error } => {
                if let Some(err) = error {
                    warn!("Audio playback prevented: {}", err);
                }
                if let Some(sink) = self.sink.as_mut() {
                    sink.stopped(generation);
                }
                self.sync();
            }
        }
    }

    fn try_play(&mut self) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Err(e) = sink.play() {
            warn!("Audio playback prevented: {}", e);
        }
        self.sync();
    }

    fn sync(&mut self) {
        self.paused_indicator = self.sink.as_ref().map(|s| s.is_paused()).unwrap_or(true);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Shared record of what a fake sink was asked to do
    #[derive(Debug, Default)]
    pub(crate) struct FakeState {
        pub refuse: bool,
        pub playing: bool,
        pub plays: u32,
        pub rewinds: u32,
    }

    pub(crate) struct FakeSink(pub Arc<Mutex<FakeState>>);

    impl AudioSink for FakeSink {
        fn play(&mut self) -> Result<()> {
            let mut state = self.0.lock().unwrap();
            state.plays += 1;
            if state.refuse {
                return Err(Error::Audio("autoplay blocked".to_string()));
            }
            state.playing = true;
            Ok(())
        }

        fn pause(&mut self) {
            self.0.lock().unwrap().playing = false;
        }

        fn rewind(&mut self) {
            let mut state = self.0.lock().unwrap();
            state.rewinds += 1;
            state.playing = false;
        }

        fn is_paused(&self) -> bool {
            !self.0.lock().unwrap().playing
        }

        fn stopped(&mut self, _generation: u64) {
            self.0.lock().unwrap().playing = false;
        }
    }

    pub(crate) fn fake(refuse: bool) -> (AudioControl, Arc<Mutex<FakeState>>) {
        let state = Arc::new(Mutex::new(FakeState {
            refuse,
            ..Default::default()
        }));
        (AudioControl::new(Box::new(FakeSink(state.clone()))), state)
    }

    #[test]
    fn test_start_success_clears_indicator() {
        let (mut audio, state) = fake(false);
        assert!(audio.indicator_paused());
        audio.start();
        assert!(!audio.indicator_paused());
        assert!(state.lock().unwrap().playing);
    }

    #[test]
    fn test_refused_start_shows_paused_and_is_not_retried() {
        let (mut audio, state) = fake(true);
        audio.start();
        assert!(audio.indicator_paused());
        assert_eq!(state.lock().unwrap().plays, 1);
    }

    #[test]
    fn test_toggle_round_trip() {
        let (mut audio, _state) = fake(false);
        audio.toggle();
        assert!(!audio.indicator_paused());
        audio.toggle();
        assert!(audio.indicator_paused());
    }

    #[test]
    fn test_toggle_refused_play_keeps_paused() {
        let (mut audio, _state) = fake(true);
        audio.toggle();
        assert!(audio.indicator_paused());
    }

    #[test]
    fn test_restart_rewinds_then_plays() {
        let (mut audio, state) = fake(false);
        audio.start();
        audio.restart();
        let state = state.lock().unwrap();
        assert_eq!(state.rewinds, 1);
        assert_eq!(state.plays, 2);
        assert!(!audio.indicator_paused());
    }

    #[test]
    fn test_stopped_event_flips_indicator() {
        let (mut audio, _state) = fake(false);
        audio.start();
        audio.handle_event(AudioEvent::Stopped {
            generation: 1,
            error: Some("no device".to_string()),
        });
        assert!(audio.indicator_paused());
    }

    #[test]
    fn test_disabled_control_is_inert() {
        let mut audio = AudioControl::disabled();
        audio.start();
        audio.toggle();
        audio.restart();
        assert!(!audio.is_available());
        assert!(audio.indicator_paused());
    }

    #[test]
    fn test_render_args() {
        let args = vec!["--start={start}".to_string(), "{file}".to_string()];
        let rendered = render_args(&args, Path::new("/tmp/a b.ogg"), Duration::from_millis(1500));
        assert_eq!(rendered, vec!["--start=1.500".to_string(), "/tmp/a b.ogg".to_string()]);
    }

    fn player_config(player: &str, args: &[&str]) -> AudioConfig {
        AudioConfig {
            player: player.to_string(),
            player_args: args.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_player_is_refused() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let config = player_config("noirdeck-no-such-player", &["{file}"]);
        let mut player = ProcessPlayer::new(&config, Path::new("x.ogg"), tx);
        assert!(matches!(player.play(), Err(Error::Audio(_))));
        assert!(player.is_paused());
    }

    #[tokio::test]
    async fn test_early_exit_reports_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let config = player_config("sh", &["-c", "exit 3"]);
        let mut player = ProcessPlayer::new(&config, Path::new("x.ogg"), tx);
        player.play().unwrap();
        assert!(!player.is_paused());

        let event = rx.recv().await.unwrap();
        let AudioEvent::Stopped { generation, error } = event;
        assert_eq!(generation, 1);
        assert!(error.is_some());

        player.stopped(generation);
        assert!(player.is_paused());
    }

    #[tokio::test]
    async fn test_pause_stops_without_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let config = player_config("sleep", &["5"]);
        let mut player = ProcessPlayer::new(&config, Path::new("x.ogg"), tx);
        player.play().unwrap();
        player.pause();
        assert!(player.is_paused());

        drop(player);
        // Watcher took the stop branch, so the channel closes with nothing sent
        assert_eq!(rx.recv().await, None);
    }
}
