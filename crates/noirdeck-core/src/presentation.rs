//! The presentation context: one object owning every piece of player state,
//! handed to the input binder and the renderer instead of a global.

use std::time::Instant;

use tracing::{debug, info};

use crate::audio::{AudioControl, AudioEvent};
use crate::config::{AppConfig, TimingConfig};
use crate::cursor::{CursorFollower, PointerKind};
use crate::deck::Deck;
use crate::frame::{run_frame, FrameTask};
use crate::particles::ParticleField;
use crate::reveal::Choreographer;
use crate::sequencer::Sequencer;

/// Clickable controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Start the experience (first screen)
    Enter,
    /// Back to the first screen (last screen)
    Restart,
    AudioToggle,
}

/// What a pointer event landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Control(ControlKind),
    /// Anywhere else on the screen
    Screen,
}

impl ClickTarget {
    /// Hovering an interactive control switches the cursor into its interacting look
    pub fn is_interactive(&self) -> bool {
        matches!(self, ClickTarget::Control(_))
    }
}

pub struct Presentation {
    deck: Deck,
    sequencer: Sequencer,
    choreographer: Choreographer,
    particles: Option<ParticleField>,
    cursor: Option<CursorFollower>,
    audio: AudioControl,
    timing: TimingConfig,
}

impl Presentation {
    /// Activate the first screen and schedule its reveal after the intro delay
    pub fn new(
        mut deck: Deck,
        config: &AppConfig,
        viewport: (f64, f64),
        pointer: PointerKind,
        audio: AudioControl,
        now: Instant,
    ) -> Self {
        let (width, height) = viewport;
        let timing = config.timing.clone();
        let sequencer = Sequencer::new(deck.len(), timing.fade_out(), timing.settle());
        let choreographer = Choreographer::new(timing.reveal_timings());

        let particles = config.particles.enabled.then(|| {
            let count = config.particles.count_for_width(width);
            debug!("Particle field: {} motes for {}px", count, width);
            ParticleField::new(count, width, height)
        });

        let cursor = match pointer {
            PointerKind::Fine => Some(CursorFollower::new(width, height, config.cursor.smoothing)),
            PointerKind::Coarse => None,
        };

        if let Some(first) = deck.screen_mut(0) {
            first.set_active(true, now);
            choreographer.choreograph_after(first, 0, now, timing.intro_delay());
        }

        info!("Presentation '{}' with {} screens", deck.title, deck.len());

        Self {
            deck,
            sequencer,
            choreographer,
            particles,
            cursor,
            audio,
            timing,
        }
    }

    /// Replace the particle field (e.g. with a seeded one)
    pub fn set_particles(&mut self, field: Option<ParticleField>) {
        self.particles = field;
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn particles(&self) -> Option<&ParticleField> {
        self.particles.as_ref()
    }

    pub fn cursor(&self) -> Option<&CursorFollower> {
        self.cursor.as_ref()
    }

    pub fn audio(&self) -> &AudioControl {
        &self.audio
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.sequencer.index()
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.sequencer.is_transitioning()
    }

    /// The control shown on the current screen, if any
    pub fn visible_control(&self) -> Option<ControlKind> {
        if self.sequencer.is_last() {
            Some(ControlKind::Restart)
        } else if self.sequencer.is_first() {
            Some(ControlKind::Enter)
        } else {
            None
        }
    }

    /// Start a transition to the next screen; dropped while one is running
    pub fn advance(&mut self, now: Instant) -> bool {
        let from = self.sequencer.index();
        if !self.sequencer.advance(now) {
            return false;
        }
        if let Some(screen) = self.deck.screen_mut(from) {
            screen.set_active(false, now);
        }
        true
    }

    /// Enter control: best-effort audio start, then advance
    pub fn start(&mut self, now: Instant) -> bool {
        self.audio.start();
        self.advance(now)
    }

    /// Back to the first screen with its reveal replayed immediately
    pub fn restart(&mut self, now: Instant) {
        for screen in &mut self.deck.screens {
            screen.set_active(false, now);
        }
        self.sequencer.restart();

        if let Some(first) = self.deck.screen_mut(0) {
            first.set_active(true, now);
            self.choreographer.choreograph(first, 0, now);
        }

        self.audio.restart();
    }

    pub fn jump_to_first_and_play(&mut self, now: Instant) {
        self.restart(now);
    }

    pub fn toggle_audio(&mut self) {
        self.audio.toggle();
    }

    pub fn press(&mut self, control: ControlKind, now: Instant) {
        debug!("Control pressed: {:?}", control);
        match control {
            ControlKind::Enter => {
                self.start(now);
            }
            ControlKind::Restart => self.restart(now),
            ControlKind::AudioToggle => self.toggle_audio(),
        }
    }

    /// Generic click on the screen; only middle screens advance this way
    pub fn screen_click(&mut self, target: ClickTarget, now: Instant) -> bool {
        if target != ClickTarget::Screen {
            return false;
        }
        if !self.sequencer.is_middle() {
            return false;
        }
        self.advance(now)
    }

    /// Keyboard advance; only middle screens advance this way
    pub fn key_advance(&mut self, now: Instant) -> bool {
        if !self.sequencer.is_middle() {
            return false;
        }
        self.advance(now)
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64, target: ClickTarget) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.pointer_moved(x, y, target.is_interactive());
        }
    }

    /// Viewport changed size (logical pixels)
    pub fn resize(&mut self, width: f64, height: f64) {
        if let Some(particles) = self.particles.as_mut() {
            particles.resize(width, height);
        }
    }

    pub fn handle_audio_event(&mut self, event: AudioEvent) {
        self.audio.handle_event(event);
    }

    /// One animation frame: timed transition edges, due reveals, then the
    /// particle and cursor tasks
    pub fn frame(&mut self, now: Instant) {
        if let Some(arrival) = self.sequencer.tick(now) {
            if let Some(screen) = self.deck.screen_mut(arrival.index) {
                screen.set_active(true, arrival.at);
                self.choreographer.choreograph(screen, arrival.index, arrival.at);
            }
        }

        for screen in &mut self.deck.screens {
            self.choreographer.tick(screen, now);
        }

        let mut tasks: Vec<&mut dyn FrameTask> = Vec::with_capacity(2);
        if let Some(particles) = self.particles.as_mut() {
            tasks.push(particles);
        }
        if let Some(cursor) = self.cursor.as_mut() {
            tasks.push(cursor);
        }
        run_frame(&mut tasks);
    }
}
