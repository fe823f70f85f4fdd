//! Deck model: the ordered screens of a presentation and their text fragments.
//!
//! Decks are TOML documents:
//!
//! ```toml
//! title = "After Hours"
//! audio = "night.ogg"
//!
//! [[screens]]
//! [[screens.fragments]]
//! text = "It started with a rumor."
//! style = "title"
//!
//! [[screens.fragments]]
//! text = "tap to continue"
//! class = "tap-hint"
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Deserialize;
use tracing::warn;

use crate::reveal::RevealClass;
use crate::{Error, Result};

const BUILTIN_DECK: &str = include_str!("../assets/default-deck.toml");

/// Visual role of a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FragmentStyle {
    Title,
    #[default]
    Text,
    Manifesto,
    Huge,
    FinalSub,
    Hint,
}

impl FragmentStyle {
    /// Map a class token (`title-lg`, `manifesto-line`, ...) or a plain style name
    pub fn from_class(token: &str) -> Option<Self> {
        match token {
            "title" | "title-lg" => Some(Self::Title),
            "text" | "text-md" => Some(Self::Text),
            "manifesto" | "manifesto-line" => Some(Self::Manifesto),
            "huge" | "huge-text" => Some(Self::Huge),
            "final-sub" => Some(Self::FinalSub),
            "hint" | "tap-hint" => Some(Self::Hint),
            _ => None,
        }
    }
}

/// A text element of a screen that reveals on its own schedule
#[derive(Debug, Clone)]
pub struct Fragment {
    pub text: String,
    pub style: FragmentStyle,
    /// Explicit ordinal reveal tier (`delay-k`)
    pub tier: Option<u32>,
    pub visible: bool,
    /// Pending reveal deadline
    pub reveal_at: Option<Instant>,
    /// When the fragment last became visible (drives the fade-in)
    pub revealed_at: Option<Instant>,
}

impl Fragment {
    pub fn new(text: impl Into<String>, style: FragmentStyle, tier: Option<u32>) -> Self {
        Self {
            text: text.into(),
            style,
            tier,
            visible: false,
            reveal_at: None,
            revealed_at: None,
        }
    }

    pub fn is_hint(&self) -> bool {
        self.style == FragmentStyle::Hint
    }

    /// Reveal-delay classification; an explicit tier wins over the hint tag
    pub fn reveal_class(&self) -> RevealClass {
        match self.tier {
            Some(k) => RevealClass::Tier(k),
            None if self.is_hint() => RevealClass::Hint,
            None => RevealClass::Default,
        }
    }
}

/// One full-viewport panel of the presentation
#[derive(Debug, Clone, Default)]
pub struct Screen {
    pub fragments: Vec<Fragment>,
    pub active: bool,
    /// When `active` last flipped
    pub changed_at: Option<Instant>,
}

impl Screen {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self {
            fragments,
            active: false,
            changed_at: None,
        }
    }

    pub fn set_active(&mut self, active: bool, now: Instant) {
        if self.active != active {
            self.active = active;
            self.changed_at = Some(now);
        }
    }
}

/// An ordered, fixed set of screens
#[derive(Debug, Clone)]
pub struct Deck {
    pub title: String,
    pub audio: Option<PathBuf>,
    pub enter_label: String,
    pub restart_label: String,
    pub screens: Vec<Screen>,
}

#[derive(Debug, Deserialize)]
struct DeckFile {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default)]
    audio: Option<PathBuf>,
    #[serde(default = "default_enter_label")]
    enter_label: String,
    #[serde(default = "default_restart_label")]
    restart_label: String,
    #[serde(default)]
    screens: Vec<ScreenFile>,
}

#[derive(Debug, Deserialize)]
struct ScreenFile {
    #[serde(default)]
    fragments: Vec<FragmentFile>,
}

#[derive(Debug, Deserialize)]
struct FragmentFile {
    text: String,
    #[serde(default)]
    style: Option<FragmentStyle>,
    #[serde(default)]
    tier: Option<u32>,
    /// Space separated class list, e.g. "manifesto-line delay-2"
    #[serde(default)]
    class: Option<String>,
}

fn default_title() -> String {
    "Untitled".to_string()
}

fn default_enter_label() -> String {
    "Enter".to_string()
}

fn default_restart_label() -> String {
    "Play again".to_string()
}

impl FragmentFile {
    fn into_fragment(self, screen: usize) -> Result<Fragment> {
        if self.text.trim().is_empty() {
            return Err(Error::Deck(format!("screen {}: fragment text is empty", screen + 1)));
        }

        let mut style = self.style;
        let mut tier = self.tier;

        if let Some(class) = &self.class {
            for token in class.split_whitespace() {
                if let Some(num) = token.strip_prefix("delay-") {
                    match num.parse::<u32>() {
                        Ok(k) => tier = tier.or(Some(k)),
                        Err(_) => warn!("Ignoring malformed delay class '{}' on screen {}", token, screen + 1),
                    }
                } else if let Some(parsed) = FragmentStyle::from_class(token) {
                    style = style.or(Some(parsed));
                } else {
                    warn!("Ignoring unknown class '{}' on screen {}", token, screen + 1);
                }
            }
        }

        Ok(Fragment::new(self.text, style.unwrap_or_default(), tier))
    }
}

impl Deck {
    /// Parse a deck from TOML source
    pub fn from_toml(source: &str) -> Result<Self> {
        let file: DeckFile = toml::from_str(source)?;

        if file.screens.is_empty() {
            return Err(Error::Deck("deck has no screens".to_string()));
        }

        let screens = file
            .screens
            .into_iter()
            .enumerate()
            .map(|(idx, screen)| {
                let fragments = screen
                    .fragments
                    .into_iter()
                    .map(|f| f.into_fragment(idx))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Screen::new(fragments))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            title: file.title,
            audio: file.audio,
            enter_label: file.enter_label,
            restart_label: file.restart_label,
            screens,
        })
    }

    /// Load a deck file; a relative audio path resolves against the deck's directory
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::Deck(format!("cannot read {}: {}", path.display(), e)))?;
        let mut deck = Self::from_toml(&source)?;

        if let Some(dir) = path.parent() {
            deck.audio = deck
                .audio
                .take()
                .map(|audio| if audio.is_relative() { dir.join(audio) } else { audio });
        }

        Ok(deck)
    }

    /// The deck bundled with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_DECK)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn screen(&self, index: usize) -> Option<&Screen> {
        self.screens.get(index)
    }

    pub fn screen_mut(&mut self, index: usize) -> Option<&mut Screen> {
        self.screens.get_mut(index)
    }

    /// Index of the active screen, None mid-transition
    pub fn active_index(&self) -> Option<usize> {
        self.screens.iter().position(|s| s.active)
    }
}
