use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::reveal::RevealTimings;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub particles: ParticleConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Deck file to play when none is given on the command line
    #[serde(default)]
    pub deck: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            deck: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle poll interval in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate of the particle and cursor animations
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Logical pixels per terminal column
    #[serde(default = "default_cell_width_px")]
    pub cell_width_px: u16,
    /// Logical pixels per terminal row
    #[serde(default = "default_cell_height_px")]
    pub cell_height_px: u16,
    /// Theme configuration
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            cell_width_px: default_cell_width_px(),
            cell_height_px: default_cell_height_px(),
            theme: ThemeConfig::default(),
        }
    }
}

impl UiConfig {
    /// Duration of one animation frame
    pub fn frame_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }

    /// Convert a terminal size in cells to the logical pixel viewport
    pub fn viewport_px(&self, cols: u16, rows: u16) -> (f64, f64) {
        (
            cols as f64 * self.cell_width_px.max(1) as f64,
            rows as f64 * self.cell_height_px.max(1) as f64,
        )
    }
}

/// Theme configuration
/// Can be specified as a simple string (theme name) or as a full struct with overrides
#[derive(Debug, Clone, Serialize)]
pub struct ThemeConfig {
    /// Theme name (e.g., "noir", "ember", "paper")
    pub name: String,
    /// Optional color overrides
    pub colors: ThemeColorOverrides,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

// Accept either a string or a struct
impl<'de> Deserialize<'de> for ThemeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};
        use std::fmt;

        struct ThemeConfigVisitor;

        impl<'de> Visitor<'de> for ThemeConfigVisitor {
            type Value = ThemeConfig;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string (theme name) or a map with 'name' and optional 'colors'")
            }

            fn visit_str<E>(self, value: &str) -> Result<ThemeConfig, E>
            where
                E: de::Error,
            {
                Ok(ThemeConfig {
                    name: value.to_string(),
                    colors: ThemeColorOverrides::default(),
                })
            }

            fn visit_map<M>(self, mut map: M) -> Result<ThemeConfig, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut name: Option<String> = None;
                let mut colors: Option<ThemeColorOverrides> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => name = Some(map.next_value()?),
                        "colors" => colors = Some(map.next_value()?),
                        _ => {
                            let _: serde::de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                Ok(ThemeConfig {
                    name: name.unwrap_or_else(default_theme_name),
                    colors: colors.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_any(ThemeConfigVisitor)
    }
}

fn default_theme_name() -> String {
    "noir".to_string()
}

/// Optional color overrides, each a hex string (e.g., "#dc2626" or "dc2626")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    /// Background
    pub background: Option<String>,
    /// Primary text
    pub foreground: Option<String>,
    /// Secondary text (sub lines, hints)
    pub muted: Option<String>,
    /// Accent (particles, cursor, buttons)
    pub accent: Option<String>,
    /// Button label on hover
    pub highlight: Option<String>,
}

/// Easing curve used by screen and fragment fades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EasingType {
    /// Jump at the end
    None,
    Linear,
    /// 1 - (1-t)^3
    #[default]
    Cubic,
    /// 1 - (1-t)^5
    Quintic,
    /// 1 - 2^(-10t)
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Fade-out of the outgoing screen before the index moves (D1)
    #[serde(default = "default_fade_out_ms")]
    pub fade_out_ms: u64,
    /// Settle delay after arrival before another advance is accepted (D2)
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Delay before the first screen's reveal sequence starts on launch
    #[serde(default = "default_intro_delay_ms")]
    pub intro_delay_ms: u64,
    /// Fade-in of an arriving screen
    #[serde(default = "default_screen_fade_in_ms")]
    pub screen_fade_in_ms: u64,
    /// Fade-in of a single fragment once revealed
    #[serde(default = "default_fragment_fade_ms")]
    pub fragment_fade_ms: u64,
    /// Base offset for tiered fragments
    #[serde(default = "default_reveal_base_ms")]
    pub reveal_base_ms: u64,
    /// Spacing between consecutive tiers
    #[serde(default = "default_reveal_tier_step_ms")]
    pub reveal_tier_step_ms: u64,
    /// Delay of hint fragments
    #[serde(default = "default_reveal_hint_ms")]
    pub reveal_hint_ms: u64,
    /// Delay of untiered fragments on the first screen
    #[serde(default = "default_reveal_default_ms")]
    pub reveal_default_ms: u64,
    /// Extra delay of untiered fragments on later screens
    #[serde(default = "default_reveal_stagger_ms")]
    pub reveal_stagger_ms: u64,
    /// Easing curve for fades
    #[serde(default)]
    pub easing: EasingType,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fade_out_ms: default_fade_out_ms(),
            settle_ms: default_settle_ms(),
            intro_delay_ms: default_intro_delay_ms(),
            screen_fade_in_ms: default_screen_fade_in_ms(),
            fragment_fade_ms: default_fragment_fade_ms(),
            reveal_base_ms: default_reveal_base_ms(),
            reveal_tier_step_ms: default_reveal_tier_step_ms(),
            reveal_hint_ms: default_reveal_hint_ms(),
            reveal_default_ms: default_reveal_default_ms(),
            reveal_stagger_ms: default_reveal_stagger_ms(),
            easing: EasingType::default(),
        }
    }
}

impl TimingConfig {
    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn intro_delay(&self) -> Duration {
        Duration::from_millis(self.intro_delay_ms)
    }

    pub fn screen_fade_in(&self) -> Duration {
        Duration::from_millis(self.screen_fade_in_ms)
    }

    pub fn fragment_fade(&self) -> Duration {
        Duration::from_millis(self.fragment_fade_ms)
    }

    pub fn reveal_timings(&self) -> RevealTimings {
        RevealTimings {
            base: Duration::from_millis(self.reveal_base_ms),
            tier_step: Duration::from_millis(self.reveal_tier_step_ms),
            hint: Duration::from_millis(self.reveal_hint_ms),
            default: Duration::from_millis(self.reveal_default_ms),
            stagger: Duration::from_millis(self.reveal_stagger_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// Draw the ambient particle layer at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Particle count on wide viewports
    #[serde(default = "default_wide_count")]
    pub wide_count: usize,
    /// Particle count below the breakpoint
    #[serde(default = "default_narrow_count")]
    pub narrow_count: usize,
    /// Viewport width (logical px) under which the narrow count applies
    #[serde(default = "default_breakpoint_px")]
    pub breakpoint_px: f64,
    /// Mote color as hex
    #[serde(default = "default_particle_color")]
    pub color: String,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            wide_count: default_wide_count(),
            narrow_count: default_narrow_count(),
            breakpoint_px: default_breakpoint_px(),
            color: default_particle_color(),
        }
    }
}

impl ParticleConfig {
    /// Number of particles for a viewport width in logical pixels
    pub fn count_for_width(&self, width: f64) -> usize {
        if width < self.breakpoint_px {
            self.narrow_count
        } else {
            self.wide_count
        }
    }
}

/// Pointer precision setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PointerSetting {
    /// Detect from the terminal
    #[default]
    Auto,
    Fine,
    Coarse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorConfig {
    #[serde(default)]
    pub pointer: PointerSetting,
    /// Exponential smoothing factor of the trailing tracker
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            pointer: PointerSetting::default(),
            smoothing: default_smoothing(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Enable background audio
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Audio file; overrides the one named by the deck
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Player executable
    #[serde(default = "default_player")]
    pub player: String,
    /// Player arguments; `{file}` and `{start}` (seconds) are substituted
    #[serde(default = "default_player_args")]
    pub player_args: Vec<String>,
    /// A player exiting within this window counts as a rejected start
    #[serde(default = "default_startup_grace_ms")]
    pub startup_grace_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            file: None,
            player: default_player(),
            player_args: default_player_args(),
            startup_grace_ms: default_startup_grace_ms(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "q", "<C-c>", "<CR>", "<Space>", "<Right>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the player
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Advance to the next screen (middle screens only)
    #[serde(default = "default_key_advance")]
    pub advance: String,
    /// Press the visible control (enter on the first screen, restart on the last)
    #[serde(default = "default_key_enter")]
    pub enter: String,
    /// Restart from the first screen
    #[serde(default = "default_key_restart")]
    pub restart: String,
    /// Toggle background audio
    #[serde(default = "default_key_toggle_audio")]
    pub toggle_audio: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            advance: default_key_advance(),
            enter: default_key_enter(),
            restart: default_key_restart(),
            toggle_audio: default_key_toggle_audio(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_advance() -> String { "l".to_string() }
fn default_key_enter() -> String { "<CR>".to_string() }
fn default_key_restart() -> String { "r".to_string() }
fn default_key_toggle_audio() -> String { "m".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("noirdeck")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_cell_width_px() -> u16 {
    8
}

fn default_cell_height_px() -> u16 {
    16
}

fn default_fade_out_ms() -> u64 {
    800
}

fn default_settle_ms() -> u64 {
    1000
}

fn default_intro_delay_ms() -> u64 {
    500
}

fn default_screen_fade_in_ms() -> u64 {
    800
}

fn default_fragment_fade_ms() -> u64 {
    600
}

fn default_reveal_base_ms() -> u64 {
    500
}

fn default_reveal_tier_step_ms() -> u64 {
    1200 // reading time per tier
}

fn default_reveal_hint_ms() -> u64 {
    4000
}

fn default_reveal_default_ms() -> u64 {
    300
}

fn default_reveal_stagger_ms() -> u64 {
    300
}

fn default_wide_count() -> usize {
    60
}

fn default_narrow_count() -> usize {
    30
}

fn default_breakpoint_px() -> f64 {
    768.0
}

fn default_particle_color() -> String {
    "#dc2626".to_string()
}

fn default_smoothing() -> f64 {
    0.15
}

fn default_player() -> String {
    "mpv".to_string()
}

fn default_player_args() -> Vec<String> {
    vec![
        "--no-video".to_string(),
        "--really-quiet".to_string(),
        "--loop-file=inf".to_string(),
        "--start={start}".to_string(),
        "{file}".to_string(),
    ]
}

fn default_startup_grace_ms() -> u64 {
    1500
}

/// Expand tilde (~) in path to user's home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaults when it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/noirdeck/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("noirdeck")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Log file used while the terminal UI owns stdout
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("noirdeck.log")
    }

    /// Deck path from config (with tilde expansion)
    pub fn deck_path(&self) -> Option<PathBuf> {
        self.general.deck.as_deref().map(expand_tilde)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_presentation_constants() {
        let config = AppConfig::default();
        assert_eq!(config.timing.fade_out(), Duration::from_millis(800));
        assert_eq!(config.timing.settle(), Duration::from_millis(1000));
        assert_eq!(config.particles.wide_count, 60);
        assert_eq!(config.particles.narrow_count, 30);
        assert!((config.cursor.smoothing - 0.15).abs() < f64::EPSILON);
        assert_eq!(config.cursor.pointer, PointerSetting::Auto);
    }

    #[test]
    fn test_particle_count_breakpoint() {
        let particles = ParticleConfig::default();
        assert_eq!(particles.count_for_width(1024.0), 60);
        assert_eq!(particles.count_for_width(768.0), 60);
        assert_eq!(particles.count_for_width(500.0), 30);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [timing]
            settle_ms = 250

            [ui]
            theme = "ember"
            "#,
        )
        .unwrap();
        assert_eq!(config.timing.settle_ms, 250);
        assert_eq!(config.timing.fade_out_ms, 800);
        assert_eq!(config.ui.theme.name, "ember");
        assert_eq!(config.keymap.quit, "q");
    }

    #[test]
    fn test_theme_config_as_table() {
        let config: AppConfig = toml::from_str(
            r##"
            [ui.theme]
            name = "paper"
            colors = { accent = "#ff0000" }
            "##,
        )
        .unwrap();
        assert_eq!(config.ui.theme.name, "paper");
        assert_eq!(config.ui.theme.colors.accent.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_viewport_px() {
        let ui = UiConfig::default();
        assert_eq!(ui.viewport_px(128, 40), (1024.0, 640.0));
    }

    #[test]
    fn test_easing_lowercase() {
        let timing: TimingConfig = toml::from_str(r#"easing = "easeout""#).unwrap();
        assert_eq!(timing.easing, EasingType::EaseOut);
    }
}
