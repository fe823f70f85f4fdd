pub mod check;
pub mod init_config;
pub mod run;
pub mod timeline;

use std::path::Path;

use anyhow::{Context, Result};
use noirdeck_core::deck::Deck;
use noirdeck_core::AppConfig;

/// Deck from the command line, else the configured one, else the bundled deck
pub fn load_deck(config: &AppConfig, path: Option<&Path>) -> Result<Deck> {
    match path.map(Path::to_path_buf).or_else(|| config.deck_path()) {
        Some(path) => {
            Deck::load(&path).with_context(|| format!("loading deck {}", path.display()))
        }
        None => Ok(Deck::builtin()?),
    }
}
