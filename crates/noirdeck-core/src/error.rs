use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deck error: {0}")]
    Deck(String),

    #[error("Deck parsing error: {0}")]
    DeckParse(#[from] toml::de::Error),

    #[error("Audio playback error: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, Error>;
