pub mod audio;
pub mod config;
pub mod cursor;
pub mod deck;
pub mod error;
pub mod frame;
pub mod particles;
pub mod presentation;
pub mod reveal;
pub mod sequencer;

pub use config::{AppConfig, EasingType, PointerSetting};
pub use error::{Error, Result};
pub use presentation::{ClickTarget, ControlKind, Presentation};
