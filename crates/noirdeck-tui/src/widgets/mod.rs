mod backdrop;
mod controls;
mod cursor;
mod screen;

pub use backdrop::{BackdropWidget, Motes};
pub use controls::{ControlsView, ControlsWidget};
pub use cursor::CursorWidget;
pub use screen::{layout_fragments, wrap_text, ScreenWidget};
