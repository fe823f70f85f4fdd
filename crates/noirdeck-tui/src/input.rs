use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Next screen (middle screens only)
    Advance,
    /// Press whichever control the current screen shows
    Enter,
    Restart,
    ToggleAudio,
    /// Left click at a terminal cell
    Click { col: u16, row: u16 },
    /// Pointer moved to a terminal cell
    PointerMove { col: u16, row: u16 },
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, keymap: &Keymap) -> Action {
    let binding = KeyBinding::new(key.code, key.modifiers);
    if let Some(action) = keymap.get(&binding) {
        return *action;
    }

    // Terminals disagree on whether uppercase letters carry SHIFT
    if let KeyCode::Char(c) = key.code {
        if c.is_ascii_uppercase() && key.modifiers == KeyModifiers::NONE {
            if let Some(action) = keymap.get(&KeyBinding::shift(key.code)) {
                return *action;
            }
        }
    }

    Action::None
}

/// Map a mouse event to a click or pointer move
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Action::Click {
            col: mouse.column,
            row: mouse.row,
        },
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Action::PointerMove {
            col: mouse.column,
            row: mouse.row,
        },
        _ => Action::None,
    }
}
