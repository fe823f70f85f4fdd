use ratatui::style::Color;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    /// Primary text
    pub foreground: Color,
    /// Sub lines, hints, idle controls
    pub muted: Color,
    /// Particles, cursor, button borders
    pub accent: Color,
    /// Hovered control label
    pub highlight: Color,
}

impl Default for Theme {
    fn default() -> Self {
        crate::themes::default_theme()
    }
}
