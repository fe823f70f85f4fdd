//! Clickable regions recorded while drawing, queried by the input binder.

use noirdeck_core::ClickTarget;
use ratatui::layout::{Position, Rect};

#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<(Rect, ClickTarget)>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous frame's regions
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn register(&mut self, area: Rect, target: ClickTarget) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    /// What lies under a cell; later registrations sit on top
    pub fn target_at(&self, col: u16, row: u16) -> ClickTarget {
        let pos = Position::new(col, row);
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(pos))
            .map(|(_, target)| *target)
            .unwrap_or(ClickTarget::Screen)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
