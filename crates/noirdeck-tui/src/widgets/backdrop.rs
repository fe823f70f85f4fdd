//! Full-screen braille canvas behind the text: drifting particles and the
//! trailing cursor ring.

use noirdeck_core::cursor::CursorFollower;
use noirdeck_core::particles::{Particle, MAX_ALPHA, MAX_SIZE};
use ratatui::{
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::canvas::{Canvas, Circle, Painter, Shape},
    Frame,
};

use crate::anim::blend;
use crate::app::App;

/// Trail ring radius in logical pixels
const RING_RADIUS: f64 = 20.0;
/// Ring radius while hovering a control
const RING_RADIUS_ACTIVE: f64 = 32.0;

/// Particles as braille dots, dimmed by their alpha. Motes in the upper half
/// of the size range are two dots wide.
pub struct Motes<'a> {
    pub particles: &'a [Particle],
    /// Viewport height in logical pixels, for flipping to canvas space
    pub height: f64,
    /// Logical pixels per braille dot column
    pub dot_width: f64,
    pub color: Color,
    pub background: Color,
}

impl Shape for Motes<'_> {
    fn draw(&self, painter: &mut Painter) {
        for p in self.particles {
            // Alpha tops out at MAX_ALPHA; stretch it so the brightest motes reach full color
            let strength = (p.alpha / MAX_ALPHA).clamp(0.0, 1.0);
            let color = blend(self.background, self.color, 0.25 + 0.75 * strength);
            let y = self.height - p.y;
            let Some((px, py)) = painter.get_point(p.x, y) else {
                continue;
            };
            painter.paint(px, py, color);
            // Second dot in the next column, when that column is on the canvas
            if p.size >= MAX_SIZE / 2.0 && painter.get_point(p.x + self.dot_width, y).is_some() {
                painter.paint(px + 1, py, color);
            }
        }
    }
}

/// The trailing circle of the cursor follower
pub fn trail_ring(cursor: &CursorFollower, height: f64, color: Color) -> Circle {
    let trail = cursor.trail();
    Circle {
        x: trail.x,
        y: height - trail.y,
        radius: if cursor.is_interacting() {
            RING_RADIUS_ACTIVE
        } else {
            RING_RADIUS
        },
        color,
    }
}

pub struct BackdropWidget;

impl BackdropWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let (cw, ch) = app.cell_size_px();
        let width = area.width as f64 * cw;
        let height = area.height as f64 * ch;
        let theme = &app.theme;

        let particles = app.presentation.particles();
        let cursor = app.presentation.cursor();

        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .background_color(theme.background)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                if let Some(field) = particles {
                    ctx.draw(&Motes {
                        particles: field.particles(),
                        height,
                        dot_width: cw / 2.0,
                        color: app.particle_color,
                        background: theme.background,
                    });
                }
                if let Some(cursor) = cursor {
                    ctx.layer();
                    ctx.draw(&trail_ring(cursor, height, theme.accent));
                }
            });

        frame.render_widget(canvas, area);
    }
}
