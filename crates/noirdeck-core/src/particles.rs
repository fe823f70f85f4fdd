//! Ambient particle field: a fixed pool of slowly drifting motes.
//!
//! Particles are allocated once; a particle whose lifetime runs out or which
//! leaves the bounds is reset in place.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::frame::FrameTask;

/// Per-axis velocity is drawn from (-MAX_SPEED, MAX_SPEED)
pub const MAX_SPEED: f64 = 0.1;
pub const MAX_SIZE: f64 = 2.0;
pub const MAX_ALPHA: f64 = 0.5;
/// Lifetime in frames
pub const MAX_LIFE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub alpha: f64,
    pub life: f64,
}

impl Particle {
    fn spawn<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        Self {
            x: rng.gen::<f64>() * width,
            y: rng.gen::<f64>() * height,
            vx: (rng.gen::<f64>() - 0.5) * 2.0 * MAX_SPEED,
            vy: (rng.gen::<f64>() - 0.5) * 2.0 * MAX_SPEED,
            size: rng.gen::<f64>() * MAX_SIZE,
            alpha: rng.gen::<f64>() * MAX_ALPHA,
            life: rng.gen::<f64>() * MAX_LIFE,
        }
    }

    #[inline]
    pub fn in_bounds(&self, width: f64, height: f64) -> bool {
        self.x >= 0.0 && self.x <= width && self.y >= 0.0 && self.y <= height
    }
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    rng: StdRng,
}

impl ParticleField {
    /// Field of `count` particles seeded from OS entropy
    pub fn new(count: usize, width: f64, height: f64) -> Self {
        Self::with_rng(count, width, height, StdRng::from_entropy())
    }

    /// Deterministic field for tests and reproducible captures
    pub fn with_seed(count: usize, width: f64, height: f64, seed: u64) -> Self {
        Self::with_rng(count, width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(count: usize, width: f64, height: f64, mut rng: StdRng) -> Self {
        let particles = (0..count)
            .map(|_| Particle::spawn(&mut rng, width, height))
            .collect();
        Self {
            particles,
            width,
            height,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Resync bounds to the viewport; particles are left where they are and
    /// any now outside get reset on the next step
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Advance every particle by one frame
    pub fn step(&mut self) {
        let (width, height) = (self.width, self.height);
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.life -= 1.0;

            if p.life <= 0.0 || !p.in_bounds(width, height) {
                *p = Particle::spawn(&mut self.rng, width, height);
            }
        }
    }
}

impl FrameTask for ParticleField {
    fn on_frame(&mut self) {
        self.step();
    }
}
