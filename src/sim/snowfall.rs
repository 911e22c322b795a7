//! Snowfall particle field
//!
//! A fixed pool of flakes falling over the canvas. Flakes are never created or
//! destroyed after start: a flake leaving the bottom edge is recycled in place at
//! the top, and horizontal motion wraps around.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::platform::DrawSurface;

/// A single snowflake
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flake {
    pub pos: Vec2,
    /// Always > 0, fixed at creation
    pub radius: f32,
    /// Downward speed per frame, fixed at creation
    pub speed: f32,
    /// Horizontal speed per frame (may be negative), fixed at creation
    pub drift: f32,
}

impl Flake {
    /// Move by one frame of fall and drift
    #[inline]
    pub fn advance(&mut self) {
        self.pos.y += self.speed;
        self.pos.x += self.drift;
    }
}

/// Uniform sample in `[lo, hi)`, or `lo` when the range is empty
fn sample(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// The snowflake pool and the surface bounds it is recycled against
#[derive(Debug, Clone)]
pub struct Snowfield {
    flakes: Vec<Flake>,
    width: f32,
    height: f32,
    rng: Pcg32,
}

impl Snowfield {
    /// Allocate `count` flakes spread uniformly over a `width` x `height` surface
    pub fn new(count: usize, width: f32, height: f32, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let flakes = (0..count)
            .map(|_| Flake {
                pos: Vec2::new(sample(&mut rng, 0.0, width), sample(&mut rng, 0.0, height)),
                radius: sample(&mut rng, FLAKE_RADIUS_MIN, FLAKE_RADIUS_MAX),
                speed: sample(&mut rng, FLAKE_SPEED_MIN, FLAKE_SPEED_MAX),
                drift: sample(&mut rng, -FLAKE_DRIFT, FLAKE_DRIFT),
            })
            .collect();

        Self {
            flakes,
            width,
            height,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.flakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flakes.is_empty()
    }

    pub fn flakes(&self) -> &[Flake] {
        &self.flakes
    }

    /// Current bounds used for recycling
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Track a surface resize. Flakes stay where they are and self-correct
    /// through normal recycling.
    pub fn resize(&mut self, width: f32, height: f32) {
        log::debug!("Snowfield resized to {}x{}", width, height);
        self.width = width;
        self.height = height;
    }

    /// Clear the surface and draw every flake at its current position
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        for flake in &self.flakes {
            surface.fill_circle(flake.pos.x, flake.pos.y, flake.radius);
        }
    }

    /// Advance every flake one frame, then recycle the ones out of bounds
    pub fn step(&mut self) {
        let (width, height) = (self.width, self.height);
        for flake in &mut self.flakes {
            flake.advance();

            if flake.pos.y > height {
                flake.pos.y = FLAKE_RESPAWN_Y;
                flake.pos.x = sample(&mut self.rng, 0.0, width);
            }

            if flake.pos.x > width {
                flake.pos.x = 0.0;
            } else if flake.pos.x < 0.0 {
                flake.pos.x = width;
            }
        }
    }

    /// One animation frame: draw the current state, then advance it
    pub fn frame<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) {
        self.draw(surface);
        self.step();
    }
}
