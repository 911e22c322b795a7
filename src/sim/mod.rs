//! Background simulation
//!
//! The snowfall is pure and seeded:
//! - Fixed-size flake pool
//! - One step per animation frame
//! - No DOM or timer dependencies (drawing goes through `DrawSurface`)

pub mod snowfall;

pub use snowfall::{Flake, Snowfield};
