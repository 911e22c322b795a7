//! Snow Greeting - a password-gated holiday greeting
//!
//! Core modules:
//! - `sim`: Snowfall particle field (pure, seeded)
//! - `flow`: Screen sequencer, letter reveal and timer tasks
//! - `platform`: Drawing/view collaborator traits and the browser host
//! - `config`: Tunable greeting configuration

pub mod config;
pub mod error;
pub mod flow;
pub mod platform;
pub mod sim;

pub use config::GreetingConfig;
pub use error::{ConfigError, GateError, PlatformError};
pub use flow::{Outcome, Screen, Sequencer, Task, TimerQueue};
pub use sim::{Flake, Snowfield};

/// Greeting configuration defaults
pub mod consts {
    /// Password that opens the gate (compared after trim + lowercase)
    pub const SECRET: &str = "moon";

    /// Message typed out on the first stage
    pub const MESSAGE: &str = "We may not have met yet, but somehow you've found a quiet place in my thoughts. This Christmas, I simply wish you a life filled with happiness, peace, and good health. Wherever you are, I hope warmth finds you, and that gentle moments make you smile.";

    /// Shown under the password field on a mismatch
    pub const ERROR_MESSAGE: &str = "❌ Incorrect password. Try again!";

    /// Snowflake pool size
    pub const PARTICLE_COUNT: usize = 100;
    /// Snowflake radius range (px)
    pub const FLAKE_RADIUS_MIN: f32 = 1.0;
    pub const FLAKE_RADIUS_MAX: f32 = 4.0;
    /// Fall speed range (px/frame)
    pub const FLAKE_SPEED_MIN: f32 = 0.5;
    pub const FLAKE_SPEED_MAX: f32 = 1.5;
    /// Horizontal drift range (px/frame), symmetric around zero
    pub const FLAKE_DRIFT: f32 = 0.25;
    /// Recycled flakes re-enter this far above the top edge
    pub const FLAKE_RESPAWN_Y: f32 = -10.0;

    /// Delay between revealed characters (ms)
    pub const REVEAL_DELAY_MS: u32 = 30;
    /// Delay between reveal completion and the stage 1 advance button (ms)
    pub const REVEAL_ADVANCE_DELAY_MS: u32 = 500;
    /// Cross-fade budget between hiding one screen and showing the next (ms)
    pub const SWITCH_DELAY_MS: u32 = 300;
    /// Delay before the stage 2 advance button appears (ms)
    pub const WISH_ADVANCE_DELAY_MS: u32 = 1000;
    /// Duration of the wrong-password shake (ms)
    pub const SHAKE_MS: u32 = 500;
    /// Lifetime of a wish sparkle (ms)
    pub const SPARKLE_MS: u32 = 1000;
}

/// Lowercase and trim user input before comparing it to the secret
#[inline]
pub fn normalize_secret(input: &str) -> String {
    input.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_secret() {
        assert_eq!(normalize_secret("MOON "), "moon");
        assert_eq!(normalize_secret("\t MoOn\n"), "moon");
        assert_eq!(normalize_secret(""), "");
    }
}
