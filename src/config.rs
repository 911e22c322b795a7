//! Greeting configuration
//!
//! Defaults come from `crate::consts`. On the web an optional JSON block embedded
//! in the page overrides them.

use serde::Deserialize;

use crate::consts::*;
use crate::error::ConfigError;
use crate::normalize_secret;

/// Wishes revealed on stage 2, one per floating item
pub const DEFAULT_WISHES: [&str; 6] = [
    "🎄 May your days be merry and bright",
    "⭐ May every wish you make find its way to you",
    "❄️ May winter bring you calm, quiet mornings",
    "🎁 May you be surprised by small kindnesses",
    "🕯️ May there always be a warm light waiting for you",
    "🌙 May the new year treat you gently",
];

/// Mock playlist titles on stage 3
pub const DEFAULT_TRACKS: [&str; 4] = [
    "All I Want for Christmas Is You",
    "Last Christmas",
    "Let It Snow!",
    "Silent Night",
];

/// Tunable greeting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GreetingConfig {
    /// Gate password (stored normalized after `validate`)
    pub secret: String,
    /// Message typed out on stage 1
    pub message: String,
    /// Text shown on a wrong password
    pub error_message: String,
    /// Wish texts, in item order
    pub wishes: Vec<String>,
    /// Playlist titles, in track order
    pub tracks: Vec<String>,

    // === Snowfall ===
    pub particle_count: usize,

    // === Pacing (ms) ===
    pub reveal_delay_ms: u32,
    pub reveal_advance_delay_ms: u32,
    pub switch_delay_ms: u32,
    pub wish_advance_delay_ms: u32,
    pub shake_ms: u32,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            secret: SECRET.to_string(),
            message: MESSAGE.to_string(),
            error_message: ERROR_MESSAGE.to_string(),
            wishes: DEFAULT_WISHES.iter().map(|w| w.to_string()).collect(),
            tracks: DEFAULT_TRACKS.iter().map(|t| t.to_string()).collect(),

            particle_count: PARTICLE_COUNT,

            reveal_delay_ms: REVEAL_DELAY_MS,
            reveal_advance_delay_ms: REVEAL_ADVANCE_DELAY_MS,
            switch_delay_ms: SWITCH_DELAY_MS,
            wish_advance_delay_ms: WISH_ADVANCE_DELAY_MS,
            shake_ms: SHAKE_MS,
        }
    }
}

impl GreetingConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// Normalize the secret and reject configs the sequencer cannot run
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.secret = normalize_secret(&self.secret);
        if self.secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.error_message.trim().is_empty() {
            return Err(ConfigError::EmptyErrorMessage);
        }
        if self.wishes.is_empty() {
            return Err(ConfigError::NoWishes);
        }
        if self.tracks.is_empty() {
            return Err(ConfigError::NoTracks);
        }
        Ok(self)
    }

    /// Number of wishes that must be revealed to leave stage 2
    pub fn total_wishes(&self) -> usize {
        self.wishes.len()
    }

    /// Make the wish list match the number of selectable items on the page.
    /// Extra wishes are dropped; missing ones are filled from `DEFAULT_WISHES`.
    pub fn fit_wishes(&mut self, items: usize) {
        if items == 0 || self.wishes.len() == items {
            return;
        }
        log::warn!(
            "Config has {} wishes for {} items, fitting to the page",
            self.wishes.len(),
            items
        );
        if self.wishes.len() > items {
            self.wishes.truncate(items);
            return;
        }
        let missing = items - self.wishes.len();
        let fill = DEFAULT_WISHES.iter().cycle().take(missing);
        self.wishes.extend(fill.map(|w| w.to_string()));
    }

    /// Element id of the embedded JSON block
    pub const ELEMENT_ID: &'static str = "greeting-config";

    /// Load config from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded greeting config from #{}", Self::ELEMENT_ID);
                    return config;
                }
                Err(e) => log::warn!("Ignoring page config: {}", e),
            }
        }

        log::info!("Using default greeting config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GreetingConfig::default();
        assert_eq!(config.secret, "moon");
        assert_eq!(config.particle_count, 100);
        assert_eq!(config.reveal_delay_ms, 30);
        assert_eq!(config.switch_delay_ms, 300);
        assert_eq!(config.total_wishes(), 6);
        assert!(config.message.starts_with("We may not have met yet"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GreetingConfig::from_json(r#"{ "secret": "  Stars ", "particle_count": 40 }"#)
            .expect("valid config");
        assert_eq!(config.secret, "stars");
        assert_eq!(config.particle_count, 40);
        assert_eq!(config.switch_delay_ms, SWITCH_DELAY_MS);
        assert_eq!(config.tracks.len(), DEFAULT_TRACKS.len());
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(
            GreetingConfig::from_json(r#"{ "secret": "   " }"#),
            Err(ConfigError::EmptySecret)
        ));
        assert!(matches!(
            GreetingConfig::from_json(r#"{ "error_message": " " }"#),
            Err(ConfigError::EmptyErrorMessage)
        ));
        assert!(matches!(
            GreetingConfig::from_json(r#"{ "wishes": [] }"#),
            Err(ConfigError::NoWishes)
        ));
        assert!(matches!(
            GreetingConfig::from_json(r#"{ "tracks": [] }"#),
            Err(ConfigError::NoTracks)
        ));
        assert!(matches!(
            GreetingConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_fit_wishes_truncates() {
        let mut config = GreetingConfig::default();
        config.fit_wishes(4);
        assert_eq!(config.total_wishes(), 4);
        assert_eq!(config.wishes[3], DEFAULT_WISHES[3]);
    }

    #[test]
    fn test_fit_wishes_pads_from_defaults() {
        let mut config = GreetingConfig {
            wishes: vec!["one".to_string()],
            ..Default::default()
        };
        config.fit_wishes(8);
        assert_eq!(config.total_wishes(), 8);
        assert_eq!(config.wishes[0], "one");
        assert_eq!(config.wishes[1], DEFAULT_WISHES[0]);
        assert_eq!(config.wishes[7], DEFAULT_WISHES[0]);
    }

    #[test]
    fn test_fit_wishes_without_items_is_noop() {
        let mut config = GreetingConfig::default();
        config.fit_wishes(0);
        assert_eq!(config.total_wishes(), DEFAULT_WISHES.len());
    }
}
