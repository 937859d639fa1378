//! Engine configuration. Owned by the embedder and passed in
//! explicitly; the engine never reads global state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which kana input table drives romaji-to-kana mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputTable {
    RomanToKana,
    Azik,
    KanaUs,
    KanaJis,
    /// Named custom table supplied by the embedder.
    Custom(String),
}

impl Default for InputTable {
    fn default() -> Self {
        InputTable::RomanToKana
    }
}

/// What the backslash/yen key produces in Japanese mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YenKey {
    Yen,
    Backslash,
}

impl Default for YenKey {
    fn default() -> Self {
        YenKey::Yen
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Convert as you type, with the best row shown inline.
    pub live_conversion: bool,
    /// Allow the debug message overlay in the candidate window.
    pub debug_window: bool,
    /// Enable predictive / replace suggestions.
    pub suggestions_enabled: bool,
    /// Produce `，` / `．` instead of `、` / `。`.
    pub comma_period_fullwidth_ascii: bool,
    /// Shift+Space inserts a half-width space while composing.
    pub prefer_half_space: bool,
    /// Yen key behavior.
    pub yen_key: YenKey,
    /// Host keyboard layout id to request when entering Japanese mode.
    pub keyboard_layout_id: String,
    pub input_table: InputTable,
    /// Learning weight in `0.0..=1.0`.
    pub personalization: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            live_conversion: true,
            debug_window: false,
            suggestions_enabled: false,
            comma_period_fullwidth_ascii: false,
            prefer_half_space: false,
            yen_key: YenKey::default(),
            keyboard_layout_id: String::new(),
            input_table: InputTable::default(),
            personalization: 0.5,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}
