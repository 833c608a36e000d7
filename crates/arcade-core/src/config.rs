use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::HubError;
use crate::registry::ReleaseWindow;

/// Hub tuning knobs, loaded from `config/hub.toml` at compile time.
/// Every section falls back to its defaults when omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub badge: BadgeConfig,
    pub grid: GridConfig,
    pub glitch: GlitchConfig,
    pub parallax: ParallaxConfig,
    pub navigation: NavigationConfig,
    pub audio: AudioConfig,
    pub overlay: OverlayConfig,
    pub chromatic: ChromaticConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeConfig {
    /// Days a release keeps its "NEW" badge.
    pub window_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Id of the element cards are appended to.
    pub mount_id: String,
    /// Selector of the page title that glitches once on entrance.
    pub title_selector: String,
    /// Entrance animation delay added per card.
    pub stagger_ms: u32,
}

/// What to do when a glitch is triggered on text that is already glitching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetriggerPolicy {
    #[default]
    Ignore,
    Restart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlitchConfig {
    pub steps: u32,
    pub symbols: String,
    /// Probability that hovering a card glitches its title.
    pub hover_chance: f32,
    pub hover_duration_ms: u32,
    pub title_duration_ms: u32,
    pub title_delay_ms: u32,
    pub retrigger: RetriggerPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    /// Multiplier on the centered cursor fraction; offsets stay within `±strength / 2`.
    pub strength: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub target_page: String,
    /// Must match the CSS duration of the screen wipe.
    pub delay_ms: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    #[default]
    Square,
    Triangle,
    Sawtooth,
}

/// A short oscillator blip with an exponential gain decay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneConfig {
    pub frequency: f32,
    pub duration_secs: f64,
    pub start_gain: f32,
    pub end_gain: f32,
    #[serde(default)]
    pub wave: Waveform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub hover: ToneConfig,
    pub click: ToneConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub enabled: bool,
    /// Shader time added per animation frame.
    pub time_step: f32,
    /// Alpha of the whole overlay pass.
    pub opacity: f32,
    pub z_index: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromaticConfig {
    pub text_shadow: String,
}

// --- Defaults ---

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            window_days: ReleaseWindow::default().days,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            mount_id: "games-grid".to_string(),
            title_selector: ".arcade-title".to_string(),
            stagger_ms: 100,
        }
    }
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            steps: 10,
            symbols: "!<>-_\\/[]{}—=+*^?#________".to_string(),
            hover_chance: 0.3,
            hover_duration_ms: 150,
            title_duration_ms: 500,
            title_delay_ms: 500,
            retrigger: RetriggerPolicy::default(),
        }
    }
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self { strength: 10.0 }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            target_page: "game.html".to_string(),
            delay_ms: 500,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hover: ToneConfig {
                frequency: 800.0,
                duration_secs: 0.05,
                start_gain: 0.01,
                end_gain: 0.001,
                wave: Waveform::Square,
            },
            click: ToneConfig {
                frequency: 1200.0,
                duration_secs: 0.1,
                start_gain: 0.02,
                end_gain: 0.001,
                wave: Waveform::Square,
            },
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            time_step: 0.016,
            opacity: 0.08,
            z_index: 9999,
        }
    }
}

impl Default for ChromaticConfig {
    fn default() -> Self {
        Self {
            text_shadow: "2px 0 #ff00ff, -2px 0 #00ffff".to_string(),
        }
    }
}

// --- Loading ---

impl HubConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, HubError> {
        let config: HubConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the embedded config. Falls back to defaults if it fails to parse or validate.
    pub fn load() -> Self {
        match Self::from_toml_str(include_str!("../../../config/hub.toml")) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load hub config: {e}, using defaults");
                HubConfig::default()
            },
        }
    }

    pub fn validate(&self) -> Result<(), HubError> {
        let invalid = |msg: &str| Err(HubError::InvalidConfig(msg.to_string()));

        if self.glitch.steps == 0 {
            return invalid("glitch.steps must be > 0");
        }
        if self.glitch.symbols.is_empty() {
            return invalid("glitch.symbols must not be empty");
        }
        if !(0.0..=1.0).contains(&self.glitch.hover_chance) {
            return invalid("glitch.hover_chance must be within [0, 1]");
        }
        if !self.parallax.strength.is_finite() {
            return invalid("parallax.strength must be finite");
        }
        if self.overlay.time_step.is_nan() || self.overlay.time_step <= 0.0 {
            return invalid("overlay.time_step must be > 0");
        }
        if !(0.0..=1.0).contains(&self.overlay.opacity) {
            return invalid("overlay.opacity must be within [0, 1]");
        }
        let tones = [
            ("audio.hover", &self.audio.hover),
            ("audio.click", &self.audio.click),
        ];
        for (name, tone) in tones {
            // exponentialRampToValueAtTime rejects non-positive targets
            // NaN fails both comparisons
            if !(tone.start_gain > 0.0 && tone.end_gain > 0.0) {
                return Err(HubError::InvalidConfig(format!("{name} gains must be > 0")));
            }
            if !(tone.duration_secs > 0.0 && tone.duration_secs.is_finite()) {
                return Err(HubError::InvalidConfig(format!(
                    "{name}.duration_secs must be > 0"
                )));
            }
        }
        Ok(())
    }

    pub fn release_window(&self) -> ReleaseWindow {
        ReleaseWindow {
            days: self.badge.window_days,
        }
    }

    pub fn navigation_delay(&self) -> Duration {
        Duration::from_millis(self.navigation.delay_ms as u64)
    }

    pub fn title_glitch_delay(&self) -> Duration {
        Duration::from_millis(self.glitch.title_delay_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_matches_defaults() {
        let loaded = HubConfig::from_toml_str(include_str!("../../../config/hub.toml")).unwrap();
        assert_eq!(loaded, HubConfig::default());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml = r#"
            [glitch]
            steps = 6
            retrigger = "restart"
        "#;
        let config = HubConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.glitch.steps, 6);
        assert_eq!(config.glitch.retrigger, RetriggerPolicy::Restart);
        // Untouched fields keep their defaults
        assert_eq!(config.glitch.hover_duration_ms, 150);
        assert_eq!(config.navigation.delay_ms, 500);
        assert_eq!(config.badge.window_days, 4);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(HubConfig::from_toml_str("").unwrap(), HubConfig::default());
    }

    #[test]
    fn validation_rejects_zero_steps() {
        let err = HubConfig::from_toml_str("[glitch]\nsteps = 0").unwrap_err();
        assert!(matches!(err, HubError::InvalidConfig(m) if m.contains("steps")));
    }

    #[test]
    fn validation_rejects_bad_probability() {
        let err = HubConfig::from_toml_str("[glitch]\nhover_chance = 1.5").unwrap_err();
        assert!(matches!(err, HubError::InvalidConfig(_)));
    }

    #[test]
    fn validation_rejects_zero_gain() {
        let toml = r#"
            [audio.click]
            frequency = 1000.0
            duration_secs = 0.1
            start_gain = 0.02
            end_gain = 0.0
        "#;
        let err = HubConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, HubError::InvalidConfig(m) if m.contains("audio.click")));
    }

    #[test]
    fn validation_rejects_nan_tone_values() {
        let toml = r#"
            [audio.hover]
            frequency = 800.0
            duration_secs = nan
            start_gain = 0.01
            end_gain = 0.001
        "#;
        let err = HubConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, HubError::InvalidConfig(m) if m.contains("audio.hover.duration_secs")));

        let toml = r#"
            [audio.click]
            frequency = 1200.0
            duration_secs = 0.1
            start_gain = nan
            end_gain = 0.001
        "#;
        let err = HubConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, HubError::InvalidConfig(m) if m.contains("audio.click gains")));
    }

    #[test]
    fn validation_rejects_non_positive_time_step() {
        let err = HubConfig::from_toml_str("[overlay]\ntime_step = 0.0").unwrap_err();
        assert!(matches!(err, HubError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = HubConfig::from_toml_str("[glitch\nsteps = ").unwrap_err();
        assert!(matches!(err, HubError::Config(_)));
    }

    #[test]
    fn duration_helpers() {
        let config = HubConfig::default();
        assert_eq!(config.navigation_delay(), Duration::from_millis(500));
        assert_eq!(config.title_glitch_delay(), Duration::from_millis(500));
        assert_eq!(config.release_window(), ReleaseWindow { days: 4 });
    }
}
