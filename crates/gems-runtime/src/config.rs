//! Viewer configuration

use gems_core::{GemsError, GemsResult};
use gems_playback::{RecordingConfig, SpeedConfig};
use serde::{Deserialize, Serialize};

/// Log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set
    pub filter: String,
    pub format: LogFormat,
    /// Include the event target (module path)
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
            with_target: false,
        }
    }
}

impl LogConfig {
    /// Per-pass tracing for chasing override bugs
    pub fn verbose() -> Self {
        LogConfig {
            filter: "info,gems_state=trace,gems_runtime=debug".to_string(),
            with_target: true,
            ..LogConfig::default()
        }
    }
}

/// Viewer configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub speed: SpeedConfig,
    pub recording: RecordingConfig,
    pub logging: LogConfig,
}

impl ViewerConfig {
    /// Parse JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> GemsResult<Self> {
        let config: ViewerConfig =
            serde_json::from_str(json).map_err(|e| GemsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> GemsResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GemsError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> GemsResult<()> {
        self.speed.validate()?;
        self.recording.validate()?;
        if self.logging.filter.trim().is_empty() {
            return Err(GemsError::InvalidConfig("empty log filter".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ViewerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = ViewerConfig::from_json_str(
            r#"{ "speed": { "scroll_scale": 0.05 }, "logging": { "format": "json" } }"#,
        )
        .unwrap();

        assert_eq!(config.speed.scroll_scale, 0.05);
        assert_eq!(config.speed.max_speed, 3.0);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.recording, RecordingConfig::default());
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(ViewerConfig::from_json_str("{}").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            ViewerConfig::from_json_str("{ speed: "),
            Err(GemsError::InvalidConfig(_))
        ));
        assert!(ViewerConfig::from_json_str(r#"{ "recording": { "max_frame_rate": 500 } }"#).is_err());
        assert!(ViewerConfig::from_json_str(r#"{ "logging": { "filter": " " } }"#).is_err());
    }

    #[test]
    fn test_json_output_reloads() {
        let mut config = ViewerConfig::default();
        config.logging = LogConfig::verbose();
        let json = config.to_json_string().unwrap();
        assert_eq!(ViewerConfig::from_json_str(&json).unwrap(), config);
    }
}
