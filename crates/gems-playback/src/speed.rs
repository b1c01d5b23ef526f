//! Playback speed - the time scale handed to the host clock

use gems_core::{GemsError, GemsResult};
use serde::{Deserialize, Serialize};

/// Speed control configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// Lower speed limit
    pub min_speed: f32,
    /// Upper speed limit
    pub max_speed: f32,
    /// Speed change per scroll unit
    pub scroll_scale: f32,
    /// Speed at start and after reset
    pub default_speed: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        SpeedConfig {
            min_speed: 0.0,
            max_speed: 3.0,
            scroll_scale: 0.03,
            default_speed: 1.0,
        }
    }
}

impl SpeedConfig {
    pub const SCROLL_SCALE_RANGE: (f32, f32) = (0.01, 0.1);

    pub fn validate(&self) -> GemsResult<()> {
        let (lo, hi) = Self::SCROLL_SCALE_RANGE;
        if !(self.min_speed >= 0.0 && self.min_speed <= self.max_speed) {
            return Err(GemsError::InvalidConfig(format!(
                "speed limits {}..{} are inverted or negative",
                self.min_speed, self.max_speed
            )));
        }
        if !(lo..=hi).contains(&self.scroll_scale) {
            return Err(GemsError::InvalidConfig(format!(
                "scroll scale {} outside {}..{}",
                self.scroll_scale, lo, hi
            )));
        }
        if !(self.min_speed..=self.max_speed).contains(&self.default_speed) {
            return Err(GemsError::InvalidConfig(format!(
                "default speed {} outside limits",
                self.default_speed
            )));
        }
        Ok(())
    }
}

/// Playback speed state
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackSpeed {
    speed: f32,
    config: SpeedConfig,
}

impl PlaybackSpeed {
    pub fn new() -> Self {
        let config = SpeedConfig::default();
        PlaybackSpeed {
            speed: config.default_speed,
            config,
        }
    }

    /// Speed state for a validated config
    pub fn with_config(config: SpeedConfig) -> GemsResult<Self> {
        config.validate()?;
        Ok(PlaybackSpeed {
            speed: config.default_speed,
            config,
        })
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Value for the host's time scale this update
    pub fn time_scale(&self) -> f32 {
        self.speed
    }

    /// Scroll while the speed modifier is held
    pub fn scroll(&mut self, delta: f32) -> f32 {
        self.set(self.speed + delta * self.config.scroll_scale)
    }

    /// Set the speed, clamped to the configured limits
    pub fn set(&mut self, speed: f32) -> f32 {
        if speed.is_finite() {
            self.speed = speed.clamp(self.config.min_speed, self.config.max_speed);
        }
        self.speed
    }

    pub fn reset(&mut self) {
        self.speed = self.config.default_speed;
    }

    /// Readout text, whole percent truncated toward zero
    pub fn readout(&self) -> String {
        format!("Speed: {}%", (self.speed * 100.0) as i32)
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_speed_defaults() {
        let speed = PlaybackSpeed::new();
        assert_eq!(speed.speed(), 1.0);
        assert_eq!(speed.readout(), "Speed: 100%");
    }

    #[test]
    fn test_speed_scroll_and_clamp() {
        let mut speed = PlaybackSpeed::new();
        speed.scroll(1000.0);
        assert_eq!(speed.speed(), 3.0);
        assert_eq!(speed.readout(), "Speed: 300%");

        speed.scroll(-1000.0);
        assert_eq!(speed.speed(), 0.0);
        assert_eq!(speed.readout(), "Speed: 0%");
    }

    #[test]
    fn test_speed_set_and_reset() {
        let mut speed = PlaybackSpeed::new();
        assert_eq!(speed.set(1.5), 1.5);
        assert_eq!(speed.readout(), "Speed: 150%");

        assert_eq!(speed.set(f32::NAN), 1.5);

        speed.reset();
        assert_eq!(speed.time_scale(), 1.0);
    }

    #[test]
    fn test_speed_config_validation() {
        assert!(SpeedConfig::default().validate().is_ok());

        let inverted = SpeedConfig {
            min_speed: 2.0,
            max_speed: 1.0,
            ..SpeedConfig::default()
        };
        assert!(inverted.validate().is_err());

        let coarse = SpeedConfig {
            scroll_scale: 0.5,
            ..SpeedConfig::default()
        };
        assert!(coarse.validate().is_err());
    }

    #[test]
    fn test_with_config_rejects_inverted_limits() {
        let inverted = SpeedConfig {
            min_speed: 2.0,
            max_speed: 1.0,
            default_speed: 1.5,
            ..SpeedConfig::default()
        };
        assert!(matches!(
            PlaybackSpeed::with_config(inverted),
            Err(GemsError::InvalidConfig(_))
        ));

        let slow = SpeedConfig {
            max_speed: 2.0,
            ..SpeedConfig::default()
        };
        let mut speed = PlaybackSpeed::with_config(slow).unwrap();
        assert_eq!(speed.set(5.0), 2.0);
    }

    proptest! {
        #[test]
        fn prop_speed_stays_within_limits(deltas in prop::collection::vec(-200.0f32..200.0, 0..50)) {
            let mut speed = PlaybackSpeed::new();
            for delta in deltas {
                let s = speed.scroll(delta);
                prop_assert!((0.0..=3.0).contains(&s));
            }
        }
    }
}
