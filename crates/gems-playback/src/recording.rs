//! Recording session - capture settings and progress for one clip
//!
//! Frame capture and encoding happen in the host. The session resolves the
//! settings a capture runs with, refuses overlapping recordings, and drives
//! the progress label of the record button from frame deltas.

use std::time::Duration;

use gems_core::{GemsError, GemsResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::MOTION_SUFFIX;

/// Label of the record button while idle
pub const IDLE_LABEL: &str = "Record Animation";

/// Label shown while the host finishes writing the file
pub const SAVING_LABEL: &str = "Saving...";

/// Recording configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Frame rate pre-filled in the input field
    pub default_frame_rate: u32,
    pub min_frame_rate: u32,
    pub max_frame_rate: u32,
    /// Progress updates over one clip
    pub progress_steps: u32,
    /// Time the saving label stays up after the last step
    pub save_delay_ms: u64,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        RecordingConfig {
            default_frame_rate: 30,
            min_frame_rate: 1,
            max_frame_rate: 120,
            progress_steps: 100,
            save_delay_ms: 1000,
        }
    }
}

impl RecordingConfig {
    pub const FRAME_RATE_LIMITS: (u32, u32) = (1, 120);

    pub fn validate(&self) -> GemsResult<()> {
        let (lo, hi) = Self::FRAME_RATE_LIMITS;
        if self.min_frame_rate < lo
            || self.max_frame_rate > hi
            || self.min_frame_rate > self.max_frame_rate
        {
            return Err(GemsError::InvalidConfig(format!(
                "frame rate limits {}..{} outside {}..{}",
                self.min_frame_rate, self.max_frame_rate, lo, hi
            )));
        }
        if !(self.min_frame_rate..=self.max_frame_rate).contains(&self.default_frame_rate) {
            return Err(GemsError::InvalidConfig(format!(
                "default frame rate {} outside limits",
                self.default_frame_rate
            )));
        }
        if self.progress_steps == 0 {
            return Err(GemsError::InvalidConfig("progress steps must be positive".into()));
        }
        Ok(())
    }

    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms)
    }

    /// Parse frame rate input and clamp it to the limits
    pub fn parse_frame_rate(&self, text: &str) -> GemsResult<u32> {
        let fps: i64 = text
            .trim()
            .parse()
            .map_err(|_| GemsError::InvalidFrameRate(text.to_string()))?;
        let clamped = fps
            .max(self.min_frame_rate as i64)
            .min(self.max_frame_rate as i64)
            .max(0);
        Ok(clamped as u32)
    }
}

/// Clip that would be recorded
#[derive(Clone, Debug, PartialEq)]
pub struct ClipInfo {
    pub name: String,
    pub length: Duration,
}

impl ClipInfo {
    pub fn new(name: impl Into<String>, length: Duration) -> Self {
        ClipInfo {
            name: name.into(),
            length,
        }
    }
}

/// Settings one capture runs with
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureSettings {
    pub frame_rate: u32,
    pub width: u32,
    pub height: u32,
    pub record_length: Duration,
    /// Output file stem: clip name without the motion suffix
    pub output_name: String,
}

impl CaptureSettings {
    /// Frames a full clip produces
    pub fn frame_count(&self) -> u64 {
        (self.record_length.as_secs_f64() * self.frame_rate as f64).ceil() as u64
    }
}

/// What the user asked for when pressing record
#[derive(Clone, Debug, PartialEq)]
pub struct RecordRequest<'a> {
    pub frame_rate_text: &'a str,
    pub double_resolution: bool,
    /// Screen size in pixels
    pub screen: (u32, u32),
}

/// Recording phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordingPhase {
    Idle,
    Capturing { completed_steps: u32 },
    Saving,
}

/// Recording session state
#[derive(Clone, Debug)]
pub struct RecordingSession {
    config: RecordingConfig,
    phase: RecordingPhase,
    phase_elapsed: Duration,
    step_interval: Duration,
    frame_rate_text: String,
    skip_next_frame: bool,
    settings: Option<CaptureSettings>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::idle(RecordingConfig::default())
    }

    /// Session for a validated config
    pub fn with_config(config: RecordingConfig) -> GemsResult<Self> {
        config.validate()?;
        Ok(Self::idle(config))
    }

    fn idle(config: RecordingConfig) -> Self {
        RecordingSession {
            frame_rate_text: config.default_frame_rate.to_string(),
            config,
            phase: RecordingPhase::Idle,
            phase_elapsed: Duration::ZERO,
            step_interval: Duration::ZERO,
            skip_next_frame: false,
            settings: None,
        }
    }

    pub fn phase(&self) -> RecordingPhase {
        self.phase
    }

    pub fn is_recording(&self) -> bool {
        self.phase != RecordingPhase::Idle
    }

    /// Frame rate input text, normalised after each start
    pub fn frame_rate_text(&self) -> &str {
        &self.frame_rate_text
    }

    /// Settings of the running (or last) capture
    pub fn settings(&self) -> Option<&CaptureSettings> {
        self.settings.as_ref()
    }

    /// Start recording `clip`
    pub fn start(
        &mut self,
        request: &RecordRequest<'_>,
        clip: Option<&ClipInfo>,
    ) -> GemsResult<&CaptureSettings> {
        if self.is_recording() {
            return Err(GemsError::AlreadyRecording);
        }
        let clip = clip.ok_or(GemsError::NoMotionLoaded)?;

        let frame_rate = self.config.parse_frame_rate(request.frame_rate_text)?;
        self.frame_rate_text = frame_rate.to_string();

        let multiplier = if request.double_resolution { 2 } else { 1 };
        let settings = CaptureSettings {
            frame_rate,
            width: request.screen.0 * multiplier,
            height: request.screen.1 * multiplier,
            record_length: clip.length,
            output_name: clip
                .name
                .strip_suffix(MOTION_SUFFIX)
                .unwrap_or(&clip.name)
                .to_string(),
        };

        self.step_interval = clip.length / self.config.progress_steps.max(1);
        self.phase = RecordingPhase::Capturing { completed_steps: 0 };
        self.phase_elapsed = Duration::ZERO;
        self.skip_next_frame = true;

        info!(
            clip = %settings.output_name,
            fps = settings.frame_rate,
            width = settings.width,
            height = settings.height,
            frames = settings.frame_count(),
            "Recording started"
        );
        Ok(&*self.settings.insert(settings))
    }

    /// Whether the host should write the frame it just rendered.
    /// The first frame after start still shows the previous animation.
    pub fn should_capture_frame(&mut self) -> bool {
        if !matches!(self.phase, RecordingPhase::Capturing { .. }) {
            return false;
        }
        !std::mem::take(&mut self.skip_next_frame)
    }

    /// Advance progress by one frame delta
    pub fn advance(&mut self, dt: Duration) {
        if self.phase == RecordingPhase::Idle {
            return;
        }
        self.phase_elapsed += dt;

        loop {
            match self.phase {
                RecordingPhase::Idle => break,
                RecordingPhase::Capturing { completed_steps } => {
                    if completed_steps > self.config.progress_steps {
                        self.phase = RecordingPhase::Saving;
                        debug!("Recording saving");
                        continue;
                    }
                    if self.phase_elapsed < self.step_interval {
                        break;
                    }
                    self.phase_elapsed -= self.step_interval;
                    self.phase = RecordingPhase::Capturing {
                        completed_steps: completed_steps + 1,
                    };
                }
                RecordingPhase::Saving => {
                    if self.phase_elapsed >= self.config.save_delay() {
                        self.phase = RecordingPhase::Idle;
                        self.phase_elapsed = Duration::ZERO;
                        info!("Recording finished");
                    }
                    break;
                }
            }
        }
    }

    /// Record button label
    pub fn progress_text(&self) -> String {
        match self.phase {
            RecordingPhase::Idle | RecordingPhase::Capturing { completed_steps: 0 } => {
                IDLE_LABEL.to_string()
            }
            RecordingPhase::Capturing { completed_steps } => {
                let percent = (completed_steps - 1) * 100 / self.config.progress_steps;
                format!("Progress: {}%", percent)
            }
            RecordingPhase::Saving => SAVING_LABEL.to_string(),
        }
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}
