//! Viewer - the runtime entity owning both slider panels and playback state

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use gems_core::{FieldId, FieldKind, GemsResult, ModelAccess};
use gems_playback::{
    CaptureSettings, ClipInfo, MotionSelector, PhysicsToggle, PlaybackSpeed, RecordRequest,
    RecordingSession,
};
use gems_state::{DisplayControl, FieldDescriptor, Observation, OverrideEngine, PassSummary};
use parking_lot::Mutex;
use tracing::{debug, info, trace};

use crate::ViewerConfig;

/// Viewer shared with UI callbacks arriving on other threads
pub type SharedViewer<C> = Arc<Mutex<Viewer<C>>>;

#[derive(Clone, Debug, Default)]
pub struct ViewerStats {
    pub frames: u64,
    /// Frames ended while no model was loaded
    pub skipped_frames: u64,
    pub models_loaded: u64,
    pub user_edits: u64,
    pub echoes_suppressed: u64,
    pub rejected_notifications: u64,
    pub fields_reset: u64,
    pub last_frame_duration: Duration,
}

/// Field counts of a loaded model
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModelSummary {
    pub parameters: usize,
    pub parts: usize,
}

/// Reconciliation results of one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub parameters: PassSummary,
    pub parts: PassSummary,
}

impl FrameReport {
    pub fn combined(&self) -> PassSummary {
        self.parameters.merge(self.parts)
    }
}

/// Viewer state for one window
pub struct Viewer<C> {
    config: ViewerConfig,
    parameters: OverrideEngine<C>,
    parts: OverrideEngine<C>,
    speed: PlaybackSpeed,
    motions: MotionSelector,
    recording: RecordingSession,
    physics: PhysicsToggle,
    model_loaded: bool,
    stats: ViewerStats,
}

impl<C: DisplayControl> Viewer<C> {
    pub fn new() -> Self {
        Viewer {
            parameters: OverrideEngine::parameters(),
            parts: OverrideEngine::parts(),
            speed: PlaybackSpeed::new(),
            motions: MotionSelector::new(),
            recording: RecordingSession::new(),
            physics: PhysicsToggle::new(),
            model_loaded: false,
            stats: ViewerStats::default(),
            config: ViewerConfig::default(),
        }
    }

    /// Viewer for a loaded config. Invalid configs are rejected.
    pub fn with_config(config: ViewerConfig) -> GemsResult<Self> {
        config.validate()?;
        Ok(Viewer {
            speed: PlaybackSpeed::with_config(config.speed.clone())?,
            recording: RecordingSession::with_config(config.recording.clone())?,
            config,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn stats(&self) -> &ViewerStats {
        &self.stats
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model_loaded
    }

    pub fn into_shared(self) -> SharedViewer<C> {
        Arc::new(Mutex::new(self))
    }

    /// Rebuild both panels for a newly loaded model.
    ///
    /// The binders create the control for each field, in model order.
    /// Loading a model also clears the motion playlist and resets the
    /// physics toggle.
    pub fn load_model<M, P, Q>(
        &mut self,
        model: &M,
        bind_parameter: P,
        bind_part: Q,
    ) -> GemsResult<ModelSummary>
    where
        M: ModelAccess + ?Sized,
        P: FnMut(&FieldDescriptor<'_>) -> C,
        Q: FnMut(&FieldDescriptor<'_>) -> C,
    {
        let summary = ModelSummary {
            parameters: self.parameters.load_model(model, bind_parameter)?,
            parts: self.parts.load_model(model, bind_part)?,
        };

        self.motions.on_new_model();
        self.physics.on_new_model(model.has_physics());
        self.model_loaded = true;
        self.stats.models_loaded += 1;

        info!(
            parameters = summary.parameters,
            parts = summary.parts,
            "Model loaded"
        );
        Ok(summary)
    }

    /// Component teardown: discard all fields
    pub fn unload_model(&mut self) {
        self.parameters.unload();
        self.parts.unload();
        self.motions.on_new_model();
        self.physics.on_model_unloaded();
        self.model_loaded = false;
        debug!("Model unloaded");
    }

    pub fn panel(&self, kind: FieldKind) -> &OverrideEngine<C> {
        match kind {
            FieldKind::Parameter => &self.parameters,
            FieldKind::PartOpacity => &self.parts,
        }
    }

    pub fn panel_mut(&mut self, kind: FieldKind) -> &mut OverrideEngine<C> {
        match kind {
            FieldKind::Parameter => &mut self.parameters,
            FieldKind::PartOpacity => &mut self.parts,
        }
    }

    pub fn parameters(&self) -> &OverrideEngine<C> {
        &self.parameters
    }

    pub fn parts(&self) -> &OverrideEngine<C> {
        &self.parts
    }

    /// Change notification from a slider
    pub fn observe(&mut self, kind: FieldKind, id: FieldId, value: f32) -> GemsResult<Observation> {
        let result = self.panel_mut(kind).observe(id, value);
        match result {
            Ok(Observation::Echo) => self.stats.echoes_suppressed += 1,
            Ok(Observation::UserEdit) => self.stats.user_edits += 1,
            Err(_) => self.stats.rejected_notifications += 1,
        }
        result
    }

    /// Override toggle clicked. Turning it on freezes the value the model
    /// holds right now.
    pub fn set_override_active<M: ModelAccess + ?Sized>(
        &mut self,
        model: &M,
        kind: FieldKind,
        id: FieldId,
        active: bool,
    ) -> GemsResult<()> {
        self.panel_mut(kind).set_override_active(model, id, active)
    }

    /// "Reset" button: all fields of the panel back to default next frame
    pub fn request_reset_all(&mut self, kind: FieldKind) {
        self.panel_mut(kind).request_reset_all();
    }

    /// "Reset override" button: release every override of the panel
    pub fn reset_overrides(&mut self, kind: FieldKind) -> usize {
        self.panel_mut(kind).reset_overrides()
    }

    /// End of the mutation phase: reconcile both panels and advance
    /// recording progress. Returns `None` if no model is loaded.
    pub fn end_frame<M: ModelAccess + ?Sized>(
        &mut self,
        model: &mut M,
        dt: Duration,
    ) -> Option<FrameReport> {
        let start = Instant::now();

        if !self.model_loaded {
            self.recording.advance(dt);
            self.stats.skipped_frames += 1;
            return None;
        }

        let report = FrameReport {
            parameters: self.parameters.reconcile(model),
            parts: self.parts.reconcile(model),
        };
        self.recording.advance(dt);

        self.stats.frames += 1;
        self.stats.fields_reset += report.combined().reset as u64;
        self.stats.last_frame_duration = start.elapsed();

        trace!(
            frame = self.stats.frames,
            fields = report.combined().total(),
            "Frame reconciled"
        );
        Some(report)
    }

    pub fn speed(&self) -> &PlaybackSpeed {
        &self.speed
    }

    pub fn speed_mut(&mut self) -> &mut PlaybackSpeed {
        &mut self.speed
    }

    /// Time scale for the host clock this frame
    pub fn time_scale(&self) -> f32 {
        self.speed.time_scale()
    }

    pub fn motions(&self) -> &MotionSelector {
        &self.motions
    }

    pub fn motions_mut(&mut self) -> &mut MotionSelector {
        &mut self.motions
    }

    /// File dropped on the window. Returns the motion to play if a motion
    /// playlist was built.
    pub fn handle_file_drop<I>(&mut self, dropped: &Path, siblings: I) -> Option<PathBuf>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        if !self.motions.handle_file_drop(dropped, siblings) {
            return None;
        }
        self.motions.selected_motion().map(Path::to_path_buf)
    }

    pub fn physics(&self) -> &PhysicsToggle {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsToggle {
        &mut self.physics
    }

    pub fn recording(&self) -> &RecordingSession {
        &self.recording
    }

    pub fn recording_mut(&mut self) -> &mut RecordingSession {
        &mut self.recording
    }

    /// Record button pressed
    pub fn start_recording(
        &mut self,
        request: &RecordRequest<'_>,
        clip: Option<&ClipInfo>,
    ) -> GemsResult<&CaptureSettings> {
        self.recording.start(request, clip)
    }
}

impl<C: DisplayControl> Default for Viewer<C> {
    fn default() -> Self {
        Self::new()
    }
}
