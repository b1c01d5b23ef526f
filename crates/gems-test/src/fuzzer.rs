//! Override Fuzzer - randomized frame scripts against the viewer
//!
//! Each frame the fuzzer animates the model, then plays user actions
//! (drags, override toggles, reset buttons) and ends the frame. After the
//! pass and the event loop it checks:
//! - Overridden fields hold their override value in the model
//! - A reset frame puts every field of the panel back to its default
//! - Followed fields keep the animated value
//! - Readouts match the model value
//! - Echoes are never taken for user edits

use std::collections::HashMap;
use std::time::Duration;

use gems_core::{format_readout, FieldId, FieldKind, ModelAccess, ModelSnapshot};
use gems_runtime::Viewer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{EchoControl, UiHarness};

const FRAME: Duration = Duration::from_millis(16);

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct FuzzerConfig {
    pub parameter_count: usize,
    pub part_count: usize,
    pub frames: usize,
    /// Probability a field is animated in a frame
    pub animate_prob: f64,
    /// Probability of a user drag per frame
    pub drag_prob: f64,
    /// Probability of an override toggle per frame
    pub toggle_prob: f64,
    /// Probability of pressing a panel's reset button per frame
    pub reset_prob: f64,
    /// Probability of pressing a panel's override reset button per frame
    pub release_prob: f64,
    pub seed: u64,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        FuzzerConfig {
            parameter_count: 20,
            part_count: 10,
            frames: 500,
            animate_prob: 0.5,
            drag_prob: 0.3,
            toggle_prob: 0.1,
            reset_prob: 0.02,
            release_prob: 0.01,
            seed: 42,
        }
    }
}

impl FuzzerConfig {
    /// Quick run for unit tests
    pub fn light() -> Self {
        FuzzerConfig {
            parameter_count: 5,
            part_count: 3,
            frames: 100,
            ..FuzzerConfig::default()
        }
    }

    /// Long run with busy users
    pub fn heavy() -> Self {
        FuzzerConfig {
            parameter_count: 60,
            part_count: 30,
            frames: 5000,
            drag_prob: 0.8,
            toggle_prob: 0.3,
            reset_prob: 0.05,
            release_prob: 0.02,
            ..FuzzerConfig::default()
        }
    }
}

/// Fuzzing outcome
#[derive(Clone, Debug, Default)]
pub struct FuzzResult {
    pub frames: usize,
    pub drags: u32,
    pub toggles: u32,
    pub resets: u32,
    pub echoes: u32,
    /// Event loop notifications taken for user edits
    pub misread_echoes: u32,
    pub violations: Vec<String>,
}

impl FuzzResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty() && self.misread_echoes == 0
    }
}

/// Randomized override fuzzer
pub struct OverrideFuzzer {
    config: FuzzerConfig,
    rng: StdRng,
    model: ModelSnapshot,
    viewer: Viewer<EchoControl>,
    ui: UiHarness,
    /// Expected override value per overridden field
    expected: HashMap<(FieldKind, FieldId), f32>,
}

impl OverrideFuzzer {
    pub fn new(config: FuzzerConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let model = random_model(&mut rng, config.parameter_count, config.part_count);
        OverrideFuzzer {
            config,
            rng,
            model,
            viewer: Viewer::new(),
            ui: UiHarness::new(),
            expected: HashMap::new(),
        }
    }

    pub fn run(&mut self) -> FuzzResult {
        let mut result = FuzzResult::default();
        if let Err(e) = self.ui.load(&mut self.viewer, &self.model) {
            result.violations.push(format!("model load failed: {}", e));
            return result;
        }

        for frame in 0..self.config.frames {
            let animated = self.animate();
            self.user_actions(&mut result);

            let mut reset = Vec::new();
            for kind in [FieldKind::Parameter, FieldKind::PartOpacity] {
                if self.rng.gen_bool(self.config.reset_prob) {
                    self.viewer.request_reset_all(kind);
                    reset.push(kind);
                    result.resets += 1;
                }
                if self.rng.gen_bool(self.config.release_prob) {
                    self.viewer.reset_overrides(kind);
                    self.expected.retain(|(k, _), _| *k != kind);
                }
            }

            self.viewer.end_frame(&mut self.model, FRAME);
            let pumped = self.ui.pump(&mut self.viewer);
            result.echoes += pumped.echoes;
            result.misread_echoes += pumped.user_edits;
            if pumped.rejected > 0 {
                result
                    .violations
                    .push(format!("frame {}: {} notifications rejected", frame, pumped.rejected));
            }

            self.check_frame(frame, &animated, &reset, &mut result);
            result.frames += 1;
        }
        result
    }

    /// Host animation: random in-bounds writes
    fn animate(&mut self) -> HashMap<(FieldKind, usize), f32> {
        let mut written = HashMap::new();
        for kind in [FieldKind::Parameter, FieldKind::PartOpacity] {
            for slot in 0..self.model.field_count(kind) {
                if !self.rng.gen_bool(self.config.animate_prob) {
                    continue;
                }
                let bounds = self
                    .viewer
                    .panel(kind)
                    .fields()
                    .iter()
                    .nth(slot)
                    .map(|e| e.field.bounds());
                if let Some(bounds) = bounds {
                    let value = self.rng.gen_range(bounds.min..=bounds.max);
                    self.model.write(kind, slot, value);
                    written.insert((kind, slot), value);
                }
            }
        }
        written
    }

    fn user_actions(&mut self, result: &mut FuzzResult) {
        if self.rng.gen_bool(self.config.drag_prob) {
            if let Some((kind, id)) = self.pick_field() {
                let bounds = self.viewer.panel(kind).field(id).map(|f| f.bounds());
                if let Ok(bounds) = bounds {
                    let value = self.rng.gen_range(bounds.min..=bounds.max);
                    match self.ui.drag(&mut self.viewer, kind, id, value) {
                        Ok(_) => {
                            self.expected.insert((kind, id), value);
                            result.drags += 1;
                        }
                        Err(e) => result.violations.push(format!("drag failed: {}", e)),
                    }
                }
            }
        }

        if self.rng.gen_bool(self.config.toggle_prob) {
            if let Some((kind, id)) = self.pick_field() {
                let current = self
                    .viewer
                    .panel(kind)
                    .field(id)
                    .map(|f| (f.is_override_active(), f.slot()));
                if let Ok((active, slot)) = current {
                    // Turning on freezes whatever the animation wrote this frame
                    let frozen = self.model.read(kind, slot);
                    let toggled = self
                        .viewer
                        .set_override_active(&self.model, kind, id, !active);
                    if toggled.is_ok() {
                        if active {
                            self.expected.remove(&(kind, id));
                        } else {
                            self.expected.insert((kind, id), frozen);
                        }
                        result.toggles += 1;
                    }
                }
            }
        }
    }

    fn pick_field(&mut self) -> Option<(FieldKind, FieldId)> {
        let kind = if self.rng.gen_bool(0.5) {
            FieldKind::Parameter
        } else {
            FieldKind::PartOpacity
        };
        let count = self.viewer.panel(kind).fields().len();
        if count == 0 {
            return None;
        }
        let slot = self.rng.gen_range(0..count);
        self.viewer.panel(kind).fields().ids().nth(slot).map(|id| (kind, id))
    }

    fn check_frame(
        &mut self,
        frame: usize,
        animated: &HashMap<(FieldKind, usize), f32>,
        reset: &[FieldKind],
        result: &mut FuzzResult,
    ) {
        for kind in [FieldKind::Parameter, FieldKind::PartOpacity] {
            let was_reset = reset.contains(&kind);
            let panel = self.viewer.panel(kind);

            for (id, entry) in panel.fields().ids().zip(panel.fields().iter()) {
                let field = &entry.field;
                let in_model = self.model.read(kind, field.slot());

                let expected = if was_reset {
                    if field.is_override_active() {
                        self.expected.insert((kind, id), field.default_value());
                    }
                    Some(field.default_value())
                } else if field.is_override_active() {
                    self.expected.get(&(kind, id)).copied()
                } else {
                    animated.get(&(kind, field.slot())).copied()
                };

                if let Some(expected) = expected {
                    if in_model != expected {
                        result.violations.push(format!(
                            "frame {}: {} {} is {}, expected {}",
                            frame,
                            kind,
                            field.name(),
                            in_model,
                            expected
                        ));
                    }
                }

                if field.is_pending_external_write() {
                    result.violations.push(format!(
                        "frame {}: {} {} still waits for an echo",
                        frame,
                        kind,
                        field.name()
                    ));
                }

                let readout = self.ui.readout(kind, field.name());
                if readout.as_deref() != Some(format_readout(in_model).as_str()) {
                    result.violations.push(format!(
                        "frame {}: {} {} readout {:?} for value {}",
                        frame,
                        kind,
                        field.name(),
                        readout,
                        in_model
                    ));
                }
            }
        }
    }
}

/// Model with random bounds and defaults
pub fn random_model(rng: &mut StdRng, parameters: usize, parts: usize) -> ModelSnapshot {
    let mut model = ModelSnapshot::new();
    for i in 0..parameters {
        let min = rng.gen_range(-100.0f32..0.0);
        let max = rng.gen_range(0.0f32..=100.0);
        let default = rng.gen_range(min..=max);
        model = model.with_parameter(&format!("Param{}", i), min, max, default);
    }
    for i in 0..parts {
        let opacity = rng.gen_range(0.0f32..=1.0);
        model = model.with_part(&format!("Part{}", i), opacity);
    }
    model
}
