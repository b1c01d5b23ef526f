//! End-to-end panel scenarios
//!
//! A `ViewerSession` wires a viewer, an in-memory model and the UI harness
//! together and steps them one frame at a time, delivering every control
//! notification before the next frame starts.

use std::time::Duration;

use gems_core::{FieldId, FieldKind, GemsError, GemsResult, ModelAccess, ModelSnapshot};
use gems_runtime::{FrameReport, Viewer};

use crate::{EchoControl, PumpStats, UiHarness};

const FRAME: Duration = Duration::from_millis(16);

/// Model used by the scripted scenarios
pub fn standard_model() -> ModelSnapshot {
    ModelSnapshot::new()
        .with_parameter("ParamAngleX", -30.0, 30.0, 0.0)
        .with_parameter("ParamEyeLOpen", 0.0, 1.0, 1.0)
        .with_parameter("ParamBodyAngleZ", -10.0, 10.0, 0.0)
        .with_part("PartArmL", 1.0)
        .with_part("PartArmR", 0.5)
}

/// What one field shows after a frame
#[derive(Clone, Debug, PartialEq)]
pub struct FieldRecord {
    pub value: f32,
    pub readout: String,
    pub override_active: bool,
}

/// Viewer, model and UI stepped together
pub struct ViewerSession {
    pub model: ModelSnapshot,
    pub viewer: Viewer<EchoControl>,
    pub ui: UiHarness,
}

impl ViewerSession {
    pub fn new(model: ModelSnapshot) -> GemsResult<Self> {
        let mut viewer = Viewer::new();
        let ui = UiHarness::new();
        ui.load(&mut viewer, &model)?;
        Ok(ViewerSession { model, viewer, ui })
    }

    pub fn id(&self, kind: FieldKind, name: &str) -> GemsResult<FieldId> {
        self.viewer
            .panel(kind)
            .find(name)
            .ok_or_else(|| GemsError::UnknownField {
                kind,
                name: name.to_string(),
            })
    }

    /// External animation write
    pub fn animate(&mut self, kind: FieldKind, name: &str, value: f32) -> GemsResult<()> {
        let id = self.id(kind, name)?;
        let slot = self.viewer.panel(kind).field(id)?.slot();
        self.model.write(kind, slot, value);
        Ok(())
    }

    pub fn drag(&mut self, kind: FieldKind, name: &str, value: f32) -> GemsResult<()> {
        let id = self.id(kind, name)?;
        self.ui.drag(&mut self.viewer, kind, id, value).map(|_| ())
    }

    pub fn toggle(&mut self, kind: FieldKind, name: &str, active: bool) -> GemsResult<()> {
        let id = self.id(kind, name)?;
        self.viewer.set_override_active(&self.model, kind, id, active)
    }

    /// End the frame and run the event loop
    pub fn frame(&mut self) -> (Option<FrameReport>, PumpStats) {
        let report = self.viewer.end_frame(&mut self.model, FRAME);
        let pumped = self.ui.pump(&mut self.viewer);
        (report, pumped)
    }

    pub fn record(&self, kind: FieldKind, name: &str) -> GemsResult<FieldRecord> {
        let id = self.id(kind, name)?;
        let field = self.viewer.panel(kind).field(id)?;
        Ok(FieldRecord {
            value: self.model.read(kind, field.slot()),
            readout: self.ui.readout(kind, name).unwrap_or_default(),
            override_active: field.is_override_active(),
        })
    }
}

/// Animate to 15, drag to -10, press reset. Records ParamAngleX after
/// each of the three frames.
pub fn scenario_drag_and_reset() -> GemsResult<Vec<FieldRecord>> {
    let p = FieldKind::Parameter;
    let mut session = ViewerSession::new(standard_model())?;
    let mut records = Vec::new();

    session.animate(p, "ParamAngleX", 15.0)?;
    session.frame();
    records.push(session.record(p, "ParamAngleX")?);

    session.drag(p, "ParamAngleX", -10.0)?;
    session.animate(p, "ParamAngleX", 22.0)?;
    session.frame();
    records.push(session.record(p, "ParamAngleX")?);

    session.viewer.request_reset_all(p);
    session.frame();
    records.push(session.record(p, "ParamAngleX")?);

    Ok(records)
}

/// Freeze a part at its animated opacity while the animation keeps going
pub fn scenario_part_freeze(frames: usize) -> GemsResult<Vec<FieldRecord>> {
    let part = FieldKind::PartOpacity;
    let mut session = ViewerSession::new(standard_model())?;

    session.animate(part, "PartArmL", 0.42)?;
    session.frame();
    session.toggle(part, "PartArmL", true)?;

    let mut records = Vec::with_capacity(frames);
    for i in 0..frames {
        session.animate(part, "PartArmL", (i as f32 * 0.1).fract())?;
        session.frame();
        records.push(session.record(part, "PartArmL")?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const P: FieldKind = FieldKind::Parameter;
    const PART: FieldKind = FieldKind::PartOpacity;

    #[test]
    fn test_drag_and_reset_scenario() {
        let records = scenario_drag_and_reset().unwrap();

        assert_eq!(records[0].value, 15.0);
        assert_eq!(records[0].readout, "15.00");
        assert!(!records[0].override_active);

        assert_eq!(records[1].value, -10.0);
        assert_eq!(records[1].readout, "-10.00");
        assert!(records[1].override_active);

        assert_eq!(records[2].value, 0.0);
        assert_eq!(records[2].readout, "0.00");
        // Reset leaves the override flag alone
        assert!(records[2].override_active);
    }

    #[test]
    fn test_part_freeze_scenario() {
        let records = scenario_part_freeze(10).unwrap();
        for record in records {
            assert_eq!(record.value, 0.42);
            assert_eq!(record.readout, "0.42");
            assert!(record.override_active);
        }
    }

    #[test]
    fn test_toggle_after_animation_freezes_that_frame() {
        let mut session = ViewerSession::new(standard_model()).unwrap();
        session.animate(PART, "PartArmR", 0.1).unwrap();
        session.frame();

        session.animate(PART, "PartArmR", 0.42).unwrap();
        session.toggle(PART, "PartArmR", true).unwrap();
        for i in 0..5 {
            session.animate(PART, "PartArmR", i as f32 * 0.2).unwrap();
            session.frame();
            let record = session.record(PART, "PartArmR").unwrap();
            assert_eq!(record.value, 0.42);
            assert_eq!(record.readout, "0.42");
        }
    }

    #[test]
    fn test_reset_is_one_shot() {
        let mut session = ViewerSession::new(standard_model()).unwrap();
        session.animate(P, "ParamEyeLOpen", 0.3).unwrap();
        session.viewer.request_reset_all(P);
        let (report, _) = session.frame();
        assert_eq!(report.unwrap().parameters.reset, 3);
        assert_eq!(session.record(P, "ParamEyeLOpen").unwrap().value, 1.0);

        session.animate(P, "ParamEyeLOpen", 0.3).unwrap();
        let (report, _) = session.frame();
        assert_eq!(report.unwrap().parameters.reset, 0);
        assert_eq!(session.record(P, "ParamEyeLOpen").unwrap().value, 0.3);
    }

    #[test]
    fn test_echoes_never_turn_on_override() {
        let mut session = ViewerSession::new(standard_model()).unwrap();
        for i in 0..20 {
            session.animate(P, "ParamAngleX", i as f32).unwrap();
            session.animate(PART, "PartArmR", i as f32 / 20.0).unwrap();
            let (_, pumped) = session.frame();
            assert_eq!(pumped.user_edits, 0);
            assert_eq!(pumped.rejected, 0);
        }
        assert_eq!(session.viewer.parameters().fields().overridden_count(), 0);
        assert_eq!(session.viewer.parts().fields().overridden_count(), 0);
    }

    #[test]
    fn test_release_overrides_follows_animation() {
        let mut session = ViewerSession::new(standard_model()).unwrap();
        session.drag(P, "ParamAngleX", 5.0).unwrap();
        session.drag(P, "ParamBodyAngleZ", -5.0).unwrap();
        session.frame();

        assert_eq!(session.viewer.reset_overrides(P), 2);
        session.animate(P, "ParamAngleX", 12.0).unwrap();
        session.frame();

        let record = session.record(P, "ParamAngleX").unwrap();
        assert_eq!(record.value, 12.0);
        assert!(!record.override_active);
        let row = session.ui.row(P, "ParamAngleX").unwrap();
        assert!(!row.override_indicator);
        assert_eq!(row.value, 12.0);
    }

    #[test]
    fn test_reload_rejects_old_handles() {
        let mut session = ViewerSession::new(standard_model()).unwrap();
        let old = session.id(P, "ParamAngleX").unwrap();

        let model = session.model.clone();
        session.ui.load(&mut session.viewer, &model).unwrap();
        assert!(matches!(
            session.viewer.observe(P, old, 1.0),
            Err(GemsError::StaleField { .. })
        ));
        assert!(session.id(P, "ParamAngleX").is_ok());
    }

    #[test]
    fn test_unknown_field_name() {
        let session = ViewerSession::new(standard_model()).unwrap();
        assert!(matches!(
            session.id(PART, "PartTail"),
            Err(GemsError::UnknownField { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_override_or_follow_never_blends(
            script in prop::collection::vec((-30.0f32..=30.0, prop::option::of(-30.0f32..=30.0)), 1..40)
        ) {
            let mut session = ViewerSession::new(standard_model()).unwrap();
            let mut held: Option<f32> = None;

            for (animated, drag) in script {
                session.animate(P, "ParamAngleX", animated).unwrap();
                if let Some(value) = drag {
                    session.drag(P, "ParamAngleX", value).unwrap();
                    held = Some(value);
                }
                session.frame();

                let record = session.record(P, "ParamAngleX").unwrap();
                match held {
                    Some(value) => prop_assert_eq!(record.value, value),
                    None => prop_assert_eq!(record.value, animated),
                }
            }
        }
    }
}
