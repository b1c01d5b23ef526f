//! Headless UI harness
//!
//! `EchoControl` behaves like a toolkit slider: moving it programmatically
//! queues a change notification instead of calling back synchronously. The
//! harness drains that queue into the viewer, the way an event loop would.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use gems_core::{FieldId, FieldKind, GemsResult, ModelAccess};
use gems_runtime::Viewer;
use gems_state::{DisplayControl, FieldDescriptor, Observation};
use parking_lot::Mutex;

/// Change notification raised by a slider
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Notification {
    pub kind: FieldKind,
    pub id: FieldId,
    pub value: f32,
}

/// What a slider row currently shows
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlLog {
    pub value: f32,
    pub readout: String,
    pub override_indicator: bool,
    pub min_label: String,
    pub max_label: String,
    /// Programmatic moves that changed the value
    pub writes: u32,
}

type EventQueue = Arc<Mutex<VecDeque<Notification>>>;

/// Slider control bound to one field
#[derive(Clone, Debug)]
pub struct EchoControl {
    kind: FieldKind,
    id: FieldId,
    log: Arc<Mutex<ControlLog>>,
    events: EventQueue,
}

impl EchoControl {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn log(&self) -> ControlLog {
        self.log.lock().clone()
    }
}

impl DisplayControl for EchoControl {
    fn set_value(&mut self, value: f32) -> bool {
        let mut log = self.log.lock();
        if log.value == value {
            return false;
        }
        log.value = value;
        log.writes += 1;
        self.events.lock().push_back(Notification {
            kind: self.kind,
            id: self.id,
            value,
        });
        true
    }

    fn set_readout(&mut self, text: &str) {
        self.log.lock().readout = text.to_string();
    }

    fn set_override_indicator(&mut self, on: bool) {
        self.log.lock().override_indicator = on;
    }

    fn set_bounds_labels(&mut self, min: &str, max: &str) {
        let mut log = self.log.lock();
        log.min_label = min.to_string();
        log.max_label = max.to_string();
    }
}

/// Notification delivery counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub echoes: u32,
    pub user_edits: u32,
    /// Notifications for fields of an earlier model load
    pub rejected: u32,
}

#[derive(Default)]
struct UiState {
    rows: HashMap<(FieldKind, String), Arc<Mutex<ControlLog>>>,
}

/// Slider panels of one window plus their event queue
#[derive(Clone, Default)]
pub struct UiHarness {
    state: Arc<Mutex<UiState>>,
    events: EventQueue,
}

impl UiHarness {
    pub fn new() -> Self {
        UiHarness::default()
    }

    /// Control binder for `Viewer::load_model`. Rows of a previous model
    /// with the same name are replaced.
    pub fn binder(&self, kind: FieldKind) -> impl FnMut(&FieldDescriptor<'_>) -> EchoControl {
        let state = Arc::clone(&self.state);
        let events = Arc::clone(&self.events);
        move |descriptor: &FieldDescriptor<'_>| {
            let log = Arc::new(Mutex::new(ControlLog::default()));
            state
                .lock()
                .rows
                .insert((kind, descriptor.name.to_string()), Arc::clone(&log));
            EchoControl {
                kind,
                id: descriptor.id,
                log,
                events: Arc::clone(&events),
            }
        }
    }

    /// Load a model into the viewer with controls from this harness and
    /// deliver the notifications priming raised
    pub fn load<M>(&self, viewer: &mut Viewer<EchoControl>, model: &M) -> GemsResult<PumpStats>
    where
        M: ModelAccess + ?Sized,
    {
        viewer.load_model(
            model,
            self.binder(FieldKind::Parameter),
            self.binder(FieldKind::PartOpacity),
        )?;
        Ok(self.pump(viewer))
    }

    pub fn pending_notifications(&self) -> usize {
        self.events.lock().len()
    }

    /// Deliver queued notifications in order
    pub fn pump(&self, viewer: &mut Viewer<EchoControl>) -> PumpStats {
        let mut stats = PumpStats::default();
        loop {
            // Released before observe so controls can queue more
            let next = self.events.lock().pop_front();
            let Some(n) = next else { break };
            match viewer.observe(n.kind, n.id, n.value) {
                Ok(Observation::Echo) => stats.echoes += 1,
                Ok(Observation::UserEdit) => stats.user_edits += 1,
                Err(_) => stats.rejected += 1,
            }
        }
        stats
    }

    /// User drags a slider to `value`. The slider cannot leave the
    /// field's range, so the value is clamped first.
    pub fn drag(
        &self,
        viewer: &mut Viewer<EchoControl>,
        kind: FieldKind,
        id: FieldId,
        value: f32,
    ) -> GemsResult<Observation> {
        let (row, value) = viewer
            .panel(kind)
            .field(id)
            .map(|f| ((kind, f.name().to_string()), f.bounds().clamp(value)))?;
        if let Some(log) = self.state.lock().rows.get(&row) {
            log.lock().value = value;
        }
        viewer.observe(kind, id, value)
    }

    /// Current row display for a field name
    pub fn row(&self, kind: FieldKind, name: &str) -> Option<ControlLog> {
        self.state
            .lock()
            .rows
            .get(&(kind, name.to_string()))
            .map(|log| log.lock().clone())
    }

    pub fn readout(&self, kind: FieldKind, name: &str) -> Option<String> {
        self.row(kind, name).map(|r| r.readout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gems_core::ModelSnapshot;

    fn model() -> ModelSnapshot {
        ModelSnapshot::new()
            .with_parameter("ParamAngleX", -30.0, 30.0, 0.0)
            .with_part("PartBody", 1.0)
    }

    #[test]
    fn test_load_primes_rows() {
        let ui = UiHarness::new();
        let mut viewer = Viewer::new();
        let stats = ui.load(&mut viewer, &model()).unwrap();

        // Parameter starts at 0, matching a fresh slider; the part does not
        assert_eq!(stats, PumpStats { echoes: 1, user_edits: 0, rejected: 0 });
        assert_eq!(ui.pending_notifications(), 0);

        let angle = ui.row(FieldKind::Parameter, "ParamAngleX").unwrap();
        assert_eq!(angle.readout, "0.00");
        assert_eq!((angle.min_label.as_str(), angle.max_label.as_str()), ("-30", "30"));

        let body = ui.row(FieldKind::PartOpacity, "PartBody").unwrap();
        assert_eq!(body.readout, "1.00");
        assert_eq!(body.min_label, "");
    }

    #[test]
    fn test_control_queues_only_changes() {
        let ui = UiHarness::new();
        let mut bind = ui.binder(FieldKind::Parameter);
        let mut control = bind(&FieldDescriptor {
            id: FieldId::new(0, 1),
            name: "ParamAngleX",
            kind: FieldKind::Parameter,
            bounds: gems_core::Bounds::new(-30.0, 30.0),
            initial_value: 0.0,
        });

        assert!(control.set_value(3.0));
        assert!(!control.set_value(3.0));
        assert_eq!(ui.pending_notifications(), 1);
        assert_eq!(control.log().writes, 1);
    }

    #[test]
    fn test_drag_is_user_edit() {
        let ui = UiHarness::new();
        let mut viewer = Viewer::new();
        ui.load(&mut viewer, &model()).unwrap();
        let angle = viewer.parameters().find("ParamAngleX").unwrap();

        let observed = ui.drag(&mut viewer, FieldKind::Parameter, angle, 7.5).unwrap();
        assert_eq!(observed, Observation::UserEdit);

        let row = ui.row(FieldKind::Parameter, "ParamAngleX").unwrap();
        assert_eq!(row.value, 7.5);
        assert!(row.override_indicator);
    }

    #[test]
    fn test_drag_stops_at_slider_range() {
        let ui = UiHarness::new();
        let mut viewer = Viewer::new();
        let mut m = model();
        ui.load(&mut viewer, &m).unwrap();
        let angle = viewer.parameters().find("ParamAngleX").unwrap();
        let body = viewer.parts().find("PartBody").unwrap();

        ui.drag(&mut viewer, FieldKind::Parameter, angle, 45.0).unwrap();
        ui.drag(&mut viewer, FieldKind::PartOpacity, body, -0.5).unwrap();
        assert_eq!(ui.row(FieldKind::Parameter, "ParamAngleX").unwrap().value, 30.0);

        viewer.end_frame(&mut m, std::time::Duration::from_millis(16));
        assert_eq!(m.value_of("ParamAngleX"), Some(30.0));
        assert_eq!(m.opacity_of("PartBody"), Some(0.0));
    }

    #[test]
    fn test_notifications_from_old_load_rejected() {
        let ui = UiHarness::new();
        let mut viewer = Viewer::new();
        let mut m = model();
        ui.load(&mut viewer, &m).unwrap();

        m.set_parameter_value(0, 4.0);
        viewer.end_frame(&mut m, std::time::Duration::from_millis(16));
        assert_eq!(ui.pending_notifications(), 1);

        // Reload before the event loop delivered the echo
        viewer
            .load_model(&m, ui.binder(FieldKind::Parameter), ui.binder(FieldKind::PartOpacity))
            .unwrap();
        let stats = ui.pump(&mut viewer);
        assert_eq!(stats.rejected, 1);
    }
}
