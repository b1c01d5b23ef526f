//! Override reconciliation pipeline

use gems_core::{format_readout, Bounds, FieldId, FieldKind, GemsResult, ModelAccess};
use tracing::{debug, info, trace, warn};

use crate::{BoundField, DisplayControl, FieldSet, Observation, Resolution, TrackedField};

/// Field as handed to the host when binding controls at load
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldDescriptor<'a> {
    pub id: FieldId,
    pub name: &'a str,
    pub kind: FieldKind,
    pub bounds: Bounds,
    pub initial_value: f32,
}

/// Reconciliation result for one pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub reset: u32,
    pub overridden: u32,
    pub followed: u32,
    /// Control writes whose change notification is still expected
    pub echoes_armed: u32,
}

impl PassSummary {
    pub fn total(&self) -> u32 {
        self.reset + self.overridden + self.followed
    }

    pub fn merge(self, other: PassSummary) -> PassSummary {
        PassSummary {
            reset: self.reset + other.reset,
            overridden: self.overridden + other.overridden,
            followed: self.followed + other.followed,
            echoes_armed: self.echoes_armed + other.echoes_armed,
        }
    }
}

/// Override reconciliation engine for one panel (parameters or parts)
pub struct OverrideEngine<C> {
    fields: FieldSet<C>,
    /// One-shot; sampled once at pass start
    reset_requested: bool,
}

impl<C: DisplayControl> OverrideEngine<C> {
    pub fn new(kind: FieldKind) -> Self {
        OverrideEngine {
            fields: FieldSet::new(kind),
            reset_requested: false,
        }
    }

    /// Engine for the parameter panel
    pub fn parameters() -> Self {
        Self::new(FieldKind::Parameter)
    }

    /// Engine for the part opacity panel
    pub fn parts() -> Self {
        Self::new(FieldKind::PartOpacity)
    }

    pub fn kind(&self) -> FieldKind {
        self.fields.kind()
    }

    pub fn fields(&self) -> &FieldSet<C> {
        &self.fields
    }

    pub fn field(&self, id: FieldId) -> GemsResult<&TrackedField> {
        self.fields.get(id).map(|e| &e.field)
    }

    pub fn control(&self, id: FieldId) -> GemsResult<&C> {
        self.fields.get(id).map(|e| &e.control)
    }

    pub fn control_mut(&mut self, id: FieldId) -> GemsResult<&mut C> {
        self.fields.get_mut(id).map(|e| &mut e.control)
    }

    pub fn find(&self, name: &str) -> Option<FieldId> {
        self.fields.find(name)
    }

    pub fn reset_requested(&self) -> bool {
        self.reset_requested
    }

    /// Rebuild the field set for a newly loaded model.
    ///
    /// `bind` is called once per field, in model order, and returns the
    /// control for it. On error the previous set is kept.
    pub fn load_model<M, F>(&mut self, model: &M, mut bind: F) -> GemsResult<usize>
    where
        M: ModelAccess + ?Sized,
        F: FnMut(&FieldDescriptor<'_>) -> C,
    {
        let kind = self.kind();
        let fields = collect_fields(model, kind)?;

        let mut entries = Vec::with_capacity(fields.len());
        for (index, field) in fields.into_iter().enumerate() {
            let descriptor = FieldDescriptor {
                id: self.fields.next_id(index),
                name: field.name(),
                kind,
                bounds: field.bounds(),
                initial_value: field.current_value(),
            };
            let control = bind(&descriptor);
            entries.push(BoundField { field, control });
        }

        for entry in entries.iter_mut() {
            prime(entry);
        }

        let count = entries.len();
        let generation = self.fields.install(entries);
        self.reset_requested = false;

        info!(kind = %kind, fields = count, generation, "Model fields loaded");
        Ok(count)
    }

    /// Discard all fields (component teardown)
    pub fn unload(&mut self) {
        self.fields.clear();
        self.reset_requested = false;
    }

    /// Change notification from a field's control
    pub fn observe(&mut self, id: FieldId, value: f32) -> GemsResult<Observation> {
        let entry = self.fields.get_mut(id).map_err(|e| {
            warn!(error = %e, "Dropping control notification");
            e
        })?;

        let observation = entry.field.observe(value);
        if observation == Observation::UserEdit {
            entry.control.set_override_indicator(true);
            debug!(field = entry.field.name(), value, "Override by user edit");
        }
        Ok(observation)
    }

    /// Explicit override toggle. Turning on freezes the value the model
    /// holds right now, including writes made since the last pass.
    pub fn set_override_active<M: ModelAccess + ?Sized>(
        &mut self,
        model: &M,
        id: FieldId,
        active: bool,
    ) -> GemsResult<()> {
        let entry = self.fields.get_mut(id)?;
        let external = model.read(entry.field.kind(), entry.field.slot());
        entry.field.set_override_active(active, external);
        entry.control.set_override_indicator(active);
        debug!(field = entry.field.name(), active, value = external, "Override toggled");
        Ok(())
    }

    /// Schedule a reset of every field to its default at the next pass.
    /// Ignored while no model is loaded.
    pub fn request_reset_all(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.reset_requested = true;
        debug!(kind = %self.kind(), "Reset requested");
    }

    /// Turn override off on every field, as if each toggle were unticked.
    /// Returns how many fields left override mode.
    pub fn reset_overrides(&mut self) -> usize {
        let mut released = 0;
        for entry in self.fields.iter_mut() {
            if entry.field.is_override_active() {
                released += 1;
            }
            entry.field.release_override();
            entry.control.set_override_indicator(false);
        }
        debug!(kind = %self.kind(), released, "Overrides reset");
        released
    }

    /// Run the reconciliation pass for this frame.
    ///
    /// Must run once per frame, after the external system has written its
    /// values for the frame.
    pub fn reconcile<M: ModelAccess + ?Sized>(&mut self, model: &mut M) -> PassSummary {
        let reset = std::mem::take(&mut self.reset_requested);
        let mut summary = PassSummary::default();

        for entry in self.fields.iter_mut() {
            let BoundField { field, control } = entry;
            let slot = field.slot();
            let external = model.read(field.kind(), slot);

            match field.resolve(external, reset) {
                Resolution::Reset => {
                    model.write(field.kind(), slot, field.current_value());
                    let echo = control.set_value(field.current_value());
                    field.arm_echo(echo);
                    control.set_readout(&format_readout(field.current_value()));
                    summary.reset += 1;
                    summary.echoes_armed += echo as u32;
                }
                Resolution::Override => {
                    model.write(field.kind(), slot, field.override_value());
                    control.set_readout(&format_readout(field.override_value()));
                    summary.overridden += 1;
                }
                Resolution::Follow => {
                    let echo = control.set_value(field.current_value());
                    field.arm_echo(echo);
                    control.set_readout(&format_readout(field.current_value()));
                    summary.followed += 1;
                    summary.echoes_armed += echo as u32;
                }
            }
        }

        trace!(
            kind = %self.kind(),
            reset = summary.reset,
            overridden = summary.overridden,
            followed = summary.followed,
            "Reconciliation pass"
        );
        summary
    }
}

/// Build fresh fields for every attribute of `kind` on the model
fn collect_fields<M: ModelAccess + ?Sized>(
    model: &M,
    kind: FieldKind,
) -> GemsResult<Vec<TrackedField>> {
    let count = model.field_count(kind);
    let mut fields = Vec::with_capacity(count);

    for slot in 0..count {
        let current = model.read(kind, slot);
        let field = match kind {
            FieldKind::Parameter => {
                let Some(info) = model.parameter(slot) else {
                    warn!(kind = %kind, slot, "Skipping slot without descriptor");
                    continue;
                };
                let bounds = Bounds::validated(info.id, info.min, info.max, info.default)?;
                TrackedField::new(info.id, kind, slot, bounds, info.default, current)
            }
            FieldKind::PartOpacity => {
                let Some(name) = model.part_id(slot) else {
                    warn!(kind = %kind, slot, "Skipping slot without descriptor");
                    continue;
                };
                // Parts have no declared default: the load-time opacity is it
                TrackedField::new(name, kind, slot, Bounds::OPACITY, current, current)
            }
        };
        fields.push(field);
    }

    Ok(fields)
}

/// Show the load-time state on a freshly bound control
fn prime<C: DisplayControl>(entry: &mut BoundField<C>) {
    let BoundField { field, control } = entry;
    if field.kind() == FieldKind::Parameter {
        let (min, max) = field.bounds().labels();
        control.set_bounds_labels(&min, &max);
    }
    let echo = control.set_value(field.current_value());
    field.arm_echo(echo);
    control.set_readout(&format_readout(field.current_value()));
    control.set_override_indicator(false);
}
