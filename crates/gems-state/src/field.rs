//! Tracked fields and the field set they live in

use gems_core::{Bounds, FieldId, FieldKind, GemsError, GemsResult};

/// How a field's value was decided in a reconciliation pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Reset to the default captured at load
    Reset,
    /// Held at the user's override value
    Override,
    /// Following the value the external system wrote
    Follow,
}

/// What a control change notification turned out to be
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observation {
    /// The control reporting the engine's own write
    Echo,
    /// A genuine user edit; the field is now overridden
    UserEdit,
}

/// One controllable attribute: a model parameter or a part opacity
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedField {
    name: String,
    kind: FieldKind,
    slot: usize,
    bounds: Bounds,
    default_value: f32,
    current_value: f32,
    override_active: bool,
    override_value: f32,
    pending_external_write: bool,
}

impl TrackedField {
    /// Create a field as found at model load
    pub fn new(
        name: impl Into<String>,
        kind: FieldKind,
        slot: usize,
        bounds: Bounds,
        default_value: f32,
        current_value: f32,
    ) -> Self {
        TrackedField {
            name: name.into(),
            kind,
            slot,
            bounds,
            default_value,
            current_value,
            override_active: false,
            override_value: current_value,
            pending_external_write: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Index of the mirrored attribute in the model
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn default_value(&self) -> f32 {
        self.default_value
    }

    pub fn current_value(&self) -> f32 {
        self.current_value
    }

    pub fn is_override_active(&self) -> bool {
        self.override_active
    }

    pub fn override_value(&self) -> f32 {
        self.override_value
    }

    pub fn is_pending_external_write(&self) -> bool {
        self.pending_external_write
    }

    /// Handle a change notification from the bound control
    pub fn observe(&mut self, value: f32) -> Observation {
        if self.pending_external_write {
            self.pending_external_write = false;
            Observation::Echo
        } else {
            self.override_active = true;
            self.override_value = value;
            Observation::UserEdit
        }
    }

    /// Explicit override toggle. Turning on freezes `external`, the value
    /// the external system last wrote; turning off keeps every value.
    pub fn set_override_active(&mut self, active: bool, external: f32) {
        if active {
            self.current_value = external;
            self.override_value = external;
            self.override_active = true;
        } else {
            self.release_override();
        }
    }

    /// Back to following the external system from the next pass
    pub fn release_override(&mut self) {
        self.override_active = false;
    }

    /// Decide this pass's value. `external` is what the external system
    /// left in the model for this frame.
    ///
    /// A reset does not touch the override flag: an overridden field stays
    /// overridden, now holding its default.
    pub fn resolve(&mut self, external: f32, reset: bool) -> Resolution {
        self.pending_external_write = false;

        if reset {
            self.current_value = self.default_value;
            self.override_value = self.default_value;
            Resolution::Reset
        } else if self.override_active {
            self.current_value = self.override_value;
            Resolution::Override
        } else {
            self.current_value = external;
            Resolution::Follow
        }
    }

    /// Expect one echo from the control for a write just made
    pub fn arm_echo(&mut self, echo_expected: bool) {
        self.pending_external_write = echo_expected;
    }
}

/// A tracked field with its display control
#[derive(Debug)]
pub struct BoundField<C> {
    pub field: TrackedField,
    pub control: C,
}

/// Field set - all tracked fields of one panel for the loaded model
#[derive(Debug)]
pub struct FieldSet<C> {
    kind: FieldKind,
    generation: u32,
    entries: Vec<BoundField<C>>,
}

impl<C> FieldSet<C> {
    pub fn new(kind: FieldKind) -> Self {
        FieldSet {
            kind,
            generation: 0,
            entries: Vec::new(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Generation the next `install` will use
    pub fn next_generation(&self) -> u32 {
        self.generation.wrapping_add(1)
    }

    /// Id a field at `index` gets under the next generation
    pub fn next_id(&self, index: usize) -> FieldId {
        FieldId::new(index as u32, self.next_generation())
    }

    /// Replace the whole set; every previously issued id becomes stale
    pub fn install(&mut self, entries: Vec<BoundField<C>>) -> u32 {
        self.generation = self.next_generation();
        self.entries = entries;
        self.generation
    }

    /// Drop all fields (model teardown)
    pub fn clear(&mut self) {
        self.generation = self.next_generation();
        self.entries.clear();
    }

    fn check(&self, id: FieldId) -> GemsResult<usize> {
        if id.generation() != self.generation {
            return Err(GemsError::StaleField {
                id,
                current: self.generation,
            });
        }
        if id.index() >= self.entries.len() {
            return Err(GemsError::FieldNotFound {
                kind: self.kind,
                id,
            });
        }
        Ok(id.index())
    }

    pub fn get(&self, id: FieldId) -> GemsResult<&BoundField<C>> {
        let index = self.check(id)?;
        Ok(&self.entries[index])
    }

    pub fn get_mut(&mut self, id: FieldId) -> GemsResult<&mut BoundField<C>> {
        let index = self.check(id)?;
        Ok(&mut self.entries[index])
    }

    /// Find a field by its model identifier
    pub fn find(&self, name: &str) -> Option<FieldId> {
        self.entries
            .iter()
            .position(|e| e.field.name() == name)
            .map(|index| FieldId::new(index as u32, self.generation))
    }

    pub fn ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        (0..self.entries.len()).map(move |index| FieldId::new(index as u32, self.generation))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundField<C>> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BoundField<C>> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fields currently in override mode
    pub fn overridden_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.field.is_override_active())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angle() -> TrackedField {
        TrackedField::new(
            "ParamAngleX",
            FieldKind::Parameter,
            0,
            Bounds::new(-30.0, 30.0),
            0.0,
            0.0,
        )
    }

    #[test]
    fn test_observe_echo_then_user_edit() {
        let mut f = angle();
        f.arm_echo(true);

        assert_eq!(f.observe(12.0), Observation::Echo);
        assert!(!f.is_pending_external_write());
        assert!(!f.is_override_active());

        assert_eq!(f.observe(-10.0), Observation::UserEdit);
        assert!(f.is_override_active());
        assert_eq!(f.override_value(), -10.0);
    }

    #[test]
    fn test_resolve_priority() {
        let mut f = angle();

        assert_eq!(f.resolve(15.0, false), Resolution::Follow);
        assert_eq!(f.current_value(), 15.0);

        f.observe(-10.0);
        assert_eq!(f.resolve(20.0, false), Resolution::Override);
        assert_eq!(f.current_value(), -10.0);

        assert_eq!(f.resolve(20.0, true), Resolution::Reset);
        assert_eq!(f.current_value(), 0.0);
        assert_eq!(f.override_value(), 0.0);
        // Reset keeps override mode
        assert!(f.is_override_active());
    }

    #[test]
    fn test_resolve_clears_stale_echo_flag() {
        let mut f = angle();
        f.arm_echo(true);
        f.resolve(1.0, false);
        assert!(!f.is_pending_external_write());
    }

    #[test]
    fn test_override_toggle_freezes_external_value() {
        let mut f = angle();
        f.resolve(0.1, false);
        // Animation wrote 0.42 since the last pass
        f.set_override_active(true, 0.42);
        assert_eq!(f.override_value(), 0.42);
        assert_eq!(f.current_value(), 0.42);

        f.resolve(0.9, false);
        assert_eq!(f.current_value(), 0.42);

        f.set_override_active(false, 0.7);
        assert_eq!(f.current_value(), 0.42);
        assert_eq!(f.override_value(), 0.42);
        f.resolve(0.9, false);
        assert_eq!(f.current_value(), 0.9);
    }

    #[test]
    fn test_field_set_generations() {
        let mut set: FieldSet<()> = FieldSet::new(FieldKind::Parameter);
        assert!(set.is_empty());
        assert_eq!(set.next_id(0), FieldId::new(0, 1));

        set.install(vec![BoundField {
            field: angle(),
            control: (),
        }]);
        let id = set.find("ParamAngleX").unwrap();
        assert_eq!(id, FieldId::new(0, 1));
        assert!(set.get(id).is_ok());
        assert!(matches!(
            set.get(FieldId::new(3, 1)),
            Err(GemsError::FieldNotFound { .. })
        ));

        set.install(Vec::new());
        assert!(matches!(
            set.get(id),
            Err(GemsError::StaleField { current: 2, .. })
        ));
    }

    #[test]
    fn test_field_set_ids_and_overrides() {
        let mut set = FieldSet::new(FieldKind::PartOpacity);
        let part = |name: &str, slot| BoundField {
            field: TrackedField::new(name, FieldKind::PartOpacity, slot, Bounds::OPACITY, 1.0, 1.0),
            control: (),
        };
        set.install(vec![part("PartArmL", 0), part("PartArmR", 1)]);

        let ids: Vec<_> = set.ids().collect();
        assert_eq!(ids, vec![FieldId::new(0, 1), FieldId::new(1, 1)]);

        set.get_mut(ids[1]).unwrap().field.set_override_active(true, 1.0);
        assert_eq!(set.overridden_count(), 1);

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.generation(), 2);
    }
}
