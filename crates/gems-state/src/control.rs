//! Display control seam
//!
//! Each tracked field is bound to a control handle the host injects at
//! model load (slider, readout text, override toggle and tint). Moving a
//! control makes it report a change back through `OverrideEngine::observe`,
//! exactly like a user drag would; the engine tells the two apart with the
//! field's one-shot echo flag.

/// Control bound to one tracked field
pub trait DisplayControl {
    /// Move the control to `value`.
    ///
    /// Returns `true` if the displayed value changed. A changed control
    /// reports the change through `observe` before the next pass.
    fn set_value(&mut self, value: f32) -> bool;

    /// Replace the readout text
    fn set_readout(&mut self, text: &str);

    /// Show or hide the override tint and toggle. Must not call back into
    /// the engine.
    fn set_override_indicator(&mut self, on: bool);

    /// Min/max label text, set once at load for parameters
    fn set_bounds_labels(&mut self, _min: &str, _max: &str) {}
}

impl<T: DisplayControl + ?Sized> DisplayControl for Box<T> {
    fn set_value(&mut self, value: f32) -> bool {
        (**self).set_value(value)
    }

    fn set_readout(&mut self, text: &str) {
        (**self).set_readout(text)
    }

    fn set_override_indicator(&mut self, on: bool) {
        (**self).set_override_indicator(on)
    }

    fn set_bounds_labels(&mut self, min: &str, max: &str) {
        (**self).set_bounds_labels(min, max)
    }
}

/// Headless slider state.
///
/// Keeps what a slider row would show and queues the change notification a
/// real slider would raise, for the host to forward with `take_echo`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SliderState {
    value: f32,
    readout: String,
    override_indicator: bool,
    min_label: String,
    max_label: String,
    pending_echo: Option<f32>,
}

impl SliderState {
    pub fn new() -> Self {
        SliderState::default()
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn readout(&self) -> &str {
        &self.readout
    }

    pub fn override_indicator(&self) -> bool {
        self.override_indicator
    }

    pub fn labels(&self) -> (&str, &str) {
        (&self.min_label, &self.max_label)
    }

    /// User drag; returns the value to report through `observe`
    pub fn drag(&mut self, value: f32) -> f32 {
        self.value = value;
        value
    }

    /// Change notification raised by the last engine write, if any
    pub fn take_echo(&mut self) -> Option<f32> {
        self.pending_echo.take()
    }
}

impl DisplayControl for SliderState {
    fn set_value(&mut self, value: f32) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.pending_echo = Some(value);
        true
    }

    fn set_readout(&mut self, text: &str) {
        self.readout.clear();
        self.readout.push_str(text);
    }

    fn set_override_indicator(&mut self, on: bool) {
        self.override_indicator = on;
    }

    fn set_bounds_labels(&mut self, min: &str, max: &str) {
        self.min_label = min.to_string();
        self.max_label = max.to_string();
    }
}
