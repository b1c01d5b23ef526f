//! Physics toggle - turns the model's physics rig on and off
//!
//! The rig itself runs in the host. The toggle tracks whether the loaded
//! model has one, what the button shows, and whether the host should run it.

use tracing::debug;

/// Toggle label while the model has a physics rig
pub const PHYSICS_LABEL: &str = "Physics On/Off";

/// Toggle label for models shipped without physics
pub const NO_PHYSICS_LABEL: &str = "No physics file found";

/// Physics toggle state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhysicsToggle {
    on: bool,
    interactable: bool,
    label: &'static str,
    /// Rig enabled flag; `None` while the model has no rig
    rig: Option<bool>,
}

impl PhysicsToggle {
    pub fn new() -> Self {
        PhysicsToggle {
            on: true,
            interactable: true,
            label: PHYSICS_LABEL,
            rig: None,
        }
    }

    /// Reset the toggle for a freshly loaded model
    pub fn on_new_model(&mut self, has_physics: bool) {
        if has_physics {
            self.on = true;
            self.interactable = true;
            self.label = PHYSICS_LABEL;
            self.rig = Some(true);
        } else {
            self.on = false;
            self.interactable = false;
            self.label = NO_PHYSICS_LABEL;
            self.rig = None;
        }
        debug!(has_physics, "Physics toggle reset");
    }

    /// Model teardown: no rig left to drive
    pub fn on_model_unloaded(&mut self) {
        *self = PhysicsToggle::new();
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn is_interactable(&self) -> bool {
        self.interactable
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn has_rig(&self) -> bool {
        self.rig.is_some()
    }

    /// Whether the host should step the physics rig this frame
    pub fn is_physics_enabled(&self) -> bool {
        self.rig.unwrap_or(false)
    }

    /// Toggle clicked. A disabled toggle ignores clicks. Returns whether
    /// the rig state changed.
    pub fn set(&mut self, on: bool) -> bool {
        if !self.interactable {
            return false;
        }
        self.on = on;
        match self.rig.as_mut() {
            Some(enabled) if *enabled != on => {
                *enabled = on;
                debug!(enabled = on, "Physics toggled");
                true
            }
            _ => false,
        }
    }
}

impl Default for PhysicsToggle {
    fn default() -> Self {
        Self::new()
    }
}
