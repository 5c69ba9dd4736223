//! Input gate: whether the prompt currently accepts input.
//!
//! Only the throttle controller toggles the gate; everything else may only
//! look at it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputGate {
    enabled: bool,
}

impl Default for InputGate {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl InputGate {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns true if the gate was disabled before.
    pub(crate) fn enable(&mut self) -> bool {
        let changed = !self.enabled;
        self.enabled = true;
        changed
    }

    /// Returns true if the gate was enabled before.
    pub(crate) fn disable(&mut self) -> bool {
        let changed = self.enabled;
        self.enabled = false;
        changed
    }
}
