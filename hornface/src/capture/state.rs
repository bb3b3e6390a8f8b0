/// Whether overlays are composited on top of the live background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CaptureState {
    /// Only the raw video frame is shown.
    #[default]
    Idle,
    /// Sprites are placed on every detected face.
    Capturing,
}

impl CaptureState {
    /// Label for the toggle control while Idle.
    pub const IDLE_LABEL: &'static str = "Capture and Add Features";
    /// Label for the toggle control while Capturing.
    pub const CAPTURING_LABEL: &'static str = "Reset";

    /// The state a toggle leads to.
    pub fn toggled(self) -> Self {
        match self {
            CaptureState::Idle => CaptureState::Capturing,
            CaptureState::Capturing => CaptureState::Idle,
        }
    }

    /// Flip in place and return the new state.
    pub fn toggle(&mut self) -> Self {
        *self = self.toggled();
        tracing::info!(capturing = self.is_capturing(), "capture mode changed");
        *self
    }

    /// Whether overlays should be drawn.
    pub fn is_capturing(self) -> bool {
        matches!(self, CaptureState::Capturing)
    }

    /// Text the toggle control displays in this state.
    pub fn label(self) -> &'static str {
        match self {
            CaptureState::Idle => Self::IDLE_LABEL,
            CaptureState::Capturing => Self::CAPTURING_LABEL,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/state.rs"]
mod tests;
