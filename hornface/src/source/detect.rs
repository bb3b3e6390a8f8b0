use std::{path::Path, sync::mpsc};

use crate::{
    foundation::core::FaceRect,
    foundation::error::{HornfaceError, HornfaceResult},
};

/// Faces reported by the detector for one video frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DetectionEvent {
    /// Zero or more rectangles, in detector order.
    #[serde(default)]
    pub faces: Vec<FaceRect>,
}

impl DetectionEvent {
    /// Event carrying `faces`.
    pub fn new(faces: Vec<FaceRect>) -> Self {
        Self { faces }
    }
}

/// External face detector. Publishes one event per analysed frame.
///
/// Delivery cadence is the detector's business; the session drains the receiving end in order
/// and stops when every sender is dropped.
pub trait Detector {
    /// Start publishing into `tx`.
    fn subscribe(&mut self, tx: mpsc::Sender<DetectionEvent>) -> HornfaceResult<()>;
}

/// Detector that replays a fixed list of events.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDetector {
    events: Vec<DetectionEvent>,
}

impl ScriptedDetector {
    /// Replay `events` in order.
    pub fn new(events: Vec<DetectionEvent>) -> Self {
        Self { events }
    }

    /// Parse a JSON array of events: `[{"faces":[{"x":..,"y":..,"width":..,"height":..}]}, ...]`.
    pub fn from_json_str(json: &str) -> HornfaceResult<Self> {
        let events = serde_json::from_str(json)
            .map_err(|e| HornfaceError::serde(format!("detection script: {e}")))?;
        Ok(Self::new(events))
    }

    /// Read a JSON event script from disk.
    pub fn from_path(path: &Path) -> HornfaceResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            HornfaceError::validation(format!("read detection script '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Events still to be published.
    pub fn events(&self) -> &[DetectionEvent] {
        &self.events
    }
}

impl Detector for ScriptedDetector {
    fn subscribe(&mut self, tx: mpsc::Sender<DetectionEvent>) -> HornfaceResult<()> {
        for event in self.events.drain(..) {
            tx.send(event)
                .map_err(|_| HornfaceError::validation("detection subscriber hung up"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/detect.rs"]
mod tests;
