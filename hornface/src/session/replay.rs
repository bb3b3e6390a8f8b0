use std::path::{Path, PathBuf};

use crate::{
    foundation::core::FaceRect,
    foundation::error::{HornfaceError, HornfaceResult},
    session::overlay_session::OverlaySession,
    source::detect::DetectionEvent,
};

/// One scripted user or detector action.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReplayStep {
    /// A detector callback, optionally for a specific recorded frame.
    Detect {
        /// Frame to seek the video source to first.
        #[serde(default)]
        frame: Option<usize>,
        /// Reported faces.
        #[serde(default)]
        faces: Vec<FaceRect>,
    },
    /// Press the capture toggle.
    Toggle,
    /// Press the save control.
    Save {
        /// Output file or directory; the replay output directory when unset.
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

/// Ordered list of steps, loaded from `{"steps": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReplayScript {
    /// Steps in execution order.
    pub steps: Vec<ReplayStep>,
}

impl ReplayScript {
    /// Parse a JSON script.
    pub fn from_json_str(json: &str) -> HornfaceResult<Self> {
        serde_json::from_str(json).map_err(|e| HornfaceError::serde(format!("replay script: {e}")))
    }

    /// Read a JSON script from disk.
    pub fn from_path(path: &Path) -> HornfaceResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            HornfaceError::validation(format!("read replay script '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }
}

/// What a replay did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Render passes run.
    pub passes: u64,
    /// Toggle labels, one per toggle step.
    pub labels: Vec<String>,
    /// Files written by save steps.
    pub saved: Vec<PathBuf>,
    /// Save steps that found no frame to export.
    pub empty_saves: u64,
}

/// Drive a started session through `script`.
///
/// Saving before the first render is reported and skipped; every other error aborts.
#[tracing::instrument(skip(session, script), fields(steps = script.steps.len()))]
pub fn replay(
    session: &mut OverlaySession,
    script: &ReplayScript,
    out_dir: &Path,
) -> HornfaceResult<ReplayReport> {
    if !session.is_started() {
        return Err(HornfaceError::validation("render loop has not started"));
    }

    let mut report = ReplayReport::default();
    for step in &script.steps {
        match step {
            ReplayStep::Detect { frame, faces } => {
                if let Some(idx) = frame {
                    session.source_mut().seek(*idx)?;
                }
                session.on_detection(&DetectionEvent::new(faces.clone()))?;
                report.passes += 1;
            }
            ReplayStep::Toggle => {
                report.labels.push(session.toggle_capture().to_string());
            }
            ReplayStep::Save { path } => {
                let target = path.as_deref().unwrap_or(out_dir);
                match session.save_frame(target) {
                    Ok(out) => report.saved.push(out),
                    Err(HornfaceError::NoFrameAvailable) => {
                        tracing::warn!("nothing rendered yet, save skipped");
                        report.empty_saves += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/session/replay.rs"]
mod tests;
