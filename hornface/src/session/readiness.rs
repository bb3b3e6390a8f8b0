use std::sync::mpsc;

use crate::{
    assets::registry::AssetRegistry,
    foundation::error::{HornfaceError, HornfaceResult},
    source::video::{VideoInfo, VideoSource},
};

const CAMERA_FAILURE_REASON: &str =
    "Unable to access the camera. Please make sure you've granted the necessary permissions.";
const INIT_FAILURE_REASON: &str = "There was an error initializing the app";

/// Outcome of the startup barrier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// Every sprite decoded and the video source is playable.
    Ready(VideoInfo),
    /// Startup failed; the human-readable reason is meant for the user.
    Failed(String),
}

impl Readiness {
    /// Whether rendering may start.
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready(_))
    }
}

enum Completion {
    Assets(HornfaceResult<()>),
    Camera(HornfaceResult<VideoInfo>),
}

/// All-or-nothing gate in front of the render loop.
///
/// Sprite decoding and camera acquisition run concurrently; the first failure decides the
/// outcome. The outcome is computed once and then cached, so a failed startup is not retried.
#[derive(Debug, Default)]
pub struct ReadinessBarrier {
    outcome: Option<Readiness>,
}

impl ReadinessBarrier {
    /// A barrier that has not run yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached outcome, if the barrier has run.
    pub fn outcome(&self) -> Option<&Readiness> {
        self.outcome.as_ref()
    }

    /// Wait for every resource, or return the cached outcome.
    #[tracing::instrument(skip_all)]
    pub fn await_ready(
        &mut self,
        registry: &mut AssetRegistry,
        source: &mut dyn VideoSource,
    ) -> Readiness {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let outcome = match join_resources(registry, source) {
            Ok(info) => {
                tracing::info!(width = info.width, height = info.height, "video dimensions");
                Readiness::Ready(info)
            }
            Err(e) => {
                let reason = failure_reason(&e);
                tracing::error!(error = %e, "initialization failed");
                Readiness::Failed(reason)
            }
        };
        self.outcome = Some(outcome.clone());
        outcome
    }
}

fn failure_reason(e: &HornfaceError) -> String {
    match e {
        HornfaceError::CameraAccess(_) => format!("{CAMERA_FAILURE_REASON} ({e})"),
        _ => format!("{INIT_FAILURE_REASON}: {e}"),
    }
}

fn join_resources(
    registry: &mut AssetRegistry,
    source: &mut dyn VideoSource,
) -> HornfaceResult<VideoInfo> {
    std::thread::scope(|scope| -> HornfaceResult<VideoInfo> {
        let (tx, rx) = mpsc::channel::<Completion>();
        let tx_camera = tx.clone();

        scope.spawn(move || {
            let _ = tx.send(Completion::Assets(registry.load()));
        });
        scope.spawn(move || {
            let res = source.acquire().and_then(|info| {
                if info.width == 0 || info.height == 0 {
                    return Err(HornfaceError::camera_access(format!(
                        "source reports empty dimensions {}x{}",
                        info.width, info.height
                    )));
                }
                Ok(info)
            });
            let _ = tx_camera.send(Completion::Camera(res));
        });

        let mut assets_done = false;
        let mut video = None;
        // Ends once both tasks have reported and dropped their senders.
        for completion in rx {
            match completion {
                Completion::Assets(res) => {
                    res?;
                    assets_done = true;
                }
                Completion::Camera(res) => video = Some(res?),
            }
        }

        match (assets_done, video) {
            (true, Some(info)) => Ok(info),
            _ => Err(HornfaceError::validation(
                "startup task exited without reporting",
            )),
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/readiness.rs"]
mod tests;
