use crate::{
    assets::registry::AssetRegistry,
    capture::state::CaptureState,
    foundation::error::{HornfaceError, HornfaceResult},
    layout::placement::{SpriteAspects, place},
    render::backend::{DrawBackend, FrameRGBA},
    source::detect::DetectionEvent,
};

/// Counters accumulated across render passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Completed render passes.
    pub frames: u64,
    /// Faces reported by the detector across all passes.
    pub faces: u64,
    /// Placement computations, including rejected rectangles.
    pub placements: u64,
    /// Sprites actually drawn.
    pub sprites_drawn: u64,
    /// Rectangles skipped because they were degenerate.
    pub skipped_rects: u64,
}

/// Per-event compositor: background first, then overlays for every face while capturing.
#[derive(Clone, Debug)]
pub struct FrameLoop {
    aspects: SpriteAspects,
    stats: RenderStats,
}

impl FrameLoop {
    /// Build a loop for a loaded registry.
    pub fn new(registry: &AssetRegistry) -> HornfaceResult<Self> {
        Ok(Self {
            aspects: SpriteAspects::from_registry(registry)?,
            stats: RenderStats::default(),
        })
    }

    /// Counters so far.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Run one full pass for one detection event.
    ///
    /// Order is fixed: clear, background, then per face horn-left, horn-right, eye-left,
    /// eye-right, whiskers. A degenerate rectangle only loses its own overlays.
    #[tracing::instrument(
        skip_all,
        fields(faces = event.faces.len(), capturing = capture.is_capturing())
    )]
    pub fn render<B: DrawBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        registry: &AssetRegistry,
        capture: CaptureState,
        background: &FrameRGBA,
        event: &DetectionEvent,
    ) -> HornfaceResult<()> {
        backend.clear()?;
        backend.draw_background(background)?;
        tracing::debug!(count = event.faces.len(), "detected faces");
        self.stats.faces += event.faces.len() as u64;

        if capture.is_capturing() {
            for rect in &event.faces {
                self.stats.placements += 1;
                match place(rect, self.aspects) {
                    Ok(transforms) => {
                        for t in &transforms {
                            backend.draw_sprite(registry.get(t.asset())?, t)?;
                            self.stats.sprites_drawn += 1;
                        }
                    }
                    Err(HornfaceError::DegenerateRect(reason)) => {
                        tracing::debug!(%reason, ?rect, "skipping face");
                        self.stats.skipped_rects += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        self.stats.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame_loop.rs"]
mod tests;
