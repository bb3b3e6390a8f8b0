use crate::{
    assets::registry::OverlayAsset,
    foundation::core::{Affine, Canvas, Point, Rect, Rgba8Premul, Vec2},
    foundation::error::{HornfaceError, HornfaceResult},
    layout::placement::PlacementTransform,
    render::backend::{DrawBackend, FrameRGBA, RenderSettings},
    render::composite::over,
};

/// Software canvas holding premultiplied RGBA8 pixels.
pub struct CpuCanvas {
    canvas: Canvas,
    clear: Rgba8Premul,
    pixels: Vec<u8>,
}

impl CpuCanvas {
    /// A transparent surface of size `canvas`.
    pub fn new(canvas: Canvas, settings: &RenderSettings) -> Self {
        let clear = settings
            .clear_rgba
            .map(|[r, g, b, a]| Rgba8Premul::from_straight_rgba(r, g, b, a))
            .unwrap_or_else(Rgba8Premul::transparent);
        Self {
            canvas,
            clear,
            pixels: vec![0; canvas.byte_len()],
        }
    }

    fn px_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let i = (y as usize * self.canvas.width as usize + x as usize) * 4;
        &mut self.pixels[i..i + 4]
    }

    /// Integer pixel span covered by `dest`, clipped to the surface.
    fn covered_span(&self, dest: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = dest.x0.floor().max(0.0);
        let y0 = dest.y0.floor().max(0.0);
        let x1 = dest.x1.ceil().min(f64::from(self.canvas.width));
        let y1 = dest.y1.ceil().min(f64::from(self.canvas.height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

/// Affine mapping canvas coordinates inside `dest` onto a `src_w` x `src_h` bitmap.
fn canvas_to_source(dest: Rect, src_w: u32, src_h: u32) -> Affine {
    Affine::scale_non_uniform(
        f64::from(src_w) / dest.width(),
        f64::from(src_h) / dest.height(),
    ) * Affine::translate(-dest.origin().to_vec2())
}

impl DrawBackend for CpuCanvas {
    fn resize(&mut self, canvas: Canvas) -> HornfaceResult<()> {
        if canvas.is_empty() {
            return Err(HornfaceError::validation(format!(
                "canvas must be non-empty, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        self.canvas = canvas;
        self.pixels = vec![0; canvas.byte_len()];
        Ok(())
    }

    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn clear(&mut self) -> HornfaceResult<()> {
        let clear = self.clear.to_array();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&clear);
        }
        Ok(())
    }

    fn draw_background(&mut self, frame: &FrameRGBA) -> HornfaceResult<()> {
        if frame.data.len() != frame.canvas().byte_len() || frame.canvas().is_empty() {
            return Err(HornfaceError::validation(format!(
                "background frame {}x{} has {} bytes",
                frame.width,
                frame.height,
                frame.data.len()
            )));
        }
        let src = frame.premul_data();
        if frame.canvas() == self.canvas {
            for (d, s) in self.pixels.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
                d.copy_from_slice(&out);
            }
            return Ok(());
        }

        let full = Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        );
        let map = canvas_to_source(full, frame.width, frame.height);
        for y in 0..self.canvas.height {
            for x in 0..self.canvas.width {
                let p = map * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let sx = (p.x as u32).min(frame.width - 1);
                let sy = (p.y as u32).min(frame.height - 1);
                let i = (sy as usize * frame.width as usize + sx as usize) * 4;
                let s = [src[i], src[i + 1], src[i + 2], src[i + 3]];
                let d = self.px_mut(x, y);
                let out = over([d[0], d[1], d[2], d[3]], s);
                d.copy_from_slice(&out);
            }
        }
        Ok(())
    }

    fn draw_sprite(
        &mut self,
        asset: &OverlayAsset,
        placement: &PlacementTransform,
    ) -> HornfaceResult<()> {
        let dest = placement.dest();
        let Some((x0, y0, x1, y1)) = self.covered_span(dest) else {
            // Entirely off-canvas, e.g. horns above a face at the top edge.
            return Ok(());
        };

        let img = &asset.image;
        let map = canvas_to_source(dest, img.width, img.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let center = Point::new(f64::from(x), f64::from(y)) + Vec2::new(0.5, 0.5);
                if !dest.contains(center) {
                    continue;
                }
                let p = map * center;
                let sx = (p.x.max(0.0) as u32).min(img.width - 1);
                let sy = (p.y.max(0.0) as u32).min(img.height - 1);
                let s = img.pixel(sx, sy);
                let d = self.px_mut(x, y);
                let out = over([d[0], d[1], d[2], d[3]], s);
                d.copy_from_slice(&out);
            }
        }
        Ok(())
    }

    fn readback_rgba8(&self) -> HornfaceResult<FrameRGBA> {
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixels.clone(),
            premultiplied: true,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
