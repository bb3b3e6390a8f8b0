use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    foundation::error::{HornfaceError, HornfaceResult},
    foundation::math::unpremultiply_rgba8_in_place,
    render::backend::FrameRGBA,
};

/// File name used when exporting into a directory.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "demon-meme.png";

/// Encode a frame as PNG with straight alpha.
pub fn encode_png(frame: &FrameRGBA) -> HornfaceResult<Vec<u8>> {
    let mut data = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, data).ok_or_else(|| {
        HornfaceError::validation(format!(
            "frame {}x{} has {} bytes",
            frame.width,
            frame.height,
            frame.data.len()
        ))
    })?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Where an export aimed at `target` lands: directories get [`DEFAULT_EXPORT_FILE_NAME`].
pub fn export_path(target: &Path) -> PathBuf {
    if target.is_dir() {
        target.join(DEFAULT_EXPORT_FILE_NAME)
    } else {
        target.to_path_buf()
    }
}

/// Write an encoded payload, creating parent directories as needed.
pub fn write_export(payload: &[u8], target: &Path) -> HornfaceResult<PathBuf> {
    let out = export_path(target);
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, payload).with_context(|| format!("write png '{}'", out.display()))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
