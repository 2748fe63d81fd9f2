use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, ImageReader};
use tracing::info;

use crate::error::{Result, SuperResError};
use crate::frame::{FrameSet, Raster};

/// Decode an image file (JPEG, PNG or GIF) into an 8-bit RGB raster.
///
/// The container format is detected from the file contents, not the
/// extension. Alpha is discarded. A file that cannot be decoded yields
/// [`SuperResError::Decode`] naming the path.
pub fn load_raster(path: &Path) -> Result<Raster> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader.format();
    let img = reader.decode().map_err(|source| SuperResError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), format = ?format, "Decoded frame");
    Raster::from_rgb_image(img.to_rgb8())
}

/// Decode an in-memory image into an 8-bit RGB raster.
pub fn decode_raster(bytes: &[u8]) -> Result<Raster> {
    let img = image::load_from_memory(bytes)?;
    Raster::from_rgb_image(img.to_rgb8())
}

/// Load frames in order and validate them as a frame set.
pub fn load_frame_set_with_progress<F>(paths: &[PathBuf], on_frame_done: F) -> Result<FrameSet>
where
    F: Fn(usize),
{
    if paths.is_empty() {
        return Err(SuperResError::EmptySequence);
    }
    let mut frames = Vec::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        frames.push(load_raster(path)?);
        on_frame_done(i + 1);
    }
    FrameSet::new(frames)
}

pub fn load_frame_set(paths: &[PathBuf]) -> Result<FrameSet> {
    load_frame_set_with_progress(paths, |_| {})
}

/// Encode a raster as JPEG bytes.
pub fn encode_jpeg(raster: &Raster, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    raster.to_rgb_image()?.write_with_encoder(encoder)?;
    Ok(buf.into_inner())
}

/// Save a raster as 8-bit RGB JPEG.
pub fn save_jpeg(raster: &Raster, path: &Path, quality: u8) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100));
    raster.to_rgb_image()?.write_with_encoder(encoder)?;
    Ok(())
}

/// Save a raster as 8-bit RGB PNG.
pub fn save_png(raster: &Raster, path: &Path) -> Result<()> {
    raster
        .to_rgb_image()?
        .save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a raster, choosing the format from the file extension.
///
/// Anything other than `.png` is written as JPEG.
pub fn save_raster(raster: &Raster, path: &Path, jpeg_quality: u8) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => save_png(raster, path),
        _ => save_jpeg(raster, path, jpeg_quality),
    }
}
