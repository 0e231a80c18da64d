use crate::{Result, VisualTestError};
use image::{Rgba, RgbaImage};
use image_compare::Algorithm;
use std::path::Path;

/// Channel delta above which a pixel counts as changed.
const DIFF_TOLERANCE: u8 = 10;

/// Result of comparing two frames
#[derive(Debug, Clone, PartialEq)]
pub struct CompareResult {
    /// SSIM similarity from 0.0 to 1.0
    pub similarity: f64,
    /// Pixels whose largest channel delta exceeds the tolerance
    pub changed_pixels: usize,
    pub max_channel_delta: u8,
}

/// Compare a reference PNG with a rendered frame on disk.
pub fn compare_images(reference: &Path, captured: &Path) -> Result<CompareResult> {
    let reference = image::open(reference)?.to_rgba8();
    let captured = image::open(captured)?.to_rgba8();
    compare_frames(&reference, &captured)
}

/// Compare two in-memory frames. Frames are flattened onto white first so
/// transparent regions compare by what would be shown.
pub fn compare_frames(reference: &RgbaImage, captured: &RgbaImage) -> Result<CompareResult> {
    if reference.dimensions() != captured.dimensions() {
        return Err(VisualTestError::Compare(format!(
            "Frame sizes differ: reference {:?} vs captured {:?}",
            reference.dimensions(),
            captured.dimensions()
        )));
    }

    let ref_rgb = image::DynamicImage::ImageRgba8(flatten_on_white(reference)).to_rgb8();
    let cap_rgb = image::DynamicImage::ImageRgba8(flatten_on_white(captured)).to_rgb8();
    let similarity =
        image_compare::rgb_similarity_structure(&Algorithm::MSSIMSimple, &ref_rgb, &cap_rgb)
            .map_err(|e| VisualTestError::Compare(format!("SSIM comparison failed: {}", e)))?
            .score;

    let mut changed_pixels = 0;
    let mut max_channel_delta = 0;
    for (a, b) in reference.pixels().zip(captured.pixels()) {
        let delta = channel_delta(a, b);
        max_channel_delta = max_channel_delta.max(delta);
        if delta > DIFF_TOLERANCE {
            changed_pixels += 1;
        }
    }

    Ok(CompareResult {
        similarity,
        changed_pixels,
        max_channel_delta,
    })
}

/// Write an image with changed pixels in red over a dimmed copy of the
/// captured frame.
pub fn generate_diff_image(reference: &Path, captured: &Path, output: &Path) -> Result<()> {
    let reference = image::open(reference)?.to_rgba8();
    let captured = image::open(captured)?.to_rgba8();
    if reference.dimensions() != captured.dimensions() {
        return Err(VisualTestError::Compare(
            "Cannot diff frames of different sizes".to_string(),
        ));
    }

    let diff = RgbaImage::from_fn(reference.width(), reference.height(), |x, y| {
        let a = reference.get_pixel(x, y);
        let b = captured.get_pixel(x, y);
        let delta = channel_delta(a, b);
        if delta > DIFF_TOLERANCE {
            let intensity = (delta as f32 / 255.0 * 200.0 + 55.0) as u8;
            Rgba([intensity, 0, 0, 255])
        } else {
            Rgba([b[0] / 3, b[1] / 3, b[2] / 3, 255])
        }
    });

    diff.save(output)?;
    Ok(())
}

fn flatten_on_white(frame: &RgbaImage) -> RgbaImage {
    let mut flat = frame.clone();
    for px in flat.pixels_mut() {
        let alpha = px[3] as u16;
        for c in 0..3 {
            px[c] = ((px[c] as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
        }
        px[3] = 255;
    }
    flat
}

/// Largest per-channel difference, alpha included.
fn channel_delta(a: &Rgba<u8>, b: &Rgba<u8>) -> u8 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(x, y)| x.abs_diff(*y))
        .max()
        .unwrap_or(0)
}
