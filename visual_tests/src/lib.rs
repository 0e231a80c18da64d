mod capture;
mod compare;

pub use capture::{capture_scene, CaptureConfig, SCENES};
pub use compare::{compare_frames, compare_images, generate_diff_image, CompareResult};

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisualTestError {
    #[error("Failed to capture frame: {0}")]
    Capture(String),
    #[error("Failed to compare images: {0}")]
    Compare(String),
    #[error("Reference image not found: {0}")]
    ReferenceNotFound(PathBuf),
    #[error("Unknown scene: {0}")]
    UnknownScene(String),
    #[error("Render error: {0}")]
    Render(#[from] layout_raster::RenderError),
    #[error("Texture error: {0}")]
    Texture(#[from] layout_raster::TextureError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, VisualTestError>;

/// Configuration for a visual test
#[derive(Clone)]
pub struct VisualTestConfig {
    /// Name of the scene to render
    pub scene_name: String,
    /// Similarity threshold (0.0 to 1.0, default 0.99)
    pub similarity_threshold: f64,
}

impl Default for VisualTestConfig {
    fn default() -> Self {
        Self {
            scene_name: String::new(),
            similarity_threshold: 0.99,
        }
    }
}

/// Result of a visual test
#[derive(Debug)]
pub struct VisualTestResult {
    /// Whether the test passed (similarity >= threshold)
    pub passed: bool,
    /// The similarity score (0.0 to 1.0)
    pub similarity: f64,
    /// Path to the rendered frame
    pub captured_path: PathBuf,
    /// Path to the reference image
    pub reference_path: PathBuf,
    /// Path to diff image (if generated on failure)
    pub diff_path: Option<PathBuf>,
}

/// Get the path to the references directory
pub fn references_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("references")
}

/// Get the path to a reference image for a scene
pub fn reference_path(scene_name: &str) -> PathBuf {
    references_dir().join(format!("{}.png", scene_name))
}

/// Get the path to the output directory for test artifacts
pub fn output_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("output")
}

/// Run a visual regression test against the committed references.
///
/// A missing reference is an error; create it with [`update_reference`]
/// (`UPDATE_REFERENCES=1 cargo test -p visual_tests`).
pub fn run_visual_test(config: &VisualTestConfig) -> Result<VisualTestResult> {
    run_visual_test_in(config, &references_dir(), &output_dir())
}

/// Same as [`run_visual_test`] with explicit reference and output directories.
pub fn run_visual_test_in(
    config: &VisualTestConfig,
    references: &Path,
    output: &Path,
) -> Result<VisualTestResult> {
    let ref_path = references.join(format!("{}.png", config.scene_name));
    let cap_path = output.join(format!("{}_captured.png", config.scene_name));

    // Check if reference exists
    if !ref_path.exists() {
        return Err(VisualTestError::ReferenceNotFound(ref_path));
    }

    std::fs::create_dir_all(output)?;
    capture_scene(&CaptureConfig {
        scene_name: config.scene_name.clone(),
        output_path: cap_path.clone(),
    })?;

    let compare_result = compare_images(&ref_path, &cap_path)?;
    let passed = compare_result.similarity >= config.similarity_threshold;

    // Generate diff if failed
    let diff = if !passed {
        let diff_file = output.join(format!("{}_diff.png", config.scene_name));
        generate_diff_image(&ref_path, &cap_path, &diff_file)?;
        Some(diff_file)
    } else {
        None
    };

    Ok(VisualTestResult {
        passed,
        similarity: compare_result.similarity,
        captured_path: cap_path,
        reference_path: ref_path,
        diff_path: diff,
    })
}

/// Update the reference image for a scene
pub fn update_reference(scene_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(references_dir())?;

    let ref_path = reference_path(scene_name);
    capture_scene(&CaptureConfig {
        scene_name: scene_name.to_string(),
        output_path: ref_path.clone(),
    })?;

    log::info!("Updated reference: {}", ref_path.display());
    Ok(ref_path)
}

/// Check if we're in update references mode
pub fn should_update_references() -> bool {
    std::env::var("UPDATE_REFERENCES").is_ok()
}
