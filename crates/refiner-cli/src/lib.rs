//! Shared utilities for refiner-cli
//!
//! Path handling used by both the single-image and batch commands.

use std::path::{Path, PathBuf};

/// Supported image extensions for batch processing
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "tif", "tiff"];

/// Determine the output path for a refined image.
///
/// Output is always PNG. If `out` is a directory the input file stem gains a
/// `_refined` suffix inside it; if `out` is a file path it is used as-is;
/// absent, the suffixed name lands next to the input.
pub fn determine_output_path(input: &Path, out: &Option<PathBuf>) -> Result<PathBuf, String> {
    let stem = input
        .file_stem()
        .ok_or("Invalid input filename")?
        .to_string_lossy();

    match out {
        Some(out_path) if out_path.is_dir() => Ok(out_path.join(format!("{}_refined.png", stem))),
        Some(out_path) => Ok(out_path.clone()),
        None => {
            let parent = input.parent().unwrap_or(Path::new("."));
            Ok(parent.join(format!("{}_refined.png", stem)))
        }
    }
}

/// Expand a list of inputs (files and directories) into a list of image files.
///
/// Directories are scanned for supported image files (.png, .tif, .tiff).
/// If `recursive` is true, subdirectories are also scanned.
pub fn expand_inputs(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            collect_images_from_dir(input, recursive, &mut files)?;
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(format!("Path not found: {}", input.display()));
        }
    }

    // Sort for consistent ordering
    files.sort();
    Ok(files)
}

fn collect_images_from_dir(
    dir: &Path,
    recursive: bool,
    files: &mut Vec<PathBuf>,
) -> Result<(), String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory {}: {}", dir.display(), e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Error reading directory entry: {}", e))?;
        let path = entry.path();

        if path.is_dir() && recursive {
            collect_images_from_dir(&path, recursive, files)?;
        } else if path.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                    files.push(path);
                }
            }
        }
    }
    Ok(())
}
