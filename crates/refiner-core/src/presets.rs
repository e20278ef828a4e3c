//! Preset registry and management
//!
//! The four built-in looks ship as YAML data embedded at compile time, so the
//! registry is available without file system access. User presets can still be
//! loaded, saved, and listed as YAML files for the CLI.

use crate::models::Preset;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

// Embed built-in preset YAML files at compile time
const CINEMATIC: &str = include_str!("../presets/cinematic.yml");
const PHOTOREALISTIC: &str = include_str!("../presets/photorealistic.yml");
const ARTISTIC: &str = include_str!("../presets/artistic.yml");
const CLEAN: &str = include_str!("../presets/clean.yml");

/// Slug of the preset used when an unknown name is requested
pub const FALLBACK_PRESET: &str = "clean";

/// All built-in presets, keyed by slug name
pub static BUILTIN_PRESETS: Lazy<HashMap<&'static str, Preset>> = Lazy::new(|| {
    let sources = [
        ("cinematic", CINEMATIC),
        ("photorealistic", PHOTOREALISTIC),
        ("artistic", ARTISTIC),
        ("clean", CLEAN),
    ];

    let mut presets = HashMap::new();
    for (slug, yaml) in sources {
        match load_preset_from_str(yaml) {
            Ok(preset) => {
                presets.insert(slug, preset);
            }
            Err(e) => {
                // Embedded data is validated by tests; reaching this means a
                // broken build, not a user error.
                eprintln!("Failed to parse embedded preset '{}': {}", slug, e);
            }
        }
    }
    presets
});

/// List of all built-in preset slugs
pub static PRESET_NAMES: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["cinematic", "photorealistic", "artistic", "clean"]);

/// Result of a registry lookup
#[derive(Debug, Clone)]
pub struct Resolved {
    pub preset: Preset,
    /// Set when the requested name was unknown and the fallback was used
    pub warning: Option<String>,
}

/// Look up a preset by slug name.
///
/// Unknown names never fail the pipeline: the `clean` preset is returned with
/// a non-fatal warning for the caller to surface.
pub fn resolve(name: &str) -> Resolved {
    let slug = name.trim().to_lowercase();

    if let Some(preset) = BUILTIN_PRESETS.get(slug.as_str()) {
        return Resolved {
            preset: preset.clone(),
            warning: None,
        };
    }

    let fallback = BUILTIN_PRESETS
        .get(FALLBACK_PRESET)
        .cloned()
        .unwrap_or_default();

    Resolved {
        preset: fallback,
        warning: Some(format!(
            "Unknown preset '{}', falling back to '{}'",
            name, FALLBACK_PRESET
        )),
    }
}

/// Parse a preset from a YAML string
pub fn load_preset_from_str(yaml: &str) -> Result<Preset, String> {
    serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse preset YAML: {}", e))
}

/// Validate a preset name to prevent path traversal attacks.
/// Rejects names containing path separators, "..", or other dangerous patterns.
pub fn validate_preset_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Preset name cannot be empty".to_string());
    }

    if name.contains('/') || name.contains('\\') {
        return Err("Preset name cannot contain path separators".to_string());
    }

    if name.contains("..") {
        return Err("Preset name cannot contain '..'".to_string());
    }

    if name.starts_with('.') {
        return Err("Preset name cannot start with '.'".to_string());
    }

    if name.contains('\0') {
        return Err("Preset name cannot contain null bytes".to_string());
    }

    Ok(())
}

/// Load a preset from a YAML file
pub fn load_preset<P: AsRef<Path>>(path: P) -> Result<Preset, String> {
    let contents = std::fs::read_to_string(path.as_ref())
        .map_err(|e| format!("Failed to read preset file: {}", e))?;

    load_preset_from_str(&contents)
}

/// Save a preset to a YAML file
pub fn save_preset<P: AsRef<Path>>(preset: &Preset, path: P) -> Result<(), String> {
    let yaml =
        serde_yaml::to_string(preset).map_err(|e| format!("Failed to serialize preset: {}", e))?;

    std::fs::write(path.as_ref(), yaml).map_err(|e| format!("Failed to write preset file: {}", e))
}

/// List all preset YAML files in a directory
pub fn list_presets<P: AsRef<Path>>(dir: P) -> Result<Vec<String>, String> {
    let mut presets = Vec::new();

    let entries = std::fs::read_dir(dir.as_ref())
        .map_err(|e| format!("Failed to read presets directory: {}", e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read directory entry: {}", e))?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) == Some("yml")
            || path.extension().and_then(|e| e.to_str()) == Some("yaml")
        {
            if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
                presets.push(name.to_string());
            }
        }
    }

    presets.sort();
    Ok(presets)
}

/// Get the default user presets directory
pub fn get_presets_dir() -> Result<std::path::PathBuf, String> {
    let home_dir =
        dirs::home_dir().ok_or_else(|| "Could not determine home directory".to_string())?;

    let presets_dir = home_dir.join("refiner").join("presets");

    if !presets_dir.exists() {
        std::fs::create_dir_all(&presets_dir)
            .map_err(|e| format!("Failed to create presets directory: {}", e))?;
    }

    Ok(presets_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColorGrade;
    use tempfile::tempdir;

    #[test]
    fn test_all_builtins_parse() {
        for slug in PRESET_NAMES.iter() {
            assert!(
                BUILTIN_PRESETS.contains_key(slug),
                "embedded preset '{}' failed to parse",
                slug
            );
        }
    }

    #[test]
    fn test_builtin_values_match_catalog() {
        let cinematic = &BUILTIN_PRESETS["cinematic"];
        assert_eq!(cinematic.sharpen, 1.2);
        assert_eq!(cinematic.contrast, 1.1);
        assert_eq!(cinematic.saturation, 1.15);
        assert_eq!(cinematic.brightness, 1.02);
        assert!(cinematic.vignette);
        assert_eq!(cinematic.color_grade, ColorGrade::TealOrange);
        assert_eq!(cinematic.shadow_lift, Some(8.0));
        assert_eq!(cinematic.highlight_recovery, Some(-5.0));

        let photo = &BUILTIN_PRESETS["photorealistic"];
        assert_eq!(photo.micro_contrast, Some(1.05));
        assert_eq!(photo.clarity_boost, Some(0.1));
        assert_eq!(photo.vibrance, 1.08);
        assert_eq!(photo.chromatic_aberration, Some(0.2));
        assert_eq!(photo.lens_distortion, Some(0.01));
        assert!(photo.shadow_tint.is_some());
        assert!(photo.highlight_tint.is_some());

        let clean = &BUILTIN_PRESETS["clean"];
        assert_eq!(clean.sharpen, 1.2);
        assert_eq!(clean.contrast, 1.05);
        assert!(!clean.vignette);
        assert_eq!(clean.color_grade, ColorGrade::None);
    }

    #[test]
    fn test_resolve_known_name() {
        let resolved = resolve("artistic");
        assert_eq!(resolved.preset.sharpen, 1.4);
        assert!(resolved.warning.is_none());
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let resolved = resolve("  Cinematic ");
        assert_eq!(resolved.preset.name, "Cinematic");
        assert!(resolved.warning.is_none());
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_clean() {
        let resolved = resolve("not-a-real-preset");
        assert_eq!(resolved.preset, BUILTIN_PRESETS["clean"]);
        let warning = resolved.warning.expect("expected a fallback warning");
        assert!(warning.contains("not-a-real-preset"));
        assert!(warning.contains("clean"));
    }

    #[test]
    fn test_validate_preset_name() {
        assert!(validate_preset_name("my-look").is_ok());
        assert!(validate_preset_name("").is_err());
        assert!(validate_preset_name("a/b").is_err());
        assert!(validate_preset_name("..\\evil").is_err());
        assert!(validate_preset_name(".hidden").is_err());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.yml");

        let mut preset = BUILTIN_PRESETS["cinematic"].clone();
        preset.name = "Custom".to_string();
        save_preset(&preset, &path).unwrap();

        let loaded = load_preset(&path).unwrap();
        assert_eq!(loaded, preset);

        let listed = list_presets(dir.path()).unwrap();
        assert_eq!(listed, vec!["custom".to_string()]);
    }
}
