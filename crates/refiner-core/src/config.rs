//! Optional on-disk defaults for the refiner
//!
//! A `refiner.yml` next to the working directory (or under `~/refiner`) can
//! set the default preset and a pinned grain seed. The file is loaded once
//! into a process-wide handle; problems are collected as warnings rather than
//! failing startup.

use crate::presets::BUILTIN_PRESETS;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

// Global verbose flag for controlling diagnostic output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, diagnostic messages are printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Candidate config file names searched on disk
const CONFIG_FILENAMES: &[&str] = &["refiner.yml", "refiner.yaml"];

/// Loaded configuration plus its source path and any warnings
pub struct RefinerConfigHandle {
    pub config: RefinerConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Complete configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RefinerConfig {
    pub defaults: RefinerDefaults,
}

/// User-adjustable defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefinerDefaults {
    /// Preset applied when the caller does not name one
    pub preset: String,

    /// Pinned film grain seed; absent means seed from entropy
    pub grain_seed: Option<u64>,

    /// Start with verbose diagnostics on
    pub verbose: bool,
}

impl Default for RefinerDefaults {
    fn default() -> Self {
        Self {
            preset: "clean".to_string(),
            grain_seed: None,
            verbose: false,
        }
    }
}

static CONFIG_HANDLE: OnceLock<RefinerConfigHandle> = OnceLock::new();

/// Get the process-wide configuration handle, loading it on first use
pub fn config_handle() -> &'static RefinerConfigHandle {
    CONFIG_HANDLE.get_or_init(load_config)
}

/// Print where the configuration came from and any warnings (verbose only)
pub fn log_config_usage() {
    let handle = config_handle();
    match &handle.source {
        Some(path) => verbose_println!("[CONFIG] Using {}", path.display()),
        None => verbose_println!("[CONFIG] No refiner.yml found, using built-in defaults"),
    }
    for warning in &handle.warnings {
        eprintln!("[CONFIG] Warning: {}", warning);
    }
}

fn load_config() -> RefinerConfigHandle {
    for path in candidate_paths() {
        if path.is_file() {
            return load_config_from(&path);
        }
    }

    RefinerConfigHandle {
        config: RefinerConfig::default(),
        source: None,
        warnings: Vec::new(),
    }
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for name in CONFIG_FILENAMES {
        paths.push(PathBuf::from(name));
    }

    if let Some(home) = dirs::home_dir() {
        for name in CONFIG_FILENAMES {
            paths.push(home.join("refiner").join(name));
        }
    }

    paths
}

fn load_config_from(path: &Path) -> RefinerConfigHandle {
    let mut warnings = Vec::new();

    let config = match fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<RefinerConfig>(&contents) {
            Ok(config) => config,
            Err(e) => {
                warnings.push(format!(
                    "Failed to parse {}: {}; using defaults",
                    path.display(),
                    e
                ));
                RefinerConfig::default()
            }
        },
        Err(e) => {
            warnings.push(format!(
                "Failed to read {}: {}; using defaults",
                path.display(),
                e
            ));
            RefinerConfig::default()
        }
    };

    let config = sanitize(config, &mut warnings);

    RefinerConfigHandle {
        config,
        source: Some(path.to_path_buf()),
        warnings,
    }
}

/// Reset unknown default preset names back to `clean`
fn sanitize(mut config: RefinerConfig, warnings: &mut Vec<String>) -> RefinerConfig {
    let slug = config.defaults.preset.trim().to_lowercase();
    if !BUILTIN_PRESETS.contains_key(slug.as_str()) {
        warnings.push(format!(
            "Default preset '{}' is not a built-in; using 'clean'",
            config.defaults.preset
        ));
        config.defaults.preset = "clean".to_string();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let defaults = RefinerDefaults::default();
        assert_eq!(defaults.preset, "clean");
        assert!(defaults.grain_seed.is_none());
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "defaults:\n  preset: cinematic\n  grain_seed: 17").unwrap();

        let handle = load_config_from(file.path());
        assert!(handle.warnings.is_empty());
        assert_eq!(handle.config.defaults.preset, "cinematic");
        assert_eq!(handle.config.defaults.grain_seed, Some(17));
    }

    #[test]
    fn test_malformed_config_warns_and_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "defaults: [this is not a mapping").unwrap();

        let handle = load_config_from(file.path());
        assert_eq!(handle.warnings.len(), 1);
        assert_eq!(handle.config.defaults.preset, "clean");
    }

    #[test]
    fn test_unknown_default_preset_is_sanitized() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "defaults:\n  preset: dreamy").unwrap();

        let handle = load_config_from(file.path());
        assert_eq!(handle.config.defaults.preset, "clean");
        assert!(handle.warnings[0].contains("dreamy"));
    }
}
