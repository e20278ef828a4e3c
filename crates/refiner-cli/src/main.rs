use clap::{Parser, Subcommand};
use rayon::prelude::*;
use refiner_cli::{determine_output_path, expand_inputs};
use refiner_core::models::RefineOptions;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Parser)]
#[command(name = "refiner")]
#[command(version, about = "Preset-driven image refinement pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refine a single image with a named look preset
    Refine {
        /// Input image (PNG or TIFF)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file or directory (default: <input>_refined.png)
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Look preset: cinematic, photorealistic, artistic, or clean
        #[arg(short, long, value_name = "NAME")]
        preset: Option<String>,

        /// Pin the film grain RNG seed for reproducible output
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,

        /// Print per-stage pixel statistics
        #[arg(long)]
        debug: bool,

        /// Enable verbose diagnostics
        #[arg(short, long)]
        verbose: bool,
    },

    /// Refine multiple images in parallel with shared settings
    Batch {
        /// Input files or directories
        #[arg(value_name = "INPUTS")]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Look preset applied to every image
        #[arg(short, long, value_name = "NAME")]
        preset: Option<String>,

        /// Number of parallel threads
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,

        /// Scan directories recursively
        #[arg(short, long)]
        recursive: bool,

        /// Pin the film grain RNG seed for reproducible output
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,
    },

    /// Manage look presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// List built-in and user presets
    List {
        /// Directory to list user presets from (default: ~/refiner/presets)
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Show details of a preset
    Show {
        /// Preset name or file path
        preset: String,
    },

    /// Create a new preset template
    Create {
        /// Output file path
        output: PathBuf,

        /// Preset name
        #[arg(short, long)]
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Refine {
            input,
            out,
            preset,
            seed,
            debug,
            verbose,
        } => cmd_refine(input, out, preset, seed, debug, verbose),

        Commands::Batch {
            inputs,
            out,
            preset,
            threads,
            recursive,
            seed,
        } => cmd_batch(inputs, out, preset, threads, recursive, seed),

        Commands::Preset { action } => match action {
            PresetAction::List { dir } => cmd_preset_list(dir),
            PresetAction::Show { preset } => cmd_preset_show(preset),
            PresetAction::Create { output, name } => cmd_preset_create(output, name),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_refine(
    input: PathBuf,
    out: Option<PathBuf>,
    preset: Option<String>,
    seed: Option<u64>,
    debug: bool,
    verbose: bool,
) -> Result<(), String> {
    let defaults = &refiner_core::config::config_handle().config.defaults;
    refiner_core::config::set_verbose(verbose || defaults.verbose);
    refiner_core::config::log_config_usage();

    let preset_name = preset.unwrap_or_else(|| defaults.preset.clone());
    let grain_seed = seed.or(defaults.grain_seed);

    println!(
        "Refining {} with '{}' preset...",
        input.display(),
        preset_name
    );

    let encoded = std::fs::read(&input)
        .map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;

    let options = RefineOptions { grain_seed, debug };
    let refined =
        refiner_core::refine(&encoded, &preset_name, &options).map_err(|e| e.to_string())?;

    for warning in &refined.warnings {
        eprintln!("Warning: {}", warning);
    }

    let output_path = determine_output_path(&input, &out)?;
    std::fs::write(&output_path, &refined.bytes)
        .map_err(|e| format!("Failed to write {}: {}", output_path.display(), e))?;

    println!("Done! Refined image saved to: {}", output_path.display());
    Ok(())
}

fn cmd_batch(
    inputs: Vec<PathBuf>,
    out: Option<PathBuf>,
    preset: Option<String>,
    threads: Option<usize>,
    recursive: bool,
    seed: Option<u64>,
) -> Result<(), String> {
    let defaults = &refiner_core::config::config_handle().config.defaults;
    refiner_core::config::log_config_usage();

    if inputs.is_empty() {
        return Err("No input files specified".to_string());
    }

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("Using {} threads for parallel processing", num_threads);
    }

    let output_dir = out.clone().unwrap_or_else(|| PathBuf::from("."));
    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create output directory: {}", e))?;
    }

    let preset_name = preset.unwrap_or_else(|| defaults.preset.clone());
    let grain_seed = seed.or(defaults.grain_seed);

    let files = expand_inputs(&inputs, recursive)?;
    if files.is_empty() {
        return Err("No supported image files found in the given inputs".to_string());
    }

    println!(
        "\nRefining {} files with '{}' preset in parallel...\n",
        files.len(),
        preset_name
    );

    let processed_count = AtomicUsize::new(0);
    let total_files = files.len();

    let results: Vec<Result<PathBuf, String>> = files
        .par_iter()
        .map(|input| {
            let encoded = std::fs::read(input)
                .map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;

            let options = RefineOptions {
                grain_seed,
                debug: false,
            };
            let refined = refiner_core::refine(&encoded, &preset_name, &options)
                .map_err(|e| e.to_string())?;

            for warning in &refined.warnings {
                eprintln!("Warning ({}): {}", input.display(), warning);
            }

            let output_path = determine_output_path(input, &out)?;
            std::fs::write(&output_path, &refined.bytes)
                .map_err(|e| format!("Failed to write {}: {}", output_path.display(), e))?;

            let count = processed_count.fetch_add(1, Ordering::SeqCst) + 1;
            println!(
                "[{}/{}] Refined: {} -> {}",
                count,
                total_files,
                input.display(),
                output_path.display()
            );

            Ok(output_path)
        })
        .collect();

    let mut success_count = 0;
    let mut errors: Vec<(PathBuf, String)> = Vec::new();

    for (input, result) in files.iter().zip(results.iter()) {
        match result {
            Ok(_) => success_count += 1,
            Err(e) => errors.push((input.clone(), e.clone())),
        }
    }

    println!("\n========================================");
    println!("BATCH REFINEMENT COMPLETE");
    println!("========================================");
    println!("  Successful: {}", success_count);
    println!("  Failed:     {}", errors.len());
    println!("  Output dir: {}", output_dir.display());

    if !errors.is_empty() {
        println!("\nErrors:");
        for (path, error) in &errors {
            println!("  {}: {}", path.display(), error);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!("{} files failed to process", errors.len()))
    }
}

fn cmd_preset_list(dir: Option<PathBuf>) -> Result<(), String> {
    println!("Built-in presets:");
    for name in refiner_core::presets::PRESET_NAMES.iter() {
        println!("  {}", name);
    }

    let dir = match dir {
        Some(dir) => dir,
        None => refiner_core::presets::get_presets_dir()?,
    };

    println!("\nUser presets in {}:", dir.display());
    match refiner_core::presets::list_presets(&dir) {
        Ok(presets) if presets.is_empty() => println!("  (none)"),
        Ok(presets) => {
            for preset in presets {
                println!("  {}", preset);
            }
        }
        Err(e) => return Err(format!("Failed to list presets: {}", e)),
    }

    Ok(())
}

fn cmd_preset_show(preset: String) -> Result<(), String> {
    // File path, built-in slug, then user presets directory, in that order
    let preset_path = PathBuf::from(&preset);
    let preset_obj = if preset_path.is_file() {
        refiner_core::presets::load_preset(&preset_path)?
    } else if let Some(builtin) = refiner_core::presets::BUILTIN_PRESETS
        .get(preset.trim().to_lowercase().as_str())
    {
        builtin.clone()
    } else {
        let dir = refiner_core::presets::get_presets_dir()?;
        refiner_core::presets::load_preset(dir.join(format!("{}.yml", preset)))?
    };

    println!("\nPreset: {}", preset_obj.name);
    println!("  Sharpen:    {:.2}", preset_obj.sharpen);
    println!("  Contrast:   {:.2}", preset_obj.contrast);
    println!("  Saturation: {:.2}", preset_obj.saturation);
    println!("  Brightness: {:.2}", preset_obj.brightness);
    println!("  Vibrance:   {:.2}", preset_obj.vibrance);

    if let Some(v) = preset_obj.shadow_lift {
        println!("  Shadow lift: {:.1}", v);
    }
    if let Some(v) = preset_obj.highlight_recovery {
        println!("  Highlight recovery: {:.1}", v);
    }
    if let Some(v) = preset_obj.micro_contrast {
        println!("  Micro-contrast: {:.2}", v);
    }
    if let Some(v) = preset_obj.clarity_boost {
        println!("  Clarity boost: {:.2}", v);
    }
    if let Some(v) = preset_obj.chromatic_aberration {
        println!("  Chromatic aberration: {:.2}", v);
    }
    if let Some(v) = preset_obj.lens_distortion {
        println!("  Lens distortion: {:.2}", v);
    }

    println!("  Vignette:   {}", preset_obj.vignette);
    println!("  Film grain: {}", preset_obj.film_grain);
    println!("  Color grade: {:?}", preset_obj.color_grade);

    if let Some(tint) = preset_obj.shadow_tint {
        println!("  Shadow tint: rgb({}, {}, {})", tint.r, tint.g, tint.b);
    }
    if let Some(tint) = preset_obj.highlight_tint {
        println!("  Highlight tint: rgb({}, {}, {})", tint.r, tint.g, tint.b);
    }

    println!();
    Ok(())
}

fn cmd_preset_create(output: PathBuf, name: String) -> Result<(), String> {
    refiner_core::presets::validate_preset_name(&name)?;
    println!("Creating new preset: {}", name);

    let preset = refiner_core::models::Preset {
        name: name.clone(),
        ..Default::default()
    };

    let yaml_str =
        serde_yaml::to_string(&preset).map_err(|e| format!("Failed to serialize preset: {}", e))?;
    std::fs::write(&output, yaml_str)
        .map_err(|e| format!("Failed to write preset file: {}", e))?;

    println!("Preset created: {}", output.display());
    println!("You can now edit this file to customize the parameters.");
    println!();

    Ok(())
}
