// Compact Binary Orbital Table Generator CLI
//
// This binary precomputes ISSO radius grids and neutron star equilibrium
// sequence tables as JSON artifacts for downstream analysis pipelines.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::env;
use std::f64::consts::PI;
use std::fs;
use std::path::PathBuf;

use compact_binary::*;

/// CLI arguments for the table generator
#[derive(Parser, Debug)]
#[command(name = "generate")]
#[command(about = "Generate ISSO radius grids and NS sequence tables", long_about = None)]
struct Args {
    /// Number of spin samples over χ ∈ [-1, 1]
    #[arg(short, long, default_value_t = 41, value_parser = clap::value_parser!(u32).range(2..=4096))]
    spin_samples: u32,

    /// Number of inclination samples over ι ∈ [0, π] radians
    #[arg(short, long, default_value_t = 37, value_parser = clap::value_parser!(u32).range(2..=4096))]
    inclination_samples: u32,

    /// Number of mass samples over the tabulated gravitational-mass range
    #[arg(short, long, default_value_t = 128, value_parser = clap::value_parser!(u32).range(2..=65536))]
    mass_samples: u32,

    /// Equation of state for the neutron star sequence table
    #[arg(short, long, default_value = "2H")]
    eos: String,

    /// Skip the neutron star sequence table
    #[arg(long, default_value_t = false)]
    no_sequence: bool,

    /// Output directory for generated artifacts (relative to workspace root)
    #[arg(short, long, default_value = "assets/orbital")]
    output: PathBuf,
}

/// Validate the EOS label against the bundled tables
fn parse_eos(eos: &str) -> Result<String, String> {
    if SUPPORTED_EOS.contains(&eos) {
        Ok(eos.to_string())
    } else {
        Err(format!(
            "Invalid EOS: '{}'. Must be one of: {}",
            eos,
            SUPPORTED_EOS.join(", ")
        ))
    }
}

/// Evenly spaced samples from `lo` to `hi` inclusive
///
/// The last sample is pinned to `hi` exactly so accumulated rounding never
/// pushes a query past an interpolation domain.
fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    let step = (hi - lo) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
        .collect()
}

/// Running statistics over the swept ISSO radii
struct SweepStats {
    count: usize,
    min_radius: f64,
    max_radius: f64,
    sum: f64,
}

impl SweepStats {
    fn new() -> Self {
        Self {
            count: 0,
            min_radius: f64::INFINITY,
            max_radius: f64::NEG_INFINITY,
            sum: 0.0,
        }
    }

    fn record(&mut self, radius: f64) {
        self.count += 1;
        self.sum += radius;
        self.min_radius = self.min_radius.min(radius);
        self.max_radius = self.max_radius.max(radius);
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

/// ISSO radius grid artifact
///
/// Row-major: radii[i][j] pairs spins[i] with inclinations[j]
#[derive(Serialize)]
struct IssoGrid {
    spins: Vec<f64>,
    inclinations: Vec<f64>,
    radii: Vec<Vec<f64>>,
}

/// Resampled neutron star sequence artifact
#[derive(Serialize)]
struct SequenceTable {
    eos: String,
    max_gravitational_mass: f64,
    gravitational_masses: Vec<f64>,
    baryonic_masses: Vec<f64>,
    compactnesses: Vec<f64>,
}

/// Manifest metadata describing one generation run
#[derive(Serialize)]
struct Manifest {
    kernel: &'static str,
    version: &'static str,
    git_sha: &'static str,
    rustc_version: &'static str,
    spin_samples: u32,
    inclination_samples: u32,
    mass_samples: Option<u32>,
    eos: Option<String>,
}

/// Write JSON data to a file
fn write_json(path: &PathBuf, json_str: &str) -> std::io::Result<()> {
    fs::write(path, json_str)?;
    Ok(())
}

/// Find the workspace root by looking for Cargo.toml
fn find_workspace_root() -> PathBuf {
    let mut current = env::current_dir().expect("Failed to get current directory");

    // Walk up the directory tree until we find workspace Cargo.toml
    loop {
        let cargo_toml = current.join("Cargo.toml");
        if cargo_toml.exists() {
            // Check if it's a workspace (has [workspace] section)
            if let Ok(contents) = fs::read_to_string(&cargo_toml) {
                if contents.contains("[workspace]") {
                    return current;
                }
            }
        }

        // Try parent directory
        if let Some(parent) = current.parent() {
            current = parent.to_path_buf();
        } else {
            // Couldn't find workspace root, use current dir
            return env::current_dir().expect("Failed to get current directory");
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args = Args::parse();

    // Find workspace root
    let workspace_root = find_workspace_root();

    // Validate the EOS label before doing any work
    let eos = if args.no_sequence {
        None
    } else {
        Some(parse_eos(&args.eos)?)
    };

    // Print configuration
    println!("\nCompact Binary Orbital Table Generator");
    println!("=======================================");
    println!("  Spin samples: {} over [-1, 1]", args.spin_samples);
    println!(
        "  Inclination samples: {} over [0, π] rad",
        args.inclination_samples
    );
    match &eos {
        Some(label) => {
            println!("  EOS: {}", label);
            println!("  Mass samples: {}", args.mass_samples);
        }
        None => println!("  Sequence: skipped"),
    }
    println!("=======================================\n");

    // Sweep the ISSO grid one spin row at a time, each row as one batch
    let spins = linspace(-1.0, 1.0, args.spin_samples as usize);
    let inclinations = linspace(0.0, PI, args.inclination_samples as usize);

    println!("Sweeping ISSO radii...");
    let pb = ProgressBar::new(spins.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} spin rows ({percent}%)")?
            .progress_chars("█▓▒░ "),
    );

    let mut stats = SweepStats::new();
    let mut radii = Vec::with_capacity(spins.len());
    for &spin in &spins {
        let row_spins = vec![spin; inclinations.len()];
        let row = solve(&row_spins, &inclinations)?;
        for &radius in &row {
            stats.record(radius);
        }
        radii.push(row);
        pb.inc(1);
    }
    pb.finish_with_message("✓ ISSO sweep complete");

    let grid = IssoGrid {
        spins,
        inclinations,
        radii,
    };

    // Resample the equilibrium sequence over its tabulated mass range
    let sequence = match &eos {
        Some(label) => {
            let seq = EquilibriumSequence::load(label)?;
            let masses = linspace(
                seq.min_gravitational_mass(),
                seq.max_gravitational_mass(),
                args.mass_samples as usize,
            );
            let mut baryonic_masses = Vec::with_capacity(masses.len());
            let mut compactnesses = Vec::with_capacity(masses.len());
            for &mass in &masses {
                baryonic_masses.push(seq.baryonic_mass(mass)?);
                compactnesses.push(seq.compactness(mass)?);
            }
            println!(
                "✓ Resampled {} sequence: {} models over [{:.3}, {:.3}] M☉",
                label,
                masses.len(),
                seq.min_gravitational_mass(),
                seq.max_gravitational_mass()
            );
            Some(SequenceTable {
                eos: label.clone(),
                max_gravitational_mass: seq.max_gravitational_mass(),
                gravitational_masses: masses,
                baryonic_masses,
                compactnesses,
            })
        }
        None => None,
    };

    // Manifest with build provenance
    let manifest = Manifest {
        kernel: "compact_binary",
        version: env!("CARGO_PKG_VERSION"),
        git_sha: env!("BUILD_GIT_SHA"),
        rustc_version: env!("BUILD_RUSTC_VERSION"),
        spin_samples: args.spin_samples,
        inclination_samples: args.inclination_samples,
        mass_samples: sequence.as_ref().map(|_| args.mass_samples),
        eos: sequence.as_ref().map(|table| table.eos.clone()),
    };

    // Create output directory path (relative to workspace root)
    let output_dir = workspace_root.join(&args.output);

    // Save all files
    println!("\n💾 Writing files...");
    fs::create_dir_all(&output_dir)?;

    let grid_path = output_dir.join("isso_grid.json");
    let grid_json = serde_json::to_string_pretty(&grid)?;
    write_json(&grid_path, &grid_json)?;
    println!(
        "  ✓ Wrote ISSO grid: {} ({:.2} KB)",
        grid_path.display(),
        grid_json.len() as f64 / 1_000.0
    );

    if let Some(ref table) = sequence {
        let seq_path = output_dir.join(format!("ns_sequence_{}.json", table.eos));
        let seq_json = serde_json::to_string_pretty(table)?;
        write_json(&seq_path, &seq_json)?;
        println!(
            "  ✓ Wrote NS sequence: {} ({:.2} KB)",
            seq_path.display(),
            seq_json.len() as f64 / 1_000.0
        );
    }

    let manifest_path = output_dir.join("manifest.json");
    let manifest_json = serde_json::to_string_pretty(&manifest)?;
    write_json(&manifest_path, &manifest_json)?;
    println!("  ✓ Wrote Manifest: {}", manifest_path.display());

    // Print statistics
    println!("\n📊 Statistics:");
    println!("  Grid points: {}", stats.count);
    println!(
        "  Radius range: {:.6} - {:.6} M",
        stats.min_radius, stats.max_radius
    );
    println!("  Mean radius: {:.6} M", stats.mean());

    println!("\n✨ Generation complete!");
    println!("📁 Output: {}\n", output_dir.display());

    Ok(())
}
