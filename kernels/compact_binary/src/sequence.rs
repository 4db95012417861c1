// Neutron star equilibrium sequence tables
//
// Physics: every equation of state admits a one-parameter family of
// non-rotating equilibrium stars. Tabulating that family gives, for each
// gravitational mass up to the maximum the EOS supports, the baryonic mass
// (conserved rest mass, larger than the gravitational mass by the binding
// energy) and the compactness GM/(Rc²). Tables ship with the crate as plain
// text, one file per EOS, and lookups interpolate linearly between the
// tabulated models.

use std::path::{Path, PathBuf};

use crate::interpolate::{interp_linear, InterpolationError};

// ============================================================================
// SUPPORTED TABLES
// ============================================================================

/// Equations of state with a bundled equilibrium sequence table.
pub const SUPPORTED_EOS: &[&str] = &["2H"];

/// Directory holding the bundled sequence tables.
pub fn sequence_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("ns_sequences")
}

// ============================================================================
// ERRORS
// ============================================================================

/// Error type for sequence table loading.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// The named EOS has no bundled sequence table.
    #[error("EOS {eos} does not have a bundled equilibrium sequence table")]
    UnsupportedEos { eos: String },

    /// The table file could not be read.
    #[error("Failed to read sequence table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table file exists but its contents do not parse.
    #[error("Malformed sequence table {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

// ============================================================================
// EQUILIBRIUM SEQUENCE
// ============================================================================

// Parsed sequence table for one EOS
//
// Columns: gravitational mass [M☉], baryonic mass [M☉], compactness. The
// gravitational mass column increases strictly, so the last row carries the
// maximum mass the EOS supports.
#[derive(Debug, Clone)]
pub struct EquilibriumSequence {
    eos: String,
    grav_masses: Vec<f64>,
    baryon_masses: Vec<f64>,
    compactnesses: Vec<f64>,
    max_g_mass: f64,
}

impl EquilibriumSequence {
    /// Load the bundled sequence table for `eos`.
    pub fn load(eos: &str) -> Result<Self, SequenceError> {
        Self::load_from(&sequence_data_dir(), eos)
    }

    /// Load the sequence table `equil_<eos>.dat` from `dir`.
    ///
    /// The EOS name is checked against [`SUPPORTED_EOS`] before any file
    /// access. Lines that are blank or start with `#` are skipped; every
    /// other line must hold exactly three numbers, and the first column
    /// must increase strictly from row to row.
    pub fn load_from(dir: &Path, eos: &str) -> Result<Self, SequenceError> {
        if !SUPPORTED_EOS.contains(&eos) {
            return Err(SequenceError::UnsupportedEos {
                eos: eos.to_string(),
            });
        }

        let path = dir.join(format!("equil_{eos}.dat"));
        let text = std::fs::read_to_string(&path).map_err(|source| SequenceError::Io {
            path: path.clone(),
            source,
        })?;

        let malformed = |reason: String| SequenceError::Malformed {
            path: path.clone(),
            reason,
        };

        let mut grav_masses = Vec::new();
        let mut baryon_masses = Vec::new();
        let mut compactnesses = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let lineno = index + 1;

            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() != 3 {
                return Err(malformed(format!(
                    "line {}: expected 3 columns, found {}",
                    lineno,
                    cols.len()
                )));
            }

            let mut row = [0.0_f64; 3];
            for (slot, token) in row.iter_mut().zip(&cols) {
                *slot = token
                    .parse()
                    .map_err(|_| malformed(format!("line {lineno}: invalid number {token:?}")))?;
            }

            if let Some(&previous) = grav_masses.last() {
                if row[0] <= previous {
                    return Err(malformed(format!(
                        "line {lineno}: gravitational mass column must increase strictly"
                    )));
                }
            }

            grav_masses.push(row[0]);
            baryon_masses.push(row[1]);
            compactnesses.push(row[2]);
        }

        if grav_masses.len() < 2 {
            return Err(malformed(format!(
                "expected at least 2 data rows, found {}",
                grav_masses.len()
            )));
        }

        // Strict ascent makes the last row the maximum-mass model
        let max_g_mass = grav_masses[grav_masses.len() - 1];

        Ok(Self {
            eos: eos.to_string(),
            grav_masses,
            baryon_masses,
            compactnesses,
            max_g_mass,
        })
    }

    /// EOS name the table was loaded for.
    pub fn eos(&self) -> &str {
        &self.eos
    }

    /// Largest gravitational mass the EOS supports, in solar masses.
    pub fn max_gravitational_mass(&self) -> f64 {
        self.max_g_mass
    }

    /// Smallest gravitational mass in the table, in solar masses.
    pub fn min_gravitational_mass(&self) -> f64 {
        self.grav_masses[0]
    }

    /// Number of tabulated models.
    pub fn len(&self) -> usize {
        self.grav_masses.len()
    }

    /// True when the table holds no models. Loading enforces at least two
    /// rows, so a loaded sequence is never empty.
    pub fn is_empty(&self) -> bool {
        self.grav_masses.is_empty()
    }

    // Baryonic mass [M☉] of the model with gravitational mass `grav_mass`,
    // interpolated linearly between tabulated models
    pub fn baryonic_mass(&self, grav_mass: f64) -> Result<f64, InterpolationError> {
        interp_linear(&self.grav_masses, &self.baryon_masses, grav_mass)
    }

    // Compactness GM/(Rc²) of the model with gravitational mass `grav_mass`
    pub fn compactness(&self, grav_mass: f64) -> Result<f64, InterpolationError> {
        interp_linear(&self.grav_masses, &self.compactnesses, grav_mass)
    }
}
