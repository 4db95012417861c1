// kernels/compact_binary/src/lib.rs

// Compact Binary Orbital Dynamics Core
//
// This library locates innermost stable spherical orbits around spinning
// compact objects and evaluates neutron star equilibrium sequence tables.
// All computations use f64; radii are expressed in units of the central
// mass, angles in radians, and stellar masses in solar masses.

pub mod interpolate;
pub mod isso;
pub mod roots;
pub mod sequence;

pub use interpolate::{interp_linear, InterpolationError};
pub use isso::{
    isco_eq, isco_radius, isso_eq_at_pole, pg_isso_eq, polar_isso_radius, solve, solve_one,
};
pub use roots::{secant, ConvergenceError, RootResult};
pub use sequence::{sequence_data_dir, EquilibriumSequence, SequenceError, SUPPORTED_EOS};
