//! Scalar root finding for the orbit polynomials.
//!
//! The solver needs one capability: given a continuous function and an
//! initial guess, return a nearby root. A derivative-free secant iteration
//! covers that for every polynomial in this crate.

/// Error type for root-finding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConvergenceError {
    /// Maximum number of iterations reached without convergence.
    #[error("Maximum number of iterations reached without convergence")]
    Iterations,

    /// Non-finite value encountered during evaluation.
    #[error("Non-finite value encountered during evaluation")]
    NonFinite,

    /// Equal ordinates on the secant chord, no further step possible.
    #[error("Secant chord is flat, no root-finding step possible")]
    FlatChord,

    /// Solutions stayed outside the accepted radial range despite retries.
    #[error("Unable to obtain some solutions")]
    OutOfRange,
}

/// Result type for root-finding operations.
pub type RootResult<T> = Result<T, ConvergenceError>;

/// Iteration cap for the secant loop.
const MAX_ITER: usize = 100;

/// Absolute step tolerance, near the square root of machine epsilon.
const XTOL: f64 = 1.5e-8;

/// Absolute residual tolerance. Near a repeated root the step criterion
/// alone stalls inside floating-point cancellation noise, so a residual
/// this small also counts as converged.
const FTOL: f64 = 1e-12;

/// Offset used to seed the second secant point from the guess.
const SEED_STEP: f64 = 1e-4;

/// Secant-method root of `f` near the initial guess `x0`.
///
/// The second point is seeded a small relative-plus-absolute step away from
/// `x0`. Iteration stops once the last step magnitude drops below [`XTOL`]
/// or the residual magnitude falls to [`FTOL`]; a guess or seed whose
/// residual is already within [`FTOL`] comes back unchanged.
pub fn secant<F>(f: F, x0: f64) -> RootResult<f64>
where
    F: Fn(f64) -> f64,
{
    let mut x_prev = x0;
    let mut f_prev = f(x_prev);
    if !f_prev.is_finite() {
        return Err(ConvergenceError::NonFinite);
    }
    if f_prev.abs() <= FTOL {
        return Ok(x_prev);
    }

    let mut x = x0 * (1.0 + SEED_STEP);
    x += if x >= 0.0 { SEED_STEP } else { -SEED_STEP };
    let mut fx = f(x);
    if !fx.is_finite() {
        return Err(ConvergenceError::NonFinite);
    }
    if fx.abs() <= FTOL {
        return Ok(x);
    }

    for _ in 0..MAX_ITER {
        let denom = fx - f_prev;
        if denom == 0.0 {
            return Err(ConvergenceError::FlatChord);
        }
        let dx = fx * (x - x_prev) / denom;

        x_prev = x;
        f_prev = fx;
        x -= dx;
        if !x.is_finite() {
            return Err(ConvergenceError::NonFinite);
        }
        fx = f(x);
        if !fx.is_finite() {
            return Err(ConvergenceError::NonFinite);
        }

        if dx.abs() < XTOL || fx.abs() <= FTOL {
            return Ok(x);
        }
    }

    Err(ConvergenceError::Iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_secant_quadratic() {
        let root = secant(|x| x * x - 4.0, 1.0).unwrap();
        assert_approx_eq!(root, 2.0, 1e-8);
    }

    #[test]
    fn test_secant_transcendental() {
        // Dottie number, the fixed point of cos
        let root = secant(|x| x.cos() - x, 1.0).unwrap();
        assert_approx_eq!(root, 0.739_085_133_215_160_6, 1e-8);
    }

    #[test]
    fn test_secant_exact_guess() {
        let root = secant(|x| x - 3.0, 3.0).unwrap();
        assert_eq!(root, 3.0, "A guess that is already a root comes back unchanged");
    }

    #[test]
    fn test_secant_double_root() {
        // Secant converges only linearly on a double root, so the
        // tolerance is looser here
        let root = secant(|x| (x - 2.0) * (x - 2.0), 1.0).unwrap();
        assert_approx_eq!(root, 2.0, 1e-5);
    }

    #[test]
    fn test_secant_negative_axis() {
        let root = secant(|x| x * x - 4.0, -1.0).unwrap();
        assert_approx_eq!(root, -2.0, 1e-8);
    }

    #[test]
    fn test_secant_no_root() {
        let result = secant(|x| x * x + 1.0, 0.5);
        assert!(result.is_err(), "A rootless function must not converge");
    }
}
