//! 1-D linear interpolation over tabulated samples.
//!
//! Sequence lookups need one capability: given monotonically increasing
//! sample points, evaluate the piecewise-linear interpolant, refusing to
//! extrapolate past either end of the table.

/// Error type for interpolation queries that leave the sampled domain.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InterpolationError {
    /// Query point below the first sample.
    #[error("x = {x} is below the interpolation range [{lo}, {hi}]")]
    BelowRange { x: f64, lo: f64, hi: f64 },

    /// Query point above the last sample.
    #[error("x = {x} is above the interpolation range [{lo}, {hi}]")]
    AboveRange { x: f64, lo: f64, hi: f64 },
}

/// Piecewise-linear interpolant through `(xs, ys)`, evaluated at `x`.
///
/// `xs` must increase strictly and match `ys` in length. A query at a sample
/// point returns the tabulated value unchanged; a query outside
/// `[xs[0], xs[last]]` is refused rather than extrapolated. NaN queries
/// propagate as NaN, the same way they would through the arithmetic.
pub fn interp_linear(xs: &[f64], ys: &[f64], x: f64) -> Result<f64, InterpolationError> {
    assert_eq!(xs.len(), ys.len(), "Sample arrays must have matching lengths");
    assert!(xs.len() >= 2, "Interpolation needs at least two samples");
    debug_assert!(
        xs.windows(2).all(|w| w[0] < w[1]),
        "Sample points must increase strictly"
    );

    if x.is_nan() {
        return Ok(f64::NAN);
    }

    let lo = xs[0];
    let hi = xs[xs.len() - 1];
    if x < lo {
        return Err(InterpolationError::BelowRange { x, lo, hi });
    }
    if x > hi {
        return Err(InterpolationError::AboveRange { x, lo, hi });
    }

    // First sample at or above x; exact hits return the tabulated value so
    // the interpolant passes through its knots bitwise.
    let upper = xs.partition_point(|&p| p < x);
    if upper < xs.len() && xs[upper] == x {
        return Ok(ys[upper]);
    }

    let i = upper - 1;
    let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
    Ok(ys[i] + t * (ys[i + 1] - ys[i]))
}
