// Innermost stable spherical orbit (ISSO) solver in the Perez-Giz
// formalism [see Stone, Loeb, Berger, PRD 87, 084053 (2013)].
//
// Physics: a test particle on an inclined spherical orbit around a spinning
// compact object has an innermost stable radius that interpolates between
// two limits. In the equatorial plane the ISSO coincides with the familiar
// ISCO; over the poles it is set by a separate polynomial whose root stays
// between 1+√3+√(3+2√3) and 6 mass units. A generic inclination couples the
// two through the Perez-Giz polynomial below. All radii are expressed in
// units of the central mass, all angles in radians.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::roots::{secant, ConvergenceError, RootResult};

// ============================================================================
// ORBIT POLYNOMIALS
// ============================================================================

// Equatorial polynomial: its physical root is the ISCO radius
//
// ISCO_eq(r, χ) = (r(r-6))² − χ²(2r(3r+14) − 9χ²)
//
// Spin dependence of the root:
// - χ=0 (no spin): r = 6, the Schwarzschild ISCO
// - χ→1 prograde: r → 1 (orbits hug the horizon)
// - χ→1 retrograde (negative χ here): r → 9
#[inline]
pub fn isco_eq(r: f64, chi: f64) -> f64 {
    let r_r6 = r * (r - 6.0);
    r_r6 * r_r6 - chi * chi * (2.0 * r * (3.0 * r + 14.0) - 9.0 * chi * chi)
}

// Polar polynomial: its physical root is the ISSO radius at inclination π/2
//
// ISSO_eq_at_pole(r, χ) = r³(r²(r-6) + χ²(3r+4)) + χ⁴(3r(r-2) + χ²)
//
// Even in χ, so the polar radius only feels the spin magnitude:
// - χ=0: r = 6
// - |χ|=1: r = 1+√3+√(3+2√3) ≈ 5.2746
#[inline]
pub fn isso_eq_at_pole(r: f64, chi: f64) -> f64 {
    let chi2 = chi * chi;
    let r2 = r * r;
    r2 * r * (r2 * (r - 6.0) + chi2 * (3.0 * r + 4.0))
        + chi2 * chi2 * (3.0 * r * (r - 2.0) + chi2)
}

// General-inclination polynomial
//
// PG_ISSO_eq(r, χ, ι) = r⁸Z + χ²sin²ι (χ²sin²ι·Y − 2r⁴X)
//
// where
//   X = χ²(χ²(3χ² + 4r(2r−3)) + r²(15r(r−4) + 28)) − 6r⁴(r² − 4)
//   Y = χ⁴(χ⁴ + r²(7r(3r−4) + 36)) + 6r(r−2)(χ⁶ + 2r³(χ²(3r+2) + 3r²(r−2)))
//   Z = ISCO_eq(r, χ)
//
// The sin²ι weighting makes it collapse onto the equatorial polynomial at
// ι = 0 or π and onto the polar one at ι = π/2.
pub fn pg_isso_eq(r: f64, chi: f64, incl: f64) -> f64 {
    let chi2 = chi * chi;
    let chi4 = chi2 * chi2;
    let r2 = r * r;
    let r4 = r2 * r2;
    let three_r = 3.0 * r;
    let r_minus_2 = r - 2.0;
    let sin_incl = incl.sin();
    let sin_incl2 = sin_incl * sin_incl;

    let x = chi2 * (chi2 * (3.0 * chi2 + 4.0 * r * (2.0 * r - 3.0)) + r2 * (15.0 * r * (r - 4.0) + 28.0))
        - 6.0 * r4 * (r2 - 4.0);
    let y = chi4 * (chi4 + r2 * (7.0 * r * (three_r - 4.0) + 36.0))
        + 6.0 * r * r_minus_2
            * (chi4 * chi2 + 2.0 * r2 * r * (chi2 * (three_r + 2.0) + 3.0 * r2 * r_minus_2));
    let z = isco_eq(r, chi);

    r4 * r4 * z + chi2 * sin_incl2 * (chi2 * sin_incl2 * y - 2.0 * r4 * x)
}

// ============================================================================
// LIMITING RADII
// ============================================================================

// ISCO radius for a signed spin (negative = retrograde orbit)
//
// The initial guess selects the physical branch of the quartic: near-extremal
// prograde roots sit close to the horizon, retrograde roots near 9, and
// everything else is reachable from the middle of the range.
pub fn isco_radius(chi: f64) -> RootResult<f64> {
    let guess = if chi > 0.99 {
        2.0
    } else if chi < 0.0 {
        9.0
    } else {
        5.0
    };
    secant(|r| isco_eq(r, chi), guess)
}

// ISSO radius over the pole (inclination π/2) for the given spin
pub fn polar_isso_radius(chi: f64) -> RootResult<f64> {
    let guess = if chi < 0.0 { 9.0 } else { 6.0 };
    secant(|r| isso_eq_at_pole(r, chi), guess)
}

// ============================================================================
// BATCH SOLVER
// ============================================================================

// Physically valid ISSO radii for |χ| ≤ 1, in central-mass units
const R_MIN: f64 = 1.0;
const R_MAX: f64 = 9.0;

// Re-solve rounds allowed before the batch is declared unsolvable
const MAX_RETRY_ROUNDS: usize = 5;

// Sign with the zero-maps-to-zero convention; f64::signum(0.0) is 1.0 and
// would bias the guess selection when cos ι vanishes exactly.
#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x
    }
}

// Bounds are inclusive; NaN from a failed per-element root find falls
// outside them and lands in the retry queue.
#[inline]
fn in_range(r: f64) -> bool {
    (R_MIN..=R_MAX).contains(&r)
}

// ISSO radius for each (spin, inclination) pair.
//
// The two slices must have matching lengths; the output preserves input
// order. Spins are dimensionless (physical range [-1, 1], not validated);
// inclinations are radians in [0, π].
//
// Per element the radius is located in three stages:
// 1. the equatorial ISCO radius from the sign-folded spin,
// 2. the polar ISSO radius from the raw spin,
// 3. the general Perez-Giz root, seeded with the larger of the two limits
//    and retried from the smaller one while the solution sits outside
//    [1, 9].
//
// Batches whose inclinations are all exactly 0 or π (bitwise, not within a
// tolerance) return the ISCO radii straight away; batches that are all
// exactly π/2 return the polar radii. Near-special angles take the general
// path. After five retry rounds any element still outside the physical
// range fails the whole batch with `ConvergenceError::OutOfRange`.
pub fn solve(chi: &[f64], incl: &[f64]) -> RootResult<Vec<f64>> {
    assert_eq!(
        chi.len(),
        incl.len(),
        "Spin and inclination arrays must have matching lengths"
    );

    // Spin magnitude signed by the orbital sense: inclinations beyond π/2
    // orbit against the spin, which flips the effective sign.
    let sgnchi: Vec<f64> = chi
        .iter()
        .zip(incl)
        .map(|(&c, &i)| sign(i.cos()) * c)
        .collect();

    // Equatorial ISCO radius for every element, needed for the guesses below
    let mut r_isco = Vec::with_capacity(chi.len());
    for &s in &sgnchi {
        r_isco.push(isco_radius(s)?);
    }

    // Purely equatorial batches stop here
    if incl.iter().all(|&i| i == 0.0 || i == PI) {
        return Ok(r_isco);
    }

    // Polar ISSO radius for every element
    let mut r_pole = Vec::with_capacity(chi.len());
    for &c in chi {
        r_pole.push(polar_isso_radius(c)?);
    }

    // Purely polar batches stop here
    if incl.iter().all(|&i| i == FRAC_PI_2) {
        return Ok(r_pole);
    }

    // General inclination: the physical root lies between the two limiting
    // radii, so seed from the larger one. Failed root finds record NaN and
    // queue for the retry pass.
    let mut solution = vec![f64::NAN; chi.len()];
    for i in 0..chi.len() {
        let guess = r_isco[i].max(r_pole[i]);
        solution[i] = secant(|r| pg_isso_eq(r, chi[i], incl[i]), guess).unwrap_or(f64::NAN);
    }

    // Re-solve only the out-of-range elements from the smaller limiting
    // radius. The retry guess does not change between rounds; the round cap
    // bounds the loop.
    let mut pending: Vec<usize> = (0..chi.len()).filter(|&i| !in_range(solution[i])).collect();
    let mut round = 1;
    while !pending.is_empty() {
        if round > MAX_RETRY_ROUNDS {
            return Err(ConvergenceError::OutOfRange);
        }
        for &i in &pending {
            let guess = r_isco[i].min(r_pole[i]);
            solution[i] = secant(|r| pg_isso_eq(r, chi[i], incl[i]), guess).unwrap_or(f64::NAN);
        }
        pending.retain(|&i| !in_range(solution[i]));
        round += 1;
    }

    Ok(solution)
}

// Single-pair convenience wrapper around `solve`
pub fn solve_one(chi: f64, incl: f64) -> RootResult<f64> {
    let radii = solve(&[chi], &[incl])?;
    Ok(radii[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    // Closed-form equatorial ISCO radius from Bardeen, Press & Teukolsky
    // (1972), used as an independent cross-check of the root-finding path:
    // Z₁ = 1 + (1-χ²)^(1/3) [(1+χ)^(1/3) + (1-χ)^(1/3)]
    // Z₂ = √(3χ² + Z₁²)
    // r  = 3 + Z₂ ∓ √[(3-Z₁)(3+Z₁+2Z₂)]  (minus prograde, plus retrograde)
    fn bpt_isco(chi: f64, prograde: bool) -> f64 {
        let a2 = chi * chi;
        let z1 = 1.0
            + (1.0 - a2).powf(1.0 / 3.0)
                * ((1.0 + chi).powf(1.0 / 3.0) + (1.0 - chi).powf(1.0 / 3.0));
        let z2 = (3.0 * a2 + z1 * z1).sqrt();
        let sign = if prograde { -1.0 } else { 1.0 };
        3.0 + z2 + sign * ((3.0 - z1) * (3.0 + z1 + 2.0 * z2)).sqrt()
    }

    #[test]
    fn test_isco_matches_closed_form() {
        for &chi in &[0.2, 0.5, 0.9, 0.998] {
            let prograde = isco_radius(chi).unwrap();
            assert_approx_eq!(prograde, bpt_isco(chi, true), 1e-6);

            let retrograde = isco_radius(-chi).unwrap();
            assert_approx_eq!(retrograde, bpt_isco(chi, false), 1e-6);
        }

        // At χ = 1 the prograde root becomes a triple root of the quartic
        // and cancellation noise limits the attainable precision
        assert_approx_eq!(isco_radius(1.0).unwrap(), 1.0, 1e-4);
        assert_approx_eq!(isco_radius(-1.0).unwrap(), 9.0, 1e-6);
    }

    #[test]
    fn test_schwarzschild_isco() {
        let radius = isco_radius(0.0).unwrap();
        assert_approx_eq!(radius, 6.0, 1e-6);
    }

    #[test]
    fn test_polar_radius_limits() {
        // No spin: the polar polynomial is exactly zero at r = 6
        assert_eq!(polar_isso_radius(0.0).unwrap(), 6.0);

        // Extremal spin: r = 1+√3+√(3+2√3)
        let sqrt3 = 3.0_f64.sqrt();
        let extremal = 1.0 + sqrt3 + (3.0 + 2.0 * sqrt3).sqrt();
        assert_approx_eq!(polar_isso_radius(1.0).unwrap(), extremal, 1e-6);

        // Even in the spin sign
        assert_approx_eq!(
            polar_isso_radius(-0.7).unwrap(),
            polar_isso_radius(0.7).unwrap(),
            1e-7
        );
    }

    #[test]
    fn test_schwarzschild_any_inclination() {
        // Without spin every inclination must come back to the
        // Schwarzschild value of 6
        let chi = [0.0, 0.0, 0.0, 0.0];
        let incl = [0.0, 0.3, FRAC_PI_2, PI];
        let radii = solve(&chi, &incl).unwrap();
        for &r in &radii {
            assert_approx_eq!(r, 6.0, 1e-5);
        }
    }

    #[test]
    fn test_equatorial_short_circuit() {
        // All inclinations exactly 0 or π: the batch returns the ISCO radii
        // from the same code path, so the match is bitwise
        let chi = [0.5, -0.3, 0.998];
        let incl = [0.0, 0.0, PI];
        let radii = solve(&chi, &incl).unwrap();
        assert_eq!(radii[0], isco_radius(0.5).unwrap());
        assert_eq!(radii[1], isco_radius(-0.3).unwrap());
        // ι = π flips the effective spin sign
        assert_eq!(radii[2], isco_radius(-0.998).unwrap());
    }

    #[test]
    fn test_polar_short_circuit() {
        let chi = [0.8, -0.8];
        let incl = [FRAC_PI_2, FRAC_PI_2];
        let radii = solve(&chi, &incl).unwrap();
        assert_eq!(radii[0], polar_isso_radius(0.8).unwrap());
        assert_eq!(radii[1], polar_isso_radius(-0.8).unwrap());
    }

    #[test]
    fn test_general_radius_between_limits() {
        let chi = 0.7;
        let r_eq = isco_radius(chi).unwrap();
        let r_pole = polar_isso_radius(chi).unwrap();

        for &incl in &[0.3, 0.7, 1.1, 1.4] {
            let r = solve_one(chi, incl).unwrap();
            assert!(
                r > r_eq && r < r_pole,
                "ISSO radius {} at inclination {} must sit between {} and {}",
                r,
                incl,
                r_eq,
                r_pole
            );
        }

        // Past π/2 the orbit is retrograde and the radius climbs toward the
        // retrograde ISCO instead
        let r_retro = isco_radius(-chi).unwrap();
        for &incl in &[1.8, 2.4, 2.9] {
            let r = solve_one(chi, incl).unwrap();
            assert!(
                r > r_pole && r < r_retro,
                "Retrograde ISSO radius {} at inclination {} must sit between {} and {}",
                r,
                incl,
                r_pole,
                r_retro
            );
        }
    }

    #[test]
    fn test_mixed_batch_takes_general_path() {
        // One equatorial, one polar, one generic element: no short-circuit
        // applies, every element goes through the general polynomial, and
        // the special-angle elements still land on their limits
        let chi = [0.5, 0.5, 0.5];
        let incl = [0.0, FRAC_PI_2, 1.0];
        let radii = solve(&chi, &incl).unwrap();

        let r_eq = isco_radius(0.5).unwrap();
        let r_pole = polar_isso_radius(0.5).unwrap();
        assert_approx_eq!(radii[0], r_eq, 1e-5);
        assert_approx_eq!(radii[1], r_pole, 1e-5);
        assert!(radii[2] > r_eq && radii[2] < r_pole);
    }

    #[test]
    fn test_extremal_spins_stay_physical() {
        // Extremal prograde equatorial: r = 1; extremal retrograde: r = 9
        assert_approx_eq!(solve_one(1.0, 0.0).unwrap(), 1.0, 1e-4);
        assert_approx_eq!(solve_one(-1.0, 0.0).unwrap(), 9.0, 1e-6);

        // Inclined extremal spins stay inside the physical range
        for &incl in &[0.4, 1.0, 1.3, 2.0, 2.8] {
            let r = solve_one(1.0, incl).unwrap();
            assert!((1.0..=9.0).contains(&r), "radius {} out of range", r);
        }
    }

    #[test]
    fn test_empty_batch() {
        let radii = solve(&[], &[]).unwrap();
        assert!(radii.is_empty());
    }

    #[test]
    #[should_panic(expected = "matching lengths")]
    fn test_length_mismatch_panics() {
        let _ = solve(&[0.5, 0.5], &[0.0]);
    }

    #[test]
    fn test_sign_convention() {
        assert_eq!(sign(2.5), 1.0);
        assert_eq!(sign(-0.1), -1.0);
        assert_eq!(sign(0.0), 0.0);
    }
}
