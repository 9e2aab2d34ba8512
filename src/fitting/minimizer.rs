// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Bounded one-dimensional minimisation (Brent's method)
//!
//! Golden-section search safeguarded parabolic interpolation on a closed
//! interval. The objective is never evaluated outside `[lower, upper]` and the
//! search stops once the bracket around the best point is within
//! `xatol + sqrt(eps) * |x|`.

use thiserror::Error;

/// Stopping criteria of [`minimize_bounded`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedOptions {
    /// Absolute tolerance on the abscissa of the minimum
    pub xatol: f64,
    /// Maximum number of objective evaluations
    pub max_iterations: usize,
}

impl Default for BoundedOptions {
    fn default() -> Self {
        Self {
            xatol: 1e-5,
            max_iterations: 500,
        }
    }
}

/// A certified minimum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    pub x: f64,
    pub fx: f64,
    /// Number of objective evaluations
    pub iterations: usize,
    /// The minimum lies on (within tolerance of) one of the bounds
    pub at_bound: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MinimizeError {
    #[error("Invalid bounds [{lower}, {upper}]")]
    InvalidBounds { lower: f64, upper: f64 },
    #[error("Maximum number of evaluations ({iterations}) reached, last estimate {x}")]
    MaxIterations { iterations: usize, x: f64 },
    #[error("Objective produced a non-finite value after {iterations} evaluations")]
    NonFinite { iterations: usize },
}

impl MinimizeError {
    pub fn iterations(&self) -> usize {
        match self {
            MinimizeError::InvalidBounds { .. } => 0,
            MinimizeError::MaxIterations { iterations, .. }
            | MinimizeError::NonFinite { iterations } => *iterations,
        }
    }
}

/// `sign(x)`, with 0 counted as positive
fn sign(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Minimise `f` over `[lower, upper]`
pub fn minimize_bounded<F>(
    f: F,
    lower: f64,
    upper: f64,
    options: &BoundedOptions,
) -> Result<Minimum, MinimizeError>
where
    F: Fn(f64) -> f64,
{
    if !(lower.is_finite() && upper.is_finite() && lower < upper) {
        return Err(MinimizeError::InvalidBounds { lower, upper });
    }

    let sqrt_eps = f64::EPSILON.sqrt();
    let golden_mean = 0.5 * (3.0 - 5.0_f64.sqrt());

    let (mut a, mut b) = (lower, upper);
    // xf: best point so far, nfc: second best, fulc: previous second best
    let mut fulc = a + golden_mean * (b - a);
    let (mut nfc, mut xf) = (fulc, fulc);
    let (mut rat, mut e) = (0.0_f64, 0.0_f64);
    let mut fx = f(xf);
    let mut iterations = 1;
    let mut fu = f64::INFINITY;
    let (mut ffulc, mut fnfc) = (fx, fx);

    let mut xm = 0.5 * (a + b);
    let mut tol1 = sqrt_eps * xf.abs() + options.xatol / 3.0;
    let mut tol2 = 2.0 * tol1;
    let mut exhausted = false;

    while (xf - xm).abs() > tol2 - 0.5 * (b - a) {
        let mut golden = true;

        if e.abs() > tol1 {
            golden = false;
            let mut r = (xf - nfc) * (fx - ffulc);
            let mut q = (xf - fulc) * (fx - fnfc);
            let mut p = (xf - fulc) * q - (xf - nfc) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            r = e;
            e = rat;

            if p.abs() < (0.5 * q * r).abs() && p > q * (a - xf) && p < q * (b - xf) {
                rat = p / q;
                let x = xf + rat;
                if (x - a) < tol2 || (b - x) < tol2 {
                    rat = tol1 * sign(xm - xf);
                }
            } else {
                golden = true;
            }
        }

        if golden {
            e = if xf >= xm { a - xf } else { b - xf };
            rat = golden_mean * e;
        }

        let x = xf + sign(rat) * rat.abs().max(tol1);
        fu = f(x);
        iterations += 1;

        if fu <= fx {
            if x >= xf {
                a = xf;
            } else {
                b = xf;
            }
            fulc = nfc;
            ffulc = fnfc;
            nfc = xf;
            fnfc = fx;
            xf = x;
            fx = fu;
        } else {
            if x < xf {
                a = x;
            } else {
                b = x;
            }
            if fu <= fnfc || nfc == xf {
                fulc = nfc;
                ffulc = fnfc;
                nfc = x;
                fnfc = fu;
            } else if fu <= ffulc || fulc == xf || fulc == nfc {
                fulc = x;
                ffulc = fu;
            }
        }

        xm = 0.5 * (a + b);
        tol1 = sqrt_eps * xf.abs() + options.xatol / 3.0;
        tol2 = 2.0 * tol1;

        if iterations >= options.max_iterations {
            exhausted = true;
            break;
        }
    }

    if !xf.is_finite() || !fx.is_finite() || fu.is_nan() {
        return Err(MinimizeError::NonFinite { iterations });
    }
    if exhausted {
        return Err(MinimizeError::MaxIterations { iterations, x: xf });
    }

    Ok(Minimum {
        x: xf,
        fx,
        iterations,
        at_bound: (xf - lower) <= 2.0 * tol2 || (upper - xf) <= 2.0 * tol2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_smooth_parabola() {
        let min = minimize_bounded(|x| (x - 2.3).powi(2) + 1.0, 0.0, 5.0, &BoundedOptions::default())
            .unwrap();
        assert_relative_eq!(min.x, 2.3, epsilon = 1e-5);
        assert_relative_eq!(min.fx, 1.0, epsilon = 1e-9);
        assert!(!min.at_bound);
        assert!(min.iterations < 50);
    }

    #[test]
    fn test_v_shaped_objective() {
        for &target in &[1.01, 1.5, 3.3333, 4.99] {
            let min =
                minimize_bounded(|x| (x - target).abs(), 1.0, 5.0, &BoundedOptions::default())
                    .unwrap();
            assert!(
                (min.x - target).abs() < 1e-4,
                "target {} found {}",
                target,
                min.x
            );
        }
    }

    #[test]
    fn test_minimum_on_bound() {
        let min = minimize_bounded(|x| x, 1.0, 5.0, &BoundedOptions::default()).unwrap();
        assert!(min.x >= 1.0);
        assert!(min.x - 1.0 < 1e-4);
        assert!(min.at_bound);

        let min = minimize_bounded(|x| -x, 1.0, 5.0, &BoundedOptions::default()).unwrap();
        assert!(min.x <= 5.0);
        assert!(5.0 - min.x < 1e-4);
        assert!(min.at_bound);
    }

    #[test]
    fn test_tight_tolerance() {
        let options = BoundedOptions {
            xatol: 1e-10,
            max_iterations: 500,
        };
        let min = minimize_bounded(|x| (x - 1.2345678).powi(2), 1.0, 5.0, &options).unwrap();
        assert_relative_eq!(min.x, 1.2345678, epsilon = 1e-7);
    }

    #[test]
    fn test_iteration_budget_exhausted() {
        let options = BoundedOptions {
            xatol: 1e-5,
            max_iterations: 3,
        };
        match minimize_bounded(|x| (x - 4.2).abs(), 1.0, 5.0, &options) {
            Err(MinimizeError::MaxIterations { iterations, .. }) => assert_eq!(iterations, 3),
            other => panic!("expected MaxIterations, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_objective() {
        let result = minimize_bounded(|_| f64::NAN, 1.0, 5.0, &BoundedOptions::default());
        assert!(matches!(result, Err(MinimizeError::NonFinite { .. })));
    }

    #[test]
    fn test_invalid_bounds() {
        let options = BoundedOptions::default();
        assert!(matches!(
            minimize_bounded(|x| x, 5.0, 1.0, &options),
            Err(MinimizeError::InvalidBounds { .. })
        ));
        assert!(matches!(
            minimize_bounded(|x| x, 1.0, f64::INFINITY, &options),
            Err(MinimizeError::InvalidBounds { .. })
        ));
    }
}
