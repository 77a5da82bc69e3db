//! Utility functions and types.
use crate::error::{AnalysisError, Result};

/// Bisection algorithm for finding the root of an equation given values bracketing a root.
///
/// The search stops once the bracket is narrower than `tolerance` and returns its midpoint. If
/// that does not happen within `max_iterations` halvings the last midpoint is reported in an
/// [`AnalysisError::Convergence`]. The function values at `low_val` and `high_val` must not have
/// the same sign.
pub(crate) fn find_root<F>(
    f: F,
    mut low_val: f64,
    mut high_val: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    if low_val > high_val {
        ::std::mem::swap(&mut low_val, &mut high_val);
    }

    let mut f_low = f(low_val);
    let f_high = f(high_val);

    if f_low == 0.0 {
        return Ok(low_val);
    }
    if f_high == 0.0 {
        return Ok(high_val);
    }
    if !f_low.is_finite() || !f_high.is_finite() || f_low.signum() == f_high.signum() {
        return Err(AnalysisError::invalid(format!(
            "no root bracketed between {:.3} and {:.3}",
            low_val, high_val
        )));
    }

    for iteration in 1..=max_iterations {
        let mid_val = (high_val - low_val) / 2.0 + low_val;
        let f_mid = f(mid_val);

        if f_mid == 0.0 {
            log::trace!("bisection hit exact root after {} iterations", iteration);
            return Ok(mid_val);
        }

        if f_mid.signum() == f_low.signum() {
            low_val = mid_val;
            f_low = f_mid;
        } else {
            high_val = mid_val;
        }

        if (high_val - low_val).abs() < tolerance {
            log::trace!("bisection converged after {} iterations", iteration);
            return Ok((high_val - low_val) / 2.0 + low_val);
        }
    }

    Err(AnalysisError::Convergence {
        last_estimate: (high_val - low_val) / 2.0 + low_val,
        iterations: max_iterations,
    })
}

#[cfg(test)]
pub mod test_tools {
    pub fn approx_equal(val1: f64, val2: f64, eps: f64) -> bool {
        assert!(eps > 0.0);

        (val1 - val2).abs() < eps
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::*;

    #[test]
    fn test_find_root() {
        assert!(approx_equal(
            1.0,
            find_root(|x| x * x - 1.0, 2.0, 0.0, 1.0e-10, 100).unwrap(),
            1.0e-10
        ));
        assert!(approx_equal(
            -1.0,
            find_root(|x| x * x - 1.0, -2.0, 0.0, 1.0e-10, 100).unwrap(),
            1.0e-10
        ));
    }

    #[test]
    fn test_find_root_endpoints() {
        assert_eq!(find_root(|x| x - 3.0, 3.0, 5.0, 0.1, 10), Ok(3.0));
        assert_eq!(find_root(|x| x - 5.0, 3.0, 5.0, 0.1, 10), Ok(5.0));
    }

    #[test]
    fn test_find_root_not_bracketed() {
        match find_root(|x| x * x + 1.0, -2.0, 2.0, 0.1, 100) {
            Err(AnalysisError::InvalidParcelState(_)) => {}
            other => panic!("expected an invalid state, got {:?}", other),
        }
    }

    #[test]
    fn test_find_root_iteration_cap() {
        match find_root(|x| x - 1.234_567, 0.0, 100.0, 1.0e-6, 5) {
            Err(AnalysisError::Convergence {
                last_estimate,
                iterations,
            }) => {
                assert_eq!(iterations, 5);
                // After 5 halvings the bracket is 100 / 32 wide.
                assert!(approx_equal(last_estimate, 1.234_567, 100.0 / 32.0));
            }
            other => panic!("expected a convergence failure, got {:?}", other),
        }
    }
}
