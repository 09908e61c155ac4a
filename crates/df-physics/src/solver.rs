//! Iterative equivalent diameter from a target head loss.

use crate::formulas::{
    flow_area, friction_factor, head_loss_darcy_weisbach, reynolds, standard_air_diameter,
    velocity_from_flow,
};
use df_core::numeric::relative_error;

/// Iteration cap used by the propagation engine.
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Relative head-loss error accepted as converged.
pub const CONVERGENCE_TOL: f64 = 1e-3;

/// Damping exponent of the multiplicative diameter update.
const UPDATE_EXPONENT: f64 = 0.2;

/// Outcome of a diameter solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    /// Last diameter iterate (in), converged or not
    pub diameter: f64,
    /// Number of head-loss evaluations performed
    pub iterations: usize,
    /// Whether the last evaluation was within tolerance
    pub converged: bool,
}

/// Head loss (in WC/100 ft) a duct of diameter `de` produces at flow `q`.
pub fn predicted_head_loss(q: f64, de: f64, rho: f64, mu: f64) -> f64 {
    let area = flow_area(de);
    let v = velocity_from_flow(q, area);
    let re = reynolds(rho, v, de, mu);
    let f = friction_factor(re);
    head_loss_darcy_weisbach(f, de, v, rho)
}

/// Solve for the diameter that produces `head_loss` at flow `q`.
///
/// Starts from the standard-air closed form and rescales the diameter by
/// `(calc/target)^0.2` until the relative error drops below 0.1% or
/// `max_iterations` evaluations have been spent.
pub fn solve_equivalent_diameter(
    q: f64,
    head_loss: f64,
    rho: f64,
    mu: f64,
    max_iterations: usize,
) -> SolveReport {
    if q <= 0.0 || head_loss <= 0.0 {
        return SolveReport {
            diameter: 0.0,
            iterations: 0,
            converged: false,
        };
    }

    let mut de = standard_air_diameter(q, head_loss);
    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..max_iterations {
        let calc = predicted_head_loss(q, de, rho, mu);
        iterations += 1;

        if relative_error(calc, head_loss).abs() < CONVERGENCE_TOL {
            converged = true;
            break;
        }

        // Too much loss means the duct is too small
        de *= (calc / head_loss).powf(UPDATE_EXPONENT);
    }

    SolveReport {
        diameter: de,
        iterations,
        converged,
    }
}

/// Diameter (in) for a target head loss; the last iterate is returned even
/// when the cap is hit first.
pub fn equivalent_diameter_from_head_loss(
    q: f64,
    head_loss: f64,
    rho: f64,
    mu: f64,
    max_iterations: usize,
) -> f64 {
    solve_equivalent_diameter(q, head_loss, rho, mu, max_iterations).diameter
}

#[cfg(test)]
mod tests {
    use super::*;

    const RHO: f64 = 0.075;
    const MU: f64 = 0.0473;

    #[test]
    fn invalid_targets_give_zero() {
        let report = solve_equivalent_diameter(0.0, 0.08, RHO, MU, 5);
        assert_eq!(report.diameter, 0.0);
        assert_eq!(report.iterations, 0);
        assert_eq!(equivalent_diameter_from_head_loss(500.0, -1.0, RHO, MU, 5), 0.0);
    }

    #[test]
    fn zero_cap_returns_seed() {
        let report = solve_equivalent_diameter(500.0, 0.08, RHO, MU, 0);
        assert_eq!(report.iterations, 0);
        assert!(!report.converged);
        assert_eq!(report.diameter, standard_air_diameter(500.0, 0.08));
    }

    #[test]
    fn cap_is_respected_without_convergence() {
        // The seed is far from the literal Darcy-Weisbach form here
        let report = solve_equivalent_diameter(500.0, 0.08, RHO, MU, 2);
        assert_eq!(report.iterations, 2);
        assert!(!report.converged);
        assert!(report.diameter > 0.0);
    }

    #[test]
    fn converges_with_enough_iterations() {
        let report = solve_equivalent_diameter(500.0, 0.08, RHO, MU, 50);
        assert!(report.converged, "{report:?}");
        let calc = predicted_head_loss(500.0, report.diameter, RHO, MU);
        assert!(relative_error(calc, 0.08).abs() < CONVERGENCE_TOL);
    }

    #[test]
    fn wrapper_matches_report() {
        let report = solve_equivalent_diameter(800.0, 0.1, RHO, MU, DEFAULT_MAX_ITERATIONS);
        let de = equivalent_diameter_from_head_loss(800.0, 0.1, RHO, MU, DEFAULT_MAX_ITERATIONS);
        assert_eq!(report.diameter, de);
    }
}
