//! Closed-form duct-sizing equations.

use crate::constants::*;
use std::f64::consts::PI;

/// Equivalent diameter of a rectangular `x` by `y` duct (in).
///
/// `De = 1.30 * (x*y)^0.625 / (x+y)^0.25`
pub fn equivalent_diameter(x: f64, y: f64) -> f64 {
    if x <= 0.0 || y <= 0.0 {
        return 0.0;
    }
    DE_COEFFICIENT * (x * y).powf(0.625) / (x + y).powf(0.25)
}

/// Circular flow area (ft²) for a diameter in inches.
pub fn flow_area(de: f64) -> f64 {
    if de <= 0.0 {
        return 0.0;
    }
    PI * (de / 2.0).powi(2) / IN2_PER_FT2
}

/// Velocity (fpm) from flow (ft³/min) and area (ft²).
pub fn velocity_from_flow(q: f64, area: f64) -> f64 {
    if area <= 0.0 {
        return 0.0;
    }
    q / area
}

/// Flow (ft³/min) from velocity (fpm) and area (ft²).
pub fn flow_from_velocity(v: f64, area: f64) -> f64 {
    if area <= 0.0 {
        return 0.0;
    }
    v * area
}

/// Reynolds number from density (lb/ft³), velocity (fpm), diameter (in) and
/// viscosity (lb/ft·h).
pub fn reynolds(rho: f64, v: f64, de: f64, mu: f64) -> f64 {
    if mu <= 0.0 || de <= 0.0 {
        return 0.0;
    }
    rho * v * MIN_PER_HOUR * (de / IN_PER_FT) / mu
}

/// Darcy friction factor at the default roughness.
pub fn friction_factor(re: f64) -> f64 {
    friction_factor_with_roughness(re, DEFAULT_ROUGHNESS)
}

/// Darcy friction factor: laminar `64/Re` below 2300, Swamee-Jain above.
///
/// The two branches do not meet at `Re = 2300`.
pub fn friction_factor_with_roughness(re: f64, roughness: f64) -> f64 {
    if re <= 0.0 {
        return 0.0;
    }
    if re < LAMINAR_LIMIT_RE {
        64.0 / re
    } else {
        let log_term = (roughness / 3.7 + 5.74 / re.powf(0.9)).log10();
        0.25 / log_term.powi(2)
    }
}

/// Velocity pressure (in WC), scaled from standard air by density.
pub fn velocity_pressure(v: f64, rho: f64) -> f64 {
    if v <= 0.0 {
        return 0.0;
    }
    (rho / STANDARD_AIR_DENSITY) * (v / VP_CONSTANT).powi(2)
}

/// Pressure drop per 100 ft of run (in WC/100 ft).
///
/// `ΔP = f * (100 / D_ft) * (ρ * V²) / (2 * 1097)`
pub fn head_loss_darcy_weisbach(f: f64, de: f64, v: f64, rho: f64) -> f64 {
    if de <= 0.0 || v <= 0.0 {
        return 0.0;
    }
    let diameter_ft = de / IN_PER_FT;
    f * (HEAD_LOSS_RUN_FT / diameter_ft) * (rho * v.powi(2)) / (2.0 * DW_CONSTANT)
}

/// Standard-air diameter estimate (in) from flow and head loss.
pub fn standard_air_diameter(q: f64, head_loss: f64) -> f64 {
    if q <= 0.0 || head_loss <= 0.0 {
        return 0.0;
    }
    (STD_AIR_COEFFICIENT * q.powf(STD_AIR_FLOW_EXPONENT) / head_loss).powf(1.0 / STD_AIR_ROOT)
}

/// Duct side `y` (in) holding the circular area of `de` against side `x`.
pub fn duct_size_y_from_de(de: f64, x: f64) -> f64 {
    if de <= 0.0 || x <= 0.0 {
        return 0.0;
    }
    PI * (de / 2.0).powi(2) / x
}

/// Duct side `x` (in) holding the circular area of `de` against side `y`.
pub fn duct_size_x_from_de(de: f64, y: f64) -> f64 {
    duct_size_y_from_de(de, y)
}
