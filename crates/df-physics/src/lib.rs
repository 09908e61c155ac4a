//! df-physics: duct-sizing formulas.
//!
//! Every function is pure and works in the fixed imperial duct units:
//! inches for sizes and diameters, ft² for area, fpm for velocity,
//! ft³/min for flow, lb/ft³ for density, lb/ft·h for viscosity and
//! in WC (per 100 ft for head loss) for pressures.
//!
//! Inputs outside a formula's domain (non-positive divisors, diameters,
//! viscosities) yield `0.0` instead of an error.
//!
//! # Example
//!
//! ```
//! use df_physics::{equivalent_diameter, flow_area, velocity_from_flow};
//!
//! let de = equivalent_diameter(10.0, 10.0);
//! let area = flow_area(de);
//! let v = velocity_from_flow(500.0, area);
//! assert!((de - 10.93).abs() < 0.01);
//! assert!((v - 767.1).abs() < 0.1);
//! ```

pub mod constants;
pub mod formulas;
pub mod solver;

// Re-exports
pub use formulas::{
    duct_size_x_from_de, duct_size_y_from_de, equivalent_diameter, flow_area,
    flow_from_velocity, friction_factor, friction_factor_with_roughness,
    head_loss_darcy_weisbach, reynolds, standard_air_diameter, velocity_from_flow,
    velocity_pressure,
};
pub use solver::{
    DEFAULT_MAX_ITERATIONS, SolveReport, equivalent_diameter_from_head_loss,
    solve_equivalent_diameter,
};
