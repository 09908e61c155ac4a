//! Empirical constants of the imperial duct-sizing equations.

/// Standard air density (lb/ft³).
pub const STANDARD_AIR_DENSITY: f64 = 0.075;

/// Laminar/turbulent boundary; `Re < 2300` is laminar.
pub const LAMINAR_LIMIT_RE: f64 = 2300.0;

/// Relative roughness used by the turbulent correlation (galvanized steel).
pub const DEFAULT_ROUGHNESS: f64 = 0.0005;

/// Velocity pressure constant: `VP = (V / 4005)²` in WC for standard air.
pub const VP_CONSTANT: f64 = 4005.0;

/// Darcy-Weisbach conversion constant to in WC.
pub const DW_CONSTANT: f64 = 1097.0;

/// Run length the head loss is quoted over (ft).
pub const HEAD_LOSS_RUN_FT: f64 = 100.0;

/// Equivalent-diameter coefficient for rectangular ducts.
pub const DE_COEFFICIENT: f64 = 1.30;

/// Standard-air closed form: `De = (0.109136 * q^1.9 / ΔP)^(1/5.02)`.
pub const STD_AIR_COEFFICIENT: f64 = 0.109_136;
pub const STD_AIR_FLOW_EXPONENT: f64 = 1.9;
pub const STD_AIR_ROOT: f64 = 5.02;

/// Inches per foot.
pub const IN_PER_FT: f64 = 12.0;

/// Square inches per square foot.
pub const IN2_PER_FT2: f64 = 144.0;

/// Minutes per hour, for fpm against lb/ft·h viscosity.
pub const MIN_PER_HOUR: f64 = 60.0;
