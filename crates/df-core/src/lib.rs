//! df-core: shared foundation for ductflow.
//!
//! Contains:
//! - units (imperial/metric unit pairs, conversion factors, uom constructors)
//! - numeric (Real + tolerances + float helpers)
//! - dual (a quantity kept in both unit systems)
//! - error (shared error types)

pub mod dual;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use dual::{DualValue, format_value, parse_value};
pub use error::{DfError, DfResult};
pub use numeric::*;
pub use units::{UnitPair, UnitSystem};
