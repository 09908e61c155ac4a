//! df-engine: recompute propagation for duct parameters.
//!
//! Contains:
//! - slot (parameter slots and change triggers)
//! - fluid (fluid properties and the preset catalog)
//! - table (parameter and fluid-property tables)
//! - lock (solvability check for locked parameters)
//! - engine (the propagation engine)
//! - snapshot (serializable and typed views)

pub mod engine;
pub mod error;
pub mod fluid;
pub mod lock;
pub mod slot;
pub mod snapshot;
pub mod table;

pub use engine::{CUSTOM_FLUID, EngineState, PropagationEngine};
pub use error::{EngineError, EngineResult};
pub use fluid::{FluidPreset, FluidProperty, PresetKind};
pub use lock::{LockViolation, validate_locks};
pub use slot::{Slot, Trigger};
pub use snapshot::{DuctGeometry, FlowConditions, Snapshot};
pub use table::{FluidTable, ParameterTable};
