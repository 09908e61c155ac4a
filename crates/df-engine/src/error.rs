//! Error types for engine operations.

use df_core::DfError;
use thiserror::Error;

use crate::lock::LockViolation;

/// Errors returned by engine operations.
///
/// None of these leave the engine recomputing; a failed pass is reported
/// through the status line rather than as an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Lock rejected: {0}")]
    Lock(#[from] LockViolation),

    #[error("{slot} is read-only")]
    NotEditable { slot: &'static str },

    #[error("{slot} cannot be locked")]
    NotLockable { slot: &'static str },

    #[error("Unknown parameter slot: {name}")]
    UnknownSlot { name: String },

    #[error("Unknown fluid property: {name}")]
    UnknownFluidProperty { name: String },

    #[error("Unknown fluid preset: {query}")]
    UnknownPreset { query: String },

    #[error(transparent)]
    Core(#[from] DfError),
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EngineError::NotEditable { slot: "Flow Area" };
        assert!(err.to_string().contains("Flow Area"));
    }

    #[test]
    fn error_conversion() {
        let core = DfError::InvalidNumber {
            text: "1..2".to_string(),
        };
        let err: EngineError = core.into();
        assert!(matches!(err, EngineError::Core(DfError::InvalidNumber { .. })));
    }
}
