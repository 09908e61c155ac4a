//! Solvability check for sets of locked parameters.

use std::collections::BTreeSet;
use thiserror::Error;

use crate::slot::Slot;

/// A lock combination that over-constrains the duct.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockViolation {
    #[error(
        "Error: Cannot lock Flow Rate, Head Loss, and Equivalent Diameter together (overdetermined system)"
    )]
    OverdeterminedFriction,

    #[error(
        "Error: Cannot lock Equivalent Diameter, Duct Size X, and Duct Size Y together (inconsistent geometry)"
    )]
    InconsistentGeometry,
}

const FRICTION_TRIPLE: [Slot; 3] = [Slot::FlowRate, Slot::HeadLoss, Slot::EquivDiameter];
const GEOMETRY_TRIPLE: [Slot; 3] = [Slot::EquivDiameter, Slot::DuctSizeX, Slot::DuctSizeY];

/// Check a proposed set of locked slots.
///
/// Only editable slots count. Fewer than three locks are always solvable.
pub fn validate_locks(locked: &BTreeSet<Slot>) -> Result<(), LockViolation> {
    let editable: BTreeSet<Slot> = locked
        .iter()
        .copied()
        .filter(|slot| slot.is_editable())
        .collect();

    if editable.len() < 3 {
        return Ok(());
    }

    if FRICTION_TRIPLE.iter().all(|slot| editable.contains(slot)) {
        return Err(LockViolation::OverdeterminedFriction);
    }

    if GEOMETRY_TRIPLE.iter().all(|slot| editable.contains(slot)) {
        return Err(LockViolation::InconsistentGeometry);
    }

    Ok(())
}
