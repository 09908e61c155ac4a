//! Scenario validation logic.

use crate::schema::{FluidDef, Scenario, StepDef};
use df_core::parse_value;
use df_engine::{FluidProperty, Slot, fluid, validate_locks};
use std::collections::BTreeSet;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Unknown slot: {name} in {context}")]
    UnknownSlot { name: String, context: String },

    #[error("Slot {name} is not editable ({context})")]
    NotEditable { name: String, context: String },

    #[error("Duplicate lock: {name}")]
    DuplicateLock { name: String },

    #[error("Unknown fluid preset: {id}")]
    UnknownPreset { id: String },

    #[error("Unknown fluid property: {name}")]
    UnknownProperty { name: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid fluid: {reason}")]
    InvalidFluid { reason: String },

    #[error("Invalid lock set: {reason}")]
    LockConflict { reason: String },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if let Some(fluid) = &scenario.fluid {
        validate_fluid(fluid)?;
    }

    for (name, value) in &scenario.initial {
        let slot = parse_slot(name, "initial")?;
        check_finite(&format!("initial.{}", slot.id()), *value)?;
    }

    let mut locked = BTreeSet::new();
    for name in &scenario.locks {
        let slot = parse_editable(name, "locks")?;
        if !locked.insert(slot) {
            return Err(ValidationError::DuplicateLock { name: name.clone() });
        }
    }
    validate_locks(&locked).map_err(|violation| ValidationError::LockConflict {
        reason: violation.to_string(),
    })?;

    for (index, step) in scenario.steps.iter().enumerate() {
        validate_step(index, step)?;
    }

    Ok(())
}

fn validate_fluid(fluid: &FluidDef) -> Result<(), ValidationError> {
    match (&fluid.preset, &fluid.custom) {
        (Some(_), Some(_)) => Err(ValidationError::InvalidFluid {
            reason: "set either preset or custom, not both".to_string(),
        }),
        (None, None) => Err(ValidationError::InvalidFluid {
            reason: "preset or custom is required".to_string(),
        }),
        (Some(id), None) => {
            if fluid::lookup(id).is_none() {
                return Err(ValidationError::UnknownPreset { id: id.clone() });
            }
            Ok(())
        }
        (None, Some(custom)) => {
            check_positive("fluid.custom.density", custom.density)?;
            check_positive("fluid.custom.viscosity", custom.viscosity)?;
            check_finite("fluid.custom.specific_heat", custom.specific_heat)?;
            check_finite("fluid.custom.energy_factor", custom.energy_factor)?;
            Ok(())
        }
    }
}

fn validate_step(index: usize, step: &StepDef) -> Result<(), ValidationError> {
    let context = format!("steps[{index}]");
    match step {
        StepDef::Edit { slot, value, .. } => {
            parse_editable(slot, &context)?;
            check_finite(&format!("{context}.value"), *value)
        }
        StepDef::EditText { slot, text, .. } => {
            parse_editable(slot, &context)?;
            parse_value(text).map_err(|err| ValidationError::InvalidValue {
                field: format!("{context}.text"),
                value: text.clone(),
                reason: err.to_string(),
            })?;
            Ok(())
        }
        StepDef::Lock { slot } | StepDef::Unlock { slot } => {
            parse_editable(slot, &context)?;
            Ok(())
        }
        StepDef::Preset { id } => {
            if fluid::lookup(id).is_none() {
                return Err(ValidationError::UnknownPreset { id: id.clone() });
            }
            Ok(())
        }
        StepDef::Fluid {
            property, value, ..
        } => {
            property
                .parse::<FluidProperty>()
                .map_err(|_| ValidationError::UnknownProperty {
                    name: property.clone(),
                })?;
            check_finite(&format!("{context}.value"), *value)
        }
        StepDef::Refresh => Ok(()),
    }
}

pub(crate) fn parse_slot(name: &str, context: &str) -> Result<Slot, ValidationError> {
    name.parse::<Slot>()
        .map_err(|_| ValidationError::UnknownSlot {
            name: name.to_string(),
            context: context.to_string(),
        })
}

pub(crate) fn parse_editable(name: &str, context: &str) -> Result<Slot, ValidationError> {
    let slot = parse_slot(name, context)?;
    if !slot.is_editable() {
        return Err(ValidationError::NotEditable {
            name: name.to_string(),
            context: context.to_string(),
        });
    }
    Ok(slot)
}

fn check_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite".to_string(),
        });
    }
    Ok(())
}

fn check_positive(field: &str, value: f64) -> Result<(), ValidationError> {
    check_finite(field, value)?;
    if value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CustomFluidDef;

    fn scenario() -> Scenario {
        Scenario {
            version: 1,
            name: "test".to_string(),
            fluid: None,
            initial: Default::default(),
            locks: vec![],
            steps: vec![],
        }
    }

    #[test]
    fn empty_scenario_is_valid() {
        validate_scenario(&scenario()).unwrap();
    }

    #[test]
    fn version_checked() {
        let mut s = scenario();
        s.version = 2;
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::UnsupportedVersion { version: 2 })
        ));
    }

    #[test]
    fn locks_must_be_editable_and_solvable() {
        let mut s = scenario();
        s.locks = vec!["flow_area".to_string()];
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::NotEditable { .. })
        ));

        s.locks = vec!["equiv_diameter".into(), "duct_size_x".into(), "duct_size_y".into()];
        let err = validate_scenario(&s).unwrap_err();
        assert!(err.to_string().contains("inconsistent geometry"));

        s.locks = vec!["flow_rate".into(), "flow-rate".into()];
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::DuplicateLock { .. })
        ));
    }

    #[test]
    fn initial_may_seed_any_slot() {
        let mut s = scenario();
        s.initial.insert("reynolds_number".into(), 1000.0);
        validate_scenario(&s).unwrap();
        s.initial.insert("pressure".into(), 1.0);
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::UnknownSlot { .. })
        ));
    }

    #[test]
    fn fluid_needs_exactly_one_source() {
        let mut s = scenario();
        s.fluid = Some(FluidDef::default());
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::InvalidFluid { .. })
        ));

        s.fluid = Some(FluidDef {
            preset: Some("steam".into()),
            custom: None,
        });
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::UnknownPreset { .. })
        ));

        s.fluid = Some(FluidDef {
            preset: None,
            custom: Some(CustomFluidDef {
                density: 0.07,
                viscosity: 0.0,
                specific_heat: 0.24,
                energy_factor: 0.96,
            }),
        });
        let err = validate_scenario(&s).unwrap_err();
        assert!(err.to_string().contains("fluid.custom.viscosity"));
    }

    #[test]
    fn steps_are_checked() {
        let mut s = scenario();
        s.steps = vec![StepDef::EditText {
            slot: "flow_rate".into(),
            text: "1.2.3".into(),
            unit: Default::default(),
        }];
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::InvalidValue { .. })
        ));

        s.steps = vec![StepDef::Fluid {
            property: "enthalpy".into(),
            value: 1.0,
            unit: Default::default(),
        }];
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::UnknownProperty { .. })
        ));

        s.steps = vec![StepDef::Edit {
            slot: "velocity_echo".into(),
            value: 1.0,
            unit: Default::default(),
        }];
        let err = validate_scenario(&s).unwrap_err();
        assert!(err.to_string().contains("steps[0]"));
    }
}
