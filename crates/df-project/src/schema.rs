//! Scenario schema definitions.

use df_core::UnitSystem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A starting state for the engine plus a scripted list of edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluid: Option<FluidDef>,
    /// Slot id to imperial value, stored before anything is recomputed
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub initial: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locks: Vec<String>,
    #[serde(default)]
    pub steps: Vec<StepDef>,
}

/// Either a catalog preset or custom imperial values, not both.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FluidDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomFluidDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomFluidDef {
    /// lb/ft³
    pub density: f64,
    /// lb/ft·h
    pub viscosity: f64,
    /// Btu/lb·°F
    #[serde(default = "default_specific_heat")]
    pub specific_heat: f64,
    #[serde(default = "default_energy_factor")]
    pub energy_factor: f64,
}

fn default_specific_heat() -> f64 {
    0.24
}

fn default_energy_factor() -> f64 {
    0.96
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepDef {
    Edit {
        slot: String,
        value: f64,
        #[serde(default)]
        unit: UnitSystem,
    },
    EditText {
        slot: String,
        text: String,
        #[serde(default)]
        unit: UnitSystem,
    },
    Lock {
        slot: String,
    },
    Unlock {
        slot: String,
    },
    Preset {
        id: String,
    },
    Fluid {
        property: String,
        value: f64,
        #[serde(default)]
        unit: UnitSystem,
    },
    Refresh,
}

impl StepDef {
    /// Short human-readable form for transcripts.
    pub fn describe(&self) -> String {
        match self {
            StepDef::Edit { slot, value, unit } => format!("edit {slot} = {value} ({unit:?})"),
            StepDef::EditText { slot, text, unit } => {
                format!("edit {slot} = {text:?} ({unit:?})")
            }
            StepDef::Lock { slot } => format!("lock {slot}"),
            StepDef::Unlock { slot } => format!("unlock {slot}"),
            StepDef::Preset { id } => format!("preset {id}"),
            StepDef::Fluid {
                property,
                value,
                unit,
            } => format!("fluid {property} = {value} ({unit:?})"),
            StepDef::Refresh => "refresh".to_string(),
        }
    }
}
