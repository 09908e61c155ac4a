//! Parameter slots and the change triggers that start a recompute.

use df_core::units::{self, UnitPair};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// One of the 13 tracked duct parameters, in table order.
///
/// The first six are user-editable and lockable; the rest are engine-written
/// echoes and derived quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    FlowRate,
    HeadLoss,
    Velocity,
    EquivDiameter,
    DuctSizeX,
    DuctSizeY,
    EquivDiameterEcho,
    FlowArea,
    VelocityEcho,
    ReynoldsNumber,
    FrictionFactor,
    VelocityPressure,
    HeadLossEcho,
}

impl Slot {
    pub const COUNT: usize = 13;

    pub const ALL: [Slot; Self::COUNT] = [
        Slot::FlowRate,
        Slot::HeadLoss,
        Slot::Velocity,
        Slot::EquivDiameter,
        Slot::DuctSizeX,
        Slot::DuctSizeY,
        Slot::EquivDiameterEcho,
        Slot::FlowArea,
        Slot::VelocityEcho,
        Slot::ReynoldsNumber,
        Slot::FrictionFactor,
        Slot::VelocityPressure,
        Slot::HeadLossEcho,
    ];

    pub const EDITABLE: [Slot; 6] = [
        Slot::FlowRate,
        Slot::HeadLoss,
        Slot::Velocity,
        Slot::EquivDiameter,
        Slot::DuctSizeX,
        Slot::DuctSizeY,
    ];

    /// Position in the parameter table.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Slot> {
        Self::ALL.get(index).copied()
    }

    pub fn is_editable(self) -> bool {
        self.index() < Self::EDITABLE.len()
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Slot::FlowRate => "Flow Rate",
            Slot::HeadLoss | Slot::HeadLossEcho => "Head Loss",
            Slot::Velocity | Slot::VelocityEcho => "Fluid Velocity",
            Slot::EquivDiameter | Slot::EquivDiameterEcho => "Equivalent Diameter",
            Slot::DuctSizeX => "Duct Size X",
            Slot::DuctSizeY => "Duct Size Y",
            Slot::FlowArea => "Flow Area",
            Slot::ReynoldsNumber => "Reynolds Number",
            Slot::FrictionFactor => "Friction Factor",
            Slot::VelocityPressure => "Velocity Pressure",
        }
    }

    /// Stable identifier used in scenario files and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Slot::FlowRate => "flow_rate",
            Slot::HeadLoss => "head_loss",
            Slot::Velocity => "velocity",
            Slot::EquivDiameter => "equiv_diameter",
            Slot::DuctSizeX => "duct_size_x",
            Slot::DuctSizeY => "duct_size_y",
            Slot::EquivDiameterEcho => "equiv_diameter_echo",
            Slot::FlowArea => "flow_area",
            Slot::VelocityEcho => "velocity_echo",
            Slot::ReynoldsNumber => "reynolds_number",
            Slot::FrictionFactor => "friction_factor",
            Slot::VelocityPressure => "velocity_pressure",
            Slot::HeadLossEcho => "head_loss_echo",
        }
    }

    pub fn units(self) -> UnitPair {
        match self {
            Slot::FlowRate => units::FLOW_RATE,
            Slot::HeadLoss => units::HEAD_LOSS,
            Slot::Velocity | Slot::VelocityEcho => units::VELOCITY,
            Slot::EquivDiameter
            | Slot::DuctSizeX
            | Slot::DuctSizeY
            | Slot::EquivDiameterEcho => units::SIZE,
            Slot::FlowArea => units::FLOW_AREA,
            Slot::ReynoldsNumber | Slot::FrictionFactor => units::DIMENSIONLESS,
            // The echoed head loss is shown as a plain pressure
            Slot::VelocityPressure | Slot::HeadLossEcho => units::PRESSURE,
        }
    }

    /// The trigger an edit of this slot raises, if it is editable.
    pub fn trigger(self) -> Option<Trigger> {
        match self {
            Slot::FlowRate => Some(Trigger::FlowRate),
            Slot::HeadLoss => Some(Trigger::HeadLoss),
            Slot::Velocity => Some(Trigger::Velocity),
            Slot::EquivDiameter => Some(Trigger::EquivDiameter),
            Slot::DuctSizeX => Some(Trigger::DuctX),
            Slot::DuctSizeY => Some(Trigger::DuctY),
            _ => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Slot {
    type Err = EngineError;

    /// Accepts the slot id (`flow_rate`, `flow-rate`) or its table index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        if let Ok(index) = key.parse::<usize>() {
            return Slot::from_index(index).ok_or_else(|| EngineError::UnknownSlot {
                name: s.to_string(),
            });
        }
        Slot::ALL
            .iter()
            .copied()
            .find(|slot| slot.id() == key)
            .ok_or_else(|| EngineError::UnknownSlot {
                name: s.to_string(),
            })
    }
}

/// What changed to start a recompute pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    FlowRate,
    HeadLoss,
    Velocity,
    EquivDiameter,
    DuctX,
    DuctY,
    /// Fluid properties changed; recompute everything downstream of head loss
    FluidPropertiesChanged,
}

impl Trigger {
    /// The edited slot, if the trigger was an edit.
    pub fn slot(self) -> Option<Slot> {
        match self {
            Trigger::FlowRate => Some(Slot::FlowRate),
            Trigger::HeadLoss => Some(Slot::HeadLoss),
            Trigger::Velocity => Some(Slot::Velocity),
            Trigger::EquivDiameter => Some(Slot::EquivDiameter),
            Trigger::DuctX => Some(Slot::DuctSizeX),
            Trigger::DuctY => Some(Slot::DuctSizeY),
            Trigger::FluidPropertiesChanged => None,
        }
    }
}
