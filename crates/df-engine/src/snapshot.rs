//! Read-only views of the engine for presentation layers.

use df_core::units::{self, Area, Density, Length, Pressure, Velocity, VolumeRate};
use df_core::{Real, format_value};
use serde::{Deserialize, Serialize};

use crate::engine::PropagationEngine;
use crate::fluid::FluidProperty;
use crate::slot::Slot;

/// One parameter row, both unit systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub slot: Slot,
    pub name: String,
    pub imperial: Real,
    pub imperial_unit: String,
    pub metric: Real,
    pub metric_unit: String,
    pub locked: bool,
    pub read_only: bool,
}

impl SlotSnapshot {
    pub fn imperial_text(&self) -> String {
        format_value(self.imperial)
    }

    pub fn metric_text(&self) -> String {
        format_value(self.metric)
    }
}

/// One fluid-property row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidSnapshot {
    pub property: FluidProperty,
    pub name: String,
    pub imperial: Real,
    pub imperial_unit: String,
    pub metric: Real,
    pub metric_unit: String,
}

/// Both tables and the status line after the last operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub condition: String,
    pub status: String,
    pub parameters: Vec<SlotSnapshot>,
    pub fluid: Vec<FluidSnapshot>,
}

impl Snapshot {
    pub fn parameter(&self, slot: Slot) -> Option<&SlotSnapshot> {
        self.parameters.iter().find(|row| row.slot == slot)
    }
}

impl From<&PropagationEngine> for Snapshot {
    fn from(engine: &PropagationEngine) -> Self {
        let parameters = engine
            .params()
            .iter()
            .map(|(slot, value)| {
                let unit = slot.units();
                SlotSnapshot {
                    slot,
                    name: slot.name().to_string(),
                    imperial: value.primary(),
                    imperial_unit: unit.imperial.to_string(),
                    metric: value.secondary(),
                    metric_unit: unit.metric.to_string(),
                    locked: value.is_locked(),
                    read_only: value.is_read_only(),
                }
            })
            .collect();

        let fluid = engine
            .fluid()
            .iter()
            .map(|(property, value)| {
                let unit = property.units();
                FluidSnapshot {
                    property,
                    name: property.name().to_string(),
                    imperial: value.primary(),
                    imperial_unit: unit.imperial.to_string(),
                    metric: value.secondary(),
                    metric_unit: unit.metric.to_string(),
                }
            })
            .collect();

        Self {
            condition: engine.fluid_name().to_string(),
            status: engine.status().to_string(),
            parameters,
            fluid,
        }
    }
}

/// Duct geometry as SI quantities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuctGeometry {
    pub equivalent_diameter: Length,
    pub width: Length,
    pub height: Length,
    pub flow_area: Area,
}

/// Flow state as SI quantities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowConditions {
    pub flow_rate: VolumeRate,
    pub velocity: Velocity,
    pub head_loss_per_100ft: Pressure,
    pub velocity_pressure: Pressure,
    pub density: Density,
    pub reynolds_number: Real,
    pub friction_factor: Real,
}

impl PropagationEngine {
    /// Converted from the imperial side with exact unit ratios.
    pub fn geometry(&self) -> DuctGeometry {
        DuctGeometry {
            equivalent_diameter: units::inch(self.value(Slot::EquivDiameter)),
            width: units::inch(self.value(Slot::DuctSizeX)),
            height: units::inch(self.value(Slot::DuctSizeY)),
            flow_area: units::square_foot(self.value(Slot::FlowArea)),
        }
    }

    pub fn flow_conditions(&self) -> FlowConditions {
        FlowConditions {
            flow_rate: units::cfm(self.value(Slot::FlowRate)),
            velocity: units::fpm(self.value(Slot::Velocity)),
            head_loss_per_100ft: units::in_wc(self.value(Slot::HeadLoss)),
            velocity_pressure: units::in_wc(self.value(Slot::VelocityPressure)),
            density: units::lb_per_ft3(self.fluid().density()),
            reynolds_number: self.value(Slot::ReynoldsNumber),
            friction_factor: self.value(Slot::FrictionFactor),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(self)
    }
}
