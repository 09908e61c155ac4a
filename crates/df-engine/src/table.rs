//! The parameter and fluid-property tables owned by the engine.

use df_core::{DualValue, Real};

use crate::fluid::{FluidPreset, FluidProperty};
use crate::slot::Slot;

/// Reference defaults, imperial then metric, in slot order.
///
/// The metric column is the application's own table, not a conversion of
/// the imperial one, so both sides are stored verbatim.
const PARAMETER_DEFAULTS: [(Real, Real); Slot::COUNT] = [
    (500.0, 236.0),
    (0.080, 0.653),
    (732.5, 3.712),
    (11.2, 284.2),
    (10.0, 250.0),
    (10.0, 275.0),
    (10.93, 286.55),
    (0.6518, 0.0645),
    (767.1, 3.659),
    (72793.0, 70534.0),
    (0.02218, 0.02219),
    (0.0367, 8.044),
    (0.089, 0.624),
];

/// Thirteen duct parameters indexed by [`Slot`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTable {
    values: [DualValue; Slot::COUNT],
}

impl Default for ParameterTable {
    fn default() -> Self {
        let values = std::array::from_fn(|i| {
            let slot = Slot::ALL[i];
            let (imperial, metric) = PARAMETER_DEFAULTS[i];
            let value = DualValue::with_values(slot.units().factor, imperial, metric);
            if slot.is_editable() {
                value
            } else {
                value.read_only()
            }
        });
        Self { values }
    }
}

impl ParameterTable {
    pub fn get(&self, slot: Slot) -> &DualValue {
        &self.values[slot.index()]
    }

    pub(crate) fn get_mut(&mut self, slot: Slot) -> &mut DualValue {
        &mut self.values[slot.index()]
    }

    /// Imperial value of a slot.
    pub fn primary(&self, slot: Slot) -> Real {
        self.get(slot).primary()
    }

    pub fn is_locked(&self, slot: Slot) -> bool {
        self.get(slot).is_locked()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, &DualValue)> {
        Slot::ALL.iter().copied().zip(self.values.iter())
    }
}

/// Four fluid properties indexed by [`FluidProperty`].
#[derive(Debug, Clone, PartialEq)]
pub struct FluidTable {
    values: [DualValue; 4],
}

impl FluidTable {
    pub fn from_preset(preset: &FluidPreset) -> Self {
        let values = std::array::from_fn(|i| {
            let v = preset.values[i];
            DualValue::with_values(v.factor, v.imperial, v.metric)
        });
        Self { values }
    }

    /// Replace every entry with the preset's values and factors.
    pub fn apply_preset(&mut self, preset: &FluidPreset) {
        *self = Self::from_preset(preset);
    }

    pub fn get(&self, property: FluidProperty) -> &DualValue {
        &self.values[property.index()]
    }

    pub(crate) fn get_mut(&mut self, property: FluidProperty) -> &mut DualValue {
        &mut self.values[property.index()]
    }

    /// Density in lb/ft³.
    pub fn density(&self) -> Real {
        self.get(FluidProperty::Density).primary()
    }

    /// Dynamic viscosity in lb/ft·h.
    pub fn viscosity(&self) -> Real {
        self.get(FluidProperty::Viscosity).primary()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FluidProperty, &DualValue)> {
        FluidProperty::ALL.iter().copied().zip(self.values.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fluid;

    #[test]
    fn defaults_are_verbatim() {
        let table = ParameterTable::default();
        assert_eq!(table.primary(Slot::FlowRate), 500.0);
        assert_eq!(table.get(Slot::FlowRate).secondary(), 236.0);
        assert_eq!(table.get(Slot::DuctSizeY).secondary(), 275.0);
        assert_eq!(table.primary(Slot::ReynoldsNumber), 72793.0);
        assert_eq!(table.get(Slot::HeadLossEcho).secondary(), 0.624);
    }

    #[test]
    fn echo_slots_are_read_only() {
        let table = ParameterTable::default();
        for (slot, value) in table.iter() {
            assert_eq!(value.is_read_only(), !slot.is_editable(), "{slot}");
            assert!(!value.is_locked());
        }
    }

    #[test]
    fn factors_follow_slot_units() {
        let table = ParameterTable::default();
        for (slot, value) in table.iter() {
            assert_eq!(value.factor(), slot.units().factor);
        }
    }

    #[test]
    fn fluid_table_from_water() {
        let water = fluid::lookup("water").map(FluidTable::from_preset);
        let water = water.unwrap();
        assert_eq!(water.density(), 62.3);
        assert_eq!(water.get(FluidProperty::Density).secondary(), 998.0);
        assert_eq!(water.get(FluidProperty::Viscosity).factor(), 1.488_16);
    }

    #[test]
    fn apply_preset_replaces_values() {
        let mut table = FluidTable::from_preset(fluid::condition(0));
        table.get_mut(FluidProperty::Density).set_primary(1.0);
        table.apply_preset(fluid::condition(2));
        assert_eq!(table.density(), 0.0735);
        assert_eq!(table.viscosity(), 0.0463);
    }
}
