//! Fluid properties and the preset catalog.

use df_core::Real;
use df_core::units::{self, UnitPair, factors};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// One of the four fluid-property entries.
///
/// Density and viscosity feed the duct formulas; specific heat and energy
/// factor are carried for energy calculations downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluidProperty {
    Density,
    Viscosity,
    SpecificHeat,
    EnergyFactor,
}

impl FluidProperty {
    pub const ALL: [FluidProperty; 4] = [
        FluidProperty::Density,
        FluidProperty::Viscosity,
        FluidProperty::SpecificHeat,
        FluidProperty::EnergyFactor,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FluidProperty::Density => "Fluid Density",
            FluidProperty::Viscosity => "Fluid Viscosity",
            FluidProperty::SpecificHeat => "Specific Heat",
            FluidProperty::EnergyFactor => "Energy Factor",
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            FluidProperty::Density => "density",
            FluidProperty::Viscosity => "viscosity",
            FluidProperty::SpecificHeat => "specific_heat",
            FluidProperty::EnergyFactor => "energy_factor",
        }
    }

    pub fn units(self) -> UnitPair {
        match self {
            FluidProperty::Density => units::DENSITY,
            FluidProperty::Viscosity => units::VISCOSITY,
            FluidProperty::SpecificHeat => units::SPECIFIC_HEAT,
            FluidProperty::EnergyFactor => units::ENERGY_FACTOR,
        }
    }
}

impl fmt::Display for FluidProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FluidProperty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        FluidProperty::ALL
            .iter()
            .copied()
            .find(|p| p.id() == key)
            .ok_or_else(|| EngineError::UnknownFluidProperty {
                name: s.to_string(),
            })
    }
}

/// Imperial value, metric value and conversion factor of one property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetValue {
    pub imperial: Real,
    pub metric: Real,
    pub factor: Real,
}

const fn pv(imperial: Real, metric: Real, factor: Real) -> PresetValue {
    PresetValue {
        imperial,
        metric,
        factor,
    }
}

/// How a preset is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    /// Selectable air condition; loading it recomputes the duct
    Condition(usize),
    /// Wholesale table replacement without a recompute
    Bulk,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidPreset {
    pub canonical_id: &'static str,
    pub display_name: &'static str,
    pub aliases: &'static [&'static str],
    pub kind: PresetKind,
    /// Density, viscosity, specific heat, energy factor
    pub values: [PresetValue; 4],
}

impl FluidPreset {
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.canonical_id.to_ascii_lowercase().contains(&query)
            || self.display_name.to_ascii_lowercase().contains(&query)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_ascii_lowercase().contains(&query))
    }

    fn matches_exact(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        self.canonical_id.eq_ignore_ascii_case(&query)
            || self.display_name.to_ascii_lowercase() == query
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(&query))
    }

    pub fn value(&self, property: FluidProperty) -> PresetValue {
        self.values[property.index()]
    }

    /// Status line shown once the preset is in place.
    pub fn loaded_message(&self) -> String {
        format!("{} properties loaded", self.display_name)
    }
}

const D: Real = factors::LB_FT3_TO_KG_M3;
const MU: Real = factors::LB_FT_H_TO_KG_M_H;
const CP: Real = factors::BTU_LB_F_TO_KJ_KG_C;
const EF: Real = factors::ENERGY_FACTOR;

const STP_VALUES: [PresetValue; 4] = [
    pv(0.075, 1.2014, D),
    pv(0.0473, 0.0705, MU),
    pv(0.24, 1.0048, CP),
    pv(0.96, 1.08, EF),
];

static CATALOG: [FluidPreset; 7] = [
    FluidPreset {
        canonical_id: "stp",
        display_name: "68°F/20°C Air @ STP",
        aliases: &["68f", "20c", "standard"],
        kind: PresetKind::Condition(0),
        values: STP_VALUES,
    },
    FluidPreset {
        canonical_id: "cool-humid",
        display_name: "55°F/13°C Air @ 97% RH & 1 ATM",
        aliases: &["55f", "13c"],
        kind: PresetKind::Condition(1),
        values: [
            pv(0.0765, 1.2254, D),
            pv(0.0481, 0.0716, MU),
            pv(0.2405, 1.0069, CP),
            pv(0.978, 1.1003, EF),
        ],
    },
    FluidPreset {
        canonical_id: "comfort",
        display_name: "75°F/25°C Air @ 50% RH & 1 ATM",
        aliases: &["75f", "25c", "indoor"],
        kind: PresetKind::Condition(2),
        values: [
            pv(0.0735, 1.1774, D),
            pv(0.0463, 0.0689, MU),
            pv(0.2415, 1.0111, CP),
            pv(0.945, 1.0631, EF),
        ],
    },
    FluidPreset {
        canonical_id: "hot-dry",
        display_name: "100°F/37°C Air @ 23% RH & 1 ATM",
        aliases: &["100f", "37c"],
        kind: PresetKind::Condition(3),
        values: [
            pv(0.0694, 1.1118, D),
            pv(0.0437, 0.0651, MU),
            pv(0.243, 1.0174, CP),
            pv(0.894, 1.0058, EF),
        ],
    },
    FluidPreset {
        canonical_id: "very-hot-dry",
        display_name: "125°F/52°C Air @ 11% RH & 1 ATM",
        aliases: &["125f", "52c"],
        kind: PresetKind::Condition(4),
        values: [
            pv(0.0652, 1.0446, D),
            pv(0.0411, 0.0612, MU),
            pv(0.2445, 1.0237, CP),
            pv(0.842, 0.9473, EF),
        ],
    },
    FluidPreset {
        canonical_id: "air",
        display_name: "Air",
        aliases: &[],
        kind: PresetKind::Bulk,
        values: STP_VALUES,
    },
    FluidPreset {
        canonical_id: "water",
        display_name: "Water",
        aliases: &["h2o"],
        kind: PresetKind::Bulk,
        values: [
            pv(62.3, 998.0, D),
            pv(0.671, 1.0, factors::LB_FT_H_TO_KG_M_H_WATER),
            pv(1.0, 4.1868, CP),
            pv(4.0, 4.5, EF),
        ],
    },
];

/// Number of selectable air conditions.
pub const CONDITION_COUNT: usize = 5;

pub fn catalog() -> &'static [FluidPreset] {
    &CATALOG
}

/// Air condition by selector index; out-of-range indices give STP.
pub fn condition(index: usize) -> &'static FluidPreset {
    CATALOG[..CONDITION_COUNT]
        .get(index)
        .unwrap_or(&CATALOG[0])
}

/// Preset by id, display name or alias (case-insensitive, exact).
pub fn lookup(query: &str) -> Option<&'static FluidPreset> {
    CATALOG.iter().find(|preset| preset.matches_exact(query))
}

/// Presets whose id, name or aliases contain `query`.
pub fn search(query: &str) -> Vec<&'static FluidPreset> {
    CATALOG
        .iter()
        .filter(|preset| preset.matches_query(query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditions_are_in_selector_order() {
        for i in 0..CONDITION_COUNT {
            assert_eq!(condition(i).kind, PresetKind::Condition(i));
        }
    }

    #[test]
    fn out_of_range_condition_falls_back_to_stp() {
        assert_eq!(condition(7).canonical_id, "stp");
    }

    #[test]
    fn lookup_by_id_alias_and_name() {
        assert_eq!(lookup("water").map(|p| p.kind), Some(PresetKind::Bulk));
        assert_eq!(lookup("H2O").map(|p| p.canonical_id), Some("water"));
        assert_eq!(lookup("75F").map(|p| p.canonical_id), Some("comfort"));
        assert_eq!(
            lookup("68°F/20°C Air @ STP").map(|p| p.canonical_id),
            Some("stp")
        );
        assert!(lookup("steam").is_none());
    }

    #[test]
    fn search_is_substring() {
        let hits = search("1 atm");
        assert_eq!(hits.len(), 4);
        assert_eq!(search("").len(), catalog().len());
    }

    #[test]
    fn air_matches_stp() {
        assert_eq!(lookup("air").map(|p| p.values), Some(condition(0).values));
    }

    #[test]
    fn water_viscosity_factor() {
        let water = lookup("water").map(|p| p.value(FluidProperty::Viscosity));
        assert_eq!(water.map(|v| v.factor), Some(1.488_16));
    }

    #[test]
    fn loaded_message() {
        assert_eq!(
            condition(0).loaded_message(),
            "68°F/20°C Air @ STP properties loaded"
        );
        assert_eq!(
            lookup("air").map(|p| p.loaded_message()).as_deref(),
            Some("Air properties loaded")
        );
    }

    #[test]
    fn property_parse() {
        assert_eq!(
            "specific-heat".parse::<FluidProperty>().unwrap(),
            FluidProperty::SpecificHeat
        );
        assert!("enthalpy".parse::<FluidProperty>().is_err());
    }
}
