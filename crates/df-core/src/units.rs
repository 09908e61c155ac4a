// df-core/src/units.rs

use crate::Real;
use uom::si::f64::{
    Area as UomArea, Length as UomLength, MassDensity as UomMassDensity,
    Pressure as UomPressure, Velocity as UomVelocity, VolumeRate as UomVolumeRate,
};

// Typed quantities (SI, f64) for consumers that want them
pub type Area = UomArea;
pub type Density = UomMassDensity;
pub type Length = UomLength;
pub type Pressure = UomPressure;
pub type Velocity = UomVelocity;
pub type VolumeRate = UomVolumeRate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which side of a dual value an input refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

/// Imperial/metric unit labels plus the factor taking imperial to metric.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitPair {
    pub imperial: &'static str,
    pub metric: &'static str,
    pub factor: Real,
}

impl UnitPair {
    pub const fn new(imperial: &'static str, metric: &'static str, factor: Real) -> Self {
        Self {
            imperial,
            metric,
            factor,
        }
    }
}

/// Conversion factors are the literal values of the duct-sizing tables, not
/// exact SI ratios.
pub mod factors {
    use crate::Real;

    pub const CFM_TO_LPS: Real = 0.471_947_45;
    pub const IN_WC_PER_100FT_TO_PA_PER_M: Real = 8.1726;
    pub const FPM_TO_MPS: Real = 0.3048 / 60.0;
    pub const IN_TO_MM: Real = 25.4;
    pub const FT2_TO_M2: Real = 0.092_903;
    pub const IN_WC_TO_PA: Real = 248.84;
    pub const LB_FT3_TO_KG_M3: Real = 16.0185;
    pub const LB_FT_H_TO_KG_M_H: Real = 1.4882;
    pub const LB_FT_H_TO_KG_M_H_WATER: Real = 1.488_16;
    pub const BTU_LB_F_TO_KJ_KG_C: Real = 4.1868;
    pub const ENERGY_FACTOR: Real = 1.1204;
}

pub const FLOW_RATE: UnitPair = UnitPair::new("ft³/min", "L/s", factors::CFM_TO_LPS);
pub const HEAD_LOSS: UnitPair =
    UnitPair::new("in WC/100 ft", "Pa/m", factors::IN_WC_PER_100FT_TO_PA_PER_M);
pub const VELOCITY: UnitPair = UnitPair::new("fpm", "m/s", factors::FPM_TO_MPS);
pub const SIZE: UnitPair = UnitPair::new("in", "mm", factors::IN_TO_MM);
pub const FLOW_AREA: UnitPair = UnitPair::new("ft²", "m²", factors::FT2_TO_M2);
pub const DIMENSIONLESS: UnitPair = UnitPair::new("", "", 1.0);
pub const PRESSURE: UnitPair = UnitPair::new("in WC", "Pa", factors::IN_WC_TO_PA);
pub const DENSITY: UnitPair = UnitPair::new("lb/ft³", "kg/m³", factors::LB_FT3_TO_KG_M3);
pub const VISCOSITY: UnitPair = UnitPair::new("lb/ft·h", "kg/m·h", factors::LB_FT_H_TO_KG_M_H);
pub const SPECIFIC_HEAT: UnitPair =
    UnitPair::new("Btu/lb·°F", "kJ/kg·°C", factors::BTU_LB_F_TO_KJ_KG_C);
pub const ENERGY_FACTOR: UnitPair =
    UnitPair::new("Btu/h·°F·ft³/min", "W/°C·L/s", factors::ENERGY_FACTOR);

#[inline]
pub fn inch(v: f64) -> Length {
    use uom::si::length::inch;
    Length::new::<inch>(v)
}

#[inline]
pub fn square_foot(v: f64) -> Area {
    use uom::si::area::square_foot;
    Area::new::<square_foot>(v)
}

#[inline]
pub fn fpm(v: f64) -> Velocity {
    use uom::si::velocity::foot_per_minute;
    Velocity::new::<foot_per_minute>(v)
}

#[inline]
pub fn cfm(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_foot_per_minute;
    VolumeRate::new::<cubic_foot_per_minute>(v)
}

#[inline]
pub fn in_wc(v: f64) -> Pressure {
    use uom::si::pressure::inch_of_water;
    Pressure::new::<inch_of_water>(v)
}

#[inline]
pub fn lb_per_ft3(v: f64) -> Density {
    use uom::si::mass_density::pound_per_cubic_foot;
    Density::new::<pound_per_cubic_foot>(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tolerances, nearly_equal};

    fn close(a: f64, b: f64, rel: f64) -> bool {
        nearly_equal(a, b, Tolerances { abs: 0.0, rel })
    }

    #[test]
    fn constructors_smoke() {
        let _x = inch(10.0);
        let _a = square_foot(0.65);
        let _v = fpm(767.0);
        let _q = cfm(500.0);
        let _p = in_wc(0.08);
        let _rho = lb_per_ft3(0.075);
    }

    #[test]
    fn exact_factors_match_uom() {
        use uom::si::{
            area::square_meter, length::millimeter, mass_density::kilogram_per_cubic_meter,
            velocity::meter_per_second, volume_rate::liter_per_second,
        };
        assert!(close(inch(1.0).get::<millimeter>(), SIZE.factor, 1e-12));
        assert!(close(fpm(1.0).get::<meter_per_second>(), VELOCITY.factor, 1e-12));
        assert!(close(cfm(1.0).get::<liter_per_second>(), FLOW_RATE.factor, 1e-6));
        assert!(close(square_foot(1.0).get::<square_meter>(), FLOW_AREA.factor, 1e-5));
        assert!(close(
            lb_per_ft3(1.0).get::<kilogram_per_cubic_meter>(),
            DENSITY.factor,
            1e-5
        ));
    }

    #[test]
    fn water_column_factors_are_table_values() {
        use uom::si::pressure::pascal;
        // 248.84 is the duct table's in WC, slightly below the 4 °C column value.
        let pa_per_in = in_wc(1.0).get::<pascal>();
        assert!(close(pa_per_in, PRESSURE.factor, 2e-3));
        assert!(close(pa_per_in / 30.48, HEAD_LOSS.factor, 2e-3));
        assert_eq!(PRESSURE.factor, 248.84);
    }
}
