//! The propagation engine: decides what to recompute after an edit.

use std::collections::BTreeSet;

use df_core::{Real, UnitSystem, ensure_finite, parse_value};
use df_physics::constants::IN2_PER_FT2;
use df_physics::{
    DEFAULT_MAX_ITERATIONS, duct_size_x_from_de, duct_size_y_from_de, equivalent_diameter,
    equivalent_diameter_from_head_loss, flow_area, flow_from_velocity, friction_factor,
    head_loss_darcy_weisbach, reynolds, standard_air_diameter, velocity_from_flow,
    velocity_pressure,
};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::fluid::{self, FluidPreset, FluidProperty, PresetKind};
use crate::lock::validate_locks;
use crate::slot::{Slot, Trigger};
use crate::table::{FluidTable, ParameterTable};

pub const STATUS_INITIALIZED: &str = "Application initialized";
pub const STATUS_UPDATED: &str = "Calculations updated";
pub const STATUS_REFRESHED: &str = "Data refreshed";

/// Fluid label shown once the table no longer matches a preset.
pub const CUSTOM_FLUID: &str = "Custom";

/// Whether a recompute pass is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineState {
    #[default]
    Idle,
    Recomputing,
}

/// Owns the parameter and fluid tables and keeps them consistent.
///
/// Every public operation leaves the engine [`EngineState::Idle`]. A pass
/// that hits a non-finite value stops where it is and reports
/// `Calculation error: ...` through [`status`](Self::status).
#[derive(Debug, Clone)]
pub struct PropagationEngine {
    params: ParameterTable,
    fluid: FluidTable,
    condition: Option<&'static FluidPreset>,
    state: EngineState,
    status: String,
    max_iterations: usize,
}

impl Default for PropagationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PropagationEngine {
    /// Engine seeded with the reference defaults and STP air.
    ///
    /// No pass runs here, so the seeded derived values are shown as-is.
    pub fn new() -> Self {
        let condition = fluid::condition(0);
        Self {
            params: ParameterTable::default(),
            fluid: FluidTable::from_preset(condition),
            condition: Some(condition),
            state: EngineState::Idle,
            status: STATUS_INITIALIZED.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Builder: iteration cap for the head-loss diameter solve.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn params(&self) -> &ParameterTable {
        &self.params
    }

    pub fn fluid(&self) -> &FluidTable {
        &self.fluid
    }

    /// The last preset applied to the fluid table, or `None` once custom
    /// values were seeded over it.
    pub fn condition(&self) -> Option<&'static FluidPreset> {
        self.condition
    }

    /// Display name of the current fluid.
    pub fn fluid_name(&self) -> &'static str {
        self.condition.map_or(CUSTOM_FLUID, |preset| preset.display_name)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn value(&self, slot: Slot) -> Real {
        self.params.primary(slot)
    }

    pub fn value_in(&self, slot: Slot, unit: UnitSystem) -> Real {
        self.params.get(slot).value_in(unit)
    }

    pub fn is_locked(&self, slot: Slot) -> bool {
        self.params.is_locked(slot)
    }

    pub fn locked_slots(&self) -> BTreeSet<Slot> {
        Slot::EDITABLE
            .iter()
            .copied()
            .filter(|slot| self.params.is_locked(*slot))
            .collect()
    }

    /// Store a value verbatim without recomputing anything.
    ///
    /// Used to seed a table before the first edit; both sides follow the
    /// slot's conversion factor.
    pub fn seed(&mut self, slot: Slot, unit: UnitSystem, value: Real) -> EngineResult<()> {
        let value = ensure_finite(value, slot.id())?;
        self.params.get_mut(slot).set_in(unit, value);
        Ok(())
    }

    /// Replace the fluid table with custom imperial values, without a pass.
    pub fn seed_fluid(&mut self, property: FluidProperty, value: Real) -> EngineResult<()> {
        let value = ensure_finite(value, property.id())?;
        self.fluid.get_mut(property).set_primary(value);
        self.condition = None;
        Ok(())
    }

    /// Replace the fluid table from a preset without a pass.
    pub fn seed_preset(&mut self, query: &str) -> EngineResult<&'static FluidPreset> {
        let preset = fluid::lookup(query).ok_or_else(|| EngineError::UnknownPreset {
            query: query.to_string(),
        })?;
        self.fluid.apply_preset(preset);
        self.condition = Some(preset);
        Ok(preset)
    }

    /// Lock a whole set of slots at once without a pass.
    ///
    /// The set replaces the current locks and must pass the solvability
    /// check; on failure nothing changes.
    pub fn seed_locks(&mut self, slots: &BTreeSet<Slot>) -> EngineResult<()> {
        if let Some(slot) = slots.iter().find(|slot| !slot.is_editable()) {
            return Err(EngineError::NotLockable { slot: slot.name() });
        }
        validate_locks(slots)?;
        for slot in Slot::EDITABLE {
            self.params.get_mut(slot).set_locked(slots.contains(&slot));
        }
        Ok(())
    }

    /// User edit of an editable slot.
    ///
    /// Re-entering the current value is ignored. Otherwise the value is
    /// stored, and unless the slot is locked the edit starts a pass keyed on
    /// the slot.
    pub fn edit(&mut self, slot: Slot, unit: UnitSystem, value: Real) -> EngineResult<()> {
        let Some(trigger) = slot.trigger() else {
            return Err(EngineError::NotEditable { slot: slot.name() });
        };
        let value = ensure_finite(value, slot.id())?;

        let entry = self.params.get_mut(slot);
        if entry.value_in(unit) == value {
            debug!(slot = slot.id(), value, "value unchanged");
            return Ok(());
        }
        entry.set_in(unit, value);
        if entry.is_locked() {
            debug!(slot = slot.id(), "{} is locked; recalculation skipped", slot.name());
            return Ok(());
        }

        debug!(slot = slot.id(), value, ?unit, "parameter changed");
        self.recompute(trigger);
        Ok(())
    }

    pub fn edit_primary(&mut self, slot: Slot, value: Real) -> EngineResult<()> {
        self.edit(slot, UnitSystem::Imperial, value)
    }

    pub fn edit_secondary(&mut self, slot: Slot, value: Real) -> EngineResult<()> {
        self.edit(slot, UnitSystem::Metric, value)
    }

    /// Edit from user-entered text. Unparseable text changes nothing.
    pub fn edit_text(&mut self, slot: Slot, unit: UnitSystem, text: &str) -> EngineResult<()> {
        if !slot.is_editable() {
            return Err(EngineError::NotEditable { slot: slot.name() });
        }
        let value = parse_value(text)?;
        self.edit(slot, unit, value)
    }

    /// Lock or unlock an editable slot.
    ///
    /// A lock that would over-constrain the duct is refused: the slot stays
    /// unlocked, the status carries the reason and no pass runs. An accepted
    /// toggle runs one pass keyed on the slot.
    pub fn set_locked(&mut self, slot: Slot, locked: bool) -> EngineResult<()> {
        let Some(trigger) = slot.trigger() else {
            return Err(EngineError::NotLockable { slot: slot.name() });
        };
        if self.params.is_locked(slot) == locked {
            return Ok(());
        }

        if locked {
            let mut proposed = self.locked_slots();
            proposed.insert(slot);
            if let Err(violation) = validate_locks(&proposed) {
                warn!(slot = slot.id(), "{violation}");
                self.status = violation.to_string();
                return Err(violation.into());
            }
        }

        self.params.get_mut(slot).set_locked(locked);
        let message = if locked {
            format!("{} locked", slot.name())
        } else {
            format!("{} unlocked", slot.name())
        };
        info!(slot = slot.id(), locked, "lock changed");
        self.recompute_with_status(trigger, message);
        Ok(())
    }

    /// Load one of the selectable air conditions and recompute.
    ///
    /// Indices past the last condition load STP air.
    pub fn load_condition(&mut self, index: usize) -> &'static FluidPreset {
        let preset = fluid::condition(index);
        self.apply_preset(preset);
        preset
    }

    /// Load a preset by id, display name or alias.
    ///
    /// Air conditions recompute; the bulk `air` and `water` presets only
    /// replace the fluid table. After a bulk load the derived slots
    /// (Reynolds number, friction factor, velocity pressure, head loss) still
    /// reflect the previous fluid until the next edit or
    /// [`recompute`](Self::recompute).
    pub fn load_preset(&mut self, query: &str) -> EngineResult<&'static FluidPreset> {
        let preset = fluid::lookup(query).ok_or_else(|| EngineError::UnknownPreset {
            query: query.to_string(),
        })?;
        self.apply_preset(preset);
        Ok(preset)
    }

    fn apply_preset(&mut self, preset: &'static FluidPreset) {
        self.fluid.apply_preset(preset);
        self.condition = Some(preset);
        let message = preset.loaded_message();
        info!(preset = preset.canonical_id, "{message}");

        match preset.kind {
            PresetKind::Condition(_) => {
                self.recompute_with_status(Trigger::FluidPropertiesChanged, message)
            }
            PresetKind::Bulk => self.status = message,
        }
    }

    /// Edit one fluid property and recompute everything it feeds.
    ///
    /// Re-entering the current value is ignored.
    pub fn edit_fluid(
        &mut self,
        property: FluidProperty,
        unit: UnitSystem,
        value: Real,
    ) -> EngineResult<()> {
        let value = ensure_finite(value, property.id())?;
        let entry = self.fluid.get_mut(property);
        if entry.value_in(unit) == value {
            debug!(property = property.id(), value, "fluid value unchanged");
            return Ok(());
        }
        entry.set_in(unit, value);
        debug!(property = property.id(), value, ?unit, "fluid property changed");
        self.recompute(Trigger::FluidPropertiesChanged);
        Ok(())
    }

    /// Manual refresh. Nothing is recomputed.
    pub fn refresh(&mut self) {
        self.status = STATUS_REFRESHED.to_string();
    }

    /// Run a pass for `trigger` and report the outcome in the status line.
    ///
    /// A fluid change is followed by exactly one more pass keyed on head
    /// loss, started after the first has released the engine.
    pub fn recompute(&mut self, trigger: Trigger) -> bool {
        let first = self.run(trigger);
        if trigger == Trigger::FluidPropertiesChanged {
            let second = self.run(Trigger::HeadLoss);
            return first && second;
        }
        first
    }

    /// Like [`recompute`](Self::recompute) but keeps `message` as the status
    /// unless a pass fails.
    fn recompute_with_status(&mut self, trigger: Trigger, message: String) {
        if self.recompute(trigger) {
            self.status = message;
        }
    }

    /// One guarded pass. Returns whether it completed.
    fn run(&mut self, trigger: Trigger) -> bool {
        if self.state == EngineState::Recomputing {
            debug!(?trigger, "pass already in flight");
            return false;
        }

        self.state = EngineState::Recomputing;
        debug!(?trigger, slot = trigger.slot().map(Slot::id), "recompute start");
        let result = self.pass(trigger);
        self.state = EngineState::Idle;

        match result {
            Ok(()) => {
                debug!(?trigger, "recompute done");
                self.status = STATUS_UPDATED.to_string();
                true
            }
            Err(err) => {
                warn!(?trigger, "calculation error: {err}");
                self.status = format!("Calculation error: {err}");
                false
            }
        }
    }

    fn pass(&mut self, trigger: Trigger) -> EngineResult<()> {
        let rho = self.fluid.density();
        let mu = self.fluid.viscosity();

        let mut q = self.value(Slot::FlowRate);
        let head_loss = self.value(Slot::HeadLoss);
        let x = self.value(Slot::DuctSizeX);
        let y = self.value(Slot::DuctSizeY);
        let dims_valid = x > 0.0 && y > 0.0;

        // Equivalent diameter from whichever input moved
        if !self.is_locked(Slot::EquivDiameter) {
            let de = match trigger {
                Trigger::DuctX | Trigger::DuctY if dims_valid => Some(equivalent_diameter(x, y)),
                Trigger::HeadLoss if q > 0.0 && head_loss > 0.0 => {
                    Some(equivalent_diameter_from_head_loss(
                        q,
                        head_loss,
                        rho,
                        mu,
                        self.max_iterations,
                    ))
                }
                Trigger::FlowRate if q > 0.0 && head_loss > 0.0 && !dims_valid => {
                    Some(standard_air_diameter(q, head_loss))
                }
                Trigger::Velocity if dims_valid => Some(equivalent_diameter(x, y)),
                _ => None,
            };
            if let Some(de) = de {
                self.update(Slot::EquivDiameter, de)?;
            }
        }

        let de = self.value(Slot::EquivDiameter);
        self.update_calculated(Slot::EquivDiameterEcho, de)?;
        let area = flow_area(de);
        self.update_calculated(Slot::FlowArea, area)?;

        // Velocity and flow rate
        if trigger != Trigger::Velocity && q > 0.0 && area > 0.0 {
            self.update(Slot::Velocity, velocity_from_flow(q, area))?;
        }
        let v = self.value(Slot::Velocity);
        if trigger == Trigger::Velocity && v > 0.0 && area > 0.0 {
            self.update(Slot::FlowRate, flow_from_velocity(v, area))?;
        }
        q = self.value(Slot::FlowRate);
        self.update_calculated(Slot::VelocityEcho, v)?;

        self.resolve_dimensions(trigger, q, v, x, y)?;

        // Derived quantities and head loss
        let de = self.value(Slot::EquivDiameter);
        if mu > 0.0 && de > 0.0 {
            let re = reynolds(rho, v, de, mu);
            self.update_calculated(Slot::ReynoldsNumber, re)?;
            let f = friction_factor(re);
            self.update_calculated(Slot::FrictionFactor, f)?;
            self.update_calculated(Slot::VelocityPressure, velocity_pressure(v, rho))?;

            if trigger != Trigger::HeadLoss && q > 0.0 && f > 0.0 {
                self.update(Slot::HeadLoss, head_loss_darcy_weisbach(f, de, v, rho))?;
            }
            let head_loss = self.value(Slot::HeadLoss);
            self.update_calculated(Slot::HeadLossEcho, head_loss)?;
        }

        Ok(())
    }

    /// Duct side resolution. The first matching branch wins.
    ///
    /// `x` and `y` are the sides as they were when the pass started.
    fn resolve_dimensions(
        &mut self,
        trigger: Trigger,
        q: Real,
        v: Real,
        x: Real,
        y: Real,
    ) -> EngineResult<()> {
        let flow_and_velocity_locked =
            self.is_locked(Slot::FlowRate) && self.is_locked(Slot::Velocity);
        let x_locked = self.is_locked(Slot::DuctSizeX);
        let y_locked = self.is_locked(Slot::DuctSizeY);
        let de = self.value(Slot::EquivDiameter);

        match trigger {
            // Flow and velocity pin the area; the other side absorbs it
            Trigger::DuctX
                if flow_and_velocity_locked && !y_locked && x > 0.0 && q > 0.0 && v > 0.0 =>
            {
                let y = (q / v) * IN2_PER_FT2 / x;
                self.update(Slot::DuctSizeY, y)?;
                if !self.is_locked(Slot::EquivDiameter) {
                    self.update(Slot::EquivDiameter, equivalent_diameter(x, y))?;
                }
            }
            Trigger::DuctY
                if flow_and_velocity_locked && !x_locked && y > 0.0 && q > 0.0 && v > 0.0 =>
            {
                let x = (q / v) * IN2_PER_FT2 / y;
                self.update(Slot::DuctSizeX, x)?;
                if !self.is_locked(Slot::EquivDiameter) {
                    self.update(Slot::EquivDiameter, equivalent_diameter(x, y))?;
                }
            }
            Trigger::EquivDiameter | Trigger::DuctX if !y_locked && x > 0.0 && de > 0.0 => {
                self.update(Slot::DuctSizeY, duct_size_y_from_de(de, x))?;
            }
            Trigger::DuctY if !x_locked && y > 0.0 && de > 0.0 => {
                self.update(Slot::DuctSizeX, duct_size_x_from_de(de, y))?;
            }
            Trigger::EquivDiameter | Trigger::DuctX | Trigger::DuctY => {}
            Trigger::FlowRate
            | Trigger::HeadLoss
            | Trigger::Velocity
            | Trigger::FluidPropertiesChanged => {
                if !y_locked && x > 0.0 && de > 0.0 {
                    self.update(Slot::DuctSizeY, duct_size_y_from_de(de, x))?;
                }
            }
        }
        Ok(())
    }

    /// Write an editable slot unless it is locked.
    fn update(&mut self, slot: Slot, value: Real) -> EngineResult<()> {
        let value = ensure_finite(value, slot.id())?;
        let entry = self.params.get_mut(slot);
        if entry.is_locked() {
            debug!(slot = slot.id(), "locked; not overwritten");
            return Ok(());
        }
        entry.set_primary(value);
        Ok(())
    }

    /// Write an engine-owned slot. Locks do not apply.
    fn update_calculated(&mut self, slot: Slot, value: Real) -> EngineResult<()> {
        let value = ensure_finite(value, slot.id())?;
        self.params.get_mut(slot).set_primary(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use df_core::{Tolerances, nearly_equal};

    fn close(a: Real, b: Real, rel: Real) -> bool {
        nearly_equal(a, b, Tolerances { abs: 1e-12, rel })
    }

    #[test]
    fn starts_idle_with_defaults() {
        let engine = PropagationEngine::new();
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.status(), STATUS_INITIALIZED);
        assert_eq!(engine.value(Slot::EquivDiameter), 11.2);
        assert_eq!(engine.fluid().density(), 0.075);
        assert_eq!(engine.condition().map(|p| p.canonical_id), Some("stp"));
    }

    #[test]
    fn duct_x_edit_uses_geometry() {
        let mut engine = PropagationEngine::new();
        engine.edit_primary(Slot::DuctSizeX, 10.0).unwrap();
        let de = engine.value(Slot::EquivDiameter);
        assert!(close(de, equivalent_diameter(10.0, 10.0), 1e-12));
        assert_eq!(engine.value(Slot::EquivDiameterEcho), de);
        assert_eq!(engine.value(Slot::FlowArea), flow_area(de));
        assert_eq!(engine.status(), STATUS_UPDATED);
    }

    #[test]
    fn head_loss_edit_keeps_user_value() {
        let mut engine = PropagationEngine::new();
        engine.edit_primary(Slot::HeadLoss, 0.1).unwrap();
        assert_eq!(engine.value(Slot::HeadLoss), 0.1);
        assert_eq!(engine.value(Slot::HeadLossEcho), 0.1);
    }

    #[test]
    fn velocity_edit_drives_flow_rate() {
        let mut engine = PropagationEngine::new();
        engine.edit_primary(Slot::Velocity, 1000.0).unwrap();
        let area = engine.value(Slot::FlowArea);
        assert!(close(engine.value(Slot::FlowRate), 1000.0 * area, 1e-12));
        assert_eq!(engine.value(Slot::Velocity), 1000.0);
        assert_eq!(engine.value(Slot::VelocityEcho), 1000.0);
    }

    #[test]
    fn flow_rate_without_dimensions_uses_estimate() {
        let mut engine = PropagationEngine::new();
        engine.seed(Slot::DuctSizeX, UnitSystem::Imperial, 0.0).unwrap();
        engine.edit_primary(Slot::FlowRate, 500.0).unwrap();
        let expected = standard_air_diameter(500.0, 0.08);
        assert!(close(engine.value(Slot::EquivDiameter), expected, 1e-12));
    }

    #[test]
    fn flow_rate_with_dimensions_keeps_diameter() {
        let mut engine = PropagationEngine::new();
        engine.edit_primary(Slot::FlowRate, 600.0).unwrap();
        assert_eq!(engine.value(Slot::EquivDiameter), 11.2);
        let y = duct_size_y_from_de(11.2, 10.0);
        assert!(close(engine.value(Slot::DuctSizeY), y, 1e-12));
    }

    #[test]
    fn read_only_slots_reject_edits() {
        let mut engine = PropagationEngine::new();
        let err = engine.edit_primary(Slot::FlowArea, 1.0).unwrap_err();
        assert_eq!(err, EngineError::NotEditable { slot: "Flow Area" });
        assert!(engine.set_locked(Slot::ReynoldsNumber, true).is_err());
    }

    #[test]
    fn invalid_text_changes_nothing() {
        let mut engine = PropagationEngine::new();
        let err = engine
            .edit_text(Slot::FlowRate, UnitSystem::Imperial, "5.0.0")
            .unwrap_err();
        assert!(matches!(err, EngineError::Core(_)));
        assert_eq!(engine.value(Slot::FlowRate), 500.0);
        assert_eq!(engine.status(), STATUS_INITIALIZED);
    }

    #[test]
    fn metric_text_edit() {
        let mut engine = PropagationEngine::new();
        engine
            .edit_text(Slot::DuctSizeX, UnitSystem::Metric, "254")
            .unwrap();
        assert!(close(engine.value(Slot::DuctSizeX), 10.0, 1e-12));
    }

    #[test]
    fn refresh_only_sets_status() {
        let mut engine = PropagationEngine::new();
        let before = engine.params().clone();
        engine.refresh();
        assert_eq!(engine.status(), STATUS_REFRESHED);
        assert_eq!(engine.params(), &before);
    }

    #[test]
    fn bulk_preset_does_not_recompute() {
        let mut engine = PropagationEngine::new();
        let before = engine.params().clone();
        engine.load_preset("water").unwrap();
        assert_eq!(engine.status(), "Water properties loaded");
        assert_eq!(engine.fluid().density(), 62.3);
        assert_eq!(engine.params(), &before);
    }

    #[test]
    fn unknown_preset() {
        let mut engine = PropagationEngine::new();
        let err = engine.load_preset("steam").unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownPreset {
                query: "steam".to_string()
            }
        );
    }

    #[test]
    fn seeding_runs_no_pass() {
        let mut engine = PropagationEngine::new();
        let before = engine.params().clone();
        engine.seed_preset("comfort").unwrap();
        let locks: BTreeSet<Slot> = [Slot::FlowRate, Slot::DuctSizeX].into_iter().collect();
        engine.seed_locks(&locks).unwrap();

        assert_eq!(engine.fluid().density(), 0.0735);
        assert_eq!(engine.locked_slots(), locks);
        assert_eq!(engine.status(), STATUS_INITIALIZED);
        for slot in Slot::ALL {
            assert_eq!(engine.value(slot), before.primary(slot));
        }
    }

    #[test]
    fn seeded_locks_are_validated() {
        let mut engine = PropagationEngine::new();
        let bad: BTreeSet<Slot> = [Slot::EquivDiameter, Slot::DuctSizeX, Slot::DuctSizeY]
            .into_iter()
            .collect();
        assert!(matches!(engine.seed_locks(&bad), Err(EngineError::Lock(_))));
        assert!(engine.locked_slots().is_empty());

        let echo: BTreeSet<Slot> = [Slot::FlowArea].into_iter().collect();
        assert!(matches!(
            engine.seed_locks(&echo),
            Err(EngineError::NotLockable { .. })
        ));
    }

    #[test]
    fn custom_fluid_is_labelled() {
        let mut engine = PropagationEngine::new();
        assert_eq!(engine.fluid_name(), "68°F/20°C Air @ STP");
        engine.seed_fluid(FluidProperty::Density, 0.07).unwrap();
        assert!(engine.condition().is_none());
        assert_eq!(engine.fluid_name(), CUSTOM_FLUID);

        engine.seed_preset("water").unwrap();
        assert_eq!(engine.fluid_name(), "Water");
    }

    #[test]
    fn lock_toggle_to_same_state_is_noop() {
        let mut engine = PropagationEngine::new();
        engine.set_locked(Slot::FlowRate, false).unwrap();
        assert_eq!(engine.status(), STATUS_INITIALIZED);
    }
}
