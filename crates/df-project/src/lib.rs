//! df-project: scenario files that seed and script the engine.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_scenario};

use df_core::UnitSystem;
use df_engine::{EngineError, FluidProperty, PropagationEngine, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

use validate::{parse_editable, parse_slot};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Unsupported file extension: {path}")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_yaml::from_str(&content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_yaml(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_json::from_str(&content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_json(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    let content = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.yaml`/`.yml` or `.json`.
pub fn load(path: &Path) -> ProjectResult<Scenario> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(ProjectError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Engine in the scenario's starting state. Nothing is recomputed.
pub fn build_engine(scenario: &Scenario) -> ProjectResult<PropagationEngine> {
    validate_scenario(scenario)?;
    let mut engine = PropagationEngine::new();

    if let Some(fluid) = &scenario.fluid {
        if let Some(id) = &fluid.preset {
            engine.seed_preset(id)?;
        }
        if let Some(custom) = &fluid.custom {
            engine.seed_fluid(FluidProperty::Density, custom.density)?;
            engine.seed_fluid(FluidProperty::Viscosity, custom.viscosity)?;
            engine.seed_fluid(FluidProperty::SpecificHeat, custom.specific_heat)?;
            engine.seed_fluid(FluidProperty::EnergyFactor, custom.energy_factor)?;
        }
    }

    for (name, value) in &scenario.initial {
        let slot = parse_slot(name, "initial")?;
        engine.seed(slot, UnitSystem::Imperial, *value)?;
    }

    let locks = scenario
        .locks
        .iter()
        .map(|name| parse_editable(name, "locks"))
        .collect::<Result<BTreeSet<_>, _>>()?;
    engine.seed_locks(&locks)?;

    Ok(engine)
}

/// Status line after one scripted step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step: String,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub engine: PropagationEngine,
    pub outcomes: Vec<StepOutcome>,
}

impl ScenarioRun {
    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }
}

/// Build the engine and play every step in order.
///
/// A refused lock is an outcome, not an error: the step's status carries
/// the reason and the run continues.
pub fn run_scenario(scenario: &Scenario) -> ProjectResult<ScenarioRun> {
    let mut engine = build_engine(scenario)?;
    info!(
        scenario = scenario.name.as_str(),
        steps = scenario.steps.len(),
        "running scenario"
    );

    let mut outcomes = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let context = format!("steps[{index}]");
        match apply_step(&mut engine, step, &context) {
            Ok(()) | Err(ProjectError::Engine(EngineError::Lock(_))) => {}
            Err(err) => return Err(err),
        }
        debug!(step = index, status = engine.status(), "step applied");
        outcomes.push(StepOutcome {
            step: step.describe(),
            status: engine.status().to_string(),
        });
    }

    Ok(ScenarioRun { engine, outcomes })
}

fn apply_step(engine: &mut PropagationEngine, step: &StepDef, context: &str) -> ProjectResult<()> {
    match step {
        StepDef::Edit { slot, value, unit } => {
            engine.edit(parse_editable(slot, context)?, *unit, *value)?;
        }
        StepDef::EditText { slot, text, unit } => {
            engine.edit_text(parse_editable(slot, context)?, *unit, text)?;
        }
        StepDef::Lock { slot } => engine.set_locked(parse_editable(slot, context)?, true)?,
        StepDef::Unlock { slot } => engine.set_locked(parse_editable(slot, context)?, false)?,
        StepDef::Preset { id } => {
            engine.load_preset(id)?;
        }
        StepDef::Fluid {
            property,
            value,
            unit,
        } => {
            let property = property.parse::<FluidProperty>()?;
            engine.edit_fluid(property, *unit, *value)?;
        }
        StepDef::Refresh => engine.refresh(),
    }
    Ok(())
}
