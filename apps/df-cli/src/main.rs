mod error;

use clap::{Parser, Subcommand};
use df_core::UnitSystem;
use df_engine::{PropagationEngine, Slot, Snapshot, fluid};
use df_project::{ScenarioRun, load, run_scenario};
use error::CliResult;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ductflow")]
#[command(about = "ductflow - HVAC duct sizing calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parameter and fluid tables
    Show {
        /// Air condition index (0-4) to load first
        #[arg(long, conflicts_with = "preset")]
        condition: Option<usize>,
        /// Fluid preset id, name or alias to load first
        #[arg(long)]
        preset: Option<String>,
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
        /// Also print SI quantities
        #[arg(long)]
        si: bool,
    },
    /// Edit one parameter and print the result
    Edit {
        /// Slot id (e.g. flow_rate, duct-size-x) or table index
        slot: Slot,
        /// New value, imperial unless --metric
        value: String,
        /// Interpret the value in metric units
        #[arg(long)]
        metric: bool,
        /// Lock a slot before editing (repeatable)
        #[arg(long = "lock")]
        locks: Vec<Slot>,
        /// Air condition index (0-4) to load first
        #[arg(long)]
        condition: Option<usize>,
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play a scenario file and print the final state
    Run {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// List fluid presets
    Presets {
        /// Only presets whose id, name or alias contains this text
        query: Option<String>,
    },
    /// Validate a scenario file
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show {
            condition,
            preset,
            json,
            si,
        } => cmd_show(condition, preset.as_deref(), json, si),
        Commands::Edit {
            slot,
            value,
            metric,
            locks,
            condition,
            json,
        } => cmd_edit(slot, &value, metric, &locks, condition, json),
        Commands::Run {
            scenario_path,
            json,
        } => cmd_run(&scenario_path, json),
        Commands::Presets { query } => cmd_presets(query.as_deref().unwrap_or("")),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
    }
}

fn cmd_show(condition: Option<usize>, preset: Option<&str>, json: bool, si: bool) -> CliResult<()> {
    let mut engine = PropagationEngine::new();
    if let Some(index) = condition {
        engine.load_condition(index);
    }
    if let Some(query) = preset {
        engine.load_preset(query)?;
    }

    print_snapshot(&engine.snapshot(), json)?;
    if si && !json {
        print_si(&engine);
    }
    Ok(())
}

fn cmd_edit(
    slot: Slot,
    value: &str,
    metric: bool,
    locks: &[Slot],
    condition: Option<usize>,
    json: bool,
) -> CliResult<()> {
    let mut engine = PropagationEngine::new();
    if let Some(index) = condition {
        engine.load_condition(index);
    }
    for lock in locks {
        engine.set_locked(*lock, true)?;
    }

    let unit = if metric {
        UnitSystem::Metric
    } else {
        UnitSystem::Imperial
    };
    info!(slot = slot.id(), value, ?unit, "editing");
    engine.edit_text(slot, unit, value)?;

    print_snapshot(&engine.snapshot(), json)
}

fn cmd_run(scenario_path: &Path, json: bool) -> CliResult<()> {
    let scenario = load(scenario_path)?;
    let run = run_scenario(&scenario)?;

    if json {
        return print_snapshot(&run.snapshot(), true);
    }

    println!("Scenario: {}", scenario.name);
    print_transcript(&run);
    println!();
    print_snapshot(&run.snapshot(), false)
}

fn cmd_presets(query: &str) -> CliResult<()> {
    let presets = fluid::search(query);
    if presets.is_empty() {
        println!("No presets match '{query}'");
        return Ok(());
    }

    println!("Fluid presets:");
    for preset in presets {
        let kind = match preset.kind {
            fluid::PresetKind::Condition(index) => format!("condition {index}"),
            fluid::PresetKind::Bulk => "bulk".to_string(),
        };
        println!("  {:<14} {:<34} ({kind})", preset.canonical_id, preset.display_name);
    }
    Ok(())
}

fn cmd_validate(scenario_path: &Path) -> CliResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = load(scenario_path)?;
    println!(
        "✓ Scenario '{}' is valid ({} steps)",
        scenario.name,
        scenario.steps.len()
    );
    Ok(())
}

fn print_transcript(run: &ScenarioRun) {
    for (index, outcome) in run.outcomes.iter().enumerate() {
        println!("  {:>2}. {:<40} {}", index + 1, outcome.step, outcome.status);
    }
}

fn print_snapshot(snapshot: &Snapshot, json: bool) -> CliResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    println!("Fluid: {}", snapshot.condition);
    for row in &snapshot.fluid {
        println!(
            "  {:<22} {:>14} {:<18} {:>14} {}",
            row.name,
            df_core::format_value(row.imperial),
            row.imperial_unit,
            df_core::format_value(row.metric),
            row.metric_unit
        );
    }

    println!();
    println!("Parameters:");
    for row in &snapshot.parameters {
        let flag = if row.locked {
            "locked"
        } else if row.read_only {
            "calc"
        } else {
            ""
        };
        println!(
            "  {:>2} {:<22} {:>14} {:<14} {:>14} {:<8} {}",
            row.slot.index(),
            row.name,
            row.imperial_text(),
            row.imperial_unit,
            row.metric_text(),
            row.metric_unit,
            flag
        );
    }

    println!();
    println!("Status: {}", snapshot.status);
    Ok(())
}

fn print_si(engine: &PropagationEngine) {
    use uom::si::area::square_meter;
    use uom::si::length::millimeter;
    use uom::si::mass_density::kilogram_per_cubic_meter;
    use uom::si::pressure::pascal;
    use uom::si::velocity::meter_per_second;
    use uom::si::volume_rate::liter_per_second;

    let geometry = engine.geometry();
    let flow = engine.flow_conditions();

    println!();
    println!("SI (exact unit ratios):");
    println!(
        "  De {:.1} mm, {:.1} x {:.1} mm, area {:.4} m²",
        geometry.equivalent_diameter.get::<millimeter>(),
        geometry.width.get::<millimeter>(),
        geometry.height.get::<millimeter>(),
        geometry.flow_area.get::<square_meter>()
    );
    println!(
        "  Q {:.1} L/s, V {:.3} m/s, VP {:.2} Pa, density {:.4} kg/m³",
        flow.flow_rate.get::<liter_per_second>(),
        flow.velocity.get::<meter_per_second>(),
        flow.velocity_pressure.get::<pascal>(),
        flow.density.get::<kilogram_per_cubic_meter>()
    );
    println!(
        "  Head loss {:.2} Pa per 100 ft, Re {:.0}, f {:.5}",
        flow.head_loss_per_100ft.get::<pascal>(),
        flow.reynolds_number,
        flow.friction_factor
    );
}
