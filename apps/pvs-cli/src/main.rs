mod error;

use clap::{Parser, Subcommand};
use error::{CliError, CliResult};
use pvs_components::ProcessModel;
use pvs_project::{ModelFile, discovered_from_tags, lint_models, merge_discovered};
use pvs_sim::{BuildReport, LogSink, MemorySink, Orchestrator, SimOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pvs-cli")]
#[command(about = "PV simulator - publish simulated process variables to tags", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a models file and list warnings
    Validate {
        /// Path to the models file (.yaml, .yml or .json)
        models_path: PathBuf,
    },
    /// Step the models offline and print their values
    Simulate {
        /// Path to the models file
        models_path: PathBuf,
        /// Time step in seconds
        #[arg(long, default_value_t = 0.2)]
        dt: f64,
        /// Number of steps
        #[arg(long, default_value_t = 10)]
        steps: usize,
        /// Print every n-th step
        #[arg(long, default_value_t = 1)]
        every: usize,
        /// Drive a component: NAME=VALUE (sensors are written, flows and temperatures get an input)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        sets: Vec<String>,
    },
    /// Run in real time, publishing every tag to the log
    Run {
        /// Path to the models file
        models_path: PathBuf,
        /// Time step in seconds
        #[arg(long, default_value_t = 0.2)]
        dt: f64,
        /// Wall-clock duration in seconds (runs until killed if omitted)
        #[arg(long)]
        duration: Option<f64>,
        /// Drive a component: NAME=VALUE
        #[arg(long = "set", value_name = "NAME=VALUE")]
        sets: Vec<String>,
    },
    /// Merge discovered models into an existing file by tag
    Merge {
        /// Existing models file
        existing: PathBuf,
        /// File with discovered models
        #[arg(long)]
        discovered: Option<PathBuf>,
        /// Discovered tag name (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Output file (defaults to overwriting the existing file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { models_path } => cmd_validate(&models_path),
        Commands::Simulate {
            models_path,
            dt,
            steps,
            every,
            sets,
        } => cmd_simulate(&models_path, dt, steps, every, &sets),
        Commands::Run {
            models_path,
            dt,
            duration,
            sets,
        } => cmd_run(&models_path, dt, duration, &sets),
        Commands::Merge {
            existing,
            discovered,
            tags,
            output,
        } => cmd_merge(&existing, discovered.as_deref(), &tags, output.as_deref()),
    }
}

fn cmd_validate(models_path: &Path) -> CliResult<()> {
    println!("Validating models: {}", models_path.display());
    let file = pvs_project::load(models_path)?;
    let warnings = lint_models(&file.models);
    for w in &warnings {
        println!("  warning: {}", w);
    }
    println!(
        "✓ {} models valid ({} warnings)",
        file.models.len(),
        warnings.len()
    );
    Ok(())
}

fn cmd_simulate(
    models_path: &Path,
    dt: f64,
    steps: usize,
    every: usize,
    sets: &[String],
) -> CliResult<()> {
    let file = pvs_project::load(models_path)?;
    let options = SimOptions {
        dt,
        ..SimOptions::default()
    };
    let mut orch = Orchestrator::new(file.models, MemorySink::new(), options)?;
    print_build(&orch.build());
    apply_sets(&mut orch, sets)?;
    orch.start()?;

    let names: Vec<String> = orch
        .components()
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();
    print!("{:>10}", "t [s]");
    for name in &names {
        print!(" {:>12}", name);
    }
    println!();

    let every = every.max(1);
    for i in 1..=steps {
        let Some(report) = orch.step() else {
            break;
        };
        for fault in &report.tick.faults {
            println!("  ! {} ({:?}): {}", fault.tag, fault.kind, fault.message);
        }
        if i % every == 0 || i == steps {
            print!("{:>10.3}", report.sim_time);
            for (_, component) in orch.components().iter() {
                print!(" {:>12.4}", component.current_value());
            }
            println!();
        }
    }

    let stats = orch.bridge_stats();
    println!(
        "✓ {} steps, {} tag writes ({} getter faults, {} write faults)",
        stats.ticks, stats.published, stats.getter_faults, stats.write_faults
    );
    Ok(())
}

fn cmd_run(models_path: &Path, dt: f64, duration: Option<f64>, sets: &[String]) -> CliResult<()> {
    let file = pvs_project::load(models_path)?;
    println!("Running '{}' at dt = {:.3} s", file.name, dt);

    let duration = match duration {
        Some(secs) if secs.is_finite() && secs >= 0.0 => Some(Duration::from_secs_f64(secs)),
        Some(secs) => return Err(CliError::InvalidArg(format!("duration {secs}"))),
        None => None,
    };

    let options = SimOptions {
        dt,
        ..SimOptions::default()
    };
    let mut orch = Orchestrator::new(file.models, LogSink::new(), options)?;
    print_build(&orch.build());
    apply_sets(&mut orch, sets)?;

    let summary = orch.run_loop(duration)?;
    println!(
        "✓ {} steps in {:.1} s ({} overruns), {} tag writes",
        summary.steps,
        summary.wall_time.as_secs_f64(),
        summary.overruns,
        summary.bridge.published
    );
    Ok(())
}

fn cmd_merge(
    existing_path: &Path,
    discovered_path: Option<&Path>,
    tags: &[String],
    output: Option<&Path>,
) -> CliResult<()> {
    let existing = pvs_project::load(existing_path)?;

    let mut discovered = match discovered_path {
        Some(path) => pvs_project::load(path)?.models,
        None => Vec::new(),
    };
    discovered.extend(discovered_from_tags(tags));
    if discovered.is_empty() {
        return Err(CliError::InvalidArg(
            "nothing discovered: pass --discovered or --tag".to_string(),
        ));
    }

    let (models, stats) = merge_discovered(&existing.models, &discovered);
    let out_path = output.unwrap_or(existing_path);
    pvs_project::save(out_path, &ModelFile::new(existing.name, models))?;

    println!(
        "✓ Merged into {}: {} added, {} skipped, {} updated",
        out_path.display(),
        stats.added,
        stats.skipped,
        stats.updated
    );
    Ok(())
}

fn print_build(report: &BuildReport) {
    println!(
        "Built {} components, {} tags registered",
        report.built, report.registered
    );
    if report.placeholders > 0 {
        println!("  {} placeholder records skipped", report.placeholders);
    }
    for err in &report.failures {
        println!("  excluded: {}", err);
    }
    for name in &report.unbound_mirrors {
        println!("  sensor '{}' has no source, holding its value", name);
    }
}

fn apply_sets<W: pvs_core::TagWriter>(
    orch: &mut Orchestrator<W>,
    sets: &[String],
) -> CliResult<()> {
    for set in sets {
        let (name, value) = parse_set(set)?;
        let is_sensor = orch
            .component(name)
            .is_some_and(|c| c.as_sensor().is_some());
        if is_sensor {
            orch.write_sensor(name, value)?;
        } else {
            orch.set_input(name, value)?;
        }
    }
    Ok(())
}

fn parse_set(arg: &str) -> CliResult<(&str, f64)> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| CliError::InvalidArg(format!("expected NAME=VALUE, got '{arg}'")))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| CliError::InvalidArg(format!("not a number in '{arg}'")))?;
    Ok((name.trim(), value))
}
