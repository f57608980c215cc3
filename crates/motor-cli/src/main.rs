//! Motor CLI - closed-loop driver for the action controller.
//!
//! - `motor run` - drive a point scene toward a goal with the configured strategy
//! - `motor random` - print one random legal action

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use motor_core::{
    random_action, DynamicsModel, IntegratorModel, PointNode, PointScene, RealVector, Scene,
    SplitMix64, Vec3,
};
use motor_ctl::{Controller, ControllerConfig, ObjectiveSpec, SeekOutcome};

#[derive(Parser)]
#[command(name = "motor")]
#[command(about = "Learned-model action controller", version)]
struct Cli {
    /// Controller config (YAML); defaults are used when the file does not exist
    #[arg(short, long, global = true, default_value = "motor.yaml")]
    config: PathBuf,

    /// Override the configured seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the demo scene toward the goal, one JSON line per step
    Run {
        /// Override the configured strategy (tree, simplex, grid)
        #[arg(long)]
        strategy: Option<String>,

        /// Goal position
        #[arg(long, value_delimiter = ',', default_values_t = [2.0, 1.0, 0.0])]
        goal: Vec<f64>,

        /// Give up after this many steps
        #[arg(long, default_value_t = 50)]
        max_steps: usize,
    },

    /// Print one random action inside the configured bounds
    Random,
}

#[derive(Serialize)]
struct StepRecord<'a> {
    step: usize,
    outcome: u8,
    action: Option<&'a RealVector>,
    position: &'a RealVector,
    value: &'a RealVector,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ControllerConfig::load_or_default(&cli.config)?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    match cli.command {
        Commands::Run {
            strategy,
            goal,
            max_steps,
        } => {
            if let Some(strategy) = strategy {
                config.strategy = strategy;
            }
            run_demo(config, &goal, max_steps)
        }
        Commands::Random => {
            let mut rng = SplitMix64::new(config.seed);
            let action = random_action(&config.bounds, &mut rng);
            println!("{}", serde_json::to_string(&action)?);
            Ok(())
        }
    }
}

fn run_demo(config: ControllerConfig, goal: &[f64], max_steps: usize) -> Result<()> {
    let &[gx, gy, gz] = goal else {
        bail!("--goal takes exactly three comma-separated numbers, got {}", goal.len());
    };

    let half = Vec3::new(0.1, 0.1, 0.1);
    let mut scene = PointScene::new("demo")
        .with_movable("hand", PointNode::new(Vec3::ZERO, half))
        .with_node("goal", PointNode::new(Vec3::new(gx, gy, gz), half));

    if config.objectives.is_empty() {
        warn!("config has no objectives, using euclidean hand -> goal");
    }
    let config = config.with_default_objectives(vec![ObjectiveSpec::new("euclidean")
        .with_param("a", "hand")
        .with_param("b", "goal")]);

    let model = IntegratorModel::default();
    let mut ctl = Controller::from_config(model.clone(), &config)
        .context("Invalid controller config")?;

    info!(strategy = ctl.strategy().as_str(), depth = ctl.depth(), "starting closed loop");

    for step in 0..max_steps {
        let outcome = ctl.seek(&scene);
        if let SeekOutcome::Success(action) = &outcome {
            let input = RealVector::concat(&[scene.properties().as_slice(), action.as_slice()]);
            let Some(next) = model.predict(scene.signature(), &scene.relations(), &input) else {
                bail!("model rejected its own planned action at step {step}");
            };
            scene.set_properties(&next);
        }

        let position = scene.properties();
        let value = ctl.objective().evaluate(&scene);
        let record = StepRecord {
            step,
            outcome: outcome.code(),
            action: outcome.action(),
            position: &position,
            value: &value,
        };
        println!("{}", serde_json::to_string(&record)?);

        if !matches!(outcome, SeekOutcome::Success(_)) {
            break;
        }
    }

    info!(
        searches = ctl.search_calls(),
        cache_hits = ctl.cache_hits(),
        invalidations = ctl.invalidations(),
        "closed loop finished"
    );
    Ok(())
}
