use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;

use snake_eater::dataset::{DatasetFormat, DatasetWriter};
use snake_eater::driver::TickDriver;
use snake_eater::features::FeatureSchema;
use snake_eater::game::{GameConfig, GameEngine};
use snake_eater::modes::{BenchConfig, BenchMode, PlayMode};
use snake_eater::policy::{AxisPriority, PolicyKind, PolicySettings, build_policy};
use snake_eater::telemetry;

const DEFAULT_LOG_FILE: &str = "snake_eater.log";

#[derive(Parser)]
#[command(name = "snake_eater")]
#[command(version, about = "Grid snake with scripted and learned movement policies")]
struct Cli {
    /// Interactive board or headless benchmark
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// Movement policy
    #[arg(long, default_value = "manual")]
    policy: PolicyKind,

    /// Axis the greedy policy closes first
    #[arg(long, default_value = "vertical-first")]
    axis_priority: AxisPriority,

    /// Decision tree model (JSON); the built-in baseline tree when omitted
    #[arg(long)]
    model: Option<PathBuf>,

    /// Give up on a prediction after this many milliseconds and keep going straight
    #[arg(long)]
    model_timeout_ms: Option<u64>,

    /// Replace unsafe policy choices with the first safe move
    #[arg(long)]
    safeguard: bool,

    /// Game configuration file (JSON); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame width
    #[arg(long)]
    width: Option<i32>,

    /// Frame height
    #[arg(long)]
    height: Option<i32>,

    /// Cell size, the distance moved per tick
    #[arg(long)]
    cell_size: Option<i32>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Append one row per tick to this dataset file
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Dataset file format
    #[arg(long, default_value = "csv")]
    dataset_format: DatasetFormat,

    /// Feature columns written to the dataset
    #[arg(long, default_value = "safety")]
    schema: FeatureSchema,

    /// Add a one-step look-ahead future score column to the dataset
    #[arg(long)]
    lookahead: bool,

    /// Episodes to play in bench mode
    #[arg(long, default_value = "100")]
    episodes: usize,

    /// Per-episode step cap in bench mode (0 disables it)
    #[arg(long, default_value = "10000")]
    max_steps: u32,

    /// Log file; play mode defaults to snake_eater.log, bench mode logs to stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Watch or play on the terminal board
    Play,
    /// Run many episodes headless and report statistics
    Bench,
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.frame_width = width;
    }
    if let Some(height) = cli.height {
        config.frame_height = height;
    }
    if let Some(cell_size) = cli.cell_size {
        config.cell_size = cell_size;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    if let Err(msg) = config.validate() {
        bail!("Invalid configuration: {}", msg);
    }

    Ok(config)
}

fn open_dataset(cli: &Cli, path: &Path) -> Result<DatasetWriter> {
    DatasetWriter::open(path, cli.dataset_format, cli.schema, cli.lookahead)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = match (&cli.mode, &cli.log_file) {
        (_, Some(path)) => Some(path.clone()),
        (Mode::Play, None) => Some(PathBuf::from(DEFAULT_LOG_FILE)),
        (Mode::Bench, None) => None,
    };
    telemetry::init_tracing(log_file.as_deref())?;

    if matches!(cli.mode, Mode::Bench) && cli.policy == PolicyKind::Manual {
        bail!("bench mode needs an autonomous policy (axis-greedy, area-max or model)");
    }

    let config = load_config(&cli)?;
    tracing::info!(?config, "game configuration");

    let settings = PolicySettings {
        axis_priority: cli.axis_priority,
        safeguard: cli.safeguard,
        model_path: cli.model.clone(),
        model_timeout: cli.model_timeout_ms.map(Duration::from_millis),
    };
    let policy = build_policy(cli.policy, &settings)?;

    let mut driver = TickDriver::new(GameEngine::new(config), policy);
    if let Some(path) = &cli.dataset {
        driver = driver.with_recorder(open_dataset(&cli, path)?);
    }

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Play => {
            let mut play_mode = PlayMode::new(driver);
            play_mode.run().await?;
        }
        Mode::Bench => {
            let mut bench_config = BenchConfig::new(cli.episodes);
            bench_config.max_steps = (cli.max_steps > 0).then_some(cli.max_steps);
            let mut bench_mode = BenchMode::new(driver, bench_config);
            bench_mode.run()?;
        }
    }

    Ok(())
}
