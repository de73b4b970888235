// src/main.rs
mod chooser;
mod config;
mod expander;
mod file_utils;
mod models;
mod orchestrator;
mod session;
mod sweep_parser;
mod tui;
mod visualisation;

use anyhow::Result;
use chooser::{Chooser, LineChooser, PresetChooser};
use clap::{Parser, Subcommand};
use config::{DEFAULT_CONFIG_FILE, load_config};
use models::Config;
use orchestrator::{ProcessOptimiser, RunLayout};
use session::{Session, locate_optimiser};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tui::TuiChooser;
use visualisation::{VisualisationOutcome, Visualiser};

#[derive(Parser)]
#[command(name = "eva-sweep")]
#[command(about = "Run parameter sweeps of the EVA_Research vehicle scheduling optimiser")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Application config file (created with defaults when missing)
    #[arg(long, short, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Root folder holding region/dataset/frequency folders
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Sweep description (JSON, or YAML by extension)
    #[arg(long, global = true)]
    sweep: Option<PathBuf>,

    /// Explicit optimiser executable instead of searching PATH
    #[arg(long, global = true)]
    executable: Option<String>,

    /// Region folder to use without asking
    #[arg(long, global = true)]
    region: Option<String>,

    /// Dataset folder to use without asking
    #[arg(long, global = true)]
    dataset: Option<String>,

    /// Optimise only this frequency folder
    #[arg(long, global = true, conflicts_with = "all_frequencies")]
    frequency: Option<String>,

    /// Optimise every frequency folder of the dataset
    #[arg(long, global = true)]
    all_frequencies: bool,

    /// Use line prompts instead of the full-screen chooser
    #[arg(long, global = true)]
    no_tui: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose a dataset interactively and run the whole sweep on it (default)
    Run,
    /// Post-process the optimiser output of an existing run folder
    Visualise {
        /// Run folder containing outputs/VS_Output.csv
        run_folder: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    // RUST_LOG 优先，其次是 -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // 加载配置文件
    let config = load_config(&cli.config)?;

    match &cli.command {
        None | Some(Commands::Run) => run_sweep(&cli, &config),
        Some(Commands::Visualise { run_folder }) => visualise(&config, run_folder),
    }
}

fn run_sweep(cli: &Cli, config: &Config) -> Result<()> {
    let general = &config.general;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&general.data_dir));
    let sweep_path = cli
        .sweep
        .clone()
        .unwrap_or_else(|| PathBuf::from(&general.sweep_file));

    let explicit = cli.executable.as_deref().or(general.executable_path.as_deref());
    let executable = locate_optimiser(
        &general.executable_name,
        explicit,
        std::env::var_os("PATH").as_deref(),
    )?;
    let optimiser = ProcessOptimiser::new(executable);
    info!(executable = %optimiser.executable().display(), "Using optimiser");

    let parameters = sweep_parser::parse_sweep_file(&sweep_path)?;
    info!(
        parameters = parameters.len(),
        configurations = expander::combination_count(&parameters),
        "Loaded sweep"
    );

    let inner: Box<dyn Chooser> = if config.tui.enabled && !cli.no_tui && io::stdout().is_terminal() {
        Box::new(TuiChooser::new(&config.tui, config.keybindings.clone()))
    } else {
        Box::new(LineChooser::new(io::stdin().lock(), io::stdout()))
    };
    let frequency_answer = if cli.frequency.is_some() {
        Some(true)
    } else if cli.all_frequencies {
        Some(false)
    } else {
        None
    };
    let mut chooser = PresetChooser::new(
        inner,
        [cli.region.clone(), cli.dataset.clone(), cli.frequency.clone()],
        [frequency_answer],
    );

    let visualiser = Visualiser::new(config.visualisation.clone());
    let layout = RunLayout::from(general);
    let session = Session {
        data_dir: &data_dir,
        parameters: &parameters,
        optimiser: &optimiser,
        post_processor: &visualiser,
        layout: &layout,
    };
    let report = session.run(&mut chooser)?;

    for line in report.summary_lines() {
        println!("{}", line);
    }
    Ok(())
}

fn visualise(config: &Config, run_folder: &Path) -> Result<()> {
    let visualiser = Visualiser::new(config.visualisation.clone());
    match visualiser.visualise_run(run_folder)? {
        VisualisationOutcome::Skipped => {
            println!("No optimiser output found in {}", run_folder.display());
        }
        VisualisationOutcome::Rendered { artifacts } => {
            for artifact in artifacts {
                println!("{}", artifact.display());
            }
        }
    }
    Ok(())
}
