use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod dataset;
mod error;
mod log;
mod model;
mod render;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "perflog-stats")]
#[command(about = "Timing statistics from asker/participant experiment logs", long_about = None)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Average duration of each of the 8 steps across asker and participants.
    Steps {
        /// Run directory holding `steps_*` and single-character participant logs.
        dir: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },

    /// Average participant wait and asker duration for every cycle.
    Cycles {
        /// Directory holding the asker log.
        data: PathBuf,

        /// Directory holding numbered participant logs (defaults to DATA).
        #[arg(long)]
        peers: Option<PathBuf>,

        /// Asker log file name inside DATA.
        #[arg(long, default_value = "run_4_1.txt")]
        asker: String,

        /// Number of cycles in the run; every cycle index must be below it.
        #[arg(long = "cycles", default_value_t = 100)]
        total_cycles: usize,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn emit(text: String, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(&path, text)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let classifier = log::LineClassifier::new()?;

    match cli.cmd {
        Commands::Steps { dir, format, out } => {
            let ds = dataset::StepDataset::discover(&dir)?;
            tracing::info!(
                "asker {}, {} participants",
                ds.asker.display(),
                ds.participants.len()
            );

            let report = model::run_steps(&ds, &classifier)?;
            let text = match format {
                Format::Text => render::render_step_tables(&report),
                Format::Json => render::render_json(&report)?,
            };
            emit(text, out)?;
        }
        Commands::Cycles {
            data,
            peers,
            asker,
            total_cycles,
            format,
            out,
        } => {
            let peers = peers.unwrap_or_else(|| data.clone());
            let ds = dataset::CycleDataset::discover(&data, &peers, &asker, total_cycles)?;

            let report = model::run_cycles(&ds, &classifier)?;
            let text = match format {
                Format::Text => render::render_cycle_table(&report),
                Format::Json => render::render_json(&report)?,
            };
            emit(text, out)?;
        }
    }

    Ok(())
}
