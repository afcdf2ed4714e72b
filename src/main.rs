use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cyclescope::manager::Manager;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// Directory where report and figure files are written.
    #[arg(long)]
    out_dir: PathBuf,

    /// Optional TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a single CSV file.
    Analyze {
        #[arg(long)]
        input: PathBuf,
    },

    /// Analyze every CSV file in a directory.
    Batch {
        #[arg(long)]
        data_dir: PathBuf,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(&args.out_dir, args.config).context("failed to construct mgr")?;

    match args.command {
        Command::Analyze { input } => mgr.analyze_file(input)?,
        Command::Batch { data_dir } => mgr.analyze_dir(data_dir)?,
    }

    Ok(())
}
