//! tracelink
//!
//! Recovers trace links between high-level and low-level requirements.
//! Inputs are the output of the preprocessing step: JSON objects mapping a
//! requirement id to its normalized tokens.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use indexmap::IndexMap;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use tracelink_vectorizer::{
    error::Result, Collection, ConfigError, GroundTruth, IdfScope, LinkSet, Side, Strategy,
    TraceConfig, TraceLinker,
};

#[derive(Parser)]
#[command(name = "tracelink")]
#[command(version)]
#[command(about = "Recover trace links between high-level and low-level requirements")]
struct Cli {
    /// Matcher to use: 0 existence, 1 fixed threshold, 2 relative to row max, 3 adaptive
    match_type: String,

    /// High-level requirements, JSON object id -> tokens
    #[arg(long, default_value = "/input/high.json")]
    high: PathBuf,

    /// Low-level requirements, JSON object id -> tokens
    #[arg(long, default_value = "/input/low.json")]
    low: PathBuf,

    /// Ground truth, JSON object id -> "L1,L2"
    #[arg(long)]
    truth: Option<PathBuf>,

    /// Where the recovered links are written
    #[arg(long, default_value = "/output/links.json")]
    output: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Document frequency scope: collection or corpus
    #[arg(long)]
    idf_scope: Option<IdfScope>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn read_collection(path: &Path, side: Side) -> Result<Collection> {
    let reader = BufReader::new(File::open(path)?);
    let reqs: IndexMap<String, Vec<String>> = serde_json::from_reader(reader)?;
    Collection::from_requirements(side, reqs)
}

fn read_ground_truth(path: &Path) -> Result<GroundTruth> {
    let reader = BufReader::new(File::open(path)?);
    let cells: IndexMap<String, String> = serde_json::from_reader(reader)?;
    Ok(GroundTruth::from_cells(cells))
}

fn write_links(path: &Path, links: &LinkSet) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &links.records())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let match_type: i64 = cli.match_type.trim().parse().map_err(|_| ConfigError::ValidationFailed {
        field: "match_type".to_string(),
        message: format!("{:?} is not a valid number", cli.match_type),
    })?;
    // a bad match type is rejected before any file is read
    Strategy::try_from(match_type)?;

    // the file is validated once, after the command line overrides are applied
    let mut config = match &cli.config {
        Some(path) => TraceConfig::read(path)?,
        None => TraceConfig::default(),
    };
    config.strategy = match_type;
    if let Some(scope) = cli.idf_scope {
        config.idf_scope = scope;
    }
    let linker: TraceLinker = TraceLinker::new(config)?;
    println!("Running with matchtype {}", linker.strategy().id());

    let low = read_collection(&cli.low, Side::Low)?;
    println!("There are {} low-level requirements", low.len());
    let high = read_collection(&cli.high, Side::High)?;

    let run = linker.run(&high, &low);
    write_links(&cli.output, &run.links)?;
    info!(path = %cli.output.display(), "links written");

    if let Some(truth_path) = &cli.truth {
        let truth = read_ground_truth(truth_path)?;
        let evaluation = linker.evaluate(&run, &truth);
        println!("{evaluation}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
