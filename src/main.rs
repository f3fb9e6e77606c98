use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::info;

use spectral_transmission::data::loader::{DirectorySource, SpectrumSource};
use spectral_transmission::{FilterEntry, GridConfig, Report, Session};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "spectral-transmission")]
#[command(about = "Compute the light a dye emits through a stack of filters", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding `dyes/` and `filters/` subdirectories
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Dye to start from
    #[arg(long)]
    dye: Option<String>,

    /// Filter as NAME or NAME:MODE (t or r), repeated in light-path order
    #[arg(short, long = "filter", value_name = "NAME[:MODE]")]
    filters: Vec<FilterEntry>,

    /// JSON grid configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long)]
    wl_min: Option<f64>,

    #[arg(long)]
    wl_max: Option<f64>,

    #[arg(long)]
    wl_step: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Write to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// List available dyes and filters and exit
    #[arg(short, long)]
    list: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dyes = DirectorySource::new(cli.data_dir.join("dyes"));
    let filters = DirectorySource::new(cli.data_dir.join("filters"));

    if cli.list {
        return list_sources(&dyes, &filters);
    }
    if cli.dye.is_none() && cli.filters.is_empty() {
        bail!("nothing to compute: give --dye and/or --filter (see --help)");
    }

    let config = match &cli.config {
        Some(path) => GridConfig::load(path)?,
        None => GridConfig::default(),
    }
    .with_overrides(cli.wl_min, cli.wl_max, cli.wl_step);
    let grid = config.grid()?;
    info!("using grid {grid}");

    let mut session = Session::new(grid);
    session.select_dye(cli.dye.clone());
    for entry in cli.filters.iter().cloned() {
        session.add_filter(entry);
    }
    session.load_active(&dyes, &filters)?;
    session.recompute()?;

    let report = Report::build(&session)?;
    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    match cli.format {
        Format::Json => report.write_json(&mut writer)?,
        Format::Csv => report.write_csv(&mut writer)?,
    }
    writer.flush().context("flushing output")
}

fn list_sources(dyes: &DirectorySource, filters: &DirectorySource) -> Result<()> {
    let mut out = io::stdout().lock();
    for (heading, source) in [("Dyes", dyes), ("Filters", filters)] {
        writeln!(out, "{heading} ({}):", source.dir().display())?;
        match source.keys() {
            Ok(keys) => {
                for key in keys.keys() {
                    writeln!(out, "  {key}")?;
                }
            }
            Err(e) => writeln!(out, "  unavailable: {e:#}")?,
        }
    }
    Ok(())
}
