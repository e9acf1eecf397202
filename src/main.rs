//! survey-boundary - Analyze a survey-plan model response from the command line

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use survey_boundary::logging::init_logging;
use survey_boundary::report::csv::write_submission;
use survey_boundary::{AnalysisConfig, Analyzer, GeoJsonDirectory, LayerCache};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Full report as pretty-printed JSON
    Json,
    /// One `;`-separated submission row with header
    Csv,
}

#[derive(Parser)]
#[command(name = "survey-boundary")]
#[command(
    about = "Extract a survey boundary from model output and check it against reference layers",
    long_about = None
)]
struct Args {
    /// File holding the model response, or `-` for stdin
    response: String,

    /// Directory of `<layer>.geojson` reference layers
    #[arg(long, default_value = "layers")]
    layers_dir: PathBuf,

    /// JSON configuration file (bounds, layer list, thresholds)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Survey name for the CSV row (defaults to the response file stem)
    #[arg(long)]
    survey_name: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging().context("failed to initialise logging")?;

    let config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let raw = read_response(&args.response)?;
    let layers = LayerCache::new(GeoJsonDirectory::new(&args.layers_dir), config.max_cached_layers);
    info!(
        layers_dir = %args.layers_dir.display(),
        layer_count = config.layers.len(),
        "starting analysis"
    );

    let report = Analyzer::new(&config, &layers)
        .analyze(&raw)
        .context("analysis failed")?;

    let stdout = io::stdout();
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(stdout.lock(), &report)?;
            println!();
        }
        OutputFormat::Csv => {
            let name = args
                .survey_name
                .clone()
                .unwrap_or_else(|| survey_name_from(&args.response));
            write_submission(stdout.lock(), &config.layers, &[(name.as_str(), &report)])?;
        }
    }

    Ok(())
}

fn read_response(source: &str) -> Result<String> {
    if source == "-" {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read response from stdin")?;
        Ok(raw)
    } else {
        fs::read_to_string(source).with_context(|| format!("failed to read response {}", source))
    }
}

fn survey_name_from(source: &str) -> String {
    PathBuf::from(source)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "survey".to_string())
}
