use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use trauma_eye::batch::{run_batch, write_response};
use trauma_eye::report::INVALID_JSON_MESSAGE;
use trauma_eye::{AnalysisResponse, AnalyzerConfig, WoundAnalyzer};

#[derive(Parser)]
#[command(name = "trauma-eye")]
#[command(about = "Heuristic triage of wound photographs")]
struct Cli {
    /// Enable verbose logging (to stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file overriding analysis thresholds
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Save intermediate images to directory (must be empty)
    #[arg(long, value_name = "DIR", global = true)]
    debug_out: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Read a JSON request ({"image": ..., "previous_wound_data": ...}) and write the JSON result
    Analyze {
        /// Request file; stdin when omitted
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Result file; stdout when omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Analyze an image file directly
    Image {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// JSON file with an earlier result of the same wound
        #[arg(long, value_name = "FILE")]
        previous: Option<PathBuf>,

        /// Pretty-print the result
        #[arg(long)]
        pretty: bool,
    },

    /// Analyze every *.json request in a directory concurrently
    Batch {
        #[arg(value_name = "DIR")]
        input_dir: PathBuf,

        /// Where `<name>.result.json` files are written
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,

        /// Maximum concurrent analyses
        #[arg(short, long, default_value_t = 4)]
        jobs: usize,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => AnalyzerConfig::from_json_file(path)?,
        None => AnalyzerConfig::default(),
    };

    let mut analyzer = WoundAnalyzer::with_config(config);
    if let Some(debug_dir) = args.debug_out {
        analyzer = analyzer.with_debug(debug_dir)?;
    }

    match args.command.unwrap_or(Command::Analyze {
        input: None,
        output: None,
    }) {
        Command::Analyze { input, output } => analyze_request(&analyzer, input, output),
        Command::Image {
            image_path,
            previous,
            pretty,
        } => analyze_image_file(&analyzer, &image_path, previous.as_deref(), pretty),
        Command::Batch {
            input_dir,
            out_dir,
            jobs,
        } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            let summary =
                runtime.block_on(run_batch(Arc::new(analyzer), &input_dir, &out_dir, jobs))?;
            eprintln!(
                "Processed {} requests ({} failed)",
                summary.processed, summary.failed
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn analyze_request(
    analyzer: &WoundAnalyzer,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let text = match &input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let response = analyzer.respond_to_json(&text);
    let invalid_input = matches!(
        &response,
        AnalysisResponse::Failed(record) if record.message == INVALID_JSON_MESSAGE
    );

    match output {
        Some(path) => write_response(&path, &response)?,
        None => print_response(&response, false)?,
    }

    Ok(if invalid_input {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn analyze_image_file(
    analyzer: &WoundAnalyzer,
    image_path: &Path,
    previous: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<ExitCode> {
    let previous = match previous {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Some(serde_json::from_str::<serde_json::Value>(&text)
                .with_context(|| format!("Failed to parse {}", path.display()))?)
        }
        None => None,
    };

    let img = image::open(image_path)
        .with_context(|| format!("Failed to decode image {}", image_path.display()))?
        .to_rgb8();

    let response = analyzer.respond_to_image(&img, previous.as_ref());
    print_response(&response, pretty)?;
    Ok(if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_response(response: &AnalysisResponse, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        response.to_json_pretty()?
    } else {
        response.to_json()?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    Ok(())
}
