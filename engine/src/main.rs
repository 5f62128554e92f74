// Engine main entry point
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use engine::config::settings::EngineSettings;
use engine::FormattingService;
use shared::models::ProcessingResult;
use shared::utils::default_output_path;
use tracing::info;

/// Insert thousands separators into the numbers of a .docx file.
#[derive(Parser, Debug)]
#[command(name = "docx-thousands", version, about)]
struct Cli {
    /// Document to process
    input: PathBuf,

    /// Write the result here instead of overwriting the input
    #[arg(short, long, conflicts_with = "copy")]
    output: Option<PathBuf>,

    /// Write the result next to the input, using the configured copy suffix
    #[arg(long)]
    copy: bool,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => EngineSettings::load_from_file(path)?,
        None => EngineSettings::default(),
    };

    let output = match (&cli.output, cli.copy) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(default_output_path(&cli.input, &settings.copy_suffix)),
        (None, false) => None,
    };

    info!("Processing {}", cli.input.display());
    let started = chrono::Utc::now();
    let service = FormattingService::new(settings);
    let mut task = service.spawn(cli.input.clone(), output);

    let mut heartbeat =
        tokio::time::interval(Duration::from_secs(service.settings().progress_interval_secs));
    heartbeat.tick().await;
    let result = loop {
        tokio::select! {
            joined = &mut task => {
                break joined.unwrap_or_else(|e| ProcessingResult::failed(format!("worker stopped: {e}")));
            }
            _ = heartbeat.tick() => {
                info!("Still processing {}...", cli.input.display());
            }
        }
    };
    info!(
        elapsed_ms = (result.finished_at - started).num_milliseconds(),
        success = result.success,
        "Finished"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        println!("{}", result.message);
    } else {
        eprintln!("{}", result.message);
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
