//! Standalone enrichment worker binary.
//!
//! Runs one pipeline against a local input file and writes results to
//! an output directory, using the same storage trait the host
//! application implements:
//!
//! ```text
//! lectio-worker video  <input.mp4> [out_dir]
//! lectio-worker slides <input.pdf> [out_dir]
//! ```

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lectio_models::{TaskDescriptor, TaskKind};
use lectio_worker::{LocalStore, TaskExecutor, WorkerConfig};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("lectio=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let args: Vec<String> = std::env::args().collect();
    let (kind, input, out_dir) = match parse_args(&args) {
        Some(parsed) => parsed,
        None => {
            eprintln!("Usage: lectio-worker <video|slides> <input-file> [out-dir]");
            std::process::exit(2);
        }
    };

    let config = match WorkerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let task = TaskDescriptor::new(1, kind);
    let store = LocalStore::new(&out_dir).with_source(kind.file_area(), &input);
    let executor = TaskExecutor::new(config);

    info!(input = %input, out_dir = %out_dir, "Starting lectio-worker");

    if let Err(e) = executor.execute(&task, &store).await {
        error!("Enrichment failed: {}", e);
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Option<(TaskKind, String, String)> {
    let kind = match args.get(1)?.as_str() {
        "video" => TaskKind::VideoTopics,
        "slides" => TaskKind::SlidesSummary,
        _ => return None,
    };
    let input = args.get(2)?.clone();
    let out_dir = args.get(3).cloned().unwrap_or_else(|| ".".to_string());
    Some((kind, input, out_dir))
}
