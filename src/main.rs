use anyhow::{bail, Context, Result};
use atlas_client::atlas::auth::{PRIVATE_KEY_ENV, PUBLIC_KEY_ENV};
use atlas_client::atlas::{AtlasClient, DigestAuth, MeasurementWindow, MeasurementsApi, ProcessesApi};
use atlas_client::config::{ClientConfig, PROJECT_ID_ENV};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Print the measurements of every process in an Atlas project
#[derive(Parser, Debug)]
#[command(name = "atlas-client", version, about, long_about = None)]
struct Args {
    /// Atlas API base URL (overrides config and MONGODB_ATLAS_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Measurement granularity as an ISO-8601 duration
    #[arg(long, default_value = "PT24H")]
    granularity: String,

    /// Measurement period as an ISO-8601 duration
    #[arg(long, default_value = "PT24H")]
    period: String,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("atlas-client started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("atlas-client").join("atlas-client.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".atlas-client").join("atlas-client.log");
    }
    PathBuf::from("atlas-client.log")
}

/// Credentials and project taken from the environment
fn credentials_from_env() -> Result<(DigestAuth, String)> {
    let project_id = std::env::var(PROJECT_ID_ENV).unwrap_or_default();

    match DigestAuth::from_env() {
        Some(auth) if !project_id.is_empty() => Ok((auth, project_id)),
        _ => bail!(
            "{}, {} and {} must be set to run this example",
            PROJECT_ID_ENV,
            PUBLIC_KEY_ENV,
            PRIVATE_KEY_ENV
        ),
    }
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6}", v),
        None => "-".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let (auth, project_id) = credentials_from_env()?;

    let mut config = ClientConfig::load();
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    tracing::info!(
        "Using project: {}, base URL: {}, public key: {}",
        project_id,
        config.base_url,
        auth.public_key()
    );

    let client = AtlasClient::connect(&config, auth).context("Failed to create Atlas client")?;
    let window = MeasurementWindow {
        granularity: args.granularity,
        period: args.period,
    };

    let (processes, _) = client
        .processes
        .list(&project_id, None)
        .await
        .context("Failed to list processes")?;
    tracing::info!("Loaded {} processes", processes.len());

    for process in &processes {
        println!("{}", process);

        let (measurements, _) = client
            .measurements
            .list_with_window(&project_id, &process.hostname, process.port, &window, None)
            .await
            .with_context(|| format!("Failed to list measurements for {}", process))?;

        for measurement in &measurements {
            println!("  {}", measurement.name);

            for datapoint in &measurement.datapoints {
                println!("    {} {}", datapoint.timestamp, format_value(datapoint.value));
            }
        }
    }

    Ok(())
}
