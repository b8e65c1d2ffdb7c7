use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cwfilter::aws::{auth::Credentials, format_api_error, LogsClient};
use cwfilter::config::Config;
use cwfilter::filter::error::RemoteError;
use cwfilter::filter::{validate_filter_spec, FilterError, FilterId, FilterReconciler, FilterSpec};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Manage CloudWatch Logs metric filters
#[derive(Parser, Debug)]
#[command(name = "cwfilter", version, about, long_about = None)]
struct Args {
    /// AWS region to use
    #[arg(short, long, global = true)]
    region: Option<String>,

    /// Credentials profile to use
    #[arg(short, long, global = true)]
    profile: Option<String>,

    /// Override the CloudWatch Logs endpoint URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a filter definition without calling the API
    Validate {
        /// YAML filter definition
        file: PathBuf,
    },
    /// Create a metric filter and print its id
    Create {
        /// YAML filter definition
        file: PathBuf,
    },
    /// Print the current state of a metric filter
    Read {
        /// Filter id (<filter name>:<log group name>)
        id: String,
    },
    /// Delete a metric filter
    Delete {
        /// Filter id (<filter name>:<log group name>)
        id: String,
    },
    /// Save region/profile/endpoint as defaults
    Configure,
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

    tracing::info!("cwfilter started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("cwfilter").join("cwfilter.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".cwfilter").join("cwfilter.log");
    }
    PathBuf::from("cwfilter.log")
}

fn load_spec(path: &Path) -> Result<FilterSpec> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    FilterSpec::from_yaml(&content).with_context(|| format!("Failed to parse {:?}", path))
}

/// Merge CLI flags over the saved configuration
fn effective_config(args: &Args) -> Config {
    let mut config = Config::load();
    if args.region.is_some() {
        config.region = args.region.clone();
    }
    if args.profile.is_some() {
        config.profile = args.profile.clone();
    }
    if args.endpoint.is_some() {
        config.endpoint = args.endpoint.clone();
    }
    config
}

fn build_reconciler(config: &Config) -> Result<FilterReconciler<LogsClient>> {
    let profile = config.effective_profile();
    let region = config.effective_region(&profile);
    tracing::info!("Using region: {}, profile: {}", region, profile);

    let credentials = Credentials::load(&profile)?;
    let client = match &config.endpoint {
        Some(endpoint) => LogsClient::with_endpoint(&region, credentials, endpoint)?,
        None => LogsClient::new(&region, credentials)?,
    };

    Ok(FilterReconciler::new(client))
}

fn report(err: &FilterError) -> ExitCode {
    match err {
        FilterError::NotFound { .. } => {
            eprintln!("{}", err);
            ExitCode::from(2)
        }
        FilterError::Validation(violations) => {
            eprintln!("Invalid metric filter definition:");
            for v in violations {
                eprintln!("  - {}", v);
            }
            ExitCode::FAILURE
        }
        FilterError::InvalidId(_) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
        FilterError::Remote { action, source } => {
            tracing::error!("{}: {:?}", action, source);
            eprintln!("Error: {}", remote_message(action, source));
            ExitCode::FAILURE
        }
    }
}

/// User-facing message for a failed remote call
fn remote_message(action: &str, source: &RemoteError) -> String {
    format!("{}: {}", action, format_api_error(&**source))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config = effective_config(&args);

    match &args.command {
        Command::Validate { file } => {
            let spec = load_spec(file)?;
            let violations = validate_filter_spec(&spec);
            if violations.is_empty() {
                println!("{} is valid", file.display());
                return Ok(ExitCode::SUCCESS);
            }
            Ok(report(&FilterError::Validation(violations)))
        }
        Command::Create { file } => {
            let spec = load_spec(file)?;
            let reconciler = build_reconciler(&config)?;
            match reconciler.create_and_refresh(&spec).await {
                Ok((id, state)) => {
                    println!("id: {}", id);
                    print!("{}", state.to_yaml()?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report(&e)),
            }
        }
        Command::Read { id } => {
            let id = match FilterId::parse(id) {
                Ok(id) => id,
                Err(e) => return Ok(report(&e)),
            };
            let reconciler = build_reconciler(&config)?;
            match reconciler.read(&id).await {
                Ok(state) => {
                    print!("{}", state.to_yaml()?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report(&e)),
            }
        }
        Command::Delete { id } => {
            let id = match FilterId::parse(id) {
                Ok(id) => id,
                Err(e) => return Ok(report(&e)),
            };
            let reconciler = build_reconciler(&config)?;
            match reconciler.delete(&id).await {
                Ok(()) => {
                    println!("Deleted {}", id);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report(&e)),
            }
        }
        Command::Configure => {
            config.save()?;
            if let Some(path) = Config::config_path() {
                println!("Saved {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_message_names_action_once() {
        let source: RemoteError = anyhow::anyhow!("connection reset")
            .context("PutMetricFilter failed")
            .into();
        assert_eq!(
            remote_message("metric filter creation failed", &source),
            "metric filter creation failed: PutMetricFilter failed: connection reset"
        );
    }

    #[test]
    fn test_remote_message_maps_service_error() {
        let source: RemoteError = anyhow::anyhow!("API request failed: 403 Forbidden")
            .context("DescribeMetricFilters failed")
            .into();
        assert_eq!(
            remote_message("describing metric filters failed", &source),
            "describing metric filters failed: Permission denied. Check your IAM permissions."
        );
    }
}
