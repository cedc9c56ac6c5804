//! Log setup for the console binary. Library events use `votepaxos::*`
//! targets; everything goes to stderr unless `--log-file` is given.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::OnceLock;

use clap::ValueEnum;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const FILTER_ENV: &str = "VOTEPAXOS_LOG_FILTER";

/// HTTP and WebSocket plumbing, capped at info unless the filter is
/// overridden.
const NOISY_DEPENDENCIES: &[&str] = &["hyper", "reqwest", "rustls", "tungstenite", "tokio_tungstenite"];

#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub file: Option<PathBuf>,
}

#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("failed to open log file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to configure logger: {0}")]
    Configure(String),
}

static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Installs the global subscriber. A second call is a no-op.
pub fn init(config: &LogConfig) -> Result<(), InitError> {
    if GUARD.get().is_some() {
        return Ok(());
    }

    let (writer, guard) = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| InitError::Io {
                    path: path.clone(),
                    source,
                })?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let filter = std::env::var(FILTER_ENV).unwrap_or_else(|_| filter_for(config.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(config.level >= LogLevel::Debug)
        .with_ansi(config.file.is_none())
        .with_writer(writer)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| InitError::Configure(err.to_string()))?;
    let _ = GUARD.set(guard);
    Ok(())
}

/// Our own targets follow `level`; third-party crates stay at info or
/// quieter so a debug run is not drowned in connection chatter.
fn filter_for(level: LogLevel) -> String {
    if level <= LogLevel::Info {
        return level.directive().to_owned();
    }
    let own = level.directive();
    let mut filter = format!("info,votepaxos={own},votepaxos_client={own},votepaxos_console={own}");
    for target in NOISY_DEPENDENCIES {
        filter.push_str(&format!(",{target}=info"));
    }
    filter
}
