//! Run engine: per-run logging setup and the context object handed to agents.

use crate::state::StateStore;
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, Subscriber};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Shared context for one run: where logs go and the durable state store
#[derive(Debug)]
pub struct Engine {
    state: StateStore,
    log_file: Option<PathBuf>,
}

impl Engine {
    pub fn new(state: StateStore, log_file: Option<PathBuf>) -> Self {
        Self { state, log_file }
    }

    /// Record an agent event as `[agent] action: details`
    pub fn log(&self, agent: &str, action: &str, details: &str) {
        info!(agent, "[{}] {}: {}", agent, action, details);
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

/// Create every directory the run writes into
pub fn ensure_directories(dirs: &[&Path]) -> std::io::Result<()> {
    for dir in dirs {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

pub fn log_file_name(now: DateTime<Local>) -> String {
    format!("run_{}.log", now.format("%Y%m%d_%H%M%S"))
}

/// Console-only logging for commands that never start a batch
pub fn init_console_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("datasteward=debug")
    } else {
        EnvFilter::new("datasteward=warn")
    };

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Per-run log file layer; ignores `RUST_LOG` so agent actions are always recorded
fn file_layer<S>(file: File, verbose: bool) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let level = if verbose { "debug" } else { "info" };
    fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(EnvFilter::new(format!("datasteward={}", level)))
}

/// Install console + per-run file logging and return the log file path
pub fn init_logging(log_dir: &Path, verbose: bool) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(log_file_name(Local::now()));
    let file = File::create(&log_path)?;

    let console_filter = if verbose {
        EnvFilter::new("datasteward=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("datasteward=info"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .with(file_layer(file, verbose))
        .try_init()?;

    info!("Engine initialized. Logging to {}", log_path.display());
    Ok(log_path)
}
