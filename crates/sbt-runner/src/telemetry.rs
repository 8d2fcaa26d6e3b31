//! Tracing setup for hosts embedding the runner.
//!
//! An editor plugin owns its settings, so the host passes the filter and
//! the log destination in; nothing here consults the environment.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Keeps the background log writer alive. Hold it until the host unloads
/// the plugin; dropping it flushes pending lines.
pub struct TelemetryGuard {
    _guard: Option<WorkerGuard>,
}

impl TelemetryGuard {
    fn disabled() -> Self {
        Self { _guard: None }
    }
}

/// Install the global subscriber with the host-supplied `filter` directive
/// (`"info"`, `"sbt_runner=debug"`, ...). Lines go to `log_file` when one
/// is given, stderr otherwise. A second call leaves the first subscriber
/// in place and hands back a disabled guard. Thread names are on so
/// reader/waiter activity is attributable.
pub fn init_tracing(filter: &str, log_file: Option<&Path>) -> TelemetryGuard {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {filter:?} ({err}), using \"info\"");
        EnvFilter::new("info")
    });

    let mut open_failure = None;
    let (writer, guard) = match log_file.map(open_append) {
        Some(Ok(file)) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        Some(Err(err)) => {
            open_failure = Some(err);
            (BoxMakeWriter::new(std::io::stderr), None)
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_names(true)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .is_ok();
    if !installed {
        return TelemetryGuard::disabled();
    }

    if let Some(err) = open_failure {
        tracing::warn!(error = %err, "log file unavailable, logging to stderr");
    }
    TelemetryGuard { _guard: guard }
}

fn open_append(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}
