use std::panic::{self, PanicHookInfo};
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

// Keeps the non-blocking writer flushing for the process lifetime.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize the global tracing subscriber. Filtering follows `RUST_LOG`
/// (default `info`). With `JOBFIT_LOG_DIR` set, records go to a daily-rotated
/// `<dir>/<app>.log`; otherwise they go to stdout. Calling again is a no-op.
pub fn init_tracing_subscriber(app_name: &'static str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match file_writer(app_name) {
        Some((writer, guard)) => {
            let _ = LOG_GUARD.set(guard);
            let _ = builder.with_writer(writer).try_init();
        }
        None => {
            let _ = builder.try_init();
        }
    }
}

fn file_writer(app_name: &str) -> Option<(BoxMakeWriter, WorkerGuard)> {
    let dir = PathBuf::from(std::env::var_os("JOBFIT_LOG_DIR")?);
    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("jobfit: cannot create log dir {}: {err}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    Some((BoxMakeWriter::new(non_blocking), guard))
}

/// Route panics through `tracing::error!` so they land in the same sink as
/// every other record. Installed once per process; set
/// `JOBFIT_LOG_INCLUDE_BACKTRACE=1` to also run the default hook.
pub fn install_tracing_panic_hook(app_name: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let previous = panic::take_hook();
        let chain_default = std::env::var("JOBFIT_LOG_INCLUDE_BACKTRACE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        panic::set_hook(Box::new(move |info| {
            let thread = std::thread::current();
            tracing::error!(
                application = app_name,
                thread = thread.name().unwrap_or("unnamed"),
                location = %info
                    .location()
                    .map(|l| format!("{}:{}", l.file(), l.line()))
                    .unwrap_or_else(|| "unknown".into()),
                message = %panic_message(info),
                "panic captured"
            );
            if chain_default {
                previous(info);
            }
        }));
    });
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "panic payload not a string".into()
    }
}
