//! Subscriber setup shared by the API service and the CLI.

use std::ffi::{OsStr, OsString};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub const LOG_DIR_VAR: &str = "BOOKREC_LOG_DIR";
pub const INCLUDE_BACKTRACE_VAR: &str = "BOOKREC_LOG_INCLUDE_BACKTRACE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub app_name: &'static str,
    /// Daily-rotated `<dir>/<app>.log` when set, stdout otherwise.
    pub log_dir: Option<PathBuf>,
    /// Also run the default panic hook (prints the backtrace to stderr).
    pub include_backtrace: bool,
}

fn parse_flag(value: &OsStr) -> bool {
    value
        .to_str()
        .map(str::trim)
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

impl LoggingConfig {
    pub fn new(app_name: &'static str) -> Self {
        Self {
            app_name,
            log_dir: None,
            include_backtrace: false,
        }
    }

    pub fn from_env(app_name: &'static str) -> Self {
        Self::from_lookup(app_name, |name| std::env::var_os(name))
    }

    fn from_lookup(app_name: &'static str, lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        Self {
            app_name,
            log_dir: lookup(LOG_DIR_VAR)
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            include_backtrace: lookup(INCLUDE_BACKTRACE_VAR).is_some_and(|v| parse_flag(&v)),
        }
    }

    /// `--log-dir` 指定時は環境変数より優先する
    pub fn with_log_dir(mut self, log_dir: Option<PathBuf>) -> Self {
        if log_dir.is_some() {
            self.log_dir = log_dir;
        }
        self
    }
}

fn install_panic_hook(app_name: &'static str, include_backtrace: bool) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let default_hook = panic::take_hook();

        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".into());

            tracing::error!(
                application = app_name,
                thread = std::thread::current().name().unwrap_or("unknown"),
                location = location.as_deref().unwrap_or("unknown"),
                panic_message = %message,
                "panic captured"
            );

            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}

fn open_log_writer(dir: &Path, app_name: &str) -> std::io::Result<BoxMakeWriter> {
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Ok(BoxMakeWriter::new(non_blocking))
}

/// Install the global subscriber and panic hook. `RUST_LOG` filters (default `info`).
///
/// An unusable log directory falls back to stdout and is reported once the
/// stdout subscriber is up.
pub fn init_tracing(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    let writer = config
        .log_dir
        .as_deref()
        .map(|dir| (dir, open_log_writer(dir, config.app_name)));

    match writer {
        Some((_, Ok(writer))) => {
            let _ = builder.with_writer(writer).try_init();
        }
        Some((dir, Err(err))) => {
            let _ = builder.try_init();
            tracing::warn!(
                error = %err,
                log_dir = %dir.display(),
                "cannot open log directory; logging to stdout"
            );
        }
        None => {
            let _ = builder.try_init();
        }
    }

    install_panic_hook(config.app_name, config.include_backtrace);
}
