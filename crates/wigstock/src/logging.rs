// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide tracing setup.
//!
//! Two layers share one registry: human-readable output on stderr at the
//! configured level, and an append-only error log that records ERROR events
//! as `YYYY-MM-DD HH:MM:SS - LEVEL - message`.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{ChronoLocal, FormatTime};
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use wigstock_config::model::LoggingConfig;

/// Timestamp layout of the error log.
pub const ERROR_LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. Later calls are no-ops.
///
/// `RUST_LOG` overrides the configured console level. The error log is
/// opened (and its directory created) before anything is installed, so a
/// failure leaves the process without a subscriber.
pub fn init_logging(config: &LoggingConfig) -> io::Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let file = open_error_log(Path::new(&config.error_log))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "wigstock={},warn",
            config.level.to_ascii_lowercase()
        ))
    });

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_filter(filter);

    // Fails only when some other subscriber is already installed; that one stays.
    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(error_file_layer(file))
        .try_init();

    let _ = INIT.set(());
    Ok(())
}

/// Open `path` for appending, creating it and its directory if needed.
pub fn open_error_log(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Layer that writes ERROR events to `file` in the error-log format.
pub fn error_file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .event_format(ErrorLogFormat::default())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR)
}

struct ErrorLogFormat {
    timer: ChronoLocal,
}

impl Default for ErrorLogFormat {
    fn default() -> Self {
        Self {
            timer: ChronoLocal::new(ERROR_LOG_TIME_FORMAT.to_string()),
        }
    }
}

impl<S, N> FormatEvent<S, N> for ErrorLogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        self.timer.format_time(&mut writer)?;
        write!(writer, " - {} - ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
