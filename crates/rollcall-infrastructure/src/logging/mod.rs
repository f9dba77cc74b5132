//! Logging setup.
//!
//! Every record goes to a daily-rolling file as one line of JSON:
//! timestamp (ISO 8601 with offset, millisecond precision), level, target,
//! pid, tid, file and line, message, structured fields and the crate version.
//! A coloured human-readable copy goes to stderr in debug builds, or when
//! asked for. stdout is left alone because the CLI prints its results there.
//!
//! `log` macros are bridged into `tracing`, and `RUST_LOG` overrides the
//! default filters.

use log::LevelFilter;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{Event, Level, Subscriber};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();
static LOGGER_READY: OnceLock<()> = OnceLock::new();
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub dir: PathBuf,
    pub file_prefix: String,
    /// Mirror records to stderr. Defaults to on in debug builds.
    pub console: bool,
}

impl LogSettings {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            file_prefix: "rollcall.log".to_string(),
            console: cfg!(debug_assertions),
        }
    }
}

/// Install the global subscriber. Calling it again is a no-op.
pub fn init_logger(settings: &LogSettings) -> anyhow::Result<()> {
    if LOGGER_READY.get().is_some() {
        return Ok(());
    }

    std::fs::create_dir_all(&settings.dir)?;
    let _ = LOG_DIR.set(settings.dir.clone());

    let _ = LogTracer::builder()
        .with_max_level(LevelFilter::Trace)
        .init();

    let file_appender = rolling::daily(&settings.dir, &settings.file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = FILE_GUARD.set(guard);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .event_format(JsonLineFormat::new())
        .with_filter(env_filter(default_file_filter()));

    let console_layer = settings.console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .event_format(ConsoleFormat)
            .with_filter(env_filter("debug,sqlx=warn,rollcall=trace"))
    });

    let subscriber = Registry::default().with(file_layer).with(console_layer);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    let _ = LOGGER_READY.set(());

    tracing::info!(
        target: "rollcall::logging",
        log_dir = %settings.dir.display(),
        version = VERSION,
        profile = if cfg!(debug_assertions) { "debug" } else { "release" },
        "Logger initialized"
    );

    Ok(())
}

pub fn log_dir() -> Option<PathBuf> {
    LOG_DIR.get().cloned()
}

fn default_file_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "debug,sqlx=warn,rollcall=trace"
    } else {
        "info,sqlx=warn"
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Build the JSON object written for one event.
fn json_record(
    timestamp: &str,
    level: &Level,
    target: &str,
    location: Option<(&str, u32)>,
    mut fields: Map<String, Value>,
    pid: u32,
) -> Value {
    let thread = std::thread::current();
    let mut record = json!({
        "timestamp": timestamp,
        "level": level.to_string(),
        "target": target,
        "pid": pid,
        "tid": format!("{:?}", thread.id()),
        "thread_name": thread.name().unwrap_or("unnamed"),
        "version": VERSION,
    });

    if let Some((file, line)) = location {
        record["file"] = json!(file);
        record["line"] = json!(line);
    }
    if let Some(message) = fields.remove("message") {
        record["message"] = message;
    }
    if !fields.is_empty() {
        record["fields"] = Value::Object(fields);
    }
    record
}

fn location<'a>(metadata: &tracing::Metadata<'a>) -> Option<(&'a str, u32)> {
    metadata.file().zip(metadata.line())
}

struct JsonLineFormat {
    pid: u32,
}

impl JsonLineFormat {
    fn new() -> Self {
        Self {
            pid: std::process::id(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for JsonLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        let timestamp = chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S%.3f%:z")
            .to_string();
        let record = json_record(
            &timestamp,
            metadata.level(),
            metadata.target(),
            location(metadata),
            collector.fields,
            self.pid,
        );

        writeln!(writer, "{}", record)
    }
}

/// `2025-01-09 10:32:15.123 INFO rollcall::check_in user_id=.. | message (src/x.rs:12)`
struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        let level = match *metadata.level() {
            Level::ERROR => "\x1b[31mERROR\x1b[0m",
            Level::WARN => "\x1b[33m WARN\x1b[0m",
            Level::INFO => "\x1b[32m INFO\x1b[0m",
            Level::DEBUG => "\x1b[36mDEBUG\x1b[0m",
            Level::TRACE => "\x1b[35mTRACE\x1b[0m",
        };

        let message = collector
            .fields
            .remove("message")
            .map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or_default();

        let extras: String = collector
            .fields
            .iter()
            .map(|(key, value)| format!(" {}={}", key, value))
            .collect();

        let at = location(metadata)
            .map(|(file, line)| format!(" ({}:{})", file, line))
            .unwrap_or_default();

        writeln!(
            writer,
            "{} {} {}{} | {}{}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            metadata.target(),
            extras,
            message,
            at
        )
    }
}

#[derive(Default)]
struct FieldCollector {
    fields: Map<String, Value>,
}

impl tracing::field::Visit for FieldCollector {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), json!(format!("{:?}", value)));
    }
}
