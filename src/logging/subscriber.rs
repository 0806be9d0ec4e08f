//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use tracing_subscriber::filter::LevelFilter;

use super::utils::{format_elapsed, strip_ansi};
use super::{DRY_RUN_TARGET, STAGE_TARGET};

/// Collects the `message` field of a [`tracing::Event`] and renders the
/// remaining fields as trailing `key=value` pairs.
#[derive(Default)]
struct MessageExtractor {
    message: String,
    fields: String,
}

impl MessageExtractor {
    fn of(event: &tracing::Event<'_>) -> Self {
        let mut extractor = Self::default();
        event.record(&mut extractor);
        extractor
    }

    fn line(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }
}

/// A [`tracing_subscriber::Layer`] that appends every event to a log file,
/// with run-relative timestamps and ANSI codes stripped.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
    start: Instant,
}

impl FileLayer {
    /// Truncate (or create) the file at `path` and write a run header.
    pub(super) fn new(path: &Path) -> io::Result<Self> {
        let version = option_env!("LINKFARM_VERSION")
            .unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let mut file = fs::File::create(path)?;
        writeln!(
            file,
            "==========================================\n\
             linkfarm {version}\n\
             =========================================="
        )?;
        Ok(Self {
            file: Mutex::new(file),
            start: Instant::now(),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let msg = strip_ansi(&MessageExtractor::of(event).line());
        let ts = format_elapsed(self.start.elapsed());

        let line = match (*metadata.level(), metadata.target()) {
            (tracing::Level::INFO, STAGE_TARGET) => format!("[{ts}] ==> {msg}"),
            (tracing::Level::INFO, DRY_RUN_TARGET) => format!("[{ts}]     [dry run] {msg}"),
            (tracing::Level::ERROR, _) => format!("[{ts}]     [error] {msg}"),
            (tracing::Level::WARN, _) => format!("[{ts}]     [warn] {msg}"),
            (tracing::Level::DEBUG | tracing::Level::TRACE, _) => {
                format!("[{ts}]     [debug] {msg}")
            }
            _ => format!("[{ts}]     {msg}"),
        };

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] for the console.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let msg = MessageExtractor::of(event).line();
        let msg = if writer.has_ansi_escapes() {
            msg
        } else {
            strip_ansi(&msg)
        };
        let (bold, dim, red, yellow, blue, reset) = if writer.has_ansi_escapes() {
            ("\x1b[1m", "\x1b[2m", "\x1b[31m", "\x1b[33m", "\x1b[1;34m", "\x1b[0m")
        } else {
            ("", "", "", "", "", "")
        };

        match *metadata.level() {
            tracing::Level::ERROR => writeln!(writer, "{red}ERROR{reset} {msg}"),
            tracing::Level::WARN => writeln!(writer, "{yellow}WARN{reset}  {msg}"),
            tracing::Level::INFO if metadata.target() == STAGE_TARGET => {
                writeln!(writer, "{blue}==>{reset} {bold}{msg}{reset}")
            }
            tracing::Level::INFO if metadata.target() == DRY_RUN_TARGET => {
                writeln!(writer, "  {yellow}[DRY RUN]{reset} {msg}")
            }
            tracing::Level::INFO => writeln!(writer, "  {msg}"),
            _ => writeln!(writer, "  {dim}{msg}{reset}"),
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Console output goes to stderr, filtered by `console_level`, so stdout
/// carries nothing but command output. When `log_file` is given, every event
/// down to `DEBUG` is also appended to it.
///
/// Must be called once at program startup, before any logging.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
pub fn init_subscriber(console_level: LevelFilter, log_file: Option<&Path>) -> io::Result<()> {
    use std::io::IsTerminal as _;
    use tracing_subscriber::{
        Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(console_level);

    let file_layer = log_file
        .map(FileLayer::new)
        .transpose()?
        .map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    Ok(())
}
