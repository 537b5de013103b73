//! Tracing subscriber setup for the operator console.
//!
//! Everything the logging engine reports about itself (configuration
//! failures, uninitialized use, fatal confirmations, the log location on
//! exit) is emitted through [`tracing`] and rendered here.
use tracing_subscriber::EnvFilter;

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits activelog-style
/// console output.
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
        let level = *event.metadata().level();

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let msg = &extractor.message;
        let ansi = writer.has_ansi_escapes();

        match level {
            tracing::Level::ERROR if ansi => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            tracing::Level::ERROR => writeln!(writer, "ERROR {msg}"),
            tracing::Level::WARN if ansi => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            tracing::Level::WARN => writeln!(writer, "WARN  {msg}"),
            tracing::Level::INFO => writeln!(writer, "  {msg}"),
            _ if ansi => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
            _ => writeln!(writer, "  {msg}"),
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout. `RUST_LOG`
/// overrides the level chosen by `verbose`. Must be called once at program
/// startup, before any logging.
pub fn init_subscriber(verbose: bool) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(make_writer)
        .with_filter(filter);

    tracing_subscriber::registry().with(console_layer).init();
}
