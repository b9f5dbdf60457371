//! Log output for the viewer process.
//!
//! Events go to stderr in the configured [`LogFormat`]. Everything the
//! process logs after start-up runs inside a root `viewer` span naming the
//! application and its version, so JSON lines from several viewer instances
//! sharing one sink can be told apart.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Span, Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, MakeWriter, time::UtcTime};

use atlas_config::{Config, LogFormat};

static SUBSCRIBER_INSTALLED: OnceCell<()> = OnceCell::new();

/// Root span of an initialised viewer process.
#[derive(Debug, Clone)]
pub struct TelemetryHandle {
    span: Span,
}

impl TelemetryHandle {
    /// Span that start-up and bootstrap run in.
    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }
}

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured log filter expression did not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// The tracing subscriber could not be installed.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the stderr subscriber once and opens the `viewer` span.
///
/// Later calls leave the installed subscriber untouched and only open a new
/// span for `config`.
///
/// # Examples
///
/// ```rust
/// use atlas_bootstrap::telemetry;
/// use atlas_config::Config;
///
/// # fn main() -> Result<(), atlas_bootstrap::telemetry::TelemetryError> {
/// let config = Config::default();
/// let handle = telemetry::initialise(&config)?;
/// handle.span().in_scope(|| tracing::info!("inside the viewer span"));
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an unparsable filter and
/// [`TelemetryError::Subscriber`] when another global subscriber is already
/// installed.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    SUBSCRIBER_INSTALLED.get_or_try_init(|| {
        let filter = parse_filter(config)?;
        let subscriber =
            subscriber(config.log_format(), filter, io::stderr, io::stderr().is_terminal());
        tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
    })?;
    Ok(TelemetryHandle {
        span: viewer_span(config),
    })
}

fn viewer_span(config: &Config) -> Span {
    tracing::info_span!(
        "viewer",
        app = %config.app_name(),
        version = env!("CARGO_PKG_VERSION"),
    )
}

fn parse_filter(config: &Config) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(config.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))
}

fn subscriber<W>(
    format: LogFormat,
    filter: EnvFilter,
    writer: W,
    ansi: bool,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_timer(UtcTime::rfc_3339());

    match format {
        // One flat object per event; the innermost span rides along under
        // `span`.
        LogFormat::Json => Box::new(
            builder
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
                .finish(),
        ),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::Value;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().expect("capture mutex poisoned").clone();
            String::from_utf8(bytes)
                .expect("log output is UTF-8")
                .lines()
                .map(str::to_owned)
                .collect()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .expect("capture mutex poisoned")
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(config: &Config, emit: impl FnOnce()) -> Vec<String> {
        let captured = Captured::default();
        let sink = captured.clone();
        let filter = parse_filter(config).expect("valid filter");
        let subscriber = subscriber(config.log_format(), filter, move || sink.clone(), false);
        tracing::subscriber::with_default(subscriber, emit);
        captured.lines()
    }

    #[test]
    fn invalid_filters_are_rejected() {
        let config = Config {
            log_filter: String::from("atlas=["),
            ..Config::default()
        };
        let error = parse_filter(&config).expect_err("filter must be rejected");
        assert!(matches!(error, TelemetryError::Filter(_)));
    }

    #[test]
    fn json_events_carry_the_viewer_span() {
        let config = Config {
            app_name: String::from("Atlas"),
            ..Config::default()
        };

        let lines = capture(&config, || {
            viewer_span(&config).in_scope(|| tracing::info!(target: "atlas_bootstrap", "ready"));
        });

        let [line] = lines.as_slice() else {
            panic!("expected one event, got {lines:?}");
        };
        let event: Value = serde_json::from_str(line).expect("event is JSON");
        assert_eq!(event.get("message"), Some(&Value::from("ready")));
        assert_eq!(event.pointer("/span/name"), Some(&Value::from("viewer")));
        assert_eq!(event.pointer("/span/app"), Some(&Value::from("Atlas")));
        assert_eq!(
            event.pointer("/span/version"),
            Some(&Value::from(env!("CARGO_PKG_VERSION")))
        );
    }

    #[test]
    fn filter_applies_to_captured_output() {
        let config = Config {
            log_filter: String::from("warn"),
            ..Config::default()
        };

        let lines = capture(&config, || {
            tracing::info!("hidden");
            tracing::warn!("shown");
        });

        assert_eq!(lines.len(), 1);
        assert!(lines.iter().all(|line| line.contains("shown")));
    }
}
