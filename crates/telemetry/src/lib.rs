//! Tracing subscriber bootstrap driven by [`TelemetrySettings`].

use anyhow::anyhow;
use shelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Pick the filter directive: a non-empty `RUST_LOG` wins over `settings.log_filter`.
pub fn filter_directive<'a>(rust_log: Option<&'a str>, settings: &'a TelemetrySettings) -> &'a str {
    match rust_log {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ => &settings.log_filter,
    }
}

/// Build the level filter from `RUST_LOG` or the configured fallback.
pub fn env_filter(settings: &TelemetrySettings) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(rust_log.as_deref(), settings);

    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(&settings.log_filter))
}

/// Compose the subscriber for `settings.log_format`, writing through `writer`.
pub fn build_subscriber<W>(
    settings: &TelemetrySettings,
    filter: EnvFilter,
    writer: W,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(filter);

    match settings.log_format {
        LogFormat::Pretty => Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(writer),
            ),
        ),
        LogFormat::Json => Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(writer),
            ),
        ),
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// Fails if a global subscriber is already installed.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    build_subscriber(settings, env_filter(settings), std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    tracing::debug!(
        target: "shelf-telemetry",
        format = ?settings.log_format,
        "tracing initialized"
    );
    Ok(())
}
