//! Tracing bootstrap driven by [`TelemetrySettings`].

use catalog_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter: `RUST_LOG` wins over the configured directives.
pub fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.log_filter).map_err(|err| {
            anyhow::anyhow!("invalid log filter '{}': {}", settings.log_filter, err)
        }),
    }
}

/// Install the global subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = env_filter(settings)?;

    let installed = match settings.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            target: "catalog-telemetry",
            format = ?settings.log_format,
            filter = %settings.log_filter,
            "telemetry initialized"
        );
    }

    Ok(())
}
