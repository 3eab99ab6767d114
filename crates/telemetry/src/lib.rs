//! Tracing pipeline bootstrap for Shelfmark.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shelfmark_kernel::settings::{LogFormat, TelemetrySettings};

/// Initialize the tracing/logging pipeline.
///
/// Honors `RUST_LOG` when set; safe to call more than once (later calls are
/// ignored), which keeps tests that each bootstrap telemetry from panicking.
pub fn init(settings: &TelemetrySettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match settings.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
    };

    if result.is_ok() {
        tracing::info!(format = ?settings.log_format, "telemetry initialized");
    }
}
