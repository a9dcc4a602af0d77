//! Tracing bootstrap for shelfline.

use shelfline_kernel::settings::{LogFormat, TelemetrySettings};

/// Install the global tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(settings: &TelemetrySettings) {
    let installed = match settings.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt().try_init(),
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
