// Telemetry Module
//
// Console logging through tracing-subscriber. The portal has no exporter;
// this only sets up the fmt layer and the level filter.

use serde::Deserialize;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for telemetry
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Enable console output
    pub enable_console: bool,

    /// Log filter directive (e.g. "info", "studentportal_auth=debug").
    /// Falls back to `RUST_LOG`, then "info".
    pub log_filter: Option<String>,

    /// Include the event target in each line
    pub with_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enable_console: true,
            log_filter: None,
            with_target: true,
        }
    }
}

impl TelemetryConfig {
    /// Build the level filter for this configuration
    ///
    /// An unparsable `log_filter` is skipped in favor of the fallbacks;
    /// `init_telemetry` reports it once the subscriber is installed.
    pub fn env_filter(&self) -> EnvFilter {
        self.configured_filter()
            .and_then(|parsed| parsed.ok())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new("info"))
    }

    fn configured_filter(&self) -> Option<Result<EnvFilter, ParseError>> {
        self.log_filter.as_deref().map(EnvFilter::try_new)
    }
}

// ============================================================================
// Initialization
// ============================================================================

/// Install the global tracing subscriber
///
/// Returns `false` when a subscriber was already installed (for example by
/// a test harness); the existing one is kept.
pub fn init_telemetry(config: &TelemetryConfig) -> bool {
    let console_layer = if config.enable_console {
        Some(
            tracing_subscriber::fmt::layer()
                .with_target(config.with_target)
                .with_filter(config.env_filter()),
        )
    } else {
        None
    };

    let installed = tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_ok();

    if installed {
        if let Some(Err(e)) = config.configured_filter() {
            tracing::warn!(
                log_filter = config.log_filter.as_deref().unwrap_or_default(),
                error = %e,
                "Ignoring invalid log filter"
            );
        }
        tracing::debug!(
            filter = config.log_filter.as_deref().unwrap_or("default"),
            "Telemetry initialized"
        );
    }

    installed
}
