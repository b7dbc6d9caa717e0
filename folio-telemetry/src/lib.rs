//! # folio-telemetry
//!
//! Logging setup for the Folio binaries.
//!
//! Log lines go to stderr, human-readable or JSON, filtered by `RUST_LOG`
//! (default `info`). Optionally a [`StageTimingLayer`] records how long each
//! `folio.*` pipeline span took, independent of the log filter.
//!
//! ```rust,ignore
//! use folio_telemetry::{TelemetryConfig, StageTimings, init_telemetry};
//!
//! let timings = StageTimings::new();
//! let config = TelemetryConfig { timings: Some(timings.clone()), ..Default::default() };
//! init_telemetry(&config)?;
//! // ... run a pipeline ...
//! eprint!("{}", timings.render());
//! ```

pub mod timing;

pub use timing::{STAGE_PREFIX, StageTiming, StageTimingLayer, StageTimings};

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt};

/// Default filter directive when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Options for [`init_telemetry`].
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Emit JSON log lines instead of human-readable ones.
    pub json: bool,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Where to record stage timings, if anywhere.
    pub timings: Option<StageTimings>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { json: false, default_filter: DEFAULT_FILTER.to_string(), timings: None }
    }
}

/// Build the log filter from `RUST_LOG`, falling back to `default_filter`.
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the global subscriber.
///
/// The log filter applies to log output only, so stage timings are recorded
/// even when `RUST_LOG` silences the pipeline's spans.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TryInitError> {
    let fmt_layer = if config.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_target(false).with_writer(std::io::stderr).boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter(&config.default_filter)))
        .with(config.timings.clone().map(StageTimingLayer::new))
        .try_init()
}
