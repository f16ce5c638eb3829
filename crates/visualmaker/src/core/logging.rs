//! Logging setup
//!
//! The editor logs through `tracing`. Native builds install a
//! `tracing-subscriber` registry; browser builds forward events to the
//! developer console through `tracing-wasm`.
//!
//! # Environment Variables
//!
//! - `VISUALMAKER_LOG_LEVEL`: log level or filter directive
//!   (`trace|debug|info|warn|error|off`, or e.g. `visualmaker::components=debug`)
//! - `VISUALMAKER_LOG_FORMAT`: `compact`, `pretty` or `json`
//! - `RUST_LOG`: standard filter, used when `VISUALMAKER_LOG_LEVEL` is unset
//!
//! # Filtering
//!
//! ```bash
//! # Trace only the render lifecycle
//! RUST_LOG="warn,visualmaker::components::renderer=trace" visualmaker render -i diagram.mmd
//! ```

use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

const LEVEL_VAR: &str = "VISUALMAKER_LOG_LEVEL";
const FORMAT_VAR: &str = "VISUALMAKER_LOG_FORMAT";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single line per event
    #[default]
    Compact,
    /// Multi-line with source locations
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Names accepted by [`LogFormat::from_str`]
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Resolved logging settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Filter directive handed to `EnvFilter`
    pub filter: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// Resolve settings from explicit values, then environment, then defaults
    ///
    /// Explicit arguments win over `VISUALMAKER_LOG_*`, which win over
    /// `RUST_LOG`. The default is `info` in compact format.
    pub fn resolve(level: Option<&str>, format: Option<&str>) -> Result<Self, String> {
        Self::resolve_with(level, format, |key| std::env::var(key).ok())
    }

    fn resolve_with(
        level: Option<&str>,
        format: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let filter = level
            .map(str::to_string)
            .or_else(|| env(LEVEL_VAR))
            .or_else(|| env("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());

        let format = match format.map(str::to_string).or_else(|| env(FORMAT_VAR)) {
            Some(name) => LogFormat::from_str(&name)?,
            None => LogFormat::default(),
        };

        Ok(Self { filter, format })
    }
}

/// Install the global subscriber
///
/// Fails if the format is invalid or a subscriber is already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = LogSettings::resolve(level, format).map_err(|e| format!("Invalid log format: {}", e))?;

    #[cfg(target_arch = "wasm32")]
    {
        // The browser console has its own level filter; tracing-wasm takes
        // no directive, so the resolved filter only matters natively.
        let _ = settings;
        tracing_wasm::set_as_global_default_with_config(tracing_wasm::WASMLayerConfig::default());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let filter = if settings.filter == "off" {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_new(&settings.filter).unwrap_or_else(|_| EnvFilter::new("info"))
        };

        let layer = fmt::Layer::default().with_writer(std::io::stderr);
        match settings.format {
            LogFormat::Compact => Registry::default()
                .with(filter)
                .with(
                    layer
                        .with_target(false)
                        .with_span_events(FmtSpan::NONE)
                        .compact(),
                )
                .try_init()?,
            LogFormat::Pretty => Registry::default()
                .with(filter)
                .with(
                    layer
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?,
            LogFormat::Json => Registry::default()
                .with(filter)
                .with(layer.with_span_events(FmtSpan::CLOSE).json())
                .try_init()?,
        }

        Ok(())
    }
}
