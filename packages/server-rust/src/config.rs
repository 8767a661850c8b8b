//! Configuration types for object adapters and logging.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::error::AdapterError;

/// Ice-style string properties, e.g. `"Hello.MaxDispatches" -> "64"`.
pub type Properties = HashMap<String, String>;

/// Configuration of one object adapter and its built-in middleware.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Adapter name; also the prefix of its properties.
    pub name: String,
    /// Maximum number of concurrent dispatches before load shedding. 0 disables the limit.
    /// Values above `Semaphore::MAX_PERMITS` are clamped by the layer.
    pub max_dispatches: usize,
    /// Upper bound for a single dispatch. `None` disables the timeout middleware.
    pub dispatch_timeout: Option<Duration>,
    /// `Ice.Warn.Dispatch` level; see [`LoggerLayer`](crate::middleware::LoggerLayer).
    pub warn_dispatch: u8,
    /// Install the metrics middleware.
    pub metrics: bool,
    /// How long `ObjectAdapter::wait_for_deactivate` waits by default.
    pub drain_timeout: Duration,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            max_dispatches: 0,
            dispatch_timeout: None,
            warn_dispatch: 1,
            metrics: true,
            drain_timeout: Duration::from_secs(30),
        }
    }
}

impl AdapterConfig {
    /// Default configuration for an adapter called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Reads the configuration of adapter `name` from `props`.
    ///
    /// Recognized properties (absent ones keep their defaults):
    /// - `Ice.Warn.Dispatch` -- warning level
    /// - `<name>.MaxDispatches` -- concurrency limit, 0 for none, at most `Semaphore::MAX_PERMITS`
    /// - `<name>.DispatchTimeout` -- milliseconds, 0 for none
    /// - `<name>.Metrics` -- 0 or 1
    /// - `<name>.DrainTimeout` -- milliseconds
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::InvalidProperty` for a value that does not parse.
    pub fn from_properties(name: &str, props: &Properties) -> Result<Self, AdapterError> {
        let mut config = Self::new(name);

        if let Some(level) = parse_property(props, "Ice.Warn.Dispatch")? {
            config.warn_dispatch = level;
        }
        let key = format!("{name}.MaxDispatches");
        if let Some(max) = parse_property::<usize>(props, &key)? {
            if max > Semaphore::MAX_PERMITS {
                return Err(AdapterError::InvalidProperty {
                    value: max.to_string(),
                    key,
                });
            }
            config.max_dispatches = max;
        }
        if let Some(ms) = parse_property::<u64>(props, &format!("{name}.DispatchTimeout"))? {
            config.dispatch_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(flag) = parse_property::<u8>(props, &format!("{name}.Metrics"))? {
            config.metrics = flag != 0;
        }
        if let Some(ms) = parse_property(props, &format!("{name}.DrainTimeout"))? {
            config.drain_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

fn parse_property<T: FromStr>(props: &Properties, key: &str) -> Result<Option<T>, AdapterError> {
    props
        .get(key)
        .map(|raw| {
            raw.trim().parse().map_err(|_| AdapterError::InvalidProperty {
                key: key.to_string(),
                value: raw.clone(),
            })
        })
        .transpose()
}

/// Logging setup consumed by [`init_tracing`](crate::telemetry::init_tracing).
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `"info,icedispatch_server=debug"`.
    pub filter: String,
    /// Emit JSON lines instead of human readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}
