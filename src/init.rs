use crate::console::{ConsoleOptions, ConsoleRenderer, DEFAULT_TIME_FORMAT};
use crate::console_handler::ConsoleHandler;
use crate::env::{
    parse_flag, LOG_HANDLER_COLOR_ENV, LOG_HANDLER_LEVEL_ENV, LOG_HANDLER_PREFIX_ENV,
    LOG_HANDLER_SOURCE_ENV, LOG_HANDLER_TIMESTAMP_ENV,
};
use crate::layer::HandlerLayer;
use crate::level::{Level, LevelParseError};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the console handler stack.
///
/// **Fields**
/// - `min_level`: records below this level are dropped.
/// - `prefix`: display prefix printed before each message.
/// - `add_source`: attach `source=file:line` from the event callsite.
/// - `span_groups`: qualify keys with the names of enclosing spans.
/// - `report_timestamp`: print a local timestamp on every line.
/// - `colors`: style output with ANSI colors.
#[derive(Clone, Debug)]
pub struct HandlerConfig {
    pub min_level: Level,
    pub prefix: String,
    pub add_source: bool,
    pub span_groups: bool,
    pub report_timestamp: bool,
    pub colors: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            min_level: Level::INFO,
            prefix: String::new(),
            add_source: true,
            span_groups: true,
            report_timestamp: false,
            colors: console::colors_enabled_stderr(),
        }
    }
}

/// Error returned when configuration values cannot be interpreted.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid level in {var}: {source}")]
    InvalidLevel {
        var: &'static str,
        #[source]
        source: LevelParseError,
    },

    #[error("invalid boolean in {var}: {value:?}")]
    InvalidFlag { var: &'static str, value: String },
}

/// Error returned when installing the global subscriber.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("global tracing subscriber already set: {0}")]
    AlreadySet(#[from] tracing::subscriber::SetGlobalDefaultError),
}

impl HandlerConfig {
    /// Build a config from the `LOG_HANDLER_*` environment variables,
    /// falling back to [`HandlerConfig::default`] for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(LOG_HANDLER_LEVEL_ENV) {
            config.min_level = raw.parse::<Level>().map_err(|source| ConfigError::InvalidLevel {
                var: LOG_HANDLER_LEVEL_ENV,
                source,
            })?;
        }
        if let Some(prefix) = lookup(LOG_HANDLER_PREFIX_ENV) {
            config.prefix = prefix;
        }
        if let Some(flag) = read_flag(&lookup, LOG_HANDLER_SOURCE_ENV)? {
            config.add_source = flag;
        }
        if let Some(flag) = read_flag(&lookup, LOG_HANDLER_TIMESTAMP_ENV)? {
            config.report_timestamp = flag;
        }
        if let Some(flag) = read_flag(&lookup, LOG_HANDLER_COLOR_ENV)? {
            config.colors = flag;
        }

        Ok(config)
    }

    fn console_options(&self) -> ConsoleOptions {
        ConsoleOptions {
            prefix: self.prefix.clone(),
            report_timestamp: self.report_timestamp,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            colors: self.colors,
        }
    }
}

fn read_flag<F>(lookup: &F, var: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => parse_flag(&value)
            .map(Some)
            .ok_or(ConfigError::InvalidFlag { var, value }),
    }
}

/// Build a [`HandlerLayer`] that renders to stderr according to `config`.
pub fn build_layer(config: &HandlerConfig) -> HandlerLayer {
    let renderer = Arc::new(ConsoleRenderer::stderr(config.console_options()));
    let handler = ConsoleHandler::new(renderer, config.min_level);
    HandlerLayer::new(Arc::new(handler))
        .with_source(config.add_source)
        .with_span_groups(config.span_groups)
}

/// Install a [`Registry`] combined with a console [`HandlerLayer`] as the
/// global default subscriber.
///
/// **Returns**
/// - `Ok(())` once every `tracing` event in the process goes through the
///   handler.
/// - `Err(InitError::AlreadySet)` if another global subscriber exists.
pub fn init_tracing_with_config(config: HandlerConfig) -> Result<(), InitError> {
    let subscriber = Registry::default().with(build_layer(&config));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Initialize tracing with defaults, a minimum level and a display prefix.
///
/// Equivalent to [`init_tracing_with_config`] with
/// [`HandlerConfig::default`] and the given fields overridden.
pub fn init_tracing(min_level: Level, prefix: impl Into<String>) -> Result<(), InitError> {
    init_tracing_with_config(HandlerConfig {
        min_level,
        prefix: prefix.into(),
        ..HandlerConfig::default()
    })
}
