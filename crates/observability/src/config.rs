//! Observability configuration, read from the environment.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Filter directives, e.g. `jobkit_jobs=debug,info`. Falls back to `RUST_LOG`.
pub const ENV_FILTER: &str = "JOBKIT_LOG";

/// One of `json`, `pretty`, `compact`.
pub const ENV_FORMAT: &str = "JOBKIT_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObservabilityError {
    #[error("unknown log format '{0}' (expected json, pretty or compact)")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(ObservabilityError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub filter: String,
    pub format: LogFormat,
    pub with_target: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Json,
            with_target: false,
        }
    }
}

impl ObservabilityConfig {
    /// Read `JOBKIT_LOG` (or `RUST_LOG`) and `JOBKIT_LOG_FORMAT`.
    ///
    /// Unset variables keep their defaults; an unknown format is replaced by
    /// JSON. Use [`ObservabilityConfig::try_from_env`] to reject it instead.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`ObservabilityConfig::from_env`], but an unknown format is an
    /// error.
    pub fn try_from_env() -> Result<Self, ObservabilityError> {
        Self::try_from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let filter = Self::filter_from(&lookup);
        let format = lookup(ENV_FORMAT)
            .and_then(|raw| raw.parse::<LogFormat>().ok())
            .unwrap_or_default();
        Self {
            filter,
            format,
            ..Self::default()
        }
    }

    pub(crate) fn try_from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ObservabilityError> {
        let filter = Self::filter_from(&lookup);
        let format = match lookup(ENV_FORMAT) {
            Some(raw) => raw.parse::<LogFormat>()?,
            None => LogFormat::default(),
        };
        Ok(Self {
            filter,
            format,
            ..Self::default()
        })
    }

    fn filter_from(lookup: &impl Fn(&str) -> Option<String>) -> String {
        lookup(ENV_FILTER)
            .or_else(|| lookup("RUST_LOG"))
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }
}
