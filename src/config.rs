//! Harness settings, with optional overrides from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_EXCERPT_LIMIT, DEFAULT_TIME_LIMIT, EXCERPT_LIMIT_ENV, HALT_ON_ERROR_ENV,
    TIME_LIMIT_ENV,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Wall-clock budget for a single child process
    pub time_limit: Duration,

    /// Stop a batch run at the first failing test
    pub halt_on_error: bool,

    /// Longest string printed before it gets cut with an ellipsis
    pub excerpt_limit: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            time_limit: DEFAULT_TIME_LIMIT,
            halt_on_error: true,
            excerpt_limit: DEFAULT_EXCERPT_LIMIT,
        }
    }
}

impl HarnessConfig {
    /// Defaults overridden by `BLACKBOX_TIME_LIMIT_MS`, `BLACKBOX_HALT_ON_ERROR`
    /// and `BLACKBOX_EXCERPT_LIMIT` when they are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            time_limit: parse_var(&lookup, TIME_LIMIT_ENV)
                .map(Duration::from_millis)
                .unwrap_or(defaults.time_limit),
            halt_on_error: parse_var(&lookup, HALT_ON_ERROR_ENV).unwrap_or(defaults.halt_on_error),
            excerpt_limit: parse_var(&lookup, EXCERPT_LIMIT_ENV).unwrap_or(defaults.excerpt_limit),
        }
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_halt_on_error(mut self, halt_on_error: bool) -> Self {
        self.halt_on_error = halt_on_error;
        self
    }

    pub fn with_excerpt_limit(mut self, excerpt_limit: usize) -> Self {
        self.excerpt_limit = excerpt_limit;
        self
    }
}

fn parse_var<T: FromStr>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}", key, value);
            None
        }
    }
}
