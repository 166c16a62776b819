use std::{env, error, fmt, str::FromStr};

use model::selection::Selection;
use serde::{Deserialize, Serialize};

pub const STALE_RESULTS_VAR: &str = "DZR_STALE_RESULTS";
pub const MAILBOX_CAPACITY_VAR: &str = "DZR_MAILBOX_CAPACITY";

/// What happens with an answer whose request has been superseded by a newer
/// one of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StalePolicy {
    /// Drop it and count it as discarded.
    #[default]
    Discard,
    /// Apply it like a fresh answer.
    Apply,
}

impl FromStr for StalePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "discard" => Ok(Self::Discard),
            "apply" => Ok(Self::Apply),
            _ => Err(ConfigError::new(STALE_RESULTS_VAR, s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
}

impl ConfigError {
    fn new<S: Into<String>>(variable: &'static str, value: S) -> Self {
        Self {
            variable,
            value: value.into(),
        }
    }
}

impl error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid value for {}: \"{}\"", self.variable, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub stale_results: StalePolicy,
    pub mailbox_capacity: usize,
    pub initial_selection: Selection,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stale_results: StalePolicy::default(),
            mailbox_capacity: actors::DEFAULT_MAILBOX_CAPACITY,
            initial_selection: Selection::default(),
        }
    }
}

impl SessionConfig {
    /// Reads `DZR_STALE_RESULTS` and `DZR_MAILBOX_CAPACITY`, falling back to
    /// the defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|variable| env::var(variable).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(STALE_RESULTS_VAR) {
            config.stale_results = value.parse()?;
        }
        if let Some(value) = lookup(MAILBOX_CAPACITY_VAR) {
            config.mailbox_capacity = value
                .trim()
                .parse()
                .ok()
                .filter(|capacity| *capacity > 0)
                .ok_or_else(|| ConfigError::new(MAILBOX_CAPACITY_VAR, value.clone()))?;
        }
        Ok(config)
    }
}
