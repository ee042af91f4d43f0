//! Default run settings and their environment overrides.

use std::env;
use std::rc::Rc;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::reporter::{ConsoleReporter, Reporter};
use crate::rng::fresh_seed;
use crate::strategy::Strategy;

/// Environment variable overriding the number of examples
pub const EXAMPLES_VAR: &str = "THEORIA_EXAMPLES";
/// Environment variable overriding the shrink-cycle budget
pub const SHRINK_CYCLES_VAR: &str = "THEORIA_SHRINK_CYCLES";
/// Environment variable fixing the seed
pub const SEED_VAR: &str = "THEORIA_SEED";
/// Environment variable overriding the assumption-rejection ceiling
pub const GENERATE_ATTEMPTS_VAR: &str = "THEORIA_GENERATE_ATTEMPTS";

pub const DEFAULT_EXAMPLES: usize = 1000;
pub const DEFAULT_SHRINK_CYCLES: usize = 10000;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid number of examples (must be > 0)
    #[error("Invalid examples count: {0} (must be > 0)")]
    InvalidExamples(usize),
    /// Invalid shrink-cycle budget (must be > 0)
    #[error("Invalid shrink cycles count: {0} (must be > 0)")]
    InvalidShrinkCycles(usize),
    /// Invalid assumption-rejection ceiling (must be > 0)
    #[error("Invalid generate attempts count: {0} (must be > 0)")]
    InvalidGenerateAttempts(usize),
    /// An environment variable could not be parsed
    #[error("Could not parse {variable}={value:?} as an unsigned integer")]
    Unparsable { variable: String, value: String },
}

/// Settings a [`Strategy`] is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Examples tried before a theory is considered to hold
    pub examples: usize,
    /// Shrink candidates evaluated at most per falsification
    pub shrink_cycles: usize,
    /// Fixed seed; a fresh one is drawn per strategy when unset
    pub seed: Option<u64>,
    /// Assumption rejections tolerated per run; ten times `examples` when unset
    pub generate_attempts: Option<usize>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            examples: DEFAULT_EXAMPLES,
            shrink_cycles: DEFAULT_SHRINK_CYCLES,
            seed: None,
            generate_attempts: None,
        }
    }
}

impl Configuration {
    /// Create a configuration with validation
    pub fn new(
        examples: usize,
        shrink_cycles: usize,
        seed: Option<u64>,
        generate_attempts: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            examples,
            shrink_cycles,
            seed,
            generate_attempts,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.examples == 0 {
            return Err(ConfigError::InvalidExamples(self.examples));
        }
        if self.shrink_cycles == 0 {
            return Err(ConfigError::InvalidShrinkCycles(self.shrink_cycles));
        }
        if self.generate_attempts == Some(0) {
            return Err(ConfigError::InvalidGenerateAttempts(0));
        }
        Ok(())
    }

    /// Defaults overridden by the `THEORIA_*` environment variables
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::try_from_lookup(|name| env::var(name).ok())
    }

    /// Like [`Configuration::try_from_env`], but falls back to the defaults
    /// when the environment holds an invalid value
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|error| {
            warn!(%error, "ignoring invalid theoria environment configuration");
            Self::default()
        })
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn try_from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            examples: parse_var(&lookup, EXAMPLES_VAR)?.unwrap_or(defaults.examples),
            shrink_cycles: parse_var(&lookup, SHRINK_CYCLES_VAR)?.unwrap_or(defaults.shrink_cycles),
            seed: parse_var(&lookup, SEED_VAR)?,
            generate_attempts: parse_var(&lookup, GENERATE_ATTEMPTS_VAR)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Strategy reporting to stderr
    pub fn strategy(&self) -> Strategy {
        self.strategy_with_reporter(Rc::new(ConsoleReporter::new()))
    }

    pub fn strategy_with_reporter(&self, reporter: Rc<dyn Reporter>) -> Strategy {
        let strategy = Strategy::new(
            self.seed.unwrap_or_else(fresh_seed),
            self.examples,
            self.shrink_cycles,
            reporter,
        );
        match self.generate_attempts {
            Some(attempts) => strategy.with_generate_attempts(attempts),
            None => strategy,
        }
    }
}

fn parse_var<N, F>(lookup: &F, variable: &str) -> Result<Option<N>, ConfigError>
where
    N: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(variable) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<N>()
            .map(Some)
            .map_err(|_| ConfigError::Unparsable {
                variable: variable.to_string(),
                value,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert_eq!(config.examples, 1000);
        assert_eq!(config.shrink_cycles, 10000);
        assert!(config.seed.is_none());
        assert!(config.generate_attempts.is_none());
    }

    #[test]
    fn test_new_validates() {
        assert_eq!(
            Configuration::new(0, 10, None, None),
            Err(ConfigError::InvalidExamples(0))
        );
        assert_eq!(
            Configuration::new(10, 0, None, None),
            Err(ConfigError::InvalidShrinkCycles(0))
        );
        assert_eq!(
            Configuration::new(10, 10, None, Some(0)),
            Err(ConfigError::InvalidGenerateAttempts(0))
        );
        assert!(Configuration::new(1, 1, Some(3), Some(1)).is_ok());
    }

    #[test]
    fn test_lookup_overrides_defaults() {
        let config = Configuration::try_from_lookup(lookup(&[
            (EXAMPLES_VAR, "250"),
            (SEED_VAR, " 17 "),
            (GENERATE_ATTEMPTS_VAR, "40"),
        ]))
        .unwrap();

        assert_eq!(config.examples, 250);
        assert_eq!(config.shrink_cycles, DEFAULT_SHRINK_CYCLES);
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.generate_attempts, Some(40));
    }

    #[test]
    fn test_lookup_rejects_bad_values() {
        let error = Configuration::try_from_lookup(lookup(&[(SHRINK_CYCLES_VAR, "lots")])).unwrap_err();
        assert_eq!(
            error,
            ConfigError::Unparsable {
                variable: SHRINK_CYCLES_VAR.to_string(),
                value: "lots".to_string(),
            }
        );
        assert_eq!(
            error.to_string(),
            "Could not parse THEORIA_SHRINK_CYCLES=\"lots\" as an unsigned integer"
        );

        let zero = Configuration::try_from_lookup(lookup(&[(EXAMPLES_VAR, "0")])).unwrap_err();
        assert_eq!(zero, ConfigError::InvalidExamples(0));
    }

    #[test]
    fn test_counts_beyond_usize_are_rejected() {
        let too_many = (usize::MAX as u128 + 1).to_string();
        for variable in [EXAMPLES_VAR, SHRINK_CYCLES_VAR, GENERATE_ATTEMPTS_VAR] {
            let error = Configuration::try_from_lookup(lookup(&[(variable, too_many.as_str())])).unwrap_err();
            assert_eq!(
                error,
                ConfigError::Unparsable {
                    variable: variable.to_string(),
                    value: too_many.clone(),
                }
            );
        }

        let most = usize::MAX.to_string();
        let config = Configuration::try_from_lookup(lookup(&[(EXAMPLES_VAR, most.as_str())])).unwrap();
        assert_eq!(config.examples, usize::MAX);
    }

    #[test]
    fn test_strategy_from_configuration() {
        let config = Configuration::new(30, 60, Some(5), Some(7)).unwrap();
        let strategy = config.strategy();
        assert_eq!(strategy.seed(), 5);
        assert_eq!(strategy.examples(), 30);
        assert_eq!(strategy.shrink_cycles(), 60);
        assert_eq!(strategy.generate_attempts(), 7);

        let derived = Configuration::new(30, 60, Some(5), None).unwrap().strategy();
        assert_eq!(derived.generate_attempts(), 300);
    }
}
