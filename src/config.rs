use std::env;
use std::str::FromStr;
use thiserror::Error;

const COUNT_VAR: &str = "RBTREE_BENCH_COUNT";
const SEED_VAR: &str = "RBTREE_BENCH_SEED";
const DEFAULT_COUNT: usize = 320;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be an unsigned integer, got {value:?}")]
    NotANumber { var: &'static str, value: String },
    #[error("{var} is not valid unicode")]
    NotUnicode { var: &'static str },
}

/// Settings for the insertion benchmark, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Keys inserted into each structure.
    pub count: usize,
    /// Draw random keys from this seed instead of inserting `0..count` in order.
    pub seed: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            count: DEFAULT_COUNT,
            seed: None,
        }
    }
}

impl HarnessConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<String, env::VarError>,
    {
        let count = parse_var(&lookup, COUNT_VAR)?.unwrap_or(DEFAULT_COUNT);
        let seed = parse_var(&lookup, SEED_VAR)?;
        Ok(HarnessConfig { count, seed })
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&'static str) -> Result<String, env::VarError>,
{
    match lookup(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::NotANumber { var, value }),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { var }),
    }
}
