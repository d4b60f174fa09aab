// Runtime configuration.
//
// The configuration is resolved once at startup from the process
// environment (optionally seeded from a `.env` file) and handed to every
// operation explicitly. Values that are unset resolve to empty strings; each
// operation checks the ones it needs through the `require_*` accessors.

use crate::error::{Error, Result};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const BASE_URL_VAR: &str = "MEISTERTASK_API_BASE_URL";
pub const LANE_ID_VAR: &str = "LANE_ID";
pub const API_KEY_VAR: &str = "MEISTERTASK_API_KEY";
pub const TIMEOUT_VAR: &str = "MEISTERTASK_TIMEOUT_SECS";

pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct Config {
    base_url: String,
    lane_id: String,
    api_token: String,
    timeout: Duration,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).unwrap_or_default().trim().to_string();

        let base_url = read(BASE_URL_VAR).trim_end_matches('/').to_string();
        let timeout = match read(TIMEOUT_VAR).as_str() {
            "" => DEFAULT_TIMEOUT,
            raw => parse_timeout(raw)?,
        };

        Ok(Config {
            base_url,
            lane_id: read(LANE_ID_VAR),
            api_token: read(API_KEY_VAR),
            timeout,
        })
    }

    pub fn require_base_url(&self) -> Result<&str> {
        non_empty(&self.base_url, BASE_URL_VAR)
    }

    pub fn require_lane_id(&self) -> Result<&str> {
        non_empty(&self.lane_id, LANE_ID_VAR)
    }

    pub fn require_api_token(&self) -> Result<&str> {
        non_empty(&self.api_token, API_KEY_VAR)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn non_empty<'a>(value: &'a str, name: &'static str) -> Result<&'a str> {
    if value.is_empty() {
        Err(Error::MissingVar(name))
    } else {
        Ok(value)
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::InvalidVar {
            name: TIMEOUT_VAR,
            reason: format!("expected a positive number of seconds, got {raw:?}"),
        }),
    }
}

/// Load `KEY=VALUE` pairs from `path` into the process environment when the
/// file exists. Variables already set in the environment win.
pub fn load_env_file(path: &Path) -> Result<bool> {
    if !path.is_file() {
        debug!(path = %path.display(), "no env file");
        return Ok(false);
    }
    dotenvy::from_path(path).map_err(|source| Error::EnvFile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded env file");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn reads_all_values() {
        let cfg = config(&[
            (BASE_URL_VAR, "https://api.example.test/"),
            (LANE_ID_VAR, "42"),
            (API_KEY_VAR, "abc"),
        ])
        .unwrap();
        assert_eq!(cfg.require_base_url().unwrap(), "https://api.example.test");
        assert_eq!(cfg.require_lane_id().unwrap(), "42");
        assert_eq!(cfg.require_api_token().unwrap(), "abc");
        assert_eq!(cfg.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn missing_values_name_the_variable() {
        let cfg = config(&[(BASE_URL_VAR, "https://api.example.test")]).unwrap();
        match cfg.require_api_token() {
            Err(Error::MissingVar(name)) => assert_eq!(name, API_KEY_VAR),
            other => panic!("unexpected {other:?}"),
        }
        assert!(cfg.require_lane_id().unwrap_err().to_string().contains(LANE_ID_VAR));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let cfg = config(&[(LANE_ID_VAR, "   ")]).unwrap();
        assert!(matches!(cfg.require_lane_id(), Err(Error::MissingVar(LANE_ID_VAR))));
    }

    #[test]
    fn timeout_override() {
        let cfg = config(&[(TIMEOUT_VAR, "5")]).unwrap();
        assert_eq!(cfg.timeout(), Duration::from_secs(5));

        assert!(matches!(
            config(&[(TIMEOUT_VAR, "0")]),
            Err(Error::InvalidVar { name: TIMEOUT_VAR, .. })
        ));
        assert!(config(&[(TIMEOUT_VAR, "soon")]).is_err());
    }

    #[test]
    fn absent_env_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!load_env_file(&dir.path().join(".env")).unwrap());
    }

    #[test]
    fn unparseable_env_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "THIS LINE IS NOT VALID").unwrap();
        drop(file);

        assert!(matches!(load_env_file(&path), Err(Error::EnvFile { .. })));
    }
}
