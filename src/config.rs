use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_DATA_DIR: &str = ".dashwiz";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub api_debug: bool,
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout: Duration::from_millis(DEFAULT_API_TIMEOUT_MS),
            api_debug: false,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl Config {
    /// Reads configuration from the process environment, loading `.env` first.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Unset or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup("DASHWIZ_API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);

        let api_timeout = lookup("DASHWIZ_API_TIMEOUT")
            .and_then(|ms| ms.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.api_timeout);

        let api_debug = lookup("DASHWIZ_API_DEBUG").as_deref() == Some("true");

        let data_dir = lookup("DASHWIZ_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        Self {
            api_base_url,
            api_timeout,
            api_debug,
            data_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DASHWIZ_API_BASE_URL", "http://model:9000/"),
            ("DASHWIZ_API_TIMEOUT", "1500"),
            ("DASHWIZ_API_DEBUG", "true"),
            ("DASHWIZ_DATA_DIR", "/tmp/dw"),
        ]));
        assert_eq!(config.api_base_url, "http://model:9000");
        assert_eq!(config.api_timeout, Duration::from_millis(1500));
        assert!(config.api_debug);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/dw"));
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("DASHWIZ_API_TIMEOUT", "soon"),
            ("DASHWIZ_API_DEBUG", "yes"),
        ]));
        assert_eq!(config.api_timeout, Duration::from_millis(DEFAULT_API_TIMEOUT_MS));
        assert!(!config.api_debug);
    }
}
