use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a numeric variable does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub decoder_timeout: Duration,
    pub low_confidence_chars: usize,
    /// Remote text-extraction service. PDF/DOCX are decoded in-process when unset.
    pub decoder_url: Option<String>,
    /// JSON file overriding the built-in heuristic tables.
    pub heuristics_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 50 * 1024 * 1024)?,
            decoder_timeout: Duration::from_secs(parse_or(&lookup, "DECODER_TIMEOUT_SECS", 30)?),
            low_confidence_chars: parse_or(&lookup, "LOW_CONFIDENCE_CHARS", 50)?,
            decoder_url: non_empty(lookup("DECODER_URL")),
            heuristics_path: non_empty(lookup("HEURISTICS_PATH")).map(PathBuf::from),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty(lookup(key)) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.max_upload_bytes, 52_428_800);
        assert_eq!(config.decoder_timeout, Duration::from_secs(30));
        assert_eq!(config.low_confidence_chars, 50);
        assert!(config.decoder_url.is_none());
        assert!(config.heuristics_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "9000"),
            ("DECODER_TIMEOUT_SECS", "5"),
            ("DECODER_URL", "http://decoder:7000/decode"),
            ("HEURISTICS_PATH", "/etc/resume/heuristics.json"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.decoder_timeout, Duration::from_secs(5));
        assert_eq!(config.decoder_url.as_deref(), Some("http://decoder:7000/decode"));
        assert_eq!(
            config.heuristics_path,
            Some(PathBuf::from("/etc/resume/heuristics.json"))
        );
    }

    #[test]
    fn test_invalid_number_names_variable() {
        let err = load(&[("MAX_UPLOAD_BYTES", "fifty")]).unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_BYTES"));
    }

    #[test]
    fn test_blank_url_is_unset() {
        assert!(load(&[("DECODER_URL", "  ")]).unwrap().decoder_url.is_none());
    }
}
