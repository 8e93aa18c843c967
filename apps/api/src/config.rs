use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL persistence when set; in-memory records otherwise.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Directory uploaded documents live in. Request paths resolve against it.
    pub document_root: PathBuf,
    /// At most one in-flight analysis per document.
    pub single_flight_analyses: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            document_root: optional_env("DOCUMENT_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
            single_flight_analyses: optional_env("SINGLE_FLIGHT_ANALYSES")
                .map(|v| parse_flag(&v))
                .transpose()
                .context("SINGLE_FLIGHT_ANALYSES must be true or false")?
                .unwrap_or(true),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("invalid boolean '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag(" 1 ").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
