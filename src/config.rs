use anyhow::Context;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub db_url: Option<String>,
    pub app_name: String,
    pub deployment: String,
    pub host: String,
    pub port: u16,
    /// Root directory below which uploaded videos are stored
    pub videos_root: PathBuf,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load from .env file if available
        let db_url = match env::var("DB_URL") {
            Ok(url) => Some(url),
            Err(_) => Some(format!(
                "{}://{}:{}@{}:{}/{}",
                env::var("DB_PREFIX").unwrap_or_else(|_| "postgresql".to_string()),
                env::var("DB_USER").context("DB_USER must be set when DB_URL is not")?,
                env::var("DB_PASSWORD").context("DB_PASSWORD must be set when DB_URL is not")?,
                env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string()),
                env::var("DB_NAME").context("DB_NAME must be set when DB_URL is not")?,
            )),
        };

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let max_upload_mb = env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| "2048".to_string())
            .parse::<usize>()
            .context("MAX_UPLOAD_MB must be a whole number of megabytes")?;
        let max_upload_bytes = upload_limit_bytes(max_upload_mb)?;

        Ok(Config {
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "match-analysis-api".to_string()),
            deployment: env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            videos_root: env::var("VIDEOS_ROOT")
                .map_or_else(|_| PathBuf::from("videos"), PathBuf::from),
            max_upload_bytes,
            db_url,
        })
    }

    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[cfg(test)]
    pub fn for_tests(videos_root: PathBuf) -> Self {
        Config {
            app_name: "match-analysis-api-test".to_string(),
            deployment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            videos_root,
            max_upload_bytes: 16 * 1024 * 1024,
            db_url: Some("sqlite::memory:".to_string()),
        }
    }
}

/// Convert the configured upload limit from megabytes to bytes.
fn upload_limit_bytes(megabytes: usize) -> anyhow::Result<usize> {
    megabytes
        .checked_mul(1024 * 1024)
        .context("MAX_UPLOAD_MB is too large")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_limit_bytes() {
        assert_eq!(upload_limit_bytes(2048).unwrap(), 2048 * 1024 * 1024);
        assert_eq!(upload_limit_bytes(0).unwrap(), 0);
        assert!(upload_limit_bytes(usize::MAX).is_err());
    }

    #[test]
    fn test_bind_address() {
        let mut config = Config::for_tests(PathBuf::from("/tmp/videos"));
        config.host = "0.0.0.0".to_string();
        config.port = 3000;
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_for_tests_uses_given_video_root() {
        let config = Config::for_tests(PathBuf::from("/tmp/videos"));
        assert_eq!(config.videos_root, PathBuf::from("/tmp/videos"));
        assert_eq!(config.db_url.as_deref(), Some("sqlite::memory:"));
    }
}
