use crate::error::{Result, StudioError};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SERVICE_URL: &str = "https://image.pollinations.ai";
pub const DEFAULT_PACING_MS: u64 = 800;
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 3000;
pub const DEFAULT_PREFERENCES_PATH: &str = "pixgen-preferences.json";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            base_url: DEFAULT_SERVICE_URL.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let base_url = env::var("PIXGEN_SERVICE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());

        ServiceConfig { base_url }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The base URL must be an http(s) address with a host.
    pub fn validate(&self) -> Result<()> {
        let host = self
            .base_url
            .strip_prefix("https://")
            .or_else(|| self.base_url.strip_prefix("http://"))
            .unwrap_or_default();

        if host.trim_matches('/').is_empty() || host.contains(char::is_whitespace) {
            return Err(StudioError::ConfigError(format!(
                "image service URL must be an http(s) address, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }
}

fn env_millis(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring {}={:?}, using {}ms", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub service: ServiceConfig,
    /// Delay inserted before a finished batch is published.
    pub pacing_delay: Duration,
    /// How long info and success notifications stay visible.
    pub notification_ttl: Duration,
    pub download_dir: PathBuf,
    pub preferences_path: PathBuf,
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            service: ServiceConfig::default(),
            pacing_delay: Duration::from_millis(DEFAULT_PACING_MS),
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_TTL_MS),
            download_dir: PathBuf::from("."),
            preferences_path: PathBuf::from(DEFAULT_PREFERENCES_PATH),
        }
    }
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let pacing_ms = env_millis("PIXGEN_PACING_MS", DEFAULT_PACING_MS);
        let ttl_ms = env_millis("PIXGEN_NOTIFICATION_TTL_MS", DEFAULT_NOTIFICATION_TTL_MS);
        let download_dir = env::var("PIXGEN_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let preferences_path = env::var("PIXGEN_PREFERENCES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PREFERENCES_PATH));

        StudioConfig {
            service: ServiceConfig::from_env(),
            pacing_delay: Duration::from_millis(pacing_ms),
            notification_ttl: Duration::from_millis(ttl_ms),
            download_dir,
            preferences_path,
        }
    }

    pub fn with_service(mut self, service: ServiceConfig) -> Self {
        self.service = service;
        self
    }

    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_preferences_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.preferences_path = path.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.service.validate()
    }
}
