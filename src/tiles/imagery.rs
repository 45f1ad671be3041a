//! The imagery collaborator consumed by the map control.
//!
//! Tile fetching and caching live outside this crate. The control only talks
//! to an [`ImageryService`] handle injected at construction; configuration
//! calls are forwarded as-is and arrival notifications come back through the
//! [`ImageryNotifier`] the service is given on attach.

use crate::{tiles::bridge::ImageryNotifier, MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persistent tile cache location and size budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub directory: PathBuf,
    pub max_size_mb: u64,
}

impl CacheConfig {
    pub fn new(directory: impl Into<PathBuf>, max_size_mb: u64) -> Self {
        Self {
            directory: directory.into(),
            max_size_mb,
        }
    }
}

/// Network proxy used by the imagery service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// Injected handle to the tile fetching service
pub trait ImageryService: Send {
    /// Number of requests that have not completed yet
    fn load_queue_size(&self) -> usize;

    fn set_cache_dir(&mut self, config: CacheConfig) -> Result<()>;

    fn set_proxy(&mut self, config: ProxyConfig) -> Result<()>;

    /// Called once by the control so the service can report arrivals
    fn attach(&mut self, notifier: ImageryNotifier);
}

/// Service used when the host does not provide one; never loads anything
#[derive(Debug, Default)]
pub struct NullImagery {
    notifier: Option<ImageryNotifier>,
}

impl NullImagery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.notifier.is_some()
    }
}

impl ImageryService for NullImagery {
    fn load_queue_size(&self) -> usize {
        0
    }

    fn set_cache_dir(&mut self, config: CacheConfig) -> Result<()> {
        Err(MapError::Imagery(format!(
            "no imagery service configured, cannot cache in {}",
            config.directory.display()
        )))
    }

    fn set_proxy(&mut self, config: ProxyConfig) -> Result<()> {
        Err(MapError::Imagery(format!(
            "no imagery service configured, cannot use proxy {}:{}",
            config.host, config.port
        )))
    }

    fn attach(&mut self, notifier: ImageryNotifier) {
        self.notifier = Some(notifier);
    }
}
