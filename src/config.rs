//! Store configuration
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

pub const DB_PATH_VAR: &str = "EXTENSIONS_DB_PATH";
pub const DB_TEMPORARY_VAR: &str = "EXTENSIONS_DB_TEMPORARY";
pub const DB_FLUSH_MS_VAR: &str = "EXTENSIONS_DB_FLUSH_MS";
pub const DB_CACHE_BYTES_VAR: &str = "EXTENSIONS_DB_CACHE_BYTES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    /// Delete the database when the last handle is dropped.
    pub temporary: bool,
    /// Background flush interval. `None` flushes only on demand.
    pub flush_every_ms: Option<u64>,
    pub cache_capacity_bytes: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("extensions.db"),
            temporary: false,
            flush_every_ms: Some(500),
            cache_capacity_bytes: 64 * 1024 * 1024,
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by any `EXTENSIONS_DB_*` variables that are set.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup(DB_PATH_VAR) {
            config.path = PathBuf::from(path);
        }
        if let Some(temporary) = lookup(DB_TEMPORARY_VAR) {
            config.temporary = temporary
                .parse()
                .with_context(|| format!("{DB_TEMPORARY_VAR} must be true or false"))?;
        }
        if let Some(flush) = lookup(DB_FLUSH_MS_VAR) {
            config.flush_every_ms = match flush.as_str() {
                "" | "off" => None,
                ms => Some(
                    ms.parse()
                        .with_context(|| format!("{DB_FLUSH_MS_VAR} must be milliseconds"))?,
                ),
            };
        }
        if let Some(bytes) = lookup(DB_CACHE_BYTES_VAR) {
            config.cache_capacity_bytes = bytes
                .parse()
                .with_context(|| format!("{DB_CACHE_BYTES_VAR} must be a byte count"))?;
        }

        Ok(config)
    }

    pub fn open(&self) -> anyhow::Result<Arc<sled::Db>> {
        let db = sled::Config::new()
            .path(&self.path)
            .temporary(self.temporary)
            .flush_every_ms(self.flush_every_ms)
            .cache_capacity(self.cache_capacity_bytes)
            .open()
            .with_context(|| format!("failed to open store at {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), temporary = self.temporary, "Opened store");

        Ok(Arc::new(db))
    }
}
