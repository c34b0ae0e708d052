use serde::Deserialize;

/// Specifies which backend stores the claims cache
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStore {
    #[default]
    InMemory,
    Redis,
    /// Claims caching disabled, every request is introspected
    #[serde(other)]
    None,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum capacity in MiB (default: 64)
    #[serde(default = "default_in_memory_capacity")]
    pub capacity_mib: usize,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            capacity_mib: default_in_memory_capacity(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RedisCacheConfig {
    /// Redis connection string
    #[serde(default)]
    pub url: String,
}

/// Configuration for the claims cache storage
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CacheConfig {
    /// Cache store type: "in-memory" (default), "redis" or "none"
    #[serde(default)]
    pub store: CacheStore,

    /// In-memory cache specific configuration
    #[serde(default)]
    pub in_memory: InMemoryCacheConfig,

    /// Redis cache specific configuration
    #[serde(default)]
    pub redis: RedisCacheConfig,
}

fn default_in_memory_capacity() -> usize {
    64
}
