use super::{CacheBackend, CacheError};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// NullCache stores nothing, so every lookup is a miss.
/// Selected when claims caching is disabled and each request must be introspected.
#[derive(Clone, Debug, Default)]
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        NullCache
    }
}

#[async_trait]
impl CacheBackend for NullCache {
    async fn set<T: Serialize + Send + Sync>(
        &self,
        _key: &str,
        _value: &T,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        _key: &str,
    ) -> Result<Option<T>, CacheError> {
        Ok(None)
    }

    async fn health_check(&self) -> Result<(), String> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_cache_never_returns_values() {
        let cache = NullCache::new();

        assert!(cache
            .set("claims:abc", &"value", Duration::from_secs(60))
            .await
            .is_ok());
        let result: Option<String> = cache.get("claims:abc").await.unwrap();
        assert!(result.is_none());
        assert!(cache.delete("claims:abc").await.is_ok());
        assert!(cache.health_check().await.is_ok());
    }
}
