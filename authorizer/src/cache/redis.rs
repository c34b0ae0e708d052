use super::{CacheBackend, CacheError};
use async_trait::async_trait;
use log::error;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// Claims cache stored in Redis, each key written with `SET EX`
#[derive(Clone)]
pub struct RedisCache {
    conn_manager: ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis and verifies the connection with a PING
    pub async fn new(redis_url: &str) -> Result<Self, String> {
        let client = Client::open(redis_url)
            .map_err(|err| format!("Invalid Redis URL '{}': {}", redis_url, err))?;

        let conn_manager = ConnectionManager::new(client)
            .await
            .map_err(|err| format!("Failed to create Redis connection manager: {}", err))?;

        let mut conn = conn_manager.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|err| format!("Failed to ping Redis: {}", err))?;

        Ok(Self { conn_manager })
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let serialized = serde_json::to_string(value)?;
        let mut conn = self.conn_manager.clone();

        // SET EX rejects a zero expiry
        let ttl_secs = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, serialized, ttl_secs)
            .await
            .map_err(|err| {
                error!("Redis error while setting key {}: {}", key, err);
                CacheError::Redis(err.to_string())
            })
    }

    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        key: &str,
    ) -> Result<Option<T>, CacheError> {
        let mut conn = self.conn_manager.clone();

        let stored: Option<String> = conn.get(key).await.map_err(|err| {
            error!("Redis error while getting key {}: {}", key, err);
            CacheError::Redis(err.to_string())
        })?;

        stored
            .map(|value| {
                serde_json::from_str(&value).map_err(|e| CacheError::Deserialization(e.to_string()))
            })
            .transpose()
    }

    async fn health_check(&self) -> Result<(), String> {
        let mut conn = self.conn_manager.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| format!("Redis health check failed: {}", err))
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn_manager.clone();
        conn.del::<_, ()>(key).await.map_err(|err| {
            error!("Redis error while deleting key {}: {}", key, err);
            CacheError::Redis(err.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis_test::server::RedisServer;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        field: String,
    }

    fn get_redis_url(server: &RedisServer) -> String {
        match &server.addr {
            redis::ConnectionAddr::Tcp(host, port) => {
                format!("redis://{}:{}/", host, port)
            }
            _ => format!("redis://127.0.0.1:6379/"),
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_cache_operations() {
        // Start a Redis server for testing
        let server = RedisServer::new();
        let redis_url = get_redis_url(&server);

        // Initialize the cache with the test server
        let cache = RedisCache::new(&redis_url).await.unwrap();

        let data = TestData {
            field: "test".to_string(),
        };

        // Test set and get
        cache
            .set("test_key", &data, Duration::from_secs(1))
            .await
            .unwrap();
        let retrieved: TestData = cache.get("test_key").await.unwrap().unwrap();
        assert_eq!(data, retrieved);

        // Test expiration
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(cache.get::<TestData>("test_key").await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_delete() {
        let server = RedisServer::new();
        let redis_url = get_redis_url(&server);
        let cache = RedisCache::new(&redis_url).await.unwrap();

        let data = TestData {
            field: "doomed".to_string(),
        };
        cache
            .set("delete_key", &data, Duration::from_secs(60))
            .await
            .unwrap();
        cache.delete("delete_key").await.unwrap();

        assert!(cache.get::<TestData>("delete_key").await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_health_check() {
        // Arrange
        let server = RedisServer::new();
        let redis_url = get_redis_url(&server);
        let cache = RedisCache::new(&redis_url).await.unwrap();

        // Act
        let result = cache.health_check().await;

        // Assert
        assert!(result.is_ok(), "health check failed: {:?}", result);
    }
}
