use super::{ApiClaims, CachedClaims, CustomClaims};
use crate::cache::{Cache, CacheBackend};
use chrono::Utc;
use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::marker::PhantomData;
use std::time::Duration;

/// Caches composed claims against a hash of the access token.
///
/// Entries live until the token expires or `max_ttl_secs` has passed,
/// whichever comes first. Backend failures are logged and treated as a miss,
/// so they never fail a request.
pub struct ClaimsCache<C> {
    cache: Cache,
    max_ttl_secs: i64,
    _claims: PhantomData<fn() -> C>,
}

impl<C> Clone for ClaimsCache<C> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            max_ttl_secs: self.max_ttl_secs,
            _claims: PhantomData,
        }
    }
}

/// Cache key for a token, the raw token is never used as a key
pub fn cache_key(access_token: &str) -> String {
    let digest = Sha256::digest(access_token.as_bytes());
    format!("claims:{:x}", digest)
}

/// Seconds to cache claims for, or `None` when the token has already expired
pub fn effective_ttl(token_expiry: i64, now: i64, max_ttl_secs: i64) -> Option<i64> {
    let ttl = (token_expiry - now).min(max_ttl_secs);
    (ttl > 0).then_some(ttl)
}

impl<C: CustomClaims> ClaimsCache<C> {
    pub fn new(cache: Cache, max_ttl_secs: i64) -> Self {
        Self {
            cache,
            max_ttl_secs,
            _claims: PhantomData,
        }
    }

    /// The backend the claims are stored in
    pub fn backend(&self) -> &Cache {
        &self.cache
    }

    /// Returns previously cached claims for the token, if still valid
    pub async fn lookup(&self, access_token: &str) -> Option<ApiClaims<C>> {
        self.lookup_at(access_token, Utc::now().timestamp()).await
    }

    /// Caches the claims until the token expiry, capped at the configured maximum
    pub async fn store(&self, access_token: &str, expiry: i64, claims: &ApiClaims<C>) {
        self.store_at(access_token, expiry, claims, Utc::now().timestamp())
            .await
    }

    async fn lookup_at(&self, access_token: &str, now: i64) -> Option<ApiClaims<C>> {
        let key = cache_key(access_token);

        let cached = match self.cache.get::<CachedClaims<C>>(&key).await {
            Ok(Some(cached)) => cached,
            Ok(None) => {
                debug!("Claims cache miss for key: {}", key);
                return None;
            }
            Err(cache_err) => {
                warn!("Claims cache error for key {}: {}", key, cache_err);
                return None;
            }
        };

        if cached.cached_until <= now {
            debug!("Discarding expired claims for key: {}", key);
            if let Err(e) = self.cache.delete(&key).await {
                warn!("Failed to delete expired claims from cache: {}", e);
            }
            return None;
        }

        debug!("Claims cache hit for key: {}", key);
        Some(cached.import())
    }

    async fn store_at(&self, access_token: &str, expiry: i64, claims: &ApiClaims<C>, now: i64) {
        let key = cache_key(access_token);

        let Some(ttl) = effective_ttl(expiry, now, self.max_ttl_secs) else {
            debug!("Not caching claims for expired token, key: {}", key);
            return;
        };

        let record = claims.export(now + ttl);
        let ttl = Duration::from_secs(ttl.unsigned_abs());
        match self.cache.set(&key, &record, ttl).await {
            Ok(()) => debug!("Cached claims for key {} for {}s", key, ttl.as_secs()),
            Err(cache_err) => warn!("Failed to cache claims for {}: {}", key, cache_err),
        }
    }
}
