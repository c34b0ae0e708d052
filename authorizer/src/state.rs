use crate::api::classifier::RequestClassifier;
use crate::cache::{Cache, CacheBackend};
use crate::claims::sample::SampleCustomClaimsProvider;
use crate::claims::ClaimsCache;
use crate::config::Settings;
use crate::oauth::{Authorizer, IntrospectionValidator};
use std::sync::Arc;

/// The authorizer used by this API, with its sample custom claims
pub type ApiAuthorizer = Authorizer<SampleCustomClaimsProvider>;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub authorizer: ApiAuthorizer,
    pub(crate) classifier: RequestClassifier,
}

impl AppState {
    /// Builds the state around an already connected claims cache backend
    pub fn with_existing_cache(settings: &Settings, cache: Cache) -> Result<Self, reqwest::Error> {
        let validator = IntrospectionValidator::new(&settings.oauth)?;
        let authorizer = Authorizer::new(
            ClaimsCache::new(cache, settings.oauth.max_claims_cache_secs()),
            Arc::new(validator),
            Arc::new(SampleCustomClaimsProvider),
        );

        Ok(Self {
            settings: Arc::new(settings.clone()),
            authorizer,
            classifier: RequestClassifier::new(&settings.api_base_path),
        })
    }

    /// Check if all components are healthy
    pub async fn health_check(&self) -> Result<(), String> {
        self.authorizer
            .claims_cache()
            .backend()
            .health_check()
            .await
    }

    #[cfg(test)]
    pub fn for_testing(settings: &Settings) -> Self {
        let cache = Cache::InMemory(
            crate::cache::memory::InMemoryCache::new(settings.cache.in_memory.capacity_mib)
                .expect("Failed to create test cache"),
        );
        Self::with_existing_cache(settings, cache).expect("Failed to create test state")
    }
}
