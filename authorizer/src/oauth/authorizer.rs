use super::TokenValidator;
use crate::claims::{
    ApiClaims, BaseClaims, ClaimsCache, CustomClaimsProvider, RequestContext, UserInfoClaims,
};
use crate::errors::AuthError;
use chrono::Utc;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use log::debug;
use std::sync::Arc;

/// Turns the bearer token of a request into composed claims.
///
/// Claims come from the cache when possible. Otherwise the token is
/// introspected, the user info and custom claims are added, and the result
/// is cached until the token expires or the configured maximum passes.
/// Failed validations are never cached.
pub struct Authorizer<P: CustomClaimsProvider> {
    cache: ClaimsCache<P::Claims>,
    validator: Arc<dyn TokenValidator>,
    provider: Arc<P>,
}

impl<P: CustomClaimsProvider> Clone for Authorizer<P> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            validator: Arc::clone(&self.validator),
            provider: Arc::clone(&self.provider),
        }
    }
}

/// Reads the token from an `Authorization: Bearer <token>` header
pub fn read_access_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme == "Bearer" && !token.is_empty() =>
        {
            Some(token)
        }
        _ => None,
    }
}

impl<P: CustomClaimsProvider> Authorizer<P> {
    pub fn new(
        cache: ClaimsCache<P::Claims>,
        validator: Arc<dyn TokenValidator>,
        provider: Arc<P>,
    ) -> Self {
        Self {
            cache,
            validator,
            provider,
        }
    }

    pub fn claims_cache(&self) -> &ClaimsCache<P::Claims> {
        &self.cache
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn authorize(
        &self,
        request: RequestContext<'_>,
    ) -> Result<Arc<ApiClaims<P::Claims>>, AuthError> {
        let access_token = read_access_token(request.headers).ok_or_else(AuthError::missing_token)?;

        if let Some(claims) = self.cache.lookup(access_token).await {
            return Ok(Arc::new(claims));
        }

        let payload = self.validator.validate(access_token).await?;

        let base = BaseClaims::from_payload(&payload)?;
        if base.expiry() <= Utc::now().timestamp() {
            debug!("Introspection returned an already expired token");
            return Err(AuthError::token_expired());
        }
        let mut claims = ApiClaims::new(base, UserInfoClaims::from_payload(&payload));

        self.provider
            .augment(access_token, request, &mut claims)
            .await?;

        let expiry = claims.base().expiry();
        self.cache.store(access_token, expiry, &claims).await;
        debug!("Authorized subject {}", claims.base().subject());
        Ok(Arc::new(claims))
    }
}
