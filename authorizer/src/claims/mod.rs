//! Claims produced by validating an access token.
//!
//! [`ApiClaims`] composes the claims read from the token, the user info
//! claims and a deployment specific custom claims slot. Once composed it is
//! cached and shared with handlers as an immutable `Arc`.

pub mod cache;
pub mod payload;
pub mod provider;
pub mod sample;

use crate::errors::AuthError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use cache::ClaimsCache;
pub use payload::ClaimsPayload;
pub use provider::{ClaimsEnrichmentError, CustomClaimsProvider, RequestContext};

/// Claims read from the access token itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseClaims {
    subject: String,
    scopes: Vec<String>,
    expiry: i64,
}

impl BaseClaims {
    pub fn new(subject: impl Into<String>, scopes: Vec<String>, expiry: i64) -> Self {
        Self {
            subject: subject.into(),
            scopes,
            expiry,
        }
    }

    /// Reads `sub`, `scope` and `exp` from a validated introspection payload
    pub fn from_payload(payload: &ClaimsPayload) -> Result<Self, AuthError> {
        let subject = payload.string_claim("sub")?;
        let scopes = split_scopes(&payload.string_claim("scope")?);
        let expiry = payload.expiration_claim()?;
        Ok(Self::new(subject, scopes, expiry))
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[cfg(test)]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Token expiry in Unix seconds
    pub fn expiry(&self) -> i64 {
        self.expiry
    }

    /// Fails with [`AuthError::InsufficientScope`] unless a granted scope contains `scope`.
    ///
    /// Scopes are matched by containment so that URL shaped scopes such as
    /// `https://api.mycompany.com/investments` satisfy `investments`.
    pub fn verify_scope(&self, scope: &str) -> Result<(), AuthError> {
        if self.scopes.iter().any(|granted| granted.contains(scope)) {
            Ok(())
        } else {
            Err(AuthError::InsufficientScope)
        }
    }
}

fn split_scopes(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

/// Identity attributes about the user behind the token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfoClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserInfoClaims {
    /// Reads the optional user info fields, absent fields stay `None`
    pub fn from_payload(payload: &ClaimsPayload) -> Self {
        Self {
            given_name: payload.optional_string_claim("given_name"),
            family_name: payload.optional_string_claim("family_name"),
            email: payload.optional_string_claim("email"),
        }
    }
}

/// Product specific claims attached to the composed claims.
///
/// Implementations start out empty and are filled in by a
/// [`CustomClaimsProvider`]; they must survive a trip through the cache.
pub trait CustomClaims:
    Default + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> CustomClaims for T where
    T: Default + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// The claims handlers work with: token claims, user info and custom claims
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClaims<C> {
    base: BaseClaims,
    user_info: UserInfoClaims,
    custom: C,
}

impl<C: CustomClaims> ApiClaims<C> {
    /// Claims with the token claims and user info set and empty custom claims
    pub fn new(base: BaseClaims, user_info: UserInfoClaims) -> Self {
        Self {
            base,
            user_info,
            custom: C::default(),
        }
    }

    pub fn base(&self) -> &BaseClaims {
        &self.base
    }

    #[cfg(test)]
    pub fn user_info(&self) -> &UserInfoClaims {
        &self.user_info
    }

    pub fn custom(&self) -> &C {
        &self.custom
    }

    /// Mutable access for the extension point, before the claims are cached
    pub fn custom_mut(&mut self) -> &mut C {
        &mut self.custom
    }

    pub fn verify_scope(&self, scope: &str) -> Result<(), AuthError> {
        self.base.verify_scope(scope)
    }

    /// Converts to the record written to the claims cache
    pub fn export(&self, cached_until: i64) -> CachedClaims<C> {
        CachedClaims {
            subject: self.base.subject.clone(),
            scopes: self.base.scopes.join(" "),
            expiry: self.base.expiry,
            user_info: self.user_info.clone(),
            custom: self.custom.clone(),
            cached_until,
        }
    }
}

/// Serialized form of [`ApiClaims`] held in the claims cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedClaims<C> {
    pub subject: String,
    /// Space separated scopes
    pub scopes: String,
    pub expiry: i64,
    #[serde(flatten)]
    pub user_info: UserInfoClaims,
    pub custom: C,
    /// Unix time after which this record must not be served
    pub cached_until: i64,
}

impl<C: CustomClaims> CachedClaims<C> {
    pub fn import(self) -> ApiClaims<C> {
        ApiClaims {
            base: BaseClaims::new(self.subject, split_scopes(&self.scopes), self.expiry),
            user_info: self.user_info,
            custom: self.custom,
        }
    }
}
