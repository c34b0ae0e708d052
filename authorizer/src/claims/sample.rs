//! Custom claims used by the sample API

use super::{ApiClaims, ClaimsEnrichmentError, CustomClaimsProvider, RequestContext};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role and regions the user may access data for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SampleCustomClaims {
    pub user_id: String,
    pub user_role: String,
    pub user_regions: Vec<String>,
}

/// Grants every user access to Europe and the USA but not to Asia.
///
/// The values are hard coded, a real deployment would look them up from its
/// own user data.
#[derive(Debug, Clone, Default)]
pub struct SampleCustomClaimsProvider;

impl SampleCustomClaimsProvider {
    /// Custom claims for a subject, as returned to the authorization server
    pub fn issue(&self, subject: &str) -> SampleCustomClaims {
        SampleCustomClaims {
            user_id: subject.to_string(),
            user_role: "user".to_string(),
            user_regions: vec!["Europe".to_string(), "USA".to_string()],
        }
    }
}

#[async_trait]
impl CustomClaimsProvider for SampleCustomClaimsProvider {
    type Claims = SampleCustomClaims;

    async fn augment(
        &self,
        _access_token: &str,
        request: RequestContext<'_>,
        claims: &mut ApiClaims<SampleCustomClaims>,
    ) -> Result<(), ClaimsEnrichmentError> {
        let subject = claims.base().subject();
        if subject.is_empty() {
            return Err(ClaimsEnrichmentError::InvalidData(
                "cannot issue custom claims without a subject".to_string(),
            ));
        }

        let issued = self.issue(subject);
        debug!(
            "Issued custom claims for {} {} with role '{}'",
            request.method,
            request.uri.path(),
            issued.user_role
        );
        *claims.custom_mut() = issued;
        Ok(())
    }
}
