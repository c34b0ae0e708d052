use crate::errors::AuthError;
use serde_json::{Map, Value};

/// Fields of an active introspection response, read on demand.
///
/// Every required read goes through this type, so a malformed response from
/// the authorization server surfaces as [`AuthError::MissingClaim`] here.
#[derive(Debug, Clone)]
pub struct ClaimsPayload {
    fields: Map<String, Value>,
}

impl ClaimsPayload {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Reads a required, non-empty string claim
    pub fn string_claim(&self, name: &str) -> Result<String, AuthError> {
        self.optional_string_claim(name)
            .ok_or_else(|| AuthError::MissingClaim(name.to_string()))
    }

    /// Reads a string claim that may be absent; empty strings count as absent
    pub fn optional_string_claim(&self, name: &str) -> Option<String> {
        match self.fields.get(name) {
            Some(Value::String(value)) if !value.is_empty() => Some(value.clone()),
            _ => None,
        }
    }

    /// Reads the `exp` claim as Unix seconds
    pub fn expiration_claim(&self) -> Result<i64, AuthError> {
        self.fields
            .get("exp")
            .and_then(Value::as_i64)
            .filter(|exp| *exp > 0)
            .ok_or_else(|| AuthError::MissingClaim("exp".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> ClaimsPayload {
        match value {
            Value::Object(fields) => ClaimsPayload::new(fields),
            _ => panic!("test payload must be an object"),
        }
    }

    #[test]
    fn test_reads_present_claims() {
        let payload = payload(json!({
            "active": true,
            "sub": "user-1",
            "scope": "openid investments",
            "exp": 1_900_000_000
        }));

        assert_eq!(payload.string_claim("sub").unwrap(), "user-1");
        assert_eq!(payload.string_claim("scope").unwrap(), "openid investments");
        assert_eq!(payload.expiration_claim().unwrap(), 1_900_000_000);
    }

    #[test]
    fn test_missing_or_empty_string_claim() {
        let payload = payload(json!({ "sub": "", "scope": 12 }));

        assert!(matches!(
            payload.string_claim("sub"),
            Err(AuthError::MissingClaim(name)) if name == "sub"
        ));
        assert!(matches!(
            payload.string_claim("scope"),
            Err(AuthError::MissingClaim(name)) if name == "scope"
        ));
        assert!(matches!(
            payload.string_claim("email"),
            Err(AuthError::MissingClaim(_))
        ));
        assert_eq!(payload.optional_string_claim("email"), None);
    }

    #[test]
    fn test_missing_expiration_claim() {
        let payload = payload(json!({ "exp": "tomorrow" }));
        assert!(matches!(
            payload.expiration_claim(),
            Err(AuthError::MissingClaim(name)) if name == "exp"
        ));
    }
}
