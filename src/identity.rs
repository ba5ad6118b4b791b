//! Verification of bearer credentials against the external identity
//! provider. The provider owns the auth protocol; this module only sends
//! the token for lookup and maps the outcome onto the error taxonomy.

use crate::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;

/// The (id, email, name) tuple produced by successful credential
/// verification, trusted for all subsequent authorization and
/// attribution.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
}

impl VerifiedIdentity {
    /// Display name, falling back to the local part of the email when
    /// the provider supplies none.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or(&self.email)
                .to_string(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a bearer token, returning the decoded identity or a
    /// Forbidden error when the provider rejects it.
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AppError>;
}

/// Verifier backed by the identity toolkit lookup endpoint.
pub struct HttpIdentityVerifier {
    http: reqwest::Client,
    lookup_url: String,
    api_key: String,
}

impl HttpIdentityVerifier {
    pub fn new(lookup_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            lookup_url,
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupAccount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupAccount {
    local_id: String,
    #[serde(default)]
    email: String,
    display_name: Option<String>,
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AppError> {
        let response = self
            .http
            .post(format!("{}?key={}", self.lookup_url, self.api_key))
            .json(&serde_json::json!({ "idToken": token }))
            .send()
            .await
            .map_err(|e| AppError::IdentityProvider(format!("lookup request failed: {}", e)))?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "identity provider rejected token");
            return Err(AppError::Forbidden(
                "credential rejected by identity provider".to_string(),
            ));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| AppError::IdentityProvider(format!("malformed lookup response: {}", e)))?;

        let account = body.users.into_iter().next().ok_or_else(|| {
            AppError::Forbidden("credential resolved to no account".to_string())
        })?;

        Ok(VerifiedIdentity {
            uid: account.local_id,
            email: account.email,
            name: account.display_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_provider_name() {
        let identity = VerifiedIdentity {
            uid: "u1".into(),
            email: "ada@example.com".into(),
            name: Some("Ada Lovelace".into()),
        };
        assert_eq!(identity.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_falls_back_to_email_local_part() {
        let identity = VerifiedIdentity {
            uid: "u1".into(),
            email: "ada@example.com".into(),
            name: None,
        };
        assert_eq!(identity.display_name(), "ada");

        let blank_name = VerifiedIdentity {
            uid: "u1".into(),
            email: "grace@example.com".into(),
            name: Some("   ".into()),
        };
        assert_eq!(blank_name.display_name(), "grace");
    }

    #[test]
    fn test_lookup_response_parsing() {
        let raw = serde_json::json!({
            "kind": "identitytoolkit#GetAccountInfoResponse",
            "users": [{
                "localId": "abc123",
                "email": "ada@example.com",
                "displayName": "Ada"
            }]
        });

        let parsed: LookupResponse = serde_json::from_value(raw).unwrap();
        let account = &parsed.users[0];
        assert_eq!(account.local_id, "abc123");
        assert_eq!(account.email, "ada@example.com");
        assert_eq!(account.display_name.as_deref(), Some("Ada"));
    }
}
