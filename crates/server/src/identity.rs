//! Identity Provider Adapter.
//!
//! Divvy never authenticates users itself. Every request carries a bearer
//! token that an external identity provider verifies, yielding the caller's
//! stable id and email; authorization decisions use only that verified
//! identity, never an id supplied in a request body.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

/// The verified caller of a request.
#[derive(Clone, Debug)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub full_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentityError {
    Unauthorized,
    Timeout(String),
    Upstream(String),
}

/// Payload of the provider's userinfo endpoint.
#[derive(Debug, Deserialize)]
struct UserInfo {
    id: String,
    email: String,
    full_name: Option<String>,
}

/// Verifies bearer tokens against the configured provider.
#[derive(Clone, Debug)]
pub enum IdentityProvider {
    /// Userinfo endpoint queried with the caller's token.
    Http {
        http: reqwest::Client,
        userinfo_url: String,
    },
    /// Fixed token table for tests and local development.
    Static(HashMap<String, Identity>),
}

impl IdentityProvider {
    pub fn http(userinfo_url: &str, timeout: Duration) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| IdentityError::Upstream(err.to_string()))?;
        Ok(Self::Http {
            http,
            userinfo_url: userinfo_url.to_string(),
        })
    }

    pub fn fixed(tokens: HashMap<String, Identity>) -> Self {
        Self::Static(tokens)
    }

    /// Resolve a bearer token to the caller's identity.
    pub async fn verify(&self, token: &str) -> Result<Identity, IdentityError> {
        match self {
            Self::Http { http, userinfo_url } => {
                let res = http
                    .get(userinfo_url)
                    .bearer_auth(token)
                    .send()
                    .await
                    .map_err(classify_transport)?;

                let status = res.status();
                if status == reqwest::StatusCode::UNAUTHORIZED
                    || status == reqwest::StatusCode::FORBIDDEN
                {
                    return Err(IdentityError::Unauthorized);
                }
                if !status.is_success() {
                    return Err(IdentityError::Upstream(format!(
                        "identity provider answered {status}"
                    )));
                }

                let info: UserInfo = res.json().await.map_err(classify_transport)?;
                Ok(Identity {
                    user_id: info.id,
                    email: info.email,
                    full_name: info.full_name,
                })
            }
            Self::Static(tokens) => tokens.get(token).cloned().ok_or(IdentityError::Unauthorized),
        }
    }
}

fn classify_transport(err: reqwest::Error) -> IdentityError {
    if err.is_timeout() {
        IdentityError::Timeout("identity provider timed out".to_string())
    } else {
        IdentityError::Upstream(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_provider_resolves_known_tokens_only() {
        let provider = IdentityProvider::fixed(HashMap::from([(
            "tok-1".to_string(),
            Identity {
                user_id: "u1".to_string(),
                email: "u1@x.com".to_string(),
                full_name: None,
            },
        )]));

        let identity = provider.verify("tok-1").await.unwrap();
        assert_eq!(identity.user_id, "u1");

        let err = provider.verify("tok-2").await.unwrap_err();
        assert_eq!(err, IdentityError::Unauthorized);
    }
}
