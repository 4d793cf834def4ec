use async_trait::async_trait;
use awc::http::header;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::AuthError;

/// Profile returned by the provider's userinfo endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Identity {
    pub sub: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// OAuth2 authorization-code login against an external provider
#[async_trait(?Send)]
pub trait IdentityProvider: Send + Sync {
    /// Where to send the browser to start a login
    fn authorize_url(&self, state: &str) -> String;

    /// Trade the callback `code` for the user's identity
    async fn exchange_code(&self, code: &str) -> Result<Identity, AuthError>;

    /// Where to send the browser to end the provider-side session
    fn logout_url(&self) -> String;
}

#[derive(Clone, Debug)]
pub struct OidcConfig {
    /// Base URL, e.g. https://tenant.eu.auth0.com
    pub domain: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub post_logout_url: String,
    pub scope: String,
    pub timeout: Duration,
}

/// Auth0-style endpoints: /authorize, /oauth/token, /userinfo, /v2/logout
pub struct OidcProvider {
    config: OidcConfig,
    base_url: String,
}

#[derive(Serialize)]
struct AuthorizeParams<'a> {
    response_type: &'a str,
    client_id: &'a str,
    redirect_uri: &'a str,
    scope: &'a str,
    state: &'a str,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Serialize)]
struct LogoutParams<'a> {
    #[serde(rename = "returnTo")]
    return_to: &'a str,
    client_id: &'a str,
}

impl OidcProvider {
    pub fn new(config: OidcConfig) -> Self {
        let domain = config.domain.trim_end_matches('/');
        let base_url = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{}", domain)
        };

        Self { config, base_url }
    }

    fn client(&self) -> awc::Client {
        awc::Client::builder().timeout(self.config.timeout).finish()
    }

    fn with_query<T: Serialize>(&self, path: &str, params: &T) -> String {
        // Only &str fields, which always encode
        let query = serde_urlencoded::to_string(params).unwrap_or_default();
        format!("{}{}?{}", self.base_url, path, query)
    }

    async fn fetch_access_token(&self, code: &str) -> Result<String, AuthError> {
        let mut response = self
            .client()
            .post(format!("{}/oauth/token", self.base_url))
            .insert_header((header::ACCEPT, "application/json"))
            .send_form(&TokenRequest {
                grant_type: "authorization_code",
                client_id: &self.config.client_id,
                client_secret: &self.config.client_secret,
                code,
                redirect_uri: &self.config.redirect_url,
            })
            .await
            .map_err(|e| AuthError::Provider(format!("token request: {}", e)))?;

        if response.status().is_client_error() {
            // Expired or replayed code
            return Err(AuthError::Denied(format!("token endpoint answered {}", response.status())));
        }
        if !response.status().is_success() {
            return Err(AuthError::Provider(format!("token endpoint answered {}", response.status())));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("token response: {}", e)))?;

        Ok(token.access_token)
    }

    async fn fetch_identity(&self, access_token: &str) -> Result<Identity, AuthError> {
        let mut response = self
            .client()
            .get(format!("{}/userinfo", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("userinfo request: {}", e)))?;

        if !response.status().is_success() {
            return Err(AuthError::Provider(format!("userinfo endpoint answered {}", response.status())));
        }

        response
            .json::<Identity>()
            .await
            .map_err(|e| AuthError::Provider(format!("userinfo response: {}", e)))
    }
}

#[async_trait(?Send)]
impl IdentityProvider for OidcProvider {
    fn authorize_url(&self, state: &str) -> String {
        self.with_query(
            "/authorize",
            &AuthorizeParams {
                response_type: "code",
                client_id: &self.config.client_id,
                redirect_uri: &self.config.redirect_url,
                scope: &self.config.scope,
                state,
            },
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<Identity, AuthError> {
        let access_token = self.fetch_access_token(code).await?;
        let identity = self.fetch_identity(&access_token).await?;

        tracing::debug!(subject = %identity.sub, "Identity provider confirmed login");
        Ok(identity)
    }

    fn logout_url(&self) -> String {
        self.with_query(
            "/v2/logout",
            &LogoutParams {
                return_to: &self.config.post_logout_url,
                client_id: &self.config.client_id,
            },
        )
    }
}
