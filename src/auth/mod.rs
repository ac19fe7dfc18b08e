//! Authentication for the provider APIs.

use secrecy::{ExposeSecret, SecretString};

/// How the API key is attached to each request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AuthMethod {
    /// `Authorization: Bearer <key>` (Kie.ai).
    #[default]
    Bearer,
    /// `x-goog-api-key: <key>` header (Gemini).
    GoogleHeader,
    /// `?key=<key>` query parameter (Gemini).
    QueryParam,
}

/// Authentication manager.
pub trait AuthManager: Send + Sync {
    /// Get the authentication header name and value.
    fn get_auth_header(&self) -> Option<(String, String)>;

    /// Get the authentication query parameter.
    fn get_auth_query_param(&self) -> Option<(String, String)>;
}

/// API key authentication manager.
pub struct ApiKeyAuthManager {
    api_key: SecretString,
    auth_method: AuthMethod,
}

impl ApiKeyAuthManager {
    /// Create a new API key auth manager.
    pub fn new(api_key: SecretString, auth_method: AuthMethod) -> Self {
        Self { api_key, auth_method }
    }

    /// Bearer-token manager.
    pub fn bearer(api_key: SecretString) -> Self {
        Self::new(api_key, AuthMethod::Bearer)
    }
}

impl AuthManager for ApiKeyAuthManager {
    fn get_auth_header(&self) -> Option<(String, String)> {
        match self.auth_method {
            AuthMethod::Bearer => Some((
                "Authorization".to_string(),
                format!("Bearer {}", self.api_key.expose_secret()),
            )),
            AuthMethod::GoogleHeader => Some((
                "x-goog-api-key".to_string(),
                self.api_key.expose_secret().to_string(),
            )),
            AuthMethod::QueryParam => None,
        }
    }

    fn get_auth_query_param(&self) -> Option<(String, String)> {
        match self.auth_method {
            AuthMethod::QueryParam => Some(("key".to_string(), self.api_key.expose_secret().to_string())),
            AuthMethod::Bearer | AuthMethod::GoogleHeader => None,
        }
    }
}

impl std::fmt::Debug for ApiKeyAuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuthManager")
            .field("api_key", &"[REDACTED]")
            .field("auth_method", &self.auth_method)
            .finish()
    }
}

/// Applies `auth` to a URL and header map.
pub(crate) fn apply(
    auth: &dyn AuthManager,
    url: &mut url::Url,
    headers: &mut std::collections::HashMap<String, String>,
) {
    if let Some((name, value)) = auth.get_auth_header() {
        headers.insert(name, value);
    }
    if let Some((name, value)) = auth.get_auth_query_param() {
        url.query_pairs_mut().append_pair(&name, &value);
    }
}
