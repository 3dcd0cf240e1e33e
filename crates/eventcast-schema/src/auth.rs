//! Ambient credentials for registry and event stream requests.
//!
//! Credentials are picked up from the process environment, so
//! configuration files never carry secrets.

use reqwest::RequestBuilder;

/// Credential attached to outgoing HTTP requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AmbientCredential {
    /// No authentication.
    #[default]
    Anonymous,
    /// HTTP basic authentication.
    Basic { username: String, password: String },
    /// Bearer token authentication.
    Bearer { token: String },
}

impl AmbientCredential {
    /// Resolve a credential from the environment.
    ///
    /// `EVENTCAST_AUTH_TOKEN` wins over the `EVENTCAST_AUTH_USERNAME` /
    /// `EVENTCAST_AUTH_PASSWORD` pair; with neither set, requests go out
    /// unauthenticated.
    pub fn from_env() -> Self {
        if let Ok(token) = std::env::var("EVENTCAST_AUTH_TOKEN") {
            if !token.is_empty() {
                return AmbientCredential::Bearer { token };
            }
        }

        match (
            std::env::var("EVENTCAST_AUTH_USERNAME"),
            std::env::var("EVENTCAST_AUTH_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) if !username.is_empty() => {
                AmbientCredential::Basic { username, password }
            }
            _ => AmbientCredential::Anonymous,
        }
    }

    /// Apply this credential to a request.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            AmbientCredential::Anonymous => request,
            AmbientCredential::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            AmbientCredential::Bearer { token } => request.bearer_auth(token),
        }
    }
}
