//! Credential state and token generation.
//!
//! A client authenticates in one of two ways: HTTP Basic credentials (the
//! test environment) or a token obtained by exchanging an API key (the
//! production environment). Basic credentials always win when both are
//! configured.

use crate::{metadata::RequestMetadata, types::TokenResponse, Client, Result};
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// HTTP Basic credentials.
#[derive(Clone)]
pub struct BasicAuth {
    /// The username.
    pub username: String,
    /// The password.
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The credential attached to one outgoing request.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Send HTTP Basic credentials.
    Basic {
        /// The username.
        username: String,
        /// The password.
        password: String,
    },
    /// Send the token verbatim in the `Authorization` header.
    Bearer(String),
    /// Send no `Authorization` header.
    None,
}

impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Basic { username, .. } => write!(f, "Basic({username}, <redacted>)"),
            AuthMode::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            AuthMode::None => f.write_str("None"),
        }
    }
}

/// Credentials owned by a single client.
///
/// The API key and Basic credentials are fixed at construction. The token
/// is read by every request and replaced by token generation, so it sits
/// behind a readers-writer lock.
pub struct Credentials {
    api_key: Option<String>,
    basic: Option<BasicAuth>,
    token: RwLock<String>,
}

impl Credentials {
    pub(crate) fn new(api_key: Option<String>, basic: Option<BasicAuth>, token: Option<String>) -> Self {
        Self {
            api_key,
            basic,
            token: RwLock::new(token.unwrap_or_default()),
        }
    }

    /// Replaces the current token.
    ///
    /// Requests started after this returns send the new token.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        // The critical section is a plain assignment, so a poisoned lock still holds a valid value.
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Returns the latest token, or an empty string if none was set.
    pub fn current_token(&self) -> String {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolves which credential the next request carries.
    pub fn auth_mode(&self) -> AuthMode {
        if let Some(basic) = &self.basic {
            return AuthMode::Basic {
                username: basic.username.clone(),
                password: basic.password.clone(),
            };
        }

        let token = self.current_token();
        if token.is_empty() {
            AuthMode::None
        } else {
            AuthMode::Bearer(token)
        }
    }

    pub(crate) fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("basic", &self.basic)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Client {
    /// Exchanges the configured API key for a token and stores it.
    ///
    /// The request itself carries no credentials. On success every request
    /// started afterwards on this client (and its clones) sends the new
    /// token. On failure the previous token is left in place.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kap::Client;
    ///
    /// # async fn example() -> Result<(), kap::Error> {
    /// let client = Client::builder()
    ///     .api_key("my-api-key")
    ///     .base_url("https://apigw.mkk.com.tr")?
    ///     .build()?;
    ///
    /// let token = client.generate_token().await?;
    /// println!("token has {} characters", token.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn generate_token(&self) -> Result<String> {
        let api_key = self.credentials().api_key().unwrap_or_default();
        let metadata = RequestMetadata::new("/auth/generateToken")
            .with_query_param("apiKey", api_key)
            .unauthenticated();

        let response = self.get::<TokenResponse>(metadata).await?;
        let token = response.data.token;

        self.set_token(token.clone());
        tracing::info!("Generated new API token");

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn basic() -> BasicAuth {
        BasicAuth {
            username: "user".to_string(),
            password: "pass".to_string(),
        }
    }

    #[test]
    fn no_credentials_means_no_auth() {
        let credentials = Credentials::new(None, None, None);
        assert_eq!(credentials.auth_mode(), AuthMode::None);
        assert_eq!(credentials.current_token(), "");
    }

    #[test]
    fn token_is_used_as_bearer() {
        let credentials = Credentials::new(None, None, Some("abc".to_string()));
        assert_eq!(credentials.auth_mode(), AuthMode::Bearer("abc".to_string()));
    }

    #[test]
    fn basic_wins_over_token() {
        let credentials = Credentials::new(None, Some(basic()), Some("abc".to_string()));
        credentials.set_token("newer");

        assert_eq!(
            credentials.auth_mode(),
            AuthMode::Basic {
                username: "user".to_string(),
                password: "pass".to_string(),
            }
        );
    }

    #[test]
    fn set_token_is_visible_to_later_reads() {
        let credentials = Credentials::new(None, None, Some("old".to_string()));
        credentials.set_token("new");
        assert_eq!(credentials.current_token(), "new");
        assert_eq!(credentials.auth_mode(), AuthMode::Bearer("new".to_string()));
    }

    #[test]
    fn concurrent_readers_never_see_torn_tokens() {
        let credentials = Arc::new(Credentials::new(None, None, Some("token-0".to_string())));

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let credentials = Arc::clone(&credentials);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        let token = credentials.current_token();
                        assert!(token.starts_with("token-"), "unexpected token {token}");
                    }
                })
            })
            .collect();

        for i in 1..=100 {
            credentials.set_token(format!("token-{i}"));
        }

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(credentials.current_token(), "token-100");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let credentials = Credentials::new(Some("key".to_string()), Some(basic()), Some("tok".to_string()));
        let debug = format!("{credentials:?} {:?}", credentials.auth_mode());

        assert!(!debug.contains("pass\""));
        assert!(!debug.contains("tok\""));
        assert!(!debug.contains("key\""));
        assert!(debug.contains("<redacted>"));
    }
}
