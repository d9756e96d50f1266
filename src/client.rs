//! KAP API client and request executor.
//!
//! The [`Client`] type is the main entry point for talking to the platform.
//! Use [`ClientBuilder`] to configure and create clients.

use crate::{
    auth::{AuthMode, BasicAuth, Credentials},
    context::RequestContext,
    download::Download,
    error::{classify, RequestError, RequestFailure},
    metadata::RequestMetadata,
    Error, Response, Result,
};
use http::{header, HeaderValue, Method};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

/// The KAP test environment base URL.
pub const DEFAULT_BASE_URL: &str = "https://apigwdev.mkk.com.tr";

/// The default network timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A client for the KAP REST API.
///
/// Clients are cheap to clone; clones share the connection pool and the
/// credential state, so a token generated through one clone is used by all
/// of them. Separately built clients share nothing.
///
/// # Examples
///
/// ```no_run
/// use kap::Client;
///
/// # async fn example() -> Result<(), kap::Error> {
/// // Production: exchange an API key for a token.
/// let client = Client::builder()
///     .api_key("my-api-key")
///     .base_url("https://apigw.mkk.com.tr")?
///     .build()?;
/// client.generate_token().await?;
///
/// let index = client.last_disclosure_index().await?;
/// println!("latest disclosure: {}", index);
///
/// // Test environment: Basic credentials on every request.
/// let test_client = Client::builder().basic_auth("user", "pass").build()?;
/// let members = test_client.members().await?;
/// println!("{} members", members.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
    context: RequestContext,
}

#[derive(Debug)]
struct ClientInner {
    http_client: reqwest::Client,
    base_url: Url,
    timeout: Option<Duration>,
    credentials: Credentials,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The credential state shared by this client and its clones.
    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    /// Replaces the token sent with subsequent requests.
    pub fn set_token(&self, token: impl Into<String>) {
        self.inner.credentials.set_token(token);
    }

    /// Returns the token currently sent with requests.
    pub fn token(&self) -> String {
        self.inner.credentials.current_token()
    }

    /// Returns a handle whose requests fail once `token` is cancelled.
    ///
    /// The handle shares connections and credentials with `self`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kap::{CancellationToken, Client};
    ///
    /// # async fn example() -> Result<(), kap::Error> {
    /// let client = Client::builder().basic_auth("user", "pass").build()?;
    /// let token = CancellationToken::new();
    ///
    /// let scoped = client.with_cancellation(token.clone());
    /// tokio::spawn(async move { scoped.members().await });
    ///
    /// token.cancel();
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_cancellation(&self, token: CancellationToken) -> Client {
        self.with_context(self.context.clone().with_cancellation(token))
    }

    /// Returns a handle whose requests fail if still running after `timeout`.
    ///
    /// The deadline is fixed when this is called, not when each request starts.
    pub fn with_deadline(&self, timeout: Duration) -> Client {
        self.with_deadline_at(tokio::time::Instant::now() + timeout)
    }

    /// Returns a handle whose requests fail if still running at `deadline`.
    pub fn with_deadline_at(&self, deadline: tokio::time::Instant) -> Client {
        self.with_context(self.context.clone().with_deadline(deadline))
    }

    /// Returns a handle that applies `context` to every request.
    pub fn with_context(&self, context: RequestContext) -> Client {
        Client {
            inner: Arc::clone(&self.inner),
            context,
        }
    }

    /// Issues a GET request and decodes the JSON body of a 2xx response.
    ///
    /// Non-2xx responses are classified into an [`Error::Api`] or, when the
    /// body is not a platform error body, an [`Error::Request`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kap::{metadata::RequestMetadata, Client};
    ///
    /// # async fn example() -> Result<(), kap::Error> {
    /// let client = Client::builder().basic_auth("user", "pass").build()?;
    ///
    /// let metadata = RequestMetadata::new("/api/vyk/caEventStatus")
    ///     .with_query_param("processRefId", "12345");
    /// let raw = client.get::<serde_json::Value>(metadata).await?;
    /// println!("{}", raw.data);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get<Res>(&self, metadata: RequestMetadata) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let start_time = Instant::now();
        let response = self.execute_request(&metadata).await?;
        let response = self.check_status(response, &metadata).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = self
            .context
            .guard(async { response.bytes().await.map_err(RequestFailure::ReadBody) })
            .await
            .map_err(|e| request_error(&metadata, e))?;
        let latency = start_time.elapsed();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            path = %metadata.path,
            "Received HTTP response"
        );

        match serde_json::from_slice::<Res>(&body) {
            Ok(data) => Ok(Response::new(data, status, headers, latency)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %metadata.path,
                    raw_response = %String::from_utf8_lossy(&body),
                    "Failed to deserialize response"
                );
                Err(request_error(&metadata, RequestFailure::Decode(e)))
            }
        }
    }

    /// Issues a GET request and hands back the open body of a 2xx response.
    ///
    /// The body is never decoded. The returned [`Download`] carries the
    /// `Content-Disposition` header verbatim; dropping it releases the
    /// connection.
    pub async fn get_raw(&self, metadata: RequestMetadata) -> Result<Download> {
        let response = self.execute_request(&metadata).await?;
        let response = self.check_status(response, &metadata).await?;

        tracing::info!(
            status = response.status().as_u16(),
            path = %metadata.path,
            "Received raw HTTP response"
        );

        Ok(Download::new(response, metadata.path, self.context.clone()))
    }

    /// Builds and sends one GET request.
    async fn execute_request(&self, metadata: &RequestMetadata) -> Result<reqwest::Response> {
        let url = self.request_url(metadata)?;

        tracing::debug!(
            method = %Method::GET,
            path = %metadata.path,
            query = %redacted_query(metadata),
            "Executing HTTP request"
        );

        let mut request = self
            .inner
            .http_client
            .get(url)
            .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if metadata.authenticated {
            match self.inner.credentials.auth_mode() {
                AuthMode::Basic { username, password } => {
                    request = request.basic_auth(username, Some(password));
                }
                AuthMode::Bearer(token) => {
                    let mut value = HeaderValue::from_str(&token)
                        .map_err(|e| request_error(metadata, RequestFailure::InvalidHeader(e)))?;
                    value.set_sensitive(true);
                    request = request.header(header::AUTHORIZATION, value);
                }
                AuthMode::None => {}
            }
        }

        let response = self
            .context
            .guard(async { request.send().await.map_err(RequestFailure::Transport) })
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, path = %metadata.path, "Request failed");
                request_error(metadata, e)
            })?;

        Ok(response)
    }

    /// Passes 2xx responses through and classifies everything else.
    async fn check_status(
        &self,
        response: reqwest::Response,
        metadata: &RequestMetadata,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw_response = self
            .context
            .guard(async { response.text().await.map_err(RequestFailure::ReadBody) })
            .await
            .map_err(|e| request_error(metadata, e))?;

        if status.is_client_error() {
            tracing::error!(
                status = status.as_u16(),
                path = %metadata.path,
                response = %raw_response,
                "Client error (4xx)"
            );
        } else if status.is_server_error() {
            tracing::warn!(
                status = status.as_u16(),
                path = %metadata.path,
                response = %raw_response,
                "Server error (5xx)"
            );
        }

        Err(classify(status, &raw_response, &Method::GET, &metadata.path))
    }

    /// Joins the base URL, path and query string.
    fn request_url(&self, metadata: &RequestMetadata) -> Result<Url> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{}{}", base, metadata.path))
            .map_err(|e| request_error(metadata, RequestFailure::InvalidUrl(e)))?;

        if !metadata.query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(&metadata.query_params);
        }

        Ok(url)
    }
}

fn request_error(metadata: &RequestMetadata, failure: RequestFailure) -> Error {
    Error::Request(RequestError::new(Method::GET, metadata.path.clone(), failure))
}

/// Query string for logs, with the API key masked.
fn redacted_query(metadata: &RequestMetadata) -> String {
    metadata
        .query_params
        .iter()
        .map(|(key, value)| {
            if key == "apiKey" {
                format!("{key}=<redacted>")
            } else {
                format!("{key}={value}")
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use kap::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), kap::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://apigw.mkk.com.tr")?
///     .timeout(Duration::from_secs(10))
///     .token("previously-issued-token")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
    api_key: Option<String>,
    token: Option<String>,
    basic_auth: Option<BasicAuth>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
            http_client: None,
            api_key: None,
            token: None,
            basic_auth: None,
        }
    }

    /// Creates a builder seeded from `MKK_*` environment variables.
    ///
    /// Reads `MKK_API_KEY`, `MKK_BASE_URL`, `MKK_TOKEN`, and the pair
    /// `MKK_USERNAME`/`MKK_PASSWORD`. Unset or empty variables are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `MKK_BASE_URL` is not a valid URL.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let mut builder = Self::new();
        if let Some(api_key) = var("MKK_API_KEY") {
            builder = builder.api_key(api_key);
        }
        if let Some(base_url) = var("MKK_BASE_URL") {
            builder = builder.base_url(base_url)?;
        }
        if let Some(token) = var("MKK_TOKEN") {
            builder = builder.token(token);
        }
        if let (Some(username), Some(password)) = (var("MKK_USERNAME"), var("MKK_PASSWORD")) {
            builder = builder.basic_auth(username, password);
        }
        Ok(builder)
    }

    /// Sets the base URL for all requests. Defaults to [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(url.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid base URL: {}", e)))?;
        self.base_url = Some(url);
        Ok(self)
    }

    /// Sets the network timeout. Defaults to [`DEFAULT_TIMEOUT`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the HTTP transport.
    ///
    /// The transport's own timeout is kept unless [`timeout`](Self::timeout)
    /// is also set, in which case it is applied to every request.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the API key exchanged by [`Client::generate_token`].
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets a previously issued token, skipping [`Client::generate_token`].
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sends HTTP Basic credentials with every request.
    ///
    /// Basic credentials take precedence over any token.
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the default base URL cannot be parsed or the
    /// HTTP transport cannot be constructed.
    pub fn build(self) -> Result<Client> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| Error::ConfigurationError(format!("Invalid base URL: {}", e)))?,
        };

        if self.basic_auth.is_some() && self.token.is_some() {
            tracing::warn!("Both Basic credentials and a token are configured; Basic credentials take precedence");
        }

        let (http_client, timeout) = match self.http_client {
            Some(client) => (client, self.timeout),
            None => {
                let client = reqwest::Client::builder()
                    .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
                    .build()
                    .map_err(|e| {
                        Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
                    })?;
                (client, None)
            }
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                timeout,
                credentials: Credentials::new(self.api_key, self.basic_auth, self.token),
            }),
            context: RequestContext::default(),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn metadata(path: &str) -> RequestMetadata {
        RequestMetadata::new(path)
    }

    #[test]
    fn default_base_url_is_the_test_environment() {
        let client = Client::builder().build().unwrap();
        assert_eq!(client.base_url().as_str(), "https://apigwdev.mkk.com.tr/");
    }

    #[test]
    fn invalid_base_url_is_a_configuration_error() {
        let result = Client::builder().base_url("not a url");
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }

    #[test]
    fn request_url_keeps_base_path_prefix() {
        let client = Client::builder()
            .base_url("https://proxy.example.com/kap/")
            .unwrap()
            .build()
            .unwrap();

        let url = client
            .request_url(&metadata("/api/vyk/members").with_query_param("a", "1 2"))
            .unwrap();
        assert_eq!(url.as_str(), "https://proxy.example.com/kap/api/vyk/members?a=1+2");
    }

    #[test]
    fn request_url_without_query_has_no_question_mark() {
        let client = Client::builder().build().unwrap();
        let url = client.request_url(&metadata("/api/vyk/members")).unwrap();
        assert_eq!(url.as_str(), "https://apigwdev.mkk.com.tr/api/vyk/members");
    }

    #[test]
    fn malformed_url_is_a_request_error() {
        let client = Client::builder().build().unwrap();
        let result = client.request_url(&metadata(":bad host/x"));

        match result {
            Err(Error::Request(RequestError {
                path,
                source: RequestFailure::InvalidUrl(_),
                ..
            })) => assert_eq!(path, ":bad host/x"),
            other => panic!("expected InvalidUrl, got {other:?}"),
        }
    }

    #[test]
    fn api_key_is_redacted_from_logged_query() {
        let metadata = metadata("/auth/generateToken")
            .with_query_param("apiKey", "secret")
            .with_query_param("x", "1");
        assert_eq!(redacted_query(&metadata), "apiKey=<redacted>&x=1");
    }

    #[test]
    fn from_env_reads_all_settings() {
        let vars: HashMap<&str, &str> = [
            ("MKK_API_KEY", "key"),
            ("MKK_BASE_URL", "https://apigw.mkk.com.tr"),
            ("MKK_TOKEN", "tok"),
            ("MKK_USERNAME", "user"),
            ("MKK_PASSWORD", "pass"),
        ]
        .into_iter()
        .collect();

        let client = ClientBuilder::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "https://apigw.mkk.com.tr/");
        assert_eq!(client.credentials().api_key(), Some("key"));
        assert_eq!(client.token(), "tok");
        assert!(matches!(client.credentials().auth_mode(), AuthMode::Basic { .. }));
    }

    #[test]
    fn from_env_ignores_empty_and_partial_values() {
        let vars: HashMap<&str, &str> = [("MKK_TOKEN", ""), ("MKK_USERNAME", "user")]
            .into_iter()
            .collect();

        let client = ClientBuilder::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(client.credentials().auth_mode(), AuthMode::None);
    }

    #[test]
    fn clones_share_tokens_but_separate_clients_do_not() {
        let first = Client::builder().build().unwrap();
        let clone = first.clone();
        let second = Client::builder().build().unwrap();

        first.set_token("shared");

        assert_eq!(clone.token(), "shared");
        assert_eq!(second.token(), "");
    }

    #[tokio::test]
    async fn scoped_handles_share_credentials() {
        let client = Client::builder().build().unwrap();
        let scoped = client.with_deadline(Duration::from_secs(5));

        scoped.set_token("from-scoped");
        assert_eq!(client.token(), "from-scoped");
        assert!(scoped.context.deadline().is_some());
        assert!(client.context.deadline().is_none());
    }
}
