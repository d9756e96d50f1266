//! Response wrapper that keeps the decoded payload alongside HTTP details.
//!
//! Endpoint methods on [`Client`](crate::Client) return only the payload;
//! [`Client::get`](crate::Client::get) returns the full [`Response`] for
//! callers that want status, headers or latency.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A successful, decoded HTTP response.
///
/// # Examples
///
/// ```no_run
/// use kap::{metadata::RequestMetadata, types::Member, Client};
///
/// # async fn example() -> Result<(), kap::Error> {
/// let client = Client::builder().basic_auth("user", "pass").build()?;
///
/// let response = client
///     .get::<Vec<Member>>(RequestMetadata::new("/api/vyk/members"))
///     .await?;
///
/// println!("{} members in {:?}", response.data.len(), response.latency);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded response data.
    pub data: T,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from sending the request until the body was decoded.
    pub latency: Duration,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(data: T, status: StatusCode, headers: HeaderMap, latency: Duration) -> Self {
        Self {
            data,
            status,
            headers,
            latency,
        }
    }

    /// Maps the response data to a different type, keeping the metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// # use kap::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     vec![1, 2, 3],
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(100),
    /// );
    ///
    /// let count = response.map(|v| v.len());
    /// assert_eq!(count.data, 3);
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            status: self.status,
            headers: self.headers,
            latency: self.latency,
        }
    }

    /// Consumes the response, returning the decoded data.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Returns a reference to a header value by name.
    ///
    /// # Examples
    ///
    /// ```
    /// # use kap::Response;
    /// # use http::{HeaderMap, StatusCode, HeaderValue};
    /// # use std::time::Duration;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("content-type", HeaderValue::from_static("application/json"));
    ///
    /// let response = Response::new((), StatusCode::OK, headers, Duration::from_millis(100));
    ///
    /// assert_eq!(response.header("content-type").unwrap(), "application/json");
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
