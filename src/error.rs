//! Error types for KAP API calls.
//!
//! Every failed call surfaces as exactly one [`Error`]:
//!
//! - [`Error::Api`] when the platform answered with a non-2xx status and its
//!   standard `{code, message}` body. The code is classified into an
//!   [`ErrorKind`] that callers match on instead of the raw code string.
//! - [`Error::Request`] when the call failed before a usable answer existed:
//!   a bad URL, a network failure, cancellation, an expired deadline, a body
//!   that could not be decoded, or an error body of an unexpected shape.
//! - [`Error::ConfigurationError`] when a [`ClientBuilder`](crate::ClientBuilder)
//!   was given something it cannot use.

use http::{Method, StatusCode};
use serde::Deserialize;
use std::fmt;

/// The main error type for KAP API calls.
///
/// # Examples
///
/// ```no_run
/// use kap::{Client, Error, ErrorKind};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().token("my-token").build()?;
///
/// match client.members().await {
///     Ok(members) => println!("{} members", members.len()),
///     Err(e) if e.kind() == Some(ErrorKind::TokenExpired) => {
///         client.generate_token().await?;
///     }
///     Err(Error::Request(e)) => eprintln!("{} {} failed: {}", e.method, e.path, e.source),
///     Err(e) => return Err(e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The platform rejected the request with a structured error body.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request could not be completed or its response could not be used.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Invalid client configuration.
    #[error("kap: configuration error: {0}")]
    ConfigurationError(String),
}

impl Error {
    /// Returns the category of a structured API error.
    ///
    /// Returns `None` for request-level and configuration errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use http::StatusCode;
    /// use kap::{ApiError, Error, ErrorCode, ErrorKind};
    ///
    /// let err = Error::from(ApiError::new(ErrorCode::Er006, "expired", StatusCode::UNAUTHORIZED));
    /// assert_eq!(err.kind(), Some(ErrorKind::TokenExpired));
    /// ```
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Api(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// Returns the HTTP status code of the failed response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api(e) => Some(e.status),
            Error::Request(e) => e.status(),
            Error::ConfigurationError(_) => None,
        }
    }

    /// Returns `true` if the caller's cancellation token fired or its deadline passed.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Error::Request(RequestError {
                source: RequestFailure::Cancelled | RequestFailure::DeadlineExceeded,
                ..
            })
        )
    }

    /// Returns `true` if the transport gave up waiting for the server.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Request(RequestError {
                source: RequestFailure::Transport(e) | RequestFailure::ReadBody(e),
                ..
            }) => e.is_timeout(),
            Error::Request(RequestError {
                source: RequestFailure::DeadlineExceeded,
                ..
            }) => true,
            _ => false,
        }
    }
}

/// Error codes defined by the platform's standard error body.
///
/// Codes the platform may add later land in [`ErrorCode::Unrecognized`]
/// with the raw value preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ErrorCode {
    /// `ER001`
    Er001,
    /// `ER002`
    Er002,
    /// `ER003`
    Er003,
    /// `ER004`
    Er004,
    /// `ER005`
    Er005,
    /// `ER006`
    Er006,
    /// `ER007`
    Er007,
    /// `ER008`
    Er008,
    /// Any code outside `ER001`..`ER008`.
    Unrecognized(String),
}

impl ErrorCode {
    /// Returns the code as it appears on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::Er001 => "ER001",
            ErrorCode::Er002 => "ER002",
            ErrorCode::Er003 => "ER003",
            ErrorCode::Er004 => "ER004",
            ErrorCode::Er005 => "ER005",
            ErrorCode::Er006 => "ER006",
            ErrorCode::Er007 => "ER007",
            ErrorCode::Er008 => "ER008",
            ErrorCode::Unrecognized(code) => code,
        }
    }

    /// Returns the category this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::Er001 => ErrorKind::NoPermission,
            ErrorCode::Er002 => ErrorKind::Unauthorized,
            ErrorCode::Er003 => ErrorKind::IpRestricted,
            ErrorCode::Er004 => ErrorKind::InvalidToken,
            ErrorCode::Er005 => ErrorKind::IpVerification,
            ErrorCode::Er006 => ErrorKind::TokenExpired,
            ErrorCode::Er007 => ErrorKind::TokenValidation,
            ErrorCode::Er008 => ErrorKind::TokenNotValid,
            ErrorCode::Unrecognized(_) => ErrorKind::UnexpectedStatus,
        }
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "ER001" => ErrorCode::Er001,
            "ER002" => ErrorCode::Er002,
            "ER003" => ErrorCode::Er003,
            "ER004" => ErrorCode::Er004,
            "ER005" => ErrorCode::Er005,
            "ER006" => ErrorCode::Er006,
            "ER007" => ErrorCode::Er007,
            "ER008" => ErrorCode::Er008,
            _ => ErrorCode::Unrecognized(code),
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        ErrorCode::from(code.to_string())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable categories for structured API errors.
///
/// Match on these rather than on [`ErrorCode`] strings. An [`ApiError`]
/// reports its category through [`ApiError::kind`] and also as its
/// [`source`](std::error::Error::source), so generic code walking an error
/// chain can find it with `downcast_ref::<ErrorKind>()`.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    #[error("kap: no service access permission")]
    NoPermission,
    #[error("kap: unauthorized request")]
    Unauthorized,
    #[error("kap: unregistered IP address")]
    IpRestricted,
    #[error("kap: invalid token")]
    InvalidToken,
    #[error("kap: IP verification failed")]
    IpVerification,
    #[error("kap: token has expired")]
    TokenExpired,
    #[error("kap: token could not be validated")]
    TokenValidation,
    #[error("kap: authorization token is not valid")]
    TokenNotValid,
    #[error("kap: unexpected HTTP status")]
    UnexpectedStatus,
}

/// A structured error returned by the platform.
#[derive(thiserror::Error, Debug, Clone)]
#[error("kap: api error {code} (HTTP {}): {message}", .status.as_u16())]
pub struct ApiError {
    /// The platform error code.
    pub code: ErrorCode,
    /// Human readable description from the platform.
    pub message: String,
    /// The HTTP status of the response that carried this error.
    pub status: StatusCode,
    #[source]
    kind: ErrorKind,
}

impl ApiError {
    /// Creates an `ApiError`, classifying `code` immediately.
    pub fn new(code: impl Into<ErrorCode>, message: impl Into<String>, status: StatusCode) -> Self {
        let code = code.into();
        let kind = code.kind();
        Self {
            code,
            message: message.into(),
            status,
            kind,
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// The platform's standard error body.
///
/// Both fields may be missing or `null`; a missing code classifies as
/// [`ErrorKind::UnexpectedStatus`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Classifies a non-2xx response body.
///
/// Any JSON object whose `code` and `message` are strings (or absent)
/// becomes an [`ApiError`]. Everything else (empty bodies, gateway HTML
/// pages, non-object JSON, fields of the wrong type) becomes a
/// [`RequestError`] carrying the raw status and body text.
pub(crate) fn classify(status: StatusCode, body: &str, method: &Method, path: &str) -> Error {
    match parse_error_body(body) {
        Some(parsed) => Error::Api(ApiError::new(
            parsed.code.unwrap_or_default(),
            parsed.message.unwrap_or_default(),
            status,
        )),
        None => Error::Request(RequestError::new(
            method.clone(),
            path,
            RequestFailure::UnexpectedStatus {
                status,
                body: body.to_string(),
            },
        )),
    }
}

fn parse_error_body(body: &str) -> Option<ErrorBody> {
    match serde_json::from_str::<serde_json::Value>(body).ok()? {
        value @ serde_json::Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

/// A failure that happened while issuing a request or handling its response.
///
/// Always names the request that produced it.
#[derive(thiserror::Error, Debug)]
#[error("kap: {method} {path}: {source}")]
pub struct RequestError {
    /// The HTTP method of the failed request.
    pub method: Method,
    /// The request path, relative to the base URL.
    pub path: String,
    /// What went wrong.
    #[source]
    pub source: RequestFailure,
}

impl RequestError {
    pub(crate) fn new(method: Method, path: impl Into<String>, source: RequestFailure) -> Self {
        Self {
            method,
            path: path.into(),
            source,
        }
    }

    /// Returns the HTTP status if the failure happened after a response arrived.
    pub fn status(&self) -> Option<StatusCode> {
        match &self.source {
            RequestFailure::UnexpectedStatus { status, .. } => Some(*status),
            RequestFailure::Transport(e) | RequestFailure::ReadBody(e) => e.status(),
            _ => None,
        }
    }
}

/// The underlying cause of a [`RequestError`].
#[derive(thiserror::Error, Debug)]
pub enum RequestFailure {
    /// The base URL and path did not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A credential could not be encoded as a header value.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    /// The request could not be sent or no response arrived.
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    /// The caller's cancellation token fired.
    #[error("request cancelled")]
    Cancelled,

    /// The caller's deadline passed before the call completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The response body could not be read.
    #[error("reading response body: {0}")]
    ReadBody(#[source] reqwest::Error),

    /// A successful response body did not match the expected type.
    #[error("decoding response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A non-2xx response whose body is not a platform error body.
    #[error("HTTP {}: {body}", .status.as_u16())]
    UnexpectedStatus {
        /// The HTTP status code.
        status: StatusCode,
        /// The raw response body.
        body: String,
    },
}

/// A specialized `Result` type for KAP API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn classify_get(status: u16, body: &str) -> Error {
        classify(
            StatusCode::from_u16(status).unwrap(),
            body,
            &Method::GET,
            "/api/vyk/members",
        )
    }

    #[test]
    fn known_codes_map_to_their_categories() {
        let table = [
            ("ER001", ErrorKind::NoPermission),
            ("ER002", ErrorKind::Unauthorized),
            ("ER003", ErrorKind::IpRestricted),
            ("ER004", ErrorKind::InvalidToken),
            ("ER005", ErrorKind::IpVerification),
            ("ER006", ErrorKind::TokenExpired),
            ("ER007", ErrorKind::TokenValidation),
            ("ER008", ErrorKind::TokenNotValid),
        ];

        for (code, kind) in table {
            let parsed = ErrorCode::from(code);
            assert_eq!(parsed.kind(), kind, "code {code}");
            assert_eq!(parsed.as_str(), code);
        }
    }

    #[test]
    fn expired_token_body_is_classified() {
        let err = classify_get(401, r#"{"code":"ER006","message":"expired"}"#);

        assert_eq!(err.kind(), Some(ErrorKind::TokenExpired));
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        match err {
            Error::Api(api) => {
                assert_eq!(api.code, ErrorCode::Er006);
                assert_eq!(api.message, "expired");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_code_is_unexpected_status() {
        let err = classify_get(500, r#"{"code":"ERXXX","message":"?"}"#);

        assert_eq!(err.kind(), Some(ErrorKind::UnexpectedStatus));
        match err {
            Error::Api(api) => {
                assert_eq!(api.code, ErrorCode::Unrecognized("ERXXX".to_string()));
                assert_eq!(api.status.as_u16(), 500);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn html_body_falls_back_to_request_error() {
        let html = "<html><body>Bad Gateway</body></html>";
        let err = classify_get(502, html);

        assert_eq!(err.kind(), None);
        match err {
            Error::Request(RequestError {
                method,
                path,
                source: RequestFailure::UnexpectedStatus { status, body },
            }) => {
                assert_eq!(method, Method::GET);
                assert_eq!(path, "/api/vyk/members");
                assert_eq!(status.as_u16(), 502);
                assert_eq!(body, html);
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[test]
    fn empty_body_falls_back_to_request_error() {
        let err = classify_get(503, "");
        assert!(matches!(
            err,
            Error::Request(RequestError {
                source: RequestFailure::UnexpectedStatus { .. },
                ..
            })
        ));
    }

    #[test]
    fn null_message_keeps_the_category() {
        let err = classify_get(401, r#"{"code":"ER006","message":null}"#);

        assert_eq!(err.kind(), Some(ErrorKind::TokenExpired));
        match err {
            Error::Api(api) => {
                assert_eq!(api.message, "");
                assert_eq!(api.status.as_u16(), 401);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn json_object_without_code_is_unexpected_status() {
        let err = classify_get(500, r#"{"error":"x"}"#);

        assert_eq!(err.kind(), Some(ErrorKind::UnexpectedStatus));
        match err {
            Error::Api(api) => {
                assert_eq!(api.code, ErrorCode::Unrecognized(String::new()));
                assert_eq!(api.status.as_u16(), 500);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn null_code_is_unexpected_status() {
        let err = classify_get(403, r#"{"code":null,"message":"denied"}"#);
        assert_eq!(err.kind(), Some(ErrorKind::UnexpectedStatus));
    }

    #[test]
    fn wrong_field_types_fall_back_to_request_error() {
        for body in [r#"{"code":123,"message":"x"}"#, r#"["ER006","x"]"#, "42", "null"] {
            let err = classify_get(500, body);
            assert!(
                matches!(
                    err,
                    Error::Request(RequestError {
                        source: RequestFailure::UnexpectedStatus { .. },
                        ..
                    })
                ),
                "body {body} gave {err:?}"
            );
        }
    }

    #[test]
    fn category_is_reachable_through_the_source_chain() {
        let err = classify_get(401, r#"{"code":"ER004","message":"bad token"}"#);

        let kind = err
            .source()
            .and_then(|source| source.downcast_ref::<ErrorKind>())
            .copied();
        assert_eq!(kind, Some(ErrorKind::InvalidToken));
    }

    #[test]
    fn display_includes_request_context() {
        let err = classify_get(502, "oops");
        assert_eq!(err.to_string(), "kap: GET /api/vyk/members: HTTP 502: oops");

        let err = classify_get(401, r#"{"code":"ER002","message":"nope"}"#);
        assert_eq!(err.to_string(), "kap: api error ER002 (HTTP 401): nope");
    }
}
