//! Raw response bodies for binary downloads.

use crate::{
    context::RequestContext,
    error::{RequestError, RequestFailure},
    Error, Result,
};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use http::{header, HeaderValue, Method, StatusCode};

/// An open response body together with its `Content-Disposition` header.
///
/// The body is read on demand. Dropping a `Download` before the body is
/// exhausted closes the underlying connection, so early returns never leak
/// it. Reads honour the cancellation and deadline of the client handle that
/// started the download.
///
/// # Examples
///
/// ```no_run
/// use kap::Client;
///
/// # async fn example() -> Result<(), kap::Error> {
/// let client = Client::builder().basic_auth("user", "pass").build()?;
///
/// let mut download = client.download_attachment("4028328c8d3a4c3c018d3e9d7c1b0c45").await?;
/// println!("saving {:?}", download.filename());
///
/// let mut size = 0;
/// while let Some(chunk) = download.chunk().await? {
///     size += chunk.len();
/// }
/// println!("{} bytes", size);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Download {
    response: reqwest::Response,
    content_disposition: Option<HeaderValue>,
    disposition_text: Option<String>,
    path: String,
    context: RequestContext,
}

impl Download {
    pub(crate) fn new(response: reqwest::Response, path: String, context: RequestContext) -> Self {
        let content_disposition = response.headers().get(header::CONTENT_DISPOSITION).cloned();
        let disposition_text = content_disposition
            .as_ref()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

        Self {
            response,
            content_disposition,
            disposition_text,
            path,
            context,
        }
    }

    /// The `Content-Disposition` header exactly as the server sent it.
    ///
    /// Servers sometimes put raw non-ASCII file names in this header; the
    /// bytes are kept untouched here.
    pub fn content_disposition(&self) -> Option<&HeaderValue> {
        self.content_disposition.as_ref()
    }

    /// The `Content-Disposition` header as text.
    ///
    /// Bytes that are not valid UTF-8 are replaced with `U+FFFD`; use
    /// [`content_disposition`](Self::content_disposition) for the original.
    pub fn content_disposition_str(&self) -> Option<&str> {
        self.disposition_text.as_deref()
    }

    /// The file name announced in `Content-Disposition`, if any.
    ///
    /// Prefers the plain `filename` parameter and falls back to the value
    /// part of an RFC 5987 `filename*` parameter without decoding it.
    pub fn filename(&self) -> Option<&str> {
        parse_filename(self.disposition_text.as_deref()?)
    }

    /// The HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// The `Content-Length` of the body, if the server sent one.
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// Reads the next chunk of the body, or `None` at the end.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        let response = &mut self.response;
        self.context
            .guard(async { response.chunk().await.map_err(RequestFailure::ReadBody) })
            .await
            .map_err(|e| read_error(&self.path, e))
    }

    /// Reads the remaining body into memory.
    pub async fn bytes(self) -> Result<Bytes> {
        let Download {
            response,
            path,
            context,
            ..
        } = self;
        context
            .guard(async { response.bytes().await.map_err(RequestFailure::ReadBody) })
            .await
            .map_err(|e| read_error(&path, e))
    }

    /// Converts the body into a stream of chunks.
    ///
    /// Cancellation and deadlines are checked only through [`chunk`](Self::chunk) and
    /// [`bytes`](Self::bytes); wrap the stream yourself if you need them.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes>> {
        let path = self.path;
        self.response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| read_error(&path, RequestFailure::ReadBody(e))))
    }
}

fn read_error(path: &str, failure: RequestFailure) -> Error {
    Error::Request(RequestError::new(Method::GET, path, failure))
}

fn parse_filename(disposition: &str) -> Option<&str> {
    let mut extended = None;

    for param in disposition.split(';').skip(1) {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();

        if name.eq_ignore_ascii_case("filename") {
            return Some(value.trim_matches('"'));
        }
        if name.eq_ignore_ascii_case("filename*") {
            // charset'language'value
            extended = value.rsplit('\'').next();
        }
    }

    extended
}
