//! Request metadata: what an endpoint hands to the request executor.

/// Metadata for an individual GET request.
///
/// Query parameters keep insertion order and may repeat a key, which the
/// fund listing relies on for its multi-valued filters.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The request path (relative to the base URL).
    pub path: String,

    /// Query parameters for this request, in insertion order.
    pub query_params: Vec<(String, String)>,

    /// Whether credentials from the client are attached.
    ///
    /// Only token generation turns this off.
    pub authenticated: bool,
}

impl RequestMetadata {
    /// Creates a new authenticated `RequestMetadata` for the given path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query_params: Vec::new(),
            authenticated: true,
        }
    }

    /// Appends a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }

    /// Appends a query parameter only when `value` is present and non-empty.
    pub fn with_optional_query_param(self, key: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => self.with_query_param(key, value),
            _ => self,
        }
    }

    /// Appends one `key=value` pair per item.
    pub fn with_repeated_query_param<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.query_params
            .extend(values.into_iter().map(|v| (key.to_string(), v.into())));
        self
    }

    /// Sends the request without any `Authorization` header.
    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_params_keep_order() {
        let metadata = RequestMetadata::new("/api/vyk/funds")
            .with_repeated_query_param("fundState", ["Y", "N"])
            .with_query_param("fundClass", "BYF");

        assert_eq!(
            metadata.query_params,
            vec![
                ("fundState".to_string(), "Y".to_string()),
                ("fundState".to_string(), "N".to_string()),
                ("fundClass".to_string(), "BYF".to_string()),
            ]
        );
        assert!(metadata.authenticated);
    }

    #[test]
    fn empty_optional_params_are_skipped() {
        let metadata = RequestMetadata::new("/x")
            .with_optional_query_param("a", None)
            .with_optional_query_param("b", Some(""))
            .with_optional_query_param("c", Some("1"))
            .unauthenticated();

        assert_eq!(metadata.query_params, vec![("c".to_string(), "1".to_string())]);
        assert!(!metadata.authenticated);
    }
}
