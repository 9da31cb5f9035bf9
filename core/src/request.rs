//! Per-call request parameters.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::types::RequestKind;

/// API key, payload and headers for one call. Immutable once built.
///
/// For POST the body is the JSON payload; for other methods it is the
/// identifier appended to the URL (for example `"12;13"` for two shipments).
#[derive(Clone, PartialEq, Eq)]
pub struct RequestSpec {
    api_key: String,
    body: String,
    headers: Vec<String>,
}

impl RequestSpec {
    /// Store the key and body verbatim and derive the two request headers.
    ///
    /// An empty key is accepted here; sending such a spec fails.
    pub fn configure(
        api_key: impl Into<String>,
        body: impl Into<String>,
        header_prefix: &str,
    ) -> Self {
        let api_key = api_key.into();
        let headers = vec![
            format!("{header_prefix}charset=utf-8"),
            format!("Authorization: basic {}", STANDARD.encode(&api_key)),
        ];
        Self {
            api_key,
            body: body.into(),
            headers,
        }
    }

    pub fn for_kind(
        api_key: impl Into<String>,
        body: impl Into<String>,
        kind: RequestKind,
    ) -> Self {
        Self::configure(api_key, body, kind.header_prefix())
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl fmt::Debug for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSpec")
            .field("api_key", &"<redacted>")
            .field("body", &self.body)
            .field("headers", &self.headers.first())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configure_builds_charset_and_basic_auth_headers() {
        let prefix = "Content-Type: application/vnd.shipment+json; ";
        let spec = RequestSpec::configure("key123", "{}", prefix);
        assert_eq!(
            spec.headers(),
            [
                "Content-Type: application/vnd.shipment+json; charset=utf-8".to_string(),
                "Authorization: basic a2V5MTIz".to_string(),
            ]
        );
        assert_eq!(spec.api_key(), "key123");
        assert_eq!(spec.body(), "{}");
    }

    #[test]
    fn empty_key_is_stored_as_given() {
        let spec = RequestSpec::configure("", "", "");
        assert_eq!(spec.api_key(), "");
        assert_eq!(spec.headers()[0], "charset=utf-8");
        assert_eq!(spec.headers()[1], "Authorization: basic ");
    }

    #[test]
    fn for_kind_uses_the_kind_header() {
        let spec = RequestSpec::for_kind("k", "1;2", RequestKind::RetrieveLabelPdf);
        assert_eq!(spec.headers()[0], "Accept: application/pdf; charset=utf-8");
    }

    #[test]
    fn debug_output_hides_the_key() {
        let spec = RequestSpec::configure("super-secret", "", "Accept: application/json; ");
        let printed = format!("{spec:?}");
        assert!(!printed.contains("super-secret"));
        assert!(!printed.contains("c3VwZXItc2VjcmV0"));
    }
}
