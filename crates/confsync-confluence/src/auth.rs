//! HTTP Basic authentication with an account email and API token.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

/// Precomputed `Authorization` header value (internal use only).
pub(crate) struct BasicAuth {
    header: String,
}

impl BasicAuth {
    pub(crate) fn new(email: &str, api_token: &str) -> Self {
        let credentials = BASE64_STANDARD.encode(format!("{email}:{api_token}"));
        Self {
            header: format!("Basic {credentials}"),
        }
    }

    /// Value for the `Authorization` header.
    pub(crate) fn header(&self) -> &str {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_header() {
        let auth = BasicAuth::new("bot@example.com", "secret");
        // base64("bot@example.com:secret")
        assert_eq!(auth.header(), "Basic Ym90QGV4YW1wbGUuY29tOnNlY3JldA==");
    }
}
