//! Confluence REST API client.
//!
//! Provides a sync HTTP client for the Confluence REST API (`/rest/api`)
//! with HTTP Basic authentication (account email and API token).

mod attachments;
mod labels;
mod pages;

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use ureq::http::Response;
use ureq::{Agent, Body};

use crate::auth::BasicAuth;
use crate::error::ConfluenceError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Characters left unescaped in query values: A-Z a-z 0-9 - . _ ~
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    auth: BasicAuth,
}

impl ConfluenceClient {
    /// Create client from config values.
    ///
    /// # Arguments
    /// * `base_url` - Confluence base URL (including `/wiki` for Cloud)
    /// * `email` - Account email
    /// * `api_token` - API token for the account
    #[must_use]
    pub fn new(base_url: &str, email: &str, api_token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth: BasicAuth::new(email, api_token),
        }
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/rest/api", self.base_url)
    }
}

/// Percent-encode a query parameter value.
fn encode_query(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ENCODE_SET).to_string()
}

/// Turn an error status into [`ConfluenceError::HttpResponse`], otherwise return the body.
fn check_status(response: Response<Body>) -> Result<Body, ConfluenceError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(ConfluenceError::HttpResponse {
            status,
            body: error_body,
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_query_title() {
        assert_eq!(encode_query("Getting Started"), "Getting%20Started");
        assert_eq!(encode_query("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_query("state.json"), "state.json");
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let client = ConfluenceClient::new("https://example.atlassian.net/wiki/", "a", "b");
        assert_eq!(client.api_url(), "https://example.atlassian.net/wiki/rest/api");
    }
}
