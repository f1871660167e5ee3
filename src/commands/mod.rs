//! REST Command Wrappers
//!
//! HTTP transport for the collection controllers plus request builders,
//! organized by resource.

mod notification;
mod onboarding;
mod rent;
mod vendor;

use async_trait::async_trait;
use collection_controller::{ClassifiedError, Method, Transport, TransportRequest, TransportResult};
use serde_json::Value;
use tracing::debug;

pub use notification::*;
pub use onboarding::*;
pub use rent::*;
pub use vendor::*;

/// `reqwest`-backed transport rooted at the API base URL
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn call(&self, request: TransportRequest) -> TransportResult {
        let url = self.url_for(&request.path);
        debug!(method = request.method.as_str(), %url, "http request");

        let mut builder = self.client.request(to_reqwest(request.method), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClassifiedError::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClassifiedError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ClassifiedError::from_status(status.as_u16(), &text));
        }
        parse_body(&text)
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Empty bodies (204 No Content) decode to `null`
pub fn parse_body(text: &str) -> TransportResult {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| ClassifiedError::Decode(e.to_string()))
}

/// `/notifications/n-1` style member path
pub(crate) fn member_path(collection: &str, id: &str) -> String {
    format!("{}/{}", collection.trim_end_matches('/'), id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://localhost:8080/api", "/rents"), "http://localhost:8080/api/rents");
        assert_eq!(join_url("http://localhost:8080/api/", "rents"), "http://localhost:8080/api/rents");
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), Ok(Value::Null));
        assert_eq!(parse_body(" \n"), Ok(Value::Null));
        assert_eq!(parse_body(r#"{"ok":true}"#), Ok(json!({"ok": true})));
        assert!(matches!(parse_body("<html>"), Err(ClassifiedError::Decode(_))));
    }

    #[test]
    fn test_member_path() {
        assert_eq!(member_path("/vendors", "v-9"), "/vendors/v-9");
        assert_eq!(member_path("/vendors/", "v-9"), "/vendors/v-9");
    }
}
