//! Live request runner backing the "try it out" panel. Builds a real request
//! from an endpoint's resolved method, URL and headers plus a user-supplied
//! API key. Independent of the transformation pipeline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{DocsError, DocsResult};
use crate::models::{BodyValue, Endpoint};
use crate::transformer::method_has_body;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxRequest {
    pub api_key: String,
    /// Overrides the endpoint's example body when present.
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub body: BodyValue,
}

pub struct SandboxClient {
    client: reqwest::Client,
}

impl SandboxClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub async fn execute(
        &self,
        endpoint: &Endpoint,
        request: &SandboxRequest,
    ) -> DocsResult<SandboxResponse> {
        let method = reqwest::Method::from_bytes(endpoint.method.as_bytes())
            .map_err(|_| DocsError::InvalidMethod(endpoint.method.clone()))?;

        let mut builder = self
            .client
            .request(method, endpoint.full_url())
            .header("x-api-key", &request.api_key);
        for header in &endpoint.headers {
            // The key header is user-supplied; everything else is forwarded.
            if header.name != "x-api-key" {
                builder = builder.header(&header.name, &header.value);
            }
        }

        if let Some(body) = self.request_body(endpoint, request) {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(DocsError::Sandbox)?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).to_string(),
                )
            })
            .collect();
        let text = response.text().await.map_err(DocsError::Sandbox)?;

        Ok(SandboxResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: BodyValue::parse(&text),
        })
    }

    /// User override first, then the endpoint's parsed example body.
    fn request_body(
        &self,
        endpoint: &Endpoint,
        request: &SandboxRequest,
    ) -> Option<serde_json::Value> {
        if !method_has_body(&endpoint.method) {
            return None;
        }
        request.body.clone().or_else(|| {
            match endpoint.request_body.as_ref().map(|body| &body.example) {
                Some(BodyValue::Parsed(value)) => Some(value.clone()),
                _ => None,
            }
        })
    }
}

impl Default for SandboxClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Collection};
    use crate::transformer::transform_collection;

    fn endpoint(method: &str, body: Option<&str>) -> Endpoint {
        let mut request = serde_json::json!({
            "method": method,
            "url": "/api/payin/register"
        });
        if let Some(raw) = body {
            request["body"] = serde_json::json!({ "mode": "raw", "raw": raw });
        }
        let doc: Collection = serde_json::from_value(serde_json::json!({
            "info": { "name": "Guatemala - PayIn" },
            "item": [{
                "name": "Transacciones",
                "item": [{ "name": "Registrar Pago", "request": request }]
            }]
        }))
        .expect("collection fixture");
        transform_collection(&doc, Category::Payin)
            .into_iter()
            .flat_map(|group| group.endpoints)
            .next()
            .expect("one endpoint")
    }

    fn sandbox_request(body: Option<serde_json::Value>) -> SandboxRequest {
        SandboxRequest {
            api_key: "test-key".to_string(),
            body,
        }
    }

    #[test]
    fn body_override_wins_over_example() {
        let client = SandboxClient::new();
        let endpoint = endpoint("POST", Some(r#"{"amount":100}"#));
        let request = sandbox_request(Some(serde_json::json!({ "amount": 500 })));
        assert_eq!(
            client.request_body(&endpoint, &request),
            Some(serde_json::json!({ "amount": 500 }))
        );
    }

    #[test]
    fn example_body_is_the_default() {
        let client = SandboxClient::new();
        let endpoint = endpoint("POST", Some(r#"{"amount":100}"#));
        let request = sandbox_request(None);
        assert_eq!(
            client.request_body(&endpoint, &request),
            Some(serde_json::json!({ "amount": 100 }))
        );
    }

    #[test]
    fn get_requests_send_no_body() {
        let client = SandboxClient::new();
        let endpoint = endpoint("GET", Some(r#"{"amount":100}"#));
        let request = sandbox_request(Some(serde_json::json!({ "amount": 500 })));
        assert_eq!(client.request_body(&endpoint, &request), None);
    }

    #[test]
    fn raw_example_bodies_are_not_sent() {
        let client = SandboxClient::new();
        let endpoint = endpoint("POST", Some("{not json"));
        let request = sandbox_request(None);
        assert_eq!(client.request_body(&endpoint, &request), None);
    }

    #[tokio::test]
    async fn invalid_methods_are_rejected() {
        let client = SandboxClient::new();
        let mut bad = endpoint("POST", None);
        bad.method = "NOT A METHOD".to_string();
        let err = client
            .execute(&bad, &sandbox_request(None))
            .await
            .expect_err("should fail");
        assert!(matches!(err, DocsError::InvalidMethod(_)));
    }
}
