//! Serde model of the Postman Collection v2 documents shipped as static
//! assets. Only the fields the pipeline reads are modeled; everything that is
//! optional in real exports is optional here, so deserializing a sparse
//! document never fails.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
    pub info: CollectionInfo,
    #[serde(default)]
    pub item: Vec<CollectionItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
}

/// A node in the collection tree: a folder when it carries child items, a
/// request leaf when it carries a request. Exports are not required to keep
/// the two exclusive, so both fields are independent options.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionItem {
    pub name: String,
    pub description: Option<String>,
    pub item: Option<Vec<CollectionItem>>,
    pub request: Option<RequestSpec>,
    #[serde(default)]
    pub response: Vec<ResponseSpec>,
}

impl CollectionItem {
    pub fn is_folder(&self) -> bool {
        self.item.as_ref().is_some_and(|children| !children.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestSpec {
    pub method: String,
    #[serde(default)]
    pub header: Vec<HeaderSpec>,
    pub body: Option<BodySpec>,
    pub url: Option<RequestUrl>,
    pub description: Option<String>,
}

/// Postman writes URLs either as a bare string or a structured object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RequestUrl {
    Raw(String),
    Detailed(UrlSpec),
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlSpec {
    pub path: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeaderSpec {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub disabled: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BodySpec {
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseSpec {
    pub status: Option<String>,
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub header: Vec<HeaderSpec>,
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_deserializes_from_bare_string() {
        let request: RequestSpec = serde_json::from_value(serde_json::json!({
            "method": "GET",
            "url": "{{base_url}}/api/payin/status"
        }))
        .expect("deserialize");
        assert!(matches!(request.url, Some(RequestUrl::Raw(ref s)) if s.contains("/api/payin/status")));
    }

    #[test]
    fn url_deserializes_from_structured_object() {
        let request: RequestSpec = serde_json::from_value(serde_json::json!({
            "method": "POST",
            "url": {
                "raw": "{{base_url}}/api/payin/register",
                "host": ["{{base_url}}"],
                "path": ["api", "payin", "register"]
            }
        }))
        .expect("deserialize");
        match request.url {
            Some(RequestUrl::Detailed(spec)) => {
                assert_eq!(spec.path.as_deref(), Some(&["api".to_string(), "payin".to_string(), "register".to_string()][..]));
            }
            other => panic!("expected structured url, got {other:?}"),
        }
    }

    #[test]
    fn sparse_item_deserializes_with_defaults() {
        let item: CollectionItem = serde_json::from_value(serde_json::json!({
            "name": "Bare folder"
        }))
        .expect("deserialize");
        assert!(!item.is_folder());
        assert!(item.request.is_none());
        assert!(item.response.is_empty());
    }
}
