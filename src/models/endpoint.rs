//! Normalized endpoint model served to documentation clients.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A JSON payload that survived a strict parse, or the raw text when it did
/// not. Parsing is total; malformed input is carried verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BodyValue {
    Parsed(serde_json::Value),
    Raw(String),
}

impl BodyValue {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(value) => BodyValue::Parsed(value),
            Err(_) => BodyValue::Raw(raw.to_string()),
        }
    }

    /// Pretty-printed JSON rendering. A raw payload renders as a JSON string
    /// literal, which is what the code samples interpolate.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| String::from("null"))
    }
}

/// Traffic direction of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Payin,
    Payout,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Payin => "payin",
            Category::Payout => "payout",
        }
    }

    /// Direction label used in the exported collection filenames.
    pub fn file_label(&self) -> &'static str {
        match self {
            Category::Payin => "Payin",
            Category::Payout => "PayOut",
        }
    }

    pub fn parse(s: &str) -> Option<Category> {
        match s.to_lowercase().as_str() {
            "payin" => Some(Category::Payin),
            "payout" => Some(Category::Payout),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountryCode {
    #[serde(rename = "GTM")]
    Gtm,
    #[serde(rename = "DOM")]
    Dom,
}

impl CountryCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountryCode::Gtm => "GTM",
            CountryCode::Dom => "DOM",
        }
    }

    /// Display name used in the exported collection filenames.
    pub fn file_label(&self) -> &'static str {
        match self {
            CountryCode::Gtm => "Guatemala",
            CountryCode::Dom => "Republica_Dominicana",
        }
    }

    pub fn parse(s: &str) -> Option<CountryCode> {
        match s.to_uppercase().as_str() {
            "GTM" => Some(CountryCode::Gtm),
            "DOM" => Some(CountryCode::Dom),
            _ => None,
        }
    }

    pub fn info(&self) -> &'static Country {
        match self {
            CountryCode::Gtm => &COUNTRIES[0],
            CountryCode::Dom => &COUNTRIES[1],
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-country configuration surfaced to the country selector.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub code: CountryCode,
    pub name: &'static str,
    pub full_name: &'static str,
    pub currency: &'static str,
    pub currency_symbol: &'static str,
    pub flag: &'static str,
    pub base_url: &'static str,
    pub locale: &'static str,
    pub timezone: &'static str,
}

pub const COUNTRIES: [Country; 2] = [
    Country {
        code: CountryCode::Gtm,
        name: "Guatemala",
        full_name: "República de Guatemala",
        currency: "GTQ",
        currency_symbol: "Q",
        flag: "🇬🇹",
        base_url: "https://api-guatemala.tupay.finance",
        locale: "es-GT",
        timezone: "America/Guatemala",
    },
    Country {
        code: CountryCode::Dom,
        name: "República Dominicana",
        full_name: "República Dominicana",
        currency: "DOP",
        currency_symbol: "RD$",
        flag: "🇩🇴",
        base_url: "https://api-rd.tupay.finance",
        locale: "es-DO",
        timezone: "America/Santo_Domingo",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub id: String,
    pub name: String,
    /// Uppercased but deliberately unvalidated; unknown methods pass through.
    pub method: String,
    pub path: String,
    pub base_url: String,
    pub description: String,
    pub category: Category,
    pub headers: Vec<EndpointHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    pub responses: Vec<EndpointResponse>,
    pub examples: Vec<CodeExample>,
    pub tags: Vec<String>,
}

impl Endpoint {
    pub fn full_url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointHeader {
    pub name: String,
    pub value: String,
    pub required: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub content_type: String,
    pub description: String,
    pub schema: BodyValue,
    pub example: BodyValue,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointResponse {
    pub status: u16,
    pub status_text: String,
    pub description: String,
    pub body: BodyValue,
    pub headers: Vec<EndpointHeader>,
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeExample {
    pub language: CodeLanguage,
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
    Curl,
    Javascript,
    Python,
    Php,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointGroup {
    pub name: String,
    pub description: String,
    pub endpoints: Vec<Endpoint>,
    pub icon: String,
}

/// Output artifact of the `transform` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointCatalog {
    pub country: CountryCode,
    pub endpoints: Vec<Endpoint>,
    pub transformed_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_value_keeps_malformed_json_verbatim() {
        let raw = "{not json at all";
        assert_eq!(BodyValue::parse(raw), BodyValue::Raw(raw.to_string()));
    }

    #[test]
    fn body_value_parses_strict_json() {
        let parsed = BodyValue::parse(r#"{"amount": 100}"#);
        assert_eq!(
            parsed,
            BodyValue::Parsed(serde_json::json!({ "amount": 100 }))
        );
    }

    #[test]
    fn body_value_serializes_untagged() {
        let parsed = BodyValue::Parsed(serde_json::json!({ "ok": true }));
        assert_eq!(serde_json::to_string(&parsed).expect("serialize"), r#"{"ok":true}"#);
        let raw = BodyValue::Raw("plain".to_string());
        assert_eq!(serde_json::to_string(&raw).expect("serialize"), r#""plain""#);
    }

    #[test]
    fn country_codes_round_trip() {
        assert_eq!(CountryCode::parse("gtm"), Some(CountryCode::Gtm));
        assert_eq!(CountryCode::parse("DOM"), Some(CountryCode::Dom));
        assert_eq!(CountryCode::parse("MEX"), None);
        assert_eq!(CountryCode::Gtm.info().currency, "GTQ");
        assert_eq!(CountryCode::Dom.info().base_url, "https://api-rd.tupay.finance");
    }
}
