//! Turns a raw Postman collection document into normalized endpoint groups.
//!
//! Every step here is total: malformed bodies, unknown methods and missing
//! fields degrade to fallbacks instead of failing the document.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use crate::models::{
    BodySpec, BodyValue, Category, Collection, CollectionItem, Endpoint, EndpointGroup,
    EndpointHeader, EndpointResponse, HeaderSpec, RequestBody, RequestSpec, RequestUrl,
    ResponseSpec,
};

use super::examples::generate_code_examples;

static MARKDOWN_TABLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|.*\|").unwrap());
static MARKDOWN_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#{1,6}\s").unwrap());
static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

// Hosts are resolved from the collection display name; the naming convention
// of the exported collections is load-bearing.
const GUATEMALA_BASE_URL: &str = "https://api-guatemala.tupay.finance";
const DOMINICANA_BASE_URL: &str = "https://api-rd.tupay.finance";
const DEFAULT_BASE_URL: &str = "https://api.tupay.finance";

const REQUIRED_HEADERS: [&str; 2] = ["x-api-key", "Content-Type"];

const HEADER_DESCRIPTIONS: [(&str, &str); 4] = [
    ("x-api-key", "Tu API Key de autenticación"),
    ("Content-Type", "Tipo de contenido de la petición"),
    ("Accept", "Tipo de contenido aceptado en la respuesta"),
    ("Authorization", "Token de autorización"),
];

const STATUS_DESCRIPTIONS: [(u16, &str); 9] = [
    (200, "La petición fue exitosa"),
    (201, "Recurso creado exitosamente"),
    (400, "La petición contiene datos inválidos"),
    (401, "No autorizado - API Key inválida o faltante"),
    (403, "Acceso prohibido"),
    (404, "Recurso no encontrado"),
    (422, "Entidad no procesable - Error de validación"),
    (429, "Demasiadas peticiones - Rate limit excedido"),
    (500, "Error interno del servidor"),
];

const STATUS_NAMES: [(u16, &str); 12] = [
    (200, "OK"),
    (201, "Created"),
    (204, "No Content"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (422, "Unprocessable Entity"),
    (429, "Too Many Requests"),
    (500, "Internal Server Error"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
];

/// Transforms a whole collection into one group per qualifying top-level
/// folder. Only direct children are scanned: bare request leaves at the root
/// and folders nested deeper than one level are dropped.
pub fn transform_collection(collection: &Collection, category: Category) -> Vec<EndpointGroup> {
    collection
        .item
        .iter()
        .filter(|item| item.is_folder())
        .map(|folder| EndpointGroup {
            name: folder.name.clone(),
            description: folder.description.clone().unwrap_or_default(),
            endpoints: transform_items(
                folder.item.as_deref().unwrap_or_default(),
                category,
                &collection.info.name,
            ),
            icon: group_icon(&folder.name).to_string(),
        })
        .collect()
}

fn transform_items(
    items: &[CollectionItem],
    category: Category,
    collection_name: &str,
) -> Vec<Endpoint> {
    items
        .iter()
        .filter_map(|item| {
            item.request
                .as_ref()
                .map(|request| transform_item(item, request, category, collection_name))
        })
        .collect()
}

fn transform_item(
    item: &CollectionItem,
    request: &RequestSpec,
    category: Category,
    collection_name: &str,
) -> Endpoint {
    let method = normalize_method(&request.method);
    let path = extract_path(request.url.as_ref());
    let base_url = resolve_base_url(collection_name);
    let full_url = format!("{base_url}{path}");
    let body = request
        .body
        .as_ref()
        .and_then(|body| body.raw.as_deref())
        .filter(|raw| !raw.is_empty())
        .map(BodyValue::parse);
    let description = request
        .description
        .as_deref()
        .filter(|text| !text.is_empty())
        .or(item.description.as_deref())
        .unwrap_or_default();

    Endpoint {
        id: endpoint_id(&item.name, category),
        name: item.name.clone(),
        method: method.clone(),
        path,
        base_url: base_url.to_string(),
        description: clean_description(description),
        category,
        headers: transform_headers(&request.header),
        request_body: transform_request_body(request.body.as_ref()),
        responses: transform_responses(&item.response),
        examples: generate_code_examples(&method, &full_url, body.as_ref()),
        tags: vec![category.as_str().to_string(), request.method.to_lowercase()],
    }
}

/// `{category}-{slug}`: lowercase, non-alphanumeric runs collapsed to one
/// hyphen, edges trimmed. Two leaves sharing a name within a category collide.
fn endpoint_id(name: &str, category: Category) -> String {
    let lowered = name.to_lowercase();
    let slug = SLUG_RE.replace_all(&lowered, "-");
    format!("{}-{}", category.as_str(), slug.trim_matches('-'))
}

fn normalize_method(method: &str) -> String {
    method.to_uppercase()
}

/// String URLs keep everything from the first `/api/` on; structured URLs
/// join their path segments. Anything else defaults to `/api`.
fn extract_path(url: Option<&RequestUrl>) -> String {
    match url {
        Some(RequestUrl::Raw(raw)) => match raw.find("/api/") {
            Some(start) => raw[start..].to_string(),
            None => raw.clone(),
        },
        Some(RequestUrl::Detailed(spec)) => match &spec.path {
            Some(segments) => format!("/{}", segments.join("/")),
            None => "/api".to_string(),
        },
        None => "/api".to_string(),
    }
}

fn resolve_base_url(collection_name: &str) -> &'static str {
    let name = collection_name.to_lowercase();
    if name.contains("guatemala") {
        GUATEMALA_BASE_URL
    } else if name.contains("dominicana") {
        DOMINICANA_BASE_URL
    } else {
        DEFAULT_BASE_URL
    }
}

/// Best-effort cleanup of markdown tables and heading markers, not a parser.
fn clean_description(description: &str) -> String {
    let stripped = MARKDOWN_TABLE_RE.replace_all(description, "");
    let stripped = MARKDOWN_HEADING_RE.replace_all(&stripped, "");
    stripped.trim().to_string()
}

fn transform_headers(headers: &[HeaderSpec]) -> Vec<EndpointHeader> {
    headers
        .iter()
        .filter(|header| !header.disabled)
        .map(|header| EndpointHeader {
            name: header.key.clone(),
            value: header.value.clone(),
            required: REQUIRED_HEADERS.contains(&header.key.as_str()),
            description: header
                .description
                .as_deref()
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| header_description(&header.key))
                .to_string(),
        })
        .collect()
}

fn header_description(name: &str) -> &'static str {
    HEADER_DESCRIPTIONS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, description)| *description)
        .unwrap_or("")
}

fn transform_request_body(body: Option<&BodySpec>) -> Option<RequestBody> {
    let raw = body?.raw.as_deref().filter(|raw| !raw.is_empty())?;
    let parsed = BodyValue::parse(raw);
    Some(RequestBody {
        content_type: "application/json".to_string(),
        description: "Cuerpo de la petición en formato JSON".to_string(),
        schema: parsed.clone(),
        example: parsed,
        required: true,
    })
}

fn transform_responses(responses: &[ResponseSpec]) -> Vec<EndpointResponse> {
    if responses.is_empty() {
        return default_responses();
    }

    responses
        .iter()
        .map(|response| EndpointResponse {
            status: response.code,
            status_text: response
                .status
                .clone()
                .unwrap_or_else(|| status_name(response.code).to_string()),
            description: response_description(response.code).to_string(),
            body: response
                .body
                .as_deref()
                .map(BodyValue::parse)
                .unwrap_or_else(|| BodyValue::Raw(String::new())),
            headers: transform_headers(&response.header),
            is_error: response.code >= 400,
        })
        .collect()
}

/// Shown when a collection item ships no sample responses.
fn default_responses() -> Vec<EndpointResponse> {
    vec![
        EndpointResponse {
            status: 200,
            status_text: "OK".to_string(),
            description: "Petición exitosa".to_string(),
            body: BodyValue::Parsed(json!({ "success": true, "message": "Operación exitosa" })),
            headers: Vec::new(),
            is_error: false,
        },
        EndpointResponse {
            status: 400,
            status_text: "Bad Request".to_string(),
            description: "Petición inválida".to_string(),
            body: BodyValue::Parsed(
                json!({ "success": false, "message": "Error en los datos enviados" }),
            ),
            headers: Vec::new(),
            is_error: true,
        },
        EndpointResponse {
            status: 401,
            status_text: "Unauthorized".to_string(),
            description: "No autorizado".to_string(),
            body: BodyValue::Parsed(
                json!({ "success": false, "message": "API Key inválida o faltante" }),
            ),
            headers: Vec::new(),
            is_error: true,
        },
    ]
}

fn response_description(code: u16) -> &'static str {
    STATUS_DESCRIPTIONS
        .iter()
        .find(|(status, _)| *status == code)
        .map(|(_, description)| *description)
        .unwrap_or("Respuesta del servidor")
}

fn status_name(code: u16) -> &'static str {
    STATUS_NAMES
        .iter()
        .find(|(status, _)| *status == code)
        .map(|(_, name)| *name)
        .unwrap_or("")
}

fn group_icon(group_name: &str) -> &'static str {
    let name = group_name.to_lowercase();
    if name.contains("payin") || name.contains("pago") {
        "arrow-down-circle"
    } else if name.contains("payout") || name.contains("retiro") {
        "arrow-up-circle"
    } else {
        "folder"
    }
}
