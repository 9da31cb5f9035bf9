use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// The only key the mock accepts.
pub const API_KEY: &str = "mock-api-key";

/// Body served for `Accept: application/pdf` label requests.
pub const LABEL_PDF: &[u8] = b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\ntrailer << /Root 1 0 R >>\n%%EOF\n";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Shipment {
    pub id: u64,
    #[serde(default)]
    pub reference_identifier: Option<String>,
    pub recipient: Value,
    #[serde(default)]
    pub carrier: Option<u64>,
    #[serde(default)]
    pub is_return: bool,
}

#[derive(Deserialize)]
struct CreatePayload {
    data: CreateData,
}

#[derive(Deserialize)]
struct CreateData {
    #[serde(default)]
    shipments: Vec<Value>,
    #[serde(default)]
    return_shipments: Vec<Value>,
}

#[derive(Clone, Default)]
pub struct Db {
    shipments: Arc<RwLock<BTreeMap<u64, Shipment>>>,
    next_id: Arc<AtomicU64>,
}

impl Db {
    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// An error answer in MyParcel's `{"errors": [...]}` shape.
pub struct ApiFailure {
    status: StatusCode,
    body: Value,
}

impl ApiFailure {
    fn access_denied() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: json!({
                "errors": [{
                    "status": 401,
                    "code": 3000,
                    "title": "Access Denied",
                    "human": ["Invalid API key"]
                }],
                "message": "Access Denied"
            }),
        }
    }

    fn not_found(id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: json!({
                "errors": [{
                    "code": 3001,
                    "message": "Shipment not found",
                    "human": [format!("No shipment with id {id}")]
                }]
            }),
        }
    }

    fn invalid_json() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({"errors": [{
                "code": 3505,
                "message": "Invalid JSON",
                "human": ["Request body is not valid JSON"]
            }]}),
        }
    }

    fn validation(field: String, human: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: json!({
                "errors": [[{"fields": [field], "human": [human]}]],
                "message": "Validation failed"
            }),
        }
    }

    fn unsupported_media_type() -> Self {
        Self {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            body: json!({"errors": [{"code": 3205, "message": "Unsupported content type"}]}),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/shipments", post(create_shipments))
        .route("/shipments/{ids}", get(get_shipments).delete(delete_shipments))
        .route("/shipment_labels/{ids}", get(get_labels))
        .with_state(Db::default())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn authorize(headers: &HeaderMap) -> Result<(), ApiFailure> {
    let expected = format!("basic {}", STANDARD.encode(API_KEY));
    let given = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    match given {
        Some(value) if value.eq_ignore_ascii_case(&expected) => Ok(()),
        _ => Err(ApiFailure::access_denied()),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: header::HeaderName) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

/// MyParcel separates multiple identifiers with `;`.
fn parse_ids(raw: &str) -> Result<Vec<u64>, ApiFailure> {
    raw.split(';')
        .map(|id| id.trim().parse().map_err(|_| ApiFailure::not_found(id)))
        .collect()
}

async fn create_shipments(
    State(db): State<Db>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, ApiFailure> {
    authorize(&headers)?;

    let content_type = header_str(&headers, header::CONTENT_TYPE);
    let is_return = if content_type.starts_with("application/vnd.return_shipment+json") {
        true
    } else if content_type.starts_with("application/vnd.shipment+json") {
        false
    } else {
        return Err(ApiFailure::unsupported_media_type());
    };

    let payload: CreatePayload =
        serde_json::from_str(&body).map_err(|_| ApiFailure::invalid_json())?;
    let (collection, items) = if is_return {
        ("return_shipments", payload.data.return_shipments)
    } else {
        ("shipments", payload.data.shipments)
    };

    for (index, item) in items.iter().enumerate() {
        if item.get("recipient").is_none() {
            return Err(ApiFailure::validation(
                format!("data.{collection}[{index}].recipient"),
                "Recipient is required",
            ));
        }
    }

    let mut shipments = db.shipments.write().await;
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        let shipment = Shipment {
            id: db.allocate_id(),
            reference_identifier: item
                .get("reference_identifier")
                .and_then(Value::as_str)
                .map(str::to_string),
            recipient: item.get("recipient").cloned().unwrap_or(Value::Null),
            carrier: item.get("carrier").and_then(Value::as_u64),
            is_return,
        };
        ids.push(json!({"id": shipment.id, "reference_identifier": shipment.reference_identifier}));
        shipments.insert(shipment.id, shipment);
    }

    Ok(Json(json!({"data": {"ids": ids}})))
}

async fn get_shipments(
    State(db): State<Db>,
    Path(ids): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiFailure> {
    authorize(&headers)?;
    let shipments = db.shipments.read().await;
    let found = parse_ids(&ids)?
        .into_iter()
        .map(|id| {
            shipments
                .get(&id)
                .cloned()
                .ok_or_else(|| ApiFailure::not_found(&id.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(json!({"data": {"shipments": found}})))
}

async fn delete_shipments(
    State(db): State<Db>,
    Path(ids): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiFailure> {
    authorize(&headers)?;
    let ids = parse_ids(&ids)?;
    let mut shipments = db.shipments.write().await;
    if let Some(missing) = ids.iter().find(|id| !shipments.contains_key(*id)) {
        return Err(ApiFailure::not_found(&missing.to_string()));
    }
    for id in ids {
        shipments.remove(&id);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn get_labels(
    State(db): State<Db>,
    Path(ids): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiFailure> {
    authorize(&headers)?;
    let parsed = parse_ids(&ids)?;
    {
        let shipments = db.shipments.read().await;
        if let Some(missing) = parsed.iter().find(|id| !shipments.contains_key(*id)) {
            return Err(ApiFailure::not_found(&missing.to_string()));
        }
    }

    if header_str(&headers, header::ACCEPT).starts_with("application/pdf") {
        return Ok(([(header::CONTENT_TYPE, "application/pdf")], LABEL_PDF).into_response());
    }

    let url = format!("/pdfs/{}.pdf", Uuid::new_v4());
    Ok(Json(json!({"data": {"pdfs": {"url": url}}})).into_response())
}
