//! Classification of raw transport output.
//!
//! # Design
//! MyParcel answers label requests with a PDF and everything else with JSON.
//! A PDF is recognised by its magic prefix and kept byte-for-byte; anything
//! else is parsed as JSON and checked for an `errors` collection. Where the
//! error came from matters to the caller, so it is recorded next to the
//! message.

use serde_json::Value;
use tracing::{debug, warn};

const PDF_MAGIC: &[u8] = b"%PDF-1.";

/// Decoded payload of a response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Pdf(Vec<u8>),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Pdf(_) => None,
        }
    }

    pub fn as_pdf(&self) -> Option<&[u8]> {
        match self {
            ResponseBody::Pdf(bytes) => Some(bytes),
            ResponseBody::Json(_) => None,
        }
    }
}

/// Which side of the exchange reported the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOrigin {
    Transport,
    Api,
}

/// A classified response plus the error it carries, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedResponse {
    body: ResponseBody,
    error: Option<(ErrorOrigin, String)>,
}

impl DecodedResponse {
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_ref().map(|(_, message)| message.as_str())
    }

    pub fn error_origin(&self) -> Option<ErrorOrigin> {
        self.error.as_ref().map(|(origin, _)| *origin)
    }

    pub fn into_parts(self) -> (ResponseBody, Option<(ErrorOrigin, String)>) {
        (self.body, self.error)
    }
}

/// Classify what the transport returned.
///
/// `raw` is `None` when the transport produced no response at all; the
/// transport's own message is then fetched through `transport_error`.
pub fn decode_response(
    raw: Option<Vec<u8>>,
    transport_error: impl FnOnce() -> String,
) -> DecodedResponse {
    let Some(raw) = raw else {
        return DecodedResponse {
            body: ResponseBody::Json(Value::Null),
            error: Some((ErrorOrigin::Transport, transport_error())),
        };
    };

    if raw.starts_with(PDF_MAGIC) {
        debug!(bytes = raw.len(), "response classified as pdf");
        return DecodedResponse {
            body: ResponseBody::Pdf(raw),
            error: None,
        };
    }

    let value = match serde_json::from_slice::<Value>(&raw) {
        Ok(value) => value,
        Err(err) => {
            if !raw.is_empty() {
                warn!(error = %err, bytes = raw.len(), "response body is neither pdf nor json");
            }
            Value::Null
        }
    };
    debug!(bytes = raw.len(), "response classified as json");

    let error = extract_error(&value).map(|message| (ErrorOrigin::Api, message));
    DecodedResponse {
        body: ResponseBody::Json(value),
        error,
    }
}

/// Turn a MyParcel `errors` payload into `"<code> - <human> - <message>"`.
///
/// Only the first error is reported. Returns `None` when the document is not
/// an object or has no errors.
pub fn extract_error(result: &Value) -> Option<String> {
    let errors = result.as_object()?.get("errors")?;
    let (first, total) = match errors {
        Value::Array(items) => (items.first()?, items.len()),
        Value::Object(map) => (map.values().next()?, map.len()),
        _ => return None,
    };
    if total > 1 {
        debug!(discarded = total - 1, "reporting only the first api error");
    }

    // Validation failures arrive as a list of lists, or as an index-keyed object.
    let error = match first {
        Value::Array(nested) => nested.first().unwrap_or(&Value::Null),
        Value::Object(map) => match map.iter().next() {
            Some((key, nested)) if key.parse::<u64>().is_ok() => nested,
            _ => first,
        },
        other => other,
    };

    let code = error
        .get("code")
        .or_else(|| error.get("fields").and_then(|fields| fields.get(0)))
        .map(scalar_text)
        .unwrap_or_default();

    let human = error
        .get("human")
        .and_then(|human| human.get(0))
        .map(scalar_text)
        .unwrap_or_default();

    let message = result
        .get("message")
        .or_else(|| error.get("message"))
        .map(scalar_text)
        .unwrap_or_else(|| format!("Unknown error: {error}. Please contact MyParcel."));

    Some(format!("{code} - {human} - {message}"))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
