use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{ErrorReason, STATUS_NOT_FOUND, STATUS_UNAUTHORIZED};
use crate::transport::TransportError;

#[derive(Debug, Clone, Deserialize)]
struct SuccessFlag {
    // CRUD endpoints spell it `Success`.
    #[serde(default, alias = "Success")]
    success: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorJsonBody {
    #[serde(default)]
    reasons: Option<Vec<ErrorReason>>,
    #[serde(default, rename = "Errors")]
    errors: Option<Vec<ObjectErrorJson>>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    timestamp: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ObjectErrorJson {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Error payload extracted from a failed response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    pub reasons: Vec<ErrorReason>,
    /// Gateway `error` field, with `path` and `timestamp` when present.
    pub detail: Option<String>,
    /// CRUD `Errors` as `CODE: message` joined by ` || `, else a bare `message`.
    pub failure: Option<String>,
}

pub fn decode_json_response<T: DeserializeOwned>(json: &str) -> Result<T, TransportError> {
    Ok(serde_json::from_str(json)?)
}

/// `true` when a JSON object carries `success: false` (or `Success: false`).
pub fn reports_failure(json: &str) -> bool {
    serde_json::from_str::<SuccessFlag>(json).is_ok_and(|flag| flag.success == Some(false))
}

/// Parse the error shapes Zuora uses: a REST `reasons` array, the CRUD
/// `Errors` array and the gateway's `{timestamp, status, error, path}` object.
///
/// Returns `None` when the body is not a JSON object.
pub fn decode_error_body(json: &str) -> Option<ErrorBody> {
    let parsed: ErrorJsonBody = serde_json::from_str(json).ok()?;
    let detail = gateway_message(&parsed);
    let failure = failure_message(&parsed);
    Some(ErrorBody {
        reasons: parsed.reasons.unwrap_or_default(),
        detail,
        failure,
    })
}

fn gateway_message(parsed: &ErrorJsonBody) -> Option<String> {
    let error = parsed.error.as_deref().filter(|e| !e.trim().is_empty())?;
    let mut out = error.to_owned();
    if let Some(path) = parsed.path.as_deref().filter(|p| !p.is_empty()) {
        out.push_str(&format!(" (path: {path})"));
    }
    if let Some(timestamp) = parsed.timestamp.as_ref().filter(|t| !t.is_null()) {
        let timestamp = match timestamp {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        out.push_str(&format!(" at {timestamp}"));
    }
    Some(out)
}

fn failure_message(parsed: &ErrorJsonBody) -> Option<String> {
    let errors = parsed
        .errors
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|e| {
            format!(
                "{}: {}",
                e.code.as_deref().unwrap_or("UNKNOWN"),
                e.message.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>();
    if !errors.is_empty() {
        return Some(errors.join(" || "));
    }
    parsed
        .message
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(str::to_owned)
}

/// Message for a non-2xx response that carries no `reasons`.
///
/// Only the gateway `error` field counts as detail here; any other body is
/// reported as-is unless the status has a canned message.
pub fn fallback_message(status: u16, body: &str) -> String {
    if let Some(detail) = decode_error_body(body).and_then(|parsed| parsed.detail) {
        return detail;
    }
    match status {
        STATUS_UNAUTHORIZED => "Authentication error".to_owned(),
        STATUS_NOT_FOUND => "object not found".to_owned(),
        _ => body.trim().to_owned(),
    }
}
