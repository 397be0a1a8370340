//! Transport layer: wire-format details (serialization/deserialization).

mod describe;
mod envelope;
mod token;

pub use describe::decode_describe_xml_response;
pub use envelope::{
    ErrorBody, decode_error_body, decode_json_response, fallback_message, reports_failure,
};
pub use token::{decode_token_json_response, encode_token_form};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid XML response: {0}")]
    Xml(#[from] quick_xml::DeError),
}
