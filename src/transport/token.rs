use serde::Deserialize;

use crate::auth::Token;
use crate::domain::{ClientId, ClientSecret};
use crate::transport::TransportError;

const GRANT_TYPE: &str = "client_credentials";

#[derive(Debug, Clone, Deserialize)]
struct TokenJsonResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
    expires_in: u64,
    #[serde(default)]
    scope: String,
    #[serde(default)]
    jti: String,
}

pub fn encode_token_form(client_id: &ClientId, client_secret: &ClientSecret) -> Vec<(String, String)> {
    vec![
        ("grant_type".to_owned(), GRANT_TYPE.to_owned()),
        (ClientId::FIELD.to_owned(), client_id.as_str().to_owned()),
        (
            ClientSecret::FIELD.to_owned(),
            client_secret.as_str().to_owned(),
        ),
    ]
}

pub fn decode_token_json_response(json: &str) -> Result<Token, TransportError> {
    let parsed: TokenJsonResponse = serde_json::from_str(json)?;
    Ok(Token {
        access_token: parsed.access_token,
        token_type: parsed.token_type,
        expires_in: parsed.expires_in,
        scope: parsed.scope,
        jti: parsed.jti,
    })
}
