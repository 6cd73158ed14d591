//! Decoded `(status, body)` pair returned by every client call.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::types::{AuthKey, Pet, PetList};

/// Body of a response: JSON when it parses, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(raw),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(text) => Some(text),
        }
    }
}

/// Status code and decoded body of one API call. Statuses are passed through
/// verbatim; interpreting them is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Top-level JSON field, if the body is a JSON object containing it.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.as_json().and_then(|value| value.get(field))
    }

    /// Whether the body mentions `field`: as a JSON object key, or anywhere in
    /// a text body.
    pub fn contains_key(&self, field: &str) -> bool {
        match &self.body {
            ResponseBody::Json(value) => value.get(field).is_some(),
            ResponseBody::Text(text) => text.contains(field),
        }
    }

    /// Decode the JSON body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        match &self.body {
            ResponseBody::Json(value) => Ok(serde_json::from_value(value.clone())?),
            ResponseBody::Text(text) => Err(ApiError::UnexpectedBody {
                status: self.status,
                body: text.clone(),
            }),
        }
    }

    pub fn auth_key(&self) -> Result<AuthKey, ApiError> {
        self.json()
    }

    pub fn pets(&self) -> Result<PetList, ApiError> {
        self.json()
    }

    pub fn pet(&self) -> Result<Pet, ApiError> {
        self.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            status,
            body: ResponseBody::parse(body.to_string()),
        }
    }

    #[test]
    fn json_body_is_decoded() {
        let resp = response(200, r#"{"key":"abc"}"#);
        assert!(resp.is_success());
        assert!(resp.contains_key("key"));
        assert_eq!(resp.get("key").and_then(Value::as_str), Some("abc"));
        assert_eq!(resp.auth_key().unwrap().as_str(), "abc");
    }

    #[test]
    fn html_body_is_kept_as_text() {
        let resp = response(403, "<h1>Forbidden</h1>");
        assert!(!resp.is_success());
        assert_eq!(resp.body.as_text(), Some("<h1>Forbidden</h1>"));
        assert!(resp.get("key").is_none());
    }

    #[test]
    fn empty_body_is_text() {
        let resp = response(200, "");
        assert_eq!(resp.body, ResponseBody::Text(String::new()));
    }

    #[test]
    fn typed_decoder_rejects_text_body() {
        let err = response(403, "Forbidden").pets().unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedBody { status: 403, .. }));
    }

    #[test]
    fn typed_decoder_rejects_wrong_shape() {
        let err = response(200, r#"{"pets":"nope"}"#).pets().unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn contains_key_searches_text_bodies() {
        assert!(response(200, "your key is ready").contains_key("key"));
        assert!(!response(200, r#"{"other":1}"#).contains_key("key"));
    }
}
