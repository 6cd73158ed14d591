//! Stateless HTTP request builder and response parser for the PetFriends API.
//!
//! # Design
//! `PetFriendsClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation has a `build_*` method that produces an
//! `HttpRequest`; every response goes through the single `parse_response`,
//! because the service's statuses are reported to the caller, not mapped to
//! errors. The blocking `PetFriends` client in `transport` executes the
//! round-trip between the two.

use tracing::warn;

use crate::form::{self, MultipartForm};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::response::{ApiResponse, ResponseBody};
use crate::types::{AuthKey, Credentials, NewPet, PetFilter, PetUpdate, Photo};

/// Public PetFriends deployment.
pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru";

/// Header carrying the session token on every call after authentication.
pub const AUTH_KEY_HEADER: &str = "auth_key";

/// Synchronous, stateless client for the PetFriends API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct PetFriendsClient {
    base_url: String,
}

impl Default for PetFriendsClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PetFriendsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_api_key(&self, credentials: &Credentials) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/key", self.base_url),
            headers: vec![
                ("email".to_string(), credentials.email.clone()),
                ("password".to_string(), credentials.password.clone()),
            ],
            body: None,
        }
    }

    pub fn build_list_pets(&self, auth_key: &AuthKey, filter: PetFilter) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!(
                "{}/api/pets?filter={}",
                self.base_url,
                form::encode_value(filter.as_str())
            ),
            headers: vec![auth_header(auth_key)],
            body: None,
        }
    }

    pub fn build_add_new_pet(&self, auth_key: &AuthKey, pet: &NewPet, photo: &Photo) -> HttpRequest {
        let (content_type, body) = MultipartForm::new()
            .text("name", &pet.name)
            .text("animal_type", &pet.animal_type)
            .text("age", pet.age.as_str())
            .file("pet_photo", photo)
            .finish();
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/pets", self.base_url),
            headers: vec![auth_header(auth_key), content_type_header(content_type)],
            body: Some(body),
        }
    }

    pub fn build_add_new_pet_without_photo(&self, auth_key: &AuthKey, pet: &NewPet) -> HttpRequest {
        let body = form::urlencoded(&[
            ("name", pet.name.as_str()),
            ("animal_type", pet.animal_type.as_str()),
            ("age", pet.age.as_str()),
        ]);
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/create_pet_simple", self.base_url),
            headers: vec![
                auth_header(auth_key),
                content_type_header(form::URLENCODED.to_string()),
            ],
            body: Some(body.into_bytes()),
        }
    }

    pub fn build_add_photo_of_pet(&self, auth_key: &AuthKey, pet_id: &str, photo: &Photo) -> HttpRequest {
        let (content_type, body) = MultipartForm::new().file("pet_photo", photo).finish();
        HttpRequest {
            method: HttpMethod::Post,
            url: format!(
                "{}/api/pets/set_photo/{}",
                self.base_url,
                form::encode_value(pet_id)
            ),
            headers: vec![auth_header(auth_key), content_type_header(content_type)],
            body: Some(body),
        }
    }

    pub fn build_update_pet_info(&self, auth_key: &AuthKey, pet_id: &str, update: &PetUpdate) -> HttpRequest {
        let mut fields: Vec<(&str, &str)> = Vec::new();
        if let Some(name) = &update.name {
            fields.push(("name", name.as_str()));
        }
        if let Some(animal_type) = &update.animal_type {
            fields.push(("animal_type", animal_type.as_str()));
        }
        if let Some(age) = &update.age {
            fields.push(("age", age.as_str()));
        }
        HttpRequest {
            method: HttpMethod::Put,
            url: format!("{}/api/pets/{}", self.base_url, form::encode_value(pet_id)),
            headers: vec![
                auth_header(auth_key),
                content_type_header(form::URLENCODED.to_string()),
            ],
            body: Some(form::urlencoded(&fields).into_bytes()),
        }
    }

    pub fn build_delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}/api/pets/{}", self.base_url, form::encode_value(pet_id)),
            headers: vec![auth_header(auth_key)],
            body: None,
        }
    }

    /// Decode a response into `(status, body)`. The status is kept verbatim.
    pub fn parse_response(&self, response: HttpResponse) -> ApiResponse {
        let body = ResponseBody::parse(response.body);
        if let ResponseBody::Text(text) = &body {
            if !text.is_empty() {
                warn!(status = response.status, "response body is not JSON");
            }
        }
        ApiResponse {
            status: response.status,
            body,
        }
    }
}

fn auth_header(auth_key: &AuthKey) -> (String, String) {
    (AUTH_KEY_HEADER.to_string(), auth_key.key.clone())
}

fn content_type_header(value: String) -> (String, String) {
    ("content-type".to_string(), value)
}
