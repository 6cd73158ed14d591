//! Blocking PetFriends client that executes requests over the network.
//!
//! `PetFriends` pairs a `PetFriendsClient` with a `ureq::Agent`. The agent is
//! configured so 4xx/5xx responses come back as data rather than `Err`,
//! leaving status interpretation to the caller.

use std::path::Path;

use tracing::debug;

use crate::client::PetFriendsClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::response::ApiResponse;
use crate::types::{AuthKey, Credentials, NewPet, PetAge, PetFilter, PetUpdate, Photo};

/// Execute an `HttpRequest` with `agent` and return the raw `HttpResponse`.
pub fn execute(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    debug!(method = req.method.as_str(), url = %req.url, "sending request");

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => with_headers(agent.get(&req.url), &req.headers).call(),
        (HttpMethod::Delete, _) => with_headers(agent.delete(&req.url), &req.headers).call(),
        (HttpMethod::Post, Some(body)) => with_headers(agent.post(&req.url), &req.headers).send(&body[..]),
        (HttpMethod::Post, None) => with_headers(agent.post(&req.url), &req.headers).send_empty(),
        (HttpMethod::Put, Some(body)) => with_headers(agent.put(&req.url), &req.headers).send(&body[..]),
        (HttpMethod::Put, None) => with_headers(agent.put(&req.url), &req.headers).send_empty(),
    }?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    // Listings embed every photo as base64, so the body has no size cap.
    let bytes = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()?;
    let body = String::from_utf8_lossy(&bytes).into_owned();
    debug!(status, url = %req.url, "received response");

    Ok(HttpResponse { status, headers, body })
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Synchronous PetFriends API client.
///
/// Every method performs one HTTP round-trip and returns the status and
/// decoded body. `Err` is reserved for local failures: an unreadable photo or
/// a request that never got a response.
#[derive(Clone)]
pub struct PetFriends {
    client: PetFriendsClient,
    agent: ureq::Agent,
}

impl Default for PetFriends {
    fn default() -> Self {
        Self::with_client(PetFriendsClient::default())
    }
}

impl PetFriends {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(PetFriendsClient::new(base_url))
    }

    pub fn with_client(client: PetFriendsClient) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { client, agent }
    }

    pub fn client(&self) -> &PetFriendsClient {
        &self.client
    }

    fn send(&self, req: HttpRequest) -> Result<ApiResponse, ApiError> {
        let response = execute(&self.agent, req)?;
        Ok(self.client.parse_response(response))
    }

    /// Request an auth key. The body carries `key` on success.
    pub fn get_api_key(&self, email: &str, password: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_get_api_key(&Credentials::new(email, password)))
    }

    /// List all pets or only the caller's. The body carries a `pets` array.
    pub fn get_list_of_pets(&self, auth_key: &AuthKey, filter: PetFilter) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_list_pets(auth_key, filter))
    }

    pub fn add_new_pet(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: impl Into<PetAge>,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse, ApiError> {
        let photo = Photo::from_path(photo_path)?;
        let pet = NewPet::new(name, animal_type, age);
        self.send(self.client.build_add_new_pet(auth_key, &pet, &photo))
    }

    pub fn add_new_pet_without_photo(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: impl Into<PetAge>,
    ) -> Result<ApiResponse, ApiError> {
        let pet = NewPet::new(name, animal_type, age);
        self.send(self.client.build_add_new_pet_without_photo(auth_key, &pet))
    }

    /// Attach a photo to an existing pet, replacing any previous one.
    pub fn add_photo_of_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse, ApiError> {
        let photo = Photo::from_path(photo_path)?;
        self.send(self.client.build_add_photo_of_pet(auth_key, pet_id, &photo))
    }

    pub fn update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        name: &str,
        animal_type: &str,
        age: impl Into<PetAge>,
    ) -> Result<ApiResponse, ApiError> {
        let update = PetUpdate::from(NewPet::new(name, animal_type, age));
        self.update_pet(auth_key, pet_id, &update)
    }

    /// Partial form of `update_pet_info`: only the fields set in `update` are sent.
    pub fn update_pet(&self, auth_key: &AuthKey, pet_id: &str, update: &PetUpdate) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_update_pet_info(auth_key, pet_id, update))
    }

    /// Delete a pet. Only the status is meaningful; the body is usually empty.
    pub fn delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_delete_pet(auth_key, pet_id))
    }
}
