//! Synchronous API client for the PetFriends pet-management service.
//!
//! # Overview
//! `PetFriendsClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern). `PetFriends`
//! wraps it with a blocking `ureq` agent and exposes one method per endpoint,
//! each returning the status code and decoded body of the call.
//!
//! # Design
//! - Statuses are reported, never classified: a 403 is an `Ok(ApiResponse)`.
//! - Bodies decode to JSON when possible and stay as text otherwise.
//! - No client-side validation; the service decides what it accepts.
//! - `Settings` resolves credentials from the environment or a `.env` file.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod response;
pub mod transport;
pub mod types;

pub use client::{PetFriendsClient, DEFAULT_BASE_URL};
pub use config::Settings;
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::{ApiResponse, ResponseBody};
pub use transport::PetFriends;
pub use types::{AuthKey, Credentials, NewPet, Pet, PetAge, PetFilter, PetList, PetUpdate, Photo};
