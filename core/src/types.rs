//! Domain DTOs for the PetFriends API.
//!
//! # Design
//! Response types mirror the service's JSON but tolerate missing optional
//! fields, since the live service and the mock server differ slightly in what
//! they echo back. Request inputs are plain structs that the builder turns
//! into form fields; they are never serialized as JSON.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Account credentials used to obtain an `AuthKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Opaque session token issued by `GET /api/key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthKey {
    pub key: String,
}

impl AuthKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

/// A pet record as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    #[serde(default)]
    pub pet_photo: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub created_at: Option<serde_json::Value>,
}

/// Body of `GET /api/pets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

impl PetList {
    pub fn contains_id(&self, id: &str) -> bool {
        self.pets.iter().any(|pet| pet.id == id)
    }
}

/// Scope of a pet listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PetFilter {
    #[default]
    All,
    MyPets,
}

impl PetFilter {
    /// Value of the `filter` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            PetFilter::All => "",
            PetFilter::MyPets => "my_pets",
        }
    }
}

/// Age as sent on the wire.
///
/// The service validates ages itself, so any text or integer is accepted here,
/// including negative and oversized values used by the rejection scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetAge(String);

impl PetAge {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PetAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PetAge {
    fn from(value: &str) -> Self {
        PetAge(value.to_string())
    }
}

impl From<String> for PetAge {
    fn from(value: String) -> Self {
        PetAge(value)
    }
}

macro_rules! pet_age_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for PetAge {
            fn from(value: $ty) -> Self {
                PetAge(value.to_string())
            }
        })*
    };
}

pet_age_from_int!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, usize, isize);

/// Fields of a pet to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    pub name: String,
    pub animal_type: String,
    pub age: PetAge,
}

impl NewPet {
    pub fn new(name: impl Into<String>, animal_type: impl Into<String>, age: impl Into<PetAge>) -> Self {
        Self {
            name: name.into(),
            animal_type: animal_type.into(),
            age: age.into(),
        }
    }
}

/// Partial update of a pet. Only the fields set here are sent; omitted fields
/// remain unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetUpdate {
    pub name: Option<String>,
    pub animal_type: Option<String>,
    pub age: Option<PetAge>,
}

impl From<NewPet> for PetUpdate {
    fn from(pet: NewPet) -> Self {
        Self {
            name: Some(pet.name),
            animal_type: Some(pet.animal_type),
            age: Some(pet.age),
        }
    }
}

/// An image (or any file) to upload as `pet_photo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Photo {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a photo from disk. The MIME type is guessed from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ApiError::Photo {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
