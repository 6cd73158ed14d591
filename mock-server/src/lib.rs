//! In-memory PetFriends service.
//!
//! Serves the same endpoints, headers and form encodings as the public
//! deployment so the client scenarios run without a live account. Unlike the
//! public service it validates pet fields and photo formats, answering 400
//! for values the public service silently accepts.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

/// Highest age the service accepts.
pub const MAX_AGE: u16 = 999;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiKey {
    pub key: String,
}

/// A registered account.
#[derive(Clone, Debug)]
pub struct Account {
    pub email: String,
    pub password: String,
}

impl Account {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

struct User {
    id: String,
    password: String,
    key: String,
}

/// Accounts, issued keys and pets, newest pet first.
#[derive(Default)]
pub struct Store {
    users: HashMap<String, User>,
    key_owners: HashMap<String, String>,
    pets: Vec<Pet>,
}

impl Store {
    /// Register `account` with a fresh user id and a key that stays valid for
    /// the lifetime of the store.
    pub fn register(&mut self, account: Account) {
        let user = User {
            id: Uuid::new_v4().simple().to_string(),
            password: account.password,
            key: Uuid::new_v4().simple().to_string(),
        };
        self.key_owners.insert(user.key.clone(), user.id.clone());
        self.users.insert(account.email, user);
    }

    fn owner_of_key(&self, key: &str) -> Option<&str> {
        self.key_owners.get(key).map(String::as_str)
    }

    /// Index of a pet the caller may modify.
    fn owned_pet(&self, user_id: &str, pet_id: &str) -> Result<usize, Rejection> {
        let index = self
            .pets
            .iter()
            .position(|pet| pet.id == pet_id)
            .ok_or_else(|| Rejection::not_found(format!("Pet {pet_id} not found")))?;
        if self.pets[index].user_id != user_id {
            return Err(Rejection::forbidden("This pet belongs to another user"));
        }
        Ok(index)
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Plain-text error response, the way the public service answers failures.
#[derive(Debug)]
pub struct Rejection {
    status: StatusCode,
    message: String,
}

impl Rejection {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        debug!(status = %self.status, message = %self.message, "request rejected");
        (self.status, self.message).into_response()
    }
}

/// Pet fields as submitted by forms. Every field is optional so the same type
/// serves creation (all required) and partial updates.
#[derive(Debug, Default, Deserialize)]
pub struct PetForm {
    pub name: Option<String>,
    pub animal_type: Option<String>,
    pub age: Option<String>,
}

struct NewPetFields {
    name: String,
    animal_type: String,
    age: String,
}

impl PetForm {
    fn validate(&self) -> Result<(), Rejection> {
        if let Some(name) = &self.name {
            validate_word("name", name)?;
        }
        if let Some(animal_type) = &self.animal_type {
            validate_word("animal_type", animal_type)?;
        }
        if let Some(age) = &self.age {
            validate_age(age)?;
        }
        Ok(())
    }

    fn into_complete(self) -> Result<NewPetFields, Rejection> {
        self.validate()?;
        Ok(NewPetFields {
            name: self.name.ok_or_else(|| missing("name"))?,
            animal_type: self.animal_type.ok_or_else(|| missing("animal_type"))?,
            age: self.age.ok_or_else(|| missing("age"))?,
        })
    }
}

fn missing(field: &str) -> Rejection {
    Rejection::bad_request(format!("Missing field: {field}"))
}

fn validate_word(field: &str, value: &str) -> Result<(), Rejection> {
    if value.chars().any(char::is_alphabetic) {
        Ok(())
    } else {
        Err(Rejection::bad_request(format!("Invalid value for {field}")))
    }
}

fn validate_age(value: &str) -> Result<(), Rejection> {
    match value.trim().parse::<u16>() {
        Ok(age) if age <= MAX_AGE => Ok(()),
        _ => Err(Rejection::bad_request("Invalid value for age")),
    }
}

/// Encode an uploaded image as a data URI. Only JPEG and PNG are accepted,
/// recognized by their magic bytes.
pub fn photo_data_uri(bytes: &[u8]) -> Option<String> {
    let mime = if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else {
        return None;
    };
    Some(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

#[derive(Default)]
struct Upload {
    form: PetForm,
    photo: Option<Vec<u8>>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, Rejection> {
    let mut upload = Upload::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Rejection::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "pet_photo" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Rejection::bad_request(e.body_text()))?;
                upload.photo = Some(bytes.to_vec());
            }
            "name" | "animal_type" | "age" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Rejection::bad_request(e.body_text()))?;
                match name.as_str() {
                    "name" => upload.form.name = Some(text),
                    "animal_type" => upload.form.animal_type = Some(text),
                    _ => upload.form.age = Some(text),
                }
            }
            _ => {}
        }
    }
    Ok(upload)
}

fn require_photo(photo: Option<Vec<u8>>) -> Result<String, Rejection> {
    let bytes = photo.ok_or_else(|| missing("pet_photo"))?;
    photo_data_uri(&bytes).ok_or_else(|| Rejection::bad_request("Photo must be a JPEG or PNG image"))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Resolve the caller's user id from the `auth_key` header.
fn authenticate(store: &Store, headers: &HeaderMap) -> Result<String, Rejection> {
    store
        .owner_of_key(header(headers, "auth_key"))
        .map(str::to_owned)
        .ok_or_else(|| Rejection::forbidden("Please provide a valid auth_key"))
}

pub fn app(accounts: impl IntoIterator<Item = Account>) -> Router {
    let mut store = Store::default();
    for account in accounts {
        store.register(account);
    }
    router(Arc::new(RwLock::new(store)))
}

pub fn router(db: Db) -> Router {
    Router::new()
        .route("/api/key", get(get_api_key))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .route("/api/pets/set_photo/{pet_id}", post(set_photo))
        .route("/api/pets/{pet_id}", put(update_pet).delete(delete_pet))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener, accounts: Vec<Account>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(accounts)).await
}

async fn get_api_key(State(db): State<Db>, headers: HeaderMap) -> Result<Json<ApiKey>, Rejection> {
    let store = db.read().await;
    let email = header(&headers, "email");
    let password = header(&headers, "password");
    store
        .users
        .get(email)
        .filter(|user| user.password == password)
        .map(|user| Json(ApiKey { key: user.key.clone() }))
        .ok_or_else(|| Rejection::forbidden("This user wasn't found in database"))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub filter: String,
}

async fn list_pets(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<PetList>, Rejection> {
    let store = db.read().await;
    let user_id = authenticate(&store, &headers)?;
    let pets = match params.filter.as_str() {
        "" => store.pets.clone(),
        "my_pets" => store
            .pets
            .iter()
            .filter(|pet| pet.user_id == user_id)
            .cloned()
            .collect(),
        other => return Err(Rejection::bad_request(format!("Filter value is incorrect: {other}"))),
    };
    Ok(Json(PetList { pets }))
}

async fn insert_pet(db: &Db, user_id: String, fields: NewPetFields, pet_photo: String) -> Pet {
    let pet = Pet {
        id: Uuid::new_v4().to_string(),
        name: fields.name,
        animal_type: fields.animal_type,
        age: fields.age,
        pet_photo,
        user_id,
        created_at: format!("{:.3}", chrono::Utc::now().timestamp_millis() as f64 / 1000.0),
    };
    db.write().await.pets.insert(0, pet.clone());
    info!(pet_id = %pet.id, name = %pet.name, "pet created");
    pet
}

async fn create_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Pet>, Rejection> {
    let user_id = authenticate(&*db.read().await, &headers)?;
    let upload = read_upload(multipart).await?;
    let fields = upload.form.into_complete()?;
    let pet_photo = require_photo(upload.photo)?;
    Ok(Json(insert_pet(&db, user_id, fields, pet_photo).await))
}

async fn create_pet_simple(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<PetForm>,
) -> Result<Json<Pet>, Rejection> {
    let user_id = authenticate(&*db.read().await, &headers)?;
    let fields = form.into_complete()?;
    Ok(Json(insert_pet(&db, user_id, fields, String::new()).await))
}

async fn set_photo(
    State(db): State<Db>,
    Path(pet_id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Pet>, Rejection> {
    let user_id = {
        let store = db.read().await;
        let user_id = authenticate(&store, &headers)?;
        store.owned_pet(&user_id, &pet_id)?;
        user_id
    };
    let upload = read_upload(multipart).await?;
    let pet_photo = require_photo(upload.photo)?;

    let mut store = db.write().await;
    let index = store.owned_pet(&user_id, &pet_id)?;
    let pet = &mut store.pets[index];
    pet.pet_photo = pet_photo;
    info!(pet_id = %pet.id, "pet photo replaced");
    Ok(Json(pet.clone()))
}

async fn update_pet(
    State(db): State<Db>,
    Path(pet_id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<PetForm>,
) -> Result<Json<Pet>, Rejection> {
    let mut store = db.write().await;
    let user_id = authenticate(&store, &headers)?;
    let index = store.owned_pet(&user_id, &pet_id)?;
    form.validate()?;

    let pet = &mut store.pets[index];
    if let Some(name) = form.name {
        pet.name = name;
    }
    if let Some(animal_type) = form.animal_type {
        pet.animal_type = animal_type;
    }
    if let Some(age) = form.age {
        pet.age = age;
    }
    info!(pet_id = %pet.id, "pet updated");
    Ok(Json(pet.clone()))
}

async fn delete_pet(
    State(db): State<Db>,
    Path(pet_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, Rejection> {
    let mut store = db.write().await;
    let user_id = authenticate(&store, &headers)?;
    let index = store.owned_pet(&user_id, &pet_id)?;
    let pet = store.pets.remove(index);
    info!(pet_id = %pet.id, "pet deleted");
    Ok(StatusCode::OK)
}
