//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and the expected decoded result. JSON bodies are compared as parsed values
//! so field ordering never matters.

use petfriends_core::{
    ApiResponse, AuthKey, Credentials, HttpMethod, HttpRequest, HttpResponse, NewPet, PetFilter,
    PetFriendsClient, PetUpdate, ResponseBody,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> PetFriendsClient {
    PetFriendsClient::new(BASE_URL)
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn str_field<'a>(case: &'a Value, field: &str) -> &'a str {
    case[field].as_str().unwrap_or_else(|| panic!("missing string field {field}"))
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(str_field(expected, "method")), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", str_field(expected, "path")), "{name}: url");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected.get("body").and_then(Value::as_str) {
        Some(body) => {
            let actual = String::from_utf8(req.body.clone().unwrap()).unwrap();
            assert_eq!(actual, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn simulate(c: &PetFriendsClient, case: &Value) -> ApiResponse {
    let sim = &case["simulated_response"];
    c.parse_response(HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    })
}

fn check_parsed(name: &str, resp: &ApiResponse, case: &Value) {
    assert_eq!(u64::from(resp.status), case["expected_status"].as_u64().unwrap(), "{name}: status");
    if let Some(json) = case.get("expected_json") {
        assert_eq!(resp.body, ResponseBody::Json(json.clone()), "{name}: json body");
    }
    if let Some(text) = case.get("expected_text").and_then(Value::as_str) {
        assert_eq!(resp.body.as_text(), Some(text), "{name}: text body");
    }
}

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

#[test]
fn key_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/key.json")) {
        let name = str_field(&case, "name");
        let input = &case["input"];
        let credentials = Credentials::new(str_field(input, "email"), str_field(input, "password"));

        check_request(name, &c.build_get_api_key(&credentials), &case["expected_request"]);

        let resp = simulate(&c, &case);
        check_parsed(name, &resp, &case);
        if resp.is_success() {
            assert!(!resp.auth_key().unwrap().as_str().is_empty(), "{name}: key");
        }
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = str_field(&case, "name");
        let key = AuthKey::new(str_field(&case, "auth_key"));
        let filter = match str_field(&case, "filter") {
            "" => PetFilter::All,
            "my_pets" => PetFilter::MyPets,
            other => panic!("{name}: unknown filter {other}"),
        };

        check_request(name, &c.build_list_pets(&key, filter), &case["expected_request"]);

        let resp = simulate(&c, &case);
        check_parsed(name, &resp, &case);
        let ids: Vec<String> = resp.pets().unwrap().pets.into_iter().map(|pet| pet.id).collect();
        let expected: Vec<String> = serde_json::from_value(case["expected_pet_ids"].clone()).unwrap();
        assert_eq!(ids, expected, "{name}: pet ids");
    }
}

// ---------------------------------------------------------------------------
// Create without photo
// ---------------------------------------------------------------------------

#[test]
fn create_simple_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create_simple.json")) {
        let name = str_field(&case, "name");
        let key = AuthKey::new(str_field(&case, "auth_key"));
        let input = &case["input"];
        let pet = NewPet::new(
            str_field(input, "name"),
            str_field(input, "animal_type"),
            str_field(input, "age"),
        );

        check_request(name, &c.build_add_new_pet_without_photo(&key, &pet), &case["expected_request"]);
        check_parsed(name, &simulate(&c, &case), &case);
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update.json")) {
        let name = str_field(&case, "name");
        let key = AuthKey::new(str_field(&case, "auth_key"));
        let input = &case["input"];
        let update = PetUpdate {
            name: input["name"].as_str().map(str::to_string),
            animal_type: input["animal_type"].as_str().map(str::to_string),
            age: input["age"].as_str().map(Into::into),
        };

        let req = c.build_update_pet_info(&key, str_field(&case, "pet_id"), &update);
        check_request(name, &req, &case["expected_request"]);
        check_parsed(name, &simulate(&c, &case), &case);
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = str_field(&case, "name");
        let key = AuthKey::new(str_field(&case, "auth_key"));

        let req = c.build_delete_pet(&key, str_field(&case, "pet_id"));
        check_request(name, &req, &case["expected_request"]);
        check_parsed(name, &simulate(&c, &case), &case);
    }
}
