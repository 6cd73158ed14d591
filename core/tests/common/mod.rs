//! Shared setup for the client test binaries.
#![allow(dead_code)]

use std::path::PathBuf;

use mock_server::Account;
use petfriends_core::{AuthKey, PetFriends};

pub const EMAIL: &str = "owner@example.com";
pub const PASSWORD: &str = "secret";
pub const OTHER_EMAIL: &str = "other@example.com";

/// Install a test-friendly subscriber once per binary; `RUST_LOG` overrides the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Start a fresh mock service on a random port and return its base URL.
///
/// The server runs on its own thread with a current-thread runtime and lives
/// until the test binary exits.
pub fn spawn_mock() -> String {
    init_tracing();

    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(
                listener,
                vec![
                    Account::new(EMAIL, PASSWORD),
                    Account::new(OTHER_EMAIL, PASSWORD),
                ],
            )
            .await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Path of a file under `tests/images`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("images")
        .join(name)
}

/// Obtain an auth key, failing the test if the service refuses.
pub fn login(pf: &PetFriends, email: &str, password: &str) -> AuthKey {
    let resp = pf.get_api_key(email, password).unwrap();
    assert_eq!(resp.status, 200, "login failed: {:?}", resp.body);
    resp.auth_key().unwrap()
}
