use mock_server::Account;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let email = std::env::var("MOCK_EMAIL").unwrap_or_else(|_| "user@example.com".to_string());
    let password = std::env::var("MOCK_PASSWORD").unwrap_or_else(|_| "secret".to_string());

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, %email, "mock PetFriends listening");
    mock_server::run(listener, vec![Account::new(email, password)]).await
}
