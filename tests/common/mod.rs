//! Shared utilities for integration testing.

use console_api::config::ApiConfig;
use console_api::http::HttpServer;
use console_api::lifecycle::Shutdown;

/// Start the API on an ephemeral port with test-friendly config and
/// return its base URL plus the shutdown handle that keeps it alive.
///
/// The database pools are lazy, so pointing them at an unused port is
/// fine as long as the test never hits a database-backed route.
pub async fn spawn_app() -> (String, Shutdown) {
    spawn_app_with(ApiConfig::default()).await
}

pub async fn spawn_app_with(mut config: ApiConfig) -> (String, Shutdown) {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.database.write_url = "mysql://probe@127.0.0.1:13306/probe".to_string();
    config.database.read_url = "mysql://probe@127.0.0.1:13306/probe".to_string();
    config.database.acquire_timeout_secs = 1;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config).await.unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (format!("http://{}", addr), shutdown)
}

/// Client that ignores any proxy configured in the environment.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
