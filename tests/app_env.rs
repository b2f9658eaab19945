#[path = "common/mod.rs"]
mod common;

use std::net::SocketAddr;

use common::EnvGuard;
use once_cell::sync::Lazy;
use reqwest::Client;
use tokio::sync::Mutex;

use textaid::{app, build_state_from_env};

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[tokio::test]
async fn state_from_env_serves_fallback_and_audits() {
    let _lock = ENV_MUTEX.lock().await;
    let temp = tempfile::tempdir().unwrap();
    let log_path = temp.path().join("audit.log");

    let mut env = EnvGuard::new();
    env.remove("TEXTAID_API_KEY");
    env.remove("TEXTAID_API_ENDPOINT");
    env.remove("TEXTAID_UPSTREAM_TIMEOUT_MS");
    env.set("LOG_FILE", log_path.to_str().unwrap());

    let state = build_state_from_env().expect("state");
    let app = app(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    let url = format!("http://{}/assist", addr);
    let body = serde_json::json!({
        "text": "Please turn this text into a few bullet points",
        "action": "bullets"
    });
    let resp = Client::new().post(&url).json(&body).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "success");
    assert!(json["data"].as_str().unwrap().contains("bullet"));

    handle.abort();
    let content = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("Action: bullets"));
    assert!(content.contains("Status: success"));
}
