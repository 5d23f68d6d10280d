//! Shared harness: boots the full application (router, relay, in-memory
//! sqlite) on an ephemeral port so tests drive it exactly like a browser
//! client would, over HTTP and WebSocket.

use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tourcraft::{
    AppState, app,
    config::Config,
    db,
    relay::Relay,
    tours::model::{Step, TourUpdate},
};

pub async fn spawn_app() -> (String, String) {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open");
    db::init_schema(&db_pool).await.expect("schema should apply");

    let config = Arc::new(Config {
        port: 0,
        database_url: "sqlite::memory:".to_owned(),
        jwt_secret: "integration-test-secret".to_owned(),
        token_expiry_hours: 1,
    });

    let state = AppState {
        db_pool,
        relay: Arc::new(Relay::new()),
        config,
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port should bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.expect("server should run");
    });

    (format!("http://{addr}"), format!("ws://{addr}/ws"))
}

pub fn step(uri: &str, description: &str) -> Step {
    Step { media_uri: uri.to_owned(), description: description.to_owned() }
}

/// Wait for the next relayed update, failing loudly rather than hanging.
#[allow(dead_code)]
pub async fn recv_update(rx: &mut mpsc::UnboundedReceiver<TourUpdate>) -> TourUpdate {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a relayed update")
        .expect("relay stream closed unexpectedly")
}

/// Assert that nothing arrives on `rx` within a settle window.
#[allow(dead_code)]
pub async fn assert_silent(rx: &mut mpsc::UnboundedReceiver<TourUpdate>) {
    assert!(
        timeout(Duration::from_millis(300), rx.recv()).await.is_err(),
        "expected no relayed update"
    );
}

/// Give the server a moment to process joins sent on other connections;
/// the relay neither acknowledges joins nor replays missed updates, so
/// tests must not publish before membership has settled.
#[allow(dead_code)]
pub async fn let_joins_settle() {
    tokio::time::sleep(Duration::from_millis(150)).await;
}
