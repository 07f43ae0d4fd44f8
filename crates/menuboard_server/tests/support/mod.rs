//! Shared integration-test server bootstrap helpers.
#![allow(dead_code)]

use axum::http::{header, HeaderValue};
use axum_test::TestServer;
use menuboard_core::config::AuthConfig;
use menuboard_core::session::AdminIdentity;
use menuboard_server::{create_app, AppState, Config, Database};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

pub(crate) const ADMIN_USER: &str = "chef";
pub(crate) const ADMIN_PASS: &str = "mise-en-place";

pub(crate) fn test_config_for_dir(root: &Path, with_auth: bool) -> Config {
    Config {
        port: 0,
        db_path: root.join("db").to_str().expect("db path").to_string(),
        upload_dir: root.join("uploads").to_str().expect("upload dir").to_string(),
        max_upload_size: 1024 * 1024,
        auth: with_auth.then(|| AuthConfig {
            identity: AdminIdentity::new(ADMIN_USER, ADMIN_PASS),
            session_secret: "integration-secret".to_string(),
        }),
        secure_cookies: false,
    }
}

pub(crate) fn test_server_for_config(config: Config) -> TestServer {
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let state = AppState::new(config, db);
    let app = create_app(state, false);
    TestServer::new(app).expect("server")
}

/// Like [`setup_test_server`], but also hands back the shared state so a test
/// can reach the database directly.
pub(crate) fn setup_test_server_with_state() -> (TestServer, AppState, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config_for_dir(temp_dir.path(), true);
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let state = AppState::new(config, db);
    let server = TestServer::new(create_app(state.clone(), false)).expect("server");
    (server, state, temp_dir)
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let server = test_server_for_config(test_config_for_dir(temp_dir.path(), true));
    (server, temp_dir)
}

/// Log in with the test credentials and return a `Cookie` header value.
pub(crate) async fn login(server: &TestServer) -> HeaderValue {
    let response = server
        .post("/login")
        .json(&json!({ "username": ADMIN_USER, "password": ADMIN_PASS }))
        .await;
    response.assert_status_ok();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .expect("ascii cookie")
        .to_string();
    let pair = set_cookie.split(';').next().expect("cookie pair").to_string();
    HeaderValue::from_str(&pair).expect("cookie header")
}

/// Create a menu through the API and return its id.
pub(crate) async fn create_menu(server: &TestServer, cookie: &HeaderValue) -> String {
    let response = server
        .post("/menus")
        .add_header(header::COOKIE, cookie.clone())
        .await;
    assert_eq!(response.status_code(), axum::http::StatusCode::CREATED);
    let menu: serde_json::Value = response.json();
    menu["id"].as_str().expect("menu id").to_string()
}

/// Add a priced item and return its JSON.
pub(crate) async fn add_item(
    server: &TestServer,
    cookie: &HeaderValue,
    menu_id: &str,
    name: &str,
) -> serde_json::Value {
    let response = server
        .post(&format!("/menus/{}/items", menu_id))
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "name": name, "price": "9.50" }))
        .await;
    assert_eq!(response.status_code(), axum::http::StatusCode::CREATED);
    response.json()
}
