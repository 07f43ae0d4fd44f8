//! Smoke tests for the root facade.

use axum::http::{header, HeaderValue};
use axum_test::TestServer;
use menuboard::config::AuthConfig;
use menuboard::editor::render::{layout_menu, TextTone};
use menuboard::models::menu::Menu;
use menuboard::session::AdminIdentity;
use menuboard::{create_app, AppState, Config, Database};
use serde_json::{json, Value};
use tempfile::TempDir;

fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = Config {
        port: 0,
        db_path: temp_dir.path().join("db").to_str().expect("db path").to_string(),
        upload_dir: temp_dir
            .path()
            .join("uploads")
            .to_str()
            .expect("upload dir")
            .to_string(),
        max_upload_size: 1024 * 1024,
        auth: Some(AuthConfig {
            identity: AdminIdentity::new("owner", "secret-pass"),
            session_secret: "facade-secret".to_string(),
        }),
        secure_cookies: false,
    };
    let db = Database::new(&config.db_path).expect("db");
    let app = create_app(AppState::new(config, db), false);
    (TestServer::new(app).expect("server"), temp_dir)
}

#[tokio::test]
async fn test_facade_serves_authenticated_menu_api() {
    let (server, _temp) = setup_test_server();

    let denied = server.get("/menus").await;
    assert_eq!(denied.status_code().as_u16(), 401);

    let login = server
        .post("/login")
        .json(&json!({ "username": "owner", "password": "secret-pass" }))
        .await;
    login.assert_status_ok();
    let cookie = login
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie")
        .to_str()
        .expect("ascii")
        .split(';')
        .next()
        .expect("pair")
        .to_string();

    let created = server
        .post("/menus")
        .add_header(
            header::COOKIE,
            HeaderValue::from_str(&cookie).expect("cookie value"),
        )
        .await;
    assert_eq!(created.status_code().as_u16(), 201);
    let menu: Value = created.json();
    assert_eq!(menu["title"], "New Menu");
}

#[test]
fn test_facade_exposes_editor_layout() {
    let layout = layout_menu(&Menu::new(), &[], 680, TextTone::Dark);
    assert_eq!(layout.title.text, "New Menu");
}
