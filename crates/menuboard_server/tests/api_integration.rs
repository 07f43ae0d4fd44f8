//! Integration tests for the Menuboard HTTP API.

mod support;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};
use menuboard_core::db::TransactionOps;
use std::sync::mpsc;
use std::time::Duration;
use support::{
    add_item, create_menu, login, setup_test_server, setup_test_server_with_state,
    test_config_for_dir, test_server_for_config,
};
use tempfile::TempDir;

fn ids(items: &Value) -> Vec<String> {
    items
        .as_array()
        .expect("item array")
        .iter()
        .map(|item| item["id"].as_str().expect("id").to_string())
        .collect()
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let (server, _temp) = setup_test_server();

    let response = server
        .post("/login")
        .json(&json!({ "username": "  chef ", "password": "mise-en-place" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie")
        .to_str()
        .expect("ascii");
    assert!(cookie.starts_with("session=1."));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=43200"));
}

#[tokio::test]
async fn test_login_rejects_wrong_credentials() {
    let (server, _temp) = setup_test_server();

    let response = server
        .post("/login")
        .json(&json!({ "username": "chef", "password": "wrong" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid username or password.");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_login_without_auth_env_is_server_error() {
    let temp = TempDir::new().expect("temp dir");
    let server = test_server_for_config(test_config_for_dir(temp.path(), false));

    let response = server
        .post("/login")
        .json(&json!({ "username": "chef", "password": "mise-en-place" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Auth environment variables are not configured.");

    let menus = server.get("/menus").await;
    assert_eq!(menus.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let (server, _temp) = setup_test_server();
    let response = server.post("/logout").await;
    response.assert_status_ok();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie")
        .to_str()
        .expect("ascii");
    assert!(cookie.starts_with("session=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_api_routes_require_valid_session() {
    let (server, _temp) = setup_test_server();

    let anonymous = server.get("/menus").await;
    assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = anonymous.json();
    assert_eq!(body["error"], "Unauthorized");

    let forged = server
        .post("/menus")
        .add_header(header::COOKIE, HeaderValue::from_static("session=1.forged"))
        .await;
    assert_eq!(forged.status_code(), StatusCode::UNAUTHORIZED);

    let cookie = login(&server).await;
    let allowed = server
        .get("/menus")
        .add_header(header::COOKIE, cookie)
        .await;
    allowed.assert_status_ok();
}

#[tokio::test]
async fn test_admin_pages_redirect_to_login() {
    let (server, _temp) = setup_test_server();

    let response = server.get("/admin").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).expect("location"),
        "/login"
    );

    let nested = server.get("/admin/menus/anything").await;
    assert_eq!(nested.status_code(), StatusCode::SEE_OTHER);

    let unrouted = server.get("/admin/settings/billing").await;
    assert_eq!(unrouted.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(
        unrouted.headers().get(header::LOCATION).expect("location"),
        "/login"
    );
    let outside = server.get("/administrator").await;
    assert_eq!(outside.status_code(), StatusCode::NOT_FOUND);

    let cookie = login(&server).await;
    let dashboard = server
        .get("/admin")
        .add_header(header::COOKIE, cookie.clone())
        .await;
    dashboard.assert_status_ok();

    let unknown_page = server
        .get("/admin/settings/billing")
        .add_header(header::COOKIE, cookie.clone())
        .await;
    assert_eq!(unknown_page.status_code(), StatusCode::NOT_FOUND);
    let body: Value = unknown_page.json();
    assert_eq!(body["error"], "Not found");

    let login_page = server
        .get("/login")
        .add_header(header::COOKIE, cookie)
        .await;
    assert_eq!(login_page.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(
        login_page.headers().get(header::LOCATION).expect("location"),
        "/admin"
    );

    let anonymous_login = server.get("/login").await;
    anonymous_login.assert_status_ok();
    let body: Value = anonymous_login.json();
    assert_eq!(body["authenticated"], false);
}

#[tokio::test]
async fn test_menu_lifecycle() {
    let (server, _temp) = setup_test_server();
    let cookie = login(&server).await;

    let created = server
        .post("/menus")
        .add_header(header::COOKIE, cookie.clone())
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let menu: Value = created.json();
    assert_eq!(menu["title"], "New Menu");
    assert_eq!(menu["status"], "DRAFT");
    assert_eq!(menu["titleFontSize"], 44);
    let menu_id = menu["id"].as_str().expect("id").to_string();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second_id = create_menu(&server, &cookie).await;
    let listed: Value = server
        .get("/menus")
        .add_header(header::COOKIE, cookie.clone())
        .await
        .json();
    assert_eq!(ids(&listed), vec![second_id.clone(), menu_id.clone()]);

    let patched = server
        .patch(&format!("/menus/{}", menu_id))
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "title": "  Lunch ", "status": "PUBLISHED", "contentWidth": 700 }))
        .await;
    patched.assert_status_ok();
    let patched: Value = patched.json();
    assert_eq!(patched["title"], "Lunch");
    assert_eq!(patched["status"], "PUBLISHED");
    assert_eq!(patched["contentWidth"], 700);
    assert_eq!(patched["itemFontSize"], 18);

    let fetched: Value = server
        .get(&format!("/menus/{}", menu_id))
        .add_header(header::COOKIE, cookie.clone())
        .await
        .json();
    assert_eq!(fetched["menu"]["title"], "Lunch");
    assert_eq!(fetched["items"], json!([]));

    let deleted = server
        .delete(&format!("/menus/{}", second_id))
        .add_header(header::COOKIE, cookie.clone())
        .await;
    deleted.assert_status_ok();
    let missing = server
        .get(&format!("/menus/{}", second_id))
        .add_header(header::COOKIE, cookie)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    let body: Value = missing.json();
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_menu_patch_validation() {
    let (server, _temp) = setup_test_server();
    let cookie = login(&server).await;
    let menu_id = create_menu(&server, &cookie).await;

    let cases = [
        (json!({ "titleFontSize": 23 }), "titleFontSize must be between 24 and 80"),
        (json!({ "title": "   " }), "title cannot be empty"),
        (json!({ "overlayOpacity": -1 }), "overlayOpacity must be between 0 and 80"),
    ];
    for (body, message) in cases {
        let response = server
            .patch(&format!("/menus/{}", menu_id))
            .add_header(header::COOKIE, cookie.clone())
            .json(&body)
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let error: Value = response.json();
        assert_eq!(error["error"], message);
    }

    let status = server
        .patch(&format!("/menus/{}", menu_id))
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "status": "ARCHIVED" }))
        .await;
    assert_eq!(status.status_code(), StatusCode::BAD_REQUEST);

    let traversal = server
        .patch(&format!("/menus/{}", menu_id))
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "backgroundImagePath": "/etc/passwd" }))
        .await;
    assert_eq!(traversal.status_code(), StatusCode::BAD_REQUEST);

    for ok in [24, 80] {
        let response = server
            .patch(&format!("/menus/{}", menu_id))
            .add_header(header::COOKIE, cookie.clone())
            .json(&json!({ "titleFontSize": ok }))
            .await;
        response.assert_status_ok();
    }

    let set = server
        .patch(&format!("/menus/{}", menu_id))
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "backgroundImagePath": "/uploads/x.png" }))
        .await;
    let set: Value = set.json();
    assert_eq!(set["backgroundImagePath"], "/uploads/x.png");

    let cleared = server
        .patch(&format!("/menus/{}", menu_id))
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "backgroundImagePath": null }))
        .await;
    let cleared: Value = cleared.json();
    assert!(cleared["backgroundImagePath"].is_null());
    assert_eq!(cleared["titleFontSize"], 80);

    let missing = server
        .patch("/menus/does-not-exist")
        .add_header(header::COOKIE, cookie)
        .json(&json!({ "titleFontSize": 30 }))
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_item_creation_rules() {
    let (server, _temp) = setup_test_server();
    let cookie = login(&server).await;
    let menu_id = create_menu(&server, &cookie).await;
    let items_path = format!("/menus/{}/items", menu_id);

    let category = server
        .post(&items_path)
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "type": "CATEGORY", "name": "Starters", "price": "4" }))
        .await;
    assert_eq!(category.status_code(), StatusCode::CREATED);
    let category: Value = category.json();
    assert_eq!(category["type"], "CATEGORY");
    assert!(category["price"].is_null());
    assert_eq!(category["position"], 0);

    let soup = server
        .post(&items_path)
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "name": "Soup" }))
        .await;
    assert_eq!(soup.status_code(), StatusCode::BAD_REQUEST);
    let error: Value = soup.json();
    assert_eq!(error["error"], "price required for item type");

    let unknown = server
        .post(&items_path)
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "type": "DRINK", "name": "Tea", "price": "2" }))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::BAD_REQUEST);

    let priced = add_item(&server, &cookie, &menu_id, "Soup").await;
    assert_eq!(priced["type"], "ITEM");
    assert_eq!(priced["position"], 1);

    let orphan = server
        .post("/menus/missing/items")
        .add_header(header::COOKIE, cookie)
        .json(&json!({ "name": "Ghost", "price": "1" }))
        .await;
    assert_eq!(orphan.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reorder_scenario_and_edges() {
    let (server, _temp) = setup_test_server();
    let cookie = login(&server).await;
    let menu_id = create_menu(&server, &cookie).await;

    let a = add_item(&server, &cookie, &menu_id, "A").await;
    let b = add_item(&server, &cookie, &menu_id, "B").await;
    let c = add_item(&server, &cookie, &menu_id, "C").await;
    let reorder_path = format!("/menus/{}/items/reorder", menu_id);

    let moved = server
        .patch(&reorder_path)
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "itemId": c["id"], "direction": "up" }))
        .await;
    moved.assert_status_ok();
    let moved: Value = moved.json();
    let names: Vec<&str> = moved
        .as_array()
        .expect("array")
        .iter()
        .map(|item| item["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["A", "C", "B"]);
    assert_eq!(moved[0]["position"], 0);
    assert_eq!(moved[1]["position"], 1);
    assert_eq!(moved[2]["position"], 2);
    assert_eq!(moved[2]["id"], b["id"]);

    let edge = server
        .patch(&reorder_path)
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "itemId": a["id"], "direction": "up" }))
        .await;
    assert_eq!(edge.status_code(), StatusCode::BAD_REQUEST);
    let error: Value = edge.json();
    assert_eq!(error["error"], "Cannot move item further.");

    let malformed = server
        .patch(&reorder_path)
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "itemId": a["id"], "direction": "left" }))
        .await;
    assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);
    let error: Value = malformed.json();
    assert_eq!(error["error"], "itemId and direction are required.");

    let unknown = server
        .patch(&reorder_path)
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "itemId": "nope", "direction": "down" }))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);

    let listed: Value = server
        .get(&format!("/menus/{}/items", menu_id))
        .add_header(header::COOKIE, cookie)
        .await
        .json();
    assert_eq!(ids(&listed), ids(&moved));
}

#[tokio::test]
async fn test_item_update_and_delete() {
    let (server, _temp) = setup_test_server();
    let cookie = login(&server).await;
    let menu_id = create_menu(&server, &cookie).await;
    let other_menu = create_menu(&server, &cookie).await;

    let a = add_item(&server, &cookie, &menu_id, "A").await;
    let b = add_item(&server, &cookie, &menu_id, "B").await;
    let c = add_item(&server, &cookie, &menu_id, "C").await;
    let b_path = format!("/menus/{}/items/{}", menu_id, b["id"].as_str().expect("id"));

    let renamed = server
        .patch(&b_path)
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "name": "Bread", "price": "3.00" }))
        .await;
    renamed.assert_status_ok();
    let renamed: Value = renamed.json();
    assert_eq!(renamed["name"], "Bread");
    assert_eq!(renamed["price"], "3.00");

    let cleared_price = server
        .patch(&b_path)
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "price": "  " }))
        .await;
    assert_eq!(cleared_price.status_code(), StatusCode::BAD_REQUEST);

    let foreign = server
        .patch(&format!(
            "/menus/{}/items/{}",
            other_menu,
            b["id"].as_str().expect("id")
        ))
        .add_header(header::COOKIE, cookie.clone())
        .json(&json!({ "name": "Hijack" }))
        .await;
    assert_eq!(foreign.status_code(), StatusCode::NOT_FOUND);

    let deleted = server
        .delete(&b_path)
        .add_header(header::COOKIE, cookie.clone())
        .await;
    deleted.assert_status_ok();
    let body: Value = deleted.json();
    assert_eq!(body["success"], true);

    let again = server
        .delete(&b_path)
        .add_header(header::COOKIE, cookie.clone())
        .await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);

    let listed: Value = server
        .get(&format!("/menus/{}/items", menu_id))
        .add_header(header::COOKIE, cookie)
        .await
        .json();
    assert_eq!(listed[0]["id"], a["id"]);
    assert_eq!(listed[0]["position"], 0);
    assert_eq!(listed[1]["id"], c["id"]);
    assert_eq!(listed[1]["position"], 2);
}

#[tokio::test]
async fn test_upload_stores_and_serves_image() {
    let (server, _temp) = setup_test_server();
    let cookie = login(&server).await;

    let bytes = b"\x89PNG\r\n\x1a\nnot-really-a-png".to_vec();
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes.clone())
            .file_name("qr.png")
            .mime_type("image/png"),
    );
    let response = server
        .post("/upload")
        .add_header(header::COOKIE, cookie.clone())
        .multipart(form)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let path = body["path"].as_str().expect("path");
    assert!(path.starts_with("/uploads/"));
    assert!(path.ends_with(".png"));

    let served = server.get(path).await;
    served.assert_status_ok();
    assert_eq!(served.as_bytes().to_vec(), bytes);

    let patched = server
        .patch(&format!("/menus/{}", create_menu(&server, &cookie).await))
        .add_header(header::COOKIE, cookie)
        .json(&json!({ "zelleImagePath": path }))
        .await;
    patched.assert_status_ok();
}

#[tokio::test]
async fn test_upload_rejects_bad_input() {
    let (server, _temp) = setup_test_server();
    let cookie = login(&server).await;

    let gif = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"GIF89a".to_vec())
            .file_name("anim.gif")
            .mime_type("image/gif"),
    );
    let response = server
        .post("/upload")
        .add_header(header::COOKIE, cookie.clone())
        .multipart(gif)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Only JPG, PNG, and WEBP files are allowed.");

    let missing = MultipartForm::new().add_text("note", "no file here");
    let response = server
        .post("/upload")
        .add_header(header::COOKIE, cookie)
        .multipart(missing)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "File is required.");

    let anonymous = server
        .post("/upload")
        .multipart(MultipartForm::new().add_text("note", "x"))
        .await;
    assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let (server, _temp) = setup_test_server();
    let response = server.get("/login").await;
    let headers = response.headers();
    assert_eq!(
        headers.get(header::X_CONTENT_TYPE_OPTIONS).expect("nosniff"),
        "nosniff"
    );
    assert_eq!(headers.get(header::X_FRAME_OPTIONS).expect("frame"), "DENY");
    assert!(headers.get(header::CONTENT_SECURITY_POLICY).is_some());
}

#[tokio::test]
async fn test_item_mutation_waits_for_menu_lock_off_the_runtime() {
    let (server, state, _temp) = setup_test_server_with_state();
    let cookie = login(&server).await;
    let menu_id = create_menu(&server, &cookie).await;

    let (held_tx, held_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let db = state.db.clone();
    let locked_menu = menu_id.clone();
    let holder = std::thread::spawn(move || {
        let _guard = TransactionOps::acquire_menu_guard(&db, &locked_menu).expect("menu guard");
        held_tx.send(()).expect("signal held");
        let _ = release_rx.recv_timeout(Duration::from_secs(5));
    });
    held_rx.recv().expect("lock held");

    let blocked = tokio::time::timeout(
        Duration::from_millis(100),
        server
            .post(&format!("/menus/{}/items", menu_id))
            .add_header(header::COOKIE, cookie.clone())
            .json(&json!({ "name": "Soup", "price": "6" })),
    )
    .await;
    assert!(blocked.is_err(), "add should wait while the menu is locked");

    release_tx.send(()).expect("release");
    holder.join().expect("holder thread");

    let added = add_item(&server, &cookie, &menu_id, "Salad").await;
    assert_eq!(added["name"], "Salad");
}
