//! End-to-end tests of the REST API against an in-memory store.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use homestash_core::{InventoryStore, ServerConfig, SqliteInventoryStore};
use homestash_server::{create_router, AppState};

fn app() -> Router {
    let store = SqliteInventoryStore::open_in_memory().expect("in-memory store");
    create_router(Arc::new(AppState::new(
        Arc::new(store),
        ServerConfig::default(),
    )))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

async fn get(app: &Router, uri: &str) -> Value {
    let (status, body) = send(app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK, "GET {uri}: {body}");
    body
}

async fn create_item(app: &Router, body: Value) -> Value {
    let (status, body) = send(app, Method::POST, "/api/items", Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

fn names(items: &Value) -> Vec<String> {
    items
        .as_array()
        .expect("array")
        .iter()
        .map(|i| i["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let body = get(&app, "/api/health").await;
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not Found"}));
}

// ============================================================================
// Locations
// ============================================================================

#[tokio::test]
async fn create_location_with_bins() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/locations",
        Some(json!({"name": "Garage", "bins": ["A", "B"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_i64().expect("location id");
    assert_eq!(body["data"]["bins"], json!(["A", "B"]));

    let bins = get(&app, "/api/bins").await;
    let bins = bins["data"].as_array().expect("bins");
    assert_eq!(bins.len(), 2);
    assert!(bins.iter().all(|b| b["location_id"] == id));
    assert_eq!(names(&json!(bins)), vec!["A", "B"]);

    let locations = get(&app, "/api/locations").await;
    assert_eq!(locations["data"][0]["name"], "Garage");
}

#[tokio::test]
async fn create_location_requires_name() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/locations",
        Some(json!({"description": "no name"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Name is required"}));
}

#[tokio::test]
async fn malformed_body_is_internal_error() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/locations")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Internal Server Error");
    assert!(body["details"].as_str().is_some());
}

#[tokio::test]
async fn update_location_removes_omitted_bins() {
    let app = app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/locations",
        Some(json!({"name": "Garage", "bins": ["A", "B"]})),
    )
    .await;
    let location_id = created["data"]["id"].as_i64().unwrap();
    let bins = get(&app, "/api/bins").await;
    let first = bins["data"][0]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/locations/{location_id}"),
        Some(json!({"name": "Garage", "bins": [{"id": first, "name": "A"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bins"], json!([{"id": first, "name": "A"}]));

    let bins = get(&app, "/api/bins").await;
    assert_eq!(bins["data"], json!([{"id": first, "name": "A", "location_id": location_id}]));
}

#[tokio::test]
async fn delete_reports_changes() {
    let app = app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/locations",
        Some(json!({"name": "Attic"})),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/api/locations/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "deleted", "changes": 1}));

    let (status, body) = send(&app, Method::DELETE, &format!("/api/locations/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changes"], 0);
}

// ============================================================================
// Bins and shelves
// ============================================================================

#[tokio::test]
async fn shelf_crud() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/shelves",
        Some(json!({"name": "Top", "location_id": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"], json!({"id": id, "name": "Top", "location_id": 4}));

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/shelves/{id}"),
        Some(json!({"name": "Upper", "location_id": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Upper");

    // Shelves and bins are separate tables
    assert_eq!(get(&app, "/api/bins").await["data"], json!([]));
    assert_eq!(get(&app, "/api/shelves").await["data"][0]["name"], "Upper");

    let (_, body) = send(&app, Method::DELETE, &format!("/api/shelves/{id}"), None).await;
    assert_eq!(body["changes"], 1);
}

#[tokio::test]
async fn bin_without_name_is_rejected() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/bins", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is required");
}

#[tokio::test]
async fn non_numeric_child_id_is_bad_request() {
    let app = app();
    let (status, body) = send(&app, Method::DELETE, "/api/bins/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

// ============================================================================
// Items
// ============================================================================

#[tokio::test]
async fn create_item_echoes_body_and_id() {
    let app = app();
    let body = create_item(
        &app,
        json!({
            "id": "x7k2m9q",
            "name": "Drill",
            "quantity": 1,
            "tags": ["tools"],
            "createdAt": "2024-01-01T00:00:00.000Z"
        }),
    )
    .await;
    assert_eq!(body["message"], "success");
    assert_eq!(body["id"], "x7k2m9q");
    assert_eq!(body["data"]["name"], "Drill");

    let listed = get(&app, "/api/items").await;
    let item = &listed["data"][0];
    assert_eq!(item["id"], "x7k2m9q");
    assert_eq!(item["createdAt"], "2024-01-01T00:00:00.000Z");
    assert_eq!(item["updatedAt"], Value::Null);
    assert_eq!(item["tags"][0]["name"], "tools");

    let tags = get(&app, "/api/tags").await;
    assert_eq!(tags["data"][0]["name"], "tools");
}

#[tokio::test]
async fn duplicate_item_id_is_bad_request() {
    let app = app();
    create_item(&app, json!({"id": "dup", "name": "One"})).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/items",
        Some(json!({"id": "dup", "name": "Two"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "SQLITE_CONSTRAINT");
}

#[tokio::test]
async fn item_without_tags_lists_empty_array() {
    let app = app();
    create_item(&app, json!({"id": "bare", "name": "Box"})).await;
    let listed = get(&app, "/api/items").await;
    assert_eq!(listed["data"][0]["tags"], json!([]));
}

#[tokio::test]
async fn update_item_stamps_updated_at_and_replaces_tags() {
    let app = app();
    create_item(
        &app,
        json!({"id": "i1", "name": "Saw", "tags": ["tools", "sharp"]}),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/items/i1",
        Some(json!({"name": "Hand saw", "quantity": 2, "tags": [{"name": "sharp"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");

    let item = get(&app, "/api/items").await["data"][0].clone();
    assert_eq!(item["name"], "Hand saw");
    assert_eq!(item["quantity"], 2);
    assert!(item["updatedAt"].as_str().is_some());
    assert_eq!(item["tags"].as_array().unwrap().len(), 1);
    assert_eq!(item["tags"][0]["name"], "sharp");
}

#[tokio::test]
async fn delete_item_removes_it() {
    let app = app();
    create_item(&app, json!({"id": "gone", "name": "Old", "tags": ["x"]})).await;
    let (status, body) = send(&app, Method::DELETE, "/api/items/gone", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changes"], 1);
    assert_eq!(get(&app, "/api/items").await["meta"]["total"], 0);
}

#[tokio::test]
async fn pagination_over_twenty_five_items() {
    let app = app();
    for n in 0..25 {
        let body = json!({"id": format!("item{n:02}"), "name": format!("Item {n:02}")});
        create_item(&app, body).await;
    }

    let page1 = get(&app, "/api/items?page=1&limit=10").await;
    assert_eq!(page1["meta"], json!({"total": 25, "page": 1, "limit": 10, "totalPages": 3}));
    assert_eq!(page1["data"].as_array().unwrap().len(), 10);

    let page3 = get(&app, "/api/items?page=3&limit=10").await;
    assert_eq!(page3["data"].as_array().unwrap().len(), 5);

    let page4 = get(&app, "/api/items?page=4&limit=10").await;
    assert_eq!(page4["data"], json!([]));
    assert_eq!(page4["meta"]["total"], 25);
}

#[tokio::test]
async fn sort_and_order() {
    let app = app();
    create_item(&app, json!({"id": "a", "name": "banana", "quantity": 5})).await;
    create_item(&app, json!({"id": "b", "name": "Apple", "quantity": 1})).await;
    create_item(&app, json!({"id": "c", "name": "cherry", "quantity": 3})).await;

    let by_name = get(&app, "/api/items").await;
    assert_eq!(names(&by_name["data"]), vec!["Apple", "banana", "cherry"]);

    let by_quantity = get(&app, "/api/items?sort=quantity&order=desc").await;
    assert_eq!(names(&by_quantity["data"]), vec!["banana", "cherry", "Apple"]);

    // Unknown keys fall back to name; only the literal "desc" flips the order
    let fallback = get(&app, "/api/items?sort=price;DROP%20TABLE%20items&order=DESC").await;
    assert_eq!(names(&fallback["data"]), vec!["Apple", "banana", "cherry"]);
}

#[tokio::test]
async fn search_and_location_filter() {
    let app = app();
    create_item(
        &app,
        json!({"id": "1", "name": "Cordless Drill", "location_id": 1}),
    )
    .await;
    create_item(
        &app,
        json!({"id": "2", "name": "Bits", "description": "for the DRILL", "location_id": 2}),
    )
    .await;
    create_item(&app, json!({"id": "3", "name": "Hammer", "location_id": 1})).await;

    let found = get(&app, "/api/items?search=drill").await;
    assert_eq!(names(&found["data"]), vec!["Bits", "Cordless Drill"]);

    let in_one = get(&app, "/api/items?location_id=1").await;
    assert_eq!(names(&in_one["data"]), vec!["Cordless Drill", "Hammer"]);

    let all = get(&app, "/api/items?location_id=all").await;
    assert_eq!(all["meta"]["total"], 3);

    let both = get(&app, "/api/items?search=drill&location_id=2").await;
    assert_eq!(names(&both["data"]), vec!["Bits"]);
}

#[tokio::test]
async fn on_disk_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("inventory.db");

    {
        let store = SqliteInventoryStore::open(&path).unwrap();
        store.insert_location("Basement", None).unwrap();
    }

    let store = SqliteInventoryStore::open(&path).unwrap();
    let app = create_router(Arc::new(AppState::new(
        Arc::new(store),
        ServerConfig::default(),
    )));
    let locations = get(&app, "/api/locations").await;
    assert_eq!(locations["data"][0]["name"], "Basement");
}

#[tokio::test]
async fn update_location_without_name_is_internal_error() {
    let app = app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/locations",
        Some(json!({"name": "Garage", "bins": ["A"]})),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/locations/{id}"),
        Some(json!({"description": "renamed?", "bins": []})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Name is required");

    // Nothing was written
    let locations = get(&app, "/api/locations").await;
    assert_eq!(locations["data"][0]["name"], "Garage");
    assert_eq!(get(&app, "/api/bins").await["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn page_past_u32_range_is_empty() {
    let app = app();
    for id in ["a", "b", "c"] {
        create_item(&app, json!({"id": id, "name": id})).await;
    }

    let body = get(&app, "/api/items?page=4294967296&limit=10").await;
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["meta"]["page"], u32::MAX);
    assert_eq!(body["meta"]["total"], 3);

    let body = get(&app, "/api/items?limit=99999999999").await;
    assert_eq!(body["meta"]["limit"], 1000);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn sort_by_timestamps() {
    let app = app();
    create_item(&app, json!({"id": "a", "name": "a", "createdAt": "2024-03-01T00:00:00.000Z"}))
        .await;
    create_item(&app, json!({"id": "b", "name": "b", "createdAt": "2024-01-01T00:00:00.000Z"}))
        .await;
    create_item(&app, json!({"id": "c", "name": "c", "createdAt": "2024-02-01T00:00:00.000Z"}))
        .await;

    let asc = get(&app, "/api/items?sort=createdAt").await;
    assert_eq!(names(&asc["data"]), vec!["b", "c", "a"]);
    let desc = get(&app, "/api/items?sort=createdAt&order=desc").await;
    assert_eq!(names(&desc["data"]), vec!["a", "c", "b"]);

    // updatedAt is stamped by the server, so update in a known order
    for id in ["c", "a", "b"] {
        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/items/{id}"),
            Some(json!({"name": id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let asc = get(&app, "/api/items?sort=updatedAt").await;
    assert_eq!(names(&asc["data"]), vec!["c", "a", "b"]);
    let desc = get(&app, "/api/items?sort=updatedAt&order=desc").await;
    assert_eq!(names(&desc["data"]), vec!["b", "a", "c"]);
}

#[tokio::test]
async fn search_ignores_non_ascii_case() {
    let app = app();
    create_item(&app, json!({"id": "1", "name": "Ölfilter"})).await;
    create_item(&app, json!({"id": "2", "name": "Oil can"})).await;

    let found = get(&app, "/api/items?search=%C3%B6l").await;
    assert_eq!(names(&found["data"]), vec!["Ölfilter"]);
    assert_eq!(found["meta"]["total"], 1);
}
