//! In-process HTTP tests for the book instance routes

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use catalog_server::{
    api, config::AppConfig, repository::MemoryStore, services::Services, AppState,
};

fn app(store: &MemoryStore) -> Router {
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(Services::new(Arc::new(store.clone()))),
    };
    api::router(state)
}

async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");
    app.clone().oneshot(request).await.expect("Failed to send request")
}

async fn post_form(app: &Router, uri: &str, form: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("Failed to build request");
    app.clone().oneshot(request).await.expect("Failed to send request")
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("No location header")
}

async fn json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Failed to parse response")
}

#[tokio::test]
async fn test_health_check() {
    let store = MemoryStore::new();
    let app = app(&store);

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["status"], "healthy");

    let response = get(&app, "/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["status"], "ready");
}

#[tokio::test]
async fn test_create_form_lists_books() {
    let store = MemoryStore::new();
    store.add_book("Persuasion").await;
    store.add_book("Emma").await;
    let app = app(&store);

    let response = get(&app, "/catalog/bookinstance/create").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["template"], "bookinstance_form");
    assert_eq!(body["title"], "Create BookInstance");
    assert_eq!(body["book_list"][0]["title"], "Emma");
    assert_eq!(body["book_list"][1]["title"], "Persuasion");
    assert_eq!(body["errors"], serde_json::json!([]));
}

#[tokio::test]
async fn test_create_then_detail() {
    let store = MemoryStore::new();
    let book = store.add_book("Emma").await;
    let app = app(&store);

    let form = format!(
        "book={}&imprint=Penguin+Classics&status=Available&due_back=2024-05-01",
        book.id
    );
    let response = post_form(&app, "/catalog/bookinstance/create", &form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/bookinstance/1");

    let response = get(&app, "/catalog/bookinstance/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["template"], "bookinstance_detail");
    assert_eq!(body["bookinstance"]["book"]["title"], "Emma");
    assert_eq!(body["bookinstance"]["imprint"], "Penguin Classics");
    assert_eq!(body["bookinstance"]["status"], "Available");
    assert_eq!(body["bookinstance"]["due_back"], "2024-05-01");
    assert_eq!(body["bookinstance"]["due_back_formatted"], "May 1, 2024");
}

#[tokio::test]
async fn test_create_invalid_rerenders_form() {
    let store = MemoryStore::new();
    store.add_book("Emma").await;
    let app = app(&store);

    let response = post_form(&app, "/catalog/bookinstance/create", "book=&imprint=Penguin").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["template"], "bookinstance_form");
    assert_eq!(body["errors"][0]["field"], "book");
    assert_eq!(body["errors"][0]["message"], "Book must be specified");
    assert_eq!(body["bookinstance"]["imprint"], "Penguin");
    assert_eq!(body["book_list"][0]["title"], "Emma");
    assert_eq!(store.book_instances_count().await, 0);
}

#[tokio::test]
async fn test_create_for_unknown_book_is_fatal() {
    let store = MemoryStore::new();
    let app = app(&store);

    let response = post_form(&app, "/catalog/bookinstance/create", "book=12&imprint=Penguin").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_update_flow() {
    let store = MemoryStore::new();
    let book = store.add_book("Emma").await;
    let app = app(&store);

    let form = format!("book={}&imprint=Penguin", book.id);
    post_form(&app, "/catalog/bookinstance/create", &form).await;

    let response = get(&app, "/catalog/bookinstance/1/update").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["title"], "Update Book Instance");
    assert_eq!(body["current_status"], "Maintenance");
    assert_eq!(
        body["states"],
        serde_json::json!(["Available", "Loaned", "Reserved"])
    );

    let response = post_form(
        &app,
        "/catalog/bookinstance/1/update",
        "imprint=Vintage&status=Loaned&due_back=2024-06-01",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/bookinstance/1");

    let body = json(get(&app, "/catalog/bookinstance/1").await).await;
    assert_eq!(body["bookinstance"]["id"], 1);
    assert_eq!(body["bookinstance"]["book"]["id"], book.id);
    assert_eq!(body["bookinstance"]["imprint"], "Vintage");
    assert_eq!(body["bookinstance"]["status"], "Loaned");
    assert_eq!(body["bookinstance"]["due_back"], "2024-06-01");
    assert_eq!(store.book_instances_count().await, 1);
}

#[tokio::test]
async fn test_update_invalid_rerenders_form() {
    let store = MemoryStore::new();
    let book = store.add_book("Emma").await;
    let app = app(&store);
    post_form(&app, "/catalog/bookinstance/create", &format!("book={}&imprint=Penguin", book.id)).await;

    let response = post_form(&app, "/catalog/bookinstance/1/update", "imprint=Vintage&status=Lost").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["bookinstance"]["imprint"], "Vintage");
    assert_eq!(body["bookinstance"]["id"], 1);
    assert_eq!(body["errors"][0]["field"], "status");
    assert_eq!(body["errors"][1]["field"], "due_back");
    assert_eq!(body["current_status"], "Maintenance");
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let store = MemoryStore::new();
    let app = app(&store);

    let response = get(&app, "/catalog/bookinstance/7/update").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(response).await["error"], "NoSuchItem");

    let response = get(&app, "/catalog/bookinstance/7").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = MemoryStore::new();
    let book = store.add_book("Emma").await;
    let app = app(&store);

    let response = post_form(&app, "/catalog/bookinstance/99/delete", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/bookinstances");

    let response = get(&app, "/catalog/bookinstance/99/delete").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/bookinstances");

    post_form(&app, "/catalog/bookinstance/create", &format!("book={}&imprint=Penguin", book.id)).await;

    let body = json(get(&app, "/catalog/bookinstance/1/delete").await).await;
    assert_eq!(body["template"], "bookinstance_delete");
    assert_eq!(body["name"], "Emma");

    for _ in 0..2 {
        let response = post_form(&app, "/catalog/bookinstance/1/delete", "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/catalog/bookinstances");
    }
    assert_eq!(store.book_instances_count().await, 0);
}

#[tokio::test]
async fn test_delete_out_of_range_id_redirects_to_list() {
    let store = MemoryStore::new();
    let app = app(&store);

    for uri in ["/catalog/bookinstance/99999999999/delete", "/catalog/bookinstance/abc/delete"] {
        let response = post_form(&app, uri, "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/catalog/bookinstances");

        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/catalog/bookinstances");
    }
}

#[tokio::test]
async fn test_list() {
    let store = MemoryStore::new();
    let book = store.add_book("Emma").await;
    let app = app(&store);
    post_form(&app, "/catalog/bookinstance/create", &format!("book={}&imprint=Penguin", book.id)).await;

    let body = json(get(&app, "/catalog/bookinstances").await).await;
    assert_eq!(body["template"], "bookinstance_list");
    assert_eq!(body["bookinstance_list"][0]["url"], "/catalog/bookinstance/1");
    assert_eq!(body["bookinstance_list"][0]["book"]["title"], "Emma");
}
