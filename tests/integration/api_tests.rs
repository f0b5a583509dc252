//! API integration tests
//!
//! Each test serves the full router on an ephemeral port with an empty store.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use bookshelf_server::{
    api,
    config::{AppConfig, AuthConfig},
    models::{BookClaims, Rights},
    repository::Repository,
    AppState,
};

const SECRET: &str = "integration-test-secret";

struct TestApp {
    base_url: String,
    client: Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str, rights: Rights) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token(rights))
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn post_book(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/books"))
            .bearer_auth(token(Rights::Read))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn list_books(&self) -> Vec<Value> {
        let response = self.get("/books", Rights::Read).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        body.as_array().expect("Expected an array").clone()
    }
}

fn token(rights: Rights) -> String {
    BookClaims::new("tester", rights, 1)
        .create_token(SECRET)
        .expect("Failed to create token")
}

async fn spawn_app() -> TestApp {
    let config = AppConfig {
        auth: AuthConfig {
            jwt_secret: SECRET.to_string(),
            jwt_expiration_hours: 1,
        },
        ..Default::default()
    };
    let app = api::create_router(AppState::new(config, Repository::in_memory()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        base_url: format!("http://{}/api/v1", addr),
        client: Client::new(),
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_book_count() {
    let app = spawn_app().await;
    app.post_book(&json!({"id": 1, "title": "A", "author": "B", "yearPublished": 2000}))
        .await;

    let response = app
        .client
        .get(app.url("/ready"))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
    assert_eq!(body["books"], 1);
}

#[tokio::test]
async fn test_books_require_token() {
    let app = spawn_app().await;

    for request in [
        app.client.get(app.url("/books")),
        app.client.get(app.url("/books/1")),
        app.client
            .post(app.url("/books"))
            .json(&json!({"id": 1, "title": "A", "author": "B", "yearPublished": 2000})),
    ] {
        let response = request.send().await.expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["error"], "NotAuthorized");
    }

    // The rejected create never reached the store
    assert!(app.list_books().await.is_empty());
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/books"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let forged = BookClaims::new("tester", Rights::Write, 1)
        .create_token("some-other-secret")
        .unwrap();
    let response = app
        .client
        .get(app.url("/books"))
        .bearer_auth(forged)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_without_rights_is_forbidden() {
    let app = spawn_app().await;
    let no_rights = token(Rights::None);

    for request in [
        app.client.get(app.url("/books")),
        app.client.get(app.url("/books/1")),
        app.client
            .post(app.url("/books"))
            .json(&json!({"id": 1, "title": "A", "author": "B", "yearPublished": 2000})),
    ] {
        let response = request
            .bearer_auth(&no_rights)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["error"], "NotAuthorized");
    }

    // The forbidden create never reached the store
    assert!(app.list_books().await.is_empty());
}

#[tokio::test]
async fn test_create_get_list_and_duplicate() {
    let app = spawn_app().await;
    let book = json!({"id": 1, "title": "A", "author": "B", "yearPublished": 2000});

    let response = app.post_book(&book).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.text().await.unwrap().is_empty());

    let response = app.get("/books/1", Rights::Read).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, book);

    assert_eq!(app.list_books().await, vec![book.clone()]);

    let response = app.post_book(&book).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book Id already taken");

    assert_eq!(app.list_books().await.len(), 1);
}

#[tokio::test]
async fn test_duplicate_does_not_overwrite() {
    let app = spawn_app().await;
    app.post_book(&json!({"id": 9, "title": "First", "author": "B", "yearPublished": 2000}))
        .await;
    app.post_book(&json!({"id": 9, "title": "Second", "author": "C", "yearPublished": 2001}))
        .await;

    let books = app.list_books().await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "First");
}

#[tokio::test]
async fn test_word_count_round_trips() {
    let app = spawn_app().await;
    let book = json!({"id": 2, "title": "Dune", "author": "Herbert", "yearPublished": 1965, "wordCount": 188000});

    assert_eq!(app.post_book(&book).await.status(), StatusCode::CREATED);

    let body: Value = app
        .get("/books/2", Rights::Read)
        .await
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body, book);
}

#[tokio::test]
async fn test_get_with_non_numeric_id() {
    let app = spawn_app().await;

    let response = app.get("/books/abc", Rights::Read).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Must include numeric id in path");
}

#[tokio::test]
async fn test_get_with_numeric_spellings() {
    let app = spawn_app().await;
    for id in [1, 16, 1000] {
        app.post_book(&json!({"id": id, "title": format!("Book {}", id), "author": "B", "yearPublished": 2000}))
            .await;
    }

    for (segment, id) in [("1.0", 1), ("0x10", 16), ("1e3", 1000)] {
        let response = app.get(&format!("/books/{}", segment), Rights::Read).await;
        assert_eq!(response.status(), StatusCode::OK, "segment: {}", segment);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["id"], id, "segment: {}", segment);
    }

    for segment in ["1.5", "Infinity"] {
        let response = app.get(&format!("/books/{}", segment), Rights::Read).await;
        assert_eq!(response.status(), StatusCode::OK, "segment: {}", segment);
        assert!(response.text().await.unwrap().is_empty(), "segment: {}", segment);
    }
}

#[tokio::test]
async fn test_get_unknown_id_is_empty_success() {
    let app = spawn_app().await;

    let response = app.get("/books/404", Rights::Read).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_without_required_fields() {
    let app = spawn_app().await;

    for body in [
        json!({"title": "A", "author": "B", "yearPublished": 2000}),
        json!({"id": 0, "title": "A", "author": "B", "yearPublished": 2000}),
        json!({"id": 1, "title": "", "author": "B", "yearPublished": 2000}),
        json!({"id": 1, "title": "A", "yearPublished": 2000}),
        json!({"id": 1, "title": "A", "author": "B", "yearPublished": 0}),
        json!({}),
    ] {
        let response = app.post_book(&body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);

        let error: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(error["message"], "Please include required fields.");
    }

    assert!(app.list_books().await.is_empty());
}

#[tokio::test]
async fn test_create_with_malformed_body() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/books"))
        .bearer_auth(token(Rights::Read))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_book(&json!({"id": "one", "title": "A", "author": "B", "yearPublished": 2000}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(app.list_books().await.is_empty());
}

#[tokio::test]
async fn test_create_with_array_body() {
    let app = spawn_app().await;

    let response = app.post_book(&json!([1, "A", "B", 2000])).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(error["message"], "Please include required fields.");

    assert!(app.list_books().await.is_empty());
}

#[tokio::test]
async fn test_create_without_content_type() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/books"))
        .bearer_auth(token(Rights::Read))
        .body(r#"{"id": 1, "title": "A", "author": "B", "yearPublished": 2000}"#)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(error["message"], "Please include required fields.");

    assert!(app.list_books().await.is_empty());
}

#[tokio::test]
async fn test_list_preserves_insertion_order() {
    let app = spawn_app().await;

    for id in [3, 1, 2] {
        let response = app
            .post_book(&json!({"id": id, "title": format!("Book {}", id), "author": "B", "yearPublished": 2000}))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let ids: Vec<i64> = app
        .list_books()
        .await
        .iter()
        .map(|book| book["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = spawn_app().await;
    let root = app.base_url.trim_end_matches("/api/v1");

    let response = app
        .client
        .get(format!("{}/api-docs/openapi.json", root))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["paths"]["/books/{id}"].is_object());
}
