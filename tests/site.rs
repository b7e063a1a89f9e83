use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use shelf_app::build_app;
use shelf_kernel::settings::Settings;
use tower::ServiceExt; // for `oneshot`

fn app() -> Router {
    build_app(&Settings::default()).unwrap()
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn books_returns_a_successful_response() {
    let response = get(app(), "/books").await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn root_redirects_to_books() {
    let response = get(app(), "/").await;

    assert!(response.status().is_redirection());
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/books");
}

#[tokio::test]
async fn books_body_is_the_catalogue() {
    let response = get(app(), "/books").await;
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );

    let body = body_json(response).await;
    let books = body.as_array().unwrap();
    assert!(!books.is_empty());
    for book in books {
        for field in ["id", "title", "author", "slug"] {
            assert!(book[field].is_string(), "missing {field} in {book}");
        }
    }
}

#[tokio::test]
async fn healthz_is_ok() {
    let response = get(app(), "/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_path_is_json_not_found() {
    let response = get(app(), "/authors").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let response = get(app(), "/books").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn openapi_document_lists_site_routes() {
    let response = get(app(), "/docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/"));
    assert!(paths.contains_key("/books"));
    assert!(body["components"]["schemas"]["Book"].is_object());
}
