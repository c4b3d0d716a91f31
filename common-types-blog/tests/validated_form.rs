use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    routing::post,
    Router,
};
use tower::ServiceExt;
use common_types::Payloads::{CreatePostPayload, RegisterPayload};
use common_types_blog::Extract::ValidatedForm;

async fn register(ValidatedForm(payload): ValidatedForm<RegisterPayload>) -> String {
    payload.name
}

async fn create_post(ValidatedForm(payload): ValidatedForm<CreatePostPayload>) -> String {
    payload.title
}

fn app() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/new-post", post(create_post))
}

fn form_request(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn valid_registration_reaches_handler() {
    let response = app()
        .oneshot(form_request("/register", "email=user%40example.com&password=Passw0rd%21&name=Ada&submit=Sign+Me+Up%21"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Ada");
}

#[tokio::test]
async fn weak_password_is_rejected_with_field_errors() {
    let response = app()
        .oneshot(form_request("/register", "email=user%40example.com&password=password1&name="))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let raw = body_string(response).await;
    let password_at = raw.find("\"password\"").unwrap();
    let name_at = raw.find("\"name\"").unwrap();
    assert!(password_at < name_at, "{raw}");

    let body: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(body["form"], "Register");
    assert_eq!(
        body["errors"]["password"][0],
        "Password must be at least 8 characters long, include an uppercase letter, a lowercase letter, a digit, and a special character."
    );
    assert_eq!(body["errors"]["name"][0], "This field is required.");
    assert!(body["errors"].get("email").is_none());
}

#[tokio::test]
async fn create_post_checks_image_url() {
    let response = app()
        .oneshot(form_request("/new-post", "title=Hello&subtitle=World&img_url=not-a-url&body=%3Cp%3EHi%3C%2Fp%3E"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["errors"]["img_url"][0], "Invalid URL.");

    let response = app()
        .oneshot(form_request("/new-post", "title=Hello&subtitle=World&img_url=https%3A%2F%2Fexample.com%2Fimg.png&body=%3Cp%3EHi%3C%2Fp%3E"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Hello");
}

#[tokio::test]
async fn non_form_body_is_rejected_before_validation() {
    let request = Request::builder()
        .method("POST")
        .uri("/register")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}
