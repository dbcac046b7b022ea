//! Integration tests for the Banquet HTTP client

use banquet_core::{MemoryTokenStore, Role, TokenStore};
use banquet_http::client::{ApiClient, AuthClient, ClientError, ResourceClient, ResourceKind, Upload};
use banquet_http::types::{Credentials, ListQuery, Page};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string_contains, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json(id: &str, role: &str) -> Value {
    json!({
        "_id": id,
        "firstName": "Casey",
        "lastName": "Baker",
        "email": "casey@example.com",
        "role": role
    })
}

fn client_with_store(uri: &str, store: Arc<MemoryTokenStore>) -> ApiClient {
    ApiClient::builder()
        .base_url(uri)
        .token_store(store)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_client_builder() {
    let client = ApiClient::builder()
        .base_url("http://localhost:5000/api/")
        .api_key("static-key")
        .build()
        .unwrap();
    assert_eq!(client.base_url(), "http://localhost:5000/api");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = ApiClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));

    let result = ApiClient::builder().base_url("localhost without scheme").build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_token_read_fresh_for_each_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts/c1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {"id": "c1"}})),
        )
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let contacts = ResourceClient::new(
        client_with_store(&mock_server.uri(), store.clone()),
        ResourceKind::Contacts,
    );

    let _: Value = contacts.get("c1").await.unwrap();
    store.write("abc123").unwrap();
    let _: Value = contacts.get("c1").await.unwrap();
    store.clear().unwrap();
    let _: Value = contacts.get("c1").await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(
        requests[1].headers.get("authorization").unwrap(),
        "Bearer abc123"
    );
    assert!(requests[2].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_api_key_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/quotes/q1"))
        .and(header("x-api-key", "static-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {"id": "q1"}})),
        )
        .mount(&mock_server)
        .await;

    let client = ApiClient::builder()
        .base_url(mock_server.uri())
        .api_key("static-key")
        .build()
        .unwrap();
    let quotes = ResourceClient::new(client, ResourceKind::Quotes);

    let quote: Value = quotes.get("q1").await.unwrap();
    assert_eq!(quote["id"], "q1");
}

#[tokio::test]
async fn test_error_normalization() {
    let mock_server = MockServer::start().await;

    Mock::given(path("/testimonials/limited"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&mock_server)
        .await;
    Mock::given(path("/testimonials/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    Mock::given(path("/testimonials"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "message": "Validation failed",
            "errors": [{"field": "rating", "message": "Rating must be between 1 and 5"}]
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::builder().base_url(mock_server.uri()).build().unwrap();
    let testimonials = ResourceClient::new(client, ResourceKind::Testimonials);

    let result = testimonials.get::<Value>("limited").await;
    assert!(matches!(result, Err(ClientError::RateLimited { .. })));

    let result = testimonials.get::<Value>("broken").await;
    assert!(matches!(result, Err(ClientError::ServerError { status: 503, .. })));

    let error = testimonials
        .create::<_, Value>(&json!({"rating": 9}))
        .await
        .unwrap_err();
    assert_eq!(error.status(), Some(400));
    assert_eq!(error.user_message(), "Validation failed");
    assert_eq!(error.field_errors()[0].field, "rating");
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(path("/blogs/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": {}}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = ApiClient::builder()
        .base_url(mock_server.uri())
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let blog = ResourceClient::new(client, ResourceKind::Blog);

    let result = blog.get::<Value>("slow").await;
    assert!(matches!(result, Err(ClientError::Timeout)));
}

#[tokio::test]
async fn test_network_unreachable() {
    // Reserve a port, then release it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = ApiClient::builder()
        .base_url(format!("http://127.0.0.1:{port}"))
        .build()
        .unwrap();
    let gallery = ResourceClient::new(client, ResourceKind::Gallery);

    let result = gallery.get::<Value>("img1").await;
    assert!(matches!(result, Err(ClientError::NetworkUnreachable(_))));
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "Invalid email or password"})),
        )
        .mount(&mock_server)
        .await;

    let client = ApiClient::builder().base_url(mock_server.uri()).build().unwrap();
    let auth = AuthClient::new(client);

    let error = auth
        .login(&Credentials::new("a@b.com", "bad"))
        .await
        .unwrap_err();
    assert!(matches!(error, ClientError::Rejected { .. }));
    assert_eq!(error.user_message(), "Invalid email or password");
}

#[tokio::test]
async fn test_auth_endpoints() {
    let mock_server = MockServer::start().await;

    let mut login_data = user_json("u1", "Admin");
    login_data["token"] = json!("abc123");

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "a@b.com", "password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": login_data})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": user_json("u1", "Admin")})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Logged out"})),
        )
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let auth = AuthClient::new(client_with_store(&mock_server.uri(), store.clone()));

    let payload = auth
        .login(&Credentials::new("a@b.com", "secret"))
        .await
        .unwrap();
    assert_eq!(payload.token, "abc123");
    assert_eq!(payload.user.role, Role::Admin);

    store.write(&payload.token).unwrap();
    let me = auth.me().await.unwrap();
    assert_eq!(me.id, "u1");

    let message = auth.logout().await.unwrap();
    assert_eq!(message.as_deref(), Some("Logged out"));
}

#[tokio::test]
async fn test_me_with_expired_token_is_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"success": false, "message": "Token expired"})),
        )
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("expired"));
    let auth = AuthClient::new(client_with_store(&mock_server.uri(), store));

    let error = auth.me().await.unwrap_err();
    assert!(error.is_unauthorized());
}

#[tokio::test]
async fn test_list_sends_query_and_decodes_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .and(query_param("search", "wedding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "items": [{"id": "c11", "name": "June wedding"}],
                "total": 11,
                "page": 2,
                "pages": 2
            }
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::builder().base_url(mock_server.uri()).build().unwrap();
    let contacts = ResourceClient::new(client, ResourceKind::Contacts);

    let page: Page<Value> = contacts
        .list(&ListQuery {
            page: Some(2),
            limit: Some(10),
            search: Some("wedding".to_string()),
            status: None,
        })
        .await
        .unwrap();

    assert_eq!(page.total, 11);
    assert_eq!(page.pages, 2);
    assert_eq!(page.items[0]["id"], "c11");
}

#[tokio::test]
async fn test_status_update_and_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/quotes/q7/status"))
        .and(body_json(json!({"status": "accepted"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"id": "q7", "status": "accepted"}
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/quotes/q7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Quote deleted"})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/quotes/q8"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = ApiClient::builder().base_url(mock_server.uri()).build().unwrap();
    let quotes = ResourceClient::new(client, ResourceKind::Quotes);

    let quote: Value = quotes.set_status("q7", "accepted").await.unwrap();
    assert_eq!(quote["status"], "accepted");

    let message = quotes.delete("q7").await.unwrap();
    assert_eq!(message.as_deref(), Some("Quote deleted"));

    let message = quotes.delete("q8").await.unwrap();
    assert_eq!(message, None);
}

#[tokio::test]
async fn test_gallery_upload_is_multipart() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gallery"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"image\"; filename=\"tray.jpg\""))
        .and(body_string_contains("Canapé tray"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {"id": "img1", "title": "Canapé tray"}
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::builder().base_url(mock_server.uri()).build().unwrap();
    let gallery = ResourceClient::new(client, ResourceKind::Gallery);

    let image: Value = gallery
        .upload(Upload {
            file_name: "tray.jpg".to_string(),
            bytes: b"not really a jpeg".to_vec(),
            mime: "image/jpeg".to_string(),
            fields: vec![("title".to_string(), "Canapé tray".to_string())],
        })
        .await
        .unwrap();

    assert_eq!(image["id"], "img1");
}
