use licdesk_gateway::{GatewayConfig, GatewayError, HttpGateway, RemoteGateway};
use licdesk_license::{ActivationRequest, LicenseKey};
use licdesk_types::{Credentials, RegisterRequest, User};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> HttpGateway {
    HttpGateway::new(GatewayConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    })
    .unwrap()
}

// ── Config ──────────────────────────────────────────────────────

#[test]
fn config_defaults() {
    let cfg = GatewayConfig::default();
    assert_eq!(cfg.base_url, "http://127.0.0.1:8000");
    assert_eq!(cfg.timeout_secs, 60);
}

#[test]
fn config_rejects_bad_base_url() {
    let result = HttpGateway::new(GatewayConfig {
        base_url: "not a url".into(),
        ..Default::default()
    });
    assert!(matches!(result, Err(GatewayError::Config(_))));
}

#[test]
fn config_rejects_non_http_scheme() {
    let result = HttpGateway::new(GatewayConfig {
        base_url: "ftp://example.com".into(),
        ..Default::default()
    });
    assert!(matches!(result, Err(GatewayError::Config(_))));
}

#[test]
fn config_rejects_zero_timeout() {
    let result = HttpGateway::new(GatewayConfig {
        timeout_secs: 0,
        ..Default::default()
    });
    assert!(matches!(result, Err(GatewayError::Config(_))));
}

#[test]
fn base_url_trailing_slash_is_dropped() {
    let gateway = HttpGateway::new(GatewayConfig {
        base_url: "http://127.0.0.1:8000/".into(),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(gateway.base_url(), "http://127.0.0.1:8000");
}

// ── authenticate ────────────────────────────────────────────────

#[tokio::test]
async fn authenticate_stores_token_and_sends_it_afterwards() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("username=admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "17",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer 17"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"users": []})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    assert!(!gateway.is_authenticated().await);

    gateway
        .authenticate(&Credentials::new("admin", "secret"))
        .await
        .unwrap();
    assert!(gateway.is_authenticated().await);

    let users = gateway.list_users().await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn authenticate_401_is_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "Incorrect username or password"
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway
        .authenticate(&Credentials::new("admin", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Unauthorized));
    assert!(!gateway.is_authenticated().await);
}

#[tokio::test]
async fn clear_token_stops_sending_it() {
    let server = MockServer::start().await;
    let gateway = gateway_for(&server);

    gateway.set_token("abc".into()).await;
    assert!(gateway.is_authenticated().await);
    gateway.clear_token().await;
    assert!(!gateway.is_authenticated().await);
}

// ── register_user ───────────────────────────────────────────────

#[tokio::test]
async fn register_user_posts_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/register"))
        .and(body_json(serde_json::json!({"username": "bob", "password": "pw1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "msg": "User created successfully",
            "encryption_key": "k"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let resp = gateway
        .register_user(&RegisterRequest {
            username: "bob".into(),
            password: "pw1".into(),
        })
        .await
        .unwrap();

    assert_eq!(resp.message.as_deref(), Some("User created successfully"));
}

#[tokio::test]
async fn register_user_tolerates_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let resp = gateway
        .register_user(&RegisterRequest {
            username: "bob".into(),
            password: "pw1".into(),
        })
        .await
        .unwrap();
    assert!(resp.message.is_none());
}

#[tokio::test]
async fn register_user_conflict_carries_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "detail": "Username already registered"
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway
        .register_user(&RegisterRequest {
            username: "bob".into(),
            password: "pw1".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.detail(), Some("Username already registered"));
    assert_eq!(err.detail_or_status(), "Username already registered");
}

// ── list_users ──────────────────────────────────────────────────

#[tokio::test]
async fn list_users_preserves_service_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "users": [
                {"id": 3, "username": "bob"},
                {"id": 1, "username": "alice"}
            ]
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let users = gateway.list_users().await.unwrap();
    assert_eq!(users, vec![User::new(3, "bob"), User::new(1, "alice")]);
}

#[tokio::test]
async fn list_users_bad_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.list_users().await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn list_users_server_error_without_detail_uses_status_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.list_users().await.unwrap_err();
    assert!(matches!(err, GatewayError::Server { status: 503, .. }));
    assert_eq!(err.detail_or_status(), "Service Unavailable");
}

// ── generate_license ────────────────────────────────────────────

#[tokio::test]
async fn generate_license_sends_seed_as_json_string() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/licenses/generate"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!("seed-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "key": "5f0c8a34-d1b2-4e0e-9a51-0d1b7f43c2aa",
            "is_active": false,
            "user_id": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let record = gateway.generate_license("seed-1").await.unwrap();
    assert_eq!(record.key, "5f0c8a34-d1b2-4e0e-9a51-0d1b7f43c2aa");
    assert_eq!(record.id, Some(1));
}

#[tokio::test]
async fn generate_license_accepts_any_key_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/licenses/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"key": "ABCD EFGH", "id": 1})),
        )
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let record = gateway.generate_license("seed").await.unwrap();
    assert_eq!(record.key, "ABCD EFGH");
    assert_eq!(record.id, Some(1));
}

#[tokio::test]
async fn generate_license_error_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/licenses/generate"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "Invalid authentication credentials"
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.generate_license("seed").await.unwrap_err();
    assert_eq!(err.detail_or_status(), "Invalid authentication credentials");
}

// ── download_license ────────────────────────────────────────────

#[tokio::test]
async fn download_license_uses_content_disposition() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/licenses/download"))
        .and(query_param("username", "bob smith"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=license_3.lic")
                .set_body_bytes(b"USER:3;LICENSE:K\nc2ln".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let file = gateway.download_license("bob smith").await.unwrap();
    assert_eq!(file.filename(), "license_3.lic");
    assert_eq!(file.bytes(), b"USER:3;LICENSE:K\nc2ln");
}

#[tokio::test]
async fn download_license_keeps_non_ascii_filename() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/licenses/download"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=лицензия.lic")
                .set_body_bytes(b"opaque".to_vec()),
        )
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let file = gateway.download_license("bob").await.unwrap();
    assert_eq!(file.filename(), "лицензия.lic");
}

#[tokio::test]
async fn download_license_without_header_falls_back() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/licenses/download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"opaque".to_vec()))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let file = gateway.download_license("bob").await.unwrap();
    assert_eq!(file.filename(), "license_bob.lic");
}

#[tokio::test]
async fn download_license_500_means_not_generated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/licenses/download"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.download_license("bob").await.unwrap_err();
    assert!(matches!(err, GatewayError::LicenseNotGenerated { ref username } if username == "bob"));
}

#[tokio::test]
async fn download_license_404_is_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/licenses/download"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.download_license("bob").await.unwrap_err();
    assert!(matches!(err, GatewayError::Server { status: 404, .. }));
    assert_eq!(err.detail_or_status(), "Not Found");
}

// ── activate_license ────────────────────────────────────────────

#[tokio::test]
async fn activate_license_posts_key_and_username() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/licenses/activation-key"))
        .and(body_json(serde_json::json!({"key": "K-1", "username": "bob"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "key": "K-1",
            "is_active": true,
            "user_id": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let record = gateway
        .activate_license(&ActivationRequest {
            key: LicenseKey::parse("K-1").unwrap(),
            username: "bob".into(),
        })
        .await
        .unwrap();
    assert!(record.is_active);
}

#[tokio::test]
async fn activate_license_already_active() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/licenses/activation-key"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "detail": "License already activated"
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway
        .activate_license(&ActivationRequest {
            key: LicenseKey::parse("K-1").unwrap(),
            username: "bob".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.detail(), Some("License already activated"));
}

// ── transport failures ──────────────────────────────────────────

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    // Bind then drop a listener so the port is very likely closed.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let gateway = HttpGateway::new(GatewayConfig {
        base_url: uri,
        timeout_secs: 2,
    })
    .unwrap();

    let err = gateway.list_users().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"users": []}))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(GatewayConfig {
        base_url: server.uri(),
        timeout_secs: 1,
    })
    .unwrap();

    let err = gateway.list_users().await.unwrap_err();
    assert!(matches!(err, GatewayError::Timeout));
}
