use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
};
use gardisto::gardisto::{
    password, router,
    state::{AppState, AuthConfig},
    store::{InMemoryUserStore, User, UserStore},
    token::unix_now,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "0123456789abcdef0123456789abcdef";
const PASSWORD: &str = "Secr3t!123";

fn test_state(lockout_threshold: u32) -> Arc<AppState> {
    let config = AuthConfig::new("gardisto-test")
        .with_token_ttl_seconds(120)
        .with_lockout_threshold(lockout_threshold);
    Arc::new(AppState::new(
        config,
        SecretString::from(SECRET.to_string()),
        Arc::new(InMemoryUserStore::new()),
    ))
}

fn app(state: &Arc<AppState>) -> Router {
    router(Arc::clone(state))
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(state: &Arc<AppState>, username: &str) {
    let response = app(state)
        .oneshot(json_request(
            "POST",
            "/register",
            &json!({
                "username": username,
                "password": PASSWORD,
                "email": format!("{username}@example.com"),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn login(state: &Arc<AppState>, username: &str, password: &str) -> axum::response::Response {
    app(state)
        .oneshot(json_request(
            "POST",
            "/login",
            &json!({"username": username, "password": password}),
        ))
        .await
        .unwrap()
}

async fn login_token(state: &Arc<AppState>, username: &str) -> String {
    let response = login(state, username, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

/// Insert an admin straight into the store, bypassing the register policy.
fn seed_admin(state: &Arc<AppState>, username: &str) {
    let hash = password::hash(PASSWORD).unwrap();
    let admin = User::new(username, hash, "root@example.com", unix_now())
        .with_role("admin")
        .with_permissions(vec!["profile:read".to_string(), "users:list".to_string()]);
    state.store().insert(admin).unwrap();
}

#[tokio::test]
async fn health_is_open() {
    let state = test_state(5);
    let response = app(&state)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "gardisto");
}

#[tokio::test]
async fn register_login_and_read_own_profile() {
    let state = test_state(5);
    register(&state, "tom").await;
    let token = login_token(&state, "tom").await;

    let response = app(&state)
        .oneshot(bearer_request("GET", "/api/me", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["subject"], "tom");
    assert_eq!(body["role"], "user");
    assert_eq!(body["permissions"], json!(["profile:read"]));
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let state = test_state(5);
    register(&state, "tom").await;
    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/register",
            &json!({
                "username": "tom",
                "password": PASSWORD,
                "email": "tom@other.com",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn weak_password_is_rejected_at_registration() {
    let state = test_state(5);
    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/register",
            &json!({
                "username": "tom",
                "password": "weakpass",
                "email": "tom@example.com",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_route_rejects_plain_users_and_admits_admins() {
    let state = test_state(5);
    register(&state, "tom").await;
    seed_admin(&state, "root");

    let user_token = login_token(&state, "tom").await;
    let response = app(&state)
        .oneshot(bearer_request("GET", "/admin/dashboard", &user_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "forbidden");

    let admin_token = login_token(&state, "root").await;
    let response = app(&state)
        .oneshot(bearer_request("GET", "/admin/dashboard", &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["admin"], "root");
}

#[tokio::test]
async fn lockout_blocks_even_the_correct_password() {
    let state = test_state(3);
    register(&state, "tom").await;

    for _ in 0..3 {
        let response = login(&state, "tom", "Wrong1!pass").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid username or password");
    }

    // Locked now. The correct password gets the same uniform answer.
    let response = login(&state, "tom", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid username or password");
}

#[tokio::test]
async fn successful_login_resets_accumulated_failures() {
    let state = test_state(3);
    register(&state, "tom").await;

    for _ in 0..2 {
        let response = login(&state, "tom", "Wrong1!pass").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
    assert_eq!(state.guard().failure_count("tom"), 2);

    let response = login(&state, "tom", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.guard().failure_count("tom"), 0);

    // The counter starts over, two more failures do not lock.
    for _ in 0..2 {
        let response = login(&state, "tom", "Wrong1!pass").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
    let response = login(&state, "tom", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_usernames_accumulate_failures_too() {
    let state = test_state(2);
    for _ in 0..2 {
        let response = login(&state, "ghost", "Wrong1!pass").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
    assert!(state.guard().is_locked("ghost"));
}

#[tokio::test]
async fn malformed_authorization_headers_are_unauthenticated() {
    let state = test_state(5);

    for value in ["Basic abc", "Bearer", "Bearer a b", "token-without-scheme"] {
        let response = app(&state)
            .oneshot(
                Request::builder()
                    .uri("/api/me")
                    .header(AUTHORIZATION, value)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "value {value:?} should be unauthenticated"
        );
        let body = body_json(response).await;
        assert_eq!(body["error"], "not authenticated");
    }

    // No header at all.
    let response = app(&state)
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_tokens_are_unauthenticated() {
    let state = test_state(5);
    let response = app(&state)
        .oneshot(bearer_request("GET", "/api/me", "not.a.token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not authenticated");
}

#[tokio::test]
async fn password_change_rotates_the_credential() {
    let state = test_state(5);
    register(&state, "tom").await;
    let token = login_token(&state, "tom").await;

    // Wrong current password is rejected.
    let mut request = json_request(
        "PUT",
        "/api/password",
        &json!({"current_password": "Wrong1!pass", "new_password": "N3w!secret"}),
    );
    request
        .headers_mut()
        .insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
    let response = app(&state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct current password with a strong replacement succeeds.
    let mut request = json_request(
        "PUT",
        "/api/password",
        &json!({"current_password": PASSWORD, "new_password": "N3w!secret"}),
    );
    request
        .headers_mut()
        .insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
    let response = app(&state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The old password no longer works, the new one does.
    let response = login(&state, "tom", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = login(&state, "tom", "N3w!secret").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_users_listing_needs_a_token() {
    let state = test_state(5);
    register(&state, "tom").await;
    let token = login_token(&state, "tom").await;

    let response = app(&state)
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app(&state)
        .oneshot(bearer_request("GET", "/api/users", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
