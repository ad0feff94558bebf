#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use examhall::router::init_router;
use examhall::state::AppState;
use examhall_auth::create_access_token;
use examhall_config::{CorsConfig, JwtConfig};
use examhall_core::{Role, hash_password};
use examhall_db::{AccountStore, MemoryAccountStore};
use examhall_models::{Account, NewAccount};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "testpass123";

pub struct TestApp {
    pub router: Router,
    pub store: MemoryAccountStore,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-at-least-32-chars".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn setup_test_app() -> TestApp {
    let store = MemoryAccountStore::new();
    let app = setup_test_app_with(store.clone());
    TestApp {
        router: app,
        store,
    }
}

/// Router over any store, for tests that need to inject failures.
pub fn setup_test_app_with(store: impl AccountStore + 'static) -> Router {
    let state = AppState::new(store, test_jwt_config(), CorsConfig::default());
    init_router(state)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@examhall.io", Uuid::new_v4())
}

/// Account whose password is never checked; skips bcrypt.
pub async fn create_test_account(store: &MemoryAccountStore, role: Role) -> Account {
    store
        .create_account(NewAccount::new(
            "Test Admin",
            generate_unique_email(),
            "not-a-bcrypt-hash",
            role,
        ))
        .await
        .unwrap()
}

/// Account with a real bcrypt hash of [`TEST_PASSWORD`].
pub async fn create_login_account(store: &MemoryAccountStore, role: Role) -> Account {
    let hashed = hash_password(TEST_PASSWORD).unwrap();
    store
        .create_account(NewAccount::new(
            "Test User",
            generate_unique_email(),
            hashed,
            role,
        ))
        .await
        .unwrap()
}

pub fn token_for(account: &Account) -> String {
    create_access_token(
        Uuid::from(account.id),
        &account.email,
        account.role,
        &test_jwt_config(),
    )
    .unwrap()
}

pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, body)
}

pub fn module_names(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}
