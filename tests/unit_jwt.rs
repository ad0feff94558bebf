use examhall_auth::{create_access_token, verify_token};
use examhall_config::JwtConfig;
use examhall_core::permissions::{PermissionError, Role};
use uuid::Uuid;

fn config() -> JwtConfig {
    JwtConfig {
        secret: "unit-test-secret-key-at-least-32-chars".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_token_carries_principal_id() {
    let user_id = Uuid::new_v4();
    let token = create_access_token(user_id, "a@examhall.io", Role::CampusAdmin, &config()).unwrap();

    let claims = verify_token(&token, &config()).unwrap();
    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.role, Role::CampusAdmin);
}

#[test]
fn test_tampered_token_is_rejected() {
    let token =
        create_access_token(Uuid::new_v4(), "a@examhall.io", Role::CourseAdmin, &config()).unwrap();
    let mut tampered = token.clone();
    tampered.push('x');

    assert!(matches!(
        verify_token(&tampered, &config()),
        Err(PermissionError::Authentication(_))
    ));
}

#[test]
fn test_empty_token_is_rejected() {
    assert!(verify_token("", &config()).is_err());
}
