mod common;

use axum::http::StatusCode;
use common::*;
use examhall_core::Role;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_super_admin_lists_module_catalog() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;

    let (status, body) = send(
        &app.router,
        "GET",
        "/api/permissions/modules",
        Some(&token_for(&admin)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let modules = module_names(&body["modules"]);
    assert_eq!(modules.len(), 9);
    assert!(modules.contains(&"batch_management".to_string()));
    assert!(modules.contains(&"admin_permissions".to_string()));

    let flags = body["action_flags"].as_array().unwrap();
    assert!(flags.iter().any(|f| f["action"] == "create_batch"
        && f["flag_key"] == "can_create_batch"));
}

#[tokio::test]
async fn test_campus_admin_cannot_administer_permissions_by_default() {
    let app = setup_test_app();
    let campus = create_test_account(&app.store, Role::CampusAdmin).await;
    let token = token_for(&campus);

    let (status, body) = send(
        &app.router,
        "GET",
        "/api/permissions/modules",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied to module 'admin_permissions'");

    let (status, _) = send(
        &app.router,
        "PUT",
        &format!("/api/permissions/admins/{}", campus.id),
        Some(&token),
        Some(json!({"modules": ["admin_permissions"]})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_without_override_returns_role_default() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let course = create_test_account(&app.store, Role::CourseAdmin).await;

    let (status, body) = send(
        &app.router,
        "GET",
        &format!("/api/permissions/admins/{}", course.id),
        Some(&token_for(&admin)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin_id"], course.id.to_string());
    assert_eq!(body["role"], "course_admin");
    assert_eq!(body["source"], "default");
    assert_eq!(
        module_names(&body["modules"]),
        vec![
            "dashboard",
            "batch_management",
            "student_management",
            "test_management",
            "results_management"
        ]
    );
    assert_eq!(body["action_flags"]["can_export_results"], false);
    assert!(body.get("updated_at").is_none());
    assert_eq!(body["available_modules"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_set_then_get_returns_exact_override() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let campus = create_test_account(&app.store, Role::CampusAdmin).await;
    let token = token_for(&admin);
    let uri = format!("/api/permissions/admins/{}", campus.id);

    let (status, body) = send(
        &app.router,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({
            "modules": ["student_management", "dashboard"],
            "action_flags": {"can_create_batch": false}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "override");
    assert!(body["updated_at"].is_string());

    let (status, body) = send(&app.router, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "override");
    assert_eq!(
        module_names(&body["modules"]),
        vec!["dashboard", "student_management"]
    );
    assert_eq!(body["action_flags"], json!({"can_create_batch": false}));
}

#[tokio::test]
async fn test_set_replaces_previous_override_wholesale() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let campus = create_test_account(&app.store, Role::CampusAdmin).await;
    let token = token_for(&admin);
    let uri = format!("/api/permissions/admins/{}", campus.id);

    send(
        &app.router,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({
            "modules": ["analytics", "dashboard"],
            "action_flags": {"can_export_results": true}
        })),
    )
    .await;

    let (status, body) = send(
        &app.router,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({"modules": ["test_management"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(module_names(&body["modules"]), vec!["test_management"]);
    assert_eq!(body["action_flags"], json!({}));
}

#[tokio::test]
async fn test_unknown_module_is_rejected_and_prior_override_kept() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let campus = create_test_account(&app.store, Role::CampusAdmin).await;
    let token = token_for(&admin);
    let uri = format!("/api/permissions/admins/{}", campus.id);

    send(
        &app.router,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({"modules": ["dashboard"]})),
    )
    .await;

    let (status, body) = send(
        &app.router,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({"modules": ["dashboard", "not_a_real_module"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("not_a_real_module")
    );

    let (_, body) = send(&app.router, "GET", &uri, Some(&token), None).await;
    assert_eq!(module_names(&body["modules"]), vec!["dashboard"]);
}

#[tokio::test]
async fn test_unknown_action_flag_is_rejected() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let campus = create_test_account(&app.store, Role::CampusAdmin).await;
    let token = token_for(&admin);
    let uri = format!("/api/permissions/admins/{}", campus.id);

    let (status, body) = send(
        &app.router,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({
            "modules": ["dashboard"],
            "action_flags": {"can_teleport": true}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("can_teleport"));

    let (_, body) = send(&app.router, "GET", &uri, Some(&token), None).await;
    assert_eq!(body["source"], "default");
}

#[tokio::test]
async fn test_empty_override_is_stored_and_denies_everything() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let campus = create_test_account(&app.store, Role::CampusAdmin).await;

    let (status, body) = send(
        &app.router,
        "PUT",
        &format!("/api/permissions/admins/{}", campus.id),
        Some(&token_for(&admin)),
        Some(json!({"modules": []})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modules"], json!([]));

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/auth/me/permissions/check",
        Some(&token_for(&campus)),
        Some(json!({"module": "dashboard"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allowed"], false);
}

#[tokio::test]
async fn test_reset_restores_default_and_is_idempotent() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let campus = create_test_account(&app.store, Role::CampusAdmin).await;
    let token = token_for(&admin);
    let uri = format!("/api/permissions/admins/{}", campus.id);

    send(
        &app.router,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({"modules": ["dashboard"]})),
    )
    .await;

    let (status, first) = send(&app.router, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["source"], "default");
    assert!(module_names(&first["modules"]).contains(&"analytics".to_string()));

    let (status, second) = send(&app.router, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);

    let (_, body) = send(&app.router, "GET", &uri, Some(&token), None).await;
    assert_eq!(body["source"], "default");
}

#[tokio::test]
async fn test_unknown_target_returns_not_found() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let token = token_for(&admin);
    let uri = format!("/api/permissions/admins/{}", Uuid::new_v4());

    for method in ["GET", "DELETE"] {
        let (status, body) = send(&app.router, method, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(body["error"], "Admin account not found");
    }

    let (status, _) = send(
        &app.router,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({"modules": ["dashboard"]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_student_target_is_rejected() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let student = create_test_account(&app.store, Role::Student).await;

    let (status, body) = send(
        &app.router,
        "PUT",
        &format!("/api/permissions/admins/{}", student.id),
        Some(&token_for(&admin)),
        Some(json!({"modules": ["dashboard"]})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown role: student");
}

#[tokio::test]
async fn test_malformed_admin_id_is_rejected() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;

    let (status, _) = send(
        &app.router,
        "GET",
        "/api/permissions/admins/not-a-uuid",
        Some(&token_for(&admin)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_role_defaults_endpoint() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let token = token_for(&admin);

    let (status, body) = send(
        &app.router,
        "GET",
        "/api/permissions/defaults/campus_admin",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "campus_admin");
    assert_eq!(body["action_flags"]["can_create_campus"], false);
    assert!(!module_names(&body["modules"]).contains(&"admin_permissions".to_string()));

    let (status, _) = send(
        &app.router,
        "GET",
        "/api/permissions/defaults/Super_Admin",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app.router,
        "GET",
        "/api/permissions/defaults/student",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delegated_reader_cannot_write_without_manage_admins() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let campus = create_test_account(&app.store, Role::CampusAdmin).await;
    let course = create_test_account(&app.store, Role::CourseAdmin).await;

    let (status, _) = send(
        &app.router,
        "PUT",
        &format!("/api/permissions/admins/{}", campus.id),
        Some(&token_for(&admin)),
        Some(json!({
            "modules": ["dashboard", "admin_permissions"],
            "action_flags": {"can_manage_admins": false}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let campus_token = token_for(&campus);
    let course_uri = format!("/api/permissions/admins/{}", course.id);

    let (status, _) = send(&app.router, "GET", &course_uri, Some(&campus_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app.router,
        "PUT",
        &course_uri,
        Some(&campus_token),
        Some(json!({"modules": ["dashboard"]})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app.router, "DELETE", &course_uri, Some(&campus_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_only_super_admin_can_write_overrides() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let campus = create_test_account(&app.store, Role::CampusAdmin).await;
    let course = create_test_account(&app.store, Role::CourseAdmin).await;

    send(
        &app.router,
        "PUT",
        &format!("/api/permissions/admins/{}", campus.id),
        Some(&token_for(&admin)),
        Some(json!({"modules": ["admin_permissions"]})),
    )
    .await;

    let campus_token = token_for(&campus);
    let course_uri = format!("/api/permissions/admins/{}", course.id);

    let (status, _) = send(&app.router, "GET", &course_uri, Some(&campus_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app.router,
        "PUT",
        &course_uri,
        Some(&campus_token),
        Some(json!({"modules": ["results_management"]})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied to module 'admin_permissions'");

    let (status, _) = send(&app.router, "DELETE", &course_uri, Some(&campus_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = send(&app.router, "GET", &course_uri, Some(&token_for(&admin)), None).await;
    assert_eq!(body["source"], "default");
}

#[tokio::test]
async fn test_admin_cannot_escalate_own_override() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let campus = create_test_account(&app.store, Role::CampusAdmin).await;
    let campus_uri = format!("/api/permissions/admins/{}", campus.id);

    send(
        &app.router,
        "PUT",
        &campus_uri,
        Some(&token_for(&admin)),
        Some(json!({"modules": ["admin_permissions"]})),
    )
    .await;

    let campus_token = token_for(&campus);
    let (status, _) = send(
        &app.router,
        "PUT",
        &campus_uri,
        Some(&campus_token),
        Some(json!({
            "modules": [
                "dashboard", "campus_management", "course_management",
                "batch_management", "student_management", "test_management",
                "results_management", "analytics", "admin_permissions"
            ],
            "action_flags": {"can_create_campus": true}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app.router, "DELETE", &campus_uri, Some(&campus_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = send(&app.router, "GET", &campus_uri, Some(&campus_token), None).await;
    assert_eq!(body["source"], "override");
    assert_eq!(module_names(&body["modules"]), vec!["admin_permissions"]);
}

#[tokio::test]
async fn test_delegated_reader_cannot_reset_super_admin_override() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let campus = create_test_account(&app.store, Role::CampusAdmin).await;
    let admin_token = token_for(&admin);
    let admin_uri = format!("/api/permissions/admins/{}", admin.id);

    send(
        &app.router,
        "PUT",
        &format!("/api/permissions/admins/{}", campus.id),
        Some(&admin_token),
        Some(json!({"modules": ["admin_permissions"]})),
    )
    .await;
    send(
        &app.router,
        "PUT",
        &admin_uri,
        Some(&admin_token),
        Some(json!({"modules": ["dashboard"]})),
    )
    .await;

    let (status, _) = send(&app.router, "DELETE", &admin_uri, Some(&token_for(&campus)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = send(&app.router, "GET", &admin_uri, Some(&admin_token), None).await;
    assert_eq!(body["source"], "override");
}

#[tokio::test]
async fn test_super_admin_override_does_not_restrict_super_admin() {
    let app = setup_test_app();
    let admin = create_test_account(&app.store, Role::SuperAdmin).await;
    let token = token_for(&admin);

    let (status, _) = send(
        &app.router,
        "PUT",
        &format!("/api/permissions/admins/{}", admin.id),
        Some(&token),
        Some(json!({"modules": []})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app.router,
        "GET",
        "/api/permissions/modules",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
