//! HTTP-level integration tests for the dependency registration endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json, seed_policy};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_dependency_returns_201(pool: PgPool) {
    let policy_id = seed_policy(&pool, "Medication Administration").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        &format!("/api/v1/policies/{policy_id}/dependencies"),
        serde_json::json!({
            "dependent_type": "workflow",
            "dependent_id": 1001,
            "dependency_strength": "strong",
            "notes": "ward round SOP"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["policy_id"], policy_id);
    assert_eq!(json["data"]["dependent_type"], "workflow");
    assert_eq!(json["data"]["dependent_id"], 1001);
    assert_eq!(json["data"]["dependency_strength"], "strong");
    assert!(json["data"]["id"].is_number());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_defaults_strength_from_type(pool: PgPool) {
    let policy_id = seed_policy(&pool, "Visitor Policy").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        &format!("/api/v1/policies/{policy_id}/dependencies"),
        serde_json::json!({
            "dependent_type": "template",
            "dependent_id": 1002
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["dependency_strength"], "weak");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_duplicate_triple_returns_400(pool: PgPool) {
    let policy_id = seed_policy(&pool, "Infection Control").await;
    let body = serde_json::json!({
        "dependent_type": "module",
        "dependent_id": 1003
    });

    let app = common::build_test_app(pool.clone());
    let first = post_json(
        app,
        &format!("/api/v1/policies/{policy_id}/dependencies"),
        body.clone(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let second = post_json(
        app,
        &format!("/api/v1/policies/{policy_id}/dependencies"),
        body,
    )
    .await;

    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let json = body_json(second).await;
    assert_eq!(json["code"], "DUPLICATE_DEPENDENCY");

    // Exactly one record exists afterward.
    let app = common::build_test_app(pool);
    let listed = get(app, &format!("/api/v1/policies/{policy_id}/dependencies")).await;
    let json = body_json(listed).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_missing_fields_lists_them(pool: PgPool) {
    let policy_id = seed_policy(&pool, "Fire Safety").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        &format!("/api/v1/policies/{policy_id}/dependencies"),
        serde_json::json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("dependent_type"));
    assert!(message.contains("dependent_id"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_invalid_type_returns_400(pool: PgPool) {
    let policy_id = seed_policy(&pool, "Nutrition").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        &format!("/api/v1/policies/{policy_id}/dependencies"),
        serde_json::json!({
            "dependent_type": "dashboard",
            "dependent_id": 1004
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_for_unknown_policy_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/policies/999999/dependencies",
        serde_json::json!({
            "dependent_type": "workflow",
            "dependent_id": 1005
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_dependencies(pool: PgPool) {
    let policy_id = seed_policy(&pool, "Safeguarding").await;

    for (dependent_type, dependent_id) in [("workflow", 1), ("module", 2), ("template", 3)] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            &format!("/api/v1/policies/{policy_id}/dependencies"),
            serde_json::json!({
                "dependent_type": dependent_type,
                "dependent_id": dependent_id
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/policies/{policy_id}/dependencies")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_for_unknown_policy_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/policies/999999/dependencies").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_dependency_strength(pool: PgPool) {
    let policy_id = seed_policy(&pool, "Falls Prevention").await;

    let app = common::build_test_app(pool.clone());
    let created = post_json(
        app,
        &format!("/api/v1/policies/{policy_id}/dependencies"),
        serde_json::json!({
            "dependent_type": "workflow",
            "dependent_id": 1006
        }),
    )
    .await;
    let created = body_json(created).await;
    let dependency_id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/policies/{policy_id}/dependencies/{dependency_id}"),
        serde_json::json!({ "dependency_strength": "weak" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["dependency_strength"], "weak");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_requires_a_mutable_field(pool: PgPool) {
    let policy_id = seed_policy(&pool, "Complaints").await;

    let app = common::build_test_app(pool.clone());
    let created = post_json(
        app,
        &format!("/api/v1/policies/{policy_id}/dependencies"),
        serde_json::json!({
            "dependent_type": "module",
            "dependent_id": 1007
        }),
    )
    .await;
    let created = body_json(created).await;
    let dependency_id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/policies/{policy_id}/dependencies/{dependency_id}"),
        serde_json::json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_scoped_to_owning_policy(pool: PgPool) {
    let policy_id = seed_policy(&pool, "Medication").await;
    let other_policy = seed_policy(&pool, "Unrelated").await;

    let app = common::build_test_app(pool.clone());
    let created = post_json(
        app,
        &format!("/api/v1/policies/{policy_id}/dependencies"),
        serde_json::json!({
            "dependent_type": "workflow",
            "dependent_id": 1008
        }),
    )
    .await;
    let created = body_json(created).await;
    let dependency_id = created["data"]["id"].as_i64().unwrap();

    // The edge belongs to policy_id, not other_policy.
    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/policies/{other_policy}/dependencies/{dependency_id}"),
        serde_json::json!({ "dependency_strength": "weak" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_dependency_then_gone(pool: PgPool) {
    let policy_id = seed_policy(&pool, "Record Keeping").await;

    let app = common::build_test_app(pool.clone());
    let created = post_json(
        app,
        &format!("/api/v1/policies/{policy_id}/dependencies"),
        serde_json::json!({
            "dependent_type": "template",
            "dependent_id": 1009
        }),
    )
    .await;
    let created = body_json(created).await;
    let dependency_id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete(
        app,
        &format!("/api/v1/policies/{policy_id}/dependencies/{dependency_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Second delete: nothing left to remove.
    let app = common::build_test_app(pool);
    let response = delete(
        app,
        &format!("/api/v1/policies/{policy_id}/dependencies/{dependency_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
