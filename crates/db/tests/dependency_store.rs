//! Integration tests for [`PgDependencyStore`] against a real database.
//!
//! The engine's pre-insert duplicate check is covered in `careops-core`;
//! these tests exercise what only the database can prove: the unique
//! constraint backstop, scoping of updates/deletes, and row ordering.

use assert_matches::assert_matches;
use careops_core::dependency::{
    CreateDependencyInput, DependencyStrength, DependentType, NewDependency, UpdateDependency,
    validate_create_input,
};
use careops_core::error::CoreError;
use careops_core::impact::store::DependencyStore;
use careops_db::store::PgDependencyStore;
use sqlx::PgPool;

async fn seed_policy(pool: &PgPool, title: &str) -> i64 {
    let row: (i64,) = sqlx::query_as("INSERT INTO policies (title) VALUES ($1) RETURNING id")
        .bind(title)
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

fn new_dependency(policy_id: i64, dependent_id: i64) -> NewDependency {
    let input = CreateDependencyInput {
        dependent_type: Some("workflow".to_string()),
        dependent_id: Some(dependent_id),
        dependency_strength: Some("strong".to_string()),
        notes: Some("initial".to_string()),
    };
    validate_create_input(policy_id, &input).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_insert_and_list_round_trip(pool: PgPool) {
    let policy_id = seed_policy(&pool, "Medication").await;
    let store = PgDependencyStore::new(pool);

    let created = store.insert_dependency(&new_dependency(policy_id, 10)).await.unwrap();
    assert_eq!(created.policy_id, policy_id);
    assert_eq!(created.dependent_type, DependentType::Workflow);
    assert_eq!(created.dependency_strength, DependencyStrength::Strong);

    let listed = store.list_dependencies(policy_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unique_constraint_backstop_maps_to_duplicate(pool: PgPool) {
    // Insert the same triple twice directly through the store, bypassing the
    // engine's exists-check, the way a racing writer would.
    let policy_id = seed_policy(&pool, "Infection Control").await;
    let store = PgDependencyStore::new(pool);

    store.insert_dependency(&new_dependency(policy_id, 11)).await.unwrap();
    let second = store.insert_dependency(&new_dependency(policy_id, 11)).await;

    assert_matches!(
        second,
        Err(CoreError::DuplicateDependency {
            dependent_type: DependentType::Workflow,
            dependent_id: 11,
            ..
        })
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_exists_checks_the_exact_triple(pool: PgPool) {
    let policy_id = seed_policy(&pool, "Safeguarding").await;
    let store = PgDependencyStore::new(pool);

    store.insert_dependency(&new_dependency(policy_id, 12)).await.unwrap();

    assert!(store
        .dependency_exists(policy_id, DependentType::Workflow, 12)
        .await
        .unwrap());
    // Same id, different type: a distinct triple.
    assert!(!store
        .dependency_exists(policy_id, DependentType::Module, 12)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_keeps_unset_fields(pool: PgPool) {
    let policy_id = seed_policy(&pool, "Falls Prevention").await;
    let store = PgDependencyStore::new(pool);
    let created = store.insert_dependency(&new_dependency(policy_id, 13)).await.unwrap();

    let updated = store
        .update_dependency(
            policy_id,
            created.id,
            &UpdateDependency {
                dependency_strength: Some(DependencyStrength::Weak),
                notes: None,
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.dependency_strength, DependencyStrength::Weak);
    assert_eq!(updated.notes.as_deref(), Some("initial"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_and_delete_are_scoped_to_source(pool: PgPool) {
    let policy_id = seed_policy(&pool, "Medication").await;
    let other_policy = seed_policy(&pool, "Unrelated").await;
    let store = PgDependencyStore::new(pool);
    let created = store.insert_dependency(&new_dependency(policy_id, 14)).await.unwrap();

    let updated = store
        .update_dependency(
            other_policy,
            created.id,
            &UpdateDependency {
                dependency_strength: Some(DependencyStrength::Weak),
                notes: None,
            },
        )
        .await
        .unwrap();
    assert!(updated.is_none());

    assert!(!store.delete_dependency(other_policy, created.id).await.unwrap());
    assert!(store.delete_dependency(policy_id, created.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_metadata_lookup_reduces_to_narrow_shape(pool: PgPool) {
    sqlx::query(
        "INSERT INTO dependent_artifacts (id, artifact_type, name, department, is_critical)
         VALUES (500, 'workflow', 'Outbreak Response', 'Nursing', TRUE)",
    )
    .execute(&pool)
    .await
    .unwrap();
    let store = PgDependencyStore::new(pool);

    let meta = store
        .get_dependent_metadata(DependentType::Workflow, 500)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(meta.name, "Outbreak Response");
    assert_eq!(meta.department, "Nursing");
    assert!(meta.is_critical);

    // Type mismatch: not found.
    let missing = store
        .get_dependent_metadata(DependentType::Template, 500)
        .await
        .unwrap();
    assert!(missing.is_none());
}
