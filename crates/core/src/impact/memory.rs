//! In-memory [`DependencyStore`] used by the engine's unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::dependency::{
    DependencyStrength, DependentType, NewDependency, PolicyDependency, UpdateDependency,
};
use crate::error::CoreError;
use crate::impact::store::{DependencyStore, DependentMetadata};
use crate::types::DbId;

#[derive(Default)]
struct Inner {
    policies: HashSet<DbId>,
    dependencies: Vec<PolicyDependency>,
    metadata: HashMap<(DependentType, DbId), DependentMetadata>,
    next_id: DbId,
}

/// HashMap-backed store with builder-style seeding for tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }

    pub fn with_policy(self, policy_id: DbId) -> Self {
        self.inner.lock().unwrap().policies.insert(policy_id);
        self
    }

    pub fn with_artifact(
        self,
        dependent_type: DependentType,
        dependent_id: DbId,
        name: &str,
        department: &str,
        is_critical: bool,
    ) -> Self {
        self.inner.lock().unwrap().metadata.insert(
            (dependent_type, dependent_id),
            DependentMetadata {
                name: name.to_string(),
                department: department.to_string(),
                is_critical,
            },
        );
        self
    }

    pub fn with_edge(
        self,
        source_id: DbId,
        dependent_type: DependentType,
        dependent_id: DbId,
        strength: DependencyStrength,
    ) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.dependencies.push(PolicyDependency {
                id,
                policy_id: source_id,
                dependent_type,
                dependent_id,
                dependency_strength: strength,
                notes: None,
                created_at: chrono::Utc::now(),
            });
        }
        self
    }
}

#[async_trait]
impl DependencyStore for MemoryStore {
    async fn policy_exists(&self, policy_id: DbId) -> Result<bool, CoreError> {
        Ok(self.inner.lock().unwrap().policies.contains(&policy_id))
    }

    async fn list_dependencies(&self, source_id: DbId) -> Result<Vec<PolicyDependency>, CoreError> {
        let inner = self.inner.lock().unwrap();
        let mut deps: Vec<PolicyDependency> = inner
            .dependencies
            .iter()
            .filter(|d| d.policy_id == source_id)
            .cloned()
            .collect();
        deps.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(deps)
    }

    async fn dependency_exists(
        &self,
        policy_id: DbId,
        dependent_type: DependentType,
        dependent_id: DbId,
    ) -> Result<bool, CoreError> {
        Ok(self.inner.lock().unwrap().dependencies.iter().any(|d| {
            d.policy_id == policy_id
                && d.dependent_type == dependent_type
                && d.dependent_id == dependent_id
        }))
    }

    async fn insert_dependency(&self, dep: &NewDependency) -> Result<PolicyDependency, CoreError> {
        let mut inner = self.inner.lock().unwrap();
        let duplicate = inner.dependencies.iter().any(|d| {
            d.policy_id == dep.policy_id
                && d.dependent_type == dep.dependent_type
                && d.dependent_id == dep.dependent_id
        });
        if duplicate {
            return Err(CoreError::DuplicateDependency {
                policy_id: dep.policy_id,
                dependent_type: dep.dependent_type,
                dependent_id: dep.dependent_id,
            });
        }
        let id = inner.next_id;
        inner.next_id += 1;
        let stored = PolicyDependency {
            id,
            policy_id: dep.policy_id,
            dependent_type: dep.dependent_type,
            dependent_id: dep.dependent_id,
            dependency_strength: dep.dependency_strength,
            notes: dep.notes.clone(),
            created_at: chrono::Utc::now(),
        };
        inner.dependencies.push(stored.clone());
        Ok(stored)
    }

    async fn update_dependency(
        &self,
        policy_id: DbId,
        id: DbId,
        update: &UpdateDependency,
    ) -> Result<Option<PolicyDependency>, CoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(dep) = inner
            .dependencies
            .iter_mut()
            .find(|d| d.id == id && d.policy_id == policy_id)
        else {
            return Ok(None);
        };
        if let Some(strength) = update.dependency_strength {
            dep.dependency_strength = strength;
        }
        if let Some(notes) = &update.notes {
            dep.notes = Some(notes.clone());
        }
        Ok(Some(dep.clone()))
    }

    async fn delete_dependency(&self, policy_id: DbId, id: DbId) -> Result<bool, CoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.dependencies.len();
        inner
            .dependencies
            .retain(|d| !(d.id == id && d.policy_id == policy_id));
        Ok(inner.dependencies.len() < before)
    }

    async fn get_dependent_metadata(
        &self,
        dependent_type: DependentType,
        dependent_id: DbId,
    ) -> Result<Option<DependentMetadata>, CoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .metadata
            .get(&(dependent_type, dependent_id))
            .cloned())
    }
}
