use super::{CommitRequest, KnownEntity, ProgramStore};
use crate::error::StoreError;
use crate::program::ProgramSet;
use crate::registry::OperationDescriptor;
use ahash::AHashMap;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Seed data for a [`MemoryStore`], matching the JSON fixture format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreFixture {
    #[serde(default)]
    pub entities: Vec<KnownEntity>,
    #[serde(default)]
    pub registry: Vec<OperationDescriptor>,
    #[serde(default)]
    pub programs: AHashMap<String, ProgramSet>,
}

/// An in-memory `ProgramStore`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<StoreFixture>,
    commits: Mutex<Vec<CommitRequest>>,
    fail_next: Mutex<Option<StoreError>>,
}

impl MemoryStore {
    pub fn new(fixture: StoreFixture) -> Self {
        Self {
            data: Mutex::new(fixture),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Makes the next `commit_program` call fail with `error`.
    pub async fn fail_next_commit(&self, error: StoreError) {
        *self.fail_next.lock().await = Some(error);
    }

    /// Replaces the stored programs of an entity, as another client would.
    pub async fn set_programs(&self, entity_id: &str, programs: ProgramSet) {
        self.data
            .lock()
            .await
            .programs
            .insert(entity_id.to_string(), programs);
    }

    /// Replaces the known entities, as when products are added or retired.
    pub async fn set_entities(&self, entities: Vec<KnownEntity>) {
        self.data.lock().await.entities = entities;
    }

    pub async fn programs(&self, entity_id: &str) -> Option<ProgramSet> {
        self.data.lock().await.programs.get(entity_id).cloned()
    }

    /// Every commit request accepted so far, oldest first.
    pub async fn commits(&self) -> Vec<CommitRequest> {
        self.commits.lock().await.clone()
    }
}

#[async_trait]
impl ProgramStore for MemoryStore {
    async fn fetch_product_programs(&self, entity_id: &str) -> Result<ProgramSet, StoreError> {
        self.data
            .lock()
            .await
            .programs
            .get(entity_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(entity_id.to_string()))
    }

    async fn fetch_known_entities(&self) -> Result<Vec<KnownEntity>, StoreError> {
        Ok(self.data.lock().await.entities.clone())
    }

    async fn fetch_operation_registry(&self) -> Result<Vec<OperationDescriptor>, StoreError> {
        Ok(self.data.lock().await.registry.clone())
    }

    async fn commit_program(&self, request: &CommitRequest) -> Result<(), StoreError> {
        if let Some(error) = self.fail_next.lock().await.take() {
            return Err(error);
        }

        let mut data = self.data.lock().await;
        let programs = data
            .programs
            .get_mut(&request.entity_id)
            .ok_or_else(|| StoreError::NotFound(request.entity_id.clone()))?;
        programs.set(request.route, request.program.clone());
        drop(data);

        self.commits.lock().await.push(request.clone());
        Ok(())
    }
}
