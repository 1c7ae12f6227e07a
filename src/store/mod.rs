//! The remote persistence seam.
//!
//! The editor never talks to a transport directly; it is handed a
//! [`ProgramStore`] by its owner. [`MemoryStore`] is an in-process implementation
//! used by the CLI and the test-suite.

use crate::commit::PostOp;
use crate::error::StoreError;
use crate::program::{ProgramSet, Route};
use crate::registry::OperationDescriptor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod memory;

pub use memory::*;

/// An entity (product) the client knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownEntity {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Payload of a single program commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRequest {
    pub route: Route,
    pub entity_id: String,
    pub program: String,
    pub postops: Vec<PostOp>,
}

/// Remote collaborator owning the program strings, entities and registry.
#[async_trait]
pub trait ProgramStore: Send + Sync {
    async fn fetch_product_programs(&self, entity_id: &str) -> Result<ProgramSet, StoreError>;

    async fn fetch_known_entities(&self) -> Result<Vec<KnownEntity>, StoreError>;

    async fn fetch_operation_registry(&self) -> Result<Vec<OperationDescriptor>, StoreError>;

    /// Persists `request.program` for `request.route`. Either the whole request is
    /// applied or none of it is.
    async fn commit_program(&self, request: &CommitRequest) -> Result<(), StoreError>;
}
