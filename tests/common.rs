//! Common test utilities: registry, entity and program fixtures.
use async_trait::async_trait;
use optoken::prelude::*;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Notify;

/// Known entity ids used across the tests.
#[allow(dead_code)]
pub fn known(ids: &[&str]) -> AHashSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// A small registry covering every route class plus one maintenance class.
///
/// `RD:10FD`, `RD:20RT` and `SH:5SH` carry a postop tag.
#[allow(dead_code)]
pub fn create_registry_descriptors() -> Vec<OperationDescriptor> {
    serde_json::from_value(json!([
        {
            "class": "AC", "function": "290W", "name": "Activate all",
            "params": [{ "label": "Product", "required": true }]
        },
        {
            "class": "AC", "function": "300M", "name": "Activate quantity",
            "params": [
                { "label": "Product", "required": true },
                { "label": "Quantity", "required": true, "effects": ["active-increase", "stored-decrease"] }
            ]
        },
        {
            "class": "RD", "function": "10FD", "name": "Reduce fixed",
            "params": [
                { "label": "Product", "required": true },
                { "label": "Amount", "required": true, "effects": ["active-decrease"] }
            ],
            "postop": { "ratio_param": 0 }
        },
        {
            "class": "rd", "function": "20RT", "name": "Reduce by ratio",
            "params": [
                { "label": "Product", "required": true },
                { "label": "Ratio", "required": true, "effects": ["active-decrease"] },
                { "label": "Note", "required": false }
            ],
            "postop": { "ratio_param": 0 }
        },
        {
            "class": "SH", "function": "5SH", "name": "Ship",
            "params": [
                { "label": "Product", "required": true },
                { "label": "Quantity", "required": true, "effects": ["shipment"] },
                { "label": "Carrier", "required": false }
            ],
            "postop": {}
        },
        {
            "class": "ST", "function": "SET", "name": "Set stock",
            "params": [
                { "label": "Stored", "required": true, "effects": ["stored-increase"] },
                { "label": "Product", "required": true }
            ],
            "target_slot_index": 1
        },
        {
            "class": "SYNC", "function": "POOL", "name": "Pool sync",
            "params": [{ "label": "Product", "required": true }]
        }
    ]))
    .expect("registry fixture should deserialize")
}

#[allow(dead_code)]
pub fn create_registry() -> RegistryIndex {
    RegistryIndex::prepare(create_registry_descriptors())
}

/// The programs of entity `P1`, including one entry for the unknown entity `P9`
/// and a maintenance entry on the shipment route.
#[allow(dead_code)]
pub fn create_programs() -> ProgramSet {
    ProgramSet {
        activation: "AC:290W:P1 AC:300M:P2:4 AC:290W:P9".to_string(),
        reduction: "RD:10FD:P1:5 RD:20RT:P3:0.5".to_string(),
        shipment: "SH:5SH:P1:2 SYNC:POOL:P1".to_string(),
    }
}

#[allow(dead_code)]
pub fn create_fixture() -> StoreFixture {
    let entities = serde_json::from_value(json!([
        { "id": "P1", "name": "Widget", "sku": "W-001" },
        { "id": "P2", "name": "Gadget" },
        { "id": "P3", "name": "Gizmo" }
    ]))
    .expect("entity fixture should deserialize");

    let mut fixture = StoreFixture {
        entities,
        registry: create_registry_descriptors(),
        ..StoreFixture::default()
    };
    fixture.programs.insert("P1".to_string(), create_programs());
    fixture.programs.insert(
        "P2".to_string(),
        ProgramSet {
            activation: "AC:300M:P2:1".to_string(),
            ..ProgramSet::default()
        },
    );
    fixture
}

#[allow(dead_code)]
pub fn create_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new(create_fixture()))
}

/// Wraps a `MemoryStore` and holds fetches and commits until released.
#[allow(dead_code)]
pub struct GatedStore {
    pub inner: Arc<MemoryStore>,
    pub fetch_gate: Option<Arc<Notify>>,
    pub commit_gate: Option<Arc<Notify>>,
}

#[async_trait]
impl ProgramStore for GatedStore {
    async fn fetch_product_programs(&self, entity_id: &str) -> Result<ProgramSet, StoreError> {
        if let Some(gate) = &self.fetch_gate {
            gate.notified().await;
        }
        self.inner.fetch_product_programs(entity_id).await
    }

    async fn fetch_known_entities(&self) -> Result<Vec<KnownEntity>, StoreError> {
        self.inner.fetch_known_entities().await
    }

    async fn fetch_operation_registry(&self) -> Result<Vec<OperationDescriptor>, StoreError> {
        self.inner.fetch_operation_registry().await
    }

    async fn commit_program(&self, request: &CommitRequest) -> Result<(), StoreError> {
        if let Some(gate) = &self.commit_gate {
            gate.notified().await;
        }
        self.inner.commit_program(request).await
    }
}

/// Opens a session over `store` with the default configuration.
#[allow(dead_code)]
pub fn open_session(store: Arc<dyn ProgramStore>) -> EditorSession {
    tokio_test::block_on(EditorSession::open(store, EditorConfig::default()))
        .expect("session should open")
}
