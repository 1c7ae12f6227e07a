//! The editor session: single owner of the selection, the live tree, its
//! snapshot and the cached program strings of the selected entity.

use crate::commit::{CommitCoordinator, CommitOutcome};
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::program::{ProgramSet, Route, sanitize_set};
use crate::registry::RegistryIndex;
use crate::store::{KnownEntity, ProgramStore};
use crate::tree::{EditCommand, NodeId, ProgramTree, Snapshot, is_unchanged};
use ahash::AHashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};

mod token;

pub use token::SelectionToken;
use token::InFlight;

/// Whether a load installed its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// The selection changed while the programs were being fetched; the result
    /// was discarded.
    Superseded,
}

#[derive(Debug, Clone)]
struct Selection {
    entity_id: String,
    route: Route,
}

#[derive(Debug, Default)]
struct EditorState {
    selection: Option<Selection>,
    /// Sanitized programs of the selected entity.
    cache: Option<ProgramSet>,
    tree: Option<ProgramTree>,
    snapshot: Option<Snapshot>,
}

pub struct EditorSession {
    store: Arc<dyn ProgramStore>,
    registry: Arc<RegistryIndex>,
    entities: Vec<KnownEntity>,
    config: EditorConfig,
    coordinator: CommitCoordinator,
    generation: AtomicU64,
    committing: AtomicBool,
    state: Mutex<EditorState>,
}

impl EditorSession {
    /// Fetches the known entities and the operation registry, and opens a session
    /// with nothing selected.
    pub async fn open(
        store: Arc<dyn ProgramStore>,
        config: EditorConfig,
    ) -> Result<Self, EditorError> {
        let entities = store.fetch_known_entities().await?;
        let registry = Arc::new(RegistryIndex::prepare(
            store.fetch_operation_registry().await?,
        ));
        info!(
            entities = entities.len(),
            operations = registry.len(),
            "editor session opened"
        );

        let coordinator = CommitCoordinator::new(store.clone(), registry.clone(), config.clone());
        Ok(Self {
            store,
            registry,
            entities,
            config,
            coordinator,
            generation: AtomicU64::new(0),
            committing: AtomicBool::new(false),
            state: Mutex::new(EditorState::default()),
        })
    }

    pub fn registry(&self) -> &RegistryIndex {
        &self.registry
    }

    /// Entities as fetched when the session was opened.
    pub fn entities(&self) -> &[KnownEntity] {
        &self.entities
    }

    pub fn is_committing(&self) -> bool {
        self.committing.load(Ordering::SeqCst)
    }

    fn is_current(&self, token: SelectionToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.generation()
    }

    /// Selects an entity and route, discarding the current tree and snapshot.
    ///
    /// Any load or commit started under an earlier selection will not install its
    /// result once this returns.
    pub async fn select(&self, entity_id: &str, route: Route) -> SelectionToken {
        let mut state = self.state.lock().await;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *state = EditorState {
            selection: Some(Selection {
                entity_id: entity_id.to_string(),
                route,
            }),
            ..EditorState::default()
        };
        debug!(entity_id, %route, generation, "selection changed");
        SelectionToken::new(generation)
    }

    /// Fetches, sanitizes and builds the programs of the selection `token` was
    /// issued for.
    ///
    /// The known entities are fetched again alongside the programs, so sanitization
    /// uses the product list current at load time.
    pub async fn load(&self, token: SelectionToken) -> Result<LoadOutcome, EditorError> {
        let entity_id = {
            let state = self.state.lock().await;
            if !self.is_current(token) {
                return Ok(LoadOutcome::Superseded);
            }
            state
                .selection
                .as_ref()
                .ok_or(EditorError::NoSelection)?
                .entity_id
                .clone()
        };

        let fetched = self.store.fetch_product_programs(&entity_id).await;
        let entities = self.store.fetch_known_entities().await;

        let mut state = self.state.lock().await;
        if !self.is_current(token) {
            debug!(%entity_id, "dropping programs fetched for a superseded selection");
            return Ok(LoadOutcome::Superseded);
        }
        let route = state
            .selection
            .as_ref()
            .ok_or(EditorError::NoSelection)?
            .route;

        let programs = fetched?;
        let known: AHashSet<String> = entities?.into_iter().map(|e| e.id).collect();
        let cache = sanitize_set(&programs, &known);
        let tree = ProgramTree::from_program(cache.get(route), &entity_id, route, &self.config);
        info!(%entity_id, %route, entities = tree.nodes().len(), "program loaded");

        state.snapshot = Some(Snapshot::capture(&tree));
        state.tree = Some(tree);
        state.cache = Some(cache);
        Ok(LoadOutcome::Loaded)
    }

    /// Rebuilds the tree of another route from the cached programs, discarding
    /// unsaved edits.
    pub async fn switch_route(&self, route: Route) -> Result<SelectionToken, EditorError> {
        let mut state = self.state.lock().await;
        let entity_id = state
            .selection
            .as_ref()
            .ok_or(EditorError::NoSelection)?
            .entity_id
            .clone();
        let cache = state.cache.as_ref().ok_or(EditorError::NotLoaded)?;
        let tree = ProgramTree::from_program(cache.get(route), &entity_id, route, &self.config);

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(selection) = state.selection.as_mut() {
            selection.route = route;
        }
        state.snapshot = Some(Snapshot::capture(&tree));
        state.tree = Some(tree);
        Ok(SelectionToken::new(generation))
    }

    /// Applies an edit to the live tree.
    pub async fn apply(&self, command: EditCommand) -> Result<NodeId, EditorError> {
        let mut state = self.state.lock().await;
        let tree = state.tree.as_mut().ok_or(EditorError::NotLoaded)?;
        Ok(tree.apply(command)?)
    }

    /// A copy of the live tree.
    pub async fn tree(&self) -> Option<ProgramTree> {
        self.state.lock().await.tree.clone()
    }

    /// A copy of the cached, sanitized programs of the selected entity.
    pub async fn cached_programs(&self) -> Option<ProgramSet> {
        self.state.lock().await.cache.clone()
    }

    /// True when the live tree differs from its snapshot.
    pub async fn is_dirty(&self) -> bool {
        let state = self.state.lock().await;
        match (&state.tree, &state.snapshot) {
            (Some(tree), Some(snapshot)) => !is_unchanged(tree, snapshot),
            _ => false,
        }
    }

    /// Commits the live tree.
    ///
    /// Only one commit may be outstanding at a time. The commit works on copies of
    /// the session state; its results are installed only if the selection has
    /// not changed in the meantime.
    pub async fn commit(&self) -> Result<CommitOutcome, EditorError> {
        let _in_flight = InFlight::acquire(&self.committing).ok_or(EditorError::CommitInProgress)?;

        let (generation, entity_id, tree, mut snapshot, mut cache) = {
            let state = self.state.lock().await;
            let selection = state.selection.as_ref().ok_or(EditorError::NoSelection)?;
            match (&state.tree, &state.snapshot, &state.cache) {
                (Some(tree), Some(snapshot), Some(cache)) => (
                    self.generation.load(Ordering::SeqCst),
                    selection.entity_id.clone(),
                    tree.clone(),
                    snapshot.clone(),
                    cache.clone(),
                ),
                _ => return Err(EditorError::NotLoaded),
            }
        };

        let outcome = self
            .coordinator
            .commit(&tree, &mut snapshot, &mut cache, &entity_id)
            .await;

        if let CommitOutcome::Committed { .. } = outcome {
            let mut state = self.state.lock().await;
            if self.is_current(SelectionToken::new(generation)) {
                state.snapshot = Some(snapshot);
                state.cache = Some(cache);
            } else {
                debug!(%entity_id, "selection changed during commit; local state left as is");
            }
        }

        Ok(outcome)
    }
}
