//! Turns an edited tree into a single persistence call.

use crate::config::EditorConfig;
use crate::error::StoreError;
use crate::program::{ProgramSet, encode_program};
use crate::registry::{RegistryIndex, ValidationIssue};
use crate::store::{CommitRequest, ProgramStore};
use crate::tree::{ProgramTree, Snapshot, is_unchanged};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

mod postops;

pub use postops::*;

/// Why a commit did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitFailure {
    Store(StoreError),
    /// The tree failed registry validation and `reject_invalid` is set.
    Invalid(Vec<ValidationIssue>),
}

impl fmt::Display for CommitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitFailure::Store(err) => write!(f, "{err}"),
            CommitFailure::Invalid(issues) => {
                write!(f, "program failed validation ({} issue(s))", issues.len())
            }
        }
    }
}

/// The result of a commit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The tree matches its snapshot; nothing was sent.
    NoChange,
    Committed {
        program: String,
        postops: Vec<PostOp>,
    },
    /// Nothing was changed locally; the caller may retry.
    Failed(CommitFailure),
}

/// Encodes trees and persists them through a `ProgramStore`.
pub struct CommitCoordinator {
    store: Arc<dyn ProgramStore>,
    registry: Arc<RegistryIndex>,
    config: EditorConfig,
}

impl CommitCoordinator {
    pub fn new(
        store: Arc<dyn ProgramStore>,
        registry: Arc<RegistryIndex>,
        config: EditorConfig,
    ) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    /// Commits `tree` for `entity_id`.
    ///
    /// On success the cached program of the tree's route is replaced and the
    /// snapshot is re-captured from `tree`; the other routes' cached programs are
    /// left as they are. On failure neither `snapshot` nor `cache` is touched.
    pub async fn commit(
        &self,
        tree: &ProgramTree,
        snapshot: &mut Snapshot,
        cache: &mut ProgramSet,
        entity_id: &str,
    ) -> CommitOutcome {
        if is_unchanged(tree, snapshot) {
            return CommitOutcome::NoChange;
        }

        let route = tree.route();
        if self.config.reject_invalid {
            let issues = self.registry.validate(tree);
            if !issues.is_empty() {
                warn!(%route, entity_id, issues = issues.len(), "refusing to commit invalid program");
                return CommitOutcome::Failed(CommitFailure::Invalid(issues));
            }
        }

        let request = CommitRequest {
            route,
            entity_id: entity_id.to_string(),
            program: encode_program(tree, self.config.maintenance),
            postops: collect_postops(&self.registry, tree, cache, entity_id),
        };

        match self.store.commit_program(&request).await {
            Ok(()) => {
                info!(
                    %route,
                    entity_id,
                    postops = request.postops.len(),
                    "committed program"
                );
                cache.set(route, request.program.clone());
                *snapshot = Snapshot::capture(tree);
                CommitOutcome::Committed {
                    program: request.program,
                    postops: request.postops,
                }
            }
            Err(err) => {
                warn!(%route, entity_id, error = %err, "commit failed");
                CommitOutcome::Failed(CommitFailure::Store(err))
            }
        }
    }
}
