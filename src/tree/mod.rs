//! Editable tree representation of a single route's program.
//!
//! A tree holds one [`EntityNode`] per distinct target, each owning the
//! [`ActionNode`]s that act on it. Trees are derived from program strings by
//! [`build`] and projected back by [`crate::program::encode_program`]; they are
//! never persisted directly.

use crate::program::{Instruction, PassthroughEntry, Route};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

mod builder;
mod change;
mod edit;

pub use builder::*;
pub use change::*;
pub use edit::*;

/// Identifies a node within one tree. Ids are never reused inside a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A single instruction inside an entity node.
#[derive(Debug, Clone)]
pub struct ActionNode {
    pub id: NodeId,
    pub instruction: Arc<Instruction>,
}

/// All actions of one target entity.
#[derive(Debug, Clone)]
pub struct EntityNode {
    pub id: NodeId,
    pub entity_id: String,
    pub label: String,
    pub actions: Vec<ActionNode>,
}

/// One row of the flattened editor view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeRow<'a> {
    Entity {
        id: NodeId,
        label: &'a str,
    },
    Action {
        id: NodeId,
        parent: NodeId,
        instruction: &'a Instruction,
    },
    /// Affordance for adding an action under `parent`.
    AppendAction { parent: NodeId },
    /// Affordance for adding a new entity.
    AppendEntity,
}

/// The live, editable tree of one route.
#[derive(Debug, Clone)]
pub struct ProgramTree {
    route: Route,
    nodes: Vec<EntityNode>,
    passthrough: Vec<PassthroughEntry>,
    label_len: usize,
    next_id: u32,
}

impl ProgramTree {
    pub fn empty(route: Route, label_len: usize) -> Self {
        Self {
            route,
            nodes: Vec::new(),
            passthrough: Vec::new(),
            label_len,
            next_id: 0,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn nodes(&self) -> &[EntityNode] {
        &self.nodes
    }

    /// Maintenance entries carried through from the parsed program.
    pub fn passthrough(&self) -> &[PassthroughEntry] {
        &self.passthrough
    }

    pub fn with_passthrough(mut self, passthrough: Vec<PassthroughEntry>) -> Self {
        self.passthrough = passthrough;
        self
    }

    /// Iterates over every action together with its parent entity.
    pub fn actions(&self) -> impl Iterator<Item = (&EntityNode, &ActionNode)> {
        self.nodes
            .iter()
            .flat_map(|node| node.actions.iter().map(move |action| (node, action)))
    }

    pub fn entity(&self, id: NodeId) -> Option<&EntityNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn action(&self, id: NodeId) -> Option<&ActionNode> {
        self.actions()
            .map(|(_, action)| action)
            .find(|a| a.id == id)
    }

    /// The flattened view, including the synthetic append rows.
    pub fn rows(&self) -> Vec<TreeRow<'_>> {
        let mut rows = Vec::new();
        for node in &self.nodes {
            rows.push(TreeRow::Entity {
                id: node.id,
                label: &node.label,
            });
            for action in &node.actions {
                rows.push(TreeRow::Action {
                    id: action.id,
                    parent: node.id,
                    instruction: &action.instruction,
                });
            }
            rows.push(TreeRow::AppendAction { parent: node.id });
        }
        rows.push(TreeRow::AppendEntity);
        rows
    }

    fn allocate_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn label_for(&self, entity_id: &str) -> String {
        entity_label(entity_id, self.label_len)
    }
}

/// Display label for an entity: its id truncated to `len` characters.
pub fn entity_label(entity_id: &str, len: usize) -> String {
    entity_id.chars().take(len).collect()
}
