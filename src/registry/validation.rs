use super::index::RegistryIndex;
use crate::tree::{NodeId, ProgramTree};
use serde::Serialize;
use std::fmt;

/// A problem found when checking a tree against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// An entity node with no entity selected.
    UnboundEntity { node_id: NodeId },
    /// An action still missing its class or function.
    IncompleteInstruction { node_id: NodeId },
    /// An action whose class/function pair is not in the registry.
    UnknownOperation {
        node_id: NodeId,
        class: String,
        function: String,
    },
    MissingParam {
        node_id: NodeId,
        function: String,
        label: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundEntity { node_id } => write!(f, "{node_id}: no entity selected"),
            Self::IncompleteInstruction { node_id } => {
                write!(f, "{node_id}: class or function missing")
            }
            Self::UnknownOperation {
                node_id,
                class,
                function,
            } => write!(f, "{node_id}: unknown operation {class}:{function}"),
            Self::MissingParam {
                node_id,
                function,
                label,
            } => write!(f, "{node_id}: {function} requires '{label}'"),
        }
    }
}

impl RegistryIndex {
    /// Checks every node of `tree` against the registry schemas.
    pub fn validate(&self, tree: &ProgramTree) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for node in tree.nodes() {
            if node.entity_id.is_empty() {
                issues.push(ValidationIssue::UnboundEntity { node_id: node.id });
            }

            for action in &node.actions {
                let instruction = &action.instruction;
                let Some(class) = instruction
                    .class
                    .as_ref()
                    .filter(|_| !instruction.function.is_empty())
                else {
                    issues.push(ValidationIssue::IncompleteInstruction { node_id: action.id });
                    continue;
                };

                let Some(descriptor) = self.descriptor(class, &instruction.function) else {
                    issues.push(ValidationIssue::UnknownOperation {
                        node_id: action.id,
                        class: class.to_string(),
                        function: instruction.function.clone(),
                    });
                    continue;
                };

                for field in descriptor.editable_params() {
                    let filled = field
                        .key
                        .and_then(|key| instruction.params.get(key))
                        .is_some_and(|value| !value.is_empty());
                    if field.required && !filled {
                        issues.push(ValidationIssue::MissingParam {
                            node_id: action.id,
                            function: instruction.function.clone(),
                            label: field.label,
                        });
                    }
                }
            }
        }

        issues
    }
}
