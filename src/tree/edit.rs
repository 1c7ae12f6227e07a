use super::{ActionNode, EntityNode, NodeId, ProgramTree};
use crate::error::EditError;
use crate::program::{Instruction, OpClass};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Highest number of params an instruction may carry.
pub const MAX_PARAMS: usize = 64;

/// The editable fields of an action's instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionField {
    Class,
    Function,
    /// Index into `Instruction::params`.
    Param(usize),
}

/// A single edit to a program tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EditCommand {
    /// Bind an entity node to another entity, re-targeting all its actions.
    SetEntity { node_id: NodeId, entity_id: String },
    SetInstructionField {
        node_id: NodeId,
        field: InstructionField,
        value: String,
    },
    /// Add an unbound entity node at the end of the tree.
    AppendEntity,
    /// Add an empty action under `parent_id`.
    AppendAction { parent_id: NodeId },
    /// Remove an entity node with all its actions, or a single action.
    DeleteNode { node_id: NodeId },
    /// Reorder an entity among entities, or an action within its parent.
    Move { node_id: NodeId, to_index: usize },
}

impl ProgramTree {
    /// Applies one edit and returns the id of the node it touched or created.
    ///
    /// Instructions are replaced copy-on-write, so snapshots taken earlier keep
    /// their own view of the tree.
    pub fn apply(&mut self, command: EditCommand) -> Result<NodeId, EditError> {
        match command {
            EditCommand::SetEntity { node_id, entity_id } => {
                check_token(&entity_id)?;
                let label = self.label_for(&entity_id);
                let node = self.entity_mut(node_id)?;
                for action in &mut node.actions {
                    if action.instruction.target_id != entity_id {
                        Arc::make_mut(&mut action.instruction).target_id = entity_id.clone();
                    }
                }
                node.entity_id = entity_id;
                node.label = label;
                Ok(node_id)
            }
            EditCommand::SetInstructionField {
                node_id,
                field,
                value,
            } => {
                check_token(&value)?;
                if let InstructionField::Param(index) = field {
                    if index >= MAX_PARAMS {
                        return Err(EditError::ParamOutOfRange {
                            node_id,
                            index,
                            limit: MAX_PARAMS,
                        });
                    }
                }
                let class = match field {
                    InstructionField::Class if !value.is_empty() => {
                        let class: OpClass = value
                            .parse()
                            .map_err(|_| EditError::InvalidToken(value.clone()))?;
                        if class.is_maintenance() {
                            return Err(EditError::MaintenanceClass(class.to_string()));
                        }
                        Some(class)
                    }
                    _ => None,
                };
                let action = self.action_mut(node_id)?;
                let mut updated = Instruction::clone(&action.instruction);
                set_field(&mut updated, field, value, class);
                if updated != *action.instruction {
                    action.instruction = Arc::new(updated);
                }
                Ok(node_id)
            }
            EditCommand::AppendEntity => {
                let id = self.allocate_id();
                self.nodes.push(EntityNode {
                    id,
                    entity_id: String::new(),
                    label: String::new(),
                    actions: Vec::new(),
                });
                Ok(id)
            }
            EditCommand::AppendAction { parent_id } => {
                let id = self.allocate_id();
                let parent = self.entity_mut(parent_id)?;
                let instruction = Instruction::draft(&parent.entity_id);
                parent.actions.push(ActionNode {
                    id,
                    instruction: Arc::new(instruction),
                });
                Ok(id)
            }
            EditCommand::DeleteNode { node_id } => {
                if let Some(pos) = self.nodes.iter().position(|n| n.id == node_id) {
                    self.nodes.remove(pos);
                    return Ok(node_id);
                }
                let (parent, pos) = self.locate_action(node_id)?;
                self.nodes[parent].actions.remove(pos);
                Ok(node_id)
            }
            EditCommand::Move { node_id, to_index } => {
                if let Some(pos) = self.nodes.iter().position(|n| n.id == node_id) {
                    move_within(&mut self.nodes, pos, to_index, node_id)?;
                    return Ok(node_id);
                }
                let (parent, pos) = self.locate_action(node_id)?;
                move_within(&mut self.nodes[parent].actions, pos, to_index, node_id)?;
                Ok(node_id)
            }
        }
    }

    fn entity_mut(&mut self, id: NodeId) -> Result<&mut EntityNode, EditError> {
        if self.action(id).is_some() {
            return Err(EditError::NotAnEntity(id));
        }
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(EditError::NodeNotFound(id))
    }

    fn action_mut(&mut self, id: NodeId) -> Result<&mut ActionNode, EditError> {
        let (parent, pos) = self.locate_action(id)?;
        Ok(&mut self.nodes[parent].actions[pos])
    }

    fn locate_action(&self, id: NodeId) -> Result<(usize, usize), EditError> {
        for (parent, node) in self.nodes.iter().enumerate() {
            if node.id == id {
                return Err(EditError::NotAnAction(id));
            }
            if let Some(pos) = node.actions.iter().position(|a| a.id == id) {
                return Ok((parent, pos));
            }
        }
        Err(EditError::NodeNotFound(id))
    }
}

fn set_field(
    instruction: &mut Instruction,
    field: InstructionField,
    value: String,
    class: Option<OpClass>,
) {
    match field {
        InstructionField::Class => {
            if instruction.class != class {
                instruction.class = class;
                instruction.function.clear();
                instruction.params.clear();
            }
        }
        InstructionField::Function => {
            if instruction.function != value {
                instruction.function = value;
                instruction.params.clear();
            }
        }
        InstructionField::Param(index) => {
            // `index` is bounded by `MAX_PARAMS` in `apply`.
            if instruction.params.len() <= index {
                instruction.params.resize(index + 1, String::new());
            }
            instruction.params[index] = value;
            // Trailing empties carry no information on the wire.
            while instruction.params.last().is_some_and(String::is_empty) {
                instruction.params.pop();
            }
        }
    }
}

fn move_within<T>(
    items: &mut Vec<T>,
    from: usize,
    to_index: usize,
    node_id: NodeId,
) -> Result<(), EditError> {
    if to_index >= items.len() {
        return Err(EditError::MoveOutOfRange {
            node_id,
            to_index,
            len: items.len(),
        });
    }
    let item = items.remove(from);
    items.insert(to_index, item);
    Ok(())
}

/// Values end up inside a `:`-delimited, space-separated string.
fn check_token(value: &str) -> Result<(), EditError> {
    if value.contains(':') || value.chars().any(char::is_whitespace) {
        return Err(EditError::InvalidToken(value.to_string()));
    }
    Ok(())
}
