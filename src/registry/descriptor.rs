use crate::program::OpClass;
use serde::{Deserialize, Serialize};

/// The stock dimension an operation parameter mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Effect {
    StoredIncrease,
    StoredDecrease,
    ActiveIncrease,
    ActiveDecrease,
    Shipment,
    ReceiptRecord,
}

/// One positional slot of an operation's parameter schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSlot {
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

/// Marks an operation as relevant to other routes, so committing a program
/// that contains it must declare a postop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostOpTag {
    /// Index into `Instruction::params` of the ratio value, if the operation has one.
    #[serde(default)]
    pub ratio_param: Option<usize>,
}

/// A registry entry describing one `function` within a `class`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub class: OpClass,
    pub function: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub params: Vec<ParamSlot>,
    /// Schema slot holding the target entity. It is never an editable param.
    #[serde(default)]
    pub target_slot_index: usize,
    #[serde(default)]
    pub postop: Option<PostOpTag>,
}

/// A schema slot as presented to an editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamField {
    /// Position in the descriptor's schema.
    pub slot: usize,
    /// Index into `Instruction::params`; `None` for the hidden target slot.
    pub key: Option<usize>,
    pub label: String,
    pub required: bool,
    pub hidden: bool,
    pub effects: Vec<Effect>,
}

impl OperationDescriptor {
    /// The full schema, with the target slot marked hidden.
    pub fn param_schema(&self) -> Vec<ParamField> {
        let mut next_key = 0;
        self.params
            .iter()
            .enumerate()
            .map(|(slot, param)| {
                let hidden = slot == self.target_slot_index;
                let key = if hidden {
                    None
                } else {
                    next_key += 1;
                    Some(next_key - 1)
                };
                ParamField {
                    slot,
                    key,
                    label: param.label.clone(),
                    required: param.required,
                    hidden,
                    effects: param.effects.clone(),
                }
            })
            .collect()
    }

    /// Only the slots a user can edit.
    pub fn editable_params(&self) -> Vec<ParamField> {
        self.param_schema()
            .into_iter()
            .filter(|field| !field.hidden)
            .collect()
    }

    pub fn is_cross_route(&self) -> bool {
        self.postop.is_some()
    }
}
