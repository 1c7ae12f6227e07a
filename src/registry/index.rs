use super::descriptor::{OperationDescriptor, ParamField};
use crate::program::{Instruction, OpClass};
use ahash::AHashMap;
use tracing::debug;

/// Operation descriptors grouped by class, with maintenance classes removed.
#[derive(Debug, Clone, Default)]
pub struct RegistryIndex {
    by_class: AHashMap<OpClass, Vec<OperationDescriptor>>,
    class_order: Vec<OpClass>,
}

impl RegistryIndex {
    /// Groups raw descriptors by class. Classes keep their first-seen order.
    pub fn prepare(descriptors: Vec<OperationDescriptor>) -> Self {
        let mut index = Self::default();
        for descriptor in descriptors {
            if descriptor.class.is_maintenance() {
                debug!(
                    class = %descriptor.class,
                    function = %descriptor.function,
                    "skipping maintenance operation"
                );
                continue;
            }
            if !index.by_class.contains_key(&descriptor.class) {
                index.class_order.push(descriptor.class.clone());
            }
            index
                .by_class
                .entry(descriptor.class.clone())
                .or_default()
                .push(descriptor);
        }
        index
    }

    /// User-selectable classes.
    pub fn classes(&self) -> &[OpClass] {
        &self.class_order
    }

    pub fn operations(&self, class: &OpClass) -> &[OperationDescriptor] {
        self.by_class.get(class).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn descriptor(&self, class: &OpClass, function: &str) -> Option<&OperationDescriptor> {
        self.operations(class)
            .iter()
            .find(|d| d.function == function)
    }

    /// Looks up the descriptor an instruction refers to.
    pub fn resolve(&self, instruction: &Instruction) -> Option<&OperationDescriptor> {
        let class = instruction.class.as_ref()?;
        self.descriptor(class, &instruction.function)
    }

    pub fn param_schema(&self, class: &OpClass, function: &str) -> Option<Vec<ParamField>> {
        self.descriptor(class, function)
            .map(OperationDescriptor::param_schema)
    }

    pub fn editable_params(&self, class: &OpClass, function: &str) -> Option<Vec<ParamField>> {
        self.descriptor(class, function)
            .map(OperationDescriptor::editable_params)
    }

    pub fn len(&self) -> usize {
        self.by_class.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_class.is_empty()
    }
}
