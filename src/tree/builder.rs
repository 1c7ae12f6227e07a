use super::{ActionNode, EntityNode, ProgramTree};
use crate::config::EditorConfig;
use crate::program::{Instruction, Route, parse};
use ahash::AHashMap;
use std::sync::Arc;

/// Groups instructions by target into a tree for `route`.
///
/// Entity nodes follow the first-seen order of their targets; actions keep their
/// original relative order. Maintenance instructions are ignored.
pub fn build(instructions: &[Instruction], route: Route, label_len: usize) -> ProgramTree {
    let mut tree = ProgramTree::empty(route, label_len);
    let mut slots: AHashMap<&str, usize> = AHashMap::new();

    for instruction in instructions {
        if instruction
            .class
            .as_ref()
            .is_some_and(|class| class.is_maintenance())
        {
            continue;
        }

        let target = instruction.target_id.as_str();
        let slot = match slots.get(target) {
            Some(&slot) => slot,
            None => {
                let id = tree.allocate_id();
                let label = tree.label_for(target);
                tree.nodes.push(EntityNode {
                    id,
                    entity_id: target.to_string(),
                    label,
                    actions: Vec::new(),
                });
                slots.insert(target, tree.nodes.len() - 1);
                tree.nodes.len() - 1
            }
        };

        let id = tree.allocate_id();
        tree.nodes[slot].actions.push(ActionNode {
            id,
            instruction: Arc::new(instruction.clone()),
        });
    }

    tree
}

impl ProgramTree {
    /// Parses `program` and builds its tree, keeping maintenance entries for re-encoding.
    pub fn from_program(
        program: &str,
        fallback_target_id: &str,
        route: Route,
        config: &EditorConfig,
    ) -> Self {
        let parsed = parse(program, fallback_target_id);
        build(&parsed.instructions, route, config.label_len).with_passthrough(parsed.passthrough)
    }
}
