use crate::program::{Instruction, ProgramSet, Route, parse};
use crate::registry::RegistryIndex;
use crate::tree::ProgramTree;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Declares that a committed program contains an operation the backend must
/// account for when maintaining derived aggregates such as the virtual pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostOp {
    pub target_id: String,
    /// The operation's ratio parameter, if it has one and it is set.
    pub ratio: Option<String>,
    pub route: Route,
    pub function: String,
}

fn postop_for(
    registry: &RegistryIndex,
    instruction: &Instruction,
    route: Route,
) -> Option<PostOp> {
    let descriptor = registry.resolve(instruction)?;
    let tag = descriptor.postop.as_ref()?;
    let ratio = tag
        .ratio_param
        .and_then(|index| instruction.params.get(index))
        .filter(|value| !value.is_empty())
        .cloned();
    Some(PostOp {
        target_id: instruction.target_id.clone(),
        ratio,
        route,
        function: instruction.function.clone(),
    })
}

/// Collects the postops of a commit.
///
/// The edited tree is scanned first, then the cached programs of the other two
/// routes in route order. Duplicate records are dropped, keeping the first.
pub fn collect_postops(
    registry: &RegistryIndex,
    tree: &ProgramTree,
    cache: &ProgramSet,
    entity_id: &str,
) -> Vec<PostOp> {
    let route = tree.route();

    let from_tree: Vec<PostOp> = tree
        .actions()
        .filter(|(node, action)| !node.entity_id.is_empty() && action.instruction.is_complete())
        .filter_map(|(_, action)| postop_for(registry, &action.instruction, route))
        .collect();

    let from_others = route.others().flat_map(|other| {
        parse(cache.get(other), entity_id)
            .instructions
            .into_iter()
            .filter_map(move |instruction| postop_for(registry, &instruction, other))
    });

    from_tree.into_iter().chain(from_others).unique().collect()
}
