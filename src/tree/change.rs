use super::ProgramTree;

/// A frozen copy of a tree, used only as the baseline for change detection.
#[derive(Debug, Clone)]
pub struct Snapshot(ProgramTree);

impl Snapshot {
    pub fn capture(tree: &ProgramTree) -> Self {
        Self(tree.clone())
    }

    pub fn tree(&self) -> &ProgramTree {
        &self.0
    }
}

/// Returns true when `tree` is structurally identical to the baseline.
///
/// Entity nodes are compared by entity id and label, actions by every field of
/// their instruction. Node ids are not compared.
pub fn is_unchanged(tree: &ProgramTree, snapshot: &Snapshot) -> bool {
    let baseline = snapshot.tree().nodes();
    let live = tree.nodes();
    if live.len() != baseline.len() {
        return false;
    }

    live.iter().zip(baseline).all(|(node, base)| {
        node.actions.len() == base.actions.len()
            && node.entity_id == base.entity_id
            && node.label == base.label
            && node
                .actions
                .iter()
                .zip(&base.actions)
                .all(|(action, base)| {
                    let (a, b) = (&*action.instruction, &*base.instruction);
                    a.class == b.class
                        && a.function == b.function
                        && a.target_id == b.target_id
                        && a.params == b.params
                })
    })
}
