//! Post-order traversal with a per-node end-visit hook.

use tracing::trace;

use crate::error::RewriteError;
use crate::tree::{NodeId, NodeKind, Tree};

/// Outcome of one end-visit: whether the hook rewrote anything, and the id
/// now standing where the visited node was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Folded {
    pub changed: bool,
    pub node: NodeId,
}

impl Folded {
    pub fn unchanged(node: NodeId) -> Self {
        Folded {
            changed: false,
            node,
        }
    }

    pub fn replaced(node: NodeId) -> Self {
        Folded {
            changed: true,
            node,
        }
    }
}

/// A per-node hook driven by [`traverse`].
pub trait Visitor {
    /// Whether `end_visit` should run for nodes of this kind.
    fn wants(&self, kind: &NodeKind) -> bool;

    /// Called after every child of `node` has been visited. May replace
    /// `node` through `Tree::replace`.
    fn end_visit(&mut self, tree: &mut Tree, node: NodeId) -> Result<Folded, RewriteError>;
}

/// Visit every node reachable from `root` in post-order, children in
/// order, and return whether any end-visit reported a change.
///
/// Children are read when their parent is first reached, so nodes a hook
/// puts into the tree are never visited in the same walk. Ids a hook made
/// stale are skipped. The id a hook reports must be live; a hook that
/// hands back a freed node fails the walk with `StaleNode`.
pub fn traverse<V: Visitor + ?Sized>(
    tree: &mut Tree,
    root: NodeId,
    hook: &mut V,
) -> Result<bool, RewriteError> {
    let mut changed = false;
    let mut stack = vec![(root, false)];

    while let Some((id, expanded)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        if !expanded {
            stack.push((id, true));
            stack.extend(node.children().iter().rev().map(|&c| (c, false)));
            continue;
        }
        if hook.wants(&node.kind) {
            let folded = hook.end_visit(tree, id)?;
            if !tree.contains(folded.node) {
                return Err(RewriteError::StaleNode { node: folded.node });
            }
            if folded.node != id {
                trace!(from = ?id, to = ?folded.node, "node replaced");
            }
            changed |= folded.changed;
        }
    }

    Ok(changed)
}
