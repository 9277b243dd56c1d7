//! Mutable program tree for in-place rewriting.
//!
//! Nodes live in an arena and are addressed by [`NodeId`], an index plus a
//! generation. Freeing a node bumps its slot's generation, so an id that
//! outlives its node can never alias whatever reuses the slot: lookups
//! through it fail with [`RewriteError::StaleNode`] and indexing panics.
//!
//! Every primitive keeps the link invariant: a node's parent lists it
//! exactly once among its children, no node is shared, and no node is its
//! own ancestor. Nodes with no parent that are not the root are
//! *floating*; they are what `alloc`, `deep_copy` and `detach` produce and
//! what `replace` and `push_child` accept.

mod display;
mod kind;
mod lower;
mod raise;

#[cfg(test)]
mod tests;

use std::fmt;
use std::ops::Index;

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::error::RewriteError;
use crate::span::Span;

pub use kind::{ExprKind, NodeKind, StmtKind};
pub use lower::lower;
pub use raise::raise;

/// Generation-checked handle to a node in a [`Tree`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A broken parent/child link found by [`Tree::check_links`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LinkViolation {
    #[error("{child:?} names {parent:?} as parent, which lists it {count} times")]
    NotListedOnce {
        child: NodeId,
        parent: NodeId,
        count: usize,
    },
    #[error("{child:?} names a freed parent")]
    StaleParent { child: NodeId },
    #[error("{parent:?} lists {child:?}, whose parent is {actual:?}")]
    WrongParent {
        parent: NodeId,
        child: NodeId,
        actual: Option<NodeId>,
    },
    #[error("{parent:?} lists a freed child {child:?}")]
    StaleChild { parent: NodeId, child: NodeId },
    #[error("{node:?} is its own ancestor")]
    Cycle { node: NodeId },
    #[error("root {root:?} has a parent")]
    RootHasParent { root: NodeId },
}

#[derive(Clone, Debug)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    live: usize,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// A tree whose root is an empty compilation unit.
    pub fn new() -> Self {
        let mut tree = Tree {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            live: 0,
        };
        tree.root = tree.insert(NodeKind::CompilationUnit, Span::dummy(), Vec::new());
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, floating ones included.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, RewriteError> {
        self.get_mut(id).ok_or(RewriteError::StaleNode { node: id })
    }

    fn check_live(&self, id: NodeId) -> Result<&Node, RewriteError> {
        self.get(id).ok_or(RewriteError::StaleNode { node: id })
    }

    /// Kind of `id`. Panics on a stale id.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self[id].kind
    }

    /// Span of `id`. Panics on a stale id.
    pub fn span(&self, id: NodeId) -> Span {
        self[id].span
    }

    /// Children of `id` in order. Panics on a stale id.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self[id].children
    }

    /// Parent of `id`. Panics on a stale id.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    /// A live node that has no parent and is not the root.
    pub fn is_floating(&self, id: NodeId) -> bool {
        id != self.root && self.get(id).is_some_and(|n| n.parent.is_none())
    }

    /// Whether `ancestor` is `node` or lies on its parent chain.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Allocate without checks. Callers guarantee every child is floating
    /// and listed once.
    fn insert(&mut self, kind: NodeKind, span: Span, children: Vec<NodeId>) -> NodeId {
        let id = match self.free.pop() {
            Some(index) => NodeId {
                index,
                generation: self.slots[index as usize].generation,
            },
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: None,
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        };
        for &child in &children {
            if let Some(c) = self.get_mut(child) {
                c.parent = Some(id);
            }
        }
        self.slots[id.index as usize].node = Some(Node {
            kind,
            span,
            parent: None,
            children,
        });
        self.live += 1;
        id
    }

    fn check_floating(&self, id: NodeId) -> Result<(), RewriteError> {
        let node = self.check_live(id)?;
        if node.parent.is_some() || id == self.root {
            return Err(RewriteError::AttachedNode { node: id });
        }
        Ok(())
    }

    /// Allocate a floating node adopting `children`, which must all be
    /// floating and distinct.
    pub fn alloc(
        &mut self,
        kind: NodeKind,
        span: Span,
        children: Vec<NodeId>,
    ) -> Result<NodeId, RewriteError> {
        let mut seen = FxHashSet::default();
        for &child in &children {
            self.check_floating(child)?;
            if !seen.insert(child) {
                return Err(RewriteError::AttachedNode { node: child });
            }
        }
        Ok(self.insert(kind, span, children))
    }

    /// A floating copy of the subtree at `id` sharing no nodes with it.
    pub fn deep_copy(&mut self, id: NodeId) -> Result<NodeId, RewriteError> {
        let node = self.check_live(id)?;
        let (kind, span) = (node.kind.clone(), node.span);
        let copy_root = self.insert(kind, span, Vec::new());

        let mut work = vec![(id, copy_root)];
        while let Some((src, dst)) = work.pop() {
            let children = self[src].children.clone();
            for child in children {
                let node = &self[child];
                let (kind, span) = (node.kind.clone(), node.span);
                let copy = self.insert(kind, span, Vec::new());
                self.link(dst, copy);
                work.push((child, copy));
            }
        }
        Ok(copy_root)
    }

    /// Append a floating `child` to `parent`'s children.
    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn check_adoptable(&self, parent: NodeId, child: NodeId) -> Result<(), RewriteError> {
        self.check_live(parent)?;
        self.check_floating(child)?;
        if self.is_ancestor(child, parent) {
            return Err(RewriteError::WouldCycle { node: child });
        }
        Ok(())
    }

    /// Append floating `child` as the last child of `parent`.
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), RewriteError> {
        self.check_adoptable(parent, child)?;
        self.link(parent, child);
        Ok(())
    }

    /// Insert floating `child` at `index` among `parent`'s children.
    ///
    /// Panics if `index` is greater than the number of children, like
    /// `Vec::insert`.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), RewriteError> {
        self.check_adoptable(parent, child)?;
        self.node_mut(parent)?.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach every child of `id` and return them, in order, as floating
    /// nodes.
    pub fn take_children(&mut self, id: NodeId) -> Result<Vec<NodeId>, RewriteError> {
        let children = std::mem::take(&mut self.node_mut(id)?.children);
        for &child in &children {
            self.node_mut(child)?.parent = None;
        }
        Ok(children)
    }

    /// Remove `id` from its parent's children, leaving it floating.
    pub fn detach(&mut self, id: NodeId) -> Result<(), RewriteError> {
        let parent = self.attached_parent(id)?;
        self.node_mut(parent)?.children.retain(|&c| c != id);
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    fn attached_parent(&self, id: NodeId) -> Result<NodeId, RewriteError> {
        let node = self.check_live(id)?;
        if id == self.root {
            return Err(RewriteError::RootReplacement { node: id });
        }
        node.parent.ok_or(RewriteError::DetachedNode { node: id })
    }

    /// Free a floating subtree.
    pub fn discard(&mut self, id: NodeId) -> Result<(), RewriteError> {
        if id == self.root {
            return Err(RewriteError::RootReplacement { node: id });
        }
        self.check_floating(id)?;
        self.free_subtree(id);
        Ok(())
    }

    /// Make the floating compilation unit `id` the root and free the old
    /// root's subtree.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), RewriteError> {
        self.check_floating(id)?;
        if self[id].kind != NodeKind::CompilationUnit {
            return Err(RewriteError::InvalidRoot { node: id });
        }
        let old = std::mem::replace(&mut self.root, id);
        self.free_subtree(old);
        Ok(())
    }

    /// Put the floating `new` at `node`'s position in its parent and free
    /// `node`'s subtree. All ids inside that subtree become stale.
    pub fn replace(&mut self, node: NodeId, new: NodeId) -> Result<(), RewriteError> {
        let parent = self.attached_parent(node)?;
        self.check_floating(new)?;
        if self.is_ancestor(new, node) {
            return Err(RewriteError::WouldCycle { node: new });
        }

        let siblings = &mut self.node_mut(parent)?.children;
        if let Some(slot) = siblings.iter_mut().find(|c| **c == node) {
            *slot = new;
        }
        self.node_mut(new)?.parent = Some(parent);
        self.node_mut(node)?.parent = None;
        self.free_subtree(node);
        Ok(())
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let Some(slot) = self.slots.get_mut(cur.index as usize) else {
                continue;
            };
            if slot.generation != cur.generation {
                continue;
            }
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(cur.index);
                self.live -= 1;
                stack.extend(node.children);
            }
        }
    }

    /// Pre-order iterator over the subtree at `id`, `id` first.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.contains(id) { vec![id] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// Whether the subtree at `a` and the subtree at `b` in `other` have
    /// the same kinds in the same arrangement. Ids and spans are ignored.
    pub fn same_shape(&self, a: NodeId, other: &Tree, b: NodeId) -> bool {
        let mut stack = vec![(a, b)];
        while let Some((x, y)) = stack.pop() {
            let (Some(nx), Some(ny)) = (self.get(x), other.get(y)) else {
                return false;
            };
            if nx.kind != ny.kind || nx.children.len() != ny.children.len() {
                return false;
            }
            stack.extend(nx.children.iter().copied().zip(ny.children.iter().copied()));
        }
        true
    }

    /// Verify parent/child links over every live node.
    pub fn check_links(&self) -> Result<(), LinkViolation> {
        if self.get(self.root).is_some_and(|n| n.parent.is_some()) {
            return Err(LinkViolation::RootHasParent { root: self.root });
        }
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(node) = &slot.node else { continue };
            let id = NodeId {
                index: index as u32,
                generation: slot.generation,
            };
            if let Some(parent) = node.parent {
                let Some(p) = self.get(parent) else {
                    return Err(LinkViolation::StaleParent { child: id });
                };
                let count = p.children.iter().filter(|&&c| c == id).count();
                if count != 1 {
                    return Err(LinkViolation::NotListedOnce {
                        child: id,
                        parent,
                        count,
                    });
                }
            }
            for &child in &node.children {
                let Some(c) = self.get(child) else {
                    return Err(LinkViolation::StaleChild { parent: id, child });
                };
                if c.parent != Some(id) {
                    return Err(LinkViolation::WrongParent {
                        parent: id,
                        child,
                        actual: c.parent,
                    });
                }
            }
            // A parent chain longer than the tree is a loop.
            let mut cur = node.parent;
            let mut steps = 0;
            while let Some(p) = cur {
                if p == id || steps > self.live {
                    return Err(LinkViolation::Cycle { node: id });
                }
                steps += 1;
                cur = self.get(p).and_then(|n| n.parent);
            }
        }
        Ok(())
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node id {:?}", id),
        }
    }
}

pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.tree.get(id) {
            self.stack.extend(node.children.iter().rev());
        }
        Some(id)
    }
}
