//! Splice bare nested blocks into their enclosing block.
//!
//! `{ a; { b; c; } d; }` becomes `{ a; b; c; d; }`. Only blocks that are
//! direct statements of another block are absorbed; the bodies of
//! methods, `if`, `while` and `for` belong to those statements and stay.
//! The walk is post-order, so by the time a block is visited its nested
//! blocks are already flat and one level of splicing suffices.

use tracing::{debug, trace};

use crate::error::RewriteError;
use crate::traverse::{traverse, Folded, Visitor};
use crate::tree::{NodeId, NodeKind, StmtKind, Tree};

use super::{check_fold_root, Pass};

#[derive(Clone, Copy, Debug, Default)]
pub struct BlockFolding;

impl Pass for BlockFolding {
    fn name(&self) -> &'static str {
        "block-folding"
    }

    fn fold(&mut self, tree: &mut Tree, node: NodeId) -> Result<bool, RewriteError> {
        check_fold_root(tree, node)?;
        traverse(tree, node, self)
    }
}

impl Visitor for BlockFolding {
    fn wants(&self, kind: &NodeKind) -> bool {
        kind.is_block()
    }

    fn end_visit(&mut self, tree: &mut Tree, block: NodeId) -> Result<Folded, RewriteError> {
        let nested = tree
            .children(block)
            .iter()
            .filter(|&&c| tree.kind(c).is_block())
            .count();
        trace!(?block, nested, "visit block");
        if nested == 0 {
            return Ok(Folded::unchanged(block));
        }

        let mut flat = Vec::new();
        for stmt in tree.take_children(block)? {
            if tree.kind(stmt).is_block() {
                flat.extend(tree.take_children(stmt)?);
                tree.discard(stmt)?;
            } else {
                flat.push(stmt);
            }
        }

        let span = tree.span(block);
        let folded = tree.alloc(NodeKind::Stmt(StmtKind::Block), span, flat)?;
        tree.replace(block, folded)?;
        debug!(?block, ?folded, nested, "spliced nested blocks");
        Ok(Folded::replaced(folded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{lower, raise};

    fn parse_tree(source: &str) -> Tree {
        lower(&crate::parse_source_silent(source, "test.java").unwrap())
    }

    fn print(tree: &Tree) -> String {
        crate::syntax::format::format_file(&raise(tree).unwrap(), &[])
    }

    fn method(body: &str) -> String {
        format!("class A {{\n    void m() {{\n{}    }}\n}}\n", body)
    }

    fn fold_source(source: &str) -> (bool, Tree) {
        let mut tree = parse_tree(source);
        let root = tree.root();
        let changed = BlockFolding.fold(&mut tree, root).unwrap();
        assert!(tree.check_links().is_ok());
        (changed, tree)
    }

    /// No block anywhere has a block as a direct child.
    fn no_nested_blocks(tree: &Tree) -> bool {
        tree.descendants(tree.root()).all(|n| {
            !tree.kind(n).is_block() || tree.children(n).iter().all(|&c| !tree.kind(c).is_block())
        })
    }

    #[test]
    fn test_order_preserved() {
        let (changed, tree) = fold_source("class A { void m() { a(); { b(); c(); } d(); } }");
        assert!(changed);
        assert_eq!(
            print(&tree),
            method("        a();\n        b();\n        c();\n        d();\n")
        );
    }

    #[test]
    fn test_deep_nesting_absorbed_in_one_pass() {
        let (changed, tree) = fold_source("class A { void m() { { { { x(); } } y(); } } }");
        assert!(changed);
        assert!(no_nested_blocks(&tree));
        assert_eq!(print(&tree), method("        x();\n        y();\n"));
    }

    #[test]
    fn test_empty_nested_block() {
        let (changed, tree) = fold_source("class A { void m() { {} } }");
        assert!(changed);
        assert_eq!(print(&tree), method(""));
    }

    #[test]
    fn test_nothing_to_fold() {
        let (changed, _) = fold_source("class A { void m() { a(); b(); } }");
        assert!(!changed);
    }

    #[test]
    fn test_second_fold_is_noop() {
        let (_, mut tree) = fold_source("class A { void m() { { a(); { b(); } } } }");
        let root = tree.root();
        assert!(!BlockFolding.fold(&mut tree, root).unwrap());
    }

    #[test]
    fn test_branch_bodies_kept() {
        let source = "class A { void m() { if (c) { { a(); } } else { b(); } while (c) { { d(); } } } }";
        let (changed, tree) = fold_source(source);
        assert!(changed);
        assert_eq!(
            print(&tree),
            method(
                "        if (c) {\n            a();\n        } else {\n            b();\n        }\n        while (c) {\n            d();\n        }\n"
            )
        );
    }

    #[test]
    fn test_statements_are_moved_not_copied() {
        let mut tree = parse_tree("class A { void m() { { a(); } } }");
        let class = tree.children(tree.root())[0];
        let method = tree.children(class)[0];
        let body = tree.children(method)[0];
        let inner = tree.children(body)[0];
        let stmt = tree.children(inner)[0];
        let before = tree.len();

        let root = tree.root();
        assert!(BlockFolding.fold(&mut tree, root).unwrap());

        // Same statement id, now directly under the new body.
        let new_body = tree.children(method)[0];
        assert_ne!(new_body, body);
        assert!(!tree.contains(body));
        assert!(!tree.contains(inner));
        assert_eq!(tree.children(new_body), &[stmt]);
        assert_eq!(tree.parent(stmt), Some(new_body));
        // Two blocks freed, one allocated.
        assert_eq!(tree.len(), before - 1);
    }

    #[test]
    fn test_fold_on_attached_subtree() {
        let mut tree = parse_tree("class A { void m() { { a(); } } void n() { { b(); } } }");
        let class = tree.children(tree.root())[0];
        let first = tree.children(class)[0];
        assert!(BlockFolding.fold(&mut tree, first).unwrap());
        // The second method is outside the folded subtree.
        let second = tree.children(class)[1];
        let body = tree.children(second)[0];
        assert!(tree.kind(tree.children(body)[0]).is_block());
    }

    #[test]
    fn test_invalid_root_leaves_tree_untouched() {
        let mut tree = parse_tree("class A { void m() { { a(); } } }");
        let class = tree.children(tree.root())[0];
        let method = tree.children(class)[0];
        let body = tree.children(method)[0];
        tree.detach(body).unwrap();
        let detached = tree.clone();

        assert_eq!(
            BlockFolding.fold(&mut tree, body),
            Err(RewriteError::InvalidRoot { node: body })
        );
        assert!(tree.same_shape(body, &detached, body));
        assert_eq!(tree.len(), detached.len());
    }
}
