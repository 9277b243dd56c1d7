use super::*;
use crate::ast::Literal;

fn lit(tree: &mut Tree, n: i32) -> NodeId {
    tree.alloc(
        NodeKind::Expr(ExprKind::Literal(Literal::Int(n))),
        Span::dummy(),
        vec![],
    )
    .unwrap()
}

fn block(tree: &mut Tree, stmts: Vec<NodeId>) -> NodeId {
    tree.alloc(NodeKind::Stmt(StmtKind::Block), Span::dummy(), stmts)
        .unwrap()
}

fn empty(tree: &mut Tree) -> NodeId {
    tree.alloc(NodeKind::Stmt(StmtKind::Empty), Span::dummy(), vec![])
        .unwrap()
}

fn parse_tree(source: &str) -> Tree {
    let file = crate::parse_source_silent(source, "test.java").unwrap();
    lower(&file)
}

/// Root -> class -> method -> body block, returned with the body id.
fn method_body(tree: &Tree) -> NodeId {
    let class = tree.children(tree.root())[0];
    let method = tree.children(class)[0];
    tree.children(method)[0]
}

#[test]
fn test_new_tree_has_empty_root() {
    let tree = Tree::new();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.kind(tree.root()), &NodeKind::CompilationUnit);
    assert!(tree.children(tree.root()).is_empty());
    assert!(tree.check_links().is_ok());
}

#[test]
fn test_alloc_adopts_floating_children() {
    let mut tree = Tree::new();
    let a = empty(&mut tree);
    let b = empty(&mut tree);
    let blk = block(&mut tree, vec![a, b]);
    assert_eq!(tree.children(blk), &[a, b]);
    assert_eq!(tree.parent(a), Some(blk));
    assert!(tree.is_floating(blk));
    assert!(!tree.is_floating(a));
    assert!(tree.check_links().is_ok());
}

#[test]
fn test_alloc_rejects_attached_child() {
    let mut tree = Tree::new();
    let a = empty(&mut tree);
    let _blk = block(&mut tree, vec![a]);
    let err = tree
        .alloc(NodeKind::Stmt(StmtKind::Block), Span::dummy(), vec![a])
        .unwrap_err();
    assert_eq!(err, RewriteError::AttachedNode { node: a });
}

#[test]
fn test_alloc_rejects_duplicate_and_root() {
    let mut tree = Tree::new();
    let a = empty(&mut tree);
    let err = tree
        .alloc(NodeKind::Stmt(StmtKind::Block), Span::dummy(), vec![a, a])
        .unwrap_err();
    assert_eq!(err, RewriteError::AttachedNode { node: a });
    let root = tree.root();
    assert!(tree
        .alloc(NodeKind::Stmt(StmtKind::Block), Span::dummy(), vec![root])
        .is_err());
    // Nothing was adopted by the failed calls.
    assert!(tree.is_floating(a));
}

#[test]
fn test_replace_swaps_position_and_frees_old() {
    let mut tree = parse_tree("class A { void m() { a(); b(); c(); } }");
    let body = method_body(&tree);
    let before = tree.len();
    let old = tree.children(body)[1];
    let old_expr = tree.children(old)[0];
    let new = empty(&mut tree);

    tree.replace(old, new).unwrap();

    assert_eq!(tree.children(body)[1], new);
    assert_eq!(tree.parent(new), Some(body));
    assert!(!tree.contains(old));
    assert!(!tree.contains(old_expr));
    // expr-stmt + call freed, empty added.
    assert_eq!(tree.len(), before - 1);
    assert!(tree.check_links().is_ok());
}

#[test]
fn test_replace_errors() {
    let mut tree = parse_tree("class A { void m() { a(); } }");
    let body = method_body(&tree);
    let stmt = tree.children(body)[0];
    let root = tree.root();

    let floating = empty(&mut tree);
    let other = empty(&mut tree);
    assert_eq!(
        tree.replace(floating, other),
        Err(RewriteError::DetachedNode { node: floating })
    );
    assert_eq!(
        tree.replace(root, other),
        Err(RewriteError::RootReplacement { node: root })
    );
    assert_eq!(
        tree.replace(stmt, body),
        Err(RewriteError::AttachedNode { node: body })
    );

    // A floating subtree containing the node being replaced.
    let inner = empty(&mut tree);
    let outer = block(&mut tree, vec![inner]);
    assert_eq!(
        tree.replace(inner, outer),
        Err(RewriteError::WouldCycle { node: outer })
    );
    assert!(tree.check_links().is_ok());
}

#[test]
fn test_stale_ids_are_rejected() {
    let mut tree = parse_tree("class A { void m() { a(); } }");
    let body = method_body(&tree);
    let stmt = tree.children(body)[0];
    let new = empty(&mut tree);
    tree.replace(stmt, new).unwrap();

    // The freed slot is reused, but the old id must not alias it.
    let reuse = empty(&mut tree);
    assert!(tree.contains(reuse));
    assert!(!tree.contains(stmt));
    assert!(tree.get(stmt).is_none());
    assert_eq!(
        tree.replace(stmt, reuse),
        Err(RewriteError::StaleNode { node: stmt })
    );
    assert_eq!(
        tree.discard(stmt),
        Err(RewriteError::StaleNode { node: stmt })
    );
}

#[test]
#[should_panic(expected = "stale node id")]
fn test_index_stale_panics() {
    let mut tree = Tree::new();
    let a = empty(&mut tree);
    tree.discard(a).unwrap();
    let _ = &tree[a];
}

#[test]
fn test_push_and_insert_child() {
    let mut tree = Tree::new();
    let blk = block(&mut tree, vec![]);
    let a = empty(&mut tree);
    let b = empty(&mut tree);
    let c = empty(&mut tree);
    tree.push_child(blk, a).unwrap();
    tree.push_child(blk, c).unwrap();
    tree.insert_child(blk, 1, b).unwrap();
    assert_eq!(tree.children(blk), &[a, b, c]);
    assert_eq!(
        tree.push_child(blk, a),
        Err(RewriteError::AttachedNode { node: a })
    );
    // A node cannot adopt its own floating ancestor.
    assert_eq!(
        tree.push_child(a, blk),
        Err(RewriteError::WouldCycle { node: blk })
    );
    assert!(tree.check_links().is_ok());
}

#[test]
fn test_take_children_and_detach() {
    let mut tree = Tree::new();
    let a = empty(&mut tree);
    let b = empty(&mut tree);
    let blk = block(&mut tree, vec![a, b]);
    let outer = block(&mut tree, vec![blk]);

    tree.detach(blk).unwrap();
    assert!(tree.children(outer).is_empty());
    assert!(tree.is_floating(blk));
    assert_eq!(tree.detach(blk), Err(RewriteError::DetachedNode { node: blk }));

    let taken = tree.take_children(blk).unwrap();
    assert_eq!(taken, vec![a, b]);
    assert!(tree.is_floating(a) && tree.is_floating(b));
    assert!(tree.check_links().is_ok());
}

#[test]
fn test_discard_frees_subtree() {
    let mut tree = Tree::new();
    let a = empty(&mut tree);
    let blk = block(&mut tree, vec![a]);
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.discard(a), Err(RewriteError::AttachedNode { node: a }));
    tree.discard(blk).unwrap();
    assert_eq!(tree.len(), 1);
    assert!(!tree.contains(a));
}

#[test]
fn test_set_root() {
    let mut tree = parse_tree("class A {}");
    let old = tree.root();
    let blk = block(&mut tree, vec![]);
    assert_eq!(tree.set_root(blk), Err(RewriteError::InvalidRoot { node: blk }));

    let unit = tree
        .alloc(NodeKind::CompilationUnit, Span::dummy(), vec![])
        .unwrap();
    tree.set_root(unit).unwrap();
    assert_eq!(tree.root(), unit);
    assert!(!tree.contains(old));
    // Only the new root and the stray block remain.
    assert_eq!(tree.len(), 2);
    assert!(tree.check_links().is_ok());
}

#[test]
fn test_deep_copy_is_independent() {
    let mut tree = parse_tree("class A { void m() { x = 1 + 2; { y(); } } }");
    let body = method_body(&tree);
    let copy = tree.deep_copy(body).unwrap();

    assert!(tree.is_floating(copy));
    assert!(tree.same_shape(body, &tree, copy));
    let originals: FxHashSet<NodeId> = tree.descendants(body).collect();
    assert!(tree.descendants(copy).all(|n| !originals.contains(&n)));
    assert!(tree.check_links().is_ok());

    tree.discard(copy).unwrap();
    assert!(tree.contains(body));
}

#[test]
fn test_same_shape_ignores_spans() {
    let a = parse_tree("class A { void m() { x = 1; } }");
    let b = parse_tree("class A {\n    void m() {\n        x   =   1;\n    }\n}");
    let c = parse_tree("class A { void m() { x = 2; } }");
    assert!(a.same_shape(a.root(), &b, b.root()));
    assert!(!a.same_shape(a.root(), &c, c.root()));
}

#[test]
fn test_descendants_pre_order() {
    let mut tree = Tree::new();
    let one = lit(&mut tree, 1);
    let two = lit(&mut tree, 2);
    let sum = tree
        .alloc(
            NodeKind::Expr(ExprKind::Infix(crate::ast::InfixOp::Add)),
            Span::dummy(),
            vec![one, two],
        )
        .unwrap();
    let order: Vec<NodeId> = tree.descendants(sum).collect();
    assert_eq!(order, vec![sum, one, two]);
}

#[test]
fn test_lower_raise_round_trip() {
    let source = "class A {\n    static int N = 3;\n\n    int f(int a) {\n        for (int i = 0; i < a; i++) {\n            if (i > 2)\n                break;\n            else\n                continue;\n        }\n        while (true) {\n            return a;\n        }\n    }\n}\n";
    let file = crate::parse_source_silent(source, "test.java").unwrap();
    let tree = lower(&file);
    assert!(tree.check_links().is_ok());
    let raised = raise(&tree).unwrap();
    assert_eq!(crate::syntax::format::format_file(&raised, &[]), source);
}

#[test]
fn test_raise_rejects_malformed_layout() {
    let mut tree = Tree::new();
    let root = tree.root();
    let one = lit(&mut tree, 1);
    // A class whose member is a bare literal.
    let class = tree
        .alloc(
            NodeKind::Class {
                modifiers: vec![],
                name: "A".into(),
            },
            Span::dummy(),
            vec![one],
        )
        .unwrap();
    tree.push_child(root, class).unwrap();
    assert!(matches!(
        raise(&tree),
        Err(RewriteError::MalformedNode { node, .. }) if node == one
    ));
}

#[test]
fn test_dump() {
    let tree = parse_tree("class A { void m() { x = 1; } }");
    let body = method_body(&tree);
    assert_eq!(
        tree.dump(body),
        "(block\n  (expr-stmt\n    (assign = (name x) (literal 1))))"
    );
}

#[test]
fn test_check_links_detects_corruption() {
    let mut tree = Tree::new();
    let a = empty(&mut tree);
    let blk = block(&mut tree, vec![a]);
    // Corrupt on purpose: list the child twice.
    tree.get_mut(blk).unwrap().children.push(a);
    assert!(matches!(
        tree.check_links(),
        Err(LinkViolation::NotListedOnce { count: 2, .. })
    ));
}
