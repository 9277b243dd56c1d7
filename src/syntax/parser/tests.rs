use super::*;
use crate::syntax::lexer::Lexer;

fn parse(source: &str) -> File {
    let (tokens, _comments, lex_diags) = Lexer::new(source).tokenize();
    assert!(lex_diags.is_empty(), "lex errors: {:?}", lex_diags);
    Parser::new(tokens).parse_file().unwrap()
}

fn parse_err(source: &str) -> Vec<Diagnostic> {
    let (tokens, _comments, _) = Lexer::new(source).tokenize();
    match Parser::new(tokens).parse_file() {
        Ok(_) => panic!("expected a parse error for {:?}", source),
        Err(diags) => diags,
    }
}

fn method_body(file: &File) -> &Block {
    match &file.classes[0].node.members[0].node {
        Member::Method(m) => &m.body.node,
        Member::Field(_) => panic!("expected method"),
    }
}

/// Parse `source` as the only statement of a method body.
fn parse_stmt(source: &str) -> Stmt {
    let file = parse(&format!("class T {{ void m() {{ {} }} }}", source));
    method_body(&file).stmts[0].node.clone()
}

fn parse_expr(source: &str) -> Expr {
    match parse_stmt(&format!("{};", source)) {
        Stmt::Expr(e) => e.node,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_empty_class() {
    let file = parse("public class Empty {}");
    assert_eq!(file.classes.len(), 1);
    let class = &file.classes[0].node;
    assert_eq!(class.name.node, "Empty");
    assert_eq!(class.modifiers, vec![Modifier::Public]);
    assert!(class.members.is_empty());
}

#[test]
fn test_fields_and_methods() {
    let file = parse(
        "class A {\n    private static final int X = 3;\n    String s;\n    int f(int a, boolean b) { return a; }\n}",
    );
    let members = &file.classes[0].node.members;
    assert_eq!(members.len(), 3);
    match &members[0].node {
        Member::Field(f) => {
            assert_eq!(f.name.node, "X");
            assert_eq!(f.ty.node, Type::Int);
            assert_eq!(f.modifiers.len(), 3);
            assert!(f.init.is_some());
        }
        _ => panic!("expected field"),
    }
    match &members[1].node {
        Member::Field(f) => {
            assert_eq!(f.ty.node, Type::Named("String".into()));
            assert!(f.init.is_none());
        }
        _ => panic!("expected field"),
    }
    match &members[2].node {
        Member::Method(m) => {
            assert_eq!(m.name.node, "f");
            assert_eq!(
                m.params,
                vec![
                    Param {
                        ty: Type::Int,
                        name: "a".into()
                    },
                    Param {
                        ty: Type::Boolean,
                        name: "b".into()
                    },
                ]
            );
            assert_eq!(m.body.node.stmts.len(), 1);
        }
        _ => panic!("expected method"),
    }
}

#[test]
fn test_multiple_classes() {
    let file = parse("class A {} class B {}");
    assert_eq!(file.classes.len(), 2);
    assert_eq!(file.classes[1].node.name.node, "B");
}

#[test]
fn test_local_declarations() {
    assert!(matches!(
        parse_stmt("int x = 1;"),
        Stmt::LocalVar { ty, init: Some(_), .. } if ty.node == Type::Int
    ));
    assert!(matches!(
        parse_stmt("String s;"),
        Stmt::LocalVar { ty, init: None, .. } if ty.node == Type::Named("String".into())
    ));
    assert!(matches!(
        parse_stmt("java.lang.String s = null;"),
        Stmt::LocalVar { ty, .. } if ty.node == Type::Named("java.lang.String".into())
    ));
}

#[test]
fn test_name_statement_is_not_a_declaration() {
    // `a = b;` starts with an identifier but is an assignment.
    assert!(matches!(parse_stmt("a = b;"), Stmt::Expr(_)));
    assert!(matches!(parse_stmt("System.out.println(1);"), Stmt::Expr(_)));
}

#[test]
fn test_precedence() {
    // a + b * c  =>  Add(a, Mul(b, c))
    match parse_expr("a + b * c") {
        Expr::Infix { op, rhs, .. } => {
            assert_eq!(op, InfixOp::Add);
            assert!(matches!(rhs.node, Expr::Infix { op: InfixOp::Mul, .. }));
        }
        other => panic!("expected infix, got {:?}", other),
    }
    // a || b && c  =>  Or(a, And(b, c))
    match parse_expr("a || b && c") {
        Expr::Infix { op, rhs, .. } => {
            assert_eq!(op, InfixOp::Or);
            assert!(matches!(rhs.node, Expr::Infix { op: InfixOp::And, .. }));
        }
        other => panic!("expected infix, got {:?}", other),
    }
}

#[test]
fn test_left_associativity() {
    // a - b - c  =>  Sub(Sub(a, b), c)
    match parse_expr("a - b - c") {
        Expr::Infix { op, lhs, rhs } => {
            assert_eq!(op, InfixOp::Sub);
            assert!(matches!(lhs.node, Expr::Infix { op: InfixOp::Sub, .. }));
            assert!(matches!(rhs.node, Expr::Name(ref n) if n == "c"));
        }
        other => panic!("expected infix, got {:?}", other),
    }
}

#[test]
fn test_parentheses_override_precedence() {
    match parse_expr("(a + b) * c") {
        Expr::Infix { op, lhs, .. } => {
            assert_eq!(op, InfixOp::Mul);
            assert!(matches!(lhs.node, Expr::Infix { op: InfixOp::Add, .. }));
        }
        other => panic!("expected infix, got {:?}", other),
    }
}

#[test]
fn test_assignment_is_right_associative() {
    match parse_expr("a = b = 3") {
        Expr::Assign { op, target, value } => {
            assert_eq!(op, AssignOp::Assign);
            assert!(matches!(target.node, Expr::Name(ref n) if n == "a"));
            assert!(matches!(value.node, Expr::Assign { .. }));
        }
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_compound_assignment() {
    assert!(matches!(
        parse_expr("x >>>= 2"),
        Expr::Assign {
            op: AssignOp::Compound(InfixOp::UShr),
            ..
        }
    ));
    assert!(matches!(
        parse_expr("x += 1"),
        Expr::Assign {
            op: AssignOp::Compound(InfixOp::Add),
            ..
        }
    ));
}

#[test]
fn test_prefix_and_postfix() {
    assert!(matches!(
        parse_expr("i++"),
        Expr::Postfix {
            op: PostfixOp::Inc,
            ..
        }
    ));
    assert!(matches!(
        parse_expr("--i"),
        Expr::Prefix {
            op: PrefixOp::Dec,
            ..
        }
    ));
    match parse_expr("!!b") {
        Expr::Prefix { op, operand } => {
            assert_eq!(op, PrefixOp::Not);
            assert!(matches!(operand.node, Expr::Prefix { op: PrefixOp::Not, .. }));
        }
        other => panic!("expected prefix, got {:?}", other),
    }
}

#[test]
fn test_int_min_literal() {
    assert!(matches!(
        parse_expr("x = -2147483648"),
        Expr::Assign { value, .. } if matches!(value.node, Expr::Literal(Literal::Int(i32::MIN)))
    ));
}

#[test]
fn test_negative_literals() {
    assert!(matches!(
        parse_expr("x = -5"),
        Expr::Assign { value, .. } if matches!(value.node, Expr::Literal(Literal::Int(-5)))
    ));
    // Parenthesized operands and binary minus stay operators.
    assert!(matches!(
        parse_expr("x = -(5)"),
        Expr::Assign { value, .. } if matches!(value.node, Expr::Prefix { op: PrefixOp::Neg, .. })
    ));
    assert!(matches!(
        parse_expr("x = 3 -5"),
        Expr::Assign { value, .. } if matches!(value.node, Expr::Infix { op: InfixOp::Sub, .. })
    ));
}

#[test]
fn test_integer_out_of_range() {
    let diags = parse_err("class T { int x = 2147483648; }");
    assert!(diags[0].message.contains("out of range"));
}

#[test]
fn test_calls() {
    match parse_expr("Math.max(a, 3)") {
        Expr::Call { path, args } => {
            assert_eq!(path.node, "Math.max");
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected call, got {:?}", other),
    }
    assert!(matches!(parse_expr("f()"), Expr::Call { args, .. } if args.is_empty()));
}

#[test]
fn test_literals() {
    assert!(matches!(parse_expr("x = \"hi\""), Expr::Assign { value, .. }
        if matches!(value.node, Expr::Literal(Literal::Str(ref s)) if s == "hi")));
    assert!(matches!(parse_expr("x = null"), Expr::Assign { value, .. }
        if matches!(value.node, Expr::Literal(Literal::Null))));
    assert!(matches!(parse_expr("x = true"), Expr::Assign { value, .. }
        if matches!(value.node, Expr::Literal(Literal::Bool(true)))));
}

#[test]
fn test_if_else_chain() {
    match parse_stmt("if (a) x = 1; else if (b) x = 2; else { x = 3; }") {
        Stmt::If {
            else_branch: Some(else_branch),
            ..
        } => {
            assert!(matches!(else_branch.node, Stmt::If { else_branch: Some(_), .. }));
        }
        other => panic!("expected if/else, got {:?}", other),
    }
}

#[test]
fn test_loops() {
    assert!(matches!(parse_stmt("while (x < 10) x++;"), Stmt::While { .. }));
    match parse_stmt("for (int i = 0; i < n; i++) { s += i; }") {
        Stmt::For {
            init: Some(init),
            cond: Some(_),
            update: Some(_),
            body,
        } => {
            assert!(matches!(init.node, Stmt::LocalVar { .. }));
            assert!(matches!(body.node, Stmt::Block(_)));
        }
        other => panic!("expected for, got {:?}", other),
    }
    assert!(matches!(
        parse_stmt("for (;;) break;"),
        Stmt::For {
            init: None,
            cond: None,
            update: None,
            ..
        }
    ));
}

#[test]
fn test_jumps_and_empty() {
    let file = parse("class T { int m() { ; return 1; } void n() { while (true) { continue; } } }");
    let stmts = &method_body(&file).stmts;
    assert!(matches!(stmts[0].node, Stmt::Empty));
    assert!(matches!(stmts[1].node, Stmt::Return(Some(_))));
}

#[test]
fn test_nested_blocks() {
    match parse_stmt("{ { x = 1; } }") {
        Stmt::Block(outer) => {
            assert_eq!(outer.stmts.len(), 1);
            assert!(matches!(outer.stmts[0].node, Stmt::Block(_)));
        }
        other => panic!("expected block, got {:?}", other),
    }
}

#[test]
fn test_spans_cover_source() {
    let source = "class T { void m() { x = 1; } }";
    let file = parse(source);
    let class = &file.classes[0];
    assert_eq!(class.span.start, 0);
    assert_eq!(class.span.end as usize, source.len());
}

#[test]
fn test_missing_semicolon() {
    let diags = parse_err("class T { void m() { x = 1 } }");
    assert!(diags[0].message.contains("expected ';'"));
}

#[test]
fn test_invalid_assignment_target() {
    let diags = parse_err("class T { void m() { 1 = 2; } }");
    assert!(diags[0].message.contains("invalid assignment target"));
}

#[test]
fn test_declaration_as_branch_rejected() {
    let diags = parse_err("class T { void m() { if (a) int x = 1; } }");
    assert!(diags[0].message.contains("declaration is not allowed"));
}

#[test]
fn test_void_field_rejected() {
    let diags = parse_err("class T { void x; }");
    assert!(diags[0].message.contains("void"));
}

#[test]
fn test_top_level_statement_rejected() {
    let diags = parse_err("x = 1;");
    assert!(diags[0].message.contains("expected 'class'"));
}

#[test]
fn test_deep_nesting_is_reported() {
    let source = format!(
        "class T {{ void m() {{ x = {}1{}; }} }}",
        "(".repeat(300),
        ")".repeat(300)
    );
    let diags = parse_err(&source);
    assert!(diags.iter().any(|d| d.message.contains("nesting depth")));
}
