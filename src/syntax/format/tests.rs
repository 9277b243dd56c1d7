use crate::syntax::lexer::Lexer;
use crate::syntax::parser::Parser;

use super::*;

/// Helper: parse source and format it back.
fn fmt(source: &str) -> String {
    let (tokens, comments, lex_errors) = Lexer::new(source).tokenize();
    assert!(lex_errors.is_empty(), "lex errors: {:?}", lex_errors);
    let file = Parser::new(tokens).parse_file().unwrap();
    format_file(&file, &comments)
}

/// Helper: format a single expression statement inside a method.
fn fmt_expr(expr: &str) -> String {
    let out = fmt(&format!("class T {{ void m() {{ {}; }} }}", expr));
    out.lines()
        .nth(2)
        .unwrap()
        .trim()
        .trim_end_matches(';')
        .to_string()
}

// --- Basic formatting ---

#[test]
fn test_minimal_class() {
    let src = "class A {\n}\n";
    assert_eq!(fmt(src), src);
}

#[test]
fn test_class_members() {
    let src = "public class A {\n    private static final int X = 3;\n    String s;\n\n    int f(int a, boolean b) {\n        return a + X;\n    }\n\n    void g() {\n    }\n}\n";
    assert_eq!(fmt(src), src);
}

#[test]
fn test_normalizes_whitespace() {
    let input = "class   A{int f(){return 1+2;}}";
    assert_eq!(fmt(input), "class A {\n    int f() {\n        return 1 + 2;\n    }\n}\n");
}

#[test]
fn test_multiple_classes_separated() {
    let out = fmt("class A {} class B {}");
    assert_eq!(out, "class A {\n}\n\nclass B {\n}\n");
}

// --- Statements ---

#[test]
fn test_local_and_nested_block() {
    let src = "class A {\n    void m() {\n        int x = 1;\n        {\n            x = x + 1;\n        }\n        ;\n    }\n}\n";
    assert_eq!(fmt(src), src);
}

#[test]
fn test_if_else_chain() {
    let src = "class A {\n    void m() {\n        if (a) {\n            x = 1;\n        } else if (b) {\n            x = 2;\n        } else {\n            x = 3;\n        }\n    }\n}\n";
    assert_eq!(fmt(src), src);
}

#[test]
fn test_unbraced_branches() {
    let src = "class A {\n    void m() {\n        if (a)\n            x = 1;\n        else\n            x = 2;\n        while (x < 3)\n            x++;\n    }\n}\n";
    assert_eq!(fmt(src), src);
}

#[test]
fn test_for_loops() {
    let src = "class A {\n    void m() {\n        for (int i = 0; i < 10; i++) {\n            continue;\n        }\n        for (;;) {\n            break;\n        }\n    }\n}\n";
    assert_eq!(fmt(src), src);
}

#[test]
fn test_return_forms() {
    let src = "class A {\n    void m() {\n        return;\n    }\n\n    int n() {\n        return 0;\n    }\n}\n";
    assert_eq!(fmt(src), src);
}

// --- Expressions ---

#[test]
fn test_precedence_parens_kept_where_needed() {
    assert_eq!(fmt_expr("x = (a + b) * c"), "x = (a + b) * c");
    assert_eq!(fmt_expr("x = a + b * c"), "x = a + b * c");
    assert_eq!(fmt_expr("x = a - (b - c)"), "x = a - (b - c)");
    assert_eq!(fmt_expr("x = (a - b) - c"), "x = a - b - c");
}

#[test]
fn test_nested_assignment_gets_parens() {
    assert_eq!(fmt_expr("x = (y = 3) + 1"), "x = (y = 3) + 1");
    assert_eq!(fmt_expr("x = y = 3"), "x = y = 3");
}

#[test]
fn test_prefix_operators_do_not_merge() {
    assert_eq!(fmt_expr("x = -(-a)"), "x = -(-a)");
    assert_eq!(fmt_expr("x = -(--a)"), "x = -(--a)");
    assert_eq!(fmt_expr("x = !!b"), "x = !!b");
    assert_eq!(fmt_expr("x = -(a + b)"), "x = -(a + b)");
}

#[test]
fn test_literals_and_calls() {
    assert_eq!(fmt_expr("s = \"a\\\"b\\n\""), "s = \"a\\\"b\\n\"");
    assert_eq!(fmt_expr("x = -2147483648"), "x = -2147483648");
    assert_eq!(fmt_expr("System.out.println(a, null, true)"), "System.out.println(a, null, true)");
    assert_eq!(fmt_expr("x >>>= 3"), "x >>>= 3");
}

#[test]
fn test_long_call_wraps() {
    let arg = "a".repeat(40);
    let out = fmt(&format!("class T {{ void m() {{ f({0}, {0}, {0}); }} }}", arg));
    assert!(out.contains("f(\n"));
    assert!(out.contains(&format!("            {},\n", arg)));
}

// --- Comments ---

#[test]
fn test_comments_preserved() {
    let src = "// header\nclass A {\n    // field comment\n    int x = 1; // trailing\n\n    /* block */\n    void m() {\n        // inside\n        return;\n    }\n}\n";
    assert_eq!(fmt(src), src);
}

#[test]
fn test_trailing_comment_stays_on_its_line() {
    let src = "class A {\n    void m() {\n        a();\n        b(); // after b\n    }\n}\n";
    assert_eq!(fmt(src), src);
}

#[test]
fn test_idempotent() {
    let src = "class A{int f(int a){if(a>0){return a;}else return -a;}}";
    let once = fmt(src);
    assert_eq!(fmt(&once), once);
}

#[test]
fn test_synthesized_literals_print() {
    let file = File {
        classes: vec![crate::span::Spanned::dummy(ClassDef {
            modifiers: vec![],
            name: crate::span::Spanned::dummy("A".to_string()),
            members: vec![crate::span::Spanned::dummy(Member::Field(FieldDef {
                modifiers: vec![Modifier::Static],
                ty: crate::span::Spanned::dummy(Type::Int),
                name: crate::span::Spanned::dummy("N".to_string()),
                init: Some(crate::span::Spanned::dummy(Expr::Literal(Literal::Int(-7)))),
            }))],
        })],
    };
    assert_eq!(format_file(&file, &[]), "class A {\n    static int N = -7;\n}\n");
}
