use crate::ast::*;

/// Printing levels; an operand binding looser than its slot gets parens.
const ASSIGN_LEVEL: u8 = 0;
const PREFIX_LEVEL: u8 = 11;
const POSTFIX_LEVEL: u8 = 12;
const PRIMARY_LEVEL: u8 = 13;

fn level(expr: &Expr) -> u8 {
    match expr {
        Expr::Assign { .. } => ASSIGN_LEVEL,
        Expr::Infix { op, .. } => op.precedence(),
        Expr::Prefix { .. } => PREFIX_LEVEL,
        Expr::Literal(Literal::Int(n)) if *n < 0 => PREFIX_LEVEL,
        Expr::Postfix { .. } => POSTFIX_LEVEL,
        Expr::Literal(_) | Expr::Name(_) | Expr::Call { .. } => PRIMARY_LEVEL,
    }
}

/// Format an expression to a single-line string.
pub(crate) fn format_expr(expr: &Expr) -> String {
    match expr {
        Expr::Literal(lit) => lit.to_string(),
        Expr::Name(name) => name.clone(),
        Expr::Infix { op, lhs, rhs } => {
            let prec = op.precedence();
            let l = format_operand(&lhs.node, prec);
            let r = format_operand(&rhs.node, prec + 1);
            format!("{} {} {}", l, op.as_str(), r)
        }
        Expr::Prefix { op, operand } => {
            let inner = format_operand(&operand.node, PREFIX_LEVEL);
            // `- -x` must not print as `--x`, nor `+ +x` as `++x`.
            let clashes = match op {
                PrefixOp::Neg | PrefixOp::Dec => inner.starts_with('-'),
                PrefixOp::Inc => inner.starts_with('+'),
                PrefixOp::Not | PrefixOp::BitNot => false,
            };
            if clashes {
                format!("{}({})", op.as_str(), inner)
            } else {
                format!("{}{}", op.as_str(), inner)
            }
        }
        Expr::Postfix { op, operand } => {
            format!(
                "{}{}",
                format_operand(&operand.node, POSTFIX_LEVEL),
                op.as_str()
            )
        }
        Expr::Assign { op, target, value } => {
            format!(
                "{} {} {}",
                format_operand(&target.node, POSTFIX_LEVEL),
                op.as_str(),
                format_operand(&value.node, ASSIGN_LEVEL)
            )
        }
        Expr::Call { path, args } => {
            let args_str: Vec<String> = args.iter().map(|a| format_expr(&a.node)).collect();
            format!("{}({})", path.node, args_str.join(", "))
        }
    }
}

/// Format an expression with parentheses if it binds looser than `min_level`.
fn format_operand(expr: &Expr, min_level: u8) -> String {
    if level(expr) < min_level {
        return format!("({})", format_expr(expr));
    }
    format_expr(expr)
}
