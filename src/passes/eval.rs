//! Compile-time evaluation of Java operators on literals.
//!
//! Every function returns `None` when the result is not a compile-time
//! constant under Java rules: mismatched operand types, division by zero,
//! or reference comparisons on strings and `null`.

use crate::ast::{InfixOp, Literal, PrefixOp};

pub fn infix(op: InfixOp, lhs: &Literal, rhs: &Literal) -> Option<Literal> {
    use Literal::*;

    // String concatenation takes any literal on the other side.
    if op == InfixOp::Add {
        if let Str(a) = lhs {
            return Some(Str(format!("{}{}", a, concat_text(rhs))));
        }
        if let Str(b) = rhs {
            return Some(Str(format!("{}{}", concat_text(lhs), b)));
        }
    }

    match (lhs, rhs) {
        (Int(a), Int(b)) => int_infix(op, *a, *b),
        (Bool(a), Bool(b)) => bool_infix(op, *a, *b),
        _ => None,
    }
}

fn int_infix(op: InfixOp, a: i32, b: i32) -> Option<Literal> {
    let shift = (b & 31) as u32;
    let value = match op {
        InfixOp::Add => a.wrapping_add(b),
        InfixOp::Sub => a.wrapping_sub(b),
        InfixOp::Mul => a.wrapping_mul(b),
        InfixOp::Div if b == 0 => return None,
        InfixOp::Div => a.wrapping_div(b),
        InfixOp::Rem if b == 0 => return None,
        InfixOp::Rem => a.wrapping_rem(b),
        InfixOp::Shl => a.wrapping_shl(shift),
        InfixOp::Shr => a.wrapping_shr(shift),
        InfixOp::UShr => ((a as u32) >> shift) as i32,
        InfixOp::BitAnd => a & b,
        InfixOp::BitOr => a | b,
        InfixOp::BitXor => a ^ b,
        InfixOp::Lt => return Some(Literal::Bool(a < b)),
        InfixOp::Le => return Some(Literal::Bool(a <= b)),
        InfixOp::Gt => return Some(Literal::Bool(a > b)),
        InfixOp::Ge => return Some(Literal::Bool(a >= b)),
        InfixOp::Eq => return Some(Literal::Bool(a == b)),
        InfixOp::Ne => return Some(Literal::Bool(a != b)),
        InfixOp::And | InfixOp::Or => return None,
    };
    Some(Literal::Int(value))
}

fn bool_infix(op: InfixOp, a: bool, b: bool) -> Option<Literal> {
    let value = match op {
        InfixOp::And | InfixOp::BitAnd => a & b,
        InfixOp::Or | InfixOp::BitOr => a | b,
        InfixOp::BitXor | InfixOp::Ne => a ^ b,
        InfixOp::Eq => a == b,
        _ => return None,
    };
    Some(Literal::Bool(value))
}

/// How a literal reads when concatenated onto a string.
fn concat_text(lit: &Literal) -> String {
    match lit {
        Literal::Int(n) => n.to_string(),
        Literal::Bool(b) => b.to_string(),
        Literal::Str(s) => s.clone(),
        Literal::Null => "null".to_string(),
    }
}

pub fn prefix(op: PrefixOp, operand: &Literal) -> Option<Literal> {
    match (op, operand) {
        (PrefixOp::Neg, Literal::Int(n)) => Some(Literal::Int(n.wrapping_neg())),
        (PrefixOp::BitNot, Literal::Int(n)) => Some(Literal::Int(!n)),
        (PrefixOp::Not, Literal::Bool(b)) => Some(Literal::Bool(!b)),
        _ => None,
    }
}

/// The value `x` holds after `++x` / `x++` (`increment`) or their `--`
/// forms, given its value before.
pub fn step(value: &Literal, increment: bool) -> Option<Literal> {
    match value {
        Literal::Int(n) if increment => Some(Literal::Int(n.wrapping_add(1))),
        Literal::Int(n) => Some(Literal::Int(n.wrapping_sub(1))),
        _ => None,
    }
}
