//! AST-level optimizer: constant folding and constant propagation,
//! alternated until a full pass changes nothing. Runs only when the
//! optimize option is set; all rewrites happen in place on the arena.

mod const_fold;
mod const_prop;

use crate::ast::{Ast, BinaryOp, NodeKind};

pub fn optimize(ast: &mut Ast) {
    loop {
        let mut changed = const_prop::run(ast);
        changed |= const_fold::run(ast);
        if !changed {
            break;
        }
    }
}

/// A value an expression is known to reduce to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum ConstVal {
    Int(i32),
    Bool(bool),
}

impl ConstVal {
    pub(crate) fn into_kind(self) -> NodeKind {
        match self {
            Self::Int(v) => NodeKind::IntLiteral(v),
            Self::Bool(true) => NodeKind::True,
            Self::Bool(false) => NodeKind::False,
        }
    }

    pub(crate) fn from_kind(kind: &NodeKind) -> Option<Self> {
        match kind {
            NodeKind::IntLiteral(v) => Some(Self::Int(*v)),
            NodeKind::True => Some(Self::Bool(true)),
            NodeKind::False => Some(Self::Bool(false)),
            _ => None,
        }
    }
}

/// Applies a binary operator to two known values. `None` when the
/// operands don't fit the operator, on overflow, or on division by a
/// literal zero; such nodes are simply left unfolded.
pub(crate) fn apply_binary(op: BinaryOp, lhs: ConstVal, rhs: ConstVal) -> Option<ConstVal> {
    use ConstVal::{Bool, Int};
    match (op, lhs, rhs) {
        (BinaryOp::Add, Int(a), Int(b)) => a.checked_add(b).map(Int),
        (BinaryOp::Sub, Int(a), Int(b)) => a.checked_sub(b).map(Int),
        (BinaryOp::Mul, Int(a), Int(b)) => a.checked_mul(b).map(Int),
        (BinaryOp::Div, Int(a), Int(b)) => a.checked_div(b).map(Int),
        (BinaryOp::LessThan, Int(a), Int(b)) => Some(Bool(a < b)),
        (BinaryOp::GreaterThan, Int(a), Int(b)) => Some(Bool(a > b)),
        (BinaryOp::And, Bool(a), Bool(b)) => Some(Bool(a && b)),
        _ => None,
    }
}
