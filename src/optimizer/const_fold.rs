use super::{apply_binary, ConstVal};
use crate::ast::{Ast, NodeId, NodeKind};

/// Post-order folding: a node whose operands are all literals is
/// replaced by the literal result, so nested expressions collapse
/// bottom-up within one pass.
pub fn run(ast: &mut Ast) -> bool {
    let mut changed = false;
    for method in ast.class_methods() {
        changed |= fold(ast, method);
    }
    changed
}

fn fold(ast: &mut Ast, id: NodeId) -> bool {
    let mut changed = false;
    for child in ast.children(id) {
        changed |= fold(ast, child);
    }
    changed |= fold_node(ast, id);
    changed
}

fn fold_node(ast: &mut Ast, id: NodeId) -> bool {
    let folded = match ast.kind(id) {
        NodeKind::Binary { op, lhs, rhs } => {
            let lhs = ConstVal::from_kind(ast.kind(*lhs));
            let rhs = ConstVal::from_kind(ast.kind(*rhs));
            match (lhs, rhs) {
                (Some(lhs), Some(rhs)) => apply_binary(*op, lhs, rhs),
                _ => None,
            }
        }
        NodeKind::Not(inner) => match ConstVal::from_kind(ast.kind(*inner)) {
            Some(ConstVal::Bool(b)) => Some(ConstVal::Bool(!b)),
            _ => None,
        },
        NodeKind::Parens(inner) => ConstVal::from_kind(ast.kind(*inner)),
        _ => None,
    };
    match folded {
        Some(value) => {
            ast.replace(id, value.into_kind());
            true
        }
        None => false,
    }
}
