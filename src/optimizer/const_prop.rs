use std::collections::HashMap;

use super::{apply_binary, ConstVal};
use crate::ast::{Ast, NodeId, NodeKind};

type Consts = HashMap<String, ConstVal>;

/// Per-method constant propagation. Identifier references whose value
/// is currently known are rewritten into literals in place. The map is
/// conservative around control flow: an `if`/`else` always restores
/// the pre-statement snapshot at the join, and a `while` restores the
/// full pre-loop snapshot after one walk of its condition and body.
pub fn run(ast: &mut Ast) -> bool {
    let mut changed = false;
    for method in ast.class_methods() {
        let NodeKind::MethodDecl { body, ret_expr, .. } = ast.kind(method) else {
            continue;
        };
        let body = body.clone();
        let ret_expr = *ret_expr;
        let mut consts = Consts::new();
        for stmt in body {
            changed |= visit_stmt(ast, stmt, &mut consts);
        }
        if let Some(ret) = ret_expr {
            changed |= visit_expr(ast, ret, &consts);
        }
    }
    changed
}

fn visit_stmt(ast: &mut Ast, id: NodeId, consts: &mut Consts) -> bool {
    match ast.kind(id).clone() {
        NodeKind::Block(stmts) => {
            let mut changed = false;
            for stmt in stmts {
                changed |= visit_stmt(ast, stmt, consts);
            }
            changed
        }
        NodeKind::Assign { var, value } => {
            let changed = visit_expr(ast, value, consts);
            match extract_const(ast, value, consts) {
                Some(known) => {
                    consts.insert(var, known);
                }
                None => {
                    consts.remove(&var);
                }
            }
            changed
        }
        NodeKind::ArrayAssign { index, value, .. } => {
            let mut changed = visit_expr(ast, index, consts);
            changed |= visit_expr(ast, value, consts);
            changed
        }
        NodeKind::ExprStmt(expr) => visit_expr(ast, expr, consts),
        NodeKind::If { cond, then, els } => {
            let mut changed = visit_expr(ast, cond, consts);
            let snapshot = consts.clone();
            changed |= visit_stmt(ast, then, consts);
            *consts = snapshot.clone();
            changed |= visit_stmt(ast, els, consts);
            *consts = snapshot;
            // A variable reassigned in either branch may hold either
            // value at the join, so its pre-branch constant is gone.
            evict_assigned(ast, then, consts);
            evict_assigned(ast, els, consts);
            changed
        }
        NodeKind::While { cond, body } => {
            let snapshot = consts.clone();
            // Loop-carried variables are unknown on every iteration
            // after the first, so they must not propagate into the
            // condition or the body.
            evict_assigned(ast, body, consts);
            let mut changed = visit_expr(ast, cond, consts);
            changed |= visit_stmt(ast, body, consts);
            *consts = snapshot;
            evict_assigned(ast, body, consts);
            changed
        }
        _ => false,
    }
}

fn evict_assigned(ast: &Ast, id: NodeId, consts: &mut Consts) {
    for node in ast.preorder(id) {
        if let NodeKind::Assign { var, .. } = ast.kind(node) {
            consts.remove(var);
        }
    }
}

fn visit_expr(ast: &mut Ast, id: NodeId, consts: &Consts) -> bool {
    if let NodeKind::Identifier(name) = ast.kind(id) {
        if let Some(&known) = consts.get(name) {
            ast.replace(id, known.into_kind());
            return true;
        }
        return false;
    }
    // Receivers are class-typed and never constant, so descending
    // into calls unconditionally is safe.
    let mut changed = false;
    for child in ast.children(id) {
        changed |= visit_expr(ast, child, consts);
    }
    changed
}

/// Recursively evaluates an expression against the known-constant
/// map, without rewriting it.
fn extract_const(ast: &Ast, id: NodeId, consts: &Consts) -> Option<ConstVal> {
    match ast.kind(id) {
        NodeKind::IntLiteral(v) => Some(ConstVal::Int(*v)),
        NodeKind::True => Some(ConstVal::Bool(true)),
        NodeKind::False => Some(ConstVal::Bool(false)),
        NodeKind::Identifier(name) => consts.get(name).copied(),
        NodeKind::Parens(inner) => extract_const(ast, *inner, consts),
        NodeKind::Not(inner) => match extract_const(ast, *inner, consts)? {
            ConstVal::Bool(b) => Some(ConstVal::Bool(!b)),
            ConstVal::Int(_) => None,
        },
        NodeKind::Binary { op, lhs, rhs } => {
            let lhs = extract_const(ast, *lhs, consts)?;
            let rhs = extract_const(ast, *rhs, consts)?;
            apply_binary(*op, lhs, rhs)
        }
        _ => None,
    }
}
