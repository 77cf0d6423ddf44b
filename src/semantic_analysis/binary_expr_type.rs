use super::{error_at, method_scopes, receiver_class, strip_parens};
use crate::ast::{Ast, BinaryOp, NodeId, NodeKind};
use crate::report::Report;
use crate::table::{SymbolTable, TypeResolver};

/// Arithmetic and relational operators take two non-array `int`
/// operands; `&&` takes two non-array `boolean` operands. A call on an
/// external class is rejected outright as an operand because its real
/// return type is unknowable here.
pub fn check(ast: &Ast, table: &SymbolTable, reports: &mut Vec<Report>) {
    for scope in method_scopes(ast) {
        let resolver = TypeResolver::new(table, scope.name);
        for id in ast.preorder(scope.decl) {
            let NodeKind::Binary { op, lhs, rhs } = ast.kind(id) else {
                continue;
            };
            let op = *op;
            let mut rejected = false;
            for operand in [*lhs, *rhs] {
                if is_external_call(ast, table, scope.name, operand) {
                    reports.push(error_at(
                        ast,
                        operand,
                        format!("operand of '{op}' is a call on an external class"),
                    ));
                    rejected = true;
                }
            }
            if rejected {
                continue;
            }
            let lhs_ty = resolver.expr_type(ast, *lhs);
            let rhs_ty = resolver.expr_type(ast, *rhs);
            let (Some(lhs_ty), Some(rhs_ty)) = (lhs_ty, rhs_ty) else {
                reports.push(error_at(
                    ast,
                    id,
                    format!("operand type of '{op}' could not be determined"),
                ));
                continue;
            };
            let ok = match op {
                BinaryOp::And => lhs_ty.is_boolean() && rhs_ty.is_boolean(),
                _ => lhs_ty.is_int() && rhs_ty.is_int(),
            };
            if !ok {
                reports.push(error_at(
                    ast,
                    id,
                    format!("operator '{op}' cannot be applied to '{lhs_ty}' and '{rhs_ty}'"),
                ));
            }
        }
    }
}

fn is_external_call(ast: &Ast, table: &SymbolTable, method: &str, id: NodeId) -> bool {
    let id = strip_parens(ast, id);
    let NodeKind::MethodCall { receiver, .. } = ast.kind(id) else {
        return false;
    };
    if matches!(ast.kind(strip_parens(ast, *receiver)), NodeKind::This) {
        return false;
    }
    receiver_class(ast, table, method, *receiver).is_some_and(|class| table.has_import(&class))
}
