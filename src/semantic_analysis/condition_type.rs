use super::{error_at, method_scopes};
use crate::ast::{Ast, NodeKind};
use crate::report::Report;
use crate::table::{SymbolTable, TypeResolver};

/// `if` and `while` conditions must be non-array `boolean`.
pub fn check(ast: &Ast, table: &SymbolTable, reports: &mut Vec<Report>) {
    for scope in method_scopes(ast) {
        let resolver = TypeResolver::new(table, scope.name);
        for id in ast.preorder(scope.decl) {
            let cond = match ast.kind(id) {
                NodeKind::If { cond, .. } | NodeKind::While { cond, .. } => *cond,
                _ => continue,
            };
            let ty = resolver.expr_type(ast, cond);
            if !ty.as_ref().is_some_and(crate::table::Type::is_boolean) {
                let found = ty.map_or_else(|| "unknown".to_string(), |t| t.to_string());
                reports.push(error_at(
                    ast,
                    cond,
                    format!("condition must be 'boolean', found '{found}'"),
                ));
            }
        }
    }
}
