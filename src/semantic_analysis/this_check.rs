use super::{error_at, method_scopes};
use crate::ast::{Ast, NodeKind};
use crate::report::Report;
use crate::table::SymbolTable;

/// `this` has no meaning inside a static method.
pub fn check(ast: &Ast, _table: &SymbolTable, reports: &mut Vec<Report>) {
    for scope in method_scopes(ast) {
        if !scope.is_static {
            continue;
        }
        for id in ast.preorder(scope.decl) {
            if matches!(ast.kind(id), NodeKind::This) {
                reports.push(error_at(
                    ast,
                    id,
                    format!("'this' used in static method '{}'", scope.name),
                ));
            }
        }
    }
}
