use super::{error_at, method_scopes};
use crate::ast::{Ast, NodeKind};
use crate::report::Report;
use crate::table::SymbolTable;

/// Every identifier reference must resolve through parameters, locals,
/// fields or imports. Imports count as always-resolvable globals.
pub fn check(ast: &Ast, table: &SymbolTable, reports: &mut Vec<Report>) {
    for scope in method_scopes(ast) {
        for id in ast.preorder(scope.decl) {
            let name = match ast.kind(id) {
                NodeKind::Identifier(name) => name,
                NodeKind::Assign { var, .. } | NodeKind::ArrayAssign { var, .. } => var,
                _ => continue,
            };
            if table.var_type(scope.name, name).is_none() && !table.has_import(name) {
                reports.push(error_at(
                    ast,
                    id,
                    format!("variable '{name}' was not declared"),
                ));
            }
        }
    }
}
