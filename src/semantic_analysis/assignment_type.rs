use super::{error_at, method_scopes};
use crate::ast::{Ast, NodeKind};
use crate::report::Report;
use crate::table::{is_compatible, SymbolTable, TypeResolver};

/// `var := expr` must assign a value compatible with the declared
/// variable type. When both sides name imported classes the check is
/// skipped, since nothing is known about external hierarchies.
pub fn check(ast: &Ast, table: &SymbolTable, reports: &mut Vec<Report>) {
    for scope in method_scopes(ast) {
        let resolver = TypeResolver::new(table, scope.name);
        for id in ast.preorder(scope.decl) {
            let NodeKind::Assign { var, value } = ast.kind(id) else {
                continue;
            };
            let Some(declared) = table.var_type(scope.name, var) else {
                continue;
            };
            let Some(actual) = resolver.expr_type(ast, *value) else {
                continue;
            };
            if table.has_import(&declared.name) && table.has_import(&actual.name) {
                continue;
            }
            if !is_compatible(declared, &actual, table) {
                reports.push(error_at(
                    ast,
                    id,
                    format!(
                        "cannot assign a value of type '{actual}' to '{var}' of type '{declared}'"
                    ),
                ));
            }
        }
    }
}
