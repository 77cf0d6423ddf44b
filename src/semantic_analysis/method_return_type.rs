use super::{error_at, method_scopes};
use crate::ast::{Ast, NodeKind};
use crate::report::Report;
use crate::table::{SymbolTable, TypeResolver};

/// The trailing return expression must agree with the declared return
/// type by name. Skipped for `void` methods without a return, and
/// whenever the expression's type is unknown or names an imported
/// class.
pub fn check(ast: &Ast, table: &SymbolTable, reports: &mut Vec<Report>) {
    for scope in method_scopes(ast) {
        let NodeKind::MethodDecl { ret_expr, .. } = ast.kind(scope.decl) else {
            continue;
        };
        let Some(declared) = table.return_type(scope.name) else {
            continue;
        };
        let Some(ret) = ret_expr else {
            continue;
        };
        let resolver = TypeResolver::new(table, scope.name);
        let Some(actual) = resolver.expr_type(ast, *ret) else {
            continue;
        };
        if table.has_import(&actual.name) {
            continue;
        }
        if declared.name != actual.name {
            reports.push(error_at(
                ast,
                *ret,
                format!(
                    "'{}' returns '{actual}' but is declared to return '{declared}'",
                    scope.name
                ),
            ));
        }
    }
}
