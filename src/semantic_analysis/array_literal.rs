use super::{error_at, method_scopes};
use crate::ast::{Ast, NodeKind};
use crate::report::Report;
use crate::table::{SymbolTable, TypeResolver};

/// All elements of an array literal must have the type of the first.
pub fn check(ast: &Ast, table: &SymbolTable, reports: &mut Vec<Report>) {
    for scope in method_scopes(ast) {
        let resolver = TypeResolver::new(table, scope.name);
        for id in ast.preorder(scope.decl) {
            let NodeKind::ArrayLiteral(elems) = ast.kind(id) else {
                continue;
            };
            let Some((&first, rest)) = elems.split_first() else {
                continue;
            };
            let first_ty = resolver.expr_type(ast, first);
            for &elem in rest {
                if resolver.expr_type(ast, elem) != first_ty {
                    reports.push(error_at(
                        ast,
                        elem,
                        "array literal elements must all have the same type",
                    ));
                }
            }
        }
    }
}
