use super::{error_at, is_import_call, method_scopes};
use crate::ast::{Ast, NodeKind};
use crate::report::Report;
use crate::table::{SymbolTable, TypeResolver};

/// `arr[idx]` needs an array-typed operand and an `int` index. An
/// index whose type is unknown is tolerated only when it is itself a
/// call on an imported class and the array operand really is an array.
pub fn check(ast: &Ast, table: &SymbolTable, reports: &mut Vec<Report>) {
    for scope in method_scopes(ast) {
        let resolver = TypeResolver::new(table, scope.name);
        for id in ast.preorder(scope.decl) {
            let NodeKind::ArrayIndex { array, index } = ast.kind(id) else {
                continue;
            };
            let Some(array_ty) = resolver.expr_type(ast, *array) else {
                reports.push(error_at(ast, *array, "array operand was not declared"));
                continue;
            };
            if !array_ty.is_array {
                reports.push(error_at(
                    ast,
                    *array,
                    format!("cannot index a value of type '{array_ty}'"),
                ));
                continue;
            }
            match resolver.expr_type(ast, *index) {
                Some(index_ty) if index_ty.is_int() => {}
                Some(index_ty) => {
                    reports.push(error_at(
                        ast,
                        *index,
                        format!("array index must be 'int', found '{index_ty}'"),
                    ));
                }
                None => {
                    if !is_import_call(ast, table, *index) {
                        reports.push(error_at(ast, *index, "array index was not declared"));
                    }
                }
            }
        }
    }
}
