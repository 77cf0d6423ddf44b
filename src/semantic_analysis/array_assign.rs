use super::{error_at, is_import_call, method_scopes};
use crate::ast::{Ast, NodeKind};
use crate::report::Report;
use crate::table::{SymbolTable, TypeResolver};

/// `arr[idx] := v` requires an `int` index, with the same tolerance
/// for import-call indices as plain array accesses.
pub fn check(ast: &Ast, table: &SymbolTable, reports: &mut Vec<Report>) {
    for scope in method_scopes(ast) {
        let resolver = TypeResolver::new(table, scope.name);
        for id in ast.preorder(scope.decl) {
            let NodeKind::ArrayAssign { var, index, .. } = ast.kind(id) else {
                continue;
            };
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
                    let target_is_array = table
                        .var_type(scope.name, var)
                        .is_some_and(|t| t.is_array);
                    if !(is_import_call(ast, table, *index) && target_is_array) {
                        reports.push(error_at(
                            ast,
                            *index,
                            format!("index into '{var}' was not declared"),
                        ));
                    }
                }
            }
        }
    }
}
