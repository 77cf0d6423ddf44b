use super::{error_at, method_scopes, receiver_class};
use crate::ast::{Ast, NodeKind};
use crate::report::Report;
use crate::table::SymbolTable;

/// A call must name a declared method or target an imported class.
/// Calls on the current class are also accepted when its declared
/// superclass is an import, since the external class is assumed to
/// provide the method.
pub fn check(ast: &Ast, table: &SymbolTable, reports: &mut Vec<Report>) {
    for scope in method_scopes(ast) {
        for id in ast.preorder(scope.decl) {
            let NodeKind::MethodCall {
                receiver, method, ..
            } = ast.kind(id)
            else {
                continue;
            };
            if table.has_method(method) {
                continue;
            }
            let class = receiver_class(ast, table, scope.name, *receiver);
            let import_receiver = class.as_deref().is_some_and(|c| table.has_import(c));
            let inherited = class.as_deref() == Some(table.class_name.as_str())
                && table
                    .super_name
                    .as_deref()
                    .is_some_and(|s| table.has_import(s));
            if !import_receiver && !inherited {
                reports.push(error_at(
                    ast,
                    id,
                    format!("method '{method}' was not declared"),
                ));
            }
        }
    }
}
