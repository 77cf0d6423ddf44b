use super::{error_at, method_scopes};
use crate::ast::{Ast, NodeKind};
use crate::report::Report;
use crate::table::{is_compatible, SymbolTable, Type, TypeResolver};

/// Call arguments must match the declared parameter list. A trailing
/// vararg parameter binds zero or more extra arguments, each of which
/// must independently be an `int`. Callees without a parameter list in
/// the table are external and skipped entirely.
pub fn check(ast: &Ast, table: &SymbolTable, reports: &mut Vec<Report>) {
    for scope in method_scopes(ast) {
        let resolver = TypeResolver::new(table, scope.name);
        for id in ast.preorder(scope.decl) {
            let NodeKind::MethodCall { method, args, .. } = ast.kind(id) else {
                continue;
            };
            let Some(params) = table.params(method) else {
                continue;
            };
            let vararg = params.last().is_some_and(|p| p.ty.is_vararg());
            let fixed = if vararg {
                &params[..params.len() - 1]
            } else {
                params
            };
            if args.len() < fixed.len() {
                reports.push(error_at(
                    ast,
                    id,
                    format!(
                        "'{method}' expects at least {} argument(s), got {}",
                        fixed.len(),
                        args.len()
                    ),
                ));
                continue;
            }
            // Surplus arguments past a non-empty fixed prefix are
            // ignored; only a zero-parameter callee rejects them.
            if fixed.is_empty() && !vararg && !args.is_empty() {
                reports.push(error_at(
                    ast,
                    id,
                    format!("'{method}' expects 0 argument(s), got {}", args.len()),
                ));
                continue;
            }
            for (param, &arg) in fixed.iter().zip(args) {
                let Some(actual) = resolver.expr_type(ast, arg) else {
                    continue;
                };
                if !is_compatible(&param.ty, &actual, table) {
                    reports.push(error_at(
                        ast,
                        arg,
                        format!(
                            "argument for '{}' of '{method}' has type '{actual}', expected '{}'",
                            param.name, param.ty
                        ),
                    ));
                }
            }
            if vararg {
                for &arg in &args[fixed.len()..] {
                    let Some(actual) = resolver.expr_type(ast, arg) else {
                        continue;
                    };
                    if actual != Type::int() {
                        reports.push(error_at(
                            ast,
                            arg,
                            format!("vararg argument of '{method}' must be 'int', found '{actual}'"),
                        ));
                    }
                }
            }
        }
    }
}
