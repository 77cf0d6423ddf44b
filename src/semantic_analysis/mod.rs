//! Semantic analysis passes.
//!
//! Each pass is an independent walk over the class methods checking a
//! single concern. Passes append to a shared report list and keep
//! walking, so one run surfaces every detectable error. Unknown types
//! coming from imported classes are treated optimistically.

mod arguments_check;
mod array_access;
mod array_assign;
mod array_literal;
mod assignment_type;
mod binary_expr_type;
mod condition_type;
mod method_check;
mod method_return_type;
mod this_check;
mod undeclared_variable;

use crate::ast::{Ast, NodeId, NodeKind};
use crate::report::{Report, Stage};
use crate::table::SymbolTable;

/// Runs every pass in a fixed order and collects their diagnostics.
pub fn analyze(ast: &Ast, table: &SymbolTable) -> Vec<Report> {
    let mut reports = Vec::new();
    undeclared_variable::check(ast, table, &mut reports);
    assignment_type::check(ast, table, &mut reports);
    binary_expr_type::check(ast, table, &mut reports);
    condition_type::check(ast, table, &mut reports);
    array_access::check(ast, table, &mut reports);
    array_literal::check(ast, table, &mut reports);
    array_assign::check(ast, table, &mut reports);
    method_check::check(ast, table, &mut reports);
    arguments_check::check(ast, table, &mut reports);
    method_return_type::check(ast, table, &mut reports);
    this_check::check(ast, table, &mut reports);
    reports
}

pub(crate) struct MethodScope<'a> {
    pub name: &'a str,
    pub is_static: bool,
    pub decl: NodeId,
}

pub(crate) fn method_scopes(ast: &Ast) -> Vec<MethodScope<'_>> {
    ast.class_methods()
        .into_iter()
        .filter_map(|id| match ast.kind(id) {
            NodeKind::MethodDecl {
                name, is_static, ..
            } => Some(MethodScope {
                name,
                is_static: *is_static,
                decl: id,
            }),
            _ => None,
        })
        .collect()
}

pub(crate) fn error_at(ast: &Ast, id: NodeId, message: impl Into<String>) -> Report {
    let pos = ast.pos(id);
    Report::error(Stage::Semantic, pos.line, pos.column, message)
}

pub(crate) fn strip_parens(ast: &Ast, mut id: NodeId) -> NodeId {
    while let NodeKind::Parens(inner) = ast.kind(id) {
        id = *inner;
    }
    id
}

/// True when `id` is a method call whose receiver names an imported
/// class. Several passes tolerate unknown types in that shape.
pub(crate) fn is_import_call(ast: &Ast, table: &SymbolTable, id: NodeId) -> bool {
    let NodeKind::MethodCall { receiver, .. } = ast.kind(strip_parens(ast, id)) else {
        return false;
    };
    match ast.kind(strip_parens(ast, *receiver)) {
        NodeKind::Identifier(name) => table.has_import(name),
        _ => false,
    }
}

/// Class name a call receiver resolves to: `this` is the current
/// class, an identifier naming an import is that import, anything
/// else goes by its computed type.
pub(crate) fn receiver_class(
    ast: &Ast,
    table: &SymbolTable,
    method: &str,
    receiver: NodeId,
) -> Option<String> {
    let receiver = strip_parens(ast, receiver);
    match ast.kind(receiver) {
        NodeKind::This => Some(table.class_name.clone()),
        NodeKind::Identifier(name) if table.has_import(name) => Some(name.clone()),
        _ => {
            let resolver = crate::table::TypeResolver::new(table, method);
            resolver.expr_type(ast, receiver).map(|t| t.name)
        }
    }
}

#[cfg(test)]
mod sem_tests;
