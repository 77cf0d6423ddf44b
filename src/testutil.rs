//! Builders for front-end AST dumps used across the test modules.

use serde_json::{json, Value};

use crate::ast::Ast;
use crate::table::{self, SymbolTable};

pub(crate) fn node(kind: &str, attrs: Value, children: Vec<Value>) -> Value {
    json!({
        "kind": kind,
        "attributes": attrs,
        "children": children,
        "line": 1,
        "column": 1,
    })
}

pub(crate) fn typ(name: &str) -> Value {
    node("Type", json!({ "name": name }), vec![])
}

pub(crate) fn array_typ(name: &str) -> Value {
    node("Type", json!({ "name": name, "isArray": "true" }), vec![])
}

pub(crate) fn vararg_typ() -> Value {
    node("Type", json!({ "name": "int", "isVararg": "true" }), vec![])
}

pub(crate) fn import(path: &str) -> Value {
    node("ImportDecl", json!({ "path": path }), vec![])
}

pub(crate) fn var_decl(name: &str, ty: Value) -> Value {
    node("VarDecl", json!({ "name": name }), vec![ty])
}

pub(crate) fn param(name: &str, ty: Value) -> Value {
    node("Param", json!({ "name": name }), vec![ty])
}

pub(crate) fn method(name: &str, ret: Value, mut rest: Vec<Value>) -> Value {
    let mut children = vec![ret];
    children.append(&mut rest);
    node(
        "MethodDecl",
        json!({ "name": name, "isPublic": "true" }),
        children,
    )
}

pub(crate) fn static_method(name: &str, ret: Value, mut rest: Vec<Value>) -> Value {
    let mut children = vec![ret];
    children.append(&mut rest);
    node(
        "MethodDecl",
        json!({ "name": name, "isPublic": "true", "isStatic": "true" }),
        children,
    )
}

pub(crate) fn ret_stmt(expr: Value) -> Value {
    node("ReturnStmt", json!({}), vec![expr])
}

pub(crate) fn assign(var: &str, value: Value) -> Value {
    node("AssignStmt", json!({ "name": var }), vec![value])
}

pub(crate) fn array_assign(var: &str, index: Value, value: Value) -> Value {
    node("ArrayAssignStmt", json!({ "name": var }), vec![index, value])
}

pub(crate) fn expr_stmt(expr: Value) -> Value {
    node("ExprStmt", json!({}), vec![expr])
}

pub(crate) fn block(stmts: Vec<Value>) -> Value {
    node("Block", json!({}), stmts)
}

pub(crate) fn if_stmt(cond: Value, then: Value, els: Value) -> Value {
    node("IfStmt", json!({}), vec![cond, then, els])
}

pub(crate) fn while_stmt(cond: Value, body: Value) -> Value {
    node("WhileStmt", json!({}), vec![cond, body])
}

pub(crate) fn bin(op: &str, lhs: Value, rhs: Value) -> Value {
    node("BinaryExpr", json!({ "op": op }), vec![lhs, rhs])
}

pub(crate) fn not(expr: Value) -> Value {
    node("NotExpr", json!({}), vec![expr])
}

pub(crate) fn int_lit(value: i32) -> Value {
    node("IntLiteral", json!({ "value": value.to_string() }), vec![])
}

pub(crate) fn tru() -> Value {
    node("TrueLiteral", json!({}), vec![])
}

pub(crate) fn fls() -> Value {
    node("FalseLiteral", json!({}), vec![])
}

pub(crate) fn ident(name: &str) -> Value {
    node("Identifier", json!({ "name": name }), vec![])
}

pub(crate) fn this() -> Value {
    node("ThisExpr", json!({}), vec![])
}

pub(crate) fn call(receiver: Value, name: &str, mut args: Vec<Value>) -> Value {
    let mut children = vec![receiver];
    children.append(&mut args);
    node("MethodCallExpr", json!({ "name": name }), children)
}

pub(crate) fn array_access(array: Value, index: Value) -> Value {
    node("ArrayAccessExpr", json!({}), vec![array, index])
}

pub(crate) fn length(array: Value) -> Value {
    node("LengthExpr", json!({}), vec![array])
}

pub(crate) fn new_array(size: Value) -> Value {
    node("NewArrayExpr", json!({}), vec![size])
}

pub(crate) fn new_object(class: &str) -> Value {
    node("NewObjectExpr", json!({ "name": class }), vec![])
}

pub(crate) fn array_literal(elems: Vec<Value>) -> Value {
    node("ArrayLiteral", json!({}), elems)
}

pub(crate) fn class_decl(name: &str, super_name: Option<&str>, members: Vec<Value>) -> Value {
    let attrs = match super_name {
        Some(super_name) => json!({ "name": name, "superName": super_name }),
        None => json!({ "name": name }),
    };
    node("ClassDecl", attrs, members)
}

pub(crate) fn parse_program(imports: Vec<Value>, class: Value) -> Ast {
    let mut children = imports;
    children.push(class);
    let program = node("Program", json!({}), children);
    crate::input::parse(&program.to_string()).unwrap()
}

/// One-class program named `Test` with no superclass.
pub(crate) fn test_class(members: Vec<Value>) -> Ast {
    parse_program(vec![], class_decl("Test", None, members))
}

pub(crate) fn build_table(ast: &Ast) -> SymbolTable {
    table::build(ast).0
}
