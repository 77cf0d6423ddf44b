//! Type model, symbol table and symbol-table construction.
//!
//! The table is built in a single pass over the AST. Construction is
//! permissive: duplicate or malformed declarations are reported but the
//! table is still produced so later passes can run over it.

use std::collections::HashMap;
use std::fmt;

use crate::ast::{Ast, BinaryOp, Identifier, NodeId, NodeKind, TypeSpec};
use crate::report::{Report, Stage};

pub const VARARG_NAME: &str = "...";

/// A resolved type: a name plus array-ness. Varargs are modeled as an
/// `int` array whose name is the reserved `"..."` marker.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Type {
    pub name: String,
    pub is_array: bool,
}

impl Type {
    pub fn new(name: impl Into<String>, is_array: bool) -> Self {
        Self {
            name: name.into(),
            is_array,
        }
    }

    pub fn int() -> Self {
        Self::new("int", false)
    }

    pub fn int_array() -> Self {
        Self::new("int", true)
    }

    pub fn boolean() -> Self {
        Self::new("boolean", false)
    }

    pub fn void() -> Self {
        Self::new("void", false)
    }

    pub fn string() -> Self {
        Self::new("String", false)
    }

    pub fn vararg() -> Self {
        Self::new(VARARG_NAME, true)
    }

    pub fn is_vararg(&self) -> bool {
        self.name == VARARG_NAME
    }

    pub fn is_int(&self) -> bool {
        !self.is_array && self.name == "int"
    }

    pub fn is_boolean(&self) -> bool {
        !self.is_array && self.name == "boolean"
    }

    pub fn from_spec(spec: &TypeSpec) -> Self {
        if spec.is_vararg {
            Self::vararg()
        } else {
            Self::new(spec.name.clone(), spec.is_array)
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_array {
            write!(f, "{}[]", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Symbol {
    pub name: Identifier,
    pub ty: Type,
}

impl Symbol {
    pub fn new(name: impl Into<Identifier>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Per-class symbol table. Imports keep their full dotted path; lookup
/// by simple name compares the last segment.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    pub class_name: String,
    pub super_name: Option<String>,
    imports: Vec<String>,
    methods: Vec<String>,
    return_types: HashMap<String, Type>,
    fields: Vec<Symbol>,
    params: HashMap<String, Vec<Symbol>>,
    locals: HashMap<String, Vec<Symbol>>,
}

impl SymbolTable {
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn fields(&self) -> &[Symbol] {
        &self.fields
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m == name)
    }

    pub fn return_type(&self, method: &str) -> Option<&Type> {
        self.return_types.get(method)
    }

    pub fn params(&self, method: &str) -> Option<&[Symbol]> {
        self.params.get(method).map(Vec::as_slice)
    }

    pub fn locals(&self, method: &str) -> Option<&[Symbol]> {
        self.locals.get(method).map(Vec::as_slice)
    }

    /// True if `name` matches the last segment of any import path.
    pub fn has_import(&self, name: &str) -> bool {
        self.imports
            .iter()
            .any(|path| path.rsplit('.').next() == Some(name))
    }

    /// Full dotted path of the import whose last segment is `name`.
    pub fn import_path(&self, name: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|path| path.rsplit('.').next() == Some(name))
            .map(String::as_str)
    }

    pub fn param(&self, method: &str, name: &str) -> Option<&Symbol> {
        self.params(method)?.iter().find(|s| s.name == name)
    }

    pub fn local(&self, method: &str, name: &str) -> Option<&Symbol> {
        self.locals(method)?.iter().find(|s| s.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Symbol> {
        self.fields.iter().find(|s| s.name == name)
    }

    /// Resolves a variable inside `method`: parameters shadow locals
    /// shadow fields.
    pub fn var_type(&self, method: &str, name: &str) -> Option<&Type> {
        self.param(method, name)
            .or_else(|| self.local(method, name))
            .or_else(|| self.field(name))
            .map(|s| &s.ty)
    }

    /// True if `name` resolves to a field and is not shadowed by a
    /// parameter or local of `method`.
    pub fn is_field(&self, method: &str, name: &str) -> bool {
        self.param(method, name).is_none()
            && self.local(method, name).is_none()
            && self.field(name).is_some()
    }
}

fn check_duplicate(seen: &mut Vec<String>, name: &str, what: &str, reports: &mut Vec<Report>) {
    if seen.iter().any(|s| s == name) {
        reports.push(Report::error(
            Stage::Symbols,
            0,
            0,
            format!("duplicate {what} '{name}'"),
        ));
    } else {
        seen.push(name.to_string());
    }
}

/// Builds the symbol table, reporting malformed declarations without
/// refusing to build.
pub fn build(ast: &Ast) -> (SymbolTable, Vec<Report>) {
    let mut table = SymbolTable::default();
    let mut reports = Vec::new();

    let NodeKind::Program { imports, class } = ast.kind(ast.root()) else {
        return (table, reports);
    };

    let mut seen_imports = Vec::new();
    for &import in imports {
        if let NodeKind::ImportDecl { path } = ast.kind(import) {
            let dotted = path.join(".");
            check_duplicate(&mut seen_imports, &dotted, "import", &mut reports);
        }
    }
    table.imports = seen_imports;

    let NodeKind::ClassDecl {
        name,
        super_name,
        fields,
        methods,
    } = ast.kind(*class)
    else {
        return (table, reports);
    };
    table.class_name = name.clone();
    table.super_name = super_name.clone();

    let mut seen_fields = Vec::new();
    for &field in fields {
        if let NodeKind::VarDecl { name, ty } = ast.kind(field) {
            check_duplicate(&mut seen_fields, name, "field", &mut reports);
            if ty.is_vararg {
                reports.push(Report::error(
                    Stage::Symbols,
                    ast.pos(field).line,
                    ast.pos(field).column,
                    format!("field '{name}' cannot be vararg"),
                ));
            }
            table.fields.push(Symbol::new(name.clone(), Type::from_spec(ty)));
        }
    }

    let mut seen_methods = Vec::new();
    for &method in methods {
        let NodeKind::MethodDecl {
            name,
            return_type,
            params,
            locals,
            ..
        } = ast.kind(method)
        else {
            continue;
        };
        check_duplicate(&mut seen_methods, name, "method", &mut reports);
        table.methods.push(name.clone());

        if return_type.is_vararg {
            reports.push(Report::error(
                Stage::Symbols,
                ast.pos(method).line,
                ast.pos(method).column,
                format!("method '{name}' cannot return vararg"),
            ));
        }
        // `main` is the static entry point; it always returns void no
        // matter what the source declares.
        let ret = if name == "main" {
            Type::void()
        } else {
            Type::from_spec(return_type)
        };
        table.return_types.insert(name.clone(), ret);

        let mut param_syms = Vec::new();
        let mut seen_params = Vec::new();
        for (i, &param) in params.iter().enumerate() {
            if let NodeKind::Param { name: pname, ty } = ast.kind(param) {
                check_duplicate(&mut seen_params, pname, "parameter", &mut reports);
                if ty.is_vararg && i + 1 != params.len() {
                    reports.push(Report::error(
                        Stage::Symbols,
                        ast.pos(param).line,
                        ast.pos(param).column,
                        format!("vararg parameter of '{name}' must come last"),
                    ));
                }
                param_syms.push(Symbol::new(pname.clone(), Type::from_spec(ty)));
            }
        }
        table.params.insert(name.clone(), param_syms);

        let mut local_syms = Vec::new();
        let mut seen_locals = Vec::new();
        for &local in locals {
            if let NodeKind::VarDecl { name: lname, ty } = ast.kind(local) {
                check_duplicate(&mut seen_locals, lname, "local variable", &mut reports);
                if ty.is_vararg {
                    reports.push(Report::error(
                        Stage::Symbols,
                        ast.pos(local).line,
                        ast.pos(local).column,
                        format!("local variable '{lname}' cannot be vararg"),
                    ));
                }
                local_syms.push(Symbol::new(lname.clone(), Type::from_spec(ty)));
            }
        }
        table.locals.insert(name.clone(), local_syms);
    }

    (table, reports)
}

/// Computes expression types against the table. `None` means the type
/// cannot be determined locally (undeclared names, calls on imported
/// classes); each pass decides how tolerant to be about that.
pub struct TypeResolver<'a> {
    pub table: &'a SymbolTable,
    pub method: &'a str,
}

impl<'a> TypeResolver<'a> {
    pub fn new(table: &'a SymbolTable, method: &'a str) -> Self {
        Self { table, method }
    }

    pub fn expr_type(&self, ast: &Ast, id: NodeId) -> Option<Type> {
        use NodeKind as K;
        match ast.kind(id) {
            K::IntLiteral(_) | K::ArrayLength(_) => Some(Type::int()),
            K::True | K::False | K::Not(_) => Some(Type::boolean()),
            K::This => Some(Type::new(self.table.class_name.clone(), false)),
            K::Parens(inner) => self.expr_type(ast, *inner),
            K::Binary { op, .. } => match op {
                BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => Some(Type::int()),
                BinaryOp::LessThan | BinaryOp::GreaterThan | BinaryOp::And => {
                    Some(Type::boolean())
                }
            },
            K::ArrayIndex { array, .. } => {
                let base = self.expr_type(ast, *array)?;
                Some(Type::new(base.name, false))
            }
            K::NewArray { .. } | K::ArrayLiteral(_) => Some(Type::int_array()),
            K::NewObject { class } => Some(Type::new(class.clone(), false)),
            K::MethodCall { method, .. } => self.table.return_type(method).cloned(),
            K::Identifier(name) => self.table.var_type(self.method, name).cloned(),
            _ => None,
        }
    }
}

/// Assignability: structural equality, or a single-step widening from
/// the class being compiled to its declared superclass.
pub fn is_compatible(declared: &Type, actual: &Type, table: &SymbolTable) -> bool {
    if declared == actual {
        return true;
    }
    if declared.is_array != actual.is_array {
        return false;
    }
    actual.name == table.class_name && table.super_name.as_deref() == Some(&declared.name)
}

#[cfg(test)]
mod table_tests;
