//! Deserialization of the front end's generic AST dump.
//!
//! The parser is a separate tool; it serializes its tree as JSON where
//! every node is `{ kind, attributes, children, line, column }`. This
//! module reads that format and converts it into the typed arena AST.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::ast::{Ast, BinaryOp, NodeId, NodeKind, Pos, TypeSpec};

#[derive(Debug)]
pub enum InputError {
    Json(String),
    UnknownKind(String),
    MissingAttribute(String, String),
    MissingChild(String, usize),
    BadAttribute(String, String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "malformed ast json: {e}"),
            Self::UnknownKind(k) => write!(f, "unknown node kind '{k}'"),
            Self::MissingAttribute(kind, attr) => {
                write!(f, "node '{kind}' is missing attribute '{attr}'")
            }
            Self::MissingChild(kind, index) => {
                write!(f, "node '{kind}' is missing child {index}")
            }
            Self::BadAttribute(kind, attr) => {
                write!(f, "node '{kind}' has malformed attribute '{attr}'")
            }
        }
    }
}

impl std::error::Error for InputError {}

impl From<serde_json::Error> for InputError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InputError>;

#[derive(Debug, Deserialize)]
struct RawNode {
    kind: String,
    #[serde(default)]
    attributes: HashMap<String, String>,
    #[serde(default)]
    children: Vec<RawNode>,
    #[serde(default)]
    line: u32,
    #[serde(default)]
    column: u32,
}

impl RawNode {
    fn pos(&self) -> Pos {
        Pos::new(self.line, self.column)
    }

    fn attr(&self, name: &str) -> Result<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| InputError::MissingAttribute(self.kind.clone(), name.to_string()))
    }

    fn bool_attr(&self, name: &str) -> bool {
        self.attributes.get(name).is_some_and(|v| v == "true")
    }

    fn child(&self, index: usize) -> Result<&RawNode> {
        self.children
            .get(index)
            .ok_or_else(|| InputError::MissingChild(self.kind.clone(), index))
    }
}

pub fn parse(source: &str) -> Result<Ast> {
    let raw: RawNode = serde_json::from_str(source)?;
    let mut ast = Ast::new();
    let root = convert(&raw, &mut ast)?;
    ast.set_root(root);
    Ok(ast)
}

fn type_spec(raw: &RawNode) -> Result<TypeSpec> {
    Ok(TypeSpec {
        name: raw.attr("name")?.to_string(),
        is_array: raw.bool_attr("isArray") || raw.bool_attr("isVararg"),
        is_vararg: raw.bool_attr("isVararg"),
    })
}

fn convert_all(raw: &[RawNode], ast: &mut Ast) -> Result<Vec<NodeId>> {
    raw.iter().map(|child| convert(child, ast)).collect()
}

fn int_attr(raw: &RawNode, name: &str) -> Result<i32> {
    raw.attr(name)?
        .parse()
        .map_err(|_| InputError::BadAttribute(raw.kind.clone(), name.to_string()))
}

fn binary_op(raw: &RawNode) -> Result<BinaryOp> {
    match raw.attr("op")? {
        "+" => Ok(BinaryOp::Add),
        "-" => Ok(BinaryOp::Sub),
        "*" => Ok(BinaryOp::Mul),
        "/" => Ok(BinaryOp::Div),
        "<" => Ok(BinaryOp::LessThan),
        ">" => Ok(BinaryOp::GreaterThan),
        "&&" => Ok(BinaryOp::And),
        _ => Err(InputError::BadAttribute(raw.kind.clone(), "op".into())),
    }
}

fn convert(raw: &RawNode, ast: &mut Ast) -> Result<NodeId> {
    let pos = raw.pos();
    let kind = match raw.kind.as_str() {
        "Program" => {
            let n = raw.children.len();
            if n == 0 {
                return Err(InputError::MissingChild(raw.kind.clone(), 0));
            }
            let imports = convert_all(&raw.children[..n - 1], ast)?;
            let class = convert(raw.child(n - 1)?, ast)?;
            NodeKind::Program { imports, class }
        }
        "ImportDecl" => NodeKind::ImportDecl {
            path: raw.attr("path")?.split('.').map(str::to_string).collect(),
        },
        "ClassDecl" => {
            let mut fields = Vec::new();
            let mut methods = Vec::new();
            for child in &raw.children {
                let id = convert(child, ast)?;
                match ast.kind(id) {
                    NodeKind::MethodDecl { .. } => methods.push(id),
                    _ => fields.push(id),
                }
            }
            NodeKind::ClassDecl {
                name: raw.attr("name")?.to_string(),
                super_name: raw.attributes.get("superName").cloned(),
                fields,
                methods,
            }
        }
        "VarDecl" => NodeKind::VarDecl {
            name: raw.attr("name")?.to_string(),
            ty: type_spec(raw.child(0)?)?,
        },
        "MethodDecl" => {
            let return_type = type_spec(raw.child(0)?)?;
            let mut params = Vec::new();
            let mut locals = Vec::new();
            let mut body = Vec::new();
            let mut ret_expr = None;
            for child in &raw.children[1..] {
                match child.kind.as_str() {
                    "Param" => params.push(convert(child, ast)?),
                    "VarDecl" => locals.push(convert(child, ast)?),
                    "ReturnStmt" => ret_expr = Some(convert(child.child(0)?, ast)?),
                    _ => body.push(convert(child, ast)?),
                }
            }
            NodeKind::MethodDecl {
                name: raw.attr("name")?.to_string(),
                is_public: raw.bool_attr("isPublic"),
                is_static: raw.bool_attr("isStatic"),
                return_type,
                params,
                locals,
                body,
                ret_expr,
            }
        }
        "Param" => NodeKind::Param {
            name: raw.attr("name")?.to_string(),
            ty: type_spec(raw.child(0)?)?,
        },
        "Block" => NodeKind::Block(convert_all(&raw.children, ast)?),
        "IfStmt" => NodeKind::If {
            cond: convert(raw.child(0)?, ast)?,
            then: convert(raw.child(1)?, ast)?,
            els: convert(raw.child(2)?, ast)?,
        },
        "WhileStmt" => NodeKind::While {
            cond: convert(raw.child(0)?, ast)?,
            body: convert(raw.child(1)?, ast)?,
        },
        "AssignStmt" => NodeKind::Assign {
            var: raw.attr("name")?.to_string(),
            value: convert(raw.child(0)?, ast)?,
        },
        "ArrayAssignStmt" => NodeKind::ArrayAssign {
            var: raw.attr("name")?.to_string(),
            index: convert(raw.child(0)?, ast)?,
            value: convert(raw.child(1)?, ast)?,
        },
        "ExprStmt" => NodeKind::ExprStmt(convert(raw.child(0)?, ast)?),
        "BinaryExpr" => NodeKind::Binary {
            op: binary_op(raw)?,
            lhs: convert(raw.child(0)?, ast)?,
            rhs: convert(raw.child(1)?, ast)?,
        },
        "NotExpr" => NodeKind::Not(convert(raw.child(0)?, ast)?),
        "ParenExpr" => NodeKind::Parens(convert(raw.child(0)?, ast)?),
        "ArrayAccessExpr" => NodeKind::ArrayIndex {
            array: convert(raw.child(0)?, ast)?,
            index: convert(raw.child(1)?, ast)?,
        },
        "LengthExpr" => NodeKind::ArrayLength(convert(raw.child(0)?, ast)?),
        "NewArrayExpr" => NodeKind::NewArray {
            size: convert(raw.child(0)?, ast)?,
        },
        "NewObjectExpr" => NodeKind::NewObject {
            class: raw.attr("name")?.to_string(),
        },
        "ArrayLiteral" => NodeKind::ArrayLiteral(convert_all(&raw.children, ast)?),
        "MethodCallExpr" => NodeKind::MethodCall {
            receiver: convert(raw.child(0)?, ast)?,
            method: raw.attr("name")?.to_string(),
            args: convert_all(&raw.children[1..], ast)?,
        },
        "Identifier" => NodeKind::Identifier(raw.attr("name")?.to_string()),
        "IntLiteral" => NodeKind::IntLiteral(int_attr(raw, "value")?),
        "TrueLiteral" => NodeKind::True,
        "FalseLiteral" => NodeKind::False,
        "ThisExpr" => NodeKind::This,
        other => return Err(InputError::UnknownKind(other.to_string())),
    };
    Ok(ast.push(kind, pos))
}
