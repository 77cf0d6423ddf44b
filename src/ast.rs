//! Arena-allocated AST for the Java-like source language.
//!
//! The front end is external: it hands over a generic tagged-node tree
//! (see [input](crate::input)) which is converted into this closed sum
//! type. Nodes live in an arena and reference each other by index, so
//! the optimizer can replace a node in place without invalidating the
//! links held by its parent.

pub type Identifier = String;
pub type NodeId = usize;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

impl Pos {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Declared type as written in the source, before symbol-table types
/// are built from it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TypeSpec {
    pub name: Identifier,
    pub is_array: bool,
    pub is_vararg: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    LessThan,
    GreaterThan,
    And,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::And => "&&",
        };
        write!(f, "{symbol}")
    }
}

impl BinaryOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div)
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, Self::LessThan | Self::GreaterThan)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum NodeKind {
    Program {
        imports: Vec<NodeId>,
        class: NodeId,
    },
    ImportDecl {
        path: Vec<Identifier>,
    },
    ClassDecl {
        name: Identifier,
        super_name: Option<Identifier>,
        fields: Vec<NodeId>,
        methods: Vec<NodeId>,
    },
    VarDecl {
        name: Identifier,
        ty: TypeSpec,
    },
    MethodDecl {
        name: Identifier,
        is_public: bool,
        is_static: bool,
        return_type: TypeSpec,
        params: Vec<NodeId>,
        locals: Vec<NodeId>,
        body: Vec<NodeId>,
        ret_expr: Option<NodeId>,
    },
    Param {
        name: Identifier,
        ty: TypeSpec,
    },
    Block(Vec<NodeId>),
    If {
        cond: NodeId,
        then: NodeId,
        els: NodeId,
    },
    While {
        cond: NodeId,
        body: NodeId,
    },
    Assign {
        var: Identifier,
        value: NodeId,
    },
    ArrayAssign {
        var: Identifier,
        index: NodeId,
        value: NodeId,
    },
    ExprStmt(NodeId),
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Not(NodeId),
    Parens(NodeId),
    ArrayIndex {
        array: NodeId,
        index: NodeId,
    },
    ArrayLength(NodeId),
    NewArray {
        size: NodeId,
    },
    NewObject {
        class: Identifier,
    },
    ArrayLiteral(Vec<NodeId>),
    MethodCall {
        receiver: NodeId,
        method: Identifier,
        args: Vec<NodeId>,
    },
    Identifier(Identifier),
    IntLiteral(i32),
    True,
    False,
    This,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    pos: Pos,
}

#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: NodeKind, pos: Pos) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node { kind, pos });
        id
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id].kind
    }

    pub fn pos(&self, id: NodeId) -> Pos {
        self.nodes[id].pos
    }

    /// Overwrites the node in place, keeping its source position.
    /// Parents hold indices, so their links stay valid.
    pub fn replace(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id].kind = kind;
    }

    pub fn is_literal(&self, id: NodeId) -> bool {
        matches!(
            self.kind(id),
            NodeKind::IntLiteral(_) | NodeKind::True | NodeKind::False
        )
    }

    /// Direct children of a node, in source order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        use NodeKind as K;
        match self.kind(id) {
            K::Program { imports, class } => {
                let mut out = imports.clone();
                out.push(*class);
                out
            }
            K::ClassDecl {
                fields, methods, ..
            } => fields.iter().chain(methods).copied().collect(),
            K::MethodDecl {
                params,
                locals,
                body,
                ret_expr,
                ..
            } => params
                .iter()
                .chain(locals)
                .chain(body)
                .copied()
                .chain(*ret_expr)
                .collect(),
            K::Block(stmts) => stmts.clone(),
            K::ArrayLiteral(elems) => elems.clone(),
            K::If { cond, then, els } => vec![*cond, *then, *els],
            K::While { cond, body } => vec![*cond, *body],
            K::ArrayAssign { index, value, .. } => vec![*index, *value],
            K::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            K::ArrayIndex { array, index } => vec![*array, *index],
            K::MethodCall { receiver, args, .. } => {
                let mut out = vec![*receiver];
                out.extend(args);
                out
            }
            K::Assign { value, .. } => vec![*value],
            K::ExprStmt(e) | K::Not(e) | K::Parens(e) | K::ArrayLength(e) => vec![*e],
            K::NewArray { size } => vec![*size],
            K::ImportDecl { .. }
            | K::VarDecl { .. }
            | K::Param { .. }
            | K::NewObject { .. }
            | K::Identifier(_)
            | K::IntLiteral(_)
            | K::True
            | K::False
            | K::This => Vec::new(),
        }
    }

    /// Preorder walk of the subtree rooted at `id`.
    pub fn preorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            let children = self.children(next);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Method declarations of the program's class, in source order.
    pub fn class_methods(&self) -> Vec<NodeId> {
        let NodeKind::Program { class, .. } = self.kind(self.root) else {
            return Vec::new();
        };
        match self.kind(*class) {
            NodeKind::ClassDecl { methods, .. } => methods.clone(),
            _ => Vec::new(),
        }
    }
}
