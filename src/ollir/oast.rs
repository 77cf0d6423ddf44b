//! Typed three-address IR and its line-oriented text form.
//!
//! Operands are written `name.type`, assignments `:=.type`, and
//! control flow uses bare `label:` lines with `goto`/`if` branches.
//! The text form is what `--ollir` prints; the bytecode stage consumes
//! the structured values directly.

use std::fmt;

use crate::ast::BinaryOp;
use crate::table::Type;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum IrType {
    I32,
    Bool,
    StringT,
    Void,
    Array(Box<IrType>),
    Class(String),
}

impl IrType {
    pub fn from_type(ty: &Type) -> Self {
        let scalar = match ty.name.as_str() {
            "int" | crate::table::VARARG_NAME => Self::I32,
            "boolean" => Self::Bool,
            "String" => Self::StringT,
            "void" => Self::Void,
            class => Self::Class(class.to_string()),
        };
        if ty.is_array {
            Self::Array(Box::new(scalar))
        } else {
            scalar
        }
    }

    /// Element type of an array; arrays of unknown provenance default
    /// to `int` elements, the only array kind the language has.
    pub fn elem(&self) -> Self {
        match self {
            Self::Array(inner) => (**inner).clone(),
            _ => Self::I32,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::I32 => write!(f, ".i32"),
            Self::Bool => write!(f, ".bool"),
            Self::StringT => write!(f, ".String"),
            Self::Void => write!(f, ".V"),
            Self::Array(inner) => write!(f, ".array{inner}"),
            Self::Class(name) => write!(f, ".{name}"),
        }
    }
}

/// A usable operand: an immediate or a named variable/temporary.
/// Boolean immediates are 1 and 0.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum OValue {
    Imm(i32, IrType),
    Var(String, IrType),
}

impl OValue {
    pub fn ty(&self) -> &IrType {
        match self {
            Self::Imm(_, ty) | Self::Var(_, ty) => ty,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Var(name, _) => Some(name),
            Self::Imm(..) => None,
        }
    }

    pub fn as_imm(&self) -> Option<i32> {
        match self {
            Self::Imm(v, _) => Some(*v),
            Self::Var(..) => None,
        }
    }
}

impl fmt::Display for OValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Imm(v, ty) => write!(f, "{v}{ty}"),
            Self::Var(name, ty) => write!(f, "{name}{ty}"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CmpOp {
    LessThan,
    GreaterThan,
}

impl CmpOp {
    pub fn flipped(self) -> Self {
        match self {
            Self::LessThan => Self::GreaterThan,
            Self::GreaterThan => Self::LessThan,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::LessThan => write!(f, "<"),
            Self::GreaterThan => write!(f, ">"),
        }
    }
}

/// Branch condition forms. Comparisons stay structured so the
/// bytecode stage can pick compact branch encodings.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum OCond {
    Value(OValue),
    Not(OValue),
    Compare {
        op: CmpOp,
        lhs: OValue,
        rhs: OValue,
    },
}

impl fmt::Display for OCond {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Not(v) => write!(f, "!.bool {v}"),
            Self::Compare { op, lhs, rhs } => write!(f, "{lhs} {op}.bool {rhs}"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CallKind {
    Static(String),
    Virtual(OValue),
    Special(OValue),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum OInstruction {
    Assign {
        dst: OValue,
        src: OValue,
    },
    Binary {
        dst: OValue,
        op: BinaryOp,
        lhs: OValue,
        rhs: OValue,
    },
    Not {
        dst: OValue,
        src: OValue,
    },
    GetField {
        dst: OValue,
        field: String,
        ty: IrType,
    },
    PutField {
        field: String,
        ty: IrType,
        value: OValue,
    },
    ArrayLoad {
        dst: OValue,
        array: OValue,
        index: OValue,
    },
    ArrayStore {
        array: OValue,
        index: OValue,
        value: OValue,
    },
    ArrayLength {
        dst: OValue,
        array: OValue,
    },
    NewArray {
        dst: OValue,
        size: OValue,
    },
    NewObject {
        dst: OValue,
        class: String,
    },
    Call {
        dst: Option<OValue>,
        kind: CallKind,
        method: String,
        args: Vec<OValue>,
        ret: IrType,
    },
    Branch {
        cond: OCond,
        target: String,
    },
    Jump(String),
    Label(String),
    Return {
        value: Option<OValue>,
        ty: IrType,
    },
}

fn op_result_type(op: BinaryOp) -> IrType {
    if op.is_arithmetic() {
        IrType::I32
    } else {
        IrType::Bool
    }
}

impl fmt::Display for OInstruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Assign { dst, src } => write!(f, "{dst} :={} {src};", dst.ty()),
            Self::Binary { dst, op, lhs, rhs } => {
                write!(f, "{dst} :={} {lhs} {op}{} {rhs};", dst.ty(), op_result_type(*op))
            }
            Self::Not { dst, src } => write!(f, "{dst} :=.bool !.bool {src};"),
            Self::GetField { dst, field, ty } => {
                write!(f, "{dst} :={ty} getfield(this, {field}{ty}){ty};")
            }
            Self::PutField { field, ty, value } => {
                write!(f, "putfield(this, {field}{ty}, {value}).V;")
            }
            Self::ArrayLoad { dst, array, index } => {
                write!(f, "{dst} :={} {}[{index}]{};", dst.ty(), array, dst.ty())
            }
            Self::ArrayStore {
                array,
                index,
                value,
            } => {
                let elem = array.ty().elem();
                write!(f, "{}[{index}]{elem} :={elem} {value};", array)
            }
            Self::ArrayLength { dst, array } => {
                write!(f, "{dst} :=.i32 arraylength({array}).i32;")
            }
            Self::NewArray { dst, size } => {
                write!(f, "{dst} :=.array.i32 new(array, {size}).array.i32;")
            }
            Self::NewObject { dst, class } => {
                write!(f, "{dst} :=.{class} new({class}).{class};")
            }
            Self::Call {
                dst,
                kind,
                method,
                args,
                ret,
            } => {
                if let Some(dst) = dst {
                    write!(f, "{dst} :={} ", dst.ty())?;
                }
                match kind {
                    CallKind::Static(class) => write!(f, "invokestatic({class}, \"{method}\"")?,
                    CallKind::Virtual(recv) => write!(f, "invokevirtual({recv}, \"{method}\"")?,
                    CallKind::Special(recv) => write!(f, "invokespecial({recv}, \"{method}\"")?,
                }
                for arg in args {
                    write!(f, ", {arg}")?;
                }
                write!(f, "){ret};")
            }
            Self::Branch { cond, target } => write!(f, "if ({cond}) goto {target};"),
            Self::Jump(target) => write!(f, "goto {target};"),
            Self::Label(label) => write!(f, "{label}:"),
            Self::Return { value, ty } => match value {
                Some(value) => write!(f, "ret{ty} {value};"),
                None => write!(f, "ret{ty};"),
            },
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OParam {
    pub name: String,
    pub ty: IrType,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OMethod {
    pub name: String,
    pub is_public: bool,
    pub is_static: bool,
    pub is_vararg: bool,
    pub params: Vec<OParam>,
    pub ret: IrType,
    pub instructions: Vec<OInstruction>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OClass {
    pub name: String,
    pub super_name: Option<String>,
    pub imports: Vec<String>,
    pub fields: Vec<OParam>,
    pub methods: Vec<OMethod>,
}

impl fmt::Display for OMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "    .method ")?;
        if self.is_public {
            write!(f, "public ")?;
        }
        if self.is_static {
            write!(f, "static ")?;
        }
        if self.is_vararg {
            write!(f, "varargs ")?;
        }
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}{}", param.name, param.ty)?;
        }
        writeln!(f, "){} {{", self.ret)?;
        for instruction in &self.instructions {
            if matches!(instruction, OInstruction::Label(_)) {
                writeln!(f, "      {instruction}")?;
            } else {
                writeln!(f, "        {instruction}")?;
            }
        }
        write!(f, "    }}")
    }
}

impl fmt::Display for OClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for import in &self.imports {
            writeln!(f, "import {import};")?;
        }
        if !self.imports.is_empty() {
            writeln!(f)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(super_name) = &self.super_name {
            write!(f, " extends {super_name}")?;
        }
        writeln!(f, " {{")?;
        for field in &self.fields {
            writeln!(f, "    .field public {}{};", field.name, field.ty)?;
        }
        writeln!(f)?;
        writeln!(f, "    .construct {}().V {{", self.name)?;
        writeln!(f, "        invokespecial(this, \"<init>\").V;")?;
        writeln!(f, "    }}")?;
        for method in &self.methods {
            writeln!(f)?;
            writeln!(f, "{method}")?;
        }
        write!(f, "}}")
    }
}
