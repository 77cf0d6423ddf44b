//! Typed stack-machine instruction set, one variant per emitted
//! mnemonic. Display writes the textual assembly form, using the
//! compact `_n` encodings for low slot numbers.

use std::fmt;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Cmp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl Cmp {
    /// Comparison with its operands swapped.
    pub fn flipped(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Gt => Self::Lt,
            Self::Le => Self::Ge,
            Self::Ge => Self::Le,
            Self::Eq | Self::Ne => self,
        }
    }
}

impl fmt::Display for Cmp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Lt => write!(f, "lt"),
            Self::Gt => write!(f, "gt"),
            Self::Le => write!(f, "le"),
            Self::Ge => write!(f, "ge"),
            Self::Eq => write!(f, "eq"),
            Self::Ne => write!(f, "ne"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum JInstruction {
    Label(String),
    Iload(usize),
    Istore(usize),
    Aload(usize),
    Astore(usize),
    IconstM1,
    Iconst(i32),
    Bipush(i32),
    Sipush(i32),
    Ldc(i32),
    Iinc { slot: usize, delta: i32 },
    Iadd,
    Isub,
    Imul,
    Idiv,
    Ixor,
    Dup,
    Pop,
    If(Cmp, String),
    IfIcmp(Cmp, String),
    Goto(String),
    Ireturn,
    Areturn,
    Return,
    Invokestatic { owner: String, method: String, desc: String },
    Invokevirtual { owner: String, method: String, desc: String },
    Invokespecial { owner: String, method: String, desc: String },
    New(String),
    NewarrayInt,
    Iaload,
    Iastore,
    Arraylength,
    Getfield { owner: String, field: String, desc: String },
    Putfield { owner: String, field: String, desc: String },
}

/// Most compact push for an integer literal: the reserved small-int
/// opcodes, then byte range, then short range, then constant pool.
pub fn push_int(value: i32) -> JInstruction {
    match value {
        -1 => JInstruction::IconstM1,
        0..=5 => JInstruction::Iconst(value),
        -128..=127 => JInstruction::Bipush(value),
        -32768..=32767 => JInstruction::Sipush(value),
        _ => JInstruction::Ldc(value),
    }
}

fn slot_op(f: &mut fmt::Formatter, mnemonic: &str, slot: usize) -> fmt::Result {
    if slot <= 3 {
        write!(f, "{mnemonic}_{slot}")
    } else {
        write!(f, "{mnemonic} {slot}")
    }
}

impl fmt::Display for JInstruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Label(label) => write!(f, "{label}:"),
            Self::Iload(slot) => slot_op(f, "iload", *slot),
            Self::Istore(slot) => slot_op(f, "istore", *slot),
            Self::Aload(slot) => slot_op(f, "aload", *slot),
            Self::Astore(slot) => slot_op(f, "astore", *slot),
            Self::IconstM1 => write!(f, "iconst_m1"),
            Self::Iconst(v) => write!(f, "iconst_{v}"),
            Self::Bipush(v) => write!(f, "bipush {v}"),
            Self::Sipush(v) => write!(f, "sipush {v}"),
            Self::Ldc(v) => write!(f, "ldc {v}"),
            Self::Iinc { slot, delta } => write!(f, "iinc {slot} {delta}"),
            Self::Iadd => write!(f, "iadd"),
            Self::Isub => write!(f, "isub"),
            Self::Imul => write!(f, "imul"),
            Self::Idiv => write!(f, "idiv"),
            Self::Ixor => write!(f, "ixor"),
            Self::Dup => write!(f, "dup"),
            Self::Pop => write!(f, "pop"),
            Self::If(cmp, label) => write!(f, "if{cmp} {label}"),
            Self::IfIcmp(cmp, label) => write!(f, "if_icmp{cmp} {label}"),
            Self::Goto(label) => write!(f, "goto {label}"),
            Self::Ireturn => write!(f, "ireturn"),
            Self::Areturn => write!(f, "areturn"),
            Self::Return => write!(f, "return"),
            Self::Invokestatic {
                owner,
                method,
                desc,
            } => write!(f, "invokestatic {owner}/{method}{desc}"),
            Self::Invokevirtual {
                owner,
                method,
                desc,
            } => write!(f, "invokevirtual {owner}/{method}{desc}"),
            Self::Invokespecial {
                owner,
                method,
                desc,
            } => write!(f, "invokespecial {owner}/{method}{desc}"),
            Self::New(class) => write!(f, "new {class}"),
            Self::NewarrayInt => write!(f, "newarray int"),
            Self::Iaload => write!(f, "iaload"),
            Self::Iastore => write!(f, "iastore"),
            Self::Arraylength => write!(f, "arraylength"),
            Self::Getfield { owner, field, desc } => write!(f, "getfield {owner}/{field} {desc}"),
            Self::Putfield { owner, field, desc } => write!(f, "putfield {owner}/{field} {desc}"),
        }
    }
}
