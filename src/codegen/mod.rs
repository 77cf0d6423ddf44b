//! Bytecode generation: one textual method section per lowered
//! method, with frame limits computed per method and import-aware
//! class paths and type descriptors.

mod gen;
pub mod jasmin_ast;
mod stack;

use crate::ollir::{IrType, OClass};
use crate::regalloc::{allocate, AllocMode};

pub use jasmin_ast::{Cmp, JInstruction};

#[derive(Debug, Clone)]
pub struct JMethod {
    pub name: String,
    pub is_public: bool,
    pub is_static: bool,
    pub desc: String,
    pub stack_limit: usize,
    pub locals_limit: usize,
    pub instructions: Vec<JInstruction>,
}

#[derive(Debug, Clone)]
pub struct JField {
    pub name: String,
    pub desc: String,
}

#[derive(Debug, Clone)]
pub struct JClass {
    pub name: String,
    pub super_path: String,
    pub fields: Vec<JField>,
    pub methods: Vec<JMethod>,
}

pub fn generate(class: &OClass, mode: AllocMode) -> JClass {
    let methods = class
        .methods
        .iter()
        .map(|method| {
            let alloc = allocate(method, mode);
            JMethod {
                name: method.name.clone(),
                is_public: method.is_public,
                is_static: method.is_static,
                desc: method_descriptor(
                    class,
                    method.params.iter().map(|p| &p.ty),
                    &method.ret,
                ),
                stack_limit: stack::stack_limit(method),
                locals_limit: stack::locals_limit(method, &alloc),
                instructions: gen::gen_method(class, method, &alloc),
            }
        })
        .collect();
    JClass {
        name: class.name.clone(),
        super_path: super_path(class),
        fields: class
            .fields
            .iter()
            .map(|field| JField {
                name: field.name.clone(),
                desc: descriptor(class, &field.ty),
            })
            .collect(),
        methods,
    }
}

/// Slash-separated path for a class name: imported names expand to
/// their full dotted import path, everything else stays as is.
pub(crate) fn class_path(class: &OClass, name: &str) -> String {
    class
        .imports
        .iter()
        .find(|path| path.rsplit('.').next() == Some(name))
        .map_or_else(|| name.to_string(), |path| path.replace('.', "/"))
}

pub(crate) fn super_path(class: &OClass) -> String {
    class
        .super_name
        .as_deref()
        .map_or_else(|| "java/lang/Object".to_string(), |s| class_path(class, s))
}

pub(crate) fn descriptor(class: &OClass, ty: &IrType) -> String {
    match ty {
        IrType::I32 => "I".to_string(),
        IrType::Bool => "Z".to_string(),
        IrType::Void => "V".to_string(),
        IrType::StringT => "Ljava/lang/String;".to_string(),
        IrType::Array(inner) => format!("[{}", descriptor(class, inner)),
        IrType::Class(name) => format!("L{};", class_path(class, name)),
    }
}

pub(crate) fn method_descriptor<'a>(
    class: &OClass,
    args: impl Iterator<Item = &'a IrType>,
    ret: &IrType,
) -> String {
    let mut desc = String::from("(");
    for arg in args {
        desc.push_str(&descriptor(class, arg));
    }
    desc.push(')');
    desc.push_str(&descriptor(class, ret));
    desc
}

#[cfg(test)]
mod codegen_tests;
