//! Textual assembly emission. `to_string()` on a generated class is
//! the pipeline's terminal artifact.

use std::fmt;

use crate::codegen::{JClass, JInstruction, JMethod};

impl fmt::Display for JMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, ".method ")?;
        if self.is_public {
            write!(f, "public ")?;
        }
        if self.is_static {
            write!(f, "static ")?;
        }
        writeln!(f, "{}{}", self.name, self.desc)?;
        writeln!(f, "\t.limit stack {}", self.stack_limit)?;
        writeln!(f, "\t.limit locals {}", self.locals_limit)?;
        for instruction in &self.instructions {
            if matches!(instruction, JInstruction::Label(_)) {
                writeln!(f, "{instruction}")?;
            } else {
                writeln!(f, "\t{instruction}")?;
            }
        }
        writeln!(f, ".end method")
    }
}

impl fmt::Display for JClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, ".class public {}", self.name)?;
        writeln!(f, ".super {}", self.super_path)?;
        for field in &self.fields {
            writeln!(f, ".field public {} {}", field.name, field.desc)?;
        }
        writeln!(f)?;
        // Constructors are not lowered; every class gets the standard
        // zero-argument template delegating to its superclass.
        writeln!(f, ".method public <init>()V")?;
        writeln!(f, "\taload_0")?;
        writeln!(f, "\tinvokespecial {}/<init>()V", self.super_path)?;
        writeln!(f, "\treturn")?;
        writeln!(f, ".end method")?;
        for method in &self.methods {
            writeln!(f)?;
            write!(f, "{method}")?;
        }
        Ok(())
    }
}
