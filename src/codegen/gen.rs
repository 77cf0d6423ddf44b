//! Instruction selection from the three-address IR.

use super::jasmin_ast::{push_int, Cmp, JInstruction};
use super::{class_path, method_descriptor};
use crate::ast::BinaryOp;
use crate::ollir::{CallKind, CmpOp, IrType, OClass, OCond, OInstruction, OMethod, OValue};
use crate::regalloc::Allocation;

pub(crate) fn gen_method(
    class: &OClass,
    method: &OMethod,
    alloc: &Allocation,
) -> Vec<JInstruction> {
    let mut out = Vec::new();
    let instructions = &method.instructions;
    let mut i = 0;
    while i < instructions.len() {
        if let Some(slot) = increment_pair(instructions, i, alloc) {
            out.push(JInstruction::Iinc { slot, delta: 1 });
            i += 2;
            continue;
        }
        gen_instruction(class, instructions, i, alloc, &mut out);
        i += 1;
    }
    out
}

/// Adjacent-pair increment scan: `t := v + 1; v := t` collapses to a
/// single `iinc` on `v`'s slot.
fn increment_pair(
    instructions: &[OInstruction],
    i: usize,
    alloc: &Allocation,
) -> Option<usize> {
    let OInstruction::Binary {
        dst: tmp,
        op: BinaryOp::Add,
        lhs,
        rhs,
    } = instructions.get(i)?
    else {
        return None;
    };
    let OInstruction::Assign { dst, src } = instructions.get(i + 1)? else {
        return None;
    };
    if src != tmp {
        return None;
    }
    let var = dst.name()?;
    if !is_increment_of(var, lhs, rhs) {
        return None;
    }
    alloc.slot(var)
}

fn is_increment_of(var: &str, lhs: &OValue, rhs: &OValue) -> bool {
    let one_and_var = |a: &OValue, b: &OValue| a.as_imm() == Some(1) && b.name() == Some(var);
    one_and_var(lhs, rhs) || one_and_var(rhs, lhs)
}

fn is_reference(ty: &IrType) -> bool {
    matches!(
        ty,
        IrType::Array(_) | IrType::Class(_) | IrType::StringT
    )
}

fn load(value: &OValue, alloc: &Allocation, out: &mut Vec<JInstruction>) {
    match value {
        OValue::Imm(v, _) => out.push(push_int(*v)),
        OValue::Var(name, ty) => {
            let slot = alloc.slot(name).unwrap_or(0);
            if is_reference(ty) {
                out.push(JInstruction::Aload(slot));
            } else {
                out.push(JInstruction::Iload(slot));
            }
        }
    }
}

fn store(value: &OValue, alloc: &Allocation, out: &mut Vec<JInstruction>) {
    if let OValue::Var(name, ty) = value {
        let slot = alloc.slot(name).unwrap_or(0);
        if is_reference(ty) {
            out.push(JInstruction::Astore(slot));
        } else {
            out.push(JInstruction::Istore(slot));
        }
    }
}

fn gen_instruction(
    class: &OClass,
    instructions: &[OInstruction],
    i: usize,
    alloc: &Allocation,
    out: &mut Vec<JInstruction>,
) {
    match &instructions[i] {
        OInstruction::Assign { dst, src } => {
            load(src, alloc, out);
            store(dst, alloc, out);
        }
        OInstruction::Binary { dst, op, lhs, rhs } => {
            if *op == BinaryOp::Add && dst.name().is_some_and(|v| is_increment_of(v, lhs, rhs)) {
                if let Some(slot) = dst.name().and_then(|v| alloc.slot(v)) {
                    out.push(JInstruction::Iinc { slot, delta: 1 });
                    return;
                }
            }
            load(lhs, alloc, out);
            load(rhs, alloc, out);
            out.push(match op {
                BinaryOp::Add => JInstruction::Iadd,
                BinaryOp::Mul | BinaryOp::And => JInstruction::Imul,
                BinaryOp::Div => JInstruction::Idiv,
                // Comparisons materialize as a difference; branches on
                // them are reconstructed from the defining instruction.
                BinaryOp::Sub | BinaryOp::LessThan | BinaryOp::GreaterThan => JInstruction::Isub,
            });
            store(dst, alloc, out);
        }
        OInstruction::Not { dst, src } => {
            load(src, alloc, out);
            out.push(JInstruction::Iconst(1));
            out.push(JInstruction::Ixor);
            store(dst, alloc, out);
        }
        OInstruction::GetField { dst, field, ty } => {
            out.push(JInstruction::Aload(0));
            out.push(JInstruction::Getfield {
                owner: class.name.clone(),
                field: field.clone(),
                desc: super::descriptor(class, ty),
            });
            store(dst, alloc, out);
        }
        OInstruction::PutField { field, ty, value } => {
            out.push(JInstruction::Aload(0));
            load(value, alloc, out);
            out.push(JInstruction::Putfield {
                owner: class.name.clone(),
                field: field.clone(),
                desc: super::descriptor(class, ty),
            });
        }
        OInstruction::ArrayLoad { dst, array, index } => {
            load(array, alloc, out);
            load(index, alloc, out);
            out.push(JInstruction::Iaload);
            store(dst, alloc, out);
        }
        OInstruction::ArrayStore {
            array,
            index,
            value,
        } => {
            load(array, alloc, out);
            load(index, alloc, out);
            load(value, alloc, out);
            out.push(JInstruction::Iastore);
        }
        OInstruction::ArrayLength { dst, array } => {
            load(array, alloc, out);
            out.push(JInstruction::Arraylength);
            store(dst, alloc, out);
        }
        OInstruction::NewArray { dst, size } => {
            load(size, alloc, out);
            out.push(JInstruction::NewarrayInt);
            store(dst, alloc, out);
        }
        OInstruction::NewObject { dst, class: name } => {
            let owner = class_path(class, name);
            out.push(JInstruction::New(owner.clone()));
            out.push(JInstruction::Dup);
            out.push(JInstruction::Invokespecial {
                owner,
                method: "<init>".to_string(),
                desc: "()V".to_string(),
            });
            store(dst, alloc, out);
        }
        OInstruction::Call {
            dst,
            kind,
            method,
            args,
            ret,
        } => gen_call(class, alloc, dst.as_ref(), kind, method, args, ret, out),
        OInstruction::Branch { cond, target } => {
            gen_branch(instructions, i, alloc, cond, target, out);
        }
        OInstruction::Jump(target) => out.push(JInstruction::Goto(target.clone())),
        OInstruction::Label(label) => out.push(JInstruction::Label(label.clone())),
        OInstruction::Return { value, ty } => match value {
            Some(value) => {
                load(value, alloc, out);
                if is_reference(ty) {
                    out.push(JInstruction::Areturn);
                } else {
                    out.push(JInstruction::Ireturn);
                }
            }
            None => out.push(JInstruction::Return),
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn gen_call(
    class: &OClass,
    alloc: &Allocation,
    dst: Option<&OValue>,
    kind: &CallKind,
    method: &str,
    args: &[OValue],
    ret: &IrType,
    out: &mut Vec<JInstruction>,
) {
    // A special-form initializer call was already folded into the
    // preceding new/dup sequence.
    if method == "<init>" && matches!(kind, CallKind::Special(_)) {
        return;
    }
    let desc = method_descriptor(class, args.iter().map(OValue::ty), ret);
    match kind {
        CallKind::Static(name) => {
            for arg in args {
                load(arg, alloc, out);
            }
            out.push(JInstruction::Invokestatic {
                owner: class_path(class, name),
                method: method.to_string(),
                desc,
            });
        }
        CallKind::Virtual(recv) | CallKind::Special(recv) => {
            load(recv, alloc, out);
            for arg in args {
                load(arg, alloc, out);
            }
            let owner = match recv.ty() {
                IrType::Class(name) => class_path(class, name),
                _ => class.name.clone(),
            };
            let call = if matches!(kind, CallKind::Virtual(_)) {
                JInstruction::Invokevirtual {
                    owner,
                    method: method.to_string(),
                    desc,
                }
            } else {
                JInstruction::Invokespecial {
                    owner,
                    method: method.to_string(),
                    desc,
                }
            };
            out.push(call);
        }
    }
    match dst {
        Some(dst) => store(dst, alloc, out),
        None if !ret.is_void() => out.push(JInstruction::Pop),
        None => {}
    }
}

fn cmp_of(op: CmpOp) -> Cmp {
    match op {
        CmpOp::LessThan => Cmp::Lt,
        CmpOp::GreaterThan => Cmp::Gt,
    }
}

fn gen_branch(
    instructions: &[OInstruction],
    i: usize,
    alloc: &Allocation,
    cond: &OCond,
    target: &str,
    out: &mut Vec<JInstruction>,
) {
    match cond {
        OCond::Compare { op, lhs, rhs } => {
            gen_compare(cmp_of(*op), lhs, rhs, target, alloc, out);
        }
        OCond::Not(value) => {
            load(value, alloc, out);
            out.push(JInstruction::If(Cmp::Eq, target.to_string()));
        }
        OCond::Value(value) => {
            // The comparison may have been hoisted into a temporary;
            // rebuild the compact branch from its defining instruction.
            if let Some(name) = value.name() {
                for prior in instructions[..i].iter().rev() {
                    let OInstruction::Binary { dst, op, lhs, rhs } = prior else {
                        continue;
                    };
                    if dst.name() != Some(name) || !op.is_comparison() {
                        continue;
                    }
                    let cmp = if *op == BinaryOp::LessThan {
                        Cmp::Lt
                    } else {
                        Cmp::Gt
                    };
                    gen_compare(cmp, lhs, rhs, target, alloc, out);
                    return;
                }
            }
            load(value, alloc, out);
            out.push(JInstruction::If(Cmp::Ne, target.to_string()));
        }
    }
}

/// Picks the single-operand zero-comparison form when either side is
/// the literal 0, flipping the direction when the zero is on the left.
fn gen_compare(
    cmp: Cmp,
    lhs: &OValue,
    rhs: &OValue,
    target: &str,
    alloc: &Allocation,
    out: &mut Vec<JInstruction>,
) {
    if rhs.as_imm() == Some(0) {
        load(lhs, alloc, out);
        out.push(JInstruction::If(cmp, target.to_string()));
    } else if lhs.as_imm() == Some(0) {
        load(rhs, alloc, out);
        out.push(JInstruction::If(cmp.flipped(), target.to_string()));
    } else {
        load(lhs, alloc, out);
        load(rhs, alloc, out);
        out.push(JInstruction::IfIcmp(cmp, target.to_string()));
    }
}
