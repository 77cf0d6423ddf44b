//! Frame limit computation.
//!
//! The stack limit comes from a single forward pass over the lowered
//! instructions with a fixed net-effect delta per instruction kind,
//! clamping the running depth at zero. The result is floored so that
//! argument pushes hidden inside a single call instruction still fit.

use crate::ollir::{CallKind, OInstruction, OMethod};
use crate::regalloc::Allocation;

const STACK_CAP: i32 = 99;

pub fn stack_limit(method: &OMethod) -> usize {
    let mut depth: i32 = 0;
    let mut max: i32 = 0;
    for instruction in &method.instructions {
        let delta = match instruction {
            OInstruction::Binary { .. } | OInstruction::Branch { .. } => -1,
            OInstruction::ArrayStore { .. } => -3,
            OInstruction::PutField { .. } => -2,
            OInstruction::Return { value, .. } => {
                if value.is_some() {
                    -1
                } else {
                    0
                }
            }
            OInstruction::Call {
                dst, kind, args, ..
            } => {
                let mut argc = i32::try_from(args.len()).unwrap_or(i32::MAX);
                if !matches!(kind, CallKind::Static(_)) {
                    argc += 1;
                }
                if dst.is_some() {
                    1 - argc
                } else {
                    -argc
                }
            }
            OInstruction::GetField { .. }
            | OInstruction::ArrayLength { .. }
            | OInstruction::Label(_)
            | OInstruction::Jump(_) => 0,
            _ => 1,
        };
        depth = (depth + delta).max(0);
        max = max.max(depth);
    }
    let floor = if method.instructions.len() > 5 { 3 } else { 2 };
    let limit = max.max(floor).min(STACK_CAP);
    limit as usize
}

/// One more than the highest slot in use, never below what the
/// signature itself demands.
pub fn locals_limit(method: &OMethod, alloc: &Allocation) -> usize {
    let highest = if alloc.mapping.is_empty() {
        0
    } else {
        alloc.max_slot() + 1
    };
    let signature = method.params.len() + usize::from(!method.is_static);
    highest.max(signature).max(1)
}
