//! Register slot allocation over a lowered method.
//!
//! The interference graph is deliberately conservative: every pair of
//! distinct variables interferes, since no liveness analysis is run.
//! Under a budget that is below the variable count the allocator
//! degrades to modulo slot sharing instead of failing; callers accept
//! that as best effort.

use std::collections::HashMap;

use crate::ollir::{CallKind, OCond, OInstruction, OMethod, OValue};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AllocMode {
    /// Keep every variable's pre-existing slot.
    PassThrough,
    /// Color with as few slots as possible.
    Minimize,
    /// Color with at most this many slots, sharing beyond it.
    Budget(usize),
}

impl AllocMode {
    /// Decodes the driver's register request: `-1` pass-through, `0`
    /// minimize, a positive count is a hard cap.
    pub fn from_request(request: i32) -> Self {
        match request {
            r if r < 0 => Self::PassThrough,
            0 => Self::Minimize,
            r => Self::Budget(r as usize),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Allocation {
    pub mapping: HashMap<String, usize>,
    pub used: usize,
}

impl Allocation {
    /// Slot of a named variable; `this` always occupies slot 0 of an
    /// instance method and is never part of the colored set.
    pub fn slot(&self, name: &str) -> Option<usize> {
        if name == "this" {
            return Some(0);
        }
        self.mapping.get(name).copied()
    }

    pub fn max_slot(&self) -> usize {
        self.mapping.values().copied().max().unwrap_or(0)
    }
}

/// Variables of a method in slot order: parameters first, then every
/// other name by first occurrence in the instruction stream.
pub fn method_variables(method: &OMethod) -> Vec<String> {
    let mut vars: Vec<String> = method.params.iter().map(|p| p.name.clone()).collect();
    for instruction in &method.instructions {
        for value in operands(instruction) {
            if let OValue::Var(name, _) = value {
                if name != "this" && !vars.iter().any(|v| v == name) {
                    vars.push(name.clone());
                }
            }
        }
    }
    vars
}

pub fn allocate(method: &OMethod, mode: AllocMode) -> Allocation {
    let vars = method_variables(method);
    let offset = usize::from(!method.is_static);
    match mode {
        AllocMode::PassThrough => {
            let mapping = vars
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), offset + i))
                .collect();
            Allocation {
                used: vars.len(),
                mapping,
            }
        }
        AllocMode::Minimize => color(&vars, None, offset),
        AllocMode::Budget(k) => color(&vars, Some(k.max(1)), offset),
    }
}

/// Greedy graph coloring: order nodes by descending interference
/// degree, give each the smallest color not taken by an already
/// colored neighbor. With a budget, a node with no free color below
/// the cap is forced into `color % cap`.
fn color(vars: &[String], budget: Option<usize>, offset: usize) -> Allocation {
    let n = vars.len();
    let interferes = |a: usize, b: usize| a != b;

    let mut order: Vec<usize> = (0..n).collect();
    let degree = |v: usize| (0..n).filter(|&o| interferes(v, o)).count();
    order.sort_by(|&a, &b| degree(b).cmp(&degree(a)));

    let mut colors: Vec<Option<usize>> = vec![None; n];
    for &v in &order {
        let taken: Vec<usize> = (0..n)
            .filter(|&o| interferes(v, o))
            .filter_map(|o| colors[o])
            .collect();
        let mut chosen = (0..).find(|c| !taken.contains(c)).unwrap_or(0);
        if let Some(k) = budget {
            if chosen >= k {
                chosen %= k;
            }
        }
        colors[v] = Some(chosen);
    }

    let mut used: Vec<usize> = colors.iter().filter_map(|c| *c).collect();
    used.sort_unstable();
    used.dedup();

    let mapping = vars
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), offset + colors[i].unwrap_or(0)))
        .collect();
    Allocation {
        mapping,
        used: used.len(),
    }
}

fn operands(instruction: &OInstruction) -> Vec<&OValue> {
    match instruction {
        OInstruction::Assign { dst, src } | OInstruction::Not { dst, src } => vec![dst, src],
        OInstruction::Binary { dst, lhs, rhs, .. } => vec![dst, lhs, rhs],
        OInstruction::GetField { dst, .. } => vec![dst],
        OInstruction::PutField { value, .. } => vec![value],
        OInstruction::ArrayLoad { dst, array, index } => vec![dst, array, index],
        OInstruction::ArrayStore {
            array,
            index,
            value,
        } => vec![array, index, value],
        OInstruction::ArrayLength { dst, array } => vec![dst, array],
        OInstruction::NewArray { dst, size } => vec![dst, size],
        OInstruction::NewObject { dst, .. } => vec![dst],
        OInstruction::Call {
            dst, kind, args, ..
        } => {
            let mut out: Vec<&OValue> = Vec::new();
            if let Some(dst) = dst {
                out.push(dst);
            }
            if let CallKind::Virtual(recv) | CallKind::Special(recv) = kind {
                out.push(recv);
            }
            out.extend(args);
            out
        }
        OInstruction::Branch { cond, .. } => match cond {
            OCond::Value(v) | OCond::Not(v) => vec![v],
            OCond::Compare { lhs, rhs, .. } => vec![lhs, rhs],
        },
        OInstruction::Return { value, .. } => value.iter().collect(),
        OInstruction::Jump(_) | OInstruction::Label(_) => Vec::new(),
    }
}
