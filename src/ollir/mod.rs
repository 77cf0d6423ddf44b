//! Lowering from the AST to the typed three-address IR.
//!
//! Expressions lower to an operand plus the preparatory instructions
//! that must run first; statements sequence those and synthesize the
//! branch/label shapes. Temporary and label counters live in one
//! context per compilation unit and are never reused.

pub mod oast;

use crate::ast::{Ast, BinaryOp, NodeId, NodeKind};
use crate::table::SymbolTable;

pub use oast::{CallKind, CmpOp, IrType, OClass, OCond, OInstruction, OMethod, OParam, OValue};

struct LoweringCtx<'a> {
    table: &'a SymbolTable,
    method: String,
    tmp_count: usize,
    branch_count: usize,
    and_count: usize,
}

impl<'a> LoweringCtx<'a> {
    fn new(table: &'a SymbolTable) -> Self {
        Self {
            table,
            method: String::new(),
            tmp_count: 0,
            branch_count: 0,
            and_count: 0,
        }
    }

    fn fresh_tmp(&mut self, ty: IrType) -> OValue {
        let name = format!("tmp{}", self.tmp_count);
        self.tmp_count += 1;
        OValue::Var(name, ty)
    }

    fn next_branch(&mut self) -> usize {
        let n = self.branch_count;
        self.branch_count += 1;
        n
    }

    fn next_and(&mut self) -> usize {
        let n = self.and_count;
        self.and_count += 1;
        n
    }

    fn this_value(&self) -> OValue {
        OValue::Var(
            "this".to_string(),
            IrType::Class(self.table.class_name.clone()),
        )
    }

    fn var_type(&self, name: &str) -> IrType {
        self.table
            .var_type(&self.method, name)
            .map_or_else(|| IrType::Class(name.to_string()), IrType::from_type)
    }

    fn is_field(&self, name: &str) -> bool {
        self.table.is_field(&self.method, name)
    }
}

pub fn lower(ast: &Ast, table: &SymbolTable) -> OClass {
    let mut ctx = LoweringCtx::new(table);
    let methods = ast
        .class_methods()
        .into_iter()
        .filter_map(|decl| convert_method(&mut ctx, ast, decl))
        .collect();
    OClass {
        name: table.class_name.clone(),
        super_name: table.super_name.clone(),
        imports: table.imports().to_vec(),
        fields: table
            .fields()
            .iter()
            .map(|field| OParam {
                name: field.name.clone(),
                ty: IrType::from_type(&field.ty),
            })
            .collect(),
        methods,
    }
}

fn convert_method(ctx: &mut LoweringCtx, ast: &Ast, decl: NodeId) -> Option<OMethod> {
    let NodeKind::MethodDecl {
        name,
        is_public,
        is_static,
        body,
        ret_expr,
        ..
    } = ast.kind(decl)
    else {
        return None;
    };
    ctx.method = name.clone();

    let param_syms = ctx.table.params(name).unwrap_or_default();
    let is_vararg = param_syms.last().is_some_and(|p| p.ty.is_vararg());
    let params = param_syms
        .iter()
        .map(|p| OParam {
            name: p.name.clone(),
            ty: IrType::from_type(&p.ty),
        })
        .collect();
    let ret = ctx
        .table
        .return_type(name)
        .map_or(IrType::Void, IrType::from_type);

    let mut instructions = Vec::new();
    for &stmt in body {
        emit_stmt(ctx, ast, stmt, &mut instructions);
    }
    match ret_expr {
        Some(ret_id) => {
            let value = emit_expr_hinted(ctx, ast, *ret_id, Some(&ret), &mut instructions);
            instructions.push(OInstruction::Return {
                value: Some(value),
                ty: ret.clone(),
            });
        }
        None => instructions.push(OInstruction::Return {
            value: None,
            ty: IrType::Void,
        }),
    }

    Some(OMethod {
        name: name.clone(),
        is_public: *is_public,
        is_static: *is_static,
        is_vararg,
        params,
        ret,
        instructions,
    })
}

fn strip_parens(ast: &Ast, mut id: NodeId) -> NodeId {
    while let NodeKind::Parens(inner) = ast.kind(id) {
        id = *inner;
    }
    id
}

fn emit_stmt(ctx: &mut LoweringCtx, ast: &Ast, id: NodeId, instructions: &mut Vec<OInstruction>) {
    match ast.kind(id) {
        NodeKind::Block(stmts) => {
            for &stmt in stmts {
                emit_stmt(ctx, ast, stmt, instructions);
            }
        }
        NodeKind::Assign { var, value } => {
            let ty = ctx.var_type(var);
            let src = emit_expr_hinted(ctx, ast, *value, Some(&ty), instructions);
            if ctx.is_field(var) {
                instructions.push(OInstruction::PutField {
                    field: var.clone(),
                    ty,
                    value: src,
                });
            } else {
                instructions.push(OInstruction::Assign {
                    dst: OValue::Var(var.clone(), ty),
                    src,
                });
            }
        }
        NodeKind::ArrayAssign { var, index, value } => {
            let array = materialize_var(ctx, var, instructions);
            let index = emit_expr(ctx, ast, *index, instructions);
            let value = emit_expr(ctx, ast, *value, instructions);
            instructions.push(OInstruction::ArrayStore {
                array,
                index,
                value,
            });
        }
        NodeKind::ExprStmt(expr) => {
            let expr = strip_parens(ast, *expr);
            if let NodeKind::MethodCall {
                receiver,
                method,
                args,
            } = ast.kind(expr)
            {
                emit_call(ctx, ast, *receiver, method, args, false, None, instructions);
            } else {
                emit_expr(ctx, ast, expr, instructions);
            }
        }
        NodeKind::If { cond, then, els } => {
            let n = ctx.next_branch();
            let then_label = format!("Then{n}");
            let end_label = format!("End{n}");
            let cond = emit_cond(ctx, ast, *cond, instructions);
            instructions.push(OInstruction::Branch {
                cond,
                target: then_label.clone(),
            });
            emit_stmt(ctx, ast, *els, instructions);
            instructions.push(OInstruction::Jump(end_label.clone()));
            instructions.push(OInstruction::Label(then_label));
            emit_stmt(ctx, ast, *then, instructions);
            instructions.push(OInstruction::Label(end_label));
        }
        NodeKind::While { cond, body } => {
            let n = ctx.next_branch();
            let cond_label = format!("Cond{n}");
            let then_label = format!("Then{n}");
            let end_label = format!("End{n}");
            let cond = emit_cond(ctx, ast, *cond, instructions);
            instructions.push(OInstruction::Label(cond_label.clone()));
            instructions.push(OInstruction::Branch {
                cond,
                target: then_label.clone(),
            });
            instructions.push(OInstruction::Jump(end_label.clone()));
            instructions.push(OInstruction::Label(then_label));
            emit_stmt(ctx, ast, *body, instructions);
            instructions.push(OInstruction::Jump(cond_label));
            instructions.push(OInstruction::Label(end_label));
        }
        _ => {}
    }
}

/// Loads a named variable as an operand; an unshadowed field goes
/// through an explicit field read into a temporary first.
fn materialize_var(
    ctx: &mut LoweringCtx,
    name: &str,
    instructions: &mut Vec<OInstruction>,
) -> OValue {
    let ty = ctx.var_type(name);
    if ctx.is_field(name) {
        let dst = ctx.fresh_tmp(ty.clone());
        instructions.push(OInstruction::GetField {
            dst: dst.clone(),
            field: name.to_string(),
            ty,
        });
        dst
    } else {
        OValue::Var(name.to_string(), ty)
    }
}

/// Lowers a branch condition, keeping bare comparisons structured so
/// the bytecode stage can emit compact forms.
fn emit_cond(
    ctx: &mut LoweringCtx,
    ast: &Ast,
    id: NodeId,
    instructions: &mut Vec<OInstruction>,
) -> OCond {
    let id = strip_parens(ast, id);
    match ast.kind(id) {
        NodeKind::Binary { op, lhs, rhs } if op.is_comparison() => {
            let cmp = match op {
                BinaryOp::LessThan => CmpOp::LessThan,
                _ => CmpOp::GreaterThan,
            };
            let lhs = emit_expr(ctx, ast, *lhs, instructions);
            let rhs = emit_expr(ctx, ast, *rhs, instructions);
            OCond::Compare { op: cmp, lhs, rhs }
        }
        NodeKind::Not(inner) => {
            let value = emit_expr(ctx, ast, *inner, instructions);
            OCond::Not(value)
        }
        _ => OCond::Value(emit_expr(ctx, ast, id, instructions)),
    }
}

fn emit_expr(
    ctx: &mut LoweringCtx,
    ast: &Ast,
    id: NodeId,
    instructions: &mut Vec<OInstruction>,
) -> OValue {
    emit_expr_hinted(ctx, ast, id, None, instructions)
}

fn emit_expr_hinted(
    ctx: &mut LoweringCtx,
    ast: &Ast,
    id: NodeId,
    hint: Option<&IrType>,
    instructions: &mut Vec<OInstruction>,
) -> OValue {
    match ast.kind(id) {
        NodeKind::IntLiteral(v) => OValue::Imm(*v, IrType::I32),
        NodeKind::True => OValue::Imm(1, IrType::Bool),
        NodeKind::False => OValue::Imm(0, IrType::Bool),
        NodeKind::This => ctx.this_value(),
        NodeKind::Parens(inner) => emit_expr_hinted(ctx, ast, *inner, hint, instructions),
        NodeKind::Identifier(name) => materialize_var(ctx, name, instructions),
        NodeKind::Not(inner) => {
            let src = emit_expr(ctx, ast, *inner, instructions);
            let dst = ctx.fresh_tmp(IrType::Bool);
            instructions.push(OInstruction::Not {
                dst: dst.clone(),
                src,
            });
            dst
        }
        NodeKind::Binary {
            op: BinaryOp::And,
            lhs,
            rhs,
        } => emit_and(ctx, ast, *lhs, *rhs, instructions),
        NodeKind::Binary { op, lhs, rhs } => {
            let result_ty = if op.is_arithmetic() {
                IrType::I32
            } else {
                IrType::Bool
            };
            let op = *op;
            let lhs = emit_expr(ctx, ast, *lhs, instructions);
            let rhs = emit_expr(ctx, ast, *rhs, instructions);
            let dst = ctx.fresh_tmp(result_ty);
            instructions.push(OInstruction::Binary {
                dst: dst.clone(),
                op,
                lhs,
                rhs,
            });
            dst
        }
        NodeKind::ArrayIndex { array, index } => {
            let array = emit_expr(ctx, ast, *array, instructions);
            let index = emit_expr(ctx, ast, *index, instructions);
            let dst = ctx.fresh_tmp(array.ty().elem());
            instructions.push(OInstruction::ArrayLoad {
                dst: dst.clone(),
                array,
                index,
            });
            dst
        }
        NodeKind::ArrayLength(array) => {
            let array = emit_expr(ctx, ast, *array, instructions);
            let dst = ctx.fresh_tmp(IrType::I32);
            instructions.push(OInstruction::ArrayLength {
                dst: dst.clone(),
                array,
            });
            dst
        }
        NodeKind::NewArray { size } => {
            let size = emit_expr(ctx, ast, *size, instructions);
            let dst = ctx.fresh_tmp(IrType::Array(Box::new(IrType::I32)));
            instructions.push(OInstruction::NewArray {
                dst: dst.clone(),
                size,
            });
            dst
        }
        NodeKind::ArrayLiteral(elems) => {
            let elems = elems.clone();
            let dst = ctx.fresh_tmp(IrType::Array(Box::new(IrType::I32)));
            let len = i32::try_from(elems.len()).unwrap_or(i32::MAX);
            instructions.push(OInstruction::NewArray {
                dst: dst.clone(),
                size: OValue::Imm(len, IrType::I32),
            });
            for (i, elem) in elems.into_iter().enumerate() {
                let value = emit_expr(ctx, ast, elem, instructions);
                let index = i32::try_from(i).unwrap_or(i32::MAX);
                instructions.push(OInstruction::ArrayStore {
                    array: dst.clone(),
                    index: OValue::Imm(index, IrType::I32),
                    value,
                });
            }
            dst
        }
        NodeKind::NewObject { class } => {
            let class = class.clone();
            let dst = ctx.fresh_tmp(IrType::Class(class.clone()));
            instructions.push(OInstruction::NewObject {
                dst: dst.clone(),
                class: class.clone(),
            });
            // Imported classes get a static-form initializer call,
            // locally declared ones the special form.
            let kind = if ctx.table.has_import(&class) {
                CallKind::Static(class)
            } else {
                CallKind::Special(dst.clone())
            };
            instructions.push(OInstruction::Call {
                dst: None,
                kind,
                method: "<init>".to_string(),
                args: Vec::new(),
                ret: IrType::Void,
            });
            dst
        }
        NodeKind::MethodCall {
            receiver,
            method,
            args,
        } => emit_call(ctx, ast, *receiver, method, args, true, hint, instructions)
            .unwrap_or(OValue::Imm(0, IrType::Void)),
        _ => OValue::Imm(0, IrType::Void),
    }
}

/// Short-circuit `&&`: the right operand is only evaluated when the
/// left one is true; otherwise the result temporary is set to false.
fn emit_and(
    ctx: &mut LoweringCtx,
    ast: &Ast,
    lhs: NodeId,
    rhs: NodeId,
    instructions: &mut Vec<OInstruction>,
) -> OValue {
    let n = ctx.next_and();
    let false_label = format!("AndFalse{n}");
    let end_label = format!("AndEnd{n}");
    let lhs = emit_expr(ctx, ast, lhs, instructions);
    let result = ctx.fresh_tmp(IrType::Bool);
    instructions.push(OInstruction::Branch {
        cond: OCond::Not(lhs),
        target: false_label.clone(),
    });
    let rhs = emit_expr(ctx, ast, rhs, instructions);
    instructions.push(OInstruction::Assign {
        dst: result.clone(),
        src: rhs,
    });
    instructions.push(OInstruction::Jump(end_label.clone()));
    instructions.push(OInstruction::Label(false_label));
    instructions.push(OInstruction::Assign {
        dst: result.clone(),
        src: OValue::Imm(0, IrType::Bool),
    });
    instructions.push(OInstruction::Label(end_label));
    result
}

#[allow(clippy::too_many_arguments)]
fn emit_call(
    ctx: &mut LoweringCtx,
    ast: &Ast,
    receiver: NodeId,
    method: &str,
    args: &[NodeId],
    want_value: bool,
    hint: Option<&IrType>,
    instructions: &mut Vec<OInstruction>,
) -> Option<OValue> {
    let receiver = strip_parens(ast, receiver);
    let kind = match ast.kind(receiver) {
        NodeKind::Identifier(name) if ctx.table.has_import(name) => CallKind::Static(name.clone()),
        _ => CallKind::Virtual(emit_expr(ctx, ast, receiver, instructions)),
    };
    let args: Vec<OValue> = args
        .iter()
        .map(|&arg| emit_expr(ctx, ast, arg, instructions))
        .collect();
    let ret = match ctx.table.return_type(method) {
        Some(ty) => IrType::from_type(ty),
        None if want_value => hint.cloned().unwrap_or(IrType::I32),
        None => IrType::Void,
    };
    let dst = if want_value && !ret.is_void() {
        Some(ctx.fresh_tmp(ret.clone()))
    } else {
        None
    };
    instructions.push(OInstruction::Call {
        dst: dst.clone(),
        kind,
        method: method.to_string(),
        args,
        ret,
    });
    dst
}
