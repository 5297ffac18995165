//! Lowering helpers for statement nodes.
//!
//! Structured control flow is flattened here into labels, jumps and
//! `BranchIfZero` tests. Function definitions get their marker, entry label,
//! parameter moves and trailing `Return(0)`.

use super::err::LoweringError;
use super::lower_expr::{lower_args, lower_expr};
use super::lowering_context::{LoweringContext, arg_slot, function_label};
use crate::ast::{AstNode, AstNodeKind};
use crate::ir::op::IROp;
use crate::ir::value::Operand;

pub fn lower_statement(stmt: &AstNode, ctx: &mut LoweringContext) -> Result<(), LoweringError> {
    match stmt.get_kind() {
        AstNodeKind::Block { statements } => {
            for s in statements {
                lower_statement(s, ctx)?;
            }
        }
        AstNodeKind::Assign { target, value } => {
            let src = lower_expr(value, ctx)?;
            ctx.emit(IROp::Move { dest: target.clone(), src });
        }
        AstNodeKind::If { condition, then_branch, else_branch: None } => {
            let cond = lower_expr(condition, ctx)?;
            let end = ctx.new_label("L_end");
            ctx.emit(IROp::BranchIfZero { cond, label: end.clone() });
            lower_statement(then_branch, ctx)?;
            ctx.emit(IROp::Label { name: end });
        }
        AstNodeKind::If { condition, then_branch, else_branch: Some(else_branch) } => {
            let cond = lower_expr(condition, ctx)?;
            let else_label = ctx.new_label("L_else");
            let end = ctx.new_label("L_end");
            ctx.emit(IROp::BranchIfZero { cond, label: else_label.clone() });
            lower_statement(then_branch, ctx)?;
            ctx.emit(IROp::Jump { label: end.clone() });
            ctx.emit(IROp::Label { name: else_label });
            lower_statement(else_branch, ctx)?;
            ctx.emit(IROp::Label { name: end });
        }
        AstNodeKind::While { condition, body } => {
            let head = ctx.new_label("L_cond");
            let end = ctx.new_label("L_end");
            ctx.emit(IROp::Label { name: head.clone() });
            // the condition is re-evaluated on every iteration
            let cond = lower_expr(condition, ctx)?;
            ctx.emit(IROp::BranchIfZero { cond, label: end.clone() });
            lower_statement(body, ctx)?;
            ctx.emit(IROp::Jump { label: head });
            ctx.emit(IROp::Label { name: end });
        }
        AstNodeKind::Return { value } => {
            let value = match value {
                Some(v) => lower_expr(v, ctx)?,
                None => Operand::Int(0),
            };
            ctx.emit(IROp::Return { value });
        }
        AstNodeKind::Print { value } => {
            let value = lower_expr(value, ctx)?;
            ctx.emit(IROp::Print { value });
        }
        AstNodeKind::Call { name, args } => {
            let args = lower_args(args, ctx)?;
            ctx.emit(IROp::Call { dest: None, name: name.clone(), args });
        }
        AstNodeKind::FuncDef { .. } => {
            return Err(LoweringError::new(stmt, "inside another block", "minic.ir.lower.lower_statement"));
        }
        AstNodeKind::Program { .. } => {
            return Err(LoweringError::new(stmt, "inside a program", "minic.ir.lower.lower_statement"));
        }
        AstNodeKind::BinaryOp { .. } | AstNodeKind::Identifier { .. } | AstNodeKind::Integer { .. } => {
            return Err(LoweringError::new(stmt, "in statement position", "minic.ir.lower.lower_statement"));
        }
    }
    Ok(())
}

/// Lower one function definition.
///
/// Emits `FuncMarker`, the `FUNC_<name>` entry label, one `Move` per
/// parameter from its positional argument slot, the body, and a final
/// `Return(0)` so control never runs off the end.
pub fn lower_function(func: &AstNode, ctx: &mut LoweringContext) -> Result<(), LoweringError> {
    let AstNodeKind::FuncDef { name, params, body } = func.get_kind() else {
        return Err(LoweringError::new(func, "as a function definition", "minic.ir.lower.lower_function"));
    };
    ctx.emit(IROp::FuncMarker { name: name.clone(), params: params.clone() });
    ctx.emit(IROp::Label { name: function_label(name) });
    for (i, param) in params.iter().enumerate() {
        ctx.emit(IROp::Move { dest: param.clone(), src: Operand::Name(arg_slot(i)) });
    }
    lower_statement(body, ctx)?;
    ctx.emit(IROp::Return { value: Operand::Int(0) });
    Ok(())
}
