//! file: core/src/ir/lower/lower_expr.rs
//! description: expression lowering.
//!
//! Expressions lower to an `Operand`. Literals and variable references pass
//! through untouched; every binary operation and every call gets exactly one
//! fresh temporary written by exactly one IR instruction.
//!
use super::err::LoweringError;
use super::lowering_context::LoweringContext;
use crate::ast::{AstNode, AstNodeKind};
use crate::ir::op::IROp;
use crate::ir::value::Operand;

pub fn lower_expr(expr: &AstNode, ctx: &mut LoweringContext) -> Result<Operand, LoweringError> {
    match expr.get_kind() {
        AstNodeKind::Integer { value } => Ok(Operand::Int(*value)),
        AstNodeKind::Identifier { name } => Ok(Operand::Name(name.clone())),
        AstNodeKind::BinaryOp { op, left, right } => {
            let lhs = lower_expr(left, ctx)?;
            let rhs = lower_expr(right, ctx)?;
            let dest = ctx.new_temp();
            ctx.emit(IROp::BinaryOp { dest: dest.clone(), op: *op, lhs, rhs });
            Ok(Operand::Name(dest))
        }
        AstNodeKind::Call { name, args } => {
            let args = lower_args(args, ctx)?;
            let dest = ctx.new_temp();
            ctx.emit(IROp::Call { dest: Some(dest.clone()), name: name.clone(), args });
            Ok(Operand::Name(dest))
        }
        _ => Err(LoweringError::new(expr, "in expression position", "minic.ir.lower.lower_expr")),
    }
}

/// Arguments are evaluated left to right.
pub fn lower_args(args: &[AstNode], ctx: &mut LoweringContext) -> Result<Vec<Operand>, LoweringError> {
    args.iter().map(|arg| lower_expr(arg, ctx)).collect()
}
