//! file: core/src/ir/opt/const_fold.rs
//! description: literal constant folding.
//!
//! A `BinaryOp` whose operands are both integer literals becomes a `Move` of
//! the precomputed value. Evaluation goes through `ir::op::evaluate`, the same
//! function the VM executes, so a folded program behaves exactly like the
//! unfolded one (division by zero folds to 0).
//!
use crate::ir::op::{IROp, evaluate};
use crate::ir::value::Operand;

/// Fold one instruction; anything that is not foldable is returned as is.
pub(crate) fn fold_constant(op: IROp) -> IROp {
    match op {
        IROp::BinaryOp { dest, op, lhs: Operand::Int(a), rhs: Operand::Int(b) } => {
            let value = evaluate(op, a, b);
            log::trace!("folded {} {} {} -> {}", a, op, b, value);
            IROp::Move { dest, src: Operand::Int(value) }
        }
        other => other,
    }
}
