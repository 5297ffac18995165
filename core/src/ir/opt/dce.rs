//! file: core/src/ir/opt/dce.rs
//! description: dead self-move elimination.
//!
//! The only dead code this optimizer removes is a `Move` that copies a name
//! onto itself. No liveness or reachability analysis is done.
use crate::ir::op::IROp;
use crate::ir::value::Operand;

pub(crate) fn is_dead_self_move(op: &IROp) -> bool {
    matches!(op, IROp::Move { dest, src: Operand::Name(src) } if dest == src)
}
