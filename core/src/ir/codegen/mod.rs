//! IR to target machine code.
//!
//! Each IR instruction maps to one or more `vm::op::Op`s in the same order;
//! no labels are introduced. Calls expand into argument-slot moves, the
//! `CALL` itself and, when the result is used, a copy out of `_ret`. Nothing
//! is saved or restored around a call.

use crate::ir::lower::{RET_SLOT, arg_slot};
use crate::ir::module::IrModule;
use crate::ir::op::IROp;
use crate::ir::value::Operand;
use crate::vm::op::{MachineCode, Op};

/// Name of the function that gets an automatic zero-argument call appended.
pub const ENTRY_FUNCTION: &str = "main";

fn emit_op(op: &IROp, out: &mut Vec<Op>) {
    match op {
        IROp::FuncMarker { name, params } => out.push(Op::Comment {
            text: format!("func {}({})", name, params.join(", ")),
        }),
        IROp::Label { name } => out.push(Op::Label { name: name.clone() }),
        IROp::Jump { label } => out.push(Op::Jmp { label: label.clone() }),
        IROp::BranchIfZero { cond, label } => out.push(Op::Jz { cond: cond.clone(), label: label.clone() }),
        IROp::Move { dest, src } => out.push(Op::Mov { dest: dest.clone(), src: src.clone() }),
        IROp::BinaryOp { dest, op, lhs, rhs } => out.push(Op::Bin {
            op: *op,
            dest: dest.clone(),
            lhs: lhs.clone(),
            rhs: rhs.clone(),
        }),
        IROp::Call { dest, name, args } => {
            for (i, arg) in args.iter().enumerate() {
                out.push(Op::Mov { dest: arg_slot(i), src: arg.clone() });
            }
            out.push(Op::Call { name: name.clone(), argc: args.len() });
            if let Some(dest) = dest {
                out.push(Op::Mov { dest: dest.clone(), src: Operand::Name(RET_SLOT.to_string()) });
            }
        }
        IROp::Return { value } => out.push(Op::Ret { value: value.clone() }),
        IROp::Print { value } => out.push(Op::Print { value: value.clone() }),
    }
}

pub fn emit_machine_code(module: &IrModule) -> MachineCode {
    let mut ops = Vec::with_capacity(module.len() + 1);
    for op in module.get_ops() {
        emit_op(op, &mut ops);
    }
    if module.declares_function(ENTRY_FUNCTION) {
        ops.push(Op::Call { name: ENTRY_FUNCTION.to_string(), argc: 0 });
    }
    log::debug!("generated {} machine instructions from {} IR ops", ops.len(), module.len());
    MachineCode::new(ops)
}
