//! IR optimizer: literal constant folding and dead self-move removal.
mod const_fold;
mod dce;

use crate::ir::module::IrModule;

/// Run the optimizer over `ir`, returning a new module.
///
/// A single forward pass; each instruction is rewritten on its own and the
/// relative order of the survivors never changes. Calls, jumps, labels and
/// branches pass through untouched.
pub fn optimize(ir: &IrModule) -> IrModule {
    let mut out = IrModule::new();
    for op in ir.get_ops() {
        let op = const_fold::fold_constant(op.clone());
        if dce::is_dead_self_move(&op) {
            log::trace!("dropped dead move: {}", op);
            continue;
        }
        out.emit_op(op);
    }
    log::debug!("optimizer: {} -> {} ops", ir.len(), out.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOperator;
    use crate::ir::op::IROp;
    use crate::ir::value::Operand;

    #[test]
    fn rewrites_in_place_and_keeps_order() {
        let ir = IrModule::from_ops(vec![
            IROp::Label { name: "L_cond_0".into() },
            IROp::BinaryOp { dest: "_t0".into(), op: BinaryOperator::Add, lhs: Operand::Int(2), rhs: Operand::Int(3) },
            IROp::Move { dest: "x".into(), src: Operand::name("x") },
            IROp::Move { dest: "y".into(), src: Operand::name("_t0") },
            IROp::Call { dest: None, name: "f".into(), args: vec![Operand::Int(1)] },
        ]);
        let out = optimize(&ir);
        assert_eq!(
            out.ops,
            vec![
                IROp::Label { name: "L_cond_0".into() },
                IROp::Move { dest: "_t0".into(), src: Operand::Int(5) },
                IROp::Move { dest: "y".into(), src: Operand::name("_t0") },
                IROp::Call { dest: None, name: "f".into(), args: vec![Operand::Int(1)] },
            ]
        );
        // the input is untouched
        assert_eq!(ir.len(), 5);
    }

    #[test]
    fn folding_is_not_propagated() {
        // single pass, no substitution of the folded temporary into later uses
        let ir = IrModule::from_ops(vec![
            IROp::BinaryOp { dest: "_t0".into(), op: BinaryOperator::Mul, lhs: Operand::Int(3), rhs: Operand::Int(4) },
            IROp::BinaryOp { dest: "_t1".into(), op: BinaryOperator::Add, lhs: Operand::Int(2), rhs: Operand::name("_t0") },
        ]);
        let out = optimize(&ir);
        assert_eq!(out.ops[1], ir.ops[1]);
        assert_eq!(optimize(&out), out);
    }
}
