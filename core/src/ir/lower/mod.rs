pub mod err;
pub mod lower_expr;
pub mod lower_stmt;
pub mod lowering_context;

pub use err::LoweringError;
pub use lowering_context::{ARG_PREFIX, FUNC_LABEL_PREFIX, RET_SLOT, TEMP_PREFIX, arg_slot, function_label};

use crate::ast::{AstNode, AstNodeKind};
use crate::ir::module::IrModule;
use crate::ir::op::IROp;
use lowering_context::LoweringContext;

/// Lower a `Program` or a single `FuncDef` into IR.
///
/// Inside a program each function is bracketed by `Jump(L_skip_n)` and
/// `Label(L_skip_n)`, so top-level code that runs into a definition steps
/// over it; bodies are only entered through `CALL`.
pub fn lower_ast_to_ir(ast: &AstNode) -> Result<IrModule, LoweringError> {
    let mut ctx = LoweringContext::new();
    match ast.get_kind() {
        AstNodeKind::Program { items } => {
            for item in items {
                if let AstNodeKind::FuncDef { .. } = item.get_kind() {
                    let skip = ctx.new_label("L_skip");
                    ctx.emit(IROp::Jump { label: skip.clone() });
                    lower_stmt::lower_function(item, &mut ctx)?;
                    ctx.emit(IROp::Label { name: skip });
                } else {
                    lower_stmt::lower_statement(item, &mut ctx)?;
                }
            }
        }
        AstNodeKind::FuncDef { .. } => lower_stmt::lower_function(ast, &mut ctx)?,
        _ => {
            return Err(LoweringError::new(ast, "as a lowering root", "minic.ir.lower.lower_ast_to_ir"));
        }
    }
    Ok(ctx.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOperator;
    use crate::ir::value::Operand;

    fn name(n: &str) -> Operand {
        Operand::name(n)
    }

    #[test]
    fn function_lowering_shape() {
        let func = AstNode::func_def(
            "add",
            &["a", "b"],
            AstNode::block(vec![AstNode::ret(Some(AstNode::binary(
                BinaryOperator::Add,
                AstNode::ident("a"),
                AstNode::ident("b"),
            )))]),
        );
        let ir = lower_ast_to_ir(&func).expect("lower");
        assert_eq!(
            ir.ops,
            vec![
                IROp::FuncMarker { name: "add".into(), params: vec!["a".into(), "b".into()] },
                IROp::Label { name: "FUNC_add".into() },
                IROp::Move { dest: "a".into(), src: name("_arg0") },
                IROp::Move { dest: "b".into(), src: name("_arg1") },
                IROp::BinaryOp { dest: "_t0".into(), op: BinaryOperator::Add, lhs: name("a"), rhs: name("b") },
                IROp::Return { value: name("_t0") },
                IROp::Return { value: Operand::Int(0) },
            ]
        );
    }

    #[test]
    fn if_else_shape() {
        let program = AstNode::program(vec![AstNode::if_else(
            AstNode::ident("c"),
            AstNode::assign("x", AstNode::int(1)),
            Some(AstNode::assign("x", AstNode::int(2))),
        )]);
        let ir = lower_ast_to_ir(&program).expect("lower");
        assert_eq!(
            ir.ops,
            vec![
                IROp::BranchIfZero { cond: name("c"), label: "L_else_0".into() },
                IROp::Move { dest: "x".into(), src: Operand::Int(1) },
                IROp::Jump { label: "L_end_1".into() },
                IROp::Label { name: "L_else_0".into() },
                IROp::Move { dest: "x".into(), src: Operand::Int(2) },
                IROp::Label { name: "L_end_1".into() },
            ]
        );
    }

    #[test]
    fn while_shape() {
        let program = AstNode::program(vec![AstNode::while_loop(
            AstNode::binary(BinaryOperator::Lt, AstNode::ident("i"), AstNode::int(3)),
            AstNode::assign("i", AstNode::binary(BinaryOperator::Add, AstNode::ident("i"), AstNode::int(1))),
        )]);
        let ir = lower_ast_to_ir(&program).expect("lower");
        assert_eq!(
            ir.ops,
            vec![
                IROp::Label { name: "L_cond_0".into() },
                IROp::BinaryOp { dest: "_t0".into(), op: BinaryOperator::Lt, lhs: name("i"), rhs: Operand::Int(3) },
                IROp::BranchIfZero { cond: name("_t0"), label: "L_end_1".into() },
                IROp::BinaryOp { dest: "_t1".into(), op: BinaryOperator::Add, lhs: name("i"), rhs: Operand::Int(1) },
                IROp::Move { dest: "i".into(), src: name("_t1") },
                IROp::Jump { label: "L_cond_0".into() },
                IROp::Label { name: "L_end_1".into() },
            ]
        );
    }

    #[test]
    fn program_functions_are_skipped_by_fallthrough() {
        let program = AstNode::program(vec![
            AstNode::func_def("f", &[], AstNode::block(vec![])),
            AstNode::call("f", vec![]),
        ]);
        let ir = lower_ast_to_ir(&program).expect("lower");
        assert_eq!(ir.ops.first(), Some(&IROp::Jump { label: "L_skip_0".into() }));
        assert_eq!(ir.ops[4], IROp::Label { name: "L_skip_0".into() });
        assert_eq!(ir.ops[5], IROp::Call { dest: None, name: "f".into(), args: vec![] });
    }

    #[test]
    fn bare_return_yields_zero() {
        let program = AstNode::program(vec![AstNode::ret(None)]);
        let ir = lower_ast_to_ir(&program).expect("lower");
        assert_eq!(ir.ops, vec![IROp::Return { value: Operand::Int(0) }]);
    }

    #[test]
    fn misplaced_nodes_abort() {
        let nested = AstNode::func_def(
            "outer",
            &[],
            AstNode::block(vec![AstNode::func_def("inner", &[], AstNode::block(vec![]))]),
        );
        let err = lower_ast_to_ir(&nested).unwrap_err();
        assert_eq!(err.node_kind, "FuncDef");
        // rejected by the statement lowerer, whatever the nesting depth
        assert!(err.to_string().contains("inside another block"), "{}", err);

        let expr_stmt = AstNode::program(vec![AstNode::int(4)]);
        assert_eq!(lower_ast_to_ir(&expr_stmt).unwrap_err().node_kind, "Integer");

        let stmt_expr = AstNode::program(vec![AstNode::assign("x", AstNode::block(vec![]))]);
        assert_eq!(lower_ast_to_ir(&stmt_expr).unwrap_err().node_kind, "Block");

        assert!(lower_ast_to_ir(&AstNode::ident("x")).is_err());
    }
}
