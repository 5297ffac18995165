use std::collections::HashSet;
use std::path::PathBuf;

use minic_core::{AstNode, BinaryOperator, CompileOptions, IROp, Operand, Script, ast, compile_ast, compile_source, lower_ast_to_ir};

fn parse(src: &str) -> AstNode {
    let script = Script { name: "lower.mc".to_string(), path: PathBuf::from("lower.mc"), content: src.to_string() };
    ast::generate_ast_from_source(&script).expect("failed to parse sample")
}

#[test]
fn temporaries_are_single_assignment() {
    let src = "
        func g(a, b) { return a * b + (a - b) / 2; }
        x = 1;
        while (x < 10) {
            if (x == 3) x = x + g(x, 2); else x = x + 1;
            print(g(x, x + 1) - 3);
        }
    ";
    let ir = lower_ast_to_ir(&parse(src)).expect("lower");
    let mut seen = HashSet::new();
    for op in ir.get_ops() {
        if let Some(dest) = op.dest() {
            if dest.starts_with("_t") {
                assert!(seen.insert(dest.to_string()), "temporary {} written twice", dest);
            }
        }
    }
    assert!(seen.len() >= 8);
}

#[test]
fn every_composite_subexpression_gets_one_temporary() {
    let ir = lower_ast_to_ir(&parse("y = (1 + 2) * f(3);\nfunc f(a) { return a; }")).expect("lower");
    let producers: Vec<&IROp> = ir
        .get_ops()
        .iter()
        .filter(|op| op.dest().is_some_and(|d| d.starts_with("_t")))
        .collect();
    assert_eq!(producers.len(), 3);
    assert_eq!(
        producers[0],
        &IROp::BinaryOp { dest: "_t0".into(), op: BinaryOperator::Add, lhs: Operand::Int(1), rhs: Operand::Int(2) }
    );
    assert_eq!(
        producers[1],
        &IROp::Call { dest: Some("_t1".into()), name: "f".into(), args: vec![Operand::Int(3)] }
    );
}

#[test]
fn nested_control_flow_labels_are_distinct() {
    let src = "
        i = 0;
        while (i < 3) {
            if (i == 1) { while (i < 2) i = i + 1; } else { if (i > 5) i = 0; }
            i = i + 1;
        }
        if (i) print(i);
    ";
    let ir = lower_ast_to_ir(&parse(src)).expect("lower");
    let labels = ir.labels();
    let unique: HashSet<&str> = labels.iter().copied().collect();
    assert_eq!(labels.len(), unique.len(), "duplicate labels in {:?}", labels);
    // every jump target exists
    for op in ir.get_ops() {
        if let Some(target) = op.jump_target() {
            assert!(unique.contains(target), "dangling jump to {}", target);
        }
    }
}

#[test]
fn function_ends_with_unconditional_return_zero() {
    let ir = lower_ast_to_ir(&parse("func noop() { x = 1; }\nnoop();")).expect("lower");
    let ops = ir.get_ops();
    let ret_at = ops.iter().position(|op| *op == IROp::Return { value: Operand::Int(0) }).expect("ret 0");
    assert_eq!(ops[ret_at + 1], IROp::Label { name: "L_skip_0".into() });
}

#[test]
fn disabled_optimizer_keeps_lowered_ir() {
    let ast = parse("x = 2 * 3;");
    let plain = compile_ast(&ast, &CompileOptions { optimize: false }).expect("compile");
    assert!(plain.optimized_ir.is_none());
    assert_eq!(plain.final_ir(), &plain.ir);

    let optimized = compile_ast(&ast, &CompileOptions::default()).expect("compile");
    assert_eq!(
        optimized.final_ir().get_ops()[0],
        IROp::Move { dest: "_t0".into(), src: Operand::Int(6) }
    );
}

#[test]
fn ir_listing_is_readable() {
    let compilation = compile_source(
        &Script::from_source("listing.mc", "func f(a) { return a; }\nprint(f(2));"),
        &CompileOptions { optimize: false },
    )
    .expect("compile");
    let listing = compilation.backend.ir.to_string();
    assert!(listing.contains("FUNC f(a)"));
    assert!(listing.contains("LABEL FUNC_f"));
    assert!(listing.contains("a = _arg0"));
    assert!(listing.contains("_t0 = CALL f(2)"));
    assert!(listing.contains("PRINT _t0"));
}

#[test]
fn hand_built_ast_with_misplaced_node_is_a_lowering_error() {
    // an assignment whose value is a statement node
    let bad = AstNode::program(vec![AstNode::assign("x", AstNode::print(AstNode::int(1)))]);
    let err = compile_ast(&bad, &CompileOptions::default()).unwrap_err();
    assert_eq!(err.node_kind, "Print");
    assert!(err.to_string().contains("expression position"));
}
