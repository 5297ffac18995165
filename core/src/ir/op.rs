use super::value::Operand;
use crate::ast::BinaryOperator;

/// Three-address IR instruction. Sequence order is execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IROp {
    /// Declares a function and its arity; never executes.
    FuncMarker { name: String, params: Vec<String> },
    Label { name: String },
    Jump { label: String },
    BranchIfZero { cond: Operand, label: String },
    Move { dest: String, src: Operand },
    BinaryOp { dest: String, op: BinaryOperator, lhs: Operand, rhs: Operand },
    Call { dest: Option<String>, name: String, args: Vec<Operand> },
    Return { value: Operand },
    Print { value: Operand },
}

impl IROp {
    /// The name this instruction writes, if any.
    pub fn dest(&self) -> Option<&str> {
        match self {
            IROp::Move { dest, .. } | IROp::BinaryOp { dest, .. } => Some(dest),
            IROp::Call { dest: Some(dest), .. } => Some(dest),
            _ => None,
        }
    }

    /// The label this instruction may transfer control to, if any.
    pub fn jump_target(&self) -> Option<&str> {
        match self {
            IROp::Jump { label } | IROp::BranchIfZero { label, .. } => Some(label),
            _ => None,
        }
    }
}

/// Floor division; a zero divisor yields 0.
pub fn floor_div(a: i64, b: i64) -> i64 {
    if b == 0 {
        return 0;
    }
    let q = a.wrapping_div(b);
    let r = a.wrapping_rem(b);
    if r != 0 && ((r < 0) != (b < 0)) { q.wrapping_sub(1) } else { q }
}

/// Evaluate a binary operator over two integers.
///
/// Shared by the optimizer's constant folding and the VM so both agree on
/// every input: arithmetic wraps on overflow, division floors, and relational
/// operators produce 1 or 0.
pub fn evaluate(op: BinaryOperator, a: i64, b: i64) -> i64 {
    match op {
        BinaryOperator::Add => a.wrapping_add(b),
        BinaryOperator::Sub => a.wrapping_sub(b),
        BinaryOperator::Mul => a.wrapping_mul(b),
        BinaryOperator::Div => floor_div(a, b),
        BinaryOperator::Lt => (a < b) as i64,
        BinaryOperator::Le => (a <= b) as i64,
        BinaryOperator::Gt => (a > b) as i64,
        BinaryOperator::Ge => (a >= b) as i64,
        BinaryOperator::Eq => (a == b) as i64,
        BinaryOperator::Ne => (a != b) as i64,
    }
}

fn join(args: &[Operand]) -> String {
    args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ")
}

impl std::fmt::Display for IROp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IROp::FuncMarker { name, params } => write!(f, "FUNC {}({})", name, params.join(", ")),
            IROp::Label { name } => write!(f, "LABEL {}", name),
            IROp::Jump { label } => write!(f, "JMP {}", label),
            IROp::BranchIfZero { cond, label } => write!(f, "CJZ {}, {}", cond, label),
            IROp::Move { dest, src } => write!(f, "{} = {}", dest, src),
            IROp::BinaryOp { dest, op, lhs, rhs } => write!(f, "{} = {} {} {}", dest, lhs, op, rhs),
            IROp::Call { dest: Some(dest), name, args } => write!(f, "{} = CALL {}({})", dest, name, join(args)),
            IROp::Call { dest: None, name, args } => write!(f, "CALL {}({})", name, join(args)),
            IROp::Return { value } => write!(f, "RET {}", value),
            IROp::Print { value } => write!(f, "PRINT {}", value),
        }
    }
}
