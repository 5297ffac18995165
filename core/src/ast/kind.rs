//! file: core/src/ast/kind.rs
//! description: AST node kind definitions and the binary operator enum.
//!
//! `AstNodeKind` is the closed set of node shapes the front end produces and
//! the lowerer consumes. `BinaryOperator` is shared by the AST, the IR and the
//! machine instruction set.
//!
use super::node::AstNode;

/// Represents binary operators in the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Lt,  // <
    Le,  // <=
    Gt,  // >
    Ge,  // >=
    Eq,  // ==
    Ne,  // !=
}

impl BinaryOperator {
    pub const ALL: [BinaryOperator; 10] = [
        BinaryOperator::Add,
        BinaryOperator::Sub,
        BinaryOperator::Mul,
        BinaryOperator::Div,
        BinaryOperator::Lt,
        BinaryOperator::Le,
        BinaryOperator::Gt,
        BinaryOperator::Ge,
        BinaryOperator::Eq,
        BinaryOperator::Ne,
    ];

    /// Source-level spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "!=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        BinaryOperator::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    pub fn is_relational(self) -> bool {
        !matches!(
            self,
            BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div
        )
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstNodeKind {
    Program { items: Vec<AstNode> },
    FuncDef { name: String, params: Vec<String>, body: Box<AstNode> },

    Block { statements: Vec<AstNode> },
    Assign { target: String, value: Box<AstNode> },
    If { condition: Box<AstNode>, then_branch: Box<AstNode>, else_branch: Option<Box<AstNode>> },
    While { condition: Box<AstNode>, body: Box<AstNode> },
    Return { value: Option<Box<AstNode>> },
    Print { value: Box<AstNode> },

    Call { name: String, args: Vec<AstNode> },
    BinaryOp { op: BinaryOperator, left: Box<AstNode>, right: Box<AstNode> },
    Identifier { name: String },
    Integer { value: i64 },
}

impl AstNodeKind {
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            AstNodeKind::Call { .. }
                | AstNodeKind::BinaryOp { .. }
                | AstNodeKind::Identifier { .. }
                | AstNodeKind::Integer { .. }
        )
    }
}

use std::fmt;

impl fmt::Display for AstNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNodeKind::Program { .. } => write!(f, "Program"),
            AstNodeKind::FuncDef { .. } => write!(f, "FuncDef"),
            AstNodeKind::Block { .. } => write!(f, "Block"),
            AstNodeKind::Assign { .. } => write!(f, "Assign"),
            AstNodeKind::If { .. } => write!(f, "If"),
            AstNodeKind::While { .. } => write!(f, "While"),
            AstNodeKind::Return { .. } => write!(f, "Return"),
            AstNodeKind::Print { .. } => write!(f, "Print"),
            AstNodeKind::Call { .. } => write!(f, "Call"),
            AstNodeKind::BinaryOp { .. } => write!(f, "BinaryOp"),
            AstNodeKind::Identifier { .. } => write!(f, "Identifier"),
            AstNodeKind::Integer { .. } => write!(f, "Integer"),
        }
    }
}
