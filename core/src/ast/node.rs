use crate::location;

use super::kind::{AstNodeKind, BinaryOperator};

#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: AstNodeKind,
    pub location: Option<location::Location>,
    pub span: Option<location::Span>,
}

impl AstNode {
    pub fn new(
        kind: AstNodeKind,
        location: Option<location::Location>,
        span: Option<location::Span>,
    ) -> Self {
        AstNode { kind, location, span }
    }

    /// Node without source metadata, used by hosts that build trees directly.
    pub fn bare(kind: AstNodeKind) -> Self {
        AstNode::new(kind, None, None)
    }

    pub fn with_location(mut self, location: location::Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_span(mut self, span: location::Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn get_kind(&self) -> &AstNodeKind {
        &self.kind
    }
    pub fn get_location(&self) -> Option<&location::Location> {
        self.location.as_ref()
    }
    pub fn get_span(&self) -> Option<&location::Span> {
        self.span.as_ref()
    }

    pub fn program(items: Vec<AstNode>) -> Self {
        AstNode::bare(AstNodeKind::Program { items })
    }

    pub fn func_def(name: &str, params: &[&str], body: AstNode) -> Self {
        AstNode::bare(AstNodeKind::FuncDef {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Box::new(body),
        })
    }

    pub fn block(statements: Vec<AstNode>) -> Self {
        AstNode::bare(AstNodeKind::Block { statements })
    }

    pub fn assign(target: &str, value: AstNode) -> Self {
        AstNode::bare(AstNodeKind::Assign { target: target.to_string(), value: Box::new(value) })
    }

    pub fn if_else(condition: AstNode, then_branch: AstNode, else_branch: Option<AstNode>) -> Self {
        AstNode::bare(AstNodeKind::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        })
    }

    pub fn while_loop(condition: AstNode, body: AstNode) -> Self {
        AstNode::bare(AstNodeKind::While { condition: Box::new(condition), body: Box::new(body) })
    }

    pub fn ret(value: Option<AstNode>) -> Self {
        AstNode::bare(AstNodeKind::Return { value: value.map(Box::new) })
    }

    pub fn print(value: AstNode) -> Self {
        AstNode::bare(AstNodeKind::Print { value: Box::new(value) })
    }

    pub fn call(name: &str, args: Vec<AstNode>) -> Self {
        AstNode::bare(AstNodeKind::Call { name: name.to_string(), args })
    }

    pub fn binary(op: BinaryOperator, left: AstNode, right: AstNode) -> Self {
        AstNode::bare(AstNodeKind::BinaryOp { op, left: Box::new(left), right: Box::new(right) })
    }

    pub fn ident(name: &str) -> Self {
        AstNode::bare(AstNodeKind::Identifier { name: name.to_string() })
    }

    pub fn int(value: i64) -> Self {
        AstNode::bare(AstNodeKind::Integer { value })
    }
}

use std::fmt;

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn fmt_node(f: &mut fmt::Formatter<'_>, node: &AstNode, indent: usize) -> fmt::Result {
            for _ in 0..indent {
                write!(f, "  ")?;
            }
            match &node.kind {
                AstNodeKind::FuncDef { name, params, .. } => {
                    write!(f, "FuncDef {}({})", name, params.join(", "))?
                }
                AstNodeKind::Assign { target, .. } => write!(f, "Assign {}", target)?,
                AstNodeKind::Call { name, .. } => write!(f, "Call {}", name)?,
                AstNodeKind::BinaryOp { op, .. } => write!(f, "BinaryOp {}", op)?,
                AstNodeKind::Identifier { name } => write!(f, "Identifier {}", name)?,
                AstNodeKind::Integer { value } => write!(f, "Integer {}", value)?,
                other => write!(f, "{}", other)?,
            }
            if let Some(loc) = &node.location {
                write!(f, " @ {}:{}", loc.line, loc.column)?;
            }
            writeln!(f)?;

            let children: Vec<&AstNode> = match &node.kind {
                AstNodeKind::Program { items } => items.iter().collect(),
                AstNodeKind::FuncDef { body, .. } => vec![body],
                AstNodeKind::Block { statements } => statements.iter().collect(),
                AstNodeKind::Assign { value, .. } => vec![value],
                AstNodeKind::If { condition, then_branch, else_branch } => {
                    let mut c = vec![condition.as_ref(), then_branch.as_ref()];
                    if let Some(e) = else_branch {
                        c.push(e);
                    }
                    c
                }
                AstNodeKind::While { condition, body } => vec![condition, body],
                AstNodeKind::Return { value } => value.iter().map(|v| v.as_ref()).collect(),
                AstNodeKind::Print { value } => vec![value],
                AstNodeKind::Call { args, .. } => args.iter().collect(),
                AstNodeKind::BinaryOp { left, right, .. } => vec![left, right],
                AstNodeKind::Identifier { .. } | AstNodeKind::Integer { .. } => Vec::new(),
            };
            for child in children {
                fmt_node(f, child, indent + 1)?;
            }
            Ok(())
        }

        fmt_node(f, self, 0)
    }
}
