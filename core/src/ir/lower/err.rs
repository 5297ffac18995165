use crate::error::{Level, impl_error_ext};
use crate::location::{Location, Span};

/// Raised when an AST node appears where the lowerer cannot translate it.
#[derive(Debug, Clone)]
pub struct LoweringError {
    /// Display name of the offending node kind.
    pub node_kind: String,
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl LoweringError {
    pub fn new(node: &crate::ast::AstNode, context: &str, issuer: &str) -> Self {
        LoweringError {
            node_kind: node.kind.to_string(),
            level: Level::Error,
            message: format!("Cannot lower {} node {}.", node.kind, context),
            issuer: issuer.to_string(),
            location: node.location.clone(),
            span: node.span.clone(),
        }
    }
}

impl std::fmt::Display for LoweringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} (at {})", self.message, loc),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for LoweringError {}

impl_error_ext!(LoweringError);
