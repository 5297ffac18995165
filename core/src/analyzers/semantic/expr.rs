use super::err::SemanticError;
use super::table::SymbolTable;
use crate::ast::{AstNode, AstNodeKind};
use crate::error::Level;

pub(crate) fn analyze_expression(node: &AstNode, tbl: &mut SymbolTable) {
    match &node.kind {
        AstNodeKind::Integer { .. } => {}
        AstNodeKind::Identifier { name } => {
            if !tbl.variable_exists(name) {
                let where_ = if tbl.is_global_scope() { "at the top level" } else { "in this function" };
                report(
                    tbl,
                    format!("Variable '{}' is read but never assigned {}.", name, where_),
                    "minic.analyzers.semantic.expr.undeclared_variable",
                    node,
                );
            }
        }
        AstNodeKind::BinaryOp { left, right, .. } => {
            analyze_expression(left, tbl);
            analyze_expression(right, tbl);
        }
        AstNodeKind::Call { name, args } => {
            match tbl.lookup_function(name).map(|f| f.arity()) {
                None => report(
                    tbl,
                    format!("Call to undefined function '{}'.", name),
                    "minic.analyzers.semantic.expr.unknown_function",
                    node,
                ),
                Some(arity) if arity != args.len() => report(
                    tbl,
                    format!(
                        "Function '{}' expects {} argument(s) but {} were given.",
                        name,
                        arity,
                        args.len()
                    ),
                    "minic.analyzers.semantic.expr.arity_mismatch",
                    node,
                ),
                Some(_) => {}
            }
            for arg in args {
                analyze_expression(arg, tbl);
            }
        }
        other => {
            let message = format!("{} cannot be used as an expression.", other);
            report(tbl, message, "minic.analyzers.semantic.expr.statement_in_expression", node);
        }
    }
}

fn report(tbl: &mut SymbolTable, message: String, issuer: &str, node: &AstNode) {
    tbl.push_diagnostic(
        SemanticError::with(Level::Error, message, issuer.to_string(), node.location.clone(), node.span.clone())
            .into(),
    );
}
