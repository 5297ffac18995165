use std::collections::HashSet;

use super::err::SemanticError;
use super::expr::analyze_expression;
use super::table::{FunctionSymbol, SymbolTable};
use crate::ast::{AstNode, AstNodeKind};
use crate::error::{Level, MinicErrorExt};

fn diag(tbl: &mut SymbolTable, message: String, issuer: &str, node: &AstNode) {
    tbl.push_diagnostic(
        SemanticError::with(
            Level::Error,
            message,
            issuer.to_string(),
            node.location.clone(),
            node.span.clone(),
        )
        .into(),
    );
}

/// Check a whole program. Only a non-`Program` root is fatal; every other
/// problem is recorded in the table so all of them can be reported at once.
pub(crate) fn analyze_program(node: &AstNode, tbl: &mut SymbolTable) -> Result<(), Box<dyn MinicErrorExt>> {
    let items = match &node.kind {
        AstNodeKind::Program { items } => items,
        other => {
            return Err(SemanticError::with(
                Level::Error,
                format!("Expected a Program node, found {}.", other),
                "minic.analyzers.semantic.stmt.analyze_program".to_string(),
                node.location.clone(),
                node.span.clone(),
            )
            .into());
        }
    };

    // Functions are visible from anywhere in the program, before or after
    // their definition.
    for item in items {
        if let AstNodeKind::FuncDef { name, params, .. } = &item.kind {
            let symbol = FunctionSymbol {
                name: name.clone(),
                params: params.clone(),
                location: item.location.clone(),
                span: item.span.clone(),
            };
            if let Some(previous) = tbl.insert_function(symbol) {
                let first = previous
                    .location
                    .map(|l| format!(" (first defined at {})", l))
                    .unwrap_or_default();
                diag(
                    tbl,
                    format!("Function '{}' is defined more than once{}.", name, first),
                    "minic.analyzers.semantic.stmt.duplicate_function",
                    item,
                );
            }
        }
    }

    let top_level: Vec<&AstNode> = items
        .iter()
        .filter(|item| !matches!(item.kind, AstNodeKind::FuncDef { .. }))
        .collect();

    let mut globals = HashSet::new();
    for stmt in &top_level {
        collect_assigned(stmt, &mut globals);
    }
    tbl.define_variables(globals);

    for item in items {
        match &item.kind {
            AstNodeKind::FuncDef { params, body, .. } => analyze_function(item, params, body, tbl),
            _ => analyze_statement(item, tbl),
        }
    }

    if top_level.is_empty() && tbl.lookup_function("main").is_none() {
        diag(
            tbl,
            "Program has no entry point: add top-level statements or a 'main' function.".to_string(),
            "minic.analyzers.semantic.stmt.missing_entry_point",
            node,
        );
    }

    Ok(())
}

fn analyze_function(node: &AstNode, params: &[String], body: &AstNode, tbl: &mut SymbolTable) {
    let mut seen = HashSet::new();
    for param in params {
        if !seen.insert(param.clone()) {
            diag(
                tbl,
                format!("Parameter '{}' is declared more than once.", param),
                "minic.analyzers.semantic.stmt.duplicate_parameter",
                node,
            );
        }
    }

    let mut locals = seen;
    collect_assigned(body, &mut locals);
    tbl.enter_scope(locals);
    analyze_statement(body, tbl);
    tbl.exit_scope();
}

pub(crate) fn analyze_statement(node: &AstNode, tbl: &mut SymbolTable) {
    match &node.kind {
        AstNodeKind::Block { statements } => {
            for stmt in statements {
                analyze_statement(stmt, tbl);
            }
        }
        AstNodeKind::Assign { value, .. } => analyze_expression(value, tbl),
        AstNodeKind::If { condition, then_branch, else_branch } => {
            analyze_expression(condition, tbl);
            analyze_statement(then_branch, tbl);
            if let Some(else_branch) = else_branch {
                analyze_statement(else_branch, tbl);
            }
        }
        AstNodeKind::While { condition, body } => {
            analyze_expression(condition, tbl);
            analyze_statement(body, tbl);
        }
        AstNodeKind::Return { value } => {
            if let Some(value) = value {
                analyze_expression(value, tbl);
            }
        }
        AstNodeKind::Print { value } => analyze_expression(value, tbl),
        AstNodeKind::Call { .. } => analyze_expression(node, tbl),
        AstNodeKind::FuncDef { name, .. } => diag(
            tbl,
            format!("Function '{}' must be defined at the top level.", name),
            "minic.analyzers.semantic.stmt.nested_function",
            node,
        ),
        AstNodeKind::Program { .. } => diag(
            tbl,
            "A program cannot be nested inside another program.".to_string(),
            "minic.analyzers.semantic.stmt.nested_program",
            node,
        ),
        AstNodeKind::BinaryOp { .. } | AstNodeKind::Identifier { .. } | AstNodeKind::Integer { .. } => diag(
            tbl,
            format!("{} cannot be used as a statement.", node.kind),
            "minic.analyzers.semantic.stmt.expression_statement",
            node,
        ),
    }
}

/// Names assigned anywhere in `node`, without descending into functions.
fn collect_assigned(node: &AstNode, names: &mut HashSet<String>) {
    match &node.kind {
        AstNodeKind::Assign { target, .. } => {
            names.insert(target.clone());
        }
        AstNodeKind::Block { statements } => {
            for stmt in statements {
                collect_assigned(stmt, names);
            }
        }
        AstNodeKind::If { then_branch, else_branch, .. } => {
            collect_assigned(then_branch, names);
            if let Some(else_branch) = else_branch {
                collect_assigned(else_branch, names);
            }
        }
        AstNodeKind::While { body, .. } => collect_assigned(body, names),
        _ => {}
    }
}
