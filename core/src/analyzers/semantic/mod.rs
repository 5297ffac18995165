use crate::analyzers::output::AnalyzerOutput;
use crate::ast::AstNode;
use crate::error::MinicErrorExt;

mod analyzer;
pub mod err;
mod expr;
mod stmt;
mod table;

pub use err::SemanticError;

/// Scope-check a parsed program.
///
/// Every problem found is returned, not just the first one.
pub fn analyze_semantic_rules(ast: &AstNode) -> Result<AnalyzerOutput, Vec<Box<dyn MinicErrorExt>>> {
    let mut analyzer = analyzer::Analyzer::new();
    if let Err(fatal) = analyzer.analyze(ast) {
        return Err(vec![fatal]);
    }
    let diagnostics = analyzer.take_diagnostics();
    if !diagnostics.is_empty() {
        log::debug!("semantic analysis produced {} diagnostic(s)", diagnostics.len());
        return Err(diagnostics);
    }
    Ok(analyzer.output(ast))
}
