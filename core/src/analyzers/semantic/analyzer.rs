use crate::analyzers::output::{AnalyzerOutput, FunctionInfo};
use crate::analyzers::semantic::stmt as stmt_mod;
use crate::analyzers::semantic::table::SymbolTable;
use crate::ast::{AstNode, AstNodeKind};
use crate::error::MinicErrorExt;

pub struct Analyzer {
    tbl: SymbolTable,
}

impl Analyzer {
    pub fn new() -> Self {
        Analyzer { tbl: SymbolTable::new() }
    }

    pub fn analyze(&mut self, node: &AstNode) -> Result<(), Box<dyn MinicErrorExt>> {
        stmt_mod::analyze_program(node, &mut self.tbl)
    }

    /// Return the diagnostics collected during analysis.
    pub fn take_diagnostics(&mut self) -> Vec<Box<dyn MinicErrorExt>> {
        self.tbl.take_diagnostics()
    }

    /// Summarize the checked program for later stages.
    pub fn output(&self, node: &AstNode) -> AnalyzerOutput {
        let mut output = AnalyzerOutput::new();
        output.functions = self
            .tbl
            .functions_in_order()
            .into_iter()
            .map(|f| FunctionInfo {
                name: f.name.clone(),
                params: f.params.clone(),
                location: f.location.clone(),
            })
            .collect();
        output.has_main = self.tbl.lookup_function("main").is_some();
        if let AstNodeKind::Program { items } = &node.kind {
            output.top_level_statements = items
                .iter()
                .filter(|item| !matches!(item.kind, AstNodeKind::FuncDef { .. }))
                .count();
        }
        output
    }
}
