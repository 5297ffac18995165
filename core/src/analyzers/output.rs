//! Analyzer output types.
//!
//! `AnalyzerOutput` carries what the semantic pass learned about a program
//! to the pipeline driver and tooling.

use crate::location::Location;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzerOutput {
    /// Functions in declaration order.
    pub functions: Vec<FunctionInfo>,
    pub has_main: bool,
    pub top_level_statements: usize,
}

impl AnalyzerOutput {
    pub fn new() -> Self {
        AnalyzerOutput::default()
    }

    pub fn function(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: String,
    pub params: Vec<String>,
    pub location: Option<Location>,
}
