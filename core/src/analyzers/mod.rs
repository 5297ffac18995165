pub mod output;
pub mod semantic;

pub use output::{AnalyzerOutput, FunctionInfo};
pub use semantic::analyze_semantic_rules;
