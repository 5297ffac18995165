pub mod analyzers;
pub mod ast;
pub mod error;
pub mod ir;
pub mod location;
pub mod script;
pub mod vm;

pub use analyzers::{AnalyzerOutput, analyze_semantic_rules};
pub use ast::{AstNode, AstNodeKind, BinaryOperator, RulesParser};
pub use error::{Level, MinicErrorExt};
pub use ir::{IROp, IrModule, LoweringError, Operand, emit_machine_code, lower_ast_to_ir, optimize};
pub use location::{Location, Span};
pub use script::Script;
pub use vm::{ExecResult, MachineCode, Op, RuntimeError, RuntimeErrorKind, VM, VmConfig, run_machine_code, run_text};

/// One-line rendering of a diagnostic.
pub fn generate_error_report<E: MinicErrorExt + ?Sized>(error: &E) -> String {
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    format!("MINIC | {} | {} | {}", error.level(), location, error.message())
}

/// Render several diagnostics, one per line.
pub fn generate_error_reports(errors: &[Box<dyn MinicErrorExt>]) -> String {
    errors
        .iter()
        .map(|e| generate_error_report(e.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Run the optimizer between lowering and code generation.
    pub optimize: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions { optimize: true }
    }
}

/// Artefacts of the backend stages.
#[derive(Debug, Clone)]
pub struct BackendOutput {
    pub ir: IrModule,
    /// `None` when optimization was disabled.
    pub optimized_ir: Option<IrModule>,
    pub machine_code: MachineCode,
}

impl BackendOutput {
    /// The IR that code generation consumed.
    pub fn final_ir(&self) -> &IrModule {
        self.optimized_ir.as_ref().unwrap_or(&self.ir)
    }
}

/// Every artefact of a source compile.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub ast: AstNode,
    pub analysis: AnalyzerOutput,
    pub backend: BackendOutput,
}

impl Compilation {
    pub fn machine_code(&self) -> &MachineCode {
        &self.backend.machine_code
    }
}

/// Pipeline stages in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parse,
    Analyze,
    Lower,
    Optimize,
    Codegen,
}

impl Stage {
    pub const ALL: [Stage; 5] = [Stage::Parse, Stage::Analyze, Stage::Lower, Stage::Optimize, Stage::Codegen];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Parse => "parse",
            Stage::Analyze => "analyze",
            Stage::Lower => "lower",
            Stage::Optimize => "optimize",
            Stage::Codegen => "codegen",
        }
    }
}

fn run_backend(
    ast: &AstNode,
    options: &CompileOptions,
    on_stage: &mut dyn FnMut(Stage),
) -> Result<BackendOutput, LoweringError> {
    on_stage(Stage::Lower);
    let ir = lower_ast_to_ir(ast)?;
    on_stage(Stage::Optimize);
    let optimized_ir = options.optimize.then(|| optimize(&ir));
    on_stage(Stage::Codegen);
    let machine_code = emit_machine_code(optimized_ir.as_ref().unwrap_or(&ir));
    Ok(BackendOutput { ir, optimized_ir, machine_code })
}

/// Lower, optionally optimize, and generate code for an already validated AST.
pub fn compile_ast(ast: &AstNode, options: &CompileOptions) -> Result<BackendOutput, LoweringError> {
    run_backend(ast, options, &mut |_| {})
}

/// Parse, check and compile a script. All semantic diagnostics are returned
/// together; earlier stages fail with a single error.
pub fn compile_source(
    source: &Script,
    options: &CompileOptions,
) -> Result<Compilation, Vec<Box<dyn MinicErrorExt>>> {
    compile_source_with_progress(source, options, |_| {})
}

/// `compile_source`, calling `on_stage` as each stage starts. The optimize
/// stage is reported even when the optimizer is disabled.
pub fn compile_source_with_progress(
    source: &Script,
    options: &CompileOptions,
    mut on_stage: impl FnMut(Stage),
) -> Result<Compilation, Vec<Box<dyn MinicErrorExt>>> {
    on_stage(Stage::Parse);
    let ast = ast::generate_ast_from_source(source).map_err(|e| vec![e])?;
    on_stage(Stage::Analyze);
    let analysis = analyze_semantic_rules(&ast)?;
    let backend = run_backend(&ast, options, &mut on_stage).map_err(|e| vec![Box::<dyn MinicErrorExt>::from(e)])?;
    log::debug!(
        "compiled {}: {} IR ops, {} machine instructions",
        source.name,
        backend.final_ir().len(),
        backend.machine_code.len()
    );
    Ok(Compilation { ast, analysis, backend })
}

/// Compile a script and execute it with `config`.
pub fn compile_and_run(
    source: &Script,
    options: &CompileOptions,
    config: VmConfig,
) -> Result<(Compilation, ExecResult), Vec<Box<dyn MinicErrorExt>>> {
    let compilation = compile_source(source, options)?;
    let result = VM::new(compilation.machine_code().clone())
        .with_config(config)
        .run()
        .map_err(|e| vec![Box::<dyn MinicErrorExt>::from(e)])?;
    Ok((compilation, result))
}
