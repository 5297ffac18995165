mod disassembler;
mod logger;
mod output;

use std::fs;
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use minic_core::location::{Location, Span};
use minic_core::vm::LoadError;
use minic_core::{
    CompileOptions, Compilation, ExecResult, Level, MachineCode, MinicErrorExt, Script, Stage, VM, VmConfig, ast,
    compile_source_with_progress,
};
use output::{OutputHandler, RunReport, StageProgress};

/// Dump stages in pipeline order; `all` prints each of them.
const DUMP_STAGES: [&str; 6] = ["tokens", "ast", "symbols", "ir", "opt", "asm"];

type Diagnostics = Vec<Box<dyn MinicErrorExt>>;

fn main() {
    let cli = Command::new("minic")
        .version("0.1.0")
        .about("Compile and run minic programs on the register VM")
        .arg(
            Arg::new("verbose")
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true),
        );

    let matches = setup_cli(cli).get_matches();

    let trace = matches.subcommand().is_some_and(|(_, sub_m)| flag(sub_m, "trace"));
    let env_level = std::env::var(logger::LOG_ENV).ok();
    logger::init(logger::resolve_level(matches.get_count("verbose"), env_level.as_deref(), trace));

    if let Err(errors) = dispatch_commands(&matches) {
        let mut err = OutputHandler::new(std::io::stderr());
        let _ = err.diagnostics(&errors);
        std::process::exit(1);
    }
}

fn file_arg(help: &'static str) -> Arg {
    Arg::new("file").help(help).required(true).index(1).value_parser(clap::value_parser!(PathBuf))
}

fn dump_arg() -> Arg {
    Arg::new("dump")
        .help("Print an intermediate stage")
        .short('d')
        .long("dump")
        .value_parser(["tokens", "ast", "symbols", "ir", "opt", "asm", "all"])
        .value_name("STAGE")
}

fn no_opt_arg() -> Arg {
    Arg::new("no-opt").help("Skip the optimizer").long("no-opt").action(ArgAction::SetTrue)
}

fn exec_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("max-steps")
            .help("Step budget (overrides MINIC_MAX_STEPS)")
            .long("max-steps")
            .value_parser(clap::value_parser!(usize))
            .value_name("N"),
    )
    .arg(Arg::new("trace").help("Log every executed instruction").long("trace").action(ArgAction::SetTrue))
    .arg(Arg::new("json").help("Print the run report as JSON").long("json").action(ArgAction::SetTrue))
}

/// Sets up the `build`, `run` and `exec` subcommands.
fn setup_cli(cli: Command) -> Command {
    cli.subcommand_required(true)
        .subcommand(
            Command::new("build")
                .about("Compile a source file to machine code")
                .arg(file_arg("The source file to compile"))
                .arg(
                    Arg::new("output")
                        .help("Write machine code to FILE instead of stdout")
                        .short('o')
                        .long("output")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_name("FILE"),
                )
                .arg(dump_arg())
                .arg(no_opt_arg()),
        )
        .subcommand(exec_args(
            Command::new("run")
                .about("Compile and execute a source file")
                .arg(file_arg("The source file to run"))
                .arg(dump_arg())
                .arg(no_opt_arg()),
        ))
        .subcommand(exec_args(
            Command::new("exec")
                .about("Execute a machine code text file")
                .arg(file_arg("The machine code file to execute")),
        ))
}

fn flag(matches: &ArgMatches, id: &str) -> bool {
    matches.try_get_one::<bool>(id).ok().flatten().copied().unwrap_or(false)
}

/// Flag > `MINIC_MAX_STEPS` > default.
fn vm_config(matches: &ArgMatches) -> VmConfig {
    let mut config = VmConfig::from_env();
    if let Some(n) = matches.get_one::<usize>("max-steps") {
        config.max_steps = *n;
    }
    config.trace = flag(matches, "trace");
    config
}

fn dispatch_commands(matches: &ArgMatches) -> Result<(), Diagnostics> {
    match matches.subcommand() {
        Some(("build", sub_m)) => build(sub_m),
        Some(("run", sub_m)) => run(sub_m),
        Some(("exec", sub_m)) => exec(sub_m),
        _ => Err(vec![CliError::new("No valid subcommand was used. Use --help for more information.").into()]),
    }
}

fn load_script(matches: &ArgMatches) -> Result<Script, Diagnostics> {
    let path = matches.get_one::<PathBuf>("file").cloned().unwrap_or_default();
    Script::new(path).map_err(|e| vec![e.into()])
}

fn compile(matches: &ArgMatches, script: &Script) -> Result<Compilation, Diagnostics> {
    let options = CompileOptions { optimize: !flag(matches, "no-opt") };
    let progress = StageProgress::new(Stage::ALL.len() as u64);
    let result = compile_source_with_progress(script, &options, |stage| progress.stage(stage.name()));
    progress.finish();
    result
}

fn dump_stages(matches: &ArgMatches, script: &Script, compilation: &Compilation) -> Result<(), Diagnostics> {
    match matches.get_one::<String>("dump").map(String::as_str) {
        None => Ok(()),
        Some("all") => DUMP_STAGES.iter().try_for_each(|stage| dump_stage(stage, script, compilation)),
        Some(stage) => dump_stage(stage, script, compilation),
    }
}

fn dump_stage(stage: &str, script: &Script, compilation: &Compilation) -> Result<(), Diagnostics> {
    let mut out = OutputHandler::new(std::io::stdout());
    let text = match stage {
        "tokens" => ast::tokenize(script)
            .map_err(|e| vec![e])?
            .iter()
            .map(|token| format!("{}\n", token))
            .collect(),
        "ast" => compilation.ast.to_string(),
        "symbols" => format!(
            "{}\nmain: {}, top-level statements: {}\n",
            output::symbol_table(&compilation.analysis),
            if compilation.analysis.has_main { "yes" } else { "no" },
            compilation.analysis.top_level_statements
        ),
        "ir" => format!("{}\n", compilation.backend.ir),
        "opt" => match &compilation.backend.optimized_ir {
            Some(ir) => format!("{}\n", ir),
            None => {
                out.warning("optimizer disabled; showing lowered IR").map_err(io_error)?;
                format!("{}\n", compilation.backend.ir)
            }
        },
        _ => disassembler::disassemble(compilation.machine_code(), console::colors_enabled()),
    };
    out.title(stage).map_err(io_error)?;
    out.raw(&text).map_err(io_error)
}

fn build(matches: &ArgMatches) -> Result<(), Diagnostics> {
    let script = load_script(matches)?;
    let compilation = compile(matches, &script)?;
    dump_stages(matches, &script, &compilation)?;

    let text = compilation.machine_code().to_string();
    match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            fs::write(path, &text).map_err(io_error)?;
            let message = format!("wrote {} instructions to {}", compilation.machine_code().len(), path.display());
            OutputHandler::new(std::io::stderr()).success(&message).map_err(io_error)?;
        }
        None if matches.get_one::<String>("dump").is_none() => {
            OutputHandler::new(std::io::stdout()).raw(&text).map_err(io_error)?;
        }
        None => {}
    }
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), Diagnostics> {
    let script = load_script(matches)?;
    let compilation = compile(matches, &script)?;
    dump_stages(matches, &script, &compilation)?;

    let config = vm_config(matches);
    let result = VM::new(compilation.machine_code().clone())
        .with_config(config)
        .run()
        .map_err(|e| vec![e.into()])?;
    report(matches, &script.name, compilation.backend.optimized_ir.is_some(), config, &result)
}

fn exec(matches: &ArgMatches) -> Result<(), Diagnostics> {
    let path = matches.get_one::<PathBuf>("file").cloned().unwrap_or_default();
    let text = fs::read_to_string(&path).map_err(io_error)?;
    let code = MachineCode::from_text(&text).map_err(|e: LoadError| vec![e.into()])?;
    log::debug!("loaded {} instructions from {}", code.len(), path.display());

    let config = vm_config(matches);
    let result = VM::new(code).with_config(config).run().map_err(|e| vec![e.into()])?;
    report(matches, &path.display().to_string(), false, config, &result)
}

fn report(matches: &ArgMatches, program: &str, optimized: bool, config: VmConfig, result: &ExecResult) -> Result<(), Diagnostics> {
    let mut out = OutputHandler::new(std::io::stdout());
    if flag(matches, "json") {
        let report = RunReport { program, optimized, max_steps: config.max_steps, return_value: result.return_value(), result };
        let json = report.to_json().map_err(|e| vec![CliError::new(&e.to_string()).into()])?;
        out.raw(&format!("{}\n", json)).map_err(io_error)?;
    } else {
        out.exec_result(result).map_err(io_error)?;
    }
    out.flush().map_err(io_error)
}

fn io_error(err: std::io::Error) -> Diagnostics {
    vec![CliError::new(&err.to_string()).into()]
}

/// Failures that belong to the driver rather than to a compiler stage.
#[derive(Debug, Clone)]
struct CliError {
    message: String,
}

impl CliError {
    fn new(message: &str) -> Self {
        CliError { message: message.to_string() }
    }
}

impl MinicErrorExt for CliError {
    fn level(&self) -> Level {
        Level::Error
    }
    fn message(&self) -> String {
        self.message.clone()
    }
    fn issuer(&self) -> String {
        "minic.cli".to_string()
    }
    fn span(&self) -> Option<Span> {
        None
    }
    fn location(&self) -> Option<Location> {
        None
    }
}

impl From<CliError> for Box<dyn MinicErrorExt> {
    fn from(err: CliError) -> Self {
        Box::new(err)
    }
}
