//! Terminal output for the CLI: styled messages, the register table, the
//! JSON run report and the pipeline progress bar.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Duration;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use console::Style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use minic_core::{AnalyzerOutput, ExecResult, MinicErrorExt, generate_error_report};
use serde::Serialize;

/// Styles for the different kinds of message.
pub struct FormatStyle {
    pub title: Style,
    pub info: Style,
    pub warning: Style,
    pub error: Style,
    pub success: Style,
}

impl Default for FormatStyle {
    fn default() -> Self {
        FormatStyle {
            title: Style::new().bold().underlined(),
            info: Style::new().cyan(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            success: Style::new().green().bold(),
        }
    }
}

/// Writes styled lines into any `Write`.
pub struct OutputHandler<T: Write> {
    out: T,
    formatting: FormatStyle,
}

impl<T: Write> OutputHandler<T> {
    pub fn new(out: T) -> Self {
        OutputHandler { out, formatting: FormatStyle::default() }
    }

    fn line(&mut self, text: &str, style: &Style) -> io::Result<()> {
        writeln!(self.out, "{}", style.apply_to(text))
    }

    pub fn title(&mut self, text: &str) -> io::Result<()> {
        let style = self.formatting.title.clone();
        self.line(text, &style)
    }
    pub fn info(&mut self, text: &str) -> io::Result<()> {
        let style = self.formatting.info.clone();
        self.line(text, &style)
    }
    pub fn warning(&mut self, text: &str) -> io::Result<()> {
        let style = self.formatting.warning.clone();
        self.line(text, &style)
    }
    pub fn error(&mut self, text: &str) -> io::Result<()> {
        let style = self.formatting.error.clone();
        self.line(text, &style)
    }
    pub fn success(&mut self, text: &str) -> io::Result<()> {
        let style = self.formatting.success.clone();
        self.line(text, &style)
    }

    /// Raw text, no styling and no newline added.
    pub fn raw(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{}", text)
    }

    /// One red report line per diagnostic.
    pub fn diagnostics(&mut self, errors: &[Box<dyn MinicErrorExt>]) -> io::Result<()> {
        for err in errors {
            self.error(&generate_error_report(err.as_ref()))?;
        }
        Ok(())
    }

    /// Print the output log, then the registers (and memory, if any) as tables.
    pub fn exec_result(&mut self, result: &ExecResult) -> io::Result<()> {
        for line in &result.output {
            writeln!(self.out, "{}", line)?;
        }
        self.title("registers")?;
        writeln!(self.out, "{}", value_table(&result.registers))?;
        if !result.memory.is_empty() {
            self.title("memory")?;
            writeln!(self.out, "{}", value_table(&result.memory))?;
        }
        self.info(&format!("halted after {} steps, return value {}", result.steps, result.return_value()))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// A two-column name/value table.
pub fn value_table(values: &BTreeMap<String, i64>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["name", "value"]);
    for (name, value) in values {
        table.add_row(vec![Cell::new(name), Cell::new(value).set_alignment(CellAlignment::Right)]);
    }
    table
}

/// Declared functions with their parameters and definition site.
pub fn symbol_table(analysis: &AnalyzerOutput) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["function", "params", "defined at"]);
    for func in &analysis.functions {
        let location = func.location.as_ref().map(|l| format!("{}:{}", l.line, l.column)).unwrap_or_default();
        table.add_row(vec![Cell::new(&func.name), Cell::new(func.params.join(", ")), Cell::new(location)]);
    }
    table
}

/// JSON form of a run: the program, its outcome and its final state.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub program: &'a str,
    pub optimized: bool,
    pub max_steps: usize,
    pub return_value: i64,
    #[serde(flatten)]
    pub result: &'a ExecResult,
}

impl RunReport<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Progress over the pipeline stages. Hidden unless stderr is a terminal.
pub struct StageProgress {
    bar: ProgressBar,
}

impl StageProgress {
    pub fn new(stages: u64) -> Self {
        let bar = ProgressBar::new(stages);
        if !console::Term::stderr().is_term() {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} [{bar:20.green/dim}] {pos}/{len} {msg}") {
            bar.set_style(style.progress_chars("█▒░"));
        }
        bar.enable_steady_tick(Duration::from_millis(80));
        StageProgress { bar }
    }

    pub fn stage(&self, name: &str) {
        self.bar.set_message(name.to_string());
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
