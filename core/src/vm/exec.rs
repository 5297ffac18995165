//! file: core/src/vm/exec.rs
//! description: machine-code executor.
//!
//! `run_ops` builds a fresh `ExecState` for every run: label index, registers,
//! memory, call stack, pc, step counter and output log. `dispatch_op`
//! executes exactly one instruction per step. Halting is expressed by moving
//! the pc past the last instruction.
//!
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::{Level, impl_error_ext};
use crate::ir::lower::{RET_SLOT, function_label};
use crate::ir::op::evaluate;
use crate::ir::value::Operand;
use crate::location::{Location, Span};
use crate::vm::op::Op;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    UnknownLabel,
    UnknownFunction,
    StepLimitExceeded,
}

impl std::fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RuntimeErrorKind::UnknownLabel => "unknown label",
            RuntimeErrorKind::UnknownFunction => "unknown function",
            RuntimeErrorKind::StepLimitExceeded => "step limit exceeded",
        };
        write!(f, "{}", s)
    }
}

/// Fatal VM fault. No partial state is returned alongside it.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    /// Offset of the instruction that faulted.
    pub pc: usize,
    pub steps: usize,
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl RuntimeError {
    fn new(kind: RuntimeErrorKind, state: &ExecState<'_>, detail: String) -> Self {
        RuntimeError {
            kind,
            pc: state.pc,
            steps: state.steps,
            level: Level::Critical,
            message: format!("{} at instruction {}: {}", kind, state.pc, detail),
            issuer: "minic.vm.exec".to_string(),
            location: None,
            span: None,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

impl_error_ext!(RuntimeError);

/// Final state of a run that halted normally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecResult {
    pub registers: BTreeMap<String, i64>,
    pub memory: BTreeMap<String, i64>,
    pub output: Vec<String>,
    pub steps: usize,
}

impl ExecResult {
    /// Register value, 0 when never written.
    pub fn register(&self, name: &str) -> i64 {
        self.registers.get(name).copied().unwrap_or(0)
    }

    pub fn return_value(&self) -> i64 {
        self.register(RET_SLOT)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub struct ExecState<'a> {
    pub ops: &'a [Op],
    pub labels: HashMap<String, usize>,
    pub registers: HashMap<String, i64>,
    pub memory: HashMap<String, i64>,
    pub call_stack: Vec<usize>,
    pub pc: usize,
    pub steps: usize,
    pub output: Vec<String>,
    pub trace: bool,
}

/// Offsets of every `LABEL`. A repeated name keeps its last offset.
pub(crate) fn scan_labels(ops: &[Op]) -> HashMap<String, usize> {
    let mut labels = HashMap::new();
    for (idx, op) in ops.iter().enumerate() {
        if let Op::Label { name } = op {
            if let Some(prev) = labels.insert(name.clone(), idx) {
                log::warn!("label '{}' defined at {} and {}; using {}", name, prev, idx, idx);
            }
        }
    }
    labels
}

impl<'a> ExecState<'a> {
    pub fn new(ops: &'a [Op], memory: HashMap<String, i64>, trace: bool) -> Self {
        ExecState {
            ops,
            labels: scan_labels(ops),
            registers: HashMap::new(),
            memory,
            call_stack: Vec::new(),
            pc: 0,
            steps: 0,
            output: Vec::new(),
            trace,
        }
    }

    /// Literal, else memory, else register (0 when unset).
    pub fn resolve(&self, operand: &Operand) -> i64 {
        match operand {
            Operand::Int(v) => *v,
            Operand::Name(name) => self
                .memory
                .get(name)
                .or_else(|| self.registers.get(name))
                .copied()
                .unwrap_or(0),
        }
    }

    fn halt(&mut self) {
        self.pc = self.ops.len();
    }

    fn jump_to(&mut self, label: &str) -> Result<(), RuntimeError> {
        match self.labels.get(label) {
            Some(&target) => {
                self.pc = target;
                Ok(())
            }
            None => Err(RuntimeError::new(
                RuntimeErrorKind::UnknownLabel,
                self,
                format!("no label named '{}'", label),
            )),
        }
    }

    fn into_result(self) -> ExecResult {
        ExecResult {
            registers: self.registers.into_iter().collect(),
            memory: self.memory.into_iter().collect(),
            output: self.output,
            steps: self.steps,
        }
    }
}

pub(crate) fn dispatch_op(state: &mut ExecState<'_>) -> Result<(), RuntimeError> {
    let ops = state.ops;
    match &ops[state.pc] {
        Op::Mov { dest, src } => {
            let value = state.resolve(src);
            state.registers.insert(dest.clone(), value);
            state.pc += 1;
        }
        Op::Bin { op, dest, lhs, rhs } => {
            let value = evaluate(*op, state.resolve(lhs), state.resolve(rhs));
            state.registers.insert(dest.clone(), value);
            state.pc += 1;
        }
        Op::Jmp { label } => state.jump_to(label)?,
        Op::Jz { cond, label } => {
            if state.resolve(cond) == 0 {
                state.jump_to(label)?;
            } else {
                state.pc += 1;
            }
        }
        Op::Call { name, .. } => {
            let entry = function_label(name);
            match state.labels.get(&entry) {
                Some(&target) => {
                    state.call_stack.push(state.pc + 1);
                    state.pc = target;
                }
                None => {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::UnknownFunction,
                        state,
                        format!("no function named '{}'", name),
                    ));
                }
            }
        }
        Op::Ret { value } => {
            let value = state.resolve(value);
            state.registers.insert(RET_SLOT.to_string(), value);
            match state.call_stack.pop() {
                Some(return_pc) => state.pc = return_pc,
                // a top-level return ends the program
                None => state.halt(),
            }
        }
        Op::Print { value } => {
            let value = state.resolve(value);
            state.output.push(value.to_string());
            state.pc += 1;
        }
        Op::Label { .. } | Op::Comment { .. } => state.pc += 1,
    }
    Ok(())
}

/// Execute `ops` until the pc runs off the end or a fault occurs.
pub(crate) fn run_ops(
    ops: &[Op],
    memory: HashMap<String, i64>,
    max_steps: usize,
    trace: bool,
) -> Result<ExecResult, RuntimeError> {
    let mut state = ExecState::new(ops, memory, trace);

    while state.pc < state.ops.len() {
        if state.steps >= max_steps {
            return Err(RuntimeError::new(
                RuntimeErrorKind::StepLimitExceeded,
                &state,
                format!("budget of {} steps exhausted", max_steps),
            ));
        }
        state.steps += 1;
        if state.trace {
            log::trace!(
                "step {:>6} pc {:>4} depth {}: {}",
                state.steps,
                state.pc,
                state.call_stack.len(),
                state.ops[state.pc]
            );
        }
        dispatch_op(&mut state)?;
    }

    log::debug!("vm halted after {} steps", state.steps);
    Ok(state.into_result())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::decode::parse_text;

    fn run(text: &str, max_steps: usize) -> Result<ExecResult, RuntimeError> {
        let ops = parse_text(text).expect("decode");
        run_ops(&ops, HashMap::new(), max_steps, false)
    }

    #[test]
    fn resolve_prefers_memory_over_registers() {
        let ops = parse_text("MOV x, 1\nMOV y, x\n").expect("decode");
        let memory = HashMap::from([("x".to_string(), 40)]);
        let result = run_ops(&ops, memory, 100, false).expect("run");
        assert_eq!(result.register("x"), 1);
        assert_eq!(result.register("y"), 40);
        assert_eq!(result.memory.get("x"), Some(&40));
    }

    #[test]
    fn unset_registers_read_as_zero() {
        let result = run("+ a, missing, 2\n", 10).expect("run");
        assert_eq!(result.register("a"), 2);
    }

    #[test]
    fn labels_and_comments_consume_steps() {
        let result = run("// c\nLABEL a\nMOV x, 1\n", 10).expect("run");
        assert_eq!(result.steps, 3);
        assert!(run("// c\nLABEL a\nMOV x, 1\n", 2).is_err());
    }

    #[test]
    fn duplicate_label_last_definition_wins() {
        let result = run("JMP L\nLABEL L\nMOV x, 1\nLABEL L\nMOV y, 1\n", 100).expect("run");
        assert_eq!(result.register("x"), 0);
        assert_eq!(result.register("y"), 1);
    }

    #[test]
    fn jz_unknown_label_only_faults_when_taken() {
        assert!(run("JZ 1, nowhere\n", 10).is_ok());
        let err = run("JZ 0, nowhere\n", 10).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::UnknownLabel);
        assert_eq!(err.pc, 0);
    }

    #[test]
    fn unknown_function_faults() {
        let err = run("MOV x, 1\nCALL nope, 0\n", 10).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::UnknownFunction);
        assert_eq!(err.pc, 1);
    }

    #[test]
    fn call_and_return_resume_after_call() {
        let text = "JMP start\nLABEL FUNC_double\n* _t0, _arg0, 2\nRET _t0\nLABEL start\nMOV _arg0, 21\nCALL double, 1\nMOV r, _ret\n";
        let result = run(text, 100).expect("run");
        assert_eq!(result.register("r"), 42);
        assert_eq!(result.return_value(), 42);
    }

    #[test]
    fn print_appends_to_output() {
        let result = run("PRINT 7\nMOV x, -3\nPRINT x\n", 10).expect("run");
        assert_eq!(result.output, vec!["7".to_string(), "-3".to_string()]);
    }

    #[test]
    fn json_report_is_ordered() {
        let result = run("MOV b, 2\nMOV a, 1\n", 10).expect("run");
        let json = result.to_json().expect("json");
        let a = json.find("\"a\"").expect("a");
        let b = json.find("\"b\"").expect("b");
        assert!(a < b);
    }
}
