pub mod decode;
pub mod exec;
pub mod op;

use std::collections::{BTreeMap, HashMap};

pub use decode::{LoadError, LoadErrorKind};
pub use exec::{ExecResult, RuntimeError, RuntimeErrorKind};
pub use op::{MachineCode, Op};

use crate::error::MinicErrorExt;

pub const DEFAULT_MAX_STEPS: usize = 500_000;
pub const MAX_STEPS_ENV: &str = "MINIC_MAX_STEPS";

/// Run-time knobs for the VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    pub max_steps: usize,
    /// Log every executed instruction at `trace` level.
    pub trace: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig { max_steps: DEFAULT_MAX_STEPS, trace: false }
    }
}

impl VmConfig {
    /// Defaults, with the step budget taken from `MINIC_MAX_STEPS` when it
    /// holds a valid number.
    pub fn from_env() -> Self {
        let mut config = VmConfig::default();
        if let Ok(raw) = std::env::var(MAX_STEPS_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(n) => config.max_steps = n,
                Err(_) => log::warn!("ignoring {}={:?}: not a step count", MAX_STEPS_ENV, raw),
            }
        }
        config
    }
}

pub struct VM {
    code: MachineCode,
    config: VmConfig,
    memory: HashMap<String, i64>,
}

impl VM {
    pub fn new(code: MachineCode) -> Self {
        VM { code, config: VmConfig::default(), memory: HashMap::new() }
    }

    pub fn from_text(text: &str) -> Result<Self, LoadError> {
        Ok(VM::new(MachineCode::from_text(text)?))
    }

    pub fn with_config(mut self, config: VmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.config.max_steps = max_steps;
        self
    }

    /// Seed the read-only memory map consulted before registers.
    pub fn with_memory(mut self, memory: BTreeMap<String, i64>) -> Self {
        self.memory = memory.into_iter().collect();
        self
    }

    /// Execute from a fresh state. Each call is independent of earlier ones.
    pub fn run(&self) -> Result<ExecResult, RuntimeError> {
        exec::run_ops(&self.code.ops, self.memory.clone(), self.config.max_steps, self.config.trace)
    }
}

/// Run decoded machine code with an optional step budget override.
pub fn run_machine_code(code: &MachineCode, max_steps: Option<usize>) -> Result<ExecResult, RuntimeError> {
    exec::run_ops(&code.ops, HashMap::new(), max_steps.unwrap_or(DEFAULT_MAX_STEPS), false)
}

/// Decode and run machine-code text. Load faults and runtime faults are both
/// reported through the common error trait.
pub fn run_text(text: &str, max_steps: Option<usize>) -> Result<ExecResult, Box<dyn MinicErrorExt>> {
    let code = MachineCode::from_text(text)?;
    Ok(run_machine_code(&code, max_steps)?)
}
