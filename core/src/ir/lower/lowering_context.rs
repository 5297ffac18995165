//! file: core/src/ir/lower/lowering_context.rs
//! description: shared state threaded through one AST->IR lowering run.
//!
//! `LoweringContext` owns the module being built together with the counters
//! that make temporaries and labels unique. One context is created per call
//! to `lower_ast_to_ir` and consumed when lowering finishes.

use crate::ir::module::IrModule;
use crate::ir::op::IROp;

pub const TEMP_PREFIX: &str = "_t";
pub const ARG_PREFIX: &str = "_arg";
pub const RET_SLOT: &str = "_ret";
pub const FUNC_LABEL_PREFIX: &str = "FUNC_";

/// Entry label of a function.
pub fn function_label(name: &str) -> String {
    format!("{}{}", FUNC_LABEL_PREFIX, name)
}

/// Positional argument slot `index`.
pub fn arg_slot(index: usize) -> String {
    format!("{}{}", ARG_PREFIX, index)
}

#[derive(Debug, Default)]
pub struct LoweringContext {
    module: IrModule,
    next_temp: usize,
    /// Shared by every generated label so no two are ever equal.
    next_label: usize,
}

impl LoweringContext {
    pub fn new() -> Self {
        LoweringContext::default()
    }

    pub fn emit(&mut self, op: IROp) {
        self.module.emit_op(op);
    }

    /// Allocate a temporary name that has never been handed out before.
    pub fn new_temp(&mut self) -> String {
        let name = format!("{}{}", TEMP_PREFIX, self.next_temp);
        self.next_temp += 1;
        name
    }

    pub fn new_label(&mut self, prefix: &str) -> String {
        let name = format!("{}_{}", prefix, self.next_label);
        self.next_label += 1;
        name
    }

    pub fn finish(self) -> IrModule {
        log::debug!(
            "lowered {} IR ops ({} temporaries, {} labels)",
            self.module.len(),
            self.next_temp,
            self.next_label
        );
        self.module
    }
}
