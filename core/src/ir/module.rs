use crate::ir::op::IROp;

/// An ordered IR instruction sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IrModule {
    pub ops: Vec<IROp>,
}

impl IrModule {
    pub fn new() -> Self {
        IrModule { ops: Vec::new() }
    }

    pub fn from_ops(ops: Vec<IROp>) -> Self {
        IrModule { ops }
    }

    pub fn emit_op(&mut self, op: IROp) {
        self.ops.push(op);
    }

    pub fn get_ops(&self) -> &[IROp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Names of every `Label` in emission order.
    pub fn labels(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                IROp::Label { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether a function with the given name is declared.
    pub fn declares_function(&self, name: &str) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, IROp::FuncMarker { name: n, .. } if n == name))
    }
}

impl std::fmt::Display for IrModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            writeln!(f, "{:04}: {}", i, op)?;
        }
        Ok(())
    }
}
