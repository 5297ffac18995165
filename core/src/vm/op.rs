use crate::ast::BinaryOperator;
use crate::ir::value::Operand;

/// One decoded target-machine instruction.
///
/// Every opcode has a fixed operand count; see `vm::decode` for the text
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Mov { dest: String, src: Operand },
    /// Arithmetic (`+ - * /`) or relational (`GT LT EQ NE GE LE`) instruction.
    Bin { op: BinaryOperator, dest: String, lhs: Operand, rhs: Operand },
    Jmp { label: String },
    Jz { cond: Operand, label: String },
    Call { name: String, argc: usize },
    Ret { value: Operand },
    Label { name: String },
    Print { value: Operand },
    /// Never executed.
    Comment { text: String },
}

/// Opcode spelling of a binary operator.
pub fn mnemonic(op: BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::Add => "+",
        BinaryOperator::Sub => "-",
        BinaryOperator::Mul => "*",
        BinaryOperator::Div => "/",
        BinaryOperator::Gt => "GT",
        BinaryOperator::Lt => "LT",
        BinaryOperator::Eq => "EQ",
        BinaryOperator::Ne => "NE",
        BinaryOperator::Ge => "GE",
        BinaryOperator::Le => "LE",
    }
}

pub fn from_mnemonic(text: &str) -> Option<BinaryOperator> {
    BinaryOperator::ALL.into_iter().find(|op| mnemonic(*op) == text)
}

impl Op {
    pub fn opcode(&self) -> &'static str {
        match self {
            Op::Mov { .. } => "MOV",
            Op::Bin { op, .. } => mnemonic(*op),
            Op::Jmp { .. } => "JMP",
            Op::Jz { .. } => "JZ",
            Op::Call { .. } => "CALL",
            Op::Ret { .. } => "RET",
            Op::Label { .. } => "LABEL",
            Op::Print { .. } => "PRINT",
            Op::Comment { .. } => "//",
        }
    }

    /// Label this instruction may transfer control to. Calls resolve to the
    /// callee's entry label.
    pub fn target_label(&self) -> Option<String> {
        match self {
            Op::Jmp { label } | Op::Jz { label, .. } => Some(label.clone()),
            Op::Call { name, .. } => Some(crate::ir::lower::function_label(name)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::Mov { dest, src } => write!(f, "MOV {}, {}", dest, src),
            Op::Bin { op, dest, lhs, rhs } => write!(f, "{} {}, {}, {}", mnemonic(*op), dest, lhs, rhs),
            Op::Jmp { label } => write!(f, "JMP {}", label),
            Op::Jz { cond, label } => write!(f, "JZ {}, {}", cond, label),
            Op::Call { name, argc } => write!(f, "CALL {}, {}", name, argc),
            Op::Ret { value } => write!(f, "RET {}", value),
            Op::Label { name } => write!(f, "LABEL {}", name),
            Op::Print { value } => write!(f, "PRINT {}", value),
            Op::Comment { text } => write!(f, "// {}", text),
        }
    }
}

/// A complete target-machine program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineCode {
    pub ops: Vec<Op>,
}

impl MachineCode {
    pub fn new(ops: Vec<Op>) -> Self {
        MachineCode { ops }
    }

    /// Decode the line-oriented text form.
    pub fn from_text(text: &str) -> Result<Self, super::decode::LoadError> {
        super::decode::parse_text(text).map(MachineCode::new)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Executable instructions, i.e. everything except comments.
    pub fn instruction_count(&self) -> usize {
        self.ops.iter().filter(|op| !matches!(op, Op::Comment { .. })).count()
    }

    /// Offset of every label, resolved the way the VM resolves them.
    pub fn label_offsets(&self) -> std::collections::HashMap<String, usize> {
        super::exec::scan_labels(&self.ops)
    }
}

impl std::fmt::Display for MachineCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for op in &self.ops {
            writeln!(f, "{}", op)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonics_are_unique() {
        for op in BinaryOperator::ALL {
            assert_eq!(from_mnemonic(mnemonic(op)), Some(op));
        }
    }

    #[test]
    fn renders_one_instruction_per_line() {
        let code = MachineCode::new(vec![
            Op::Comment { text: "func main()".into() },
            Op::Label { name: "FUNC_main".into() },
            Op::Bin { op: BinaryOperator::Le, dest: "_t0".into(), lhs: Operand::name("x"), rhs: Operand::Int(5) },
            Op::Call { name: "main".into(), argc: 0 },
        ]);
        assert_eq!(
            code.to_string(),
            "// func main()\nLABEL FUNC_main\nLE _t0, x, 5\nCALL main, 0\n"
        );
        assert_eq!(code.instruction_count(), 3);
    }
}
