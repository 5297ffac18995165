//! file: core/src/vm/decode.rs
//! description: machine-code text loader.
//!
//! Text is decoded once, up front, into typed `Op` values; the executor never
//! looks at instruction text again. Format: one instruction per line, opcode
//! first, operands separated by commas and/or whitespace. Lines starting with
//! `//` are comments and blank lines are dropped.
//!
use crate::error::{Level, impl_error_ext};
use crate::ir::value::Operand;
use crate::location::{Location, Span};
use crate::vm::op::{Op, from_mnemonic};

/// Pseudo file name used in load diagnostics.
pub const MACHINE_CODE_FILE: &str = "<machine code>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    UnknownOpcode,
    BadArity,
    BadOperand,
}

#[derive(Debug, Clone)]
pub struct LoadError {
    pub kind: LoadErrorKind,
    /// 1-based source line.
    pub line: usize,
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl LoadError {
    fn new(kind: LoadErrorKind, line: usize, message: String) -> Self {
        LoadError {
            kind,
            line,
            level: Level::Error,
            message,
            issuer: "minic.vm.decode".to_string(),
            location: Some(Location::line_start(MACHINE_CODE_FILE, line)),
            span: None,
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for LoadError {}

impl_error_ext!(LoadError);

fn split_operands(rest: &str) -> Vec<&str> {
    rest.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect()
}

fn expect_arity(opcode: &str, operands: &[&str], expected: usize, line: usize) -> Result<(), LoadError> {
    if operands.len() != expected {
        return Err(LoadError::new(
            LoadErrorKind::BadArity,
            line,
            format!("{} takes {} operand(s), found {}", opcode, expected, operands.len()),
        ));
    }
    Ok(())
}

/// Destinations and labels must be names; a literal there is malformed.
fn expect_name(token: &str, what: &str, line: usize) -> Result<String, LoadError> {
    match Operand::parse(token) {
        Operand::Name(name) => Ok(name),
        Operand::Int(_) => Err(LoadError::new(
            LoadErrorKind::BadOperand,
            line,
            format!("{} must be a name, found literal '{}'", what, token),
        )),
    }
}

fn decode_line(text: &str, line: usize) -> Result<Op, LoadError> {
    let (opcode, rest) = match text.split_once(char::is_whitespace) {
        Some((opcode, rest)) => (opcode, rest),
        None => (text, ""),
    };
    let operands = split_operands(rest);

    let op = match opcode {
        "MOV" => {
            expect_arity(opcode, &operands, 2, line)?;
            Op::Mov { dest: expect_name(operands[0], "MOV destination", line)?, src: Operand::parse(operands[1]) }
        }
        "JMP" => {
            expect_arity(opcode, &operands, 1, line)?;
            Op::Jmp { label: expect_name(operands[0], "jump target", line)? }
        }
        "JZ" => {
            expect_arity(opcode, &operands, 2, line)?;
            Op::Jz { cond: Operand::parse(operands[0]), label: expect_name(operands[1], "jump target", line)? }
        }
        "CALL" => {
            expect_arity(opcode, &operands, 2, line)?;
            let name = expect_name(operands[0], "function name", line)?;
            let argc = operands[1].parse::<usize>().map_err(|_| {
                LoadError::new(
                    LoadErrorKind::BadOperand,
                    line,
                    format!("CALL argument count must be a non-negative integer, found '{}'", operands[1]),
                )
            })?;
            Op::Call { name, argc }
        }
        "RET" => match operands.len() {
            0 => Op::Ret { value: Operand::Int(0) },
            1 => Op::Ret { value: Operand::parse(operands[0]) },
            _ => {
                return Err(LoadError::new(
                    LoadErrorKind::BadArity,
                    line,
                    format!("RET takes at most 1 operand, found {}", operands.len()),
                ));
            }
        },
        "LABEL" => {
            expect_arity(opcode, &operands, 1, line)?;
            Op::Label { name: expect_name(operands[0], "label", line)? }
        }
        "PRINT" => {
            expect_arity(opcode, &operands, 1, line)?;
            Op::Print { value: Operand::parse(operands[0]) }
        }
        other => match from_mnemonic(other) {
            Some(bin) => {
                expect_arity(opcode, &operands, 3, line)?;
                Op::Bin {
                    op: bin,
                    dest: expect_name(operands[0], "destination", line)?,
                    lhs: Operand::parse(operands[1]),
                    rhs: Operand::parse(operands[2]),
                }
            }
            None => {
                return Err(LoadError::new(
                    LoadErrorKind::UnknownOpcode,
                    line,
                    format!("unknown opcode '{}'", other),
                ));
            }
        },
    };
    Ok(op)
}

/// Decode a whole program.
pub fn parse_text(text: &str) -> Result<Vec<Op>, LoadError> {
    let mut ops = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix("//") {
            ops.push(Op::Comment { text: comment.trim().to_string() });
            continue;
        }
        ops.push(decode_line(line, idx + 1)?);
    }
    log::debug!("decoded {} machine instructions", ops.len());
    Ok(ops)
}
