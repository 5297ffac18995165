pub mod codegen;
pub mod lower;
pub mod module;
pub mod op;
pub mod opt;
pub mod value;

pub use self::codegen::emit_machine_code;
pub use self::lower::{LoweringError, lower_ast_to_ir};
pub use self::module::IrModule;
pub use self::op::IROp;
pub use self::opt::optimize;
pub use self::value::Operand;
