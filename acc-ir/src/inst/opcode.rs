//! Instruction opcodes
//!
//! Opcodes are encoded as small integers in four contiguous groups: binary
//! operators, memory operations, terminators and everything else. Group
//! membership is a range check over that encoding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary arithmetic, comparison and logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add, Sub, Mul, Div, Rem,

    // Logical
    And, Or, Xor,

    // Comparison
    Eq, Ne, Lt, Le, Gt, Ge,
}

impl BinaryOp {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    // Binary operators
    Add, Sub, Mul, Div, Rem,
    And, Or, Xor,
    Eq, Ne, Lt, Le, Gt, Ge,

    // Memory operations
    Alloca, Load, Store, Offset,

    // Terminators
    Ret, Jump, Br, Panic,

    // Other
    Call,
}

impl Opcode {
    pub const BINARY_OPS_BEGIN: u8 = Opcode::Add as u8;
    pub const BINARY_OPS_END: u8 = Opcode::Ge as u8;
    pub const MEMORY_OPS_BEGIN: u8 = Opcode::Alloca as u8;
    pub const MEMORY_OPS_END: u8 = Opcode::Offset as u8;
    pub const TERMINATOR_OPS_BEGIN: u8 = Opcode::Ret as u8;
    pub const TERMINATOR_OPS_END: u8 = Opcode::Panic as u8;
    pub const OTHER_OPS_BEGIN: u8 = Opcode::Call as u8;
    pub const OTHER_OPS_END: u8 = Opcode::Call as u8;

    /// Integer encoding of the opcode
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_binary_op(self) -> bool {
        (Self::BINARY_OPS_BEGIN..=Self::BINARY_OPS_END).contains(&self.as_u8())
    }

    pub fn is_memory_op(self) -> bool {
        (Self::MEMORY_OPS_BEGIN..=Self::MEMORY_OPS_END).contains(&self.as_u8())
    }

    /// Whether instructions with this opcode may end a basic block
    pub fn is_terminator(self) -> bool {
        (Self::TERMINATOR_OPS_BEGIN..=Self::TERMINATOR_OPS_END).contains(&self.as_u8())
    }

    pub fn is_other_op(self) -> bool {
        (Self::OTHER_OPS_BEGIN..=Self::OTHER_OPS_END).contains(&self.as_u8())
    }

    pub fn binary_op(self) -> Option<BinaryOp> {
        let op = match self {
            Opcode::Add => BinaryOp::Add,
            Opcode::Sub => BinaryOp::Sub,
            Opcode::Mul => BinaryOp::Mul,
            Opcode::Div => BinaryOp::Div,
            Opcode::Rem => BinaryOp::Rem,
            Opcode::And => BinaryOp::And,
            Opcode::Or => BinaryOp::Or,
            Opcode::Xor => BinaryOp::Xor,
            Opcode::Eq => BinaryOp::Eq,
            Opcode::Ne => BinaryOp::Ne,
            Opcode::Lt => BinaryOp::Lt,
            Opcode::Le => BinaryOp::Le,
            Opcode::Gt => BinaryOp::Gt,
            Opcode::Ge => BinaryOp::Ge,
            _ => return None,
        };
        Some(op)
    }
}

impl From<BinaryOp> for Opcode {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Add => Opcode::Add,
            BinaryOp::Sub => Opcode::Sub,
            BinaryOp::Mul => Opcode::Mul,
            BinaryOp::Div => Opcode::Div,
            BinaryOp::Rem => Opcode::Rem,
            BinaryOp::And => Opcode::And,
            BinaryOp::Or => Opcode::Or,
            BinaryOp::Xor => Opcode::Xor,
            BinaryOp::Eq => Opcode::Eq,
            BinaryOp::Ne => Opcode::Ne,
            BinaryOp::Lt => Opcode::Lt,
            BinaryOp::Le => Opcode::Le,
            BinaryOp::Gt => Opcode::Gt,
            BinaryOp::Ge => Opcode::Ge,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Rem => "rem",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
            Opcode::Eq => "eq",
            Opcode::Ne => "ne",
            Opcode::Lt => "lt",
            Opcode::Le => "le",
            Opcode::Gt => "gt",
            Opcode::Ge => "ge",
            Opcode::Alloca => "alloca",
            Opcode::Load => "load",
            Opcode::Store => "store",
            Opcode::Offset => "offset",
            Opcode::Ret => "ret",
            Opcode::Jump => "jmp",
            Opcode::Br => "br",
            Opcode::Panic => "panic",
            Opcode::Call => "call",
        };
        write!(f, "{}", op_str)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Opcode::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_groups() {
        assert!(Opcode::Add.is_binary_op());
        assert!(Opcode::Ge.is_binary_op());
        assert!(!Opcode::Alloca.is_binary_op());

        assert!(Opcode::Offset.is_memory_op());
        assert!(!Opcode::Ret.is_memory_op());

        for op in [Opcode::Ret, Opcode::Jump, Opcode::Br, Opcode::Panic] {
            assert!(op.is_terminator(), "{} should be a terminator", op);
        }
        assert!(!Opcode::Call.is_terminator());
        assert!(!Opcode::Store.is_terminator());
        assert!(Opcode::Call.is_other_op());
    }

    #[test]
    fn test_binary_op_roundtrip() {
        assert_eq!(Opcode::from(BinaryOp::Lt), Opcode::Lt);
        assert_eq!(Opcode::Lt.binary_op(), Some(BinaryOp::Lt));
        assert_eq!(Opcode::Load.binary_op(), None);
        assert!(BinaryOp::Ne.is_comparison());
        assert!(!BinaryOp::Mul.is_comparison());
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(format!("{}", Opcode::Jump), "jmp");
        assert_eq!(format!("{}", BinaryOp::Xor), "xor");
    }
}
