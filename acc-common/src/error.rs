//! Error handling for the Accipit IR
//!
//! This module defines the contract violations the IR core can detect.
//! Construction and mutation primitives treat them as fatal: a violation
//! means the caller (usually the lowering pass) built malformed IR.

use thiserror::Error;

/// Every contract violation detected while building or mutating IR
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    #[error("Cannot create {opcode} with two operands of differing type: {lhs} and {rhs}")]
    OperandTypeMismatch {
        opcode: String,
        lhs: String,
        rhs: String,
    },

    #[error("Cannot allocate () type!")]
    AllocaOfUnit,

    #[error("May only branch on integer predicate, found {found}")]
    NonIntegerCondition { found: String },

    #[error("{opcode} expects a pointer operand, found {found}")]
    ExpectedPointer { opcode: String, found: String },

    #[error("Element type of offset does not match the type of pointer: expected {expected}, found {found}")]
    OffsetElementMismatch { expected: String, found: String },

    #[error("Num of indices and bounds does not match: {indices} indices for {bounds} bounds")]
    OffsetArityMismatch { indices: usize, bounds: usize },

    #[error("Cannot store a value of type {value} through a pointer to {pointee}")]
    StoreTypeMismatch { value: String, pointee: String },

    #[error("Call to '{callee}' expects {expected} arguments, found {found}")]
    CallArityMismatch {
        callee: String,
        expected: usize,
        found: usize,
    },

    #[error("Call to '{callee}' passes {found} as argument {index}, expected {expected}")]
    CallArgumentMismatch {
        callee: String,
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Operand index {index} out of range for {opcode} with {count} operands")]
    OperandOutOfRange {
        opcode: String,
        index: usize,
        count: usize,
    },

    #[error("Expected detached instruction!")]
    InstructionAlreadyAttached,

    #[error("Expected detached basic block!")]
    BlockAlreadyAttached,

    #[error("Instruction to insert relative to is not in a basic block!")]
    DetachedPosition,

    #[error("Instruction is not in a basic block!")]
    InstructionNotAttached,

    #[error("Insertion position is not in the target basic block")]
    PositionNotInBlock,

    #[error("Expected {expected} instruction, found {found}")]
    UnexpectedOpcode { expected: String, found: String },

    #[error("Value is not an instruction")]
    NotAnInstruction,

    #[error("Value is not a global variable")]
    NotAGlobal,

    #[error("Argument index {index} out of range for function with {count} parameters")]
    ArgumentOutOfRange { index: usize, count: usize },

    #[error("Basic block to insert before does not belong to the target function")]
    BlockNotInFunction,

    #[error("Cannot add a basic block to declaration '{name}'")]
    BlockInDeclaration { name: String },

    #[error("No insertion point: position the builder in a basic block first")]
    NoInsertionPoint,

    #[error("Use of erased {entity}")]
    ErasedEntity { entity: &'static str },

    #[error("Redefinition of symbol '{name}'")]
    DuplicateSymbol { name: String },

    #[error("Expected a function type, found {found}")]
    ExpectedFunctionType { found: String },
}

impl IrError {
    /// Abort on a contract violation.
    ///
    /// Callers reach this only through a bug in the code building the IR,
    /// so the violation is reported and never recovered from.
    #[track_caller]
    pub fn fatal(self) -> ! {
        panic!("{}", self)
    }
}

/// Turn a failed contract check into a fatal error
#[track_caller]
pub fn ensure(check: Result<(), IrError>) {
    if let Err(err) = check {
        err.fatal();
    }
}
