//! Accipit Compiler - Intermediate Representation
//!
//! This crate defines the SSA-style IR shared by the lowering pass and the
//! backend: interned types, values with def-use chains, instructions in
//! basic blocks, functions, global variables and the module owning them all.
//!
//! Every entity lives in an arena inside [`Module`] and is named by a small
//! copyable handle. Operations that would build malformed IR abort with an
//! [`IrError`] message; lookups that may legitimately miss return `Option`.

mod list;

pub mod block;
pub mod builder;
pub mod entities;
pub mod function;
pub mod global;
pub mod inst;
pub mod module;
pub mod types;
pub mod value;

#[cfg(test)]
mod tests;

pub use acc_common::{Bound, ConstInt, IrError, Linkage};
pub use builder::IrBuilder;
pub use entities::{Block, Function, Use, Value};
pub use inst::{strides, BinaryOp, InsertPoint, InstKind, Opcode};
pub use module::Module;
pub use types::{Type, TypeContext, TypeData, TypeDisplay};
pub use value::ValueKind;
