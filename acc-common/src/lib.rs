//! Accipit IR Compiler - Common Types and Errors
//!
//! This crate contains the error definitions and small shared types
//! used by the IR core and the compiler stages that build IR.

pub mod error;
pub mod types;

pub use error::{ensure, IrError};
pub use types::*;
