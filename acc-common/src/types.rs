//! Common types used throughout the compiler
//!
//! This module defines small data types shared between the IR core and
//! its clients, such as linkage and the integer widths of constants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload of an integer constant
pub type ConstInt = u32;

/// Bound of one offset dimension; `None` marks an unconstrained dimension
pub type Bound = Option<usize>;

/// Linkage of a module-level symbol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Linkage {
    /// Defined in the current module
    #[default]
    Internal,
    /// Declared here, defined elsewhere
    External,
}

impl Linkage {
    pub fn is_external(&self) -> bool {
        matches!(self, Linkage::External)
    }
}

impl From<bool> for Linkage {
    fn from(external: bool) -> Self {
        if external {
            Linkage::External
        } else {
            Linkage::Internal
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Linkage::Internal => write!(f, "internal"),
            Linkage::External => write!(f, "external"),
        }
    }
}
