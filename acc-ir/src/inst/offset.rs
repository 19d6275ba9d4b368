//! Constant folding of `offset` address arithmetic
//!
//! An `offset` addresses a row-major region: the stride of dimension `i` is
//! the product of every bound to its right, and the innermost stride is 1.
//! The outermost bound never contributes to a stride, which is why it is
//! conventionally left unconstrained.

use super::InstKind;
use crate::entities::Value;
use crate::module::Module;
use acc_common::{Bound, IrError};
use log::trace;

/// Per-dimension strides, in elements, for a list of bounds.
///
/// `None` when an inner dimension is unconstrained or the product overflows.
pub fn strides(bounds: &[Bound]) -> Option<Vec<usize>> {
    let mut strides = vec![0; bounds.len()];
    let mut stride = 1usize;
    for dim in (0..bounds.len()).rev() {
        strides[dim] = stride;
        if dim > 0 {
            stride = stride.checked_mul(bounds[dim]?)?;
        }
    }
    Some(strides)
}

impl Module {
    /// Accumulate the constant offset of an `offset`, in units of its element
    /// type, into `offset`.
    ///
    /// For `int g[3][4][5]`, `&g[1][2][3]` has bounds `[None, 4, 5]` and adds
    /// `1 * 20 + 2 * 5 + 3 * 1 = 33`. Returns false, leaving `offset`
    /// untouched, when any index is not an integer constant or the sum
    /// overflows.
    pub fn accumulate_constant_offset(&self, inst: Value, offset: &mut usize) -> bool {
        let bounds = match self.inst_kind(inst) {
            InstKind::Offset { bounds, .. } => bounds,
            kind => IrError::UnexpectedOpcode {
                expected: "offset".to_string(),
                found: kind.opcode().to_string(),
            }
            .fatal(),
        };

        let mut indices = Vec::with_capacity(bounds.len());
        for index in self.operands(inst).skip(1) {
            match index.and_then(|v| self.const_int_value(v)) {
                Some(n) => indices.push(n as usize),
                None => return false,
            }
        }

        let Some(strides) = strides(bounds) else {
            return false;
        };
        let mut total = 0usize;
        for (index, stride) in indices.into_iter().zip(strides) {
            let Some(sum) = index
                .checked_mul(stride)
                .and_then(|term| total.checked_add(term))
            else {
                return false;
            };
            total = sum;
        }

        let Some(sum) = offset.checked_add(total) else {
            return false;
        };
        trace!("Folded {:?} to constant offset {}", inst, total);
        *offset = sum;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strides_row_major() {
        assert_eq!(strides(&[None, Some(4), Some(5)]), Some(vec![20, 5, 1]));
        assert_eq!(strides(&[None]), Some(vec![1]));
        assert_eq!(strides(&[]), Some(vec![]));
    }

    #[test]
    fn test_outer_bound_is_ignored() {
        assert_eq!(strides(&[Some(3), Some(4), Some(5)]), Some(vec![20, 5, 1]));
    }

    #[test]
    fn test_unconstrained_inner_bound() {
        assert_eq!(strides(&[None, None, Some(5)]), None);
    }
}
