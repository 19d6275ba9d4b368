//! Operand contracts of each instruction kind
//!
//! The factories run these checks and abort on failure. They are public so a
//! client can probe a candidate instruction without building it.

use super::{BinaryOp, Opcode};
use crate::entities::{Function, Value};
use crate::module::Module;
use crate::types::Type;
use acc_common::{Bound, IrError};

impl Module {
    /// Both operands of a binary operator must share one type
    pub fn check_binary(&self, op: BinaryOp, lhs: Value, rhs: Value) -> Result<(), IrError> {
        let lhs_ty = self.value_type(lhs);
        let rhs_ty = self.value_type(rhs);
        if lhs_ty != rhs_ty {
            return Err(IrError::OperandTypeMismatch {
                opcode: op.to_string(),
                lhs: self.type_name(lhs_ty),
                rhs: self.type_name(rhs_ty),
            });
        }
        Ok(())
    }

    pub fn check_alloca(&self, allocated: Type) -> Result<(), IrError> {
        if self.types.is_unit(allocated) {
            return Err(IrError::AllocaOfUnit);
        }
        Ok(())
    }

    pub fn check_load(&self, ptr: Value) -> Result<(), IrError> {
        self.pointee_of(Opcode::Load, ptr).map(|_| ())
    }

    /// The pointer must point at the stored value's type
    pub fn check_store(&self, value: Value, ptr: Value) -> Result<(), IrError> {
        let pointee = self.pointee_of(Opcode::Store, ptr)?;
        let value_ty = self.value_type(value);
        if pointee != value_ty {
            return Err(IrError::StoreTypeMismatch {
                value: self.type_name(value_ty),
                pointee: self.type_name(pointee),
            });
        }
        Ok(())
    }

    /// The pointer must point at `element` and every bound needs one index
    pub fn check_offset(
        &self,
        element: Type,
        ptr: Value,
        indices: &[Value],
        bounds: &[Bound],
    ) -> Result<(), IrError> {
        let pointee = self.pointee_of(Opcode::Offset, ptr)?;
        if pointee != element {
            return Err(IrError::OffsetElementMismatch {
                expected: self.type_name(element),
                found: self.type_name(pointee),
            });
        }
        if indices.len() != bounds.len() {
            return Err(IrError::OffsetArityMismatch {
                indices: indices.len(),
                bounds: bounds.len(),
            });
        }
        if indices.iter().any(|&index| !self.contains_value(index)) {
            return Err(IrError::ErasedEntity { entity: "value" });
        }
        Ok(())
    }

    /// Arguments must match the callee's parameters in number and type
    pub fn check_call(&self, callee: Function, args: &[Value]) -> Result<(), IrError> {
        let data = self.function_data(callee);
        let params = self.types.function_params(data.ty).unwrap_or_default();
        if params.len() != args.len() {
            return Err(IrError::CallArityMismatch {
                callee: data.name.clone(),
                expected: params.len(),
                found: args.len(),
            });
        }
        for (index, (&param, &arg)) in params.iter().zip(args).enumerate() {
            let arg_ty = self.value_type(arg);
            if arg_ty != param {
                return Err(IrError::CallArgumentMismatch {
                    callee: data.name.clone(),
                    index,
                    expected: self.type_name(param),
                    found: self.type_name(arg_ty),
                });
            }
        }
        Ok(())
    }

    /// The returned value must still be live
    pub fn check_ret(&self, value: Value) -> Result<(), IrError> {
        if !self.contains_value(value) {
            return Err(IrError::ErasedEntity { entity: "value" });
        }
        Ok(())
    }

    pub fn check_br(&self, cond: Value) -> Result<(), IrError> {
        let cond_ty = self.value_type(cond);
        if !self.types.is_integer(cond_ty) {
            return Err(IrError::NonIntegerCondition {
                found: self.type_name(cond_ty),
            });
        }
        Ok(())
    }

    pub(crate) fn check_detached(&self, inst: Value) -> Result<(), IrError> {
        match self.inst_data(inst).parent {
            Some(_) => Err(IrError::InstructionAlreadyAttached),
            None => Ok(()),
        }
    }

    fn pointee_of(&self, opcode: Opcode, ptr: Value) -> Result<Type, IrError> {
        let ptr_ty = self.value_type(ptr);
        self.types
            .pointer_element_type(ptr_ty)
            .ok_or_else(|| IrError::ExpectedPointer {
                opcode: opcode.to_string(),
                found: self.type_name(ptr_ty),
            })
    }

    pub(crate) fn type_name(&self, ty: Type) -> String {
        self.types.display(ty).to_string()
    }
}
