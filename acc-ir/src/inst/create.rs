//! Instruction factories
//!
//! Every instruction kind has one factory. Each takes its typed operands and
//! an [`InsertPoint`]: build detached, immediately before an instruction, or
//! at the end of a block. The operand contract is checked before anything is
//! allocated.

use super::{BinaryOp, InstData, InstKind};
use crate::entities::{Block, Function, Value};
use crate::list::Links;
use crate::module::Module;
use crate::types::Type;
use crate::value::{ValueData, ValueKind};
use acc_common::{ensure, Bound, IrError};
use log::trace;

/// Where a new instruction goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPoint {
    /// Not in any block; insert it later
    Detached,
    /// Immediately before an instruction that is in a block
    Before(Value),
    /// At the end of a block
    AtEnd(Block),
}

impl From<Block> for InsertPoint {
    fn from(block: Block) -> Self {
        InsertPoint::AtEnd(block)
    }
}

impl Module {
    /// `lhs op rhs`, producing a value of `ty`
    pub fn create_binary(
        &mut self,
        op: BinaryOp,
        lhs: Value,
        rhs: Value,
        ty: Type,
        at: InsertPoint,
    ) -> Value {
        ensure(self.check_binary(op, lhs, rhs));
        self.create_instruction(ty, InstKind::Binary(op), &[lhs, rhs], at)
    }

    /// Stack region of `num_elements` values of `allocated`
    pub fn create_alloca(&mut self, allocated: Type, num_elements: usize, at: InsertPoint) -> Value {
        ensure(self.check_alloca(allocated));
        let ty = self.types.pointer_ty(allocated);
        let kind = InstKind::Alloca {
            allocated,
            num_elements,
        };
        self.create_instruction(ty, kind, &[], at)
    }

    pub fn create_load(&mut self, ptr: Value, at: InsertPoint) -> Value {
        ensure(self.check_load(ptr));
        let ptr_ty = self.value_type(ptr);
        let ty = match self.types.pointer_element_type(ptr_ty) {
            Some(pointee) => pointee,
            None => unreachable!("load operand checked to be a pointer"),
        };
        self.create_instruction(ty, InstKind::Load, &[ptr], at)
    }

    pub fn create_store(&mut self, value: Value, ptr: Value, at: InsertPoint) -> Value {
        ensure(self.check_store(value, ptr));
        let ty = self.types.unit_ty();
        self.create_instruction(ty, InstKind::Store, &[value, ptr], at)
    }

    /// Address of `ptr[indices...]` in a region of `element` values whose
    /// dimensions are limited by `bounds`
    pub fn create_offset(
        &mut self,
        element: Type,
        ptr: Value,
        indices: &[Value],
        bounds: &[Bound],
        at: InsertPoint,
    ) -> Value {
        ensure(self.check_offset(element, ptr, indices, bounds));
        let ty = self.types.pointer_ty(element);
        let mut operands = Vec::with_capacity(indices.len() + 1);
        operands.push(ptr);
        operands.extend_from_slice(indices);
        let kind = InstKind::Offset {
            element,
            bounds: bounds.to_vec(),
        };
        self.create_instruction(ty, kind, &operands, at)
    }

    pub fn create_call(&mut self, callee: Function, args: &[Value], at: InsertPoint) -> Value {
        ensure(self.check_call(callee, args));
        let callee_ty = self.function_data(callee).ty;
        let ty = match self.types.function_return_type(callee_ty) {
            Some(result) => result,
            None => unreachable!("functions always carry a function type"),
        };
        self.create_instruction(ty, InstKind::Call { callee }, args, at)
    }

    pub fn create_ret(&mut self, value: Value, at: InsertPoint) -> Value {
        ensure(self.check_ret(value));
        let ty = self.types.unit_ty();
        self.create_instruction(ty, InstKind::Ret, &[value], at)
    }

    pub fn create_jump(&mut self, dest: Block, at: InsertPoint) -> Value {
        self.ensure_block(dest);
        let ty = self.types.unit_ty();
        self.create_instruction(ty, InstKind::Jump { dest }, &[], at)
    }

    /// Branch to `if_true` when `cond` is non-zero, else to `if_false`
    pub fn create_br(
        &mut self,
        cond: Value,
        if_true: Block,
        if_false: Block,
        at: InsertPoint,
    ) -> Value {
        ensure(self.check_br(cond));
        self.ensure_block(if_true);
        self.ensure_block(if_false);
        let ty = self.types.unit_ty();
        self.create_instruction(ty, InstKind::Br { if_true, if_false }, &[cond], at)
    }

    /// Placeholder terminator for unreachable code
    pub fn create_panic(&mut self, at: InsertPoint) -> Value {
        let ty = self.types.unit_ty();
        self.create_instruction(ty, InstKind::Panic, &[], at)
    }

    fn create_instruction(
        &mut self,
        ty: Type,
        kind: InstKind,
        operands: &[Value],
        at: InsertPoint,
    ) -> Value {
        // Reject a bad position before allocating anything.
        match at {
            InsertPoint::Before(pos) if self.inst_data(pos).parent.is_none() => {
                IrError::DetachedPosition.fatal()
            }
            InsertPoint::AtEnd(block) if !self.blocks.contains_key(block) => {
                IrError::ErasedEntity { entity: "basic block" }.fatal()
            }
            _ => {}
        }

        let inst = self.values.insert(ValueData::new(ty, ValueKind::Instruction));
        let mut uses = Vec::with_capacity(operands.len());
        for &operand in operands {
            let u = self.new_use(inst);
            self.set_use(u, Some(operand));
            uses.push(u);
        }
        let opcode = kind.opcode();
        self.insts.insert(
            inst,
            InstData {
                kind,
                operands: uses,
                parent: None,
                links: Links::default(),
            },
        );
        trace!("Created {} instruction {:?}", opcode, inst);

        match at {
            InsertPoint::Detached => {}
            InsertPoint::Before(pos) => self.insert_before(inst, pos),
            InsertPoint::AtEnd(block) => self.insert_into(inst, block, None),
        }
        inst
    }
}
