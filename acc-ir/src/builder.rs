//! Builder for constructing IR
//!
//! `IrBuilder` remembers an insertion point so the lowering pass can emit a
//! sequence of instructions without threading positions through every call.
//! It is a thin layer over the [`Module`] factories: every contract the
//! factories check still applies.

use crate::entities::{Block, Function, Value};
use crate::inst::{BinaryOp, InsertPoint};
use crate::module::Module;
use crate::types::Type;
use acc_common::{Bound, ConstInt, IrError};
use log::{debug, trace};

/// Builder for constructing IR inside one module
pub struct IrBuilder<'m> {
    module: &'m mut Module,
    position: Option<InsertPoint>,
}

impl<'m> IrBuilder<'m> {
    pub fn new(module: &'m mut Module) -> Self {
        Self {
            module,
            position: None,
        }
    }

    pub fn module(&self) -> &Module {
        &*self.module
    }

    pub fn module_mut(&mut self) -> &mut Module {
        &mut *self.module
    }

    /// Append subsequent instructions to the end of `block`
    pub fn position_at_end(&mut self, block: Block) {
        self.module.ensure_block(block);
        trace!("Builder positioned at end of {:?}", block);
        self.position = Some(InsertPoint::AtEnd(block));
    }

    /// Insert subsequent instructions immediately before `inst`
    pub fn position_before(&mut self, inst: Value) {
        if self.module.inst_parent(inst).is_none() {
            IrError::DetachedPosition.fatal();
        }
        trace!("Builder positioned before {:?}", inst);
        self.position = Some(InsertPoint::Before(inst));
    }

    pub fn clear_position(&mut self) {
        self.position = None;
    }

    /// Block new instructions go into, if positioned
    pub fn insert_block(&self) -> Option<Block> {
        match self.position? {
            InsertPoint::AtEnd(block) => Some(block),
            InsertPoint::Before(inst) => self.module.inst_parent(inst),
            InsertPoint::Detached => None,
        }
    }

    /// Function being built
    pub fn current_function(&self) -> Function {
        let block = self.current_block();
        match self.module.block_parent(block) {
            Some(function) => function,
            None => IrError::NoInsertionPoint.fatal(),
        }
    }

    fn current_block(&self) -> Block {
        match self.insert_block() {
            Some(block) => block,
            None => IrError::NoInsertionPoint.fatal(),
        }
    }

    fn insert_point(&self) -> InsertPoint {
        match self.position {
            Some(InsertPoint::Detached) | None => IrError::NoInsertionPoint.fatal(),
            Some(at) => at,
        }
    }

    /// Append a new, optionally named block to the current function
    pub fn append_block(&mut self, name: &str) -> Block {
        let function = self.current_function();
        let block = self.module.create_block(function, None);
        if !name.is_empty() {
            self.module.set_block_name(block, name);
        }
        debug!("Appended block '{}' to {:?}", name, function);
        block
    }

    /// Whether the current block already ends in a terminator
    pub fn current_block_has_terminator(&self) -> bool {
        self.insert_block()
            .map_or(false, |block| self.module.terminator(block).is_some())
    }

    pub fn const_int(&mut self, value: ConstInt) -> Value {
        self.module.const_int(value)
    }

    pub fn const_unit(&mut self) -> Value {
        self.module.const_unit()
    }

    /// Binary operator; every operator yields the operands' type
    pub fn build_binary(&mut self, op: BinaryOp, lhs: Value, rhs: Value) -> Value {
        let at = self.insert_point();
        let ty = self.module.value_type(lhs);
        self.module.create_binary(op, lhs, rhs, ty, at)
    }

    pub fn build_alloca(&mut self, allocated: Type, num_elements: usize) -> Value {
        let at = self.insert_point();
        self.module.create_alloca(allocated, num_elements, at)
    }

    pub fn build_load(&mut self, ptr: Value) -> Value {
        let at = self.insert_point();
        self.module.create_load(ptr, at)
    }

    pub fn build_store(&mut self, value: Value, ptr: Value) -> Value {
        let at = self.insert_point();
        self.module.create_store(value, ptr, at)
    }

    pub fn build_offset(
        &mut self,
        element: Type,
        ptr: Value,
        indices: &[Value],
        bounds: &[Bound],
    ) -> Value {
        let at = self.insert_point();
        self.module.create_offset(element, ptr, indices, bounds, at)
    }

    pub fn build_call(&mut self, callee: Function, args: &[Value]) -> Value {
        let at = self.insert_point();
        self.module.create_call(callee, args, at)
    }

    pub fn build_ret(&mut self, value: Value) -> Value {
        let at = self.insert_point();
        self.module.create_ret(value, at)
    }

    pub fn build_jump(&mut self, dest: Block) -> Value {
        let at = self.insert_point();
        self.module.create_jump(dest, at)
    }

    pub fn build_br(&mut self, cond: Value, if_true: Block, if_false: Block) -> Value {
        let at = self.insert_point();
        self.module.create_br(cond, if_true, if_false, at)
    }

    pub fn build_panic(&mut self) -> Value {
        let at = self.insert_point();
        self.module.create_panic(at)
    }
}
