//! Instructions
//!
//! An instruction is a [`Value`] that also occupies a slot in a basic
//! block's instruction list. Its operands are [`Use`] edges, one per slot,
//! fixed at creation. Block and function references held by control-flow
//! instructions and calls are plain handles: they are not operands and do
//! not own what they name.

mod check;
mod create;
mod offset;
mod opcode;

pub use create::InsertPoint;
pub use offset::strides;
pub use opcode::{BinaryOp, Opcode};

use crate::entities::{Block, Function, Use, Value};
use crate::list::{Links, Node};
use crate::module::Module;
use crate::types::Type;
use acc_common::{ensure, Bound, IrError};
use log::{debug, warn};

/// Opcode plus the non-operand payload of each instruction kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstKind {
    Binary(BinaryOp),
    Alloca { allocated: Type, num_elements: usize },
    Load,
    Store,
    Offset { element: Type, bounds: Vec<Bound> },
    Call { callee: Function },
    Ret,
    Jump { dest: Block },
    Br { if_true: Block, if_false: Block },
    Panic,
}

impl InstKind {
    pub fn opcode(&self) -> Opcode {
        match self {
            InstKind::Binary(op) => Opcode::from(*op),
            InstKind::Alloca { .. } => Opcode::Alloca,
            InstKind::Load => Opcode::Load,
            InstKind::Store => Opcode::Store,
            InstKind::Offset { .. } => Opcode::Offset,
            InstKind::Call { .. } => Opcode::Call,
            InstKind::Ret => Opcode::Ret,
            InstKind::Jump { .. } => Opcode::Jump,
            InstKind::Br { .. } => Opcode::Br,
            InstKind::Panic => Opcode::Panic,
        }
    }
}

#[derive(Debug)]
pub(crate) struct InstData {
    pub kind: InstKind,
    pub operands: Vec<Use>,
    pub parent: Option<Block>,
    pub links: Links<Value>,
}

impl Node<Value> for InstData {
    fn links(&self) -> &Links<Value> {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Links<Value> {
        &mut self.links
    }
}

impl Module {
    pub fn inst_kind(&self, inst: Value) -> &InstKind {
        &self.inst_data(inst).kind
    }

    pub fn opcode(&self, inst: Value) -> Opcode {
        self.inst_data(inst).kind.opcode()
    }

    pub fn is_terminator(&self, inst: Value) -> bool {
        self.opcode(inst).is_terminator()
    }

    pub fn is_binary_op(&self, inst: Value) -> bool {
        self.opcode(inst).is_binary_op()
    }

    /// The basic block holding `inst`, `None` while detached
    pub fn inst_parent(&self, inst: Value) -> Option<Block> {
        self.inst_data(inst).parent
    }

    pub fn num_operands(&self, inst: Value) -> usize {
        self.inst_data(inst).operands.len()
    }

    /// Operand slots in order
    pub fn operand_uses(&self, inst: Value) -> &[Use] {
        &self.inst_data(inst).operands
    }

    pub fn operand_use(&self, inst: Value, index: usize) -> Use {
        let data = self.inst_data(inst);
        match data.operands.get(index) {
            Some(&u) => u,
            None => IrError::OperandOutOfRange {
                opcode: data.kind.opcode().to_string(),
                index,
                count: data.operands.len(),
            }
            .fatal(),
        }
    }

    /// Value read by operand `index`, `None` if that slot was detached
    pub fn operand(&self, inst: Value, index: usize) -> Option<Value> {
        self.use_value(self.operand_use(inst, index))
    }

    pub fn operands(&self, inst: Value) -> impl Iterator<Item = Option<Value>> + '_ {
        self.inst_data(inst)
            .operands
            .iter()
            .map(move |&u| self.uses[u].value)
    }

    pub fn set_operand(&mut self, inst: Value, index: usize, value: Value) {
        let u = self.operand_use(inst, index);
        self.set_use(u, Some(value));
    }

    pub fn next_inst(&self, inst: Value) -> Option<Value> {
        self.inst_data(inst).links.next
    }

    pub fn prev_inst(&self, inst: Value) -> Option<Value> {
        self.inst_data(inst).links.prev
    }

    /// Insert a detached instruction immediately before `pos`
    pub fn insert_before(&mut self, inst: Value, pos: Value) {
        ensure(self.check_detached(inst));
        let Some(block) = self.inst_data(pos).parent else {
            IrError::DetachedPosition.fatal()
        };
        self.blocks[block]
            .insts
            .insert_before(&mut self.insts, inst, Some(pos));
        self.insts[inst].parent = Some(block);
        debug!("Inserted {:?} before {:?} in {:?}", inst, pos, block);
    }

    /// Insert a detached instruction immediately after `pos`
    pub fn insert_after(&mut self, inst: Value, pos: Value) {
        ensure(self.check_detached(inst));
        let Some(block) = self.inst_data(pos).parent else {
            IrError::DetachedPosition.fatal()
        };
        self.blocks[block]
            .insts
            .insert_after(&mut self.insts, inst, pos);
        self.insts[inst].parent = Some(block);
        debug!("Inserted {:?} after {:?} in {:?}", inst, pos, block);
    }

    /// Insert a detached instruction into `block` before `before`, or at the
    /// end of the block when `before` is `None`
    pub fn insert_into(&mut self, inst: Value, block: Block, before: Option<Value>) {
        ensure(self.check_detached(inst));
        if !self.blocks.contains_key(block) {
            IrError::ErasedEntity { entity: "basic block" }.fatal();
        }
        if let Some(pos) = before {
            if self.inst_data(pos).parent != Some(block) {
                IrError::PositionNotInBlock.fatal();
            }
        }
        self.blocks[block]
            .insts
            .insert_before(&mut self.insts, inst, before);
        self.insts[inst].parent = Some(block);
        debug!("Inserted {:?} into {:?}", inst, block);
    }

    /// Unlink `inst` from its block without destroying it.
    ///
    /// Operands stay attached, so the instruction can be inserted again.
    pub fn remove_from_parent(&mut self, inst: Value) {
        let Some(block) = self.inst_data(inst).parent else {
            IrError::InstructionNotAttached.fatal()
        };
        self.blocks[block].insts.remove(&mut self.insts, inst);
        self.insts[inst].parent = None;
        debug!("Removed {:?} from {:?}", inst, block);
    }

    /// Unlink `inst` and destroy it, returning the instruction that followed.
    ///
    /// All operand uses are detached from their targets. Uses of the result
    /// are left alone: redirect them first, or they keep naming an erased
    /// value.
    pub fn erase_from_parent(&mut self, inst: Value) -> Option<Value> {
        let next = match self.inst_data(inst).parent {
            Some(_) => {
                let next = self.next_inst(inst);
                self.remove_from_parent(inst);
                next
            }
            None => None,
        };
        let num_uses = self.num_uses(inst);
        if num_uses > 0 {
            warn!("Erasing {:?} while it still has {} uses", inst, num_uses);
        }
        if let Some(data) = self.insts.remove(inst) {
            for u in data.operands {
                self.drop_use(u);
            }
        }
        self.values.remove(inst);
        debug!("Erased {:?}", inst);
        next
    }

    /// Stored value of a `store`
    pub fn store_value(&self, inst: Value) -> Option<Value> {
        self.expect_opcode(inst, Opcode::Store);
        self.operand(inst, 0)
    }

    /// Destination pointer of a `store`
    pub fn store_pointer(&self, inst: Value) -> Option<Value> {
        self.expect_opcode(inst, Opcode::Store);
        self.operand(inst, 1)
    }

    pub fn load_pointer(&self, inst: Value) -> Option<Value> {
        self.expect_opcode(inst, Opcode::Load);
        self.operand(inst, 0)
    }

    pub fn offset_pointer(&self, inst: Value) -> Option<Value> {
        self.expect_opcode(inst, Opcode::Offset);
        self.operand(inst, 0)
    }

    /// Index operands of an `offset`, outermost dimension first
    pub fn offset_indices(&self, inst: Value) -> Vec<Option<Value>> {
        self.expect_opcode(inst, Opcode::Offset);
        self.operands(inst).skip(1).collect()
    }

    /// Type of each element an `alloca` reserves
    pub fn alloca_allocated_type(&self, inst: Value) -> Type {
        match self.inst_kind(inst) {
            InstKind::Alloca { allocated, .. } => *allocated,
            kind => self.wrong_opcode(Opcode::Alloca, kind.opcode()),
        }
    }

    pub fn alloca_num_elements(&self, inst: Value) -> usize {
        match self.inst_kind(inst) {
            InstKind::Alloca { num_elements, .. } => *num_elements,
            kind => self.wrong_opcode(Opcode::Alloca, kind.opcode()),
        }
    }

    pub fn offset_element_type(&self, inst: Value) -> Type {
        match self.inst_kind(inst) {
            InstKind::Offset { element, .. } => *element,
            kind => self.wrong_opcode(Opcode::Offset, kind.opcode()),
        }
    }

    /// Per-dimension bounds of an `offset`, parallel to its indices
    pub fn offset_bounds(&self, inst: Value) -> &[Bound] {
        match self.inst_kind(inst) {
            InstKind::Offset { bounds, .. } => bounds.as_slice(),
            kind => self.wrong_opcode(Opcode::Offset, kind.opcode()),
        }
    }

    pub fn ret_value(&self, inst: Value) -> Option<Value> {
        self.expect_opcode(inst, Opcode::Ret);
        self.operand(inst, 0)
    }

    pub fn branch_condition(&self, inst: Value) -> Option<Value> {
        self.expect_opcode(inst, Opcode::Br);
        self.operand(inst, 0)
    }

    pub fn jump_dest(&self, inst: Value) -> Block {
        match self.inst_kind(inst) {
            InstKind::Jump { dest } => *dest,
            kind => self.wrong_opcode(Opcode::Jump, kind.opcode()),
        }
    }

    /// Block taken by a `br` when its condition is non-zero
    pub fn br_true_block(&self, inst: Value) -> Block {
        match self.inst_kind(inst) {
            InstKind::Br { if_true, .. } => *if_true,
            kind => self.wrong_opcode(Opcode::Br, kind.opcode()),
        }
    }

    pub fn br_false_block(&self, inst: Value) -> Block {
        match self.inst_kind(inst) {
            InstKind::Br { if_false, .. } => *if_false,
            kind => self.wrong_opcode(Opcode::Br, kind.opcode()),
        }
    }

    /// Called function of a `call`
    pub fn callee(&self, inst: Value) -> Function {
        match self.inst_kind(inst) {
            InstKind::Call { callee } => *callee,
            kind => self.wrong_opcode(Opcode::Call, kind.opcode()),
        }
    }

    /// Blocks control may transfer to from a terminator
    pub fn successors(&self, inst: Value) -> Vec<Block> {
        match self.inst_kind(inst) {
            InstKind::Jump { dest } => vec![*dest],
            InstKind::Br { if_true, if_false } => vec![*if_true, *if_false],
            _ => Vec::new(),
        }
    }

    fn expect_opcode(&self, inst: Value, expected: Opcode) {
        let found = self.opcode(inst);
        if found != expected {
            self.wrong_opcode(expected, found);
        }
    }

    fn wrong_opcode(&self, expected: Opcode, found: Opcode) -> ! {
        IrError::UnexpectedOpcode {
            expected: expected.to_string(),
            found: found.to_string(),
        }
        .fatal()
    }
}
