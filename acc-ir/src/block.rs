//! Basic blocks
//!
//! A block is an ordered intrusive list of instructions, owned by at most
//! one function. Traversal is sequential only.

use crate::entities::{Block, Function, Value};
use crate::list::{Links, List, Node};
use crate::module::Module;
use acc_common::{ensure, IrError};
use log::{debug, trace};

#[derive(Debug, Default)]
pub(crate) struct BlockData {
    pub name: String,
    pub parent: Option<Function>,
    pub insts: List<Value>,
    pub links: Links<Block>,
}

impl Node<Block> for BlockData {
    fn links(&self) -> &Links<Block> {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Links<Block> {
        &mut self.links
    }
}

impl Module {
    /// Create a block in `parent`, before `insert_before` or at the end
    pub fn create_block(&mut self, parent: Function, insert_before: Option<Block>) -> Block {
        ensure(self.check_block_position(parent, insert_before));
        let block = self.create_detached_block();
        self.insert_block_into(block, parent, insert_before);
        block
    }

    /// Create a block owned by no function yet
    pub fn create_detached_block(&mut self) -> Block {
        let block = self.blocks.insert(BlockData::default());
        trace!("Created basic block {:?}", block);
        block
    }

    /// Link a detached block into `function`, before `insert_before` or at
    /// the end of the function
    pub fn insert_block_into(
        &mut self,
        block: Block,
        function: Function,
        insert_before: Option<Block>,
    ) {
        if self.block_data(block).parent.is_some() {
            IrError::BlockAlreadyAttached.fatal();
        }
        ensure(self.check_block_position(function, insert_before));
        self.functions[function]
            .blocks
            .insert_before(&mut self.blocks, block, insert_before);
        self.blocks[block].parent = Some(function);
        debug!("Inserted {:?} into {:?}", block, function);
    }

    fn check_block_position(&self, function: Function, pos: Option<Block>) -> Result<(), IrError> {
        let Some(data) = self.functions.get(function) else {
            return Err(IrError::ErasedEntity { entity: "function" });
        };
        if data.linkage.is_external() {
            return Err(IrError::BlockInDeclaration {
                name: data.name.clone(),
            });
        }
        match pos {
            Some(pos) if self.block_data(pos).parent != Some(function) => {
                Err(IrError::BlockNotInFunction)
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn ensure_block(&self, block: Block) {
        if !self.blocks.contains_key(block) {
            IrError::ErasedEntity { entity: "basic block" }.fatal();
        }
    }

    pub fn block_parent(&self, block: Block) -> Option<Function> {
        self.block_data(block).parent
    }

    pub fn block_name(&self, block: Block) -> Option<&str> {
        let name = &self.block_data(block).name;
        (!name.is_empty()).then_some(name.as_str())
    }

    pub fn block_has_name(&self, block: Block) -> bool {
        !self.block_data(block).name.is_empty()
    }

    pub fn set_block_name(&mut self, block: Block, name: &str) {
        self.ensure_block(block);
        self.blocks[block].name = name.to_string();
    }

    /// The terminator if the block is well formed.
    ///
    /// `None` for an empty block or one whose last instruction cannot end a
    /// block; callers must check.
    pub fn terminator(&self, block: Block) -> Option<Value> {
        let last = self.block_data(block).insts.last()?;
        self.is_terminator(last).then_some(last)
    }

    /// Instructions in order
    pub fn block_insts(&self, block: Block) -> impl DoubleEndedIterator<Item = Value> + '_ {
        self.block_data(block).insts.iter(&self.insts)
    }

    pub fn first_inst(&self, block: Block) -> Option<Value> {
        self.block_data(block).insts.first()
    }

    pub fn last_inst(&self, block: Block) -> Option<Value> {
        self.block_data(block).insts.last()
    }

    pub fn block_len(&self, block: Block) -> usize {
        self.block_data(block).insts.len()
    }

    pub fn block_is_empty(&self, block: Block) -> bool {
        self.block_data(block).insts.is_empty()
    }

    pub fn next_block(&self, block: Block) -> Option<Block> {
        self.block_data(block).links.next
    }

    pub fn prev_block(&self, block: Block) -> Option<Block> {
        self.block_data(block).links.prev
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inst::InsertPoint;
    use acc_common::Linkage;

    fn module_with_function() -> (Module, Function) {
        let mut module = Module::new("test");
        let unit = module.unit_ty();
        let fty = module.function_ty(unit, &[]);
        let function = module.create_function(fty, Linkage::Internal, "f");
        (module, function)
    }

    #[test]
    fn test_basic_block() {
        let (mut module, function) = module_with_function();
        let block = module.create_block(function, None);
        assert!(module.block_is_empty(block));
        assert_eq!(module.terminator(block), None);

        let unit = module.const_unit();
        let ret = module.create_ret(unit, InsertPoint::AtEnd(block));
        assert!(!module.block_is_empty(block));
        assert_eq!(module.terminator(block), Some(ret));
    }

    #[test]
    fn test_block_names() {
        let (mut module, function) = module_with_function();
        let block = module.create_block(function, None);
        assert!(!module.block_has_name(block));

        module.set_block_name(block, "entry");
        assert_eq!(module.block_name(block), Some("entry"));
    }

    #[test]
    #[should_panic(expected = "Expected detached basic block!")]
    fn test_block_inserted_twice() {
        let (mut module, function) = module_with_function();
        let block = module.create_block(function, None);
        module.insert_block_into(block, function, None);
    }
}
