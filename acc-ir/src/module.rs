//! IR Module - the ownership root of a translation unit
//!
//! A `Module` owns every entity of the IR in arenas: values (constants,
//! arguments, globals, instructions), uses, basic blocks and functions, as
//! well as the type context. Handles are plain keys into those arenas; they
//! never own anything. Dropping the module drops the whole program.

use crate::block::BlockData;
use crate::entities::{Block, Function, Use, Value};
use crate::function::FunctionData;
use crate::global::GlobalData;
use crate::inst::InstData;
use crate::list::List;
use crate::types::{Type, TypeContext};
use crate::value::{UseData, ValueData};
use acc_common::IrError;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;

pub struct Module {
    name: String,
    pub(crate) types: TypeContext,

    pub(crate) values: SlotMap<Value, ValueData>,
    pub(crate) uses: SlotMap<Use, UseData>,
    pub(crate) insts: SecondaryMap<Value, InstData>,
    pub(crate) globals: SecondaryMap<Value, GlobalData>,
    pub(crate) blocks: SlotMap<Block, BlockData>,
    pub(crate) functions: SlotMap<Function, FunctionData>,

    pub(crate) function_list: List<Function>,
    pub(crate) global_list: List<Value>,
    pub(crate) function_table: HashMap<String, Function>,
    pub(crate) global_table: HashMap<String, Value>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_types(name, TypeContext::new())
    }

    /// Create a module reusing an existing type context
    pub fn with_types(name: impl Into<String>, types: TypeContext) -> Self {
        Self {
            name: name.into(),
            types,
            values: SlotMap::with_key(),
            uses: SlotMap::with_key(),
            insts: SecondaryMap::new(),
            globals: SecondaryMap::new(),
            blocks: SlotMap::with_key(),
            functions: SlotMap::with_key(),
            function_list: List::default(),
            global_list: List::default(),
            function_table: HashMap::new(),
            global_table: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &TypeContext {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeContext {
        &mut self.types
    }

    /// Give the type context back, dropping every other entity
    pub fn into_types(self) -> TypeContext {
        self.types
    }

    pub fn integer_ty(&self) -> Type {
        self.types.integer_ty()
    }

    pub fn unit_ty(&self) -> Type {
        self.types.unit_ty()
    }

    pub fn pointer_ty(&mut self, element: Type) -> Type {
        self.types.pointer_ty(element)
    }

    pub fn function_ty(&mut self, result: Type, params: &[Type]) -> Type {
        self.types.function_ty(result, params)
    }

    /// Look up the specified function in the module symbol table.
    pub fn get_function(&self, name: &str) -> Option<Function> {
        self.function_table.get(name).copied()
    }

    /// Look up the specified global variable in the module symbol table.
    pub fn get_global_variable(&self, name: &str) -> Option<Value> {
        self.global_table.get(name).copied()
    }

    /// Functions in creation order
    pub fn functions(&self) -> impl DoubleEndedIterator<Item = Function> + '_ {
        self.function_list.iter(&self.functions)
    }

    /// Global variables in creation order
    pub fn globals(&self) -> impl DoubleEndedIterator<Item = Value> + '_ {
        self.global_list.iter(&self.globals)
    }

    pub fn num_functions(&self) -> usize {
        self.function_list.len()
    }

    pub fn num_globals(&self) -> usize {
        self.global_list.len()
    }

    pub(crate) fn value_data(&self, value: Value) -> &ValueData {
        match self.values.get(value) {
            Some(data) => data,
            None => IrError::ErasedEntity { entity: "value" }.fatal(),
        }
    }

    pub(crate) fn value_data_mut(&mut self, value: Value) -> &mut ValueData {
        match self.values.get_mut(value) {
            Some(data) => data,
            None => IrError::ErasedEntity { entity: "value" }.fatal(),
        }
    }

    pub(crate) fn use_data(&self, u: Use) -> &UseData {
        match self.uses.get(u) {
            Some(data) => data,
            None => IrError::ErasedEntity { entity: "use" }.fatal(),
        }
    }

    pub(crate) fn inst_data(&self, inst: Value) -> &InstData {
        match self.insts.get(inst) {
            Some(data) => data,
            None if self.values.contains_key(inst) => IrError::NotAnInstruction.fatal(),
            None => IrError::ErasedEntity { entity: "instruction" }.fatal(),
        }
    }

    pub(crate) fn global_data(&self, global: Value) -> &GlobalData {
        match self.globals.get(global) {
            Some(data) => data,
            None if self.values.contains_key(global) => IrError::NotAGlobal.fatal(),
            None => IrError::ErasedEntity { entity: "global variable" }.fatal(),
        }
    }

    pub(crate) fn block_data(&self, block: Block) -> &BlockData {
        match self.blocks.get(block) {
            Some(data) => data,
            None => IrError::ErasedEntity { entity: "basic block" }.fatal(),
        }
    }

    pub(crate) fn function_data(&self, function: Function) -> &FunctionData {
        match self.functions.get(function) {
            Some(data) => data,
            None => IrError::ErasedEntity { entity: "function" }.fatal(),
        }
    }
}
