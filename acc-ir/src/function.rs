//! Functions
//!
//! A function owns an ordered list of basic blocks, the first being the
//! entry block, and a fixed array of arguments sized from its signature.
//! Declarations (external linkage) have no blocks.

use crate::entities::{Block, Function, Value};
use crate::list::{Links, List, Node};
use crate::module::Module;
use crate::types::Type;
use crate::value::{ValueData, ValueKind};
use acc_common::{IrError, Linkage};
use log::trace;

#[derive(Debug)]
pub(crate) struct FunctionData {
    pub name: String,
    pub ty: Type,
    pub linkage: Linkage,
    pub args: Vec<Value>,
    pub blocks: List<Block>,
    pub links: Links<Function>,
}

impl Node<Function> for FunctionData {
    fn links(&self) -> &Links<Function> {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Links<Function> {
        &mut self.links
    }
}

impl Module {
    /// Create a function of type `ty` and register it under `name`.
    ///
    /// An empty name leaves the function out of the symbol table.
    pub fn create_function(&mut self, ty: Type, linkage: Linkage, name: &str) -> Function {
        let Some(params) = self.types.function_params(ty).map(<[Type]>::to_vec) else {
            IrError::ExpectedFunctionType {
                found: self.type_name(ty),
            }
            .fatal()
        };
        if !name.is_empty() && self.function_table.contains_key(name) {
            IrError::DuplicateSymbol {
                name: name.to_string(),
            }
            .fatal();
        }

        let function = self.functions.insert(FunctionData {
            name: name.to_string(),
            ty,
            linkage,
            args: Vec::with_capacity(params.len()),
            blocks: List::default(),
            links: Links::default(),
        });
        let args: Vec<Value> = params
            .into_iter()
            .enumerate()
            .map(|(arg_no, param)| {
                let kind = ValueKind::Argument { function, arg_no };
                self.values.insert(ValueData::new(param, kind))
            })
            .collect();
        self.functions[function].args = args;

        self.function_list.push_back(&mut self.functions, function);
        if !name.is_empty() {
            self.function_table.insert(name.to_string(), function);
        }
        trace!("Created function '{}' {:?}", name, function);
        function
    }

    pub fn function_name(&self, function: Function) -> &str {
        &self.function_data(function).name
    }

    /// The function's signature
    pub fn function_type(&self, function: Function) -> Type {
        self.function_data(function).ty
    }

    pub fn function_return_type(&self, function: Function) -> Type {
        let ty = self.function_data(function).ty;
        match self.types.function_return_type(ty) {
            Some(result) => result,
            None => unreachable!("functions always carry a function type"),
        }
    }

    pub fn function_num_params(&self, function: Function) -> usize {
        self.function_data(function).args.len()
    }

    pub fn function_linkage(&self, function: Function) -> Linkage {
        self.function_data(function).linkage
    }

    /// Whether the function is only declared here
    pub fn has_external_linkage(&self, function: Function) -> bool {
        self.function_data(function).linkage.is_external()
    }

    pub fn args(&self, function: Function) -> &[Value] {
        &self.function_data(function).args
    }

    pub fn arg(&self, function: Function, index: usize) -> Value {
        let args = self.args(function);
        match args.get(index) {
            Some(&arg) => arg,
            None => IrError::ArgumentOutOfRange {
                index,
                count: args.len(),
            }
            .fatal(),
        }
    }

    /// Position of an argument in its function's parameter list
    pub fn arg_no(&self, arg: Value) -> Option<usize> {
        match self.value_kind(arg) {
            ValueKind::Argument { arg_no, .. } => Some(arg_no),
            _ => None,
        }
    }

    /// Function owning an argument
    pub fn arg_parent(&self, arg: Value) -> Option<Function> {
        match self.value_kind(arg) {
            ValueKind::Argument { function, .. } => Some(function),
            _ => None,
        }
    }

    /// First block of the function, `None` for declarations
    pub fn entry_block(&self, function: Function) -> Option<Block> {
        self.function_data(function).blocks.first()
    }

    /// Blocks in layout order
    pub fn blocks(&self, function: Function) -> impl DoubleEndedIterator<Item = Block> + '_ {
        self.function_data(function).blocks.iter(&self.blocks)
    }

    pub fn num_blocks(&self, function: Function) -> usize {
        self.function_data(function).blocks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function() {
        let mut module = Module::new("test");
        let i32_ty = module.integer_ty();
        let fty = module.function_ty(i32_ty, &[i32_ty, i32_ty]);
        let function = module.create_function(fty, Linkage::Internal, "add");

        assert_eq!(module.function_name(function), "add");
        assert_eq!(module.function_num_params(function), 2);
        assert_eq!(module.function_return_type(function), i32_ty);
        assert!(!module.has_external_linkage(function));
        assert_eq!(module.entry_block(function), None);

        let second = module.arg(function, 1);
        assert_eq!(module.arg_no(second), Some(1));
        assert_eq!(module.arg_parent(second), Some(function));
        assert_eq!(module.value_type(second), i32_ty);
    }

    #[test]
    #[should_panic(expected = "Expected a function type")]
    fn test_function_needs_function_type() {
        let mut module = Module::new("test");
        let i32_ty = module.integer_ty();
        module.create_function(i32_ty, Linkage::Internal, "bad");
    }
}
