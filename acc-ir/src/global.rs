//! Global variables
//!
//! A global variable is a value naming a module-scope region of
//! `num_elements` values of its element type. The value itself has the
//! pointer-to-element type.

use crate::entities::Value;
use crate::list::{Links, Node};
use crate::module::Module;
use crate::types::Type;
use crate::value::{ValueData, ValueKind};
use acc_common::{IrError, Linkage};
use log::trace;

#[derive(Debug)]
pub(crate) struct GlobalData {
    pub element: Type,
    pub num_elements: usize,
    pub linkage: Linkage,
    pub links: Links<Value>,
}

impl Node<Value> for GlobalData {
    fn links(&self) -> &Links<Value> {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Links<Value> {
        &mut self.links
    }
}

impl Module {
    /// Create a global region and register it under `name`.
    ///
    /// An empty name leaves the global out of the symbol table.
    pub fn create_global(
        &mut self,
        element: Type,
        num_elements: usize,
        linkage: Linkage,
        name: &str,
    ) -> Value {
        if !name.is_empty() && self.global_table.contains_key(name) {
            IrError::DuplicateSymbol {
                name: name.to_string(),
            }
            .fatal();
        }
        let ty = self.types.pointer_ty(element);
        let mut data = ValueData::new(ty, ValueKind::GlobalVariable);
        data.name = name.to_string();
        let global = self.values.insert(data);
        self.globals.insert(
            global,
            GlobalData {
                element,
                num_elements,
                linkage,
                links: Links::default(),
            },
        );
        self.global_list.push_back(&mut self.globals, global);
        if !name.is_empty() {
            self.global_table.insert(name.to_string(), global);
        }
        trace!("Created global '{}' {:?}", name, global);
        global
    }

    /// Element type of the region, e.g. `i32` for `@a : region i32, 2`
    pub fn global_element_type(&self, global: Value) -> Type {
        self.global_data(global).element
    }

    pub fn global_num_elements(&self, global: Value) -> usize {
        self.global_data(global).num_elements
    }

    pub fn global_linkage(&self, global: Value) -> Linkage {
        self.global_data(global).linkage
    }

    pub(crate) fn rename_global(&mut self, global: Value, old: &str, new: &str) {
        if old == new {
            return;
        }
        if !new.is_empty() && self.global_table.contains_key(new) {
            IrError::DuplicateSymbol {
                name: new.to_string(),
            }
            .fatal();
        }
        if !old.is_empty() {
            self.global_table.remove(old);
        }
        if !new.is_empty() {
            self.global_table.insert(new.to_string(), global);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_variable() {
        let mut module = Module::new("test");
        let i32_ty = module.integer_ty();
        let global = module.create_global(i32_ty, 2, Linkage::External, "a");

        assert_eq!(module.global_element_type(global), i32_ty);
        assert_eq!(module.global_num_elements(global), 2);
        assert!(module.global_linkage(global).is_external());
        let ptr = module.pointer_ty(i32_ty);
        assert_eq!(module.value_type(global), ptr);
        assert_eq!(module.value_name(global), Some("a"));
    }

    #[test]
    fn test_rename_global_updates_table() {
        let mut module = Module::new("test");
        let i32_ty = module.integer_ty();
        let global = module.create_global(i32_ty, 1, Linkage::Internal, "old");

        module.set_name(global, "new");
        assert_eq!(module.get_global_variable("old"), None);
        assert_eq!(module.get_global_variable("new"), Some(global));
    }

    #[test]
    #[should_panic(expected = "Redefinition of symbol 'x'")]
    fn test_duplicate_global() {
        let mut module = Module::new("test");
        let i32_ty = module.integer_ty();
        module.create_global(i32_ty, 1, Linkage::Internal, "x");
        module.create_global(i32_ty, 1, Linkage::Internal, "x");
    }
}
