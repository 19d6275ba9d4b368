//! Values and the def-use graph
//!
//! Every value keeps an intrusive list of the [`Use`] edges that read it.
//! Every instruction keeps an ordered vector of its operand `Use`s. A use is
//! therefore a member of two collections at once, and [`Module::set_use`] is
//! the single primitive that moves it between user lists so both sides stay
//! consistent.

use crate::entities::{Function, Use, Value};
use crate::list::{Links, List, Node};
use crate::module::Module;
use crate::types::Type;
use acc_common::{ConstInt, IrError};
use log::{debug, trace};

/// Closed set of value kinds.
///
/// Assigned at construction and never changed; it replaces dynamic type
/// inspection of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    ConstantInt(ConstInt),
    ConstantUnit,
    Argument { function: Function, arg_no: usize },
    GlobalVariable,
    Instruction,
}

impl ValueKind {
    pub fn is_constant(&self) -> bool {
        matches!(self, ValueKind::ConstantInt(_) | ValueKind::ConstantUnit)
    }

    pub fn is_instruction(&self) -> bool {
        matches!(self, ValueKind::Instruction)
    }
}

#[derive(Debug)]
pub(crate) struct ValueData {
    pub ty: Type,
    pub kind: ValueKind,
    pub name: String,
    pub users: List<Use>,
}

impl ValueData {
    pub fn new(ty: Type, kind: ValueKind) -> Self {
        Self {
            ty,
            kind,
            name: String::new(),
            users: List::default(),
        }
    }
}

/// Edge from an operand slot of `user` to the value it currently reads
#[derive(Debug)]
pub(crate) struct UseData {
    pub user: Value,
    pub value: Option<Value>,
    pub links: Links<Use>,
}

impl Node<Use> for UseData {
    fn links(&self) -> &Links<Use> {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Links<Use> {
        &mut self.links
    }
}

impl Module {
    /// Create an integer constant
    pub fn const_int(&mut self, value: ConstInt) -> Value {
        let ty = self.types.integer_ty();
        self.values.insert(ValueData::new(ty, ValueKind::ConstantInt(value)))
    }

    /// Create the unit constant `()`
    pub fn const_unit(&mut self) -> Value {
        let ty = self.types.unit_ty();
        self.values.insert(ValueData::new(ty, ValueKind::ConstantUnit))
    }

    pub fn value_type(&self, value: Value) -> Type {
        self.value_data(value).ty
    }

    pub fn value_kind(&self, value: Value) -> ValueKind {
        self.value_data(value).kind
    }

    pub fn is_constant(&self, value: Value) -> bool {
        self.value_kind(value).is_constant()
    }

    pub fn is_instruction(&self, value: Value) -> bool {
        self.value_kind(value).is_instruction()
    }

    /// Payload of an integer constant, `None` for any other value
    pub fn const_int_value(&self, value: Value) -> Option<ConstInt> {
        match self.value_kind(value) {
            ValueKind::ConstantInt(n) => Some(n),
            _ => None,
        }
    }

    /// Whether `value` still names a live entity
    pub fn contains_value(&self, value: Value) -> bool {
        self.values.contains_key(value)
    }

    pub fn value_name(&self, value: Value) -> Option<&str> {
        let name = &self.value_data(value).name;
        (!name.is_empty()).then_some(name.as_str())
    }

    pub fn has_name(&self, value: Value) -> bool {
        !self.value_data(value).name.is_empty()
    }

    /// Name a value. Constants have no name and ignore the request.
    ///
    /// Renaming a global variable updates the module symbol table.
    pub fn set_name(&mut self, value: Value, name: &str) {
        let data = self.value_data(value);
        if data.kind.is_constant() {
            return;
        }
        if data.kind == ValueKind::GlobalVariable {
            let old = data.name.clone();
            self.rename_global(value, &old, name);
        }
        self.value_data_mut(value).name = name.to_string();
    }

    /// Uses currently reading `value`.
    ///
    /// The walk follows the list links lazily; each call starts over from the
    /// current head.
    pub fn users(&self, value: Value) -> impl DoubleEndedIterator<Item = Use> + '_ {
        self.value_data(value).users.iter(&self.uses)
    }

    /// Instructions reading `value`, once per operand slot
    pub fn user_values(&self, value: Value) -> impl Iterator<Item = Value> + '_ {
        self.users(value).map(move |u| self.uses[u].user)
    }

    pub fn num_uses(&self, value: Value) -> usize {
        self.value_data(value).users.len()
    }

    pub fn has_uses(&self, value: Value) -> bool {
        !self.value_data(value).users.is_empty()
    }

    /// The instruction owning this operand slot
    pub fn use_user(&self, u: Use) -> Value {
        self.use_data(u).user
    }

    /// The value this use reads, `None` once detached
    pub fn use_value(&self, u: Use) -> Option<Value> {
        self.use_data(u).value
    }

    /// Point `u` at `target`.
    ///
    /// The use leaves its old target's user list and joins the new one;
    /// `None` detaches it. Retargeting to the current value is a no-op.
    pub fn set_use(&mut self, u: Use, target: Option<Value>) {
        let old = self.use_data(u).value;
        if old == target {
            return;
        }
        if let Some(new) = target {
            if !self.values.contains_key(new) {
                IrError::ErasedEntity { entity: "value" }.fatal();
            }
        }
        if let Some(old) = old {
            match self.values.get_mut(old) {
                Some(data) => data.users.remove(&mut self.uses, u),
                // The old target was erased while still in use; its list is gone.
                None => self.uses[u].links = Links::default(),
            }
        }
        self.uses[u].value = target;
        if let Some(new) = target {
            self.values[new].users.push_back(&mut self.uses, u);
        }
        trace!("Use {:?} retargeted from {:?} to {:?}", u, old, target);
    }

    /// Move the membership of `from` into `into`.
    ///
    /// `into` ends up reading what `from` read, and `from` ends up detached,
    /// so the target's user list holds exactly one of the two.
    pub fn transfer_use(&mut self, from: Use, into: Use) {
        let target = self.use_data(from).value;
        self.set_use(from, None);
        self.set_use(into, target);
    }

    /// Redirect every use of `value` to `new_value`.
    ///
    /// Redirecting a use unlinks it from the list being walked, so the uses
    /// are collected before any of them is touched.
    pub fn replace_all_uses_with(&mut self, value: Value, new_value: Value) {
        let uses: Vec<Use> = self.users(value).collect();
        debug!(
            "Replacing {} uses of {:?} with {:?}",
            uses.len(),
            value,
            new_value
        );
        for u in uses {
            self.set_use(u, Some(new_value));
        }
    }

    /// Allocate a detached operand slot owned by `user`
    pub(crate) fn new_use(&mut self, user: Value) -> Use {
        self.uses.insert(UseData {
            user,
            value: None,
            links: Links::default(),
        })
    }

    /// Detach and free an operand slot
    pub(crate) fn drop_use(&mut self, u: Use) {
        self.set_use(u, None);
        self.uses.remove(u);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        let mut module = Module::new("test");
        let forty_two = module.const_int(42);
        let unit = module.const_unit();

        assert_eq!(module.const_int_value(forty_two), Some(42));
        assert_eq!(module.const_int_value(unit), None);
        assert_eq!(module.value_type(forty_two), Type::INTEGER);
        assert_eq!(module.value_type(unit), Type::UNIT);
        assert!(module.is_constant(forty_two));
        assert!(!module.is_instruction(unit));
    }

    #[test]
    fn test_constants_are_unnamed() {
        let mut module = Module::new("test");
        let zero = module.const_int(0);
        module.set_name(zero, "zero");
        assert!(!module.has_name(zero));
        assert_eq!(module.value_name(zero), None);
    }
}
