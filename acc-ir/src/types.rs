//! IR type system
//!
//! Types are interned in a [`TypeContext`] and referred to through copyable
//! [`Type`] handles. Derived types (pointers and functions) are structurally
//! uniqued: asking twice for the same shape returns the same handle, so type
//! equality is handle equality.

use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Handle to a canonical type owned by a [`TypeContext`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Type(u32);

impl Type {
    /// The 32-bit integer type, present in every context
    pub const INTEGER: Type = Type(0);

    /// The unit type `()`, present in every context
    pub const UNIT: Type = Type(1);

    /// Raw index into the owning context
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Structural description of a type, also used as the uniquing key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeData {
    Integer,
    Unit,
    Pointer(Type),
    Function { result: Type, params: Vec<Type> },
}

/// Owner of every type created during one compilation.
///
/// Not shared between threads: concurrent compilations each own a context.
#[derive(Debug, Clone)]
pub struct TypeContext {
    types: Vec<TypeData>,
    interned: HashMap<TypeData, Type>,
}

impl TypeContext {
    pub fn new() -> Self {
        let mut ctx = Self {
            types: Vec::new(),
            interned: HashMap::new(),
        };
        let integer = ctx.intern(TypeData::Integer);
        let unit = ctx.intern(TypeData::Unit);
        debug_assert_eq!(integer, Type::INTEGER);
        debug_assert_eq!(unit, Type::UNIT);
        ctx
    }

    pub fn integer_ty(&self) -> Type {
        Type::INTEGER
    }

    pub fn unit_ty(&self) -> Type {
        Type::UNIT
    }

    /// Get the canonical pointer-to-`element` type
    pub fn pointer_ty(&mut self, element: Type) -> Type {
        self.intern(TypeData::Pointer(element))
    }

    /// Get the canonical function type for a signature
    pub fn function_ty(&mut self, result: Type, params: &[Type]) -> Type {
        self.intern(TypeData::Function {
            result,
            params: params.to_vec(),
        })
    }

    fn intern(&mut self, data: TypeData) -> Type {
        if let Some(&ty) = self.interned.get(&data) {
            return ty;
        }
        let ty = Type(self.types.len() as u32);
        trace!("Interned type #{} as {:?}", ty.0, data);
        self.types.push(data.clone());
        self.interned.insert(data, ty);
        ty
    }

    /// Structural description of `ty`
    pub fn data(&self, ty: Type) -> &TypeData {
        &self.types[ty.0 as usize]
    }

    /// Number of distinct types created so far
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn is_integer(&self, ty: Type) -> bool {
        matches!(self.data(ty), TypeData::Integer)
    }

    pub fn is_unit(&self, ty: Type) -> bool {
        matches!(self.data(ty), TypeData::Unit)
    }

    pub fn is_pointer(&self, ty: Type) -> bool {
        matches!(self.data(ty), TypeData::Pointer(_))
    }

    pub fn is_function(&self, ty: Type) -> bool {
        matches!(self.data(ty), TypeData::Function { .. })
    }

    /// Pointee of a pointer type
    pub fn pointer_element_type(&self, ty: Type) -> Option<Type> {
        match self.data(ty) {
            TypeData::Pointer(element) => Some(*element),
            _ => None,
        }
    }

    pub fn function_return_type(&self, ty: Type) -> Option<Type> {
        match self.data(ty) {
            TypeData::Function { result, .. } => Some(*result),
            _ => None,
        }
    }

    pub fn function_params(&self, ty: Type) -> Option<&[Type]> {
        match self.data(ty) {
            TypeData::Function { params, .. } => Some(params),
            _ => None,
        }
    }

    pub fn function_param_type(&self, ty: Type, index: usize) -> Option<Type> {
        self.function_params(ty)
            .and_then(|params| params.get(index).copied())
    }

    pub fn function_num_params(&self, ty: Type) -> Option<usize> {
        self.function_params(ty).map(|params| params.len())
    }

    /// Display adapter for `ty`
    pub fn display(&self, ty: Type) -> TypeDisplay<'_> {
        TypeDisplay { ctx: self, ty }
    }
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a type handle using its owning context
pub struct TypeDisplay<'a> {
    ctx: &'a TypeContext,
    ty: Type,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ctx.data(self.ty) {
            TypeData::Integer => write!(f, "i32"),
            TypeData::Unit => write!(f, "()"),
            TypeData::Pointer(element) => write!(f, "{}*", self.ctx.display(*element)),
            TypeData::Function { result, params } => {
                write!(f, "fn(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", self.ctx.display(*param))?;
                }
                write!(f, ") -> {}", self.ctx.display(*result))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_types() {
        let ctx = TypeContext::new();
        assert!(ctx.is_integer(ctx.integer_ty()));
        assert!(ctx.is_unit(ctx.unit_ty()));
        assert_ne!(ctx.integer_ty(), ctx.unit_ty());
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_type_display() {
        let mut ctx = TypeContext::new();
        let ptr = ctx.pointer_ty(Type::INTEGER);
        let ptr_ptr = ctx.pointer_ty(ptr);
        let func = ctx.function_ty(Type::UNIT, &[Type::INTEGER, ptr]);

        assert_eq!(ctx.display(ptr).to_string(), "i32*");
        assert_eq!(ctx.display(ptr_ptr).to_string(), "i32**");
        assert_eq!(ctx.display(func).to_string(), "fn(i32, i32*) -> ()");
    }
}
