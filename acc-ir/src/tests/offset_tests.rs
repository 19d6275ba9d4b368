use super::unit_function;
use crate::{InsertPoint, Linkage, Module, Value};
use pretty_assertions::assert_eq;

/// `&g[i][j][k]` for a global `int g[3][4][5]`
fn offset_into_global(module: &mut Module, indices: &[Value]) -> Value {
    let block = module
        .get_function("f")
        .and_then(|f| module.entry_block(f))
        .expect("test function has an entry block");
    let i32_ty = module.integer_ty();
    let global = module.create_global(i32_ty, 60, Linkage::Internal, "g");
    module.create_offset(
        i32_ty,
        global,
        indices,
        &[None, Some(4), Some(5)],
        InsertPoint::AtEnd(block),
    )
}

#[test]
fn test_constant_offset_folds() {
    let (mut module, _, _) = unit_function();
    let indices = [module.const_int(1), module.const_int(2), module.const_int(3)];
    let offset = offset_into_global(&mut module, &indices);

    let mut total = 0;
    assert!(module.accumulate_constant_offset(offset, &mut total));
    assert_eq!(total, 33);
}

#[test]
fn test_constant_offset_accumulates() {
    let (mut module, _, _) = unit_function();
    let indices = [module.const_int(0), module.const_int(1), module.const_int(0)];
    let offset = offset_into_global(&mut module, &indices);

    let mut total = 100;
    assert!(module.accumulate_constant_offset(offset, &mut total));
    assert_eq!(total, 105);
}

#[test]
fn test_accumulator_overflow_does_not_fold() {
    let (mut module, _, _) = unit_function();
    let indices = [module.const_int(1), module.const_int(2), module.const_int(3)];
    let offset = offset_into_global(&mut module, &indices);

    let mut total = usize::MAX - 1;
    assert!(!module.accumulate_constant_offset(offset, &mut total));
    assert_eq!(total, usize::MAX - 1);
}

#[test]
fn test_non_constant_index_does_not_fold() {
    let (mut module, _, block) = unit_function();
    let i32_ty = module.integer_ty();
    let slot = module.create_alloca(i32_ty, 1, block.into());
    let loaded = module.create_load(slot, block.into());
    let indices = [module.const_int(1), loaded, module.const_int(3)];
    let offset = offset_into_global(&mut module, &indices);

    let mut total = 7;
    assert!(!module.accumulate_constant_offset(offset, &mut total));
    assert_eq!(total, 7);
}

#[test]
fn test_unconstrained_inner_bound_does_not_fold() {
    let (mut module, _, block) = unit_function();
    let i32_ty = module.integer_ty();
    let global = module.create_global(i32_ty, 8, Linkage::Internal, "h");
    let indices = [module.const_int(1), module.const_int(1)];
    let offset = module.create_offset(i32_ty, global, &indices, &[None, None], block.into());

    let mut total = 0;
    assert!(!module.accumulate_constant_offset(offset, &mut total));
    assert_eq!(total, 0);
}

#[test]
fn test_offset_accessors() {
    let (mut module, _, _) = unit_function();
    let indices = [module.const_int(1), module.const_int(2), module.const_int(3)];
    let offset = offset_into_global(&mut module, &indices);
    let global = module.get_global_variable("g");

    assert_eq!(module.offset_pointer(offset), global);
    assert_eq!(module.offset_element_type(offset), module.integer_ty());
    assert_eq!(module.offset_bounds(offset), &[None, Some(4), Some(5)]);
    assert_eq!(
        module.offset_indices(offset),
        indices.iter().copied().map(Some).collect::<Vec<_>>()
    );
    let i32_ptr = module.pointer_ty(module.integer_ty());
    assert_eq!(module.value_type(offset), i32_ptr);
}

#[test]
#[should_panic(expected = "Num of indices and bounds does not match")]
fn test_offset_arity_mismatch() {
    let (mut module, _, _) = unit_function();
    let indices = [module.const_int(1)];
    offset_into_global(&mut module, &indices);
}

#[test]
#[should_panic(expected = "Element type of offset does not match the type of pointer")]
fn test_offset_element_mismatch() {
    let (mut module, _, block) = unit_function();
    let i32_ty = module.integer_ty();
    let i32_ptr = module.pointer_ty(i32_ty);
    let slot = module.create_alloca(i32_ty, 1, block.into());
    let zero = module.const_int(0);
    module.create_offset(i32_ptr, slot, &[zero], &[None], block.into());
}
