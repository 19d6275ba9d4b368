use super::{init_logging, unit_function};
use crate::{Linkage, Module, ValueKind};
use pretty_assertions::assert_eq;

#[test]
fn test_function_and_global_order() {
    init_logging();
    let mut module = Module::new("order");
    let i32_ty = module.integer_ty();
    let fty = module.function_ty(i32_ty, &[]);
    let f = module.create_function(fty, Linkage::Internal, "f");
    let g = module.create_function(fty, Linkage::External, "g");
    let a = module.create_global(i32_ty, 1, Linkage::Internal, "a");
    let b = module.create_global(i32_ty, 10, Linkage::Internal, "b");

    assert_eq!(module.functions().collect::<Vec<_>>(), vec![f, g]);
    assert_eq!(module.functions().rev().collect::<Vec<_>>(), vec![g, f]);
    assert_eq!(module.globals().collect::<Vec<_>>(), vec![a, b]);
    assert_eq!(module.value_kind(a), ValueKind::GlobalVariable);
    assert!(module.has_external_linkage(g));
}

#[test]
fn test_blocks_in_layout_order() {
    let (mut module, function, entry) = unit_function();
    let exit = module.create_block(function, None);
    let middle = module.create_block(function, Some(exit));

    assert_eq!(
        module.blocks(function).collect::<Vec<_>>(),
        vec![entry, middle, exit]
    );
    assert_eq!(module.entry_block(function), Some(entry));
    assert_eq!(module.next_block(entry), Some(middle));
    assert_eq!(module.prev_block(exit), Some(middle));
    assert_eq!(module.block_parent(middle), Some(function));
    assert_eq!(module.num_blocks(function), 3);
}

#[test]
fn test_detached_block_insertion() {
    let (mut module, function, entry) = unit_function();
    let block = module.create_detached_block();
    assert_eq!(module.block_parent(block), None);

    module.insert_block_into(block, function, Some(entry));
    assert_eq!(module.entry_block(function), Some(block));
    assert_eq!(module.block_parent(block), Some(function));
}

#[test]
fn test_arguments() {
    init_logging();
    let mut module = Module::new("args");
    let i32_ty = module.integer_ty();
    let ptr = module.pointer_ty(i32_ty);
    let fty = module.function_ty(i32_ty, &[i32_ty, ptr]);
    let f = module.create_function(fty, Linkage::Internal, "f");

    let args = module.args(f).to_vec();
    assert_eq!(args.len(), 2);
    assert_eq!(module.value_type(args[1]), ptr);
    assert_eq!(
        module.value_kind(args[0]),
        ValueKind::Argument { function: f, arg_no: 0 }
    );

    module.set_name(args[0], "n");
    assert_eq!(module.value_name(args[0]), Some("n"));
}

#[test]
fn test_anonymous_symbols_are_unregistered() {
    init_logging();
    let mut module = Module::new("anon");
    let unit = module.unit_ty();
    let fty = module.function_ty(unit, &[]);
    module.create_function(fty, Linkage::Internal, "");
    module.create_function(fty, Linkage::Internal, "");

    assert_eq!(module.num_functions(), 2);
    assert_eq!(module.get_function(""), None);
}

#[test]
#[should_panic(expected = "Redefinition of symbol 'main'")]
fn test_duplicate_function() {
    init_logging();
    let mut module = Module::new("dup");
    let i32_ty = module.integer_ty();
    let fty = module.function_ty(i32_ty, &[]);
    module.create_function(fty, Linkage::Internal, "main");
    module.create_function(fty, Linkage::Internal, "main");
}

#[test]
#[should_panic(expected = "Argument index 3 out of range for function with 0 parameters")]
fn test_argument_out_of_range() {
    let (module, function, _) = unit_function();
    module.arg(function, 3);
}

#[test]
#[should_panic(expected = "Basic block to insert before does not belong to the target function")]
fn test_insert_block_before_foreign_block() {
    let (mut module, _, entry) = unit_function();
    let unit = module.unit_ty();
    let fty = module.function_ty(unit, &[]);
    let other = module.create_function(fty, Linkage::Internal, "other");
    module.create_block(other, Some(entry));
}

#[test]
#[should_panic(expected = "Cannot add a basic block to declaration 'ext'")]
fn test_declaration_rejects_blocks() {
    init_logging();
    let mut module = Module::new("decl");
    let unit = module.unit_ty();
    let fty = module.function_ty(unit, &[]);
    let decl = module.create_function(fty, Linkage::External, "ext");
    module.create_block(decl, None);
}

#[test]
#[should_panic(expected = "Cannot add a basic block to declaration 'ext'")]
fn test_declaration_rejects_detached_block() {
    init_logging();
    let mut module = Module::new("decl");
    let unit = module.unit_ty();
    let fty = module.function_ty(unit, &[]);
    let decl = module.create_function(fty, Linkage::External, "ext");
    let block = module.create_detached_block();
    module.insert_block_into(block, decl, None);
}
