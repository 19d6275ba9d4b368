mod container_tests;
mod offset_tests;

use crate::{Block, Function, Linkage, Module};

/// Route `log` output through the test harness; safe to call repeatedly
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A module holding `fn f() -> ()` with one empty block
pub(crate) fn unit_function() -> (Module, Function, Block) {
    init_logging();
    let mut module = Module::new("test");
    let unit = module.unit_ty();
    let fty = module.function_ty(unit, &[]);
    let function = module.create_function(fty, Linkage::Internal, "f");
    let block = module.create_block(function, None);
    (module, function, block)
}
