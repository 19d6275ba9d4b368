//! Opaque handles for IR entities.
//!
//! All references into the IR are versioned arena keys, not pointers. A key
//! outlives the entity it names: once an entity is erased its key stops
//! resolving instead of aliasing whatever reuses the slot.

use slotmap::new_key_type;

new_key_type! {
    /// Any typed entity usable as an operand: constants, arguments,
    /// global variables and instructions.
    pub struct Value;

    /// An edge from an instruction operand slot to the value it reads.
    pub struct Use;

    /// A basic block.
    pub struct Block;

    /// A function definition or declaration.
    pub struct Function;
}
