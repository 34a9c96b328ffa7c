//! GLL data structures and the exploration engine built on top of them:
//! grammar slots, descriptors, the call-return forest's keys, BSR nodes,
//! and the engine itself.

pub mod bsr;
pub mod descriptor;
pub mod engine;
pub mod slot;

pub use bsr::BsrNode;
pub use descriptor::{CallRecord, CallReturnAddress, Descriptor};
pub use engine::Parser;
pub use slot::GrammarSlot;
