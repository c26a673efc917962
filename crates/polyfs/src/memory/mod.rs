//! In-memory provider implementations.
//!
//! These implement the two capability contracts over plain data structures
//! (BTreeMap trees, HashMap registries). They are the test substrate for the
//! routing layer and usable as lightweight building blocks; production
//! deployments substitute transport-backed providers behind the same
//! traits.

mod fs;
mod registry;

pub use fs::MemoryFsProvider;
pub use registry::MemoryTreeProvider;
