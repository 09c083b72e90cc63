//! scimx store - storage collaborator for the patch engine
//!
//! Provides:
//! - The `Db` port the orchestrator talks to: fetch, insert, optimistic
//!   replace with version compare-and-swap
//! - An in-memory implementation backing tests and single-process use
//!
//! The store never interprets patch semantics; it only guards resource
//! identity and version consistency.

pub mod db;
pub mod errors;
pub mod memory;

// Re-export key types
pub use db::{Db, Projection};
pub use errors::Result;
pub use memory::MemoryDb;
