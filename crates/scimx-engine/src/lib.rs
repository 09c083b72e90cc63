//! scimx Engine - Patch orchestration layer
//!
//! Provides the request-level patch state machine that coordinates payload
//! validation, storage access, resource filters, and the optimistic commit.

pub mod filter;
pub mod patch;
