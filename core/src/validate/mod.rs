//! Specification validation.
//!
//! Two independent checks gate every PSPEC revision before it may be
//! persisted as usable: structural conformance against the external
//! schema contract, and manufacturability of the derived quantities.
//! Both report every violation in one pass.

pub mod manufacturability;
pub mod schema;
