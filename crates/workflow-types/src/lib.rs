//! Common types for the delivery status workflow.
//!
//! This crate defines the data model shared by all workflow components:
//! actor roles, status definitions with their flow, permission and
//! trigger metadata, the validated status catalog, and the transition
//! request/result types exchanged with the workflow engine.

/// Validated status catalog and catalog-level errors.
pub mod catalog;
/// Actor roles that read and mutate orders.
pub mod role;
/// Status definitions and their nested metadata sections.
pub mod status;
/// Transition request/result types and per-transition errors.
pub mod transition;

// Re-export all types for convenient access
pub use catalog::*;
pub use role::*;
pub use status::*;
pub use transition::*;
