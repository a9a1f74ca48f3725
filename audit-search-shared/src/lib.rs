//! # Audit Search Shared
//!
//! This crate defines the value types shared between the audit search library
//! and its callers. The main type is [`QueryModel`], which describes a date
//! range plus exact-match and exclusion filters.

pub mod types;

pub use types::query_model::{QueryModel, DEFAULT_RESULT_SIZE};
