//! This module defines the data structures passed into audit searches.
//! It re-exports specific types like `QueryModel`.

pub mod query_model;

pub use query_model::QueryModel;
