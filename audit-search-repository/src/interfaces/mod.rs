//! Interface definitions for the search client.
//!
//! This module defines the abstract `SearchClient` trait that allows
//! for dependency injection and swappable search backend implementations.

mod search_client;

pub use search_client::SearchClient;
