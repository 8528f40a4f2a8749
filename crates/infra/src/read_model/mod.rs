//! Keyed storage abstractions backing the in-memory repositories.

pub mod keyed_store;

pub use keyed_store::{InMemoryKeyedStore, KeyedStore};
