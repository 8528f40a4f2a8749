//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Implemented by records that are addressed by key in a repository
/// (sources, source items, legacy stock items).
pub trait Entity {
    /// Strongly-typed entity key.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity key.
    fn id(&self) -> Self::Id;
}
