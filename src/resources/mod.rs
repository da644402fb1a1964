//! Filesystem primitives the engine is built on.
pub mod backup;
pub mod helpers;
pub mod link;
pub mod repository;

/// Result of an idempotent operation.
///
/// # Examples
///
/// ```
/// use confix::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceChange {
    /// The filesystem was changed.
    Applied,
    /// The path was already in the desired state (no change needed).
    AlreadyCorrect,
}
