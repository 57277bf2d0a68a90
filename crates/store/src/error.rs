use thiserror::Error;

/// Errors produced by storage backends.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// A table lock was poisoned by a panicking writer.
    #[error("storage lock poisoned: {0}")]
    Poisoned(&'static str),
    /// A lookup that requires presence missed.
    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: u64 },
}
