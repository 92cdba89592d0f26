use std::fmt;

// Errors surfaced by store mutations and the storage record.
// None of these leave the store half-updated: a failing call changes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    EmptySnapshotName,
    /// Bulk duration must be at least one minute
    InvalidDuration(u32),
    LastLevel,
    LastPrize,
    PrizeNotFound(u32),
    Storage(String),
    Serialization(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::EmptySnapshotName => write!(f, "Please enter a tournament name"),
            StoreError::InvalidDuration(minutes) => write!(
                f,
                "Invalid duration: {} minutes (must be at least 1)",
                minutes
            ),
            StoreError::LastLevel => write!(f, "The last remaining level cannot be deleted"),
            StoreError::LastPrize => write!(f, "The last remaining prize cannot be deleted"),
            StoreError::PrizeNotFound(position) => {
                write!(f, "No prize at position {}", position)
            }
            StoreError::Storage(msg) => write!(f, "Storage unavailable: {}", msg),
            StoreError::Serialization(msg) => write!(f, "Failed to encode state: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub type Result<T> = std::result::Result<T, StoreError>;
