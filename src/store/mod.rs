pub mod disk;
pub mod record;

pub use disk::DiskStore;
pub use record::{CredentialId, ProfileRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<crate::codec::CodecError> for StoreError {
    fn from(e: crate::codec::CodecError) -> Self {
        StoreError::Corrupt(e.to_string())
    }
}

/// Persistence boundary for the lock: one record per profile, holding the
/// enrolled credential identifier (if any) and the durable unlocked flag.
///
/// The lock state machine owns its store through this trait so that tests
/// can substitute an in-memory fake.
pub trait LockStore {
    /// Overwrite any previously stored identifier. Durable before Ok.
    fn put_credential_id(&mut self, profile: &str, id: &CredentialId) -> Result<(), StoreError>;

    /// The enrolled identifier, or None if enrollment never happened.
    /// A stored but undecodable identifier is `StoreError::Corrupt`.
    fn credential_id(&self, profile: &str) -> Result<Option<CredentialId>, StoreError>;

    /// Persist the unlocked flag. Durable before Ok.
    fn set_unlocked(&mut self, profile: &str, unlocked: bool) -> Result<(), StoreError>;

    /// The persisted unlocked flag; an absent record reads as false (locked).
    fn unlocked(&self, profile: &str) -> Result<bool, StoreError>;
}
