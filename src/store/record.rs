use serde::{Deserialize, Serialize};

/// Opaque binary identifier assigned by the platform authenticator at
/// enrollment. Length is authenticator-defined. At most one is stored per
/// profile; a new enrollment replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialId(Vec<u8>);

impl CredentialId {
    pub fn new(raw: Vec<u8>) -> Self {
        Self(raw)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// On-disk record for one profile. Exactly two entries: the base64url
/// encoded credential identifier and the unlocked flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub credential_id: Option<String>,
    #[serde(default)]
    pub unlocked: bool,
}
