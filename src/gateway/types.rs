use std::time::Duration;

use async_trait::async_trait;

use super::challenge::Challenge;
use crate::store::CredentialId;

/// COSE algorithm identifier for ES256.
pub const ALG_ES256: i32 = -7;
pub const CRED_TYPE_PUBLIC_KEY: &str = "public-key";

#[derive(Debug, Clone)]
pub struct RelyingParty {
    pub name: String,
    /// Domain binding the credential to the application that requested it.
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct UserEntity {
    pub id: Vec<u8>,
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct CredentialParameter {
    pub cred_type: &'static str,
    pub alg: i32,
}

/// Only platform-bound authenticators are accepted: this is a device lock,
/// not a portable credential, so roaming authenticators are excluded at the
/// type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Platform,
}

/// Biometric/PIN confirmation is mandatory; silent presence is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserVerification {
    Required,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttestationPreference {
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Internal,
}

#[derive(Debug, Clone)]
pub struct AuthenticatorSelection {
    pub attachment: Attachment,
    pub user_verification: UserVerification,
}

/// Platform credential-creation request.
#[derive(Debug, Clone)]
pub struct CreationRequest {
    pub challenge: Challenge,
    pub relying_party: RelyingParty,
    pub user: UserEntity,
    pub algorithms: Vec<CredentialParameter>,
    pub selection: AuthenticatorSelection,
    pub timeout: Duration,
    pub attestation: AttestationPreference,
}

#[derive(Debug, Clone)]
pub struct AllowCredential {
    pub id: CredentialId,
    pub cred_type: &'static str,
    pub transports: Vec<Transport>,
}

/// Platform assertion request, restricted to the allow list.
#[derive(Debug, Clone)]
pub struct AssertionRequest {
    pub challenge: Challenge,
    pub allow_list: Vec<AllowCredential>,
    pub user_verification: UserVerification,
    pub timeout: Duration,
}

/// Credential object returned by the platform on creation.
#[derive(Debug)]
pub struct CreatedCredential {
    pub raw_id: Vec<u8>,
}

/// Assertion object returned by the platform. Its successful resolution is
/// what the gateway treats as proof; the contained fields are not verified.
#[derive(Debug)]
pub struct Assertion {
    pub credential_id: Vec<u8>,
}

/// Why the platform refused a request. Mapped by the gateway onto its own
/// error taxonomy; "no credential" stays distinct from generic refusal.
#[derive(Debug, thiserror::Error)]
pub enum PlatformRefusal {
    #[error("no credential available")]
    NoCredential,
    #[error("cancelled by user")]
    Cancelled,
    #[error("timed out")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

/// The platform's biometric/PIN authenticator interface.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Whether an authenticator interface is present on this device.
    fn is_available(&self) -> bool;

    async fn create_credential(
        &self,
        req: CreationRequest,
    ) -> Result<CreatedCredential, PlatformRefusal>;

    async fn get_assertion(&self, req: AssertionRequest) -> Result<Assertion, PlatformRefusal>;
}
