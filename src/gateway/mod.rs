pub mod challenge;
pub mod pinentry;
pub mod types;

pub use challenge::Challenge;
pub use pinentry::PinentryClient;
pub use types::{
    AssertionRequest, CreationRequest, PlatformClient, PlatformRefusal,
};

use crate::config;
use crate::store::CredentialId;
use types::{
    AllowCredential, Attachment, AttestationPreference, AuthenticatorSelection,
    CredentialParameter, RelyingParty, Transport, UserEntity, UserVerification,
    ALG_ES256, CRED_TYPE_PUBLIC_KEY,
};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("no platform authenticator available")]
    Unsupported,
    #[error("no enrolled credential")]
    NoCredential,
    #[error("enrollment failed: {0}")]
    Enrollment(String),
    #[error("verification failed: {0}")]
    Verification(String),
}

/// Proof that the platform resolved an assertion for the requested
/// credential.
///
/// Trust boundary: the assertion's signature is NOT checked against a
/// stored public key. Holding this token proves only that the platform
/// authenticator reported a successful user verification on this device.
#[derive(Debug)]
pub struct ProofOfPresence {
    pub(crate) _private: (),
}

impl ProofOfPresence {
    /// Construct a proof for use in tests only.
    /// Do not use in production code; this bypasses user verification.
    #[doc(hidden)]
    pub fn test_only() -> Self {
        Self { _private: () }
    }
}

/// Capability-checked boundary to the platform biometric/PIN authenticator.
pub struct AuthenticatorGateway<P> {
    client: P,
}

impl<P: PlatformClient> AuthenticatorGateway<P> {
    pub fn new(client: P) -> Self {
        Self { client }
    }

    /// Whether a platform authenticator interface is present. Callers must
    /// abort with [`GatewayError::Unsupported`] before attempting enroll or
    /// verify when this is false.
    pub fn available(&self) -> bool {
        self.client.is_available()
    }

    /// Register a new platform credential and return its identifier.
    ///
    /// Fails without partial state on cancellation, timeout or refusal.
    pub async fn enroll(
        &self,
        display_label: &str,
        rp_id: &str,
    ) -> Result<CredentialId, GatewayError> {
        let req = CreationRequest {
            challenge: Challenge::generate(),
            relying_party: RelyingParty {
                name: config::RP_NAME.to_string(),
                id: rp_id.to_string(),
            },
            user: UserEntity {
                id: config::USER_HANDLE.as_bytes().to_vec(),
                name: config::USER_HANDLE.to_string(),
                display_name: display_label.to_string(),
            },
            algorithms: vec![CredentialParameter {
                cred_type: CRED_TYPE_PUBLIC_KEY,
                alg: ALG_ES256,
            }],
            selection: AuthenticatorSelection {
                attachment: Attachment::Platform,
                user_verification: UserVerification::Required,
            },
            timeout: config::PROMPT_TIMEOUT,
            attestation: AttestationPreference::None,
        };

        match self.client.create_credential(req).await {
            Ok(created) if created.raw_id.is_empty() => Err(GatewayError::Enrollment(
                "platform returned an empty credential id".into(),
            )),
            Ok(created) => {
                tracing::info!(rp_id, "Credential created");
                Ok(CredentialId::new(created.raw_id))
            }
            Err(PlatformRefusal::NoCredential) => Err(GatewayError::NoCredential),
            Err(refusal) => Err(GatewayError::Enrollment(refusal.to_string())),
        }
    }

    /// Request an assertion restricted to the stored credential. Successful
    /// resolution is taken as the proof; see [`ProofOfPresence`].
    pub async fn verify_presence(
        &self,
        credential_id: &CredentialId,
    ) -> Result<ProofOfPresence, GatewayError> {
        let req = AssertionRequest {
            challenge: Challenge::generate(),
            allow_list: vec![AllowCredential {
                id: credential_id.clone(),
                cred_type: CRED_TYPE_PUBLIC_KEY,
                transports: vec![Transport::Internal],
            }],
            user_verification: UserVerification::Required,
            timeout: config::PROMPT_TIMEOUT,
        };

        match self.client.get_assertion(req).await {
            Ok(_assertion) => {
                tracing::info!("User presence confirmed");
                Ok(ProofOfPresence { _private: () })
            }
            Err(PlatformRefusal::NoCredential) => Err(GatewayError::NoCredential),
            Err(refusal) => Err(GatewayError::Verification(refusal.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::types::*;
    use super::*;
    use std::sync::Mutex;

    /// Records the last request of each kind and answers from a script.
    struct RecordingClient {
        create_result: Mutex<Option<Result<CreatedCredential, PlatformRefusal>>>,
        assert_result: Mutex<Option<Result<Assertion, PlatformRefusal>>>,
        last_creation: Mutex<Option<CreationRequest>>,
        last_assertion: Mutex<Option<AssertionRequest>>,
    }

    impl RecordingClient {
        fn new() -> Self {
            Self {
                create_result: Mutex::new(None),
                assert_result: Mutex::new(None),
                last_creation: Mutex::new(None),
                last_assertion: Mutex::new(None),
            }
        }

        fn will_create(self, raw_id: Vec<u8>) -> Self {
            *self.create_result.lock().unwrap() = Some(Ok(CreatedCredential { raw_id }));
            self
        }

        fn will_refuse_create(self, refusal: PlatformRefusal) -> Self {
            *self.create_result.lock().unwrap() = Some(Err(refusal));
            self
        }

        fn will_assert(self, credential_id: Vec<u8>) -> Self {
            *self.assert_result.lock().unwrap() = Some(Ok(Assertion { credential_id }));
            self
        }

        fn will_refuse_assert(self, refusal: PlatformRefusal) -> Self {
            *self.assert_result.lock().unwrap() = Some(Err(refusal));
            self
        }
    }

    #[async_trait::async_trait]
    impl PlatformClient for RecordingClient {
        fn is_available(&self) -> bool {
            true
        }

        async fn create_credential(
            &self,
            req: CreationRequest,
        ) -> Result<CreatedCredential, PlatformRefusal> {
            let result = self.create_result.lock().unwrap().take().expect("unscripted create");
            *self.last_creation.lock().unwrap() = Some(req);
            result
        }

        async fn get_assertion(
            &self,
            req: AssertionRequest,
        ) -> Result<Assertion, PlatformRefusal> {
            let result = self.assert_result.lock().unwrap().take().expect("unscripted assert");
            *self.last_assertion.lock().unwrap() = Some(req);
            result
        }
    }

    #[tokio::test]
    async fn test_enroll_builds_creation_request() {
        let gateway =
            AuthenticatorGateway::new(RecordingClient::new().will_create(vec![0xA1, 0xB2]));
        let id = gateway.enroll("Local User", "example.com").await.unwrap();
        assert_eq!(id.as_bytes(), &[0xA1, 0xB2]);

        let req = gateway.client.last_creation.lock().unwrap().take().unwrap();
        assert_eq!(req.relying_party.id, "example.com");
        assert_eq!(req.user.display_name, "Local User");
        assert_eq!(req.user.id, crate::config::USER_HANDLE.as_bytes());
        assert!(req.algorithms.iter().any(|p| p.alg == ALG_ES256));
        assert_eq!(req.timeout, crate::config::PROMPT_TIMEOUT);
        assert_eq!(req.challenge.as_bytes().len(), 32);
    }

    #[tokio::test]
    async fn test_enroll_maps_cancellation() {
        let gateway = AuthenticatorGateway::new(
            RecordingClient::new().will_refuse_create(PlatformRefusal::Cancelled),
        );
        let err = gateway.enroll("Local User", "example.com").await.unwrap_err();
        assert!(matches!(err, GatewayError::Enrollment(_)));
    }

    #[tokio::test]
    async fn test_enroll_rejects_empty_credential_id() {
        let gateway = AuthenticatorGateway::new(RecordingClient::new().will_create(vec![]));
        let err = gateway.enroll("Local User", "example.com").await.unwrap_err();
        assert!(matches!(err, GatewayError::Enrollment(_)));
    }

    #[tokio::test]
    async fn test_verify_restricts_allow_list_to_stored_credential() {
        let gateway =
            AuthenticatorGateway::new(RecordingClient::new().will_assert(vec![0x42; 16]));
        let id = CredentialId::new(vec![0x42; 16]);
        gateway.verify_presence(&id).await.unwrap();

        let req = gateway.client.last_assertion.lock().unwrap().take().unwrap();
        assert_eq!(req.allow_list.len(), 1);
        assert_eq!(req.allow_list[0].id, id);
        assert_eq!(req.allow_list[0].transports, vec![Transport::Internal]);
    }

    #[tokio::test]
    async fn test_verify_maps_no_credential() {
        let gateway = AuthenticatorGateway::new(
            RecordingClient::new().will_refuse_assert(PlatformRefusal::NoCredential),
        );
        let err = gateway
            .verify_presence(&CredentialId::new(vec![1]))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NoCredential));
    }

    #[tokio::test]
    async fn test_verify_maps_timeout() {
        let gateway = AuthenticatorGateway::new(
            RecordingClient::new().will_refuse_assert(PlatformRefusal::Timeout),
        );
        let err = gateway
            .verify_presence(&CredentialId::new(vec![1]))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Verification(_)));
    }

    #[tokio::test]
    async fn test_challenges_are_fresh_per_operation() {
        let client = RecordingClient::new().will_create(vec![1]);
        *client.assert_result.lock().unwrap() = Some(Ok(Assertion { credential_id: vec![1] }));
        let gateway = AuthenticatorGateway::new(client);

        gateway.enroll("Local User", "example.com").await.unwrap();
        gateway
            .verify_presence(&CredentialId::new(vec![1]))
            .await
            .unwrap();

        let creation = gateway.client.last_creation.lock().unwrap().take().unwrap();
        let assertion = gateway.client.last_assertion.lock().unwrap().take().unwrap();
        assert_ne!(creation.challenge.as_bytes(), assertion.challenge.as_bytes());
    }
}
