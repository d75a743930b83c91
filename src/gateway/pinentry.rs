use async_trait::async_trait;
use rand::RngCore;

use super::types::{
    Assertion, AssertionRequest, CreatedCredential, CreationRequest, PlatformClient,
    PlatformRefusal,
};

/// Platform authenticator backed by a pinentry dialog: the user's
/// biometric/PIN confirmation is delegated to the desktop's pinentry
/// program, and credential identifiers are random device-local tokens.
pub struct PinentryClient {
    binary: String,
}

struct Prompt {
    title: String,
    description: String,
}

fn creation_prompt(req: &CreationRequest) -> Prompt {
    let site = format!("{} ({})", req.relying_party.name, req.relying_party.id);
    Prompt {
        title: "clasp".to_string(),
        description: format!(
            "Register device lock credential\n\nSite: {site}\nAccount: {}\n\nPress OK to register, or Cancel to deny.",
            req.user.display_name
        ),
    }
}

fn assertion_prompt(req: &AssertionRequest) -> Prompt {
    let n = req.allow_list.len();
    Prompt {
        title: "clasp".to_string(),
        description: format!(
            "Unlock with device credential\n\nCredentials accepted: {n}\n\nPress OK to unlock, or Cancel to deny."
        ),
    }
}

impl PinentryClient {
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }

    async fn confirm(
        &self,
        prompt: Prompt,
        timeout: std::time::Duration,
    ) -> Result<(), PlatformRefusal> {
        let title = prompt.title;
        let description = prompt.description;
        let bin = self.binary.clone();

        let join = tokio::task::spawn_blocking(move || {
            let input = pinentry::PassphraseInput::with_binary(&bin);
            match input {
                None => Err(pinentry::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "pinentry binary not found",
                ))),
                Some(mut input) => input
                    .with_title(&title)
                    .with_description(&description)
                    .with_ok("Confirm")
                    .with_cancel("Deny")
                    .interact(),
            }
        });

        let result = tokio::time::timeout(timeout, join).await;

        match result {
            Err(_) => Err(PlatformRefusal::Timeout),
            Ok(Err(e)) => Err(PlatformRefusal::Other(format!("prompt task failed: {e}"))),
            Ok(Ok(Ok(_))) => Ok(()),
            Ok(Ok(Err(_))) => Err(PlatformRefusal::Cancelled),
        }
    }
}

#[async_trait]
impl PlatformClient for PinentryClient {
    fn is_available(&self) -> bool {
        std::process::Command::new(&self.binary)
            .arg("--version")
            .output()
            .is_ok()
    }

    async fn create_credential(
        &self,
        req: CreationRequest,
    ) -> Result<CreatedCredential, PlatformRefusal> {
        let timeout = req.timeout;
        self.confirm(creation_prompt(&req), timeout).await?;

        let mut raw_id = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut raw_id);
        tracing::info!("Pinentry confirmation accepted, credential id assigned");
        Ok(CreatedCredential { raw_id })
    }

    async fn get_assertion(&self, req: AssertionRequest) -> Result<Assertion, PlatformRefusal> {
        let allowed = match req.allow_list.first() {
            Some(entry) => entry.id.clone(),
            None => return Err(PlatformRefusal::NoCredential),
        };
        let timeout = req.timeout;
        self.confirm(assertion_prompt(&req), timeout).await?;

        tracing::info!("Pinentry confirmation accepted");
        Ok(Assertion { credential_id: allowed.into_bytes() })
    }
}
