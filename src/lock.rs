use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::gateway::{AuthenticatorGateway, GatewayError, PlatformClient};
use crate::store::{LockStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Locked,
    Unlocked,
}

/// Two-state lock controller. Owns the in-memory state, the persistence
/// dependency and the authenticator gateway; transitions happen only on
/// explicit user actions, and any gateway failure leaves state and store
/// untouched.
pub struct AppLock<S, P> {
    store: Mutex<S>,
    gateway: AuthenticatorGateway<P>,
    profile: String,
    rp_id: String,
    display_label: String,
    state: Mutex<LockState>,
    // At most one authenticator interaction outstanding at a time. A flag
    // rather than a lock: there is only one logical actor.
    busy: AtomicBool,
}

struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl<S: LockStore, P: PlatformClient> AppLock<S, P> {
    /// Initialise from persisted state. An absent record starts locked; a
    /// corrupt one starts locked with a warning rather than failing.
    pub fn load(
        store: S,
        gateway: AuthenticatorGateway<P>,
        profile: String,
        rp_id: String,
        display_label: String,
    ) -> Result<Self> {
        let state = match store.unlocked(&profile) {
            Ok(true) => LockState::Unlocked,
            Ok(false) => LockState::Locked,
            Err(StoreError::Corrupt(e)) => {
                tracing::warn!(profile = %profile, error = %e, "Corrupt lock record, starting locked");
                LockState::Locked
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            store: Mutex::new(store),
            gateway,
            profile,
            rp_id,
            display_label,
            state: Mutex::new(state),
            busy: AtomicBool::new(false),
        })
    }

    pub fn state(&self) -> LockState {
        *self.state.lock().unwrap()
    }

    /// Whether a well-formed credential identifier is stored. A malformed
    /// one reads as absent so the user is directed to re-enroll.
    pub fn has_credential(&self) -> bool {
        match self.store.lock().unwrap().credential_id(&self.profile) {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(profile = %self.profile, error = %e, "Stored credential id unreadable");
                false
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<BusyGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::Busy);
        }
        Ok(BusyGuard { flag: &self.busy })
    }

    /// Register a platform credential for this profile. Establishes
    /// `has_credential`; never unlocks. A second enrollment replaces the
    /// stored identifier.
    pub async fn enroll(&self) -> Result<()> {
        let _guard = self.begin()?;
        if !self.gateway.available() {
            return Err(GatewayError::Unsupported.into());
        }
        tracing::info!(profile = %self.profile, "Enrollment started");

        let id = self.gateway.enroll(&self.display_label, &self.rp_id).await?;
        self.store
            .lock()
            .unwrap()
            .put_credential_id(&self.profile, &id)?;
        tracing::info!(
            profile = %self.profile,
            credential = %crate::codec::encode(id.as_bytes()),
            "Credential enrolled"
        );
        Ok(())
    }

    /// Verify user presence for the stored credential, then persist and
    /// enter `Unlocked`. Guarded: rejected before any platform interaction
    /// when no credential is enrolled.
    pub async fn unlock(&self) -> Result<()> {
        let _guard = self.begin()?;
        if !self.gateway.available() {
            return Err(GatewayError::Unsupported.into());
        }

        let id = match self.store.lock().unwrap().credential_id(&self.profile) {
            Ok(Some(id)) => id,
            Ok(None) => return Err(GatewayError::NoCredential.into()),
            Err(StoreError::Corrupt(e)) => {
                tracing::warn!(profile = %self.profile, error = %e, "Stored credential id malformed, re-enrollment required");
                return Err(GatewayError::NoCredential.into());
            }
            Err(e) => return Err(e.into()),
        };

        let _proof = self.gateway.verify_presence(&id).await?;

        // Persist first: if the write fails the operation fails and the
        // in-memory state stays locked.
        self.store
            .lock()
            .unwrap()
            .set_unlocked(&self.profile, true)?;
        *self.state.lock().unwrap() = LockState::Unlocked;
        tracing::info!(profile = %self.profile, "Unlocked");
        Ok(())
    }

    /// Return to `Locked` and persist the flag. Idempotent; no platform
    /// interaction.
    pub async fn relock(&self) -> Result<()> {
        let _guard = self.begin()?;
        self.store
            .lock()
            .unwrap()
            .set_unlocked(&self.profile, false)?;
        *self.state.lock().unwrap() = LockState::Locked;
        tracing::info!(profile = %self.profile, "Locked");
        Ok(())
    }
}
