use std::io::Write;
use std::path::{Path, PathBuf};

use super::{CredentialId, LockStore, ProfileRecord, StoreError};
use crate::codec;

/// File-backed store: one JSON record per profile under `profiles_dir`,
/// written via a temp-file rename so a record is never partially visible.
pub struct DiskStore {
    profiles_dir: PathBuf,
}

impl DiskStore {
    pub fn open(profiles_dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&profiles_dir)?;
        Ok(Self { profiles_dir })
    }

    pub fn record_path(&self, profile: &str) -> PathBuf {
        self.profiles_dir.join(format!("{profile}.json"))
    }

    fn read_record(&self, profile: &str) -> Result<ProfileRecord, StoreError> {
        match std::fs::read(self.record_path(profile)) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Corrupt(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ProfileRecord::default()),
            Err(e) => Err(StoreError::Unavailable(e)),
        }
    }

    /// Read for update: a corrupt record is replaced by a fresh one, so a
    /// re-enrollment or re-lock can recover from it.
    fn read_for_update(&self, profile: &str) -> Result<ProfileRecord, StoreError> {
        match self.read_record(profile) {
            Ok(record) => Ok(record),
            Err(StoreError::Corrupt(e)) => {
                tracing::warn!(profile, error = %e, "Replacing corrupt lock record");
                Ok(ProfileRecord::default())
            }
            Err(e) => Err(e),
        }
    }

    fn write_record(&self, profile: &str, record: &ProfileRecord) -> Result<(), StoreError> {
        let path = self.record_path(profile);
        let bytes = serde_json::to_vec_pretty(record)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        write_atomic(&path, &bytes)?;
        Ok(())
    }
}

/// Write + fsync a temp sibling, then rename over the target.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    let tmp = path.with_extension("json.tmp");
    let mut file = std::fs::File::create(&tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(&tmp, path)?;
    Ok(())
}

impl LockStore for DiskStore {
    fn put_credential_id(&mut self, profile: &str, id: &CredentialId) -> Result<(), StoreError> {
        let mut record = self.read_for_update(profile)?;
        record.credential_id = Some(codec::encode(id.as_bytes()));
        self.write_record(profile, &record)
    }

    fn credential_id(&self, profile: &str) -> Result<Option<CredentialId>, StoreError> {
        let record = self.read_record(profile)?;
        match record.credential_id {
            None => Ok(None),
            Some(text) => Ok(Some(CredentialId::new(codec::decode(&text)?))),
        }
    }

    fn set_unlocked(&mut self, profile: &str, unlocked: bool) -> Result<(), StoreError> {
        let mut record = self.read_for_update(profile)?;
        record.unlocked = unlocked;
        self.write_record(profile, &record)
    }

    fn unlocked(&self, profile: &str) -> Result<bool, StoreError> {
        Ok(self.read_record(profile)?.unlocked)
    }
}
