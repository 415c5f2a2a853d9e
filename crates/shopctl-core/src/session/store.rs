//! Credential storage for the admin session.
//!
//! Stores the access token, refresh token, and cached user record in
//! `<home>/credentials.json` with restricted permissions (0600). Tokens are
//! never logged or displayed in full.
//!
//! Each entry carries its own absolute expiry; an expired, missing, or
//! malformed entry reads as absent. A corrupt file means "logged out",
//! never an error.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shopctl_types::User;

use crate::config::paths;

/// Access token lifetime: 7 days. The cached user shares it.
const ACCESS_TOKEN_TTL_MS: u64 = 7 * 24 * 60 * 60 * 1000;
/// Refresh token lifetime: 30 days.
const REFRESH_TOKEN_TTL_MS: u64 = 30 * 24 * 60 * 60 * 1000;

fn now_millis_u64() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| u64::try_from(d.as_millis()).ok())
        .unwrap_or(u64::MAX)
}

/// A stored value with an absolute expiry in milliseconds since epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    value: String,
    expires: u64,
}

impl StoredEntry {
    fn new(value: impl Into<String>, ttl_ms: u64) -> Self {
        Self {
            value: value.into(),
            expires: now_millis_u64().saturating_add(ttl_ms),
        }
    }

    fn is_expired(&self) -> bool {
        now_millis_u64() >= self.expires
    }

    fn live_value(&self) -> Option<&str> {
        (!self.is_expired()).then_some(self.value.as_str())
    }
}

/// On-disk credential file layout.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    admin_token: Option<StoredEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    admin_refresh_token: Option<StoredEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    admin_user: Option<StoredEntry>,
}

/// Handle to the on-disk credential store.
///
/// Cheap to clone; every operation loads and rewrites the file, so all
/// clones observe the same state.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store backed by the given file path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Creates a store at the default credentials path.
    pub fn at_default_path() -> Self {
        Self::new(paths::credentials_path())
    }

    /// Loads the credential file from disk.
    ///
    /// A missing file reads as empty. A malformed file also reads as empty:
    /// corrupt persisted state is treated as "logged out", not a crash.
    fn load(&self) -> CredentialFile {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return CredentialFile::default();
        };

        match serde_json::from_str(&contents) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(
                    "malformed credential file at {}, treating as logged out: {e}",
                    self.path.display()
                );
                CredentialFile::default()
            }
        }
    }

    /// Saves the credential file to disk with restricted permissions (0600).
    fn save(&self, file: &CredentialFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(file).context("Failed to serialize credentials")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut out = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            out.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    /// Returns the access token if present and unexpired.
    pub fn access_token(&self) -> Option<String> {
        self.load()
            .admin_token
            .as_ref()
            .and_then(StoredEntry::live_value)
            .map(str::to_string)
    }

    /// Stores the access token with a 7-day expiry.
    pub fn set_access_token(&self, token: &str) -> Result<()> {
        let mut file = self.load();
        file.admin_token = Some(StoredEntry::new(token, ACCESS_TOKEN_TTL_MS));
        self.save(&file)
    }

    /// Returns the refresh token if present and unexpired.
    pub fn refresh_token(&self) -> Option<String> {
        self.load()
            .admin_refresh_token
            .as_ref()
            .and_then(StoredEntry::live_value)
            .map(str::to_string)
    }

    /// Stores the refresh token with a 30-day expiry.
    pub fn set_refresh_token(&self, token: &str) -> Result<()> {
        let mut file = self.load();
        file.admin_refresh_token = Some(StoredEntry::new(token, REFRESH_TOKEN_TTL_MS));
        self.save(&file)
    }

    /// Returns the cached user record, if present, unexpired, and parseable.
    pub fn user(&self) -> Option<User> {
        let file = self.load();
        let raw = file.admin_user.as_ref().and_then(StoredEntry::live_value)?;

        match serde_json::from_str(raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("malformed cached user record, treating as logged out: {e}");
                None
            }
        }
    }

    /// Stores the user snapshot alongside the access token's lifetime.
    pub fn set_user(&self, user: &User) -> Result<()> {
        let serialized = serde_json::to_string(user).context("Failed to serialize user")?;
        let mut file = self.load();
        file.admin_user = Some(StoredEntry::new(serialized, ACCESS_TOKEN_TTL_MS));
        self.save(&file)
    }

    /// Removes all three entries. Idempotent; succeeds even when nothing is
    /// stored.
    pub fn clear_all(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }

    /// Removes the access token and cached user but keeps the refresh token.
    ///
    /// This is the 401 purge path; the refresh token survives so a later
    /// `refresh_session` can still be attempted.
    pub fn clear_access(&self) -> Result<()> {
        let mut file = self.load();
        if file.admin_token.is_none() && file.admin_user.is_none() {
            return Ok(());
        }
        file.admin_token = None;
        file.admin_user = None;
        self.save(&file)
    }

    /// Returns a masked version of a token for display (first 12 chars + ...).
    pub fn mask_token(token: &str) -> String {
        if token.len() <= 16 {
            return "***".to_string();
        }
        format!("{}...", &token[..12])
    }
}

#[cfg(test)]
mod tests {
    use shopctl_types::UserRole;

    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> CredentialStore {
        CredentialStore::new(dir.path().join("credentials.json"))
    }

    fn sample_user() -> User {
        User {
            id: "u-1".to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            role: UserRole::Admin,
            is_email_verified: true,
            is_active: true,
            phone: Some("+1-555-0000".to_string()),
            address: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Test: set then get round-trips each part.
    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set_access_token("access-1").unwrap();
        store.set_refresh_token("refresh-1").unwrap();
        store.set_user(&sample_user()).unwrap();

        assert_eq!(store.access_token().as_deref(), Some("access-1"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
        assert_eq!(store.user().unwrap(), sample_user());
    }

    /// Test: empty store reads as absent everywhere.
    #[test]
    fn test_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert!(store.user().is_none());
    }

    /// Test: corrupt file reads as logged out, not an error.
    #[test]
    fn test_corrupt_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        fs::write(dir.path().join("credentials.json"), "{not json").unwrap();

        assert!(store.access_token().is_none());
        assert!(store.user().is_none());
        // And writes still work afterwards.
        store.set_access_token("access-1").unwrap();
        assert_eq!(store.access_token().as_deref(), Some("access-1"));
    }

    /// Test: corrupt user entry reads as absent while tokens survive.
    #[test]
    fn test_corrupt_user_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set_access_token("access-1").unwrap();
        let mut file = store.load();
        file.admin_user = Some(StoredEntry::new("{definitely not a user", ACCESS_TOKEN_TTL_MS));
        store.save(&file).unwrap();

        assert!(store.user().is_none());
        assert_eq!(store.access_token().as_deref(), Some("access-1"));
    }

    /// Test: expired entries read as absent.
    #[test]
    fn test_expired_entry_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let file = CredentialFile {
            admin_token: Some(StoredEntry {
                value: "stale".to_string(),
                expires: now_millis_u64() - 1000,
            }),
            ..CredentialFile::default()
        };
        store.save(&file).unwrap();

        assert!(store.access_token().is_none());
    }

    /// Test: clear_all is idempotent.
    #[test]
    fn test_clear_all_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set_access_token("access-1").unwrap();
        store.set_user(&sample_user()).unwrap();

        store.clear_all().unwrap();
        assert!(store.access_token().is_none());
        assert!(store.user().is_none());

        // Second clear on an already-empty store must also succeed.
        store.clear_all().unwrap();
        assert!(store.access_token().is_none());
    }

    /// Test: the 401 purge keeps the refresh token.
    #[test]
    fn test_clear_access_keeps_refresh_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set_access_token("access-1").unwrap();
        store.set_refresh_token("refresh-1").unwrap();
        store.set_user(&sample_user()).unwrap();

        store.clear_access().unwrap();

        assert!(store.access_token().is_none());
        assert!(store.user().is_none());
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
    }

    /// Test: token masking.
    #[test]
    fn test_mask_token() {
        assert_eq!(
            CredentialStore::mask_token("a-very-long-access-token"),
            "a-very-long-..."
        );
        assert_eq!(CredentialStore::mask_token("short"), "***");
    }
}
