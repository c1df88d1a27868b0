use crate::config::StorageConfig;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;

/// Media kind, one storage root per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Photo,
}

/// Maps (user, media kind) to that user's storage directory.
///
/// Partitions are created lazily on the first artifact of a kind for a user
/// and never deleted by this system.
#[derive(Debug, Clone)]
pub struct StorageLocator {
    audio_root: PathBuf,
    photo_root: PathBuf,
}

impl StorageLocator {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            audio_root: PathBuf::from(&config.audio_root),
            photo_root: PathBuf::from(&config.photo_root),
        }
    }

    /// Resolve the per-user directory for a media kind, creating it (and any
    /// missing parents) on first use.
    pub fn resolve(&self, user_id: i64, kind: MediaKind) -> std::io::Result<PathBuf> {
        let root = match kind {
            MediaKind::Audio => &self.audio_root,
            MediaKind::Photo => &self.photo_root,
        };

        let dir = root.join(user_id.to_string());
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            info!("Created {:?} partition for user {}: {:?}", kind, user_id, dir);
        }

        Ok(dir)
    }
}

/// Per-user pipeline locks.
///
/// The audio pipeline's fixed scratch filename and version-count computation
/// are not safe under concurrent writers for one user, so the dispatcher
/// holds the user's lock for the duration of a pipeline run. Different users
/// never contend.
#[derive(Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one user, waiting if a pipeline for the same
    /// user is already running.
    pub async fn acquire(&self, user_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(user_id).or_default())
        };
        lock.lock_owned().await
    }
}
