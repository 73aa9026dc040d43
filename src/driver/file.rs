use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::driver::config::{DriverConfig, MissingRemovePolicy};
use crate::driver::{DriverError, StorageDriver};
use crate::types::identifiers::ContextId;

/// On-disk record of a present context. Its existence is what matters;
/// the fields are there to make a marker directory auditable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMarker {
    pub id: ContextId,
    pub config_version: String,
    pub created_at: DateTime<Utc>, // informational only
}

/// Stores one JSON marker file per context under `root`.
///
/// File names are the SHA-256 of the identifier, so any identifier maps to a
/// safe, fixed-length name. `create` writes and syncs a private temp file,
/// then hard-links it into place: a marker is either complete or absent, and
/// the link fails for every creator but the first.
#[derive(Debug)]
pub struct FileDriver {
    root: PathBuf,
    config: DriverConfig,
}

impl FileDriver {
    /// Open (creating if needed) a marker directory.
    pub fn open(root: impl Into<PathBuf>, config: DriverConfig) -> Result<Self, DriverError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn marker_path(&self, id: &ContextId) -> PathBuf {
        self.root.join(format!("{}.json", id.digest()))
    }

    /// Read back the marker for `id`, if present.
    pub fn marker(&self, id: &ContextId) -> Result<Option<ContextMarker>, DriverError> {
        let path = self.marker_path(id);
        let f = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let marker: ContextMarker = serde_json::from_reader(f)?;

        // Verify ID matches the file it was found under
        if marker.id != *id {
            return Err(DriverError::MarkerMismatch {
                path,
                expected: id.clone(),
                found: marker.id,
            });
        }
        Ok(Some(marker))
    }

    fn temp_path(&self, id: &ContextId) -> PathBuf {
        static NONCE: AtomicU64 = AtomicU64::new(0);
        let nonce = NONCE.fetch_add(1, Ordering::Relaxed);
        self.root
            .join(format!("{}.json.tmp.{}.{}", id.digest(), std::process::id(), nonce))
    }

    fn write_marker(&self, f: &File, id: &ContextId) -> Result<(), DriverError> {
        let marker = ContextMarker {
            id: id.clone(),
            config_version: self.config.version.clone(),
            created_at: Utc::now(),
        };
        serde_json::to_writer_pretty(f, &marker)?;
        f.sync_all()?;
        Ok(())
    }
}

impl StorageDriver for FileDriver {
    fn exists(&self, id: &ContextId) -> Result<bool, DriverError> {
        Ok(self.marker_path(id).try_exists()?)
    }

    fn create(&self, id: &ContextId) -> Result<(), DriverError> {
        let path = self.marker_path(id);
        let temp_path = self.temp_path(id);

        let f = OpenOptions::new().write(true).create_new(true).open(&temp_path)?;
        let written = self.write_marker(&f, id);
        drop(f);

        let published = written.and_then(|()| match fs::hard_link(&temp_path, &path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(DriverError::AlreadyPresent(id.clone()))
            }
            Err(e) => Err(e.into()),
        });

        // The temp name never counts as present, so a leftover only costs disk space
        if let Err(e) = fs::remove_file(&temp_path) {
            warn!(context = %id, path = %temp_path.display(), error = %e, "failed to remove temp marker");
        }

        published?;
        debug!(context = %id, path = %path.display(), "wrote context marker");
        Ok(())
    }

    fn remove(&self, id: &ContextId) -> Result<(), DriverError> {
        match fs::remove_file(self.marker_path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => match self.config.on_missing_remove {
                MissingRemovePolicy::Ignore => Ok(()),
                MissingRemovePolicy::Error => Err(DriverError::NotFound(id.clone())),
            },
            Err(e) => Err(e.into()),
        }
    }
}
