//! Snapshot file format and atomic file replacement.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::domain::entities::{LinkSet, LinkSetId};
use crate::error::StoreError;

/// Full durable state: every link set plus the next identity to assign.
///
/// # Layout
///
/// ```json
/// {
///   "linkSets": {
///     "1": { "identity": 1, "links": { "example.com": "available" }, "timestamp": "..." }
///   },
///   "nextId": 2
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub link_sets: BTreeMap<LinkSetId, LinkSet>,
    pub next_id: LinkSetId,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            link_sets: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl Snapshot {
    /// Restores `next_id >= max identity + 1` for snapshots that violate it.
    ///
    /// Returns true if the counter was changed.
    pub fn repair_next_id(&mut self) -> bool {
        let floor = self
            .link_sets
            .keys()
            .next_back()
            .map_or(1, |max| max + 1)
            .max(1);

        if self.next_id < floor {
            self.next_id = floor;
            true
        } else {
            false
        }
    }
}

/// Location of the canonical snapshot file.
///
/// Writes go to `<path>.tmp` first, are fsynced, then renamed over `<path>`,
/// so readers only ever see a complete old or a complete new snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    /// Reads the snapshot.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(snapshot))` if the file exists and parses
    /// - `Ok(None)` if the file does not exist
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read and
    /// [`StoreError::Serialization`] if its content is malformed.
    pub async fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot = serde_json::from_slice(&data)?;
        Ok(Some(snapshot))
    }

    /// Atomically replaces the snapshot file with `data`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if any step (create, write, fsync, rename) fails.
    /// The previous snapshot is left intact in that case.
    pub async fn write_atomic(&self, data: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.tmp_path();
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Serializes a snapshot in the on-disk format.
pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec_pretty(snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{LinkStatus, LinkStatuses};
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let mut links = LinkStatuses::new();
        links.insert("example.com".to_string(), LinkStatus::Available);
        links.insert("#anchor".to_string(), LinkStatus::NotAvailable);

        let mut link_sets = BTreeMap::new();
        link_sets.insert(1, LinkSet::new(1, links, Utc::now()));

        Snapshot {
            link_sets,
            next_id: 2,
        }
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("absent.json"));

        assert!(file.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let result = SnapshotFile::new(path).load().await;

        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("links.json"));
        let snapshot = sample_snapshot();

        file.write_atomic(&encode(&snapshot).unwrap()).await.unwrap();

        assert_eq!(file.load().await.unwrap(), Some(snapshot));
        assert!(!file.tmp_path().exists());
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("nested/data/links.json"));

        file.write_atomic(b"{}").await.unwrap();

        assert!(file.path().exists());
    }

    #[test]
    fn test_on_disk_layout() {
        let json: serde_json::Value =
            serde_json::from_slice(&encode(&sample_snapshot()).unwrap()).unwrap();

        assert_eq!(json["nextId"], 2);
        assert_eq!(json["linkSets"]["1"]["identity"], 1);
        assert_eq!(json["linkSets"]["1"]["links"]["#anchor"], "not available");
    }

    #[test]
    fn test_tmp_path_appends_suffix() {
        let file = SnapshotFile::new("/var/lib/links/link_sets.json");
        assert_eq!(
            file.tmp_path(),
            PathBuf::from("/var/lib/links/link_sets.json.tmp")
        );
    }

    #[test]
    fn test_repair_next_id() {
        let mut snapshot = sample_snapshot();
        snapshot.next_id = 1;

        assert!(snapshot.repair_next_id());
        assert_eq!(snapshot.next_id, 2);

        assert!(!snapshot.repair_next_id());

        let mut empty = Snapshot {
            link_sets: BTreeMap::new(),
            next_id: 0,
        };
        assert!(empty.repair_next_id());
        assert_eq!(empty.next_id, 1);
    }
}
