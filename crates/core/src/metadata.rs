use crate::error::Result;
use crate::{IngestError, MetadataSnapshot};
use std::fs;
use std::path::Path;

/// Reads the persisted snapshot. A missing file is
/// [`IngestError::MissingSnapshot`]; callers treat that as "no previous
/// snapshot", not as a fatal error. A present-but-corrupt file propagates
/// the decode error.
pub fn load_snapshot(path: &Path) -> Result<MetadataSnapshot> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(IngestError::MissingSnapshot(path.to_path_buf()));
        }
        Err(error) => return Err(IngestError::Io(error)),
    };

    Ok(serde_json::from_str(&raw)?)
}

/// Overwrites the snapshot file with a human-inspectable JSON mapping of
/// path -> `{"mod_time": ...}`. Written to a sibling temp file first and
/// renamed over the target; best-effort, this is a cache rather than a
/// source of truth.
pub fn save_snapshot(path: &Path, snapshot: &MetadataSnapshot) -> Result<()> {
    let encoded = serde_json::to_string_pretty(snapshot)?;

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");

    fs::write(&staging, encoded)?;
    fs::rename(&staging, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_snapshot, save_snapshot};
    use crate::{FileRecord, IngestError, MetadataSnapshot};
    use tempfile::tempdir;

    #[test]
    fn missing_snapshot_is_its_own_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let result = load_snapshot(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(IngestError::MissingSnapshot(_))));
        Ok(())
    }

    #[test]
    fn snapshot_round_trips() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("metadata.json");

        let mut snapshot = MetadataSnapshot::new();
        snapshot.insert("/docs/a.pdf".to_string(), FileRecord { mod_time: 100.0 });
        snapshot.insert("/docs/b.pdf".to_string(), FileRecord { mod_time: 250.25 });

        save_snapshot(&path, &snapshot)?;
        let reloaded = load_snapshot(&path)?;

        assert_eq!(reloaded, snapshot);
        Ok(())
    }

    #[test]
    fn save_overwrites_the_previous_snapshot() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("metadata.json");

        let mut first = MetadataSnapshot::new();
        first.insert("/docs/a.pdf".to_string(), FileRecord { mod_time: 1.0 });
        save_snapshot(&path, &first)?;

        let second = MetadataSnapshot::new();
        save_snapshot(&path, &second)?;

        assert_eq!(load_snapshot(&path)?, second);
        Ok(())
    }

    #[test]
    fn snapshot_encoding_is_flat_json() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("metadata.json");

        let mut snapshot = MetadataSnapshot::new();
        snapshot.insert("/docs/a.pdf".to_string(), FileRecord { mod_time: 100.0 });
        save_snapshot(&path, &snapshot)?;

        let raw = std::fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        assert_eq!(value["/docs/a.pdf"]["mod_time"], 100.0);
        Ok(())
    }
}
