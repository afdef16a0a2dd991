use crate::error::Result;
use crate::{FileRecord, IngestError, MetadataSnapshot};
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tracing::warn;
use walkdir::WalkDir;

/// Lists the source folder (non-recursive) and captures the modification
/// time of every regular `.pdf` file as a fresh [`MetadataSnapshot`].
///
/// A file that cannot be stat-ed (e.g. removed between listing and stat) is
/// skipped with a warning instead of failing the whole scan, but a folder
/// that cannot be read at all is an error: a missing folder must never look
/// like an empty one, or a mistyped path would wipe the whole index. An
/// empty folder yields an empty snapshot.
pub fn scan_folder(folder: &Path) -> Result<MetadataSnapshot> {
    if !fs::metadata(folder)?.is_dir() {
        return Err(IngestError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("not a directory: {}", folder.display()),
        )));
    }

    let mut snapshot = MetadataSnapshot::new();

    for item in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = match item {
            Ok(entry) => entry,
            Err(error) if error.depth() == 0 => {
                return Err(IngestError::Io(error.into()));
            }
            Err(error) => {
                warn!(reason = %error, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let is_pdf = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        if !is_pdf {
            continue;
        }

        let mod_time = match entry.metadata().map_err(|error| error.to_string()).and_then(
            |metadata| {
                metadata
                    .modified()
                    .map_err(|error| error.to_string())
                    .and_then(|time| {
                        time.duration_since(UNIX_EPOCH)
                            .map_err(|error| error.to_string())
                    })
            },
        ) {
            Ok(duration) => duration.as_secs_f64(),
            Err(reason) => {
                warn!(path = %entry.path().display(), %reason, "skipping unreadable file");
                continue;
            }
        };

        snapshot.insert(
            entry.path().to_string_lossy().to_string(),
            FileRecord { mod_time },
        );
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::scan_folder;
    use std::fs;
    #[cfg(unix)]
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn scan_picks_up_only_top_level_pdfs() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let base = dir.path();
        let nested = base.join("nested");
        fs::create_dir(&nested)?;

        fs::write(base.join("a.pdf"), b"%PDF-1.4\n%fake")?;
        fs::write(base.join("B.PDF"), b"%PDF-1.4\n%fake")?;
        fs::write(base.join("notes.txt"), b"not a pdf")?;
        fs::write(nested.join("deep.pdf"), b"%PDF-1.4\n%fake")?;

        let snapshot = scan_folder(base)?;

        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.keys().all(|path| !path.contains("nested")));
        Ok(())
    }

    #[test]
    fn scan_of_empty_folder_is_empty_not_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let snapshot = scan_folder(dir.path())?;
        assert!(snapshot.is_empty());
        Ok(())
    }

    #[test]
    fn scan_of_missing_folder_is_an_error_not_an_empty_snapshot() {
        let dir = tempdir().unwrap();
        let absent = dir.path().join("no-such-folder");

        let result = scan_folder(&absent);

        assert!(result.is_err());
    }

    #[test]
    fn scan_of_a_file_instead_of_a_folder_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file = dir.path().join("a.pdf");
        fs::write(&file, b"%PDF-1.4")?;

        assert!(scan_folder(&file).is_err());
        Ok(())
    }

    #[test]
    fn scan_captures_positive_mod_times() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("a.pdf");
        fs::write(&path, b"%PDF-1.4")?;

        let snapshot = scan_folder(dir.path())?;
        let record = snapshot
            .get(&path.to_string_lossy().to_string())
            .expect("scanned file should be present");
        assert!(record.mod_time > 0.0);
        Ok(())
    }

    #[cfg(unix)]
    fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(mode);
        fs::set_permissions(path, perms)
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_skipped_without_failing_the_scan(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let base = dir.path();
        fs::write(base.join("a.pdf"), b"%PDF-1.4")?;

        // Listable but not traversable: entries can be seen, not stat-ed.
        set_mode(base, 0o444)?;

        // Under a privileged user the permission bits don't bite; skip the
        // emptiness assertion then, the scan still must not error.
        let stat_blocked = fs::metadata(base.join("a.pdf")).is_err();
        let result = scan_folder(base);

        // Restore so the tempdir can be cleaned up.
        set_mode(base, 0o755)?;

        let snapshot = result?;
        if stat_blocked {
            assert!(snapshot.is_empty());
        }
        Ok(())
    }
}
