//! Directory scanning and timestamp-preserving copies.

use crate::error::{PrepError, Result};
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

/// List files in `dir` (non-recursive) whose extension matches `ext`
/// case-insensitively. Returns paths in directory-iteration order; callers
/// sort by whatever key they need.
pub fn list_with_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PrepError::NotADirectory(dir.to_path_buf()));
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| PrepError::Io {
            message: format!("Failed to read directory {}: {}", dir.display(), e),
            path: Some(dir.to_path_buf()),
            source: e.into_io_error(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if matches {
            out.push(entry.into_path());
        }
    }
    Ok(out)
}

/// Byte-copy `src` to `dest`, carrying over access and modification times.
///
/// `std::fs::copy` preserves permissions but not timestamps, so the times
/// are re-applied from the source metadata after the copy.
pub fn copy_preserving_times(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest).map_err(|e| PrepError::Io {
        message: format!("Failed to copy {} to {}", src.display(), dest.display()),
        path: Some(src.to_path_buf()),
        source: Some(e),
    })?;

    let meta = fs::metadata(src).map_err(|e| PrepError::io_with_path(e, src))?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    filetime::set_file_times(dest, atime, mtime)
        .map_err(|e| PrepError::io_with_path(e, dest))?;

    trace!("Copied {} -> {}", src.display(), dest.display());
    Ok(())
}

/// Create `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| PrepError::Io {
        message: format!("Failed to create directory {}", dir.display()),
        path: Some(dir.to_path_buf()),
        source: Some(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_list_with_extension_filters_and_ignores_case() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["1.png", "2.PNG", "1.json", "notes.txt"] {
            File::create(temp_dir.path().join(name)).unwrap();
        }

        let mut pngs = list_with_extension(temp_dir.path(), "png").unwrap();
        pngs.sort();
        let names: Vec<_> = pngs
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["1.png", "2.PNG"]);
    }

    #[test]
    fn test_list_with_extension_skips_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("1.png")).unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        File::create(temp_dir.path().join("nested").join("2.png")).unwrap();

        let pngs = list_with_extension(temp_dir.path(), "png").unwrap();
        assert_eq!(pngs.len(), 1);
    }

    #[test]
    fn test_list_with_extension_rejects_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        assert!(matches!(
            list_with_extension(&missing, "png"),
            Err(PrepError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_copy_preserving_times() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src.png");
        let dest = temp_dir.path().join("dest.png");

        let mut f = File::create(&src).unwrap();
        f.write_all(b"not really a png").unwrap();
        drop(f);

        // Backdate the source so preservation is observable.
        let old = FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_mtime(&src, old).unwrap();

        copy_preserving_times(&src, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"not really a png");
        let dest_mtime = FileTime::from_last_modification_time(&fs::metadata(&dest).unwrap());
        assert_eq!(dest_mtime.unix_seconds(), 1_000_000_000);
    }
}
