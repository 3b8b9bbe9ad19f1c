//! Sidecar metadata reading, patching, and safe persistence.
//!
//! Sidecars are free-form JSON; only two spots are rewritten when present:
//! the top-level `image` string and the `uri` of every `properties.files`
//! entry whose `type` starts with `image/`. Everything else passes through
//! untouched. Writes go through a temp file plus atomic rename so a crash
//! mid-write never leaves a truncated sidecar in the output set.

use crate::error::{PrepError, Result};
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use std::process;
use std::thread;
use tracing::debug;

/// Read and parse a sidecar JSON document.
pub fn read_sidecar(path: &Path) -> Result<Value> {
    let mut file = File::open(path).map_err(|e| PrepError::Io {
        message: format!("Failed to open {}", path.display()),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| PrepError::Io {
            message: format!("Failed to read {}", path.display()),
            path: Some(path.to_path_buf()),
            source: Some(e),
        })?;

    serde_json::from_str(&contents).map_err(|e| PrepError::Json {
        message: format!("Failed to parse {}: {}", path.display(), e),
        source: Some(e),
    })
}

/// Rewrite the image references in a sidecar document to `image_name`.
///
/// Returns the number of fields rewritten. Fields with unexpected shapes
/// (non-string `image`, non-array `files`, non-object entries) are left
/// alone rather than coerced.
pub fn patch_image_refs(doc: &mut Value, image_name: &str) -> usize {
    let mut patched = 0;

    if let Some(image) = doc.get_mut("image") {
        if image.is_string() {
            *image = Value::String(image_name.to_string());
            patched += 1;
        }
    }

    if let Some(files) = doc
        .get_mut("properties")
        .and_then(|p| p.get_mut("files"))
        .and_then(|f| f.as_array_mut())
    {
        for entry in files.iter_mut() {
            let is_image = entry
                .get("type")
                .and_then(|t| t.as_str())
                .is_some_and(|t| t.starts_with("image/"));
            if is_image {
                if let Some(obj) = entry.as_object_mut() {
                    obj.insert("uri".to_string(), Value::String(image_name.to_string()));
                    patched += 1;
                }
            }
        }
    }

    patched
}

/// Write a sidecar document atomically with stable pretty formatting.
///
/// Serializes to a temp file named with a PID+TID suffix, syncs it, then
/// renames over the target.
pub fn write_sidecar(path: &Path, doc: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| PrepError::Io {
                message: format!("Failed to create directory {}", parent.display()),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }
    }

    let temp_path = path.with_extension(format!("json.{}.{}.tmp", process::id(), thread_id()));

    let serialized = serde_json::to_string_pretty(doc).map_err(|e| PrepError::Json {
        message: format!("Failed to serialize sidecar: {}", e),
        source: Some(e),
    })?;

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| PrepError::io_with_path(e, &temp_path))?;

        file.write_all(serialized.as_bytes())
            .map_err(|e| PrepError::io_with_path(e, &temp_path))?;

        file.sync_all()
            .map_err(|e| PrepError::io_with_path(e, &temp_path))?;
    }

    fs::rename(&temp_path, path).map_err(|e| PrepError::Io {
        message: format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            path.display()
        ),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })?;

    debug!("Wrote sidecar {}", path.display());
    Ok(())
}

/// Get a unique thread identifier for temp file naming.
fn thread_id() -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    format!("{:?}", thread::current().id()).hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_patch_image_string() {
        let mut doc = json!({"name": "Item #7", "image": "7.png"});
        assert_eq!(patch_image_refs(&mut doc, "2.png"), 1);
        assert_eq!(doc["image"], "2.png");
        assert_eq!(doc["name"], "Item #7");
    }

    #[test]
    fn test_patch_skips_non_string_image() {
        let mut doc = json!({"image": 7});
        assert_eq!(patch_image_refs(&mut doc, "2.png"), 0);
        assert_eq!(doc["image"], 7);
    }

    #[test]
    fn test_patch_files_only_image_types() {
        let mut doc = json!({
            "properties": {
                "files": [
                    {"uri": "7.png", "type": "image/png"},
                    {"uri": "7.mp4", "type": "video/mp4"},
                    {"uri": "7.webp", "type": "image/webp"},
                    "not-an-object"
                ]
            }
        });
        assert_eq!(patch_image_refs(&mut doc, "0.png"), 2);
        let files = doc["properties"]["files"].as_array().unwrap();
        assert_eq!(files[0]["uri"], "0.png");
        assert_eq!(files[1]["uri"], "7.mp4");
        assert_eq!(files[2]["uri"], "0.png");
        assert_eq!(files[3], "not-an-object");
    }

    #[test]
    fn test_patch_tolerates_missing_sections() {
        let mut doc = json!({"attributes": []});
        assert_eq!(patch_image_refs(&mut doc, "0.png"), 0);
    }

    #[test]
    fn test_write_and_read_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("0.json");
        let doc = json!({"image": "0.png", "name": "Item"});

        write_sidecar(&path, &doc).unwrap();
        assert_eq!(read_sidecar(&path).unwrap(), doc);

        // Pretty formatting, and no stray temp files left behind.
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"image\""));
        let stray = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .path()
                    .to_string_lossy()
                    .ends_with(".tmp")
            })
            .count();
        assert_eq!(stray, 0);
    }
}
