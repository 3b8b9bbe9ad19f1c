//! Renumbering engine: remap a numbered asset set to contiguous 0-based
//! indices, patching each sidecar's image references to the new name.
//!
//! Sources are never mutated or deleted. Images are copied with their
//! timestamps preserved; sidecars are parsed, patched, and re-serialized.
//! A missing sidecar for an image is tolerated and reported; everything
//! else is fatal before or during the single pass.

use crate::error::{PrepError, Result};
use crate::fsops::{copy_preserving_times, ensure_dir, list_with_extension};
use crate::metadata::{patch_image_refs, read_sidecar, write_sidecar};
use crate::naming::extract_token;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Inputs for a renumbering run.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Folder with PNGs (any names, but with trailing numbers).
    pub images_dir: PathBuf,
    /// Folder with JSON sidecars. Defaults to `images_dir` when `None`.
    pub meta_dir: Option<PathBuf>,
    /// Output folder; will contain `0.png`/`0.json`, `1.png`/`1.json`, ...
    pub out_dir: PathBuf,
    /// Lowest numeric token in the source naming (token - start = new index).
    pub start: u64,
}

/// Outcome of a successful renumbering run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    /// Number of image files written.
    pub written: usize,
    /// Original tokens that had no sidecar, in ascending order.
    pub missing_metadata: Vec<u64>,
}

/// Renumber an asset set into `out_dir`.
///
/// # Errors
///
/// Fails without writing anything when the image folder is empty or any
/// source filename lacks a numeric token. Fails mid-run on IO or JSON
/// errors, on a token below `start`, and on the final contiguity check.
pub fn normalize(opts: &NormalizeOptions) -> Result<NormalizeReport> {
    let meta_dir = opts.meta_dir.as_deref().unwrap_or(&opts.images_dir);

    let pngs = list_with_extension(&opts.images_dir, "png")?;
    if pngs.is_empty() {
        return Err(PrepError::NoImages(opts.images_dir.clone()));
    }

    let png_map = index_by_token(pngs)?;
    let sidecar_map = if meta_dir.is_dir() {
        index_by_token(list_with_extension(meta_dir, "json")?)?
    } else {
        BTreeMap::new()
    };

    info!(
        "Renumbering {} images from {} (start={})",
        png_map.len(),
        opts.images_dir.display(),
        opts.start
    );
    ensure_dir(&opts.out_dir)?;

    let mut missing_metadata = Vec::new();
    let mut written = 0usize;

    for (&token, png) in &png_map {
        let new_index = token
            .checked_sub(opts.start)
            .ok_or(PrepError::IndexUnderflow {
                token,
                start: opts.start,
            })?;

        copy_preserving_times(png, &opts.out_dir.join(format!("{new_index}.png")))?;

        match sidecar_map.get(&token) {
            Some(sidecar) => {
                let mut doc = read_sidecar(sidecar)?;
                let image_name = format!("{new_index}.png");
                let patched = patch_image_refs(&mut doc, &image_name);
                debug!(
                    "Patched {} reference(s) in {} -> {}",
                    patched,
                    sidecar.display(),
                    image_name
                );
                write_sidecar(&opts.out_dir.join(format!("{new_index}.json")), &doc)?;
            }
            None => missing_metadata.push(token),
        }

        written += 1;
    }

    check_contiguous(&opts.out_dir, written)?;

    Ok(NormalizeReport {
        written,
        missing_metadata,
    })
}

/// Map each path to its numeric token, failing on the first unnumbered
/// name or duplicated token.
fn index_by_token(paths: Vec<PathBuf>) -> Result<BTreeMap<u64, PathBuf>> {
    let mut map: BTreeMap<u64, PathBuf> = BTreeMap::new();
    for path in paths {
        let token = extract_token(&path)?;
        if let Some(previous) = map.get(&token) {
            return Err(PrepError::DuplicateToken {
                token,
                first: previous.clone(),
                second: path,
            });
        }
        map.insert(token, path);
    }
    Ok(map)
}

/// Verify the output spans `0..count-1` by probing the first and last
/// index. Interior gaps are not detected; the token map being keyed by
/// unique tokens makes them impossible unless the source numbering itself
/// had holes.
fn check_contiguous(out_dir: &Path, count: usize) -> Result<()> {
    let expected_last = (count as u64).saturating_sub(1);
    let first = out_dir.join("0.png");
    let last = out_dir.join(format!("{expected_last}.png"));
    if !first.exists() || !last.exists() {
        return Err(PrepError::Discontiguous {
            dir: out_dir.to_path_buf(),
            expected_last,
        });
    }
    Ok(())
}
