//! Four-way splitter engine: carve fixed-size slices of four source
//! collections into four contiguously-indexed output collections.
//!
//! Pairs are copied positionally from two independently natural-sorted
//! lists; no sidecar patching happens here. Each tier is validated for
//! size before anything is written for it, and tiers run sequentially
//! with no rollback of earlier completed tiers.

use crate::error::{PrepError, Result};
use crate::fsops::{copy_preserving_times, ensure_dir, list_with_extension};
use crate::naming::{extract_token, sort_natural};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One tier mapping: a named source subfolder, its output subpath under
/// the output root, and the exact number of pairs to copy.
#[derive(Debug, Clone)]
pub struct TierSpec {
    /// Subfolder name under the source root.
    pub folder: String,
    /// Output path relative to the output root, e.g. `cm-lgen/assets`.
    pub out_subdir: PathBuf,
    /// Required number of image/sidecar pairs.
    pub count: usize,
}

/// Result of one completed tier copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierReport {
    pub folder: String,
    pub out_dir: PathBuf,
    pub copied: usize,
}

/// The standard four-tier plan with its fixed pair counts.
pub fn default_plan(
    lgen: &str,
    bgen: &str,
    ldia: &str,
    bdia: &str,
) -> Vec<TierSpec> {
    [
        (lgen, "cm-lgen", 500),
        (bgen, "cm-bgen", 500),
        (ldia, "cm-ldia", 185),
        (bdia, "cm-bdia", 85),
    ]
    .into_iter()
    .map(|(folder, out_name, count)| TierSpec {
        folder: folder.to_string(),
        out_subdir: Path::new(out_name).join("assets"),
        count,
    })
    .collect()
}

/// Copy one tier's slice from `src_dir` into `out_dir`.
///
/// Validates both file lists against `count` before creating the output
/// directory, so an undersized tier leaves no partial output behind.
pub fn copy_tier(src_dir: &Path, out_dir: &Path, count: usize) -> Result<TierReport> {
    let mut pngs = list_with_extension(src_dir, "png")?;
    let mut jsons = list_with_extension(src_dir, "json")?;
    sort_natural(&mut pngs);
    sort_natural(&mut jsons);

    if pngs.len() < count || jsons.len() < count {
        return Err(PrepError::Shortfall {
            dir: src_dir.to_path_buf(),
            pngs: pngs.len(),
            jsons: jsons.len(),
            need: count,
        });
    }

    ensure_dir(out_dir)?;

    for i in 0..count {
        let png = &pngs[i];
        let json = &jsons[i];
        warn_on_token_mismatch(png, json, i);
        copy_preserving_times(png, &out_dir.join(format!("{i}.png")))?;
        copy_preserving_times(json, &out_dir.join(format!("{i}.json")))?;
    }

    info!(
        "Copied {} pairs from {} to {}",
        count,
        src_dir.display(),
        out_dir.display()
    );

    Ok(TierReport {
        folder: src_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        out_dir: out_dir.to_path_buf(),
        copied: count,
    })
}

/// Run a whole plan sequentially. Stops at the first failing tier;
/// reports for tiers completed before the failure are lost with the
/// error, but their files stay on disk.
pub fn split(src_root: &Path, out_root: &Path, plan: &[TierSpec]) -> Result<Vec<TierReport>> {
    let mut reports = Vec::with_capacity(plan.len());
    for tier in plan {
        let report = copy_tier(
            &src_root.join(&tier.folder),
            &out_root.join(&tier.out_subdir),
            tier.count,
        )?;
        reports.push(report);
    }
    Ok(reports)
}

/// The two lists are sorted independently and never verified to line up.
/// When both names carry tokens and they disagree, leave a trace for the
/// operator; the copy proceeds unchanged either way.
fn warn_on_token_mismatch(png: &Path, json: &Path, index: usize) {
    if let (Ok(png_token), Ok(json_token)) = (extract_token(png), extract_token(json)) {
        if png_token != json_token {
            warn!(
                "Pair {} pairs image token {} with sidecar token {} ({} / {})",
                index,
                png_token,
                json_token,
                png.display(),
                json.display()
            );
        }
    }
}
