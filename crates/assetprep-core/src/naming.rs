//! Filename token extraction and natural ordering.
//!
//! Both tools identify assets by the last run of digits immediately before
//! the file extension (`hero_0042.png` -> 42). The splitter additionally
//! orders filenames "naturally", comparing digit runs by value so that
//! `img2.png` sorts before `img10.png`.

use crate::error::{PrepError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::path::Path;
use std::sync::LazyLock;

/// Trailing digits immediately before a `.png` or `.json` extension.
static TRAILING_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\.(?:png|json)$").unwrap());

/// Extract the numeric token from an asset filename.
///
/// Fails with [`PrepError::Unnumbered`] when the name carries no digits
/// directly before its extension; a misnamed straggler in the source folder
/// aborts the whole run before anything is written.
///
/// # Examples
///
/// ```
/// use assetprep_core::naming::extract_token;
/// use std::path::Path;
///
/// assert_eq!(extract_token(Path::new("hero_0042.png")).unwrap(), 42);
/// assert!(extract_token(Path::new("cover.png")).is_err());
/// ```
pub fn extract_token(path: &Path) -> Result<u64> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PrepError::Unnumbered {
            name: path.display().to_string(),
        })?;

    let caps = TRAILING_TOKEN
        .captures(name)
        .ok_or_else(|| PrepError::Unnumbered {
            name: name.to_string(),
        })?;

    caps[1].parse().map_err(|_| PrepError::Unnumbered {
        name: name.to_string(),
    })
}

/// One segment of a filename under natural comparison.
///
/// Derived `Ord` never actually compares `Num` against `Text`: keys built
/// from [`natural_key`] alternate text and digit runs in lockstep, so equal
/// positions always hold the same variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Segment {
    Num(u128),
    Text(String),
}

/// Sort key for natural filename ordering.
///
/// Digit runs compare by integer value, everything else compares
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalKey(Vec<Segment>);

impl NaturalKey {
    pub fn new(name: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = name;

        while !rest.is_empty() {
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            if !digits.is_empty() {
                // Digit runs in filenames fit u128 comfortably; a run that
                // somehow doesn't falls back to ordering by length then text.
                let value = digits.parse::<u128>().unwrap_or(u128::MAX);
                segments.push(Segment::Num(value));
                rest = &rest[digits.len()..];
            } else {
                let text: String = rest.chars().take_while(|c| !c.is_ascii_digit()).collect();
                segments.push(Segment::Text(text.to_lowercase()));
                rest = &rest[text.len()..];
            }
        }

        NaturalKey(segments)
    }
}

impl Ord for NaturalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for NaturalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort paths in place by natural filename order.
pub fn sort_natural(paths: &mut [std::path::PathBuf]) {
    paths.sort_by_cached_key(|p| {
        NaturalKey::new(p.file_name().and_then(|n| n.to_str()).unwrap_or(""))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_extract_token_basic() {
        assert_eq!(extract_token(Path::new("7.png")).unwrap(), 7);
        assert_eq!(extract_token(Path::new("hero_0042.PNG")).unwrap(), 42);
        assert_eq!(extract_token(Path::new("item12.json")).unwrap(), 12);
    }

    #[test]
    fn test_extract_token_uses_trailing_run() {
        // Only the digits touching the extension count.
        assert_eq!(extract_token(Path::new("gen2_item_33.png")).unwrap(), 33);
    }

    #[test]
    fn test_extract_token_rejects_unnumbered() {
        assert!(extract_token(Path::new("cover.png")).is_err());
        assert!(extract_token(Path::new("12_final.png")).is_err());
        assert!(extract_token(Path::new("7.txt")).is_err());
    }

    #[test]
    fn test_natural_order_digits_by_value() {
        assert!(NaturalKey::new("a2.png") < NaturalKey::new("a10.png"));
        assert!(NaturalKey::new("img2.png") < NaturalKey::new("img10.png"));
    }

    #[test]
    fn test_natural_order_case_insensitive() {
        assert!(NaturalKey::new("Apple1.png") < NaturalKey::new("banana1.png"));
        assert_eq!(NaturalKey::new("A1.png"), NaturalKey::new("a1.png"));
    }

    #[test]
    fn test_sort_natural() {
        let mut paths: Vec<PathBuf> = ["a10.png", "a2.png", "a1.png", "b1.png"]
            .iter()
            .map(PathBuf::from)
            .collect();
        sort_natural(&mut paths);
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a1.png", "a2.png", "a10.png", "b1.png"]);
    }
}
