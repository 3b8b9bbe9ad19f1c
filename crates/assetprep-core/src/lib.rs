//! Assetprep Core - engines for renumbering and partitioning paired
//! image/metadata asset sets.
//!
//! Two independent single-pass engines operate on flat folders of
//! `*.png` images with optional `*.json` sidecars:
//!
//! - [`normalize`] remaps a numbered set to contiguous 0-based indices,
//!   rewriting each sidecar's image references to the new filename.
//! - [`split`] carves fixed-size slices of four source collections into
//!   four contiguously-indexed output collections.
//!
//! Both are synchronous, run-to-completion, and never mutate sources.
//!
//! # Example
//!
//! ```rust,ignore
//! use assetprep_core::{normalize, NormalizeOptions};
//!
//! let report = normalize(&NormalizeOptions {
//!     images_dir: "raw/images".into(),
//!     meta_dir: None,
//!     out_dir: "out/assets".into(),
//!     start: 1,
//! })?;
//! println!("wrote {} pairs", report.written);
//! ```

pub mod error;
pub mod fsops;
pub mod metadata;
pub mod naming;
pub mod normalize;
pub mod split;

// Re-export commonly used types
pub use error::{PrepError, Result};
pub use normalize::{normalize, NormalizeOptions, NormalizeReport};
pub use split::{copy_tier, default_plan, split, TierReport, TierSpec};
