use indexmap::IndexSet;
use std::path::PathBuf;

use crate::app::error::ScanIssue;
use crate::app::pattern::NamePattern;

/// Selection rules for one configured directory, with global exclusions
/// already merged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRule {
    /// Relative to the base directory; `"."` is the base itself.
    pub directory_path: String,
    /// Accepted file-name suffixes. Empty accepts every file.
    pub extensions: Vec<String>,
    pub include_subdirs: bool,
    pub excluded_dirs: Vec<String>,
    pub excluded_files: Vec<NamePattern>,
}

/// Everything the collector needs, produced once by config resolution.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub base_directory: PathBuf,
    pub rules: Vec<ScanRule>,
    /// Paths included regardless of extension or exclusion rules.
    pub specific_files: Vec<String>,
    pub global_excluded_dirs: Vec<String>,
    pub global_excluded_files: Vec<NamePattern>,
}

/// Deduplicated relative paths in first-seen order.
#[derive(Debug, Default)]
pub struct CollectedSet {
    pub paths: IndexSet<String>,
    pub issues: Vec<ScanIssue>,
}

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub base_directory: PathBuf,
    pub selected_paths: Vec<String>,
    pub title: String,
}

#[derive(Debug)]
pub struct RenderedDocument {
    pub content: String,
    pub issues: Vec<ScanIssue>,
}
