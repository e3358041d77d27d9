use crate::app::config::normalize_relative;
use crate::app::error::{ExtractError, ScanIssue};
use crate::app::models::{CollectedSet, ScanRequest, ScanRule};
use crate::app::pattern::matches_any;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};
use pathdiff::diff_paths;
use std::path::{Component, Path, PathBuf};

pub struct Scanner {
    request: ScanRequest,
}

impl Scanner {
    pub fn new(request: ScanRequest) -> Self {
        Self { request }
    }

    /// Runs every rule, then adds the specific files. First occurrence wins.
    pub fn scan(&self) -> CollectedSet {
        let base = &self.request.base_directory;
        let mut collected = CollectedSet::default();

        for rule in &self.request.rules {
            let found = collect(base, rule);
            log::info!(
                "Found {} files in {}",
                found.paths.len(),
                rule_root(base, &rule.directory_path).display()
            );
            collected.paths.extend(found.paths);
            collected.issues.extend(found.issues);
        }

        for specific in &self.request.specific_files {
            if base.join(specific).is_file() {
                if collected.paths.insert(specific.clone()) {
                    log::info!("Added specific file: {}", specific);
                } else {
                    log::debug!("Specific file already collected: {}", specific);
                }
            } else {
                collected
                    .issues
                    .push(ScanIssue::SpecificFileMissing(specific.clone()));
            }
        }

        collected
    }
}

fn rule_root(base: &Path, directory_path: &str) -> PathBuf {
    if directory_path == "." || directory_path.is_empty() {
        base.to_path_buf()
    } else {
        base.join(directory_path)
    }
}

/// Forward-slash form of `path` relative to `base`. Keeps `..` for paths
/// outside `base`.
fn relative_string(path: &Path, base: &Path) -> Option<String> {
    let relative = diff_paths(path, base)?;
    let parts: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Excluded directories split into bare names and paths below the rule root.
#[derive(Debug, Clone, Default)]
struct DirExclusions {
    names: Vec<String>,
    nested: Vec<String>,
}

impl DirExclusions {
    fn new(excluded: &[String]) -> Self {
        let mut exclusions = Self::default();
        for dir in excluded.iter().map(|dir| normalize_relative(dir)) {
            if dir.is_empty() {
                continue;
            }
            if dir.contains('/') {
                exclusions.nested.push(dir);
            } else {
                exclusions.names.push(dir);
            }
        }
        exclusions
    }

    fn prunes(&self, entry: &DirEntry, root: &Path) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        if self.names.iter().any(|dir| *dir == name) {
            return true;
        }
        if self.nested.is_empty() {
            return false;
        }
        relative_string(entry.path(), root)
            .is_some_and(|rel| self.nested.iter().any(|dir| *dir == rel))
    }
}

fn is_file_entry(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        // Symlinked files are read, symlinked directories are never entered.
        Some(ft) if ft.is_symlink() => entry.path().is_file(),
        _ => false,
    }
}

fn accepts(rule: &ScanRule, file_name: &str) -> bool {
    let extension_ok =
        rule.extensions.is_empty() || rule.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()));
    extension_ok && !matches_any(&rule.excluded_files, file_name)
}

/// Collects the files one rule selects, as paths relative to `base`.
///
/// Excluded directories are pruned before descent so nothing below them is
/// visited. A missing directory yields an empty set and a `DirectoryMissing`
/// issue.
pub fn collect(base: &Path, rule: &ScanRule) -> CollectedSet {
    let mut collected = CollectedSet::default();
    let root = rule_root(base, &rule.directory_path);

    if !root.is_dir() {
        collected
            .issues
            .push(ScanIssue::DirectoryMissing(rule.directory_path.clone()));
        return collected;
    }

    let mut builder = WalkBuilder::new(&root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));
    if !rule.include_subdirs {
        builder.max_depth(Some(1));
    }

    let prune_root = root.clone();
    let exclusions = DirExclusions::new(&rule.excluded_dirs);
    builder.filter_entry(move |entry| !exclusions.prunes(entry, &prune_root));

    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Error walking entry: {}", err);
                collected.issues.push(ScanIssue::WalkFailure {
                    directory: rule.directory_path.clone(),
                    message: err.to_string(),
                });
                continue;
            }
        };

        if !is_file_entry(&entry) {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if !accepts(rule, &file_name) {
            log::trace!("Skipping {}", entry.path().display());
            continue;
        }
        if let Some(relative) = relative_string(entry.path(), base) {
            collected.paths.insert(relative);
        }
    }

    collected
}

/// Keeps the collected paths that match at least one glob. No globs keeps all.
pub fn select(paths: &[String], globs: &[String]) -> Result<Vec<String>, ExtractError> {
    if globs.is_empty() {
        return Ok(paths.to_vec());
    }
    let set = build_globset(globs)?;
    Ok(paths.iter().filter(|p| set.is_match(p.as_str())).cloned().collect())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, ExtractError> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).map_err(|source| ExtractError::InvalidSelection {
            pattern: pat.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ExtractError::InvalidSelection {
        pattern: patterns.join(" "),
        source,
    })
}
