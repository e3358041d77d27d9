use crate::app::error::ExtractError;
use crate::app::models::{ScanRequest, ScanRule};
use crate::app::pattern::NamePattern;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const GLOBAL_SECTION: &str = "global";
const SPECIFIC_FILES_SECTION: &str = "specific_files";

/// Configs compiled into the binary, used when no file of that name is found.
const BUILTIN_CONFIGS: &[(&str, &str)] = &[
    ("extract", include_str!("../../configs/extract_extract.toml")),
    ("web", include_str!("../../configs/web_extract.toml")),
    ("android", include_str!("../../configs/android_extract.toml")),
    ("python", include_str!("../../configs/python_extract.toml")),
    ("rust", include_str!("../../configs/rust_extract.toml")),
];

/// A list value: either a TOML array or one comma/newline separated string.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
enum ListValue {
    Text(String),
    Items(Vec<String>),
}

impl ListValue {
    fn items(&self) -> Vec<String> {
        match self {
            ListValue::Text(text) => parse_list(text),
            ListValue::Items(items) => items
                .iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
struct RawSection {
    extensions: Option<ListValue>,
    include_subdirs: Option<bool>,
    excluded_dirs: Option<ListValue>,
    excluded_files: Option<ListValue>,
    files: Option<ListValue>,
}

fn list_of(value: &Option<ListValue>) -> Vec<String> {
    value.as_ref().map(ListValue::items).unwrap_or_default()
}

/// What a config section stands for, decided once when the file is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Global,
    SpecificFiles,
    Directory(String),
}

impl SectionKind {
    fn from_name(name: &str) -> Self {
        match name {
            GLOBAL_SECTION => SectionKind::Global,
            SPECIFIC_FILES_SECTION => SectionKind::SpecificFiles,
            dir => SectionKind::Directory(dir.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    values: RawSection,
}

/// A parsed config file with sections in file order.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub origin: String,
    pub sections: Vec<Section>,
}

/// Where a config was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Builtin(&'static str),
}

impl ConfigSource {
    pub fn describe(&self) -> String {
        match self {
            ConfigSource::File(path) => path.display().to_string(),
            ConfigSource::Builtin(name) => format!("built-in '{}'", name),
        }
    }
}

/// Splits a comma- or newline-separated list. Commas win when present.
pub fn parse_list(text: &str) -> Vec<String> {
    let separator = if text.contains(',') { ',' } else { '\n' };
    text.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// `web` -> `web_extract.toml`; names already ending in `.toml` are kept.
pub fn config_file_name(name: &str) -> String {
    if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{}_extract.toml", name)
    }
}

/// Default lookup locations, most specific first.
pub fn default_search_dirs() -> Vec<PathBuf> {
    let mut dirs_to_search = vec![PathBuf::from("configs"), PathBuf::from(".")];
    if let Some(config_dir) = dirs::config_dir() {
        dirs_to_search.push(config_dir.join("code-extract"));
    }
    dirs_to_search
}

/// Finds the config for `name` in `search_dirs`, falling back to the built-ins.
pub fn locate_config(name: &str, search_dirs: &[PathBuf]) -> Result<ConfigSource, ExtractError> {
    let file_name = config_file_name(name);

    for dir in search_dirs {
        let candidate = dir.join(&file_name);
        log::debug!("Looking for config at {:?}", candidate);
        if candidate.is_file() {
            return Ok(ConfigSource::File(candidate));
        }
    }

    let builtin_key = name.strip_suffix("_extract.toml").unwrap_or(name);
    if let Some((key, _)) = BUILTIN_CONFIGS.iter().find(|(key, _)| *key == builtin_key) {
        log::debug!("Using built-in config '{}'", key);
        return Ok(ConfigSource::Builtin(*key));
    }

    let searched = search_dirs
        .iter()
        .map(|dir| dir.join(&file_name).display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(ExtractError::ConfigNotFound {
        name: name.to_string(),
        searched,
    })
}

pub fn load_config(source: &ConfigSource) -> Result<ExtractConfig, ExtractError> {
    match source {
        ConfigSource::File(path) => {
            let content = fs::read_to_string(path).map_err(|source| ExtractError::ConfigRead {
                path: path.clone(),
                source,
            })?;
            parse_config(&content, &path.display().to_string())
        }
        ConfigSource::Builtin(name) => {
            let text = BUILTIN_CONFIGS
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, text)| *text)
                .ok_or_else(|| ExtractError::ConfigNotFound {
                    name: name.to_string(),
                    searched: "built-in configs".to_string(),
                })?;
            parse_config(text, &source.describe())
        }
    }
}

pub fn parse_config(text: &str, origin: &str) -> Result<ExtractConfig, ExtractError> {
    let raw: IndexMap<String, RawSection> =
        toml::from_str(text).map_err(|e| ExtractError::ConfigParse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;

    let sections = raw
        .into_iter()
        .map(|(name, values)| Section {
            kind: SectionKind::from_name(&name),
            values,
        })
        .collect();

    Ok(ExtractConfig {
        origin: origin.to_string(),
        sections,
    })
}

fn merge(global: &[String], local: Vec<String>) -> Vec<String> {
    let mut merged: IndexSet<String> = global.iter().cloned().collect();
    merged.extend(local);
    merged.into_iter().collect()
}

fn normalize_extension(ext: String) -> String {
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Forward slashes, no leading `./`, no trailing `/`.
pub(crate) fn normalize_relative(path: &str) -> String {
    let forward = path.replace('\\', "/");
    let mut trimmed = forward.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.trim_end_matches('/').to_string()
}

/// Turns a parsed config into directory-scoped rules for `base_directory`.
pub fn resolve(config: &ExtractConfig, base_directory: &Path) -> ScanRequest {
    let mut global_dirs = Vec::new();
    let mut global_files = Vec::new();
    for section in config.sections.iter().filter(|s| s.kind == SectionKind::Global) {
        global_dirs = merge(&global_dirs, list_of(&section.values.excluded_dirs));
        global_files = merge(&global_files, list_of(&section.values.excluded_files));
    }

    let mut rules = Vec::new();
    let mut specific_files: IndexSet<String> = IndexSet::new();

    for section in &config.sections {
        match &section.kind {
            SectionKind::Global => {}
            SectionKind::SpecificFiles => {
                specific_files.extend(
                    list_of(&section.values.files)
                        .iter()
                        .map(|path| normalize_relative(path))
                        .filter(|path| !path.is_empty()),
                );
            }
            SectionKind::Directory(path) => {
                let excluded_files = merge(&global_files, list_of(&section.values.excluded_files));
                rules.push(ScanRule {
                    directory_path: path.clone(),
                    extensions: list_of(&section.values.extensions)
                        .into_iter()
                        .map(normalize_extension)
                        .collect(),
                    include_subdirs: section.values.include_subdirs.unwrap_or(true),
                    excluded_dirs: merge(&global_dirs, list_of(&section.values.excluded_dirs)),
                    excluded_files: excluded_files.iter().map(|p| NamePattern::parse(p)).collect(),
                });
            }
        }
    }

    ScanRequest {
        base_directory: base_directory.to_path_buf(),
        rules,
        specific_files: specific_files.into_iter().collect(),
        global_excluded_dirs: global_dirs,
        global_excluded_files: global_files.iter().map(|p| NamePattern::parse(p)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
[global]
excluded_dirs = "node_modules, .git"
excluded_files = ["*.min.js", "package-lock.json"]

["src"]
extensions = "py, js"
excluded_files = "test_*"

["."]
extensions = [".toml"]
include_subdirs = false
excluded_dirs = ".git"

[specific_files]
files = """
./docs/README.md
scripts\\build.sh
"""
"#;

    #[test]
    fn parse_list_prefers_commas() {
        assert_eq!(parse_list(" a, b ,,c "), vec!["a", "b", "c"]);
        assert_eq!(parse_list("a\n b\n\nc d\n"), vec!["a", "b", "c d"]);
        assert!(parse_list("").is_empty());
        assert!(parse_list(" \n ").is_empty());
    }

    #[test]
    fn sections_keep_file_order_and_kind() {
        let config = parse_config(SAMPLE, "sample").unwrap();
        let kinds: Vec<_> = config.sections.iter().map(|s| s.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Global,
                SectionKind::Directory("src".into()),
                SectionKind::Directory(".".into()),
                SectionKind::SpecificFiles,
            ]
        );
    }

    #[test]
    fn resolve_merges_global_exclusions() {
        let config = parse_config(SAMPLE, "sample").unwrap();
        let request = resolve(&config, Path::new("/project"));

        assert_eq!(request.base_directory, PathBuf::from("/project"));
        assert_eq!(request.rules.len(), 2);

        let src = &request.rules[0];
        assert_eq!(src.directory_path, "src");
        assert_eq!(src.extensions, vec![".py", ".js"]);
        assert!(src.include_subdirs);
        assert_eq!(src.excluded_dirs, vec!["node_modules", ".git"]);
        assert_eq!(
            src.excluded_files,
            vec![
                NamePattern::Suffix(".min.js".into()),
                NamePattern::Exact("package-lock.json".into()),
                NamePattern::Prefix("test_".into()),
            ]
        );

        let root = &request.rules[1];
        assert_eq!(root.directory_path, ".");
        assert!(!root.include_subdirs);
        // Duplicate of a global entry is not repeated.
        assert_eq!(root.excluded_dirs, vec!["node_modules", ".git"]);

        assert_eq!(request.global_excluded_dirs, vec!["node_modules", ".git"]);
        assert_eq!(request.global_excluded_files.len(), 2);
    }

    #[test]
    fn specific_files_are_normalized() {
        let config = parse_config(SAMPLE, "sample").unwrap();
        let request = resolve(&config, Path::new("."));
        assert_eq!(request.specific_files, vec!["docs/README.md", "scripts/build.sh"]);
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = parse_config("[\"lib\"]\n", "inline").unwrap();
        let request = resolve(&config, Path::new("."));
        let rule = &request.rules[0];
        assert!(rule.extensions.is_empty());
        assert!(rule.include_subdirs);
        assert!(rule.excluded_dirs.is_empty());
        assert!(rule.excluded_files.is_empty());
        assert!(request.specific_files.is_empty());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = parse_config("[src\nextensions = 1", "broken").unwrap_err();
        assert!(matches!(err, ExtractError::ConfigParse { .. }));
    }

    #[test]
    fn misspelled_key_is_rejected() {
        let err = parse_config("[\"app\"]\nextension = \"rs\"\n", "typo").unwrap_err();
        match err {
            ExtractError::ConfigParse { message, .. } => assert!(message.contains("extension")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn unquoted_dotted_section_is_rejected() {
        let err = parse_config("[app.src]\nextensions = \"rs\"\n", "dotted").unwrap_err();
        assert!(matches!(err, ExtractError::ConfigParse { .. }));

        let quoted = parse_config("[\"app.src\"]\nextensions = \"rs\"\n", "quoted").unwrap();
        assert_eq!(quoted.sections[0].kind, SectionKind::Directory("app.src".into()));
    }

    #[test]
    fn normalize_relative_cleans_separators() {
        assert_eq!(normalize_relative("./build/gen/"), "build/gen");
        assert_eq!(normalize_relative("build\\gen"), "build/gen");
        assert_eq!(normalize_relative("././a.rs"), "a.rs");
    }

    #[test]
    fn config_file_name_appends_suffix() {
        assert_eq!(config_file_name("web"), "web_extract.toml");
        assert_eq!(config_file_name("custom.toml"), "custom.toml");
    }

    #[test]
    fn locate_prefers_files_over_builtins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("web_extract.toml"), "[\"site\"]\n").unwrap();

        let found = locate_config("web", &[dir.path().to_path_buf()]).unwrap();
        assert_eq!(found, ConfigSource::File(dir.path().join("web_extract.toml")));

        let builtin = locate_config("android", &[dir.path().to_path_buf()]).unwrap();
        assert_eq!(builtin, ConfigSource::Builtin("android"));
    }

    #[test]
    fn locate_unknown_name_fails() {
        let dir = tempdir().unwrap();
        let err = locate_config("nonexistent", &[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, ExtractError::ConfigNotFound { .. }));
    }

    #[test]
    fn builtin_configs_parse() {
        for (name, _) in BUILTIN_CONFIGS {
            let config = load_config(&ConfigSource::Builtin(*name)).unwrap();
            assert!(!config.sections.is_empty(), "built-in '{}' is empty", name);
        }
    }
}
