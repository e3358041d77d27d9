use crate::app::error::ExtractError;
use std::fs;
use std::path::{Path, PathBuf};

pub const EXTRACTS_DIR: &str = "Extracts";

/// Where the document goes.
///
/// A bare file name lands in `Extracts/`, a path with a directory is used as
/// given, and no output at all means `Extracts/<config>_collection.md`.
pub fn resolve_output_path(output: Option<&Path>, config_name: &str) -> PathBuf {
    match output {
        Some(path) if has_directory(path) => path.to_path_buf(),
        Some(path) => Path::new(EXTRACTS_DIR).join(path),
        None => {
            let stem = config_name.strip_suffix(".toml").unwrap_or(config_name);
            Path::new(EXTRACTS_DIR).join(format!("{}_collection.md", stem))
        }
    }
}

fn has_directory(path: &Path) -> bool {
    path.parent().is_some_and(|p| !p.as_os_str().is_empty())
}

/// Writes `content`, creating missing parent directories first.
pub fn write_to_file(path: &Path, content: &str) -> Result<(), ExtractError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| ExtractError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
            log::info!("Created directory: {}", parent.display());
        }
    }
    fs::write(path, content).map_err(|source| ExtractError::Write {
        path: path.to_path_buf(),
        source,
    })
}
