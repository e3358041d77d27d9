use crate::app::error::ScanIssue;
use crate::app::models::{RenderRequest, RenderedDocument};
use chrono::Local;
use std::fs;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fence tag for a file, from its lowercased extension. Unknown is `text`.
pub fn language_for(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "rs" => "rust",
        "py" | "pyw" | "pyi" => "python",
        "kt" | "kts" => "kotlin",
        "java" => "java",
        "c" => "c",
        "cpp" | "cc" | "cxx" | "h" | "hpp" => "cpp",
        "cs" => "csharp",
        "go" => "go",
        "rb" => "ruby",
        "swift" => "swift",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "jsx",
        "ts" => "typescript",
        "tsx" => "tsx",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "json" => "json",
        "xml" => "xml",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "config" | "ini" | "cfg" => "ini",
        "md" => "markdown",
        "sh" | "bash" => "bash",
        "sql" => "sql",
        "gradle" => "groovy",
        _ => "text",
    }
}

/// A backtick fence longer than any backtick run in `content`, minimum three.
fn fence_for(content: &str) -> String {
    let longest = content
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat((longest + 1).max(3))
}

pub struct OutputGenerator;

impl OutputGenerator {
    pub fn render(request: &RenderRequest) -> RenderedDocument {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        Self::render_at(request, &timestamp)
    }

    /// Renders with a fixed timestamp line. Paths are emitted in the order given.
    pub fn render_at(request: &RenderRequest, timestamp: &str) -> RenderedDocument {
        let mut content = format!("# {}\n\nGenerated on: {}\n\n", request.title, timestamp);
        let mut issues = Vec::new();

        for path in &request.selected_paths {
            content.push_str(&Self::render_file(&request.base_directory, path, &mut issues));
        }

        RenderedDocument { content, issues }
    }

    fn render_file(base: &Path, path: &str, issues: &mut Vec<ScanIssue>) -> String {
        let lang = language_for(path);

        match fs::read(base.join(path)) {
            Ok(bytes) => {
                let text = match String::from_utf8(bytes) {
                    Ok(text) => text,
                    Err(err) => {
                        log::debug!("Lossy decode for {}", path);
                        issues.push(ScanIssue::DecodeWarning(path.to_string()));
                        String::from_utf8_lossy(err.as_bytes()).into_owned()
                    }
                };
                let fence = fence_for(&text);
                format!("## {}\n\n{}{}\n{}\n{}\n\n", path, fence, lang, text, fence)
            }
            Err(err) => {
                issues.push(ScanIssue::ReadFailure {
                    path: path.to_string(),
                    message: err.to_string(),
                });
                format!(
                    "## {}\n\n> Could not read file: {}\n\n```{}\n\n```\n\n",
                    path, err, lang
                )
            }
        }
    }

    /// One path per line, for the side file.
    pub fn file_list(paths: &[String]) -> String {
        paths.iter().map(|p| format!("{}\n", p)).collect()
    }
}
