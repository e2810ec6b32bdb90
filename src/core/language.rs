//! Extension-based language detection and language families.

use std::path::Path;

/// Returned when no rule identifies the language
pub const UNKNOWN: &str = "unknown";

/// How a language delimits top-level blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFamily {
    /// Blocks open at `def`/`class` style declaration lines
    Indentation,
    /// Blocks are balanced `{ ... }` regions
    Brace,
    /// No block structure is detected
    Plain,
}

/// Map a file extension (with or without the leading dot) to a language
pub fn language_for_extension(ext: &str) -> &'static str {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();
    match ext.as_str() {
        "py" | "pyi" => "python",
        "js" | "jsx" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "java" => "java",
        "cpp" | "cc" | "cxx" | "hpp" => "cpp",
        "c" | "h" => "c",
        "cs" => "csharp",
        "go" => "go",
        "rs" => "rust",
        "rb" => "ruby",
        "php" => "php",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        "scala" => "scala",
        "md" => "markdown",
        "txt" => "text",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "xml" => "xml",
        "html" | "htm" => "html",
        "css" => "css",
        "sql" => "sql",
        "sh" | "bash" => "bash",
        _ => UNKNOWN,
    }
}

/// Language for a path, based on its extension
pub fn language_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .map(language_for_extension)
        .unwrap_or(UNKNOWN)
}

/// Keyword sniffing for content whose extension told us nothing
pub fn sniff_language(text: &str) -> Option<&'static str> {
    if ["def ", "import ", "class "].iter().any(|k| text.contains(k)) {
        Some("python")
    } else if ["function ", "const ", "let "].iter().any(|k| text.contains(k)) {
        Some("javascript")
    } else if ["public class", "private "].iter().any(|k| text.contains(k)) {
        Some("java")
    } else {
        None
    }
}

pub fn family(language: &str) -> LanguageFamily {
    match language {
        "python" | "ruby" => LanguageFamily::Indentation,
        "c" | "cpp" | "csharp" | "java" | "javascript" | "typescript" | "go" | "rust"
        | "kotlin" | "swift" | "scala" | "php" => LanguageFamily::Brace,
        _ => LanguageFamily::Plain,
    }
}
