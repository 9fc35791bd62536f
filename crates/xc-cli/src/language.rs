//! Language hint from a file extension
//!
//! The hint seeds the decoder until the stream's own `language` field
//! overrides it.

use std::path::Path;

/// Guess a language tag from the file extension; `text` when unknown.
pub fn guess(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let language = match ext.as_str() {
        "rs" => "rust",
        "py" => "python",
        "go" => "go",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "java" => "java",
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" => "cpp",
        "sh" | "bash" => "bash",
        "json" => "json",
        "css" => "css",
        "html" | "htm" | "xml" => "html",
        _ => "text",
    };
    language.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(guess(Path::new("main.rs")), "rust");
        assert_eq!(guess(Path::new("script.PY")), "python");
        assert_eq!(guess(Path::new("lib/util.cpp")), "cpp");
        assert_eq!(guess(Path::new("index.html")), "html");
    }

    #[test]
    fn unknown_or_missing_extension_is_text() {
        assert_eq!(guess(Path::new("Makefile")), "text");
        assert_eq!(guess(Path::new("data.bin")), "text");
    }
}
