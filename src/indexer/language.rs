//! Programming language detection from file extensions

use std::collections::HashMap;
use std::path::Path;

/// Label reported for extensions missing from the table
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Built-in extension -> label pairs
///
/// Deliberately narrower than the selection allow-list: markup and config
/// files are chunked but report [`UNKNOWN_LANGUAGE`].
const BUILTIN_LANGUAGES: &[(&str, &str)] = &[
    ("py", "Python"),
    ("js", "JavaScript"),
    ("ts", "TypeScript"),
    ("java", "Java"),
    ("cpp", "C++"),
    ("go", "Go"),
    ("rs", "Rust"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("cs", "C#"),
];

/// Extension to language label lookup
#[derive(Debug, Clone)]
pub struct LanguageTable {
    labels: HashMap<String, String>,
}

impl LanguageTable {
    /// Built-in table with `overrides` merged on top
    ///
    /// Override keys may carry a leading dot and any casing.
    pub fn with_overrides<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut table = Self::default();
        for (ext, label) in overrides {
            table.labels.insert(normalize_extension(ext), label.clone());
        }
        table
    }

    /// Detect programming language from a bare extension
    pub fn detect(&self, extension: &str) -> &str {
        self.labels
            .get(&normalize_extension(extension))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LANGUAGE)
    }

    /// Detect programming language from a file path
    pub fn detect_path(&self, path: &Path) -> &str {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.detect(ext))
            .unwrap_or(UNKNOWN_LANGUAGE)
    }
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self {
            labels: BUILTIN_LANGUAGES
                .iter()
                .map(|(ext, label)| (ext.to_string(), label.to_string()))
                .collect(),
        }
    }
}

/// Lowercase and strip a leading dot
pub(crate) fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}
