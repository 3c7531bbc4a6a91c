/// Extension-based classification of files into named categories.
///
/// A [`CategoryRules`] value is an ordered list of [`CategoryRule`]s. A file is
/// assigned to the first rule whose extension set contains the file's
/// lowercase extension, or to the fallback category when nothing matches.
///
/// # Examples
///
/// ```
/// use dirsort::file_category::CategoryRules;
///
/// let rules = CategoryRules::default();
/// assert_eq!(rules.classify(".png"), "Images");
/// assert_eq!(rules.classify(".txt"), "Documents");
/// assert_eq!(rules.classify(".unknownext"), "Others");
/// ```
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Name of the catch-all category for files no rule claims.
pub const FALLBACK_CATEGORY: &str = "Others";

/// A named category and the extensions that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category name, also used verbatim as the subfolder name.
    pub name: String,
    /// Lowercase extensions including the leading dot (e.g. `.jpg`).
    pub extensions: BTreeSet<String>,
}

impl CategoryRule {
    /// Creates a rule, normalizing every extension with [`normalize_extension`].
    ///
    /// Empty extensions are dropped so that extensionless files always fall
    /// through to the fallback category.
    pub fn new<I, S>(name: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            extensions: extensions
                .into_iter()
                .filter_map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
        }
    }

    /// Returns true if `extension` (already normalized) belongs to this rule.
    pub fn matches(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }
}

/// The ordered classification table used by the organizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl CategoryRules {
    /// Builds a rule table from an ordered list of rules.
    ///
    /// The fallback category is appended with an empty extension set when the
    /// list does not already contain it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateCategory`] if two rules share a name and
    /// [`ConfigError::InvalidCategoryName`] if a name cannot be used as a folder.
    pub fn new(mut rules: Vec<CategoryRule>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            validate_category_name(&rule.name)?;
            if !seen.insert(rule.name.as_str()) {
                return Err(ConfigError::DuplicateCategory(rule.name.clone()));
            }
        }

        if !seen.contains(FALLBACK_CATEGORY) {
            rules.push(CategoryRule::new(FALLBACK_CATEGORY, Vec::<String>::new()));
        }

        Ok(Self { rules })
    }

    /// Returns the category name for a normalized extension.
    ///
    /// Rules are tried in order; the first match wins. Unknown and empty
    /// extensions map to [`FALLBACK_CATEGORY`].
    pub fn classify(&self, extension: &str) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.matches(extension))
            .map_or(FALLBACK_CATEGORY, |rule| rule.name.as_str())
    }

    /// Classifies a path by its extension.
    pub fn classify_path(&self, path: &Path) -> &str {
        self.classify(&extension_of(path))
    }

    /// Category names in classification order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }

    /// The rules in classification order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            rules: vec![
                CategoryRule::new(
                    "Images",
                    [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".tiff"],
                ),
                CategoryRule::new(
                    "Documents",
                    [
                        ".pdf", ".docx", ".doc", ".txt", ".pptx", ".xlsx", ".odt", ".rtf",
                    ],
                ),
                CategoryRule::new("Videos", [".mp4", ".mov", ".avi", ".mkv", ".flv", ".wmv"]),
                CategoryRule::new("Audio", [".mp3", ".wav", ".aac", ".flac", ".ogg"]),
                CategoryRule::new("Archives", [".zip", ".rar", ".7z", ".tar", ".gz"]),
                CategoryRule::new("Scripts", [".py", ".js", ".html", ".css", ".sh", ".bat"]),
                CategoryRule::new(FALLBACK_CATEGORY, Vec::<String>::new()),
            ],
        }
    }
}

/// Normalizes a configured extension to lowercase with a leading dot.
///
/// `"JPG"`, `".jpg"` and `" .Jpg "` all become `".jpg"`. Returns `None` for
/// an empty extension.
pub fn normalize_extension(extension: &str) -> Option<String> {
    let trimmed = extension.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}

/// Returns the lowercase extension of a path including the leading dot.
///
/// Only the last extension counts (`archive.tar.gz` gives `.gz`). Dotfiles
/// such as `.bashrc` and files without an extension give an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

fn validate_category_name(name: &str) -> Result<(), ConfigError> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\']);
    if invalid {
        return Err(ConfigError::InvalidCategoryName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_order() {
        let rules = CategoryRules::default();
        let names: Vec<_> = rules.names().collect();
        assert_eq!(
            names,
            vec![
                "Images",
                "Documents",
                "Videos",
                "Audio",
                "Archives",
                "Scripts",
                "Others"
            ]
        );
    }

    #[test]
    fn test_classify_known_extensions() {
        let rules = CategoryRules::default();
        assert_eq!(rules.classify(".jpeg"), "Images");
        assert_eq!(rules.classify(".docx"), "Documents");
        assert_eq!(rules.classify(".mkv"), "Videos");
        assert_eq!(rules.classify(".flac"), "Audio");
        assert_eq!(rules.classify(".7z"), "Archives");
        assert_eq!(rules.classify(".sh"), "Scripts");
    }

    #[test]
    fn test_classify_unknown_goes_to_fallback() {
        let rules = CategoryRules::default();
        assert_eq!(rules.classify(".xyz"), FALLBACK_CATEGORY);
        assert_eq!(rules.classify(""), FALLBACK_CATEGORY);
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let rules = CategoryRules::new(vec![
            CategoryRule::new("Web", [".html"]),
            CategoryRule::new("Scripts", [".html", ".js"]),
        ])
        .unwrap();

        assert_eq!(rules.classify(".html"), "Web");
        assert_eq!(rules.classify(".js"), "Scripts");
    }

    #[test]
    fn test_fallback_appended_once() {
        let rules = CategoryRules::new(vec![CategoryRule::new("Images", ["png"])]).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.names().last(), Some(FALLBACK_CATEGORY));

        let explicit = CategoryRules::new(vec![
            CategoryRule::new(FALLBACK_CATEGORY, Vec::<String>::new()),
            CategoryRule::new("Images", ["png"]),
        ])
        .unwrap();
        assert_eq!(explicit.len(), 2);
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let result = CategoryRules::new(vec![
            CategoryRule::new("Images", ["png"]),
            CategoryRule::new("Images", ["jpg"]),
        ]);
        assert!(matches!(result, Err(ConfigError::DuplicateCategory(name)) if name == "Images"));
    }

    #[test]
    fn test_invalid_category_name_rejected() {
        for name in ["", "..", "a/b", "a\\b"] {
            let result = CategoryRules::new(vec![CategoryRule::new(name, ["png"])]);
            assert!(
                matches!(result, Err(ConfigError::InvalidCategoryName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rule_normalizes_extensions() {
        let rule = CategoryRule::new("Images", ["PNG", ".Jpg", "", "."]);
        assert!(rule.matches(".png"));
        assert!(rule.matches(".jpg"));
        assert_eq!(rule.extensions.len(), 2);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("photo.JPG")), ".jpg");
        assert_eq!(extension_of(Path::new("archive.tar.GZ")), ".gz");
        assert_eq!(extension_of(Path::new("README")), "");
        assert_eq!(extension_of(Path::new(".bashrc")), "");
    }

    #[test]
    fn test_classify_path_is_case_insensitive() {
        let rules = CategoryRules::default();
        assert_eq!(rules.classify_path(Path::new("photo.JPG")), "Images");
        assert_eq!(rules.classify_path(Path::new("notes.Txt")), "Documents");
    }
}
