//! Name filtering for a pane's entry list.
//!
//! Both modes use smart case: a pattern with any uppercase letter matches
//! case-sensitively, otherwise case is ignored. The `..` entry always passes.

use regex::Regex;

use crate::error::Result;
use crate::fs::entry::DirEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    None,
    /// Substring match, re-applied on every keystroke.
    Incremental,
    /// Regular expression, compiled once when confirmed.
    Regex,
}

impl FilterMode {
    pub fn label(&self) -> &'static str {
        match self {
            FilterMode::None => "",
            FilterMode::Incremental => "filter",
            FilterMode::Regex => "regex",
        }
    }
}

/// True when `pattern` forces case-sensitive matching.
pub fn is_case_sensitive(pattern: &str) -> bool {
    pattern.chars().any(char::is_uppercase)
}

/// A compiled filter pattern.
#[derive(Debug, Clone)]
pub enum Matcher {
    Substring { needle: String, case_sensitive: bool },
    Regex(Regex),
}

impl Matcher {
    pub fn substring(pattern: &str) -> Self {
        let case_sensitive = is_case_sensitive(pattern);
        let needle = if case_sensitive {
            pattern.to_string()
        } else {
            pattern.to_lowercase()
        };
        Matcher::Substring {
            needle,
            case_sensitive,
        }
    }

    /// Compile a regex pattern, prefixing `(?i)` when smart case says so.
    pub fn regex(pattern: &str) -> Result<Self> {
        let source = if is_case_sensitive(pattern) {
            pattern.to_string()
        } else {
            format!("(?i){pattern}")
        };
        Ok(Matcher::Regex(Regex::new(&source)?))
    }

    /// Build the matcher for `mode`. `FilterMode::None` yields no matcher.
    pub fn build(pattern: &str, mode: FilterMode) -> Result<Option<Self>> {
        match mode {
            FilterMode::None => Ok(None),
            FilterMode::Incremental => Ok(Some(Self::substring(pattern))),
            FilterMode::Regex => Self::regex(pattern).map(Some),
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        match self {
            Matcher::Substring {
                needle,
                case_sensitive: true,
            } => name.contains(needle.as_str()),
            Matcher::Substring { needle, .. } => name.to_lowercase().contains(needle.as_str()),
            Matcher::Regex(re) => re.is_match(name),
        }
    }
}

/// Entries of `all` that pass `matcher`, in their original relative order.
pub fn filter_entries(all: &[DirEntry], matcher: &Matcher) -> Vec<DirEntry> {
    all.iter()
        .filter(|e| e.is_parent() || matcher.is_match(&e.name))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::source::mock::file;

    fn sample() -> Vec<DirEntry> {
        vec![
            DirEntry::parent(),
            file("README.md", 1),
            file("readme.txt", 1),
            file("main.rs", 1),
            file("Cargo.toml", 1),
        ]
    }

    fn names(entries: &[DirEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn lowercase_pattern_is_case_insensitive() {
        let out = filter_entries(&sample(), &Matcher::substring("readme"));
        assert_eq!(names(&out), vec!["..", "README.md", "readme.txt"]);
    }

    #[test]
    fn uppercase_pattern_is_case_sensitive() {
        let out = filter_entries(&sample(), &Matcher::substring("README"));
        assert_eq!(names(&out), vec!["..", "README.md"]);
    }

    #[test]
    fn parent_entry_always_passes() {
        let out = filter_entries(&sample(), &Matcher::substring("zzz"));
        assert_eq!(names(&out), vec![".."]);
    }

    #[test]
    fn regex_smart_case() {
        let insensitive = Matcher::regex(r"^readme\.").unwrap();
        let out = filter_entries(&sample(), &insensitive);
        assert_eq!(names(&out), vec!["..", "README.md", "readme.txt"]);

        let sensitive = Matcher::regex(r"^[A-Z]").unwrap();
        let out = filter_entries(&sample(), &sensitive);
        assert_eq!(names(&out), vec!["..", "README.md", "Cargo.toml"]);
    }

    #[test]
    fn regex_anchors_and_alternation() {
        let m = Matcher::regex(r"\.(rs|toml)$").unwrap();
        let out = filter_entries(&sample(), &m);
        assert_eq!(names(&out), vec!["..", "main.rs", "Cargo.toml"]);
    }

    #[test]
    fn invalid_regex_is_an_error() {
        assert!(Matcher::regex("(unclosed").is_err());
        assert!(Matcher::build("[", FilterMode::Regex).is_err());
    }

    #[test]
    fn build_none_mode_has_no_matcher() {
        assert!(Matcher::build("abc", FilterMode::None).unwrap().is_none());
        assert!(matches!(
            Matcher::build("abc", FilterMode::Incremental).unwrap(),
            Some(Matcher::Substring { .. })
        ));
    }

    #[test]
    fn smart_case_detection() {
        assert!(!is_case_sensitive("readme"));
        assert!(is_case_sensitive("ReadMe"));
        assert!(!is_case_sensitive("123_.-"));
    }
}
