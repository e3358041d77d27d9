/// A file-name exclusion pattern.
///
/// Only a single leading or trailing `*` is meaningful. A pattern marked on
/// both ends (`*x*`) is read as a suffix pattern whose suffix is `x*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NamePattern {
    Exact(String),
    Prefix(String),
    Suffix(String),
}

impl NamePattern {
    pub fn parse(raw: &str) -> Self {
        if let Some(suffix) = raw.strip_prefix('*') {
            NamePattern::Suffix(suffix.to_string())
        } else if let Some(prefix) = raw.strip_suffix('*') {
            NamePattern::Prefix(prefix.to_string())
        } else {
            NamePattern::Exact(raw.to_string())
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            NamePattern::Exact(name) => file_name == name,
            NamePattern::Prefix(prefix) => file_name.starts_with(prefix.as_str()),
            NamePattern::Suffix(suffix) => file_name.ends_with(suffix.as_str()),
        }
    }
}

pub fn matches_any(patterns: &[NamePattern], file_name: &str) -> bool {
    patterns.iter().any(|p| p.matches(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_requires_identical_name() {
        let p = NamePattern::parse("package-lock.json");
        assert!(p.matches("package-lock.json"));
        assert!(!p.matches("package-lock.json.bak"));
        assert!(!p.matches("Package-lock.json"));
    }

    #[test]
    fn prefix_matches_leading_characters() {
        let p = NamePattern::parse("test_*");
        assert_eq!(p, NamePattern::Prefix("test_".into()));
        assert!(p.matches("test_utils.py"));
        assert!(p.matches("test_"));
        assert!(!p.matches("my_test_utils.py"));
    }

    #[test]
    fn suffix_matches_trailing_characters() {
        let p = NamePattern::parse("*.min.js");
        assert!(p.matches("bundle.min.js"));
        assert!(!p.matches("bundle.js"));
    }

    #[test]
    fn double_star_reads_as_suffix() {
        let p = NamePattern::parse("*gen*");
        assert_eq!(p, NamePattern::Suffix("gen*".into()));
        assert!(p.matches("codegen*"));
        assert!(!p.matches("generated.rs"));
    }

    #[test]
    fn lone_star_matches_everything() {
        let p = NamePattern::parse("*");
        assert!(p.matches("anything.txt"));
        assert!(p.matches(""));
    }

    #[test]
    fn non_ascii_names_compare_by_characters() {
        let p = NamePattern::parse("*é.txt");
        assert!(p.matches("café.txt"));
        assert!(!p.matches("cafe.txt"));
    }

    #[test]
    fn matches_any_checks_every_pattern() {
        let patterns: Vec<_> = ["*.pyc", "Thumbs.db"].iter().map(|s| NamePattern::parse(s)).collect();
        assert!(matches_any(&patterns, "Thumbs.db"));
        assert!(matches_any(&patterns, "mod.pyc"));
        assert!(!matches_any(&patterns, "mod.py"));
        assert!(!matches_any(&[], "mod.py"));
    }
}
