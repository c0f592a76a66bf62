//! Built-in check targets: the vendor pages this team actually watches.

/// A known vendor page and the pattern that finds its version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckTarget {
    pub name: &'static str,
    pub url: &'static str,
    /// Regex over the raw page body; first capture group is the version when
    /// present, otherwise the whole match.
    pub pattern: &'static str,
}

pub const BUILTIN: &[CheckTarget] = &[
    CheckTarget {
        name: "elasticsearch",
        url: "https://www.elastic.co/downloads/elasticsearch",
        pattern: r"(?i)Version:\s*</strong>\s*([\d.]+)</p>",
    },
    CheckTarget {
        name: "nginx",
        url: "https://nginx.org/en/download.html",
        pattern: r"nginx-(\d+\.\d+\.\d+)\.tar\.gz",
    },
    CheckTarget {
        name: "sonatype-iq",
        url: "https://help.sonatype.com/en/iq-server-release-notes.html",
        pattern: r"\b\d{3}\b",
    },
];

/// Look up a built-in target by name.
pub fn find_target(name: &str) -> Option<&'static CheckTarget> {
    BUILTIN.iter().find(|t| t.name == name)
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;

    #[test]
    fn all_builtin_patterns_compile() {
        for target in BUILTIN {
            assert!(Regex::new(target.pattern).is_ok(), "bad pattern for {}", target.name);
        }
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(find_target("nginx").map(|t| t.url), Some("https://nginx.org/en/download.html"));
        assert!(find_target("imaginary").is_none());
    }
}
