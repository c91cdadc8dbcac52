/// Domain suffixes that may be crawled.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    suffixes: Vec<String>,
}

impl AllowList {
    /// Entries are trimmed and lowercased, empty ones dropped.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            suffixes: entries
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// A domain is allowed when it ends with any configured suffix.
    pub fn is_allowed(&self, domain: &str) -> bool {
        self.suffixes.iter().any(|suffix| domain.ends_with(suffix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::AllowList;

    #[test]
    fn matches_subdomains_by_suffix() {
        let allow_list = AllowList::new(["example.com"]);
        assert!(allow_list.is_allowed("example.com"));
        assert!(allow_list.is_allowed("sub.example.com"));
        assert!(!allow_list.is_allowed("other.com"));
    }

    #[test]
    fn normalizes_entries() {
        let allow_list = AllowList::new([" Example.COM ", "", "  "]);
        assert!(allow_list.is_allowed("blog.example.com"));
        assert!(!allow_list.is_allowed(""));
    }

    #[test]
    fn empty_list_allows_nothing() {
        assert!(!AllowList::default().is_allowed("example.com"));
    }
}
