// src/types/profile.rs
use serde::Serialize;

/// The searcher's skill keywords, loaded once per run and never mutated.
///
/// Keywords are stored trimmed and lowercased, in configuration order, with
/// blanks and repeats dropped. Order carries no meaning for matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordProfile {
    keywords: Vec<String>,
}

impl KeywordProfile {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }

        Self {
            keywords: normalized,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Count keywords that appear as substrings of an already-lowercased text
    pub fn count_matches(&self, search_text: &str) -> usize {
        self.keywords
            .iter()
            .filter(|keyword| search_text.contains(keyword.as_str()))
            .count()
    }

    pub fn any_match(&self, search_text: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| search_text.contains(keyword.as_str()))
    }
}
