//! Global free-text search across a row's rendered cells.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};

/// How the global search string is matched against a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchMode {
    /// Case-insensitive substring of any cell.
    #[default]
    Contains,
    /// Fuzzy match (nucleo) against any cell.
    Fuzzy,
}

/// Compiled global search query.
///
/// Built once per row-model computation and reused for every row.
pub struct GlobalSearch {
    needle: String,
    fuzzy: Option<(Pattern, Matcher)>,
}

impl GlobalSearch {
    /// Compile `query`. Blank queries produce `None`: nothing to filter.
    pub fn new(query: &str, mode: SearchMode) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let fuzzy = match mode {
            SearchMode::Contains => None,
            SearchMode::Fuzzy => Some((
                Pattern::new(
                    query,
                    CaseMatching::Ignore,
                    Normalization::Smart,
                    AtomKind::Fuzzy,
                ),
                Matcher::new(Config::DEFAULT),
            )),
        };

        Some(Self {
            needle: query.to_lowercase(),
            fuzzy,
        })
    }

    /// Whether any of `cells` matches.
    pub fn matches<I, S>(&mut self, cells: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match &mut self.fuzzy {
            None => cells
                .into_iter()
                .any(|cell| cell.as_ref().to_lowercase().contains(&self.needle)),
            Some((pattern, matcher)) => {
                let mut buf = Vec::new();
                cells.into_iter().any(|cell| {
                    let haystack = Utf32Str::new(cell.as_ref(), &mut buf);
                    pattern.score(haystack, matcher).is_some()
                })
            }
        }
    }
}
