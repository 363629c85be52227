//! Filter vocabulary derived from the stored corpus.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Distinct competitor tags and sources present in the corpus, each
/// sorted ascending. This is what filter pickers are populated from;
/// it reflects the data, not a configured list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetVocabulary {
    pub competitors: Vec<String>,
    pub sources: Vec<String>,
}

impl FacetVocabulary {
    /// Builds the vocabulary from `(competitor_tags, source)` pairs, one
    /// per stored article. Duplicates collapse; articles with an empty
    /// source contribute nothing to the source list.
    #[must_use]
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (Vec<String>, String)>,
    {
        let mut competitors = BTreeSet::new();
        let mut sources = BTreeSet::new();
        for (tags, source) in rows {
            competitors.extend(tags);
            if !source.is_empty() {
                sources.insert(source);
            }
        }
        Self {
            competitors: competitors.into_iter().collect(),
            sources: sources.into_iter().collect(),
        }
    }

    /// True when the corpus yielded no facet values at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty() && self.sources.is_empty()
    }
}
