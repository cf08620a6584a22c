//! Citations and page grouping

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A scored excerpt of the source document supporting an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub relevance_score: f64,
    pub text: String,
    /// 1-based page of the source document
    pub page: u32,
}

impl Citation {
    pub fn new(relevance_score: f64, text: impl Into<String>, page: u32) -> Self {
        Self {
            relevance_score,
            text: text.into(),
            page,
        }
    }
}

/// Citations sharing a source page, in their original relative order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitationGroup {
    pub page: u32,
    pub citations: Vec<Citation>,
}

impl CitationGroup {
    pub fn len(&self) -> usize {
        self.citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }
}

/// Partition citations by page.
///
/// Groups are ordered by the first occurrence of each page in `citations`,
/// not by page number.
pub fn group_by_page(citations: &[Citation]) -> Vec<CitationGroup> {
    let mut groups: Vec<CitationGroup> = Vec::new();
    let mut index_by_page: HashMap<u32, usize> = HashMap::new();

    for citation in citations {
        if let Some(&idx) = index_by_page.get(&citation.page) {
            groups[idx].citations.push(citation.clone());
        } else {
            index_by_page.insert(citation.page, groups.len());
            groups.push(CitationGroup {
                page: citation.page,
                citations: vec![citation.clone()],
            });
        }
    }

    groups
}
