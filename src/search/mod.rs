use crate::model::EntrySummary;
use crate::utils;

pub const DEFAULT_MAX_ID: u64 = 1010;
pub const SUGGESTION_LIMIT: usize = 3;

/// What a search term resolves to before any request is made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchPlan {
    /// Empty input, show the initial list again.
    Reload,
    /// First loaded entry whose name contains the term.
    Loaded { index: usize, entry: EntrySummary },
    /// Direct fetch by numeric id.
    ById(u64),
    NotFound {
        term: String,
        suggestions: Vec<String>,
    },
}

pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn find_loaded<'a>(entries: &'a [EntrySummary], term: &str) -> Option<(usize, &'a EntrySummary)> {
    entries
        .iter()
        .enumerate()
        .find(|(_, e)| e.name.to_lowercase().contains(term))
}

pub fn plan_search(raw: &str, entries: &[EntrySummary], max_id: u64) -> SearchPlan {
    let term = normalize_term(raw);
    if term.is_empty() {
        return SearchPlan::Reload;
    }
    if let Some((index, entry)) = find_loaded(entries, &term) {
        return SearchPlan::Loaded {
            index,
            entry: entry.clone(),
        };
    }
    match utils::parse_leading_id(&term) {
        Some(id) if id > 0 && id <= max_id => SearchPlan::ById(id),
        _ => {
            let suggestions = utils::closest_names(
                &term,
                entries.iter().map(|e| e.name.as_str()),
                SUGGESTION_LIMIT,
            );
            SearchPlan::NotFound { term, suggestions }
        }
    }
}
