//! Snippet library filtering.

use crate::models::Snippet;

/// Snippets matching a free-text query and an optional category.
///
/// The query matches case-insensitively against name, description, or any
/// tag; an empty query matches everything. A category matches when it
/// equals the snippet's language or, lowercased, one of its tags.
pub fn filter_snippets<'a>(
    snippets: &'a [Snippet],
    query: &str,
    category: Option<&str>,
) -> Vec<&'a Snippet> {
    let query = query.to_lowercase();
    snippets
        .iter()
        .filter(|s| matches_query(s, &query))
        .filter(|s| category.map_or(true, |c| in_category(s, c)))
        .collect()
}

/// Number of snippets in `category`.
pub fn category_count(snippets: &[Snippet], category: &str) -> usize {
    snippets.iter().filter(|s| in_category(s, category)).count()
}

fn matches_query(snippet: &Snippet, query: &str) -> bool {
    snippet.name.to_lowercase().contains(query)
        || snippet.description.to_lowercase().contains(query)
        || snippet
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(query))
}

fn in_category(snippet: &Snippet, category: &str) -> bool {
    let lowered = category.to_lowercase();
    snippet.language == category || snippet.tags.iter().any(|tag| *tag == lowered)
}
