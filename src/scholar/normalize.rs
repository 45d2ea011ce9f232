use super::types::{OrganicResult, SearchResult};

pub fn normalize_results(raw: Vec<OrganicResult>, limit: usize) -> Vec<SearchResult> {
    raw.into_iter().take(limit).map(normalize).collect()
}

fn normalize(entry: OrganicResult) -> SearchResult {
    let summary = entry
        .publication_info
        .and_then(|p| p.summary)
        .unwrap_or_default();
    let citations = entry
        .inline_links
        .and_then(|l| l.cited_by)
        .and_then(|c| c.total)
        .unwrap_or(0);

    SearchResult {
        title: entry.title.unwrap_or_default(),
        snippet: entry.snippet.unwrap_or_default(),
        link: entry.link.unwrap_or_default(),
        source: summary.clone(),
        date: summary,
        citations,
    }
}
