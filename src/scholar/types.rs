use serde::{Deserialize, Serialize};

/// Raw SerpAPI `google_scholar` response. Only the fields we read are modeled.
#[derive(Debug, Deserialize)]
pub struct ScholarResponse {
    pub organic_results: Option<Vec<OrganicResult>>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrganicResult {
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub link: Option<String>,
    pub publication_info: Option<PublicationInfo>,
    pub inline_links: Option<InlineLinks>,
}

#[derive(Debug, Deserialize)]
pub struct PublicationInfo {
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InlineLinks {
    pub cited_by: Option<CitedBy>,
}

#[derive(Debug, Deserialize)]
pub struct CitedBy {
    pub total: Option<u64>,
}

/// One normalized scholar hit.
///
/// `source` and `date` both carry the publication summary line
/// ("A Author, B Author - Journal, 2023 - publisher.com"); SerpAPI does not
/// split them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
    pub source: String,
    pub date: String,
    pub citations: u64,
}
