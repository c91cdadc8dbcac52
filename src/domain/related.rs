use serde::Serialize;

/// A scored candidate page. Only pages with a positive score are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedResult {
    pub url: String,
    pub title: String,
    /// Jaccard similarity in `[0, 1]`.
    pub score: f64,
}

/// A related page as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedLink {
    pub url: String,
    pub title: String,
}

impl From<RelatedResult> for RelatedLink {
    fn from(result: RelatedResult) -> Self {
        Self {
            url: result.url,
            title: result.title,
        }
    }
}
