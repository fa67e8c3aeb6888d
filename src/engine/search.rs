/// A keyword search request.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    /// Free-text query; tokenized like indexed content.
    pub query: String,

    /// Maximum number of results. Falls back to the store's configured
    /// default, and to "all matches" if neither is set.
    pub top_k: Option<usize>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: None,
        }
    }

    pub fn builder(query: impl Into<String>) -> SearchRequestBuilder {
        SearchRequestBuilder {
            request: Self::new(query),
        }
    }
}

pub struct SearchRequestBuilder {
    request: SearchRequest,
}

impl SearchRequestBuilder {
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.request.top_k = Some(top_k);
        self
    }

    pub fn build(self) -> SearchRequest {
        self.request
    }
}

/// A ranked result together with its overlap score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<T> {
    pub item: T,
    pub score: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = SearchRequest::builder("cat dog").top_k(2).build();
        assert_eq!(request.query, "cat dog");
        assert_eq!(request.top_k, Some(2));

        assert_eq!(SearchRequest::new("x").top_k, None);
    }
}
