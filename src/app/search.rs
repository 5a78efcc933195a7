use crate::cancel::{CancelDomain, CancelToken};
use crate::models::SearchResultItem;
use crate::omdb::GatewayError;

pub(crate) const MIN_QUERY_CHARS: usize = 3;
pub(crate) const NOT_FOUND_MESSAGE: &str = "Movie not found";
pub(crate) const SEARCH_FAILED_MESSAGE: &str = "Something went wrong with fetching movies";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchStatus {
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone)]
pub(crate) struct SearchRequest {
    pub(crate) query: String,
    pub(crate) token: CancelToken,
}

#[derive(Debug)]
pub(crate) struct SearchCompletion {
    pub(crate) generation: u64,
    pub(crate) outcome: Result<Vec<SearchResultItem>, GatewayError>,
}

/// Owns the query and the visible result list. Only the response to the most
/// recently issued query may change what is visible.
pub(crate) struct SearchCoordinator {
    query: String,
    results: Vec<SearchResultItem>,
    status: SearchStatus,
    error_message: String,
    domain: CancelDomain,
}

impl SearchCoordinator {
    pub(crate) fn new() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            status: SearchStatus::Idle,
            error_message: String::new(),
            domain: CancelDomain::new("search"),
        }
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn results(&self) -> &[SearchResultItem] {
        &self.results
    }

    pub(crate) fn status(&self) -> SearchStatus {
        self.status
    }

    pub(crate) fn error_message(&self) -> &str {
        &self.error_message
    }

    pub(crate) fn set_query(&mut self, query: impl Into<String>) -> Option<SearchRequest> {
        self.query = query.into();
        let trimmed = self.query.trim();

        if trimmed.chars().count() < MIN_QUERY_CHARS {
            self.domain.cancel();
            self.results.clear();
            self.error_message.clear();
            self.status = SearchStatus::Idle;
            return None;
        }

        let token = self.domain.begin();
        self.status = SearchStatus::Loading;
        self.error_message.clear();
        tracing::debug!(query = trimmed, generation = token.generation(), "search issued");
        Some(SearchRequest {
            query: trimmed.to_string(),
            token,
        })
    }

    /// Returns whether the completion changed visible state.
    pub(crate) fn apply(&mut self, completion: SearchCompletion) -> bool {
        if matches!(completion.outcome, Err(GatewayError::Cancelled)) {
            return false;
        }
        if !self.domain.settle(completion.generation) {
            return false;
        }

        match completion.outcome {
            Ok(items) => {
                tracing::debug!(count = items.len(), "search results applied");
                self.results = items;
                self.status = SearchStatus::Ready;
            }
            Err(GatewayError::NotFound(detail)) => {
                tracing::debug!(%detail, "search matched nothing");
                self.fail(NOT_FOUND_MESSAGE);
            }
            Err(err) => {
                tracing::warn!(error = %err, "search failed");
                self.fail(SEARCH_FAILED_MESSAGE);
            }
        }
        true
    }

    pub(crate) fn teardown(&mut self) {
        self.domain.cancel();
    }

    fn fail(&mut self, message: &str) {
        self.results.clear();
        self.error_message = message.to_string();
        self.status = SearchStatus::Error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> SearchResultItem {
        SearchResultItem {
            id: id.to_string(),
            title: format!("Title {id}"),
            year: "1999".to_string(),
            poster_url: "N/A".to_string(),
        }
    }

    fn done(request: &SearchRequest, outcome: Result<Vec<SearchResultItem>, GatewayError>) -> SearchCompletion {
        SearchCompletion {
            generation: request.token.generation(),
            outcome,
        }
    }

    #[test]
    fn short_queries_go_idle_from_any_state() {
        let mut search = SearchCoordinator::new();
        let request = search.set_query("matrix").expect("long query issues a request");
        search.apply(done(&request, Ok(vec![item("tt1")])));
        assert_eq!(search.status(), SearchStatus::Ready);

        for short in ["", "a", "ab", "  ab  ", "\tx "] {
            assert!(search.set_query(short).is_none(), "query {short:?} must not fetch");
            assert_eq!(search.status(), SearchStatus::Idle);
            assert!(search.results().is_empty());
            assert!(search.error_message().is_empty());
        }

        let failing = search.set_query("matrix").expect("request");
        search.apply(done(&failing, Err(GatewayError::Transport("boom".to_string()))));
        assert_eq!(search.status(), SearchStatus::Error);
        assert!(search.set_query("ma").is_none());
        assert_eq!(search.status(), SearchStatus::Idle);
        assert!(search.error_message().is_empty());
    }

    #[test]
    fn short_query_cancels_the_in_flight_search() {
        let mut search = SearchCoordinator::new();
        let request = search.set_query("alien").expect("request");
        assert!(search.set_query("al").is_none());

        assert!(request.token.is_cancelled());
        assert!(!search.apply(done(&request, Ok(vec![item("tt1")]))));
        assert!(search.results().is_empty());
        assert_eq!(search.status(), SearchStatus::Idle);
    }

    #[test]
    fn query_is_trimmed_before_sending() {
        let mut search = SearchCoordinator::new();
        let request = search.set_query("  heat ").expect("request");
        assert_eq!(request.query, "heat");
        assert_eq!(search.query(), "  heat ");
        assert_eq!(search.status(), SearchStatus::Loading);
    }

    #[test]
    fn only_the_latest_query_response_is_applied() {
        let mut search = SearchCoordinator::new();
        let first = search.set_query("star").expect("request");
        let second = search.set_query("star wars").expect("request");
        let third = search.set_query("star trek").expect("request");

        assert!(first.token.is_cancelled());
        assert!(second.token.is_cancelled());

        // Newest first, then the stale ones trickle in.
        assert!(search.apply(done(&third, Ok(vec![item("trek")]))));
        assert!(!search.apply(done(&first, Ok(vec![item("star")]))));
        assert!(!search.apply(done(&second, Err(GatewayError::NotFound("x".to_string())))));

        assert_eq!(search.status(), SearchStatus::Ready);
        assert_eq!(search.results(), [item("trek")]);
    }

    #[test]
    fn stale_response_arriving_before_the_live_one_is_ignored() {
        let mut search = SearchCoordinator::new();
        let old = search.set_query("dune").expect("request");
        let live = search.set_query("dune 2021").expect("request");

        assert!(!search.apply(done(&old, Ok(vec![item("old")]))));
        assert_eq!(search.status(), SearchStatus::Loading);
        assert!(search.results().is_empty());

        assert!(search.apply(done(&live, Ok(vec![item("new")]))));
        assert_eq!(search.results(), [item("new")]);
    }

    #[test]
    fn not_found_and_transport_errors_set_their_messages() {
        let mut search = SearchCoordinator::new();
        let request = search.set_query("tokyo").expect("request");
        search.apply(done(&request, Ok(vec![item("tt1")])));

        let request = search.set_query("xyqqz999").expect("request");
        search.apply(done(&request, Err(GatewayError::NotFound("Movie not found!".to_string()))));
        assert_eq!(search.status(), SearchStatus::Error);
        assert_eq!(search.error_message(), NOT_FOUND_MESSAGE);
        assert!(search.results().is_empty());

        let request = search.set_query("tokyo").expect("request");
        search.apply(done(&request, Err(GatewayError::Parse("eof".to_string()))));
        assert_eq!(search.error_message(), SEARCH_FAILED_MESSAGE);
    }

    #[test]
    fn cancelled_outcome_changes_nothing() {
        let mut search = SearchCoordinator::new();
        let request = search.set_query("blade").expect("request");

        assert!(!search.apply(done(&request, Err(GatewayError::Cancelled))));
        assert_eq!(search.status(), SearchStatus::Loading);
        assert!(search.error_message().is_empty());
    }

    #[test]
    fn teardown_discards_the_outstanding_response() {
        let mut search = SearchCoordinator::new();
        let request = search.set_query("brazil").expect("request");
        search.teardown();

        assert!(request.token.is_cancelled());
        assert!(!search.apply(done(&request, Ok(vec![item("tt1")]))));
        assert!(search.results().is_empty());
    }
}
