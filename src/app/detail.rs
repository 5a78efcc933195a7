use crate::cancel::{CancelDomain, CancelToken};
use crate::models::{MAX_USER_RATING, MovieDetail, WatchedEntry};
use crate::omdb::GatewayError;

use super::search::NOT_FOUND_MESSAGE;

pub(crate) const DETAIL_FAILED_MESSAGE: &str = "Something went wrong with fetching movie details";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DetailStatus {
    Idle,
    Loading { id: String },
    Ready(MovieDetail),
    Error { id: String, message: String },
}

#[derive(Debug, Clone)]
pub(crate) struct DetailRequest {
    pub(crate) id: String,
    pub(crate) token: CancelToken,
}

#[derive(Debug)]
pub(crate) struct DetailCompletion {
    pub(crate) generation: u64,
    pub(crate) id: String,
    pub(crate) outcome: Result<MovieDetail, GatewayError>,
}

/// What the detail pane shows. `is_watched` and `watched_user_rating` are
/// looked up in the watched list each time, never copied.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DetailView<'a> {
    pub(crate) detail: &'a MovieDetail,
    pub(crate) is_watched: bool,
    pub(crate) watched_user_rating: Option<u8>,
    pub(crate) pending_rating: u8,
}

pub(crate) struct DetailLoader {
    status: DetailStatus,
    pending_rating: u8,
    domain: CancelDomain,
}

impl DetailLoader {
    pub(crate) fn new() -> Self {
        Self {
            status: DetailStatus::Idle,
            pending_rating: 0,
            domain: CancelDomain::new("detail"),
        }
    }

    pub(crate) fn status(&self) -> &DetailStatus {
        &self.status
    }

    #[cfg(test)]
    pub(crate) fn pending_rating(&self) -> u8 {
        self.pending_rating
    }

    pub(crate) fn set_pending_rating(&mut self, rating: u8) {
        self.pending_rating = rating.min(MAX_USER_RATING);
    }

    pub(crate) fn load(&mut self, id: &str) -> DetailRequest {
        let token = self.domain.begin();
        self.status = DetailStatus::Loading { id: id.to_string() };
        self.pending_rating = 0;
        tracing::debug!(id, generation = token.generation(), "detail fetch issued");
        DetailRequest {
            id: id.to_string(),
            token,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.domain.cancel();
        self.status = DetailStatus::Idle;
        self.pending_rating = 0;
    }

    pub(crate) fn apply(&mut self, completion: DetailCompletion) -> bool {
        if matches!(completion.outcome, Err(GatewayError::Cancelled)) {
            return false;
        }
        let loading_this = matches!(&self.status, DetailStatus::Loading { id } if *id == completion.id);
        if !loading_this || !self.domain.settle(completion.generation) {
            tracing::debug!(id = %completion.id, "discarding stale detail");
            return false;
        }

        self.status = match completion.outcome {
            Ok(detail) => DetailStatus::Ready(detail),
            Err(err) => {
                tracing::warn!(id = %completion.id, error = %err, "detail fetch failed");
                let message = match err {
                    GatewayError::NotFound(_) => NOT_FOUND_MESSAGE,
                    _ => DETAIL_FAILED_MESSAGE,
                };
                DetailStatus::Error {
                    id: completion.id,
                    message: message.to_string(),
                }
            }
        };
        true
    }

    pub(crate) fn view<'a>(&'a self, watched: &[WatchedEntry]) -> Option<DetailView<'a>> {
        let DetailStatus::Ready(detail) = &self.status else {
            return None;
        };
        let watched_user_rating = watched
            .iter()
            .find(|entry| entry.id == detail.id)
            .map(|entry| entry.user_rating);
        Some(DetailView {
            detail,
            is_watched: watched_user_rating.is_some(),
            watched_user_rating,
            pending_rating: self.pending_rating,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(id: &str) -> MovieDetail {
        MovieDetail {
            id: id.to_string(),
            title: format!("Title {id}"),
            year: "1994".to_string(),
            poster_url: "N/A".to_string(),
            runtime: "154 min".to_string(),
            runtime_minutes: Some(154),
            imdb_rating: Some(8.9),
            plot: String::new(),
            released: String::new(),
            actors: String::new(),
            director: String::new(),
            genre: String::new(),
        }
    }

    fn done(request: &DetailRequest, outcome: Result<MovieDetail, GatewayError>) -> DetailCompletion {
        DetailCompletion {
            generation: request.token.generation(),
            id: request.id.clone(),
            outcome,
        }
    }

    #[test]
    fn load_then_apply_reaches_ready() {
        let mut loader = DetailLoader::new();
        let request = loader.load("tt1");
        assert_eq!(loader.status(), &DetailStatus::Loading { id: "tt1".to_string() });

        assert!(loader.apply(done(&request, Ok(detail("tt1")))));
        assert_eq!(loader.status(), &DetailStatus::Ready(detail("tt1")));
    }

    #[test]
    fn superseded_fetch_is_cancelled_and_ignored() {
        let mut loader = DetailLoader::new();
        let first = loader.load("tt1");
        let second = loader.load("tt2");

        assert!(first.token.is_cancelled());
        assert!(!loader.apply(done(&first, Ok(detail("tt1")))));
        assert_eq!(loader.status(), &DetailStatus::Loading { id: "tt2".to_string() });
        assert!(loader.apply(done(&second, Ok(detail("tt2")))));
    }

    #[test]
    fn clear_drops_the_pending_fetch() {
        let mut loader = DetailLoader::new();
        let request = loader.load("tt1");
        loader.clear();

        assert!(request.token.is_cancelled());
        assert!(!loader.apply(done(&request, Ok(detail("tt1")))));
        assert_eq!(loader.status(), &DetailStatus::Idle);
    }

    #[test]
    fn errors_map_to_messages() {
        let mut loader = DetailLoader::new();
        let request = loader.load("tt1");
        loader.apply(done(&request, Err(GatewayError::NotFound("Incorrect IMDb ID.".to_string()))));
        assert_eq!(
            loader.status(),
            &DetailStatus::Error {
                id: "tt1".to_string(),
                message: NOT_FOUND_MESSAGE.to_string()
            }
        );

        let request = loader.load("tt2");
        loader.apply(done(&request, Err(GatewayError::Transport("reset".to_string()))));
        assert!(matches!(
            loader.status(),
            DetailStatus::Error { message, .. } if message == DETAIL_FAILED_MESSAGE
        ));
    }

    #[test]
    fn view_derives_watched_flags_from_the_list() {
        let mut loader = DetailLoader::new();
        let request = loader.load("tt1");
        loader.apply(done(&request, Ok(detail("tt1"))));

        let unwatched = loader.view(&[]).expect("ready detail has a view");
        assert!(!unwatched.is_watched);
        assert_eq!(unwatched.watched_user_rating, None);

        let watched = [detail("tt1").to_watched_entry(7)];
        let view = loader.view(&watched).expect("view");
        assert!(view.is_watched);
        assert_eq!(view.watched_user_rating, Some(7));
    }

    #[test]
    fn pending_rating_resets_per_selection_and_is_capped() {
        let mut loader = DetailLoader::new();
        loader.load("tt1");
        loader.set_pending_rating(42);
        assert_eq!(loader.pending_rating(), MAX_USER_RATING);

        loader.load("tt2");
        assert_eq!(loader.pending_rating(), 0);
    }
}
