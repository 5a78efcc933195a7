use anyhow::Result;

use crate::db::KeyValueStore;
use crate::omdb::MovieGateway;

use super::detail::{DetailCompletion, DetailLoader, DetailRequest, DetailStatus, DetailView};
use super::search::{SearchCompletion, SearchCoordinator, SearchRequest};
use super::selection::{Selection, SelectionController};
use super::watched::{AddOutcome, WatchedStore};

#[derive(Debug, Clone)]
pub(crate) enum FetchRequest {
    Search(SearchRequest),
    Detail(DetailRequest),
}

#[derive(Debug)]
pub(crate) enum Completion {
    Search(SearchCompletion),
    Detail(DetailCompletion),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CommitOutcome {
    Added { title: String },
    AlreadyWatched,
    NeedsRating,
    NotReady,
}

/// Runs a request to completion on the calling thread.
pub(crate) fn execute(gateway: &dyn MovieGateway, request: FetchRequest) -> Completion {
    match request {
        FetchRequest::Search(request) => Completion::Search(SearchCompletion {
            generation: request.token.generation(),
            outcome: gateway.search(&request.query, &request.token),
        }),
        FetchRequest::Detail(request) => Completion::Detail(DetailCompletion {
            generation: request.token.generation(),
            outcome: gateway.fetch_by_id(&request.id, &request.token),
            id: request.id,
        }),
    }
}

/// The list pane, the detail pane and the watched list as one event-driven
/// state object. Requests it returns are executed elsewhere and fed back
/// through [`Browser::apply`].
pub(crate) struct Browser<S> {
    search: SearchCoordinator,
    selection: SelectionController,
    detail: DetailLoader,
    watched: WatchedStore<S>,
}

impl<S: KeyValueStore> Browser<S> {
    pub(crate) fn new(watched: WatchedStore<S>) -> Self {
        Self {
            search: SearchCoordinator::new(),
            selection: SelectionController::default(),
            detail: DetailLoader::new(),
            watched,
        }
    }

    pub(crate) fn search(&self) -> &SearchCoordinator {
        &self.search
    }

    pub(crate) fn selection(&self) -> &Selection {
        self.selection.state()
    }

    pub(crate) fn detail_status(&self) -> &DetailStatus {
        self.detail.status()
    }

    pub(crate) fn detail_view(&self) -> Option<DetailView<'_>> {
        self.detail.view(self.watched.all())
    }

    pub(crate) fn watched(&self) -> &WatchedStore<S> {
        &self.watched
    }

    pub(crate) fn set_query(&mut self, query: impl Into<String>) -> Option<FetchRequest> {
        let request = self.search.set_query(query)?;
        self.close();
        Some(FetchRequest::Search(request))
    }

    pub(crate) fn select(&mut self, id: &str) -> Option<FetchRequest> {
        match self.selection.select(id) {
            Selection::Selected(id) => {
                let id = id.clone();
                Some(FetchRequest::Detail(self.detail.load(&id)))
            }
            Selection::Unselected => {
                self.detail.clear();
                None
            }
        }
    }

    /// Returns whether a movie was open.
    pub(crate) fn close(&mut self) -> bool {
        let was_open = self.selection.close();
        self.detail.clear();
        was_open
    }

    pub(crate) fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Search(completion) => self.search.apply(completion),
            Completion::Detail(completion) => {
                if self.selection.selected_id() != Some(completion.id.as_str()) {
                    tracing::debug!(id = %completion.id, "detail arrived after selection moved on");
                    return false;
                }
                self.detail.apply(completion)
            }
        }
    }

    pub(crate) fn set_pending_rating(&mut self, rating: u8) {
        self.detail.set_pending_rating(rating);
    }

    /// Adds the open movie with the pending rating, then returns to the list.
    pub(crate) fn commit_watched(&mut self) -> Result<CommitOutcome> {
        let Some(view) = self.detail.view(self.watched.all()) else {
            return Ok(CommitOutcome::NotReady);
        };
        if view.is_watched {
            return Ok(CommitOutcome::AlreadyWatched);
        }
        if view.pending_rating == 0 {
            return Ok(CommitOutcome::NeedsRating);
        }

        let entry = view.detail.to_watched_entry(view.pending_rating);
        let title = entry.title.clone();
        match self.watched.add(entry)? {
            AddOutcome::Added => {
                tracing::info!(%title, "added to watched list");
                self.close();
                Ok(CommitOutcome::Added { title })
            }
            AddOutcome::AlreadyWatched => Ok(CommitOutcome::AlreadyWatched),
        }
    }

    pub(crate) fn remove_watched(&mut self, id: &str) -> Result<bool> {
        let removed = self.watched.remove(id)?;
        if removed {
            tracing::info!(id, "removed from watched list");
        }
        Ok(removed)
    }

    pub(crate) fn teardown(&mut self) {
        self.search.teardown();
        self.detail.clear();
    }
}
