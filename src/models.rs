use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultItem {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    /// Free-text runtime as returned by the API, e.g. `"142 min"`.
    pub runtime: String,
    pub runtime_minutes: Option<u32>,
    pub imdb_rating: Option<f64>,
    pub plot: String,
    pub released: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}

impl MovieDetail {
    pub fn to_watched_entry(&self, user_rating: u8) -> WatchedEntry {
        WatchedEntry {
            id: self.id.clone(),
            title: self.title.clone(),
            year: self.year.clone(),
            poster_url: self.poster_url.clone(),
            imdb_rating: self.imdb_rating,
            runtime_minutes: self.runtime_minutes,
            user_rating,
        }
    }
}

/// One row of the persisted watched list. Field names match the JSON the
/// list has always been stored with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedEntry {
    #[serde(rename = "imdbID")]
    pub id: String,
    pub title: String,
    pub year: String,
    #[serde(rename = "poster")]
    pub poster_url: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<f64>,
    #[serde(rename = "runtime")]
    pub runtime_minutes: Option<u32>,
    #[serde(rename = "userRating")]
    pub user_rating: u8,
}

pub const MAX_USER_RATING: u8 = 10;
