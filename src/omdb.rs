//! OMDb search and by-id gateway.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::cancel::CancelToken;
use crate::config::{ConfigError, GatewayConfig};
use crate::http::{self, HttpError};
use crate::models::{MovieDetail, SearchResultItem};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// The request was superseded or torn down; callers treat it as a no-op.
    #[error("request cancelled")]
    Cancelled,

    #[error("no match: {0}")]
    NotFound(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Parse(String),
}

pub trait MovieGateway: Send + Sync {
    fn search(
        &self,
        query: &str,
        token: &CancelToken,
    ) -> Result<Vec<SearchResultItem>, GatewayError>;

    fn fetch_by_id(&self, id: &str, token: &CancelToken) -> Result<MovieDetail, GatewayError>;
}

pub struct OmdbGateway {
    config: GatewayConfig,
    agent: ureq::Agent,
}

impl OmdbGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        config.require_api_key()?;
        let agent = http::build_agent(config.connect_timeout(), config.read_timeout());
        Ok(Self { config, agent })
    }

    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        token: &CancelToken,
    ) -> Result<String, GatewayError> {
        if token.is_cancelled() {
            return Err(GatewayError::Cancelled);
        }
        let outcome = http::get_text(&self.agent, url, query);
        // ureq cannot abort a blocking call, so the result is dropped instead.
        if token.is_cancelled() {
            return Err(GatewayError::Cancelled);
        }
        outcome.map_err(|err| match err {
            HttpError::Decode(message) => GatewayError::Parse(message),
            other => GatewayError::Transport(other.to_string()),
        })
    }
}

impl MovieGateway for OmdbGateway {
    fn search(
        &self,
        query: &str,
        token: &CancelToken,
    ) -> Result<Vec<SearchResultItem>, GatewayError> {
        tracing::debug!(query, generation = token.generation(), "searching omdb");
        let body = self.get(
            &self.config.search_base_url,
            &[("apikey", self.config.api_key.as_str()), ("s", query)],
            token,
        )?;
        parse_search_payload(&body)
    }

    fn fetch_by_id(&self, id: &str, token: &CancelToken) -> Result<MovieDetail, GatewayError> {
        tracing::debug!(id, generation = token.generation(), "fetching omdb detail");
        let body = self.get(
            &self.config.detail_base_url,
            &[("apikey", self.config.api_key.as_str()), ("i", id)],
            token,
        )?;
        parse_detail_payload(&body, id)
    }
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<SearchHit>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "imdbID")]
    id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
}

#[derive(Debug, Deserialize)]
struct DetailPayload {
    #[serde(rename = "Response", default)]
    response: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Runtime", default)]
    runtime: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Released", default)]
    released: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Genre", default)]
    genre: String,
}

fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, GatewayError> {
    serde_json::from_str(raw).map_err(|err| GatewayError::Parse(err.to_string()))
}

fn is_false_flag(flag: &str) -> bool {
    flag.trim().eq_ignore_ascii_case("false")
}

pub(crate) fn parse_search_payload(raw: &str) -> Result<Vec<SearchResultItem>, GatewayError> {
    let payload: SearchPayload = decode(raw)?;
    if is_false_flag(&payload.response) {
        return Err(GatewayError::NotFound(
            payload.error.unwrap_or_else(|| "Movie not found!".to_string()),
        ));
    }

    Ok(payload
        .search
        .into_iter()
        .map(|hit| SearchResultItem {
            id: hit.id,
            title: hit.title,
            year: hit.year,
            poster_url: hit.poster,
        })
        .collect())
}

pub(crate) fn parse_detail_payload(raw: &str, id: &str) -> Result<MovieDetail, GatewayError> {
    let payload: DetailPayload = decode(raw)?;
    if payload.response.as_deref().is_some_and(is_false_flag) {
        return Err(GatewayError::NotFound(
            payload.error.unwrap_or_else(|| "Incorrect IMDb ID.".to_string()),
        ));
    }

    let runtime_minutes = parse_runtime_minutes(&payload.runtime);
    if runtime_minutes.is_none() {
        tracing::warn!(id, runtime = %payload.runtime, "runtime is not numeric");
    }
    let imdb_rating = parse_rating(&payload.imdb_rating);
    if imdb_rating.is_none() {
        tracing::warn!(id, rating = %payload.imdb_rating, "imdb rating is not numeric");
    }

    Ok(MovieDetail {
        id: id.to_string(),
        title: payload.title,
        year: payload.year,
        poster_url: payload.poster,
        runtime: payload.runtime,
        runtime_minutes,
        imdb_rating,
        plot: payload.plot,
        released: payload.released,
        actors: payload.actors,
        director: payload.director,
        genre: payload.genre,
    })
}

/// `"142 min"` -> `142`; anything whose first token is not an integer -> `None`.
pub(crate) fn parse_runtime_minutes(raw: &str) -> Option<u32> {
    raw.split_whitespace().next()?.parse::<u32>().ok()
}

pub(crate) fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|rating| rating.is_finite())
}
