//! Catalog API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use anuraagam_core::{Track, TrackId};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct SongsQuery {
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<Track>,
}

/// GET /api/songs
pub async fn list_songs(
    State(app_state): State<AppState>,
    Query(query): Query<SongsQuery>,
) -> Json<ResultsResponse> {
    Json(ResultsResponse {
        results: app_state.catalog.list(query.language.as_deref()),
    })
}

/// GET /api/search
pub async fn search(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<ResultsResponse> {
    let results = app_state
        .catalog
        .search(&query.q, query.language.as_deref());
    tracing::debug!(q = %query.q, hits = results.len(), "Catalog search");

    Json(ResultsResponse { results })
}

/// GET /api/songs/:id
pub async fn get_song(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Track>> {
    app_state
        .catalog
        .get(&TrackId::new(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| ServerError::NotFound("Track not found".to_string()))
}

/// GET /api/languages
pub async fn languages(State(app_state): State<AppState>) -> Json<Vec<String>> {
    Json(app_state.catalog.languages())
}
