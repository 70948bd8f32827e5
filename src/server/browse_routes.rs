//! Public read routes under `/api`. Nothing here writes.

use super::error::{ApiError, ApiResult};
use super::state::{GuardedCatalogService, ServerState};
use crate::catalog_store::*;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

fn found<T>(value: Option<T>, kind: EntityKind) -> ApiResult<T> {
    match value {
        Some(value) => Ok(Json(value)),
        None => Err(ApiError::not_found(format!("{} not found", kind))),
    }
}

fn by_artist(artist_id: String) -> ReleaseFilter {
    ReleaseFilter {
        artist_id: Some(artist_id),
        ..Default::default()
    }
}

fn by_genre(genre_id: String) -> ReleaseFilter {
    ReleaseFilter {
        genre_id: Some(genre_id),
        ..Default::default()
    }
}

fn by_feature(featured_id: String) -> ReleaseFilter {
    ReleaseFilter {
        feature_id: Some(featured_id),
        ..Default::default()
    }
}

fn by_title(text: String) -> ReleaseFilter {
    ReleaseFilter {
        title_contains: Some(text),
        ..Default::default()
    }
}

// =============================================================================
// Artists
// =============================================================================

async fn list_artists(State(catalog): State<GuardedCatalogService>) -> ApiResult<Vec<Artist>> {
    Ok(Json(catalog.find_artists(None)?))
}

async fn get_artist(
    State(catalog): State<GuardedCatalogService>,
    Path(id): Path<String>,
) -> ApiResult<Artist> {
    found(catalog.get_artist(&id)?, EntityKind::Artist)
}

async fn search_artists(
    State(catalog): State<GuardedCatalogService>,
    Path(text): Path<String>,
) -> ApiResult<Vec<Artist>> {
    Ok(Json(catalog.find_artists(Some(&text))?))
}

// =============================================================================
// Albums
// =============================================================================

async fn list_albums(State(catalog): State<GuardedCatalogService>) -> ApiResult<Vec<Album>> {
    Ok(Json(catalog.find_albums(&ReleaseFilter::default())?))
}

async fn get_album(
    State(catalog): State<GuardedCatalogService>,
    Path(id): Path<String>,
) -> ApiResult<Album> {
    found(catalog.get_album(&id)?, EntityKind::Album)
}

async fn get_resolved_album(
    State(catalog): State<GuardedCatalogService>,
    Path(id): Path<String>,
) -> ApiResult<ResolvedAlbum> {
    found(catalog.resolve_album(&id)?, EntityKind::Album)
}

async fn search_albums(
    State(catalog): State<GuardedCatalogService>,
    Path(text): Path<String>,
) -> ApiResult<Vec<Album>> {
    Ok(Json(catalog.find_albums(&by_title(text))?))
}

async fn albums_by_genre(
    State(catalog): State<GuardedCatalogService>,
    Path(genre_id): Path<String>,
) -> ApiResult<Vec<Album>> {
    Ok(Json(catalog.find_albums(&by_genre(genre_id))?))
}

async fn albums_by_artist(
    State(catalog): State<GuardedCatalogService>,
    Path(artist_id): Path<String>,
) -> ApiResult<Vec<Album>> {
    Ok(Json(catalog.find_albums(&by_artist(artist_id))?))
}

async fn albums_featuring(
    State(catalog): State<GuardedCatalogService>,
    Path(featured_id): Path<String>,
) -> ApiResult<Vec<Album>> {
    Ok(Json(catalog.find_albums(&by_feature(featured_id))?))
}

// =============================================================================
// Singles
// =============================================================================

async fn list_singles(State(catalog): State<GuardedCatalogService>) -> ApiResult<Vec<Single>> {
    Ok(Json(catalog.find_singles(&ReleaseFilter::default())?))
}

async fn get_single(
    State(catalog): State<GuardedCatalogService>,
    Path(id): Path<String>,
) -> ApiResult<Single> {
    found(catalog.get_single(&id)?, EntityKind::Single)
}

async fn get_resolved_single(
    State(catalog): State<GuardedCatalogService>,
    Path(id): Path<String>,
) -> ApiResult<ResolvedSingle> {
    found(catalog.resolve_single(&id)?, EntityKind::Single)
}

async fn search_singles(
    State(catalog): State<GuardedCatalogService>,
    Path(text): Path<String>,
) -> ApiResult<Vec<Single>> {
    Ok(Json(catalog.find_singles(&by_title(text))?))
}

async fn singles_by_genre(
    State(catalog): State<GuardedCatalogService>,
    Path(genre_id): Path<String>,
) -> ApiResult<Vec<Single>> {
    Ok(Json(catalog.find_singles(&by_genre(genre_id))?))
}

async fn singles_by_artist(
    State(catalog): State<GuardedCatalogService>,
    Path(artist_id): Path<String>,
) -> ApiResult<Vec<Single>> {
    Ok(Json(catalog.find_singles(&by_artist(artist_id))?))
}

async fn singles_featuring(
    State(catalog): State<GuardedCatalogService>,
    Path(featured_id): Path<String>,
) -> ApiResult<Vec<Single>> {
    Ok(Json(catalog.find_singles(&by_feature(featured_id))?))
}

// =============================================================================
// Genres and merch
// =============================================================================

async fn list_genres(State(catalog): State<GuardedCatalogService>) -> ApiResult<Vec<Genre>> {
    Ok(Json(catalog.find_genres(None)?))
}

async fn get_genre(
    State(catalog): State<GuardedCatalogService>,
    Path(id): Path<String>,
) -> ApiResult<Genre> {
    found(catalog.get_genre(&id)?, EntityKind::Genre)
}

async fn search_genres(
    State(catalog): State<GuardedCatalogService>,
    Path(text): Path<String>,
) -> ApiResult<Vec<Genre>> {
    Ok(Json(catalog.find_genres(Some(&text))?))
}

async fn merch_of_artist(
    State(catalog): State<GuardedCatalogService>,
    Path(artist_id): Path<String>,
) -> ApiResult<Vec<Merch>> {
    Ok(Json(catalog.merch_of_artist(&artist_id)?))
}

pub fn make_browse_routes(state: ServerState) -> Router {
    Router::new()
        .route("/artists", get(list_artists))
        .route("/artists/{id}", get(get_artist))
        .route("/artists/search/{text}", get(search_artists))
        .route("/albums", get(list_albums))
        .route("/albums/{id}", get(get_album))
        .route("/albums/{id}/resolved", get(get_resolved_album))
        .route("/albums/search/{text}", get(search_albums))
        .route("/albums/genre/{genre_id}", get(albums_by_genre))
        .route("/albums/artist/{artist_id}", get(albums_by_artist))
        .route("/albums/features/{featured_id}", get(albums_featuring))
        .route("/singles", get(list_singles))
        .route("/singles/{id}", get(get_single))
        .route("/singles/{id}/resolved", get(get_resolved_single))
        .route("/singles/search/{text}", get(search_singles))
        .route("/singles/genre/{genre_id}", get(singles_by_genre))
        .route("/singles/artist/{artist_id}", get(singles_by_artist))
        .route("/singles/features/{featured_id}", get(singles_featuring))
        .route("/genres", get(list_genres))
        .route("/genres/{id}", get(get_genre))
        .route("/genres/search/{text}", get(search_genres))
        .route("/merch/{artist_id}", get(merch_of_artist))
        .with_state(state)
}
