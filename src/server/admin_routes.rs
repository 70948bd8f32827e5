//! `/api/admin`: login, registration and every catalog mutation.

use super::error::{ApiError, ApiResult};
use super::json_body::JsonBody;
use super::session::{AdminSession, COOKIE_SESSION_TOKEN_KEY};
use super::state::{GuardedAuthGate, GuardedCatalogService, ServerState};
use crate::admin::{AdminIdentity, LoginInput, RegisterInput, TokenResponse};
use crate::catalog_store::*;

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

type TokenReply = Result<(CookieJar, Json<TokenResponse>), ApiError>;

#[derive(Serialize)]
struct ArtistDeletedResponse {
    id: String,
    deleted: CascadeReport,
}

fn session_cookie(token: &str, ttl_sec: i64) -> Cookie<'static> {
    Cookie::build((COOKIE_SESSION_TOKEN_KEY, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl_sec))
        .build()
}

fn token_reply(jar: CookieJar, token: String, ttl_sec: i64) -> TokenReply {
    let jar = jar.add(session_cookie(&token, ttl_sec));
    Ok((jar, Json(TokenResponse { token })))
}

async fn login(
    State(gate): State<GuardedAuthGate>,
    jar: CookieJar,
    JsonBody(body): JsonBody<LoginInput>,
) -> TokenReply {
    let token = gate.authenticate(&body)?;
    token_reply(jar, token, gate.token_ttl_sec())
}

async fn register(
    State(gate): State<GuardedAuthGate>,
    jar: CookieJar,
    JsonBody(body): JsonBody<RegisterInput>,
) -> TokenReply {
    let token = gate.register(&body)?;
    token_reply(jar, token, gate.token_ttl_sec())
}

async fn get_current_admin(session: AdminSession) -> Json<AdminIdentity> {
    Json(session.admin)
}

// =============================================================================
// Artists
// =============================================================================

async fn post_artist(
    _session: AdminSession,
    State(catalog): State<GuardedCatalogService>,
    JsonBody(body): JsonBody<ArtistInput>,
) -> ApiResult<Artist> {
    Ok(Json(catalog.create_artist(&body)?))
}

async fn put_artist(
    _session: AdminSession,
    State(catalog): State<GuardedCatalogService>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ArtistInput>,
) -> ApiResult<Artist> {
    Ok(Json(catalog.update_artist(&id, &body)?))
}

async fn delete_artist(
    _session: AdminSession,
    State(catalog): State<GuardedCatalogService>,
    Path(id): Path<String>,
) -> ApiResult<ArtistDeletedResponse> {
    let deleted = catalog.delete_artist(&id)?;
    Ok(Json(ArtistDeletedResponse { id, deleted }))
}

// =============================================================================
// Albums and singles
// =============================================================================

async fn post_album(
    _session: AdminSession,
    State(catalog): State<GuardedCatalogService>,
    Path(artist_id): Path<String>,
    JsonBody(body): JsonBody<AlbumInput>,
) -> ApiResult<Album> {
    Ok(Json(catalog.create_album(&artist_id, &body)?))
}

async fn put_album(
    _session: AdminSession,
    State(catalog): State<GuardedCatalogService>,
    Path((artist_id, album_id)): Path<(String, String)>,
    JsonBody(body): JsonBody<AlbumInput>,
) -> ApiResult<Album> {
    Ok(Json(catalog.update_album(&artist_id, &album_id, &body)?))
}

async fn delete_album(
    _session: AdminSession,
    State(catalog): State<GuardedCatalogService>,
    Path((artist_id, album_id)): Path<(String, String)>,
) -> ApiResult<Album> {
    Ok(Json(catalog.delete_album(&artist_id, &album_id)?))
}

async fn post_single(
    _session: AdminSession,
    State(catalog): State<GuardedCatalogService>,
    Path(artist_id): Path<String>,
    JsonBody(body): JsonBody<SingleInput>,
) -> ApiResult<Single> {
    Ok(Json(catalog.create_single(&artist_id, &body)?))
}

async fn put_single(
    _session: AdminSession,
    State(catalog): State<GuardedCatalogService>,
    Path((artist_id, single_id)): Path<(String, String)>,
    JsonBody(body): JsonBody<SingleInput>,
) -> ApiResult<Single> {
    Ok(Json(catalog.update_single(&artist_id, &single_id, &body)?))
}

async fn delete_single(
    _session: AdminSession,
    State(catalog): State<GuardedCatalogService>,
    Path((artist_id, single_id)): Path<(String, String)>,
) -> ApiResult<Single> {
    Ok(Json(catalog.delete_single(&artist_id, &single_id)?))
}

// =============================================================================
// Genres and merch
// =============================================================================

async fn post_genre(
    _session: AdminSession,
    State(catalog): State<GuardedCatalogService>,
    JsonBody(body): JsonBody<GenreInput>,
) -> ApiResult<Genre> {
    Ok(Json(catalog.create_genre(&body)?))
}

async fn post_merch(
    _session: AdminSession,
    State(catalog): State<GuardedCatalogService>,
    Path(artist_id): Path<String>,
    JsonBody(body): JsonBody<MerchInput>,
) -> ApiResult<Merch> {
    Ok(Json(catalog.create_merch(&artist_id, &body)?))
}

pub fn make_admin_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", post(login))
        .route("/register", post(register))
        .route("/auth", get(get_current_admin))
        .route("/artist", post(post_artist))
        .route(
            "/artist/{artist_id}",
            put(put_artist).delete(delete_artist),
        )
        .route("/artist/{artist_id}/album", post(post_album))
        .route(
            "/artist/{artist_id}/album/{album_id}",
            put(put_album).delete(delete_album),
        )
        .route("/artist/{artist_id}/single", post(post_single))
        .route(
            "/artist/{artist_id}/single/{single_id}",
            put(put_single).delete(delete_single),
        )
        .route("/genre", post(post_genre))
        .route("/merch/{artist_id}", post(post_merch))
        .with_state(state)
}
