//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all music-catalog-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client with cookie-based session management
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    /// Creates a new unauthenticated client
    ///
    /// Use this for public routes and for testing authentication flows.
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true) // Keeps the session_token cookie between requests
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Creates a client logged in as the seeded admin
    ///
    /// # Panics
    ///
    /// Panics if authentication fails (indicates test infrastructure problem).
    pub async fn authenticated_admin(base_url: String) -> Self {
        let client = Self::new(base_url);

        let response = client.login(ADMIN_EMAIL, ADMIN_PASS).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Admin authentication failed: {:?}",
            response.text().await
        );

        client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed")
    }

    async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Request failed")
    }

    async fn put_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Request failed")
    }

    async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Authentication Endpoints
    // ========================================================================

    /// POST /api/admin
    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_json(
            "/api/admin",
            &json!({
                "email": email,
                "password": password,
            }),
        )
        .await
    }

    /// POST /api/admin/register
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Response {
        self.post_json(
            "/api/admin/register",
            &json!({
                "name": name,
                "email": email,
                "password": password,
            }),
        )
        .await
    }

    /// GET /api/admin/auth
    pub async fn get_current_admin(&self) -> Response {
        self.get("/api/admin/auth").await
    }

    /// GET /api/admin/auth with the token in the x-auth-token header
    pub async fn get_current_admin_with_header(&self, token: &str) -> Response {
        self.client
            .get(self.url("/api/admin/auth"))
            .header("x-auth-token", token)
            .send()
            .await
            .expect("Request failed")
    }

    /// GET /api/admin/auth with an `Authorization: Bearer` header
    pub async fn get_current_admin_with_bearer(&self, token: &str) -> Response {
        self.client
            .get(self.url("/api/admin/auth"))
            .bearer_auth(token)
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Admin Catalog Endpoints
    // ========================================================================

    /// POST /api/admin/artist
    pub async fn create_artist(&self, body: &Value) -> Response {
        self.post_json("/api/admin/artist", body).await
    }

    /// PUT /api/admin/artist/{artist_id}
    pub async fn update_artist(&self, artist_id: &str, body: &Value) -> Response {
        self.put_json(&format!("/api/admin/artist/{}", artist_id), body)
            .await
    }

    /// DELETE /api/admin/artist/{artist_id}
    pub async fn delete_artist(&self, artist_id: &str) -> Response {
        self.delete(&format!("/api/admin/artist/{}", artist_id))
            .await
    }

    /// POST /api/admin/artist/{artist_id}/album
    pub async fn create_album(&self, artist_id: &str, body: &Value) -> Response {
        self.post_json(&format!("/api/admin/artist/{}/album", artist_id), body)
            .await
    }

    /// PUT /api/admin/artist/{artist_id}/album/{album_id}
    pub async fn update_album(&self, artist_id: &str, album_id: &str, body: &Value) -> Response {
        self.put_json(
            &format!("/api/admin/artist/{}/album/{}", artist_id, album_id),
            body,
        )
        .await
    }

    /// DELETE /api/admin/artist/{artist_id}/album/{album_id}
    pub async fn delete_album(&self, artist_id: &str, album_id: &str) -> Response {
        self.delete(&format!(
            "/api/admin/artist/{}/album/{}",
            artist_id, album_id
        ))
        .await
    }

    /// POST /api/admin/artist/{artist_id}/single
    pub async fn create_single(&self, artist_id: &str, body: &Value) -> Response {
        self.post_json(&format!("/api/admin/artist/{}/single", artist_id), body)
            .await
    }

    /// PUT /api/admin/artist/{artist_id}/single/{single_id}
    pub async fn update_single(&self, artist_id: &str, single_id: &str, body: &Value) -> Response {
        self.put_json(
            &format!("/api/admin/artist/{}/single/{}", artist_id, single_id),
            body,
        )
        .await
    }

    /// DELETE /api/admin/artist/{artist_id}/single/{single_id}
    pub async fn delete_single(&self, artist_id: &str, single_id: &str) -> Response {
        self.delete(&format!(
            "/api/admin/artist/{}/single/{}",
            artist_id, single_id
        ))
        .await
    }

    /// POST /api/admin/genre
    pub async fn create_genre(&self, body: &Value) -> Response {
        self.post_json("/api/admin/genre", body).await
    }

    /// POST /api/admin/merch/{artist_id}
    pub async fn create_merch(&self, artist_id: &str, body: &Value) -> Response {
        self.post_json(&format!("/api/admin/merch/{}", artist_id), body)
            .await
    }

    // ========================================================================
    // Browse Endpoints
    // ========================================================================

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.get("/").await
    }

    /// GET /api/artists
    pub async fn list_artists(&self) -> Response {
        self.get("/api/artists").await
    }

    /// GET /api/artists/{id}
    pub async fn get_artist(&self, id: &str) -> Response {
        self.get(&format!("/api/artists/{}", id)).await
    }

    /// GET /api/artists/search/{text}
    pub async fn search_artists(&self, text: &str) -> Response {
        self.get(&format!("/api/artists/search/{}", text)).await
    }

    /// GET /api/albums
    pub async fn list_albums(&self) -> Response {
        self.get("/api/albums").await
    }

    /// GET /api/albums/{id}
    pub async fn get_album(&self, id: &str) -> Response {
        self.get(&format!("/api/albums/{}", id)).await
    }

    /// GET /api/albums/{id}/resolved
    pub async fn get_resolved_album(&self, id: &str) -> Response {
        self.get(&format!("/api/albums/{}/resolved", id)).await
    }

    /// GET /api/albums/search/{text}
    pub async fn search_albums(&self, text: &str) -> Response {
        self.get(&format!("/api/albums/search/{}", text)).await
    }

    /// GET /api/albums/genre/{genre_id}
    pub async fn albums_by_genre(&self, genre_id: &str) -> Response {
        self.get(&format!("/api/albums/genre/{}", genre_id)).await
    }

    /// GET /api/albums/artist/{artist_id}
    pub async fn albums_by_artist(&self, artist_id: &str) -> Response {
        self.get(&format!("/api/albums/artist/{}", artist_id)).await
    }

    /// GET /api/albums/features/{featured_id}
    pub async fn albums_featuring(&self, featured_id: &str) -> Response {
        self.get(&format!("/api/albums/features/{}", featured_id))
            .await
    }

    /// GET /api/singles
    pub async fn list_singles(&self) -> Response {
        self.get("/api/singles").await
    }

    /// GET /api/singles/{id}
    pub async fn get_single(&self, id: &str) -> Response {
        self.get(&format!("/api/singles/{}", id)).await
    }

    /// GET /api/singles/{id}/resolved
    pub async fn get_resolved_single(&self, id: &str) -> Response {
        self.get(&format!("/api/singles/{}/resolved", id)).await
    }

    /// GET /api/singles/genre/{genre_id}
    pub async fn singles_by_genre(&self, genre_id: &str) -> Response {
        self.get(&format!("/api/singles/genre/{}", genre_id)).await
    }

    /// GET /api/singles/artist/{artist_id}
    pub async fn singles_by_artist(&self, artist_id: &str) -> Response {
        self.get(&format!("/api/singles/artist/{}", artist_id)).await
    }

    /// GET /api/genres
    pub async fn list_genres(&self) -> Response {
        self.get("/api/genres").await
    }

    /// GET /api/genres/{id}
    pub async fn get_genre(&self, id: &str) -> Response {
        self.get(&format!("/api/genres/{}", id)).await
    }

    /// GET /api/genres/search/{text}
    pub async fn search_genres(&self, text: &str) -> Response {
        self.get(&format!("/api/genres/search/{}", text)).await
    }

    /// GET /api/merch/{artist_id}
    pub async fn merch_of_artist(&self, artist_id: &str) -> Response {
        self.get(&format!("/api/merch/{}", artist_id)).await
    }
}
