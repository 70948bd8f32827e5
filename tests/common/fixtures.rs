//! Test fixtures for creating test databases and seeding data
//!
//! Catalog data goes through the store itself, so fixtures exercise the
//! same write path the server uses.

use super::constants::*;
use anyhow::Result;
use music_catalog_server::admin::CatalogHasher;
use music_catalog_server::catalog_store::{
    AlbumFields, ArtistFields, GenreFields, MerchFields, SingleFields, SocialLinks, SongEntry,
};
use music_catalog_server::{AdminStore, CatalogStore, SqliteAdminStore, SqliteCatalogStore};
use std::path::Path;

/// Ids of the records seeded by [`create_test_catalog`]
#[derive(Clone, Debug)]
pub struct CatalogFixture {
    pub artist_1_id: String,
    pub artist_2_id: String,
    pub genre_rock_id: String,
    pub genre_jazz_id: String,
    pub album_1_id: String,
    pub single_1_id: String,
    pub merch_1_id: String,
}

fn artist_fields(name: &str) -> ArtistFields {
    ArtistFields {
        name: name.to_string(),
        bio: format!("Bio of {}", name),
        img: format!("https://img.example.com/{}.jpg", name.to_lowercase().replace(' ', "-")),
        header_img: None,
        gallery: vec![],
        website: None,
        company: None,
        social: SocialLinks::default(),
    }
}

/// Creates a catalog db with two artists, two genres, one album, one single
/// and one merch item.
///
/// Returns the open store and the generated ids.
pub fn create_test_catalog(db_path: &Path) -> Result<(SqliteCatalogStore, CatalogFixture)> {
    let store = SqliteCatalogStore::new(db_path, 2)?;

    let artist_1 = store.create_artist(&artist_fields(ARTIST_1_NAME))?;
    let artist_2 = store.create_artist(&artist_fields(ARTIST_2_NAME))?;

    let rock = store.create_genre(&GenreFields {
        name: GENRE_ROCK_NAME.to_string(),
        img: "https://img.example.com/rock.jpg".to_string(),
    })?;
    let jazz = store.create_genre(&GenreFields {
        name: GENRE_JAZZ_NAME.to_string(),
        img: "https://img.example.com/jazz.jpg".to_string(),
    })?;

    let album = store.create_album(
        &artist_1.id,
        &AlbumFields {
            title: ALBUM_1_TITLE.to_string(),
            img: "https://img.example.com/first-album.jpg".to_string(),
            url: "https://listen.example.com/first-album".to_string(),
            songs: ALBUM_1_SONGS
                .iter()
                .map(|title| SongEntry {
                    songtitle: title.to_string(),
                })
                .collect(),
            genres: vec![rock.id.clone()],
            features: vec![artist_2.id.clone()],
            date: None,
        },
    )?;

    let single = store.create_single(
        &artist_2.id,
        &SingleFields {
            title: SINGLE_1_TITLE.to_string(),
            img: "https://img.example.com/smooth-night.jpg".to_string(),
            url: "https://listen.example.com/smooth-night".to_string(),
            is_video: false,
            genres: vec![jazz.id.clone()],
            features: vec![],
            date: None,
        },
    )?;

    let merch = store.create_merch(
        &artist_1.id,
        &MerchFields {
            link: MERCH_1_LINK.to_string(),
            img: "https://img.example.com/shirt.jpg".to_string(),
        },
    )?;

    let fixture = CatalogFixture {
        artist_1_id: artist_1.id,
        artist_2_id: artist_2.id,
        genre_rock_id: rock.id,
        genre_jazz_id: jazz.id,
        album_1_id: album.id,
        single_1_id: single.id,
        merch_1_id: merch.id,
    };
    Ok((store, fixture))
}

/// Creates an admin db holding the test admin.
pub fn create_test_admin_db(db_path: &Path) -> Result<SqliteAdminStore> {
    let store = SqliteAdminStore::new(db_path)?;
    let hasher = CatalogHasher::Argon2;
    store.create_admin(ADMIN_NAME, ADMIN_EMAIL, &hasher.hash(ADMIN_PASS)?, hasher)?;
    Ok(store)
}
