//! Catalog records and the write inputs that produce them.
//!
//! Records are what the store persists and what the HTTP layer returns.
//! `*Fields` structs are complete, already-validated values handed to the
//! store; `*Input` structs are the raw admin request bodies, where every
//! field is optional so that missing values can be reported as validation
//! failures instead of deserialization errors.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Entity kinds
// =============================================================================

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Artist,
    Album,
    Single,
    Genre,
    Merch,
}

impl EntityKind {
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Artist => "artists",
            EntityKind::Album => "albums",
            EntityKind::Single => "singles",
            EntityKind::Genre => "genres",
            EntityKind::Merch => "merch",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Artist => "Artist",
            EntityKind::Album => "Album",
            EntityKind::Single => "Single",
            EntityKind::Genre => "Genre",
            EntityKind::Merch => "Merch",
        };
        f.write_str(name)
    }
}

/// Kinds that carry an owning-artist reference.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OwnedKind {
    Album,
    Single,
    Merch,
}

impl From<OwnedKind> for EntityKind {
    fn from(kind: OwnedKind) -> Self {
        match kind {
            OwnedKind::Album => EntityKind::Album,
            OwnedKind::Single => EntityKind::Single,
            OwnedKind::Merch => EntityKind::Merch,
        }
    }
}

// =============================================================================
// Records
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub soundcloud: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub img: String,
    pub header_img: Option<String>,
    /// Either empty or exactly [`ARTIST_GALLERY_SIZE`] images.
    pub gallery: Vec<String>,
    pub website: Option<String>,
    pub company: Option<String>,
    pub social: SocialLinks,
    /// Unix seconds.
    pub date: i64,
}

pub const ARTIST_GALLERY_SIZE: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongEntry {
    pub songtitle: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    /// Owning artist id, fixed at creation.
    pub artist: String,
    pub title: String,
    pub img: String,
    pub url: String,
    pub songs: Vec<SongEntry>,
    pub genres: Vec<String>,
    pub features: Vec<String>,
    pub date: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Single {
    pub id: String,
    pub artist: String,
    pub title: String,
    pub img: String,
    pub url: String,
    pub is_video: bool,
    pub genres: Vec<String>,
    pub features: Vec<String>,
    pub date: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
    pub img: String,
    pub date: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merch {
    pub id: String,
    pub artist: String,
    pub link: String,
    pub img: String,
}

/// Album with its references expanded. References that no longer
/// resolve are left out.
#[derive(Clone, Debug, Serialize)]
pub struct ResolvedAlbum {
    pub album: Album,
    pub artist: Option<Artist>,
    pub genres: Vec<Genre>,
    pub features: Vec<Artist>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedSingle {
    pub single: Single,
    pub artist: Option<Artist>,
    pub genres: Vec<Genre>,
    pub features: Vec<Artist>,
}

/// Per-kind counts removed by an artist cascade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub singles: usize,
    pub albums: usize,
    pub merch: usize,
}

// =============================================================================
// Store write values
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtistFields {
    pub name: String,
    pub bio: String,
    pub img: String,
    pub header_img: Option<String>,
    pub gallery: Vec<String>,
    pub website: Option<String>,
    pub company: Option<String>,
    pub social: SocialLinks,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlbumFields {
    pub title: String,
    pub img: String,
    pub url: String,
    pub songs: Vec<SongEntry>,
    pub genres: Vec<String>,
    pub features: Vec<String>,
    /// Creation date override; the store stamps the current time when absent.
    pub date: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleFields {
    pub title: String,
    pub img: String,
    pub url: String,
    pub is_video: bool,
    pub genres: Vec<String>,
    pub features: Vec<String>,
    pub date: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenreFields {
    pub name: String,
    pub img: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerchFields {
    pub link: String,
    pub img: String,
}

impl From<&Artist> for ArtistFields {
    fn from(artist: &Artist) -> Self {
        ArtistFields {
            name: artist.name.clone(),
            bio: artist.bio.clone(),
            img: artist.img.clone(),
            header_img: artist.header_img.clone(),
            gallery: artist.gallery.clone(),
            website: artist.website.clone(),
            company: artist.company.clone(),
            social: artist.social.clone(),
        }
    }
}

impl From<&Album> for AlbumFields {
    fn from(album: &Album) -> Self {
        AlbumFields {
            title: album.title.clone(),
            img: album.img.clone(),
            url: album.url.clone(),
            songs: album.songs.clone(),
            genres: album.genres.clone(),
            features: album.features.clone(),
            date: Some(album.date),
        }
    }
}

impl From<&Single> for SingleFields {
    fn from(single: &Single) -> Self {
        SingleFields {
            title: single.title.clone(),
            img: single.img.clone(),
            url: single.url.clone(),
            is_video: single.is_video,
            genres: single.genres.clone(),
            features: single.features.clone(),
            date: Some(single.date),
        }
    }
}

// =============================================================================
// Admin request bodies
// =============================================================================

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ArtistInput {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub img: Option<String>,
    pub header_img: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub website: Option<String>,
    pub company: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub soundcloud: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SongInput {
    pub songtitle: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlbumInput {
    pub title: Option<String>,
    pub img: Option<String>,
    pub url: Option<String>,
    pub songs: Option<Vec<SongInput>>,
    pub genres: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub date: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SingleInput {
    pub title: Option<String>,
    pub img: Option<String>,
    pub url: Option<String>,
    pub is_video: Option<bool>,
    pub genres: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub date: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenreInput {
    pub name: Option<String>,
    pub img: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MerchInput {
    pub link: Option<String>,
    pub img: Option<String>,
}

// =============================================================================
// Filters
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct ArtistFilter {
    /// Case-insensitive substring of the artist name.
    pub name_contains: Option<String>,
}

/// Filter shared by albums and singles. Set fields are combined with AND.
#[derive(Clone, Debug, Default)]
pub struct ReleaseFilter {
    pub artist_id: Option<String>,
    pub genre_id: Option<String>,
    pub feature_id: Option<String>,
    pub title_contains: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct GenreFilter {
    pub name_contains: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct MerchFilter {
    pub artist_id: Option<String>,
}
