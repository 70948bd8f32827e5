//! Validation for catalog writes.
//!
//! Two layers run before anything is written:
//! - field checks on the raw admin inputs, collecting every failure so the
//!   caller gets the full list in one response;
//! - the relational check on genre and feature references, which stops at
//!   the first failure in a fixed order.

use super::error::StoreResult;
use super::models::*;
use super::trait_def::CatalogStore;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

// =============================================================================
// Field checks
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub msg: String,
    pub param: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn single(param: &'static str, msg: &str) -> Self {
        FieldErrors(vec![FieldError {
            msg: msg.to_string(),
            param,
        }])
    }

    pub fn has_param(&self, param: &str) -> bool {
        self.0.iter().any(|e| e.param == param)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.msg.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Whether absent fields are failures (create) or left alone (update).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Required,
    IfPresent,
}

struct FieldChecker {
    presence: Presence,
    errors: Vec<FieldError>,
}

impl FieldChecker {
    fn new(presence: Presence) -> Self {
        FieldChecker {
            presence,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, param: &'static str, msg: &str) {
        self.errors.push(FieldError {
            msg: msg.to_string(),
            param,
        });
    }

    fn text(&mut self, param: &'static str, value: &Option<String>, msg: &str) {
        let bad = match value {
            Some(v) => v.trim().is_empty(),
            None => self.presence == Presence::Required,
        };
        if bad {
            self.fail(param, msg);
        }
    }

    fn flag(&mut self, param: &'static str, value: Option<bool>, msg: &str) {
        if value.is_none() && self.presence == Presence::Required {
            self.fail(param, msg);
        }
    }

    fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(FieldErrors(self.errors))
        }
    }
}

pub fn validate_artist_input(input: &ArtistInput, presence: Presence) -> Result<(), FieldErrors> {
    let mut check = FieldChecker::new(presence);
    check.text("name", &input.name, "Artist name is required");
    check.text("bio", &input.bio, "Artist bio is required");
    check.text("img", &input.img, "Artist image is required");
    if let Some(gallery) = &input.gallery {
        if !gallery.is_empty() && gallery.len() != ARTIST_GALLERY_SIZE {
            check.fail("gallery", "Gallery must contain exactly 3 images");
        } else if gallery.iter().any(|img| img.trim().is_empty()) {
            check.fail("gallery", "Gallery images cannot be empty");
        }
    }
    check.finish()
}

pub fn validate_album_input(input: &AlbumInput, presence: Presence) -> Result<(), FieldErrors> {
    let mut check = FieldChecker::new(presence);
    check.text("title", &input.title, "Album title is required");
    check.text("img", &input.img, "Album image is required");
    check.text("url", &input.url, "Album url is required");
    if let Some(songs) = &input.songs {
        let untitled = songs
            .iter()
            .any(|song| song.songtitle.as_deref().map_or(true, |t| t.trim().is_empty()));
        if untitled {
            check.fail("songs", "Song title is required");
        }
    }
    check.finish()
}

pub fn validate_single_input(input: &SingleInput, presence: Presence) -> Result<(), FieldErrors> {
    let mut check = FieldChecker::new(presence);
    check.text("title", &input.title, "Single title is required");
    check.text("img", &input.img, "Single image is required");
    check.text("url", &input.url, "Single url is required");
    check.flag("is_video", input.is_video, "Please specify whether the single is a video");
    check.finish()
}

pub fn validate_genre_input(input: &GenreInput) -> Result<(), FieldErrors> {
    let mut check = FieldChecker::new(Presence::Required);
    check.text("name", &input.name, "Genre name is required");
    check.text("img", &input.img, "Genre image is required");
    check.finish()
}

pub fn validate_merch_input(input: &MerchInput) -> Result<(), FieldErrors> {
    let mut check = FieldChecker::new(Presence::Required);
    check.text("link", &input.link, "Merch link is required");
    check.text("img", &input.img, "Merch image is required");
    check.finish()
}

// =============================================================================
// Relational checks
// =============================================================================

/// Existence lookups needed by [`validate_references`].
pub trait ReferenceLookup {
    fn genre_exists(&self, id: &str) -> StoreResult<bool>;
    fn artist_exists(&self, id: &str) -> StoreResult<bool>;
}

impl<T: CatalogStore + ?Sized> ReferenceLookup for T {
    fn genre_exists(&self, id: &str) -> StoreResult<bool> {
        self.exists(EntityKind::Genre, id)
    }

    fn artist_exists(&self, id: &str) -> StoreResult<bool> {
        self.exists(EntityKind::Artist, id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedReferences {
    pub genres: Vec<String>,
    pub features: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Genre {0} is listed more than once")]
    DuplicateGenre(String),

    #[error("Genre {0} does not exist")]
    GenreNotFound(String),

    #[error("Artist {0} is featured more than once")]
    DuplicateFeature(String),

    #[error("An artist cannot be featured on their own release")]
    SelfFeature(String),

    #[error("Featured artist {0} does not exist")]
    FeatureNotFound(String),

    #[error(transparent)]
    Store(#[from] super::error::StoreError),
}

fn first_duplicate(ids: &[String]) -> Option<&String> {
    ids.iter()
        .enumerate()
        .find(|&(i, id)| ids[i + 1..].contains(id))
        .map(|(_, id)| id)
}

/// Checks the genre and feature lists of an album or single owned by `owner_id`.
///
/// Order: duplicate genre, missing genre, duplicate feature, owner in
/// features, missing featured artist. The first failure is returned and
/// nothing after it is looked up. On success the lists come back unchanged.
pub fn validate_references<L: ReferenceLookup + ?Sized>(
    lookup: &L,
    owner_id: &str,
    genres: &[String],
    features: &[String],
) -> Result<ValidatedReferences, ReferenceError> {
    if let Some(id) = first_duplicate(genres) {
        return Err(ReferenceError::DuplicateGenre(id.clone()));
    }
    for id in genres {
        if !lookup.genre_exists(id)? {
            return Err(ReferenceError::GenreNotFound(id.clone()));
        }
    }

    if let Some(id) = first_duplicate(features) {
        return Err(ReferenceError::DuplicateFeature(id.clone()));
    }
    if let Some(id) = features.iter().find(|id| id.as_str() == owner_id) {
        return Err(ReferenceError::SelfFeature(id.clone()));
    }
    for id in features {
        if !lookup.artist_exists(id)? {
            return Err(ReferenceError::FeatureNotFound(id.clone()));
        }
    }

    Ok(ValidatedReferences {
        genres: genres.to_vec(),
        features: features.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    struct FakeLookup {
        genres: HashSet<String>,
        artists: HashSet<String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeLookup {
        fn new(genres: &[&str], artists: &[&str]) -> Self {
            FakeLookup {
                genres: genres.iter().map(|s| s.to_string()).collect(),
                artists: artists.iter().map(|s| s.to_string()).collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ReferenceLookup for FakeLookup {
        fn genre_exists(&self, id: &str) -> StoreResult<bool> {
            self.calls.borrow_mut().push(format!("genre:{}", id));
            Ok(self.genres.contains(id))
        }

        fn artist_exists(&self, id: &str) -> StoreResult<bool> {
            self.calls.borrow_mut().push(format!("artist:{}", id));
            Ok(self.artists.contains(id))
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn make_valid_artist_input() -> ArtistInput {
        ArtistInput {
            name: Some("X".to_string()),
            bio: Some("Y".to_string()),
            img: Some("x.png".to_string()),
            ..Default::default()
        }
    }

    fn make_valid_album_input() -> AlbumInput {
        AlbumInput {
            title: Some("Album".to_string()),
            img: Some("cover.png".to_string()),
            url: Some("https://listen".to_string()),
            songs: Some(vec![SongInput {
                songtitle: Some("Intro".to_string()),
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_references_are_returned_in_order() {
        let lookup = FakeLookup::new(&["g1", "g2"], &["owner", "f1", "f2"]);
        let result =
            validate_references(&lookup, "owner", &ids(&["g2", "g1"]), &ids(&["f2", "f1"])).unwrap();
        assert_eq!(result.genres, ids(&["g2", "g1"]));
        assert_eq!(result.features, ids(&["f2", "f1"]));
    }

    #[test]
    fn test_duplicate_genre_wins_over_missing_genre() {
        let lookup = FakeLookup::new(&[], &[]);
        let err = validate_references(&lookup, "owner", &ids(&["g1", "g1"]), &[]).unwrap_err();
        assert!(matches!(err, ReferenceError::DuplicateGenre(ref id) if id == "g1"));
        assert!(lookup.calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_genre_stops_before_feature_checks() {
        let lookup = FakeLookup::new(&["g1"], &[]);
        let err = validate_references(
            &lookup,
            "owner",
            &ids(&["g1", "missing"]),
            &ids(&["owner", "owner"]),
        )
        .unwrap_err();
        assert!(matches!(err, ReferenceError::GenreNotFound(ref id) if id == "missing"));
        assert!(lookup.calls.borrow().iter().all(|c| c.starts_with("genre:")));
    }

    #[test]
    fn test_duplicate_feature_wins_over_self_feature() {
        let lookup = FakeLookup::new(&[], &["owner"]);
        let err = validate_references(&lookup, "owner", &[], &ids(&["owner", "owner"])).unwrap_err();
        assert!(matches!(err, ReferenceError::DuplicateFeature(_)));
    }

    #[test]
    fn test_self_feature_checked_before_existence() {
        let lookup = FakeLookup::new(&[], &["owner"]);
        let err =
            validate_references(&lookup, "owner", &[], &ids(&["missing", "owner"])).unwrap_err();
        assert!(matches!(err, ReferenceError::SelfFeature(ref id) if id == "owner"));
        assert!(lookup.calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_feature() {
        let lookup = FakeLookup::new(&[], &["f1"]);
        let err = validate_references(&lookup, "owner", &[], &ids(&["f1", "f9"])).unwrap_err();
        assert!(matches!(err, ReferenceError::FeatureNotFound(ref id) if id == "f9"));
    }

    #[test]
    fn test_empty_lists_are_valid() {
        let lookup = FakeLookup::new(&[], &[]);
        let result = validate_references(&lookup, "owner", &[], &[]).unwrap();
        assert!(result.genres.is_empty());
        assert!(result.features.is_empty());
    }

    #[test]
    fn test_validate_artist_valid() {
        assert!(validate_artist_input(&make_valid_artist_input(), Presence::Required).is_ok());
    }

    #[test]
    fn test_validate_artist_collects_all_missing_fields() {
        let errors = validate_artist_input(&ArtistInput::default(), Presence::Required).unwrap_err();
        assert!(errors.has_param("name"));
        assert!(errors.has_param("bio"));
        assert!(errors.has_param("img"));
        assert_eq!(errors.0[0].msg, "Artist name is required");
    }

    #[test]
    fn test_validate_artist_gallery_size() {
        let mut input = make_valid_artist_input();
        input.gallery = Some(ids(&["a", "b"]));
        let errors = validate_artist_input(&input, Presence::Required).unwrap_err();
        assert!(errors.has_param("gallery"));

        input.gallery = Some(ids(&["a", "b", "c"]));
        assert!(validate_artist_input(&input, Presence::Required).is_ok());

        input.gallery = Some(vec![]);
        assert!(validate_artist_input(&input, Presence::Required).is_ok());
    }

    #[test]
    fn test_validate_artist_update_only_checks_present_fields() {
        let input = ArtistInput {
            bio: Some("new bio".to_string()),
            ..Default::default()
        };
        assert!(validate_artist_input(&input, Presence::IfPresent).is_ok());

        let blank = ArtistInput {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        let errors = validate_artist_input(&blank, Presence::IfPresent).unwrap_err();
        assert_eq!(errors.0.len(), 1);
        assert!(errors.has_param("name"));
    }

    #[test]
    fn test_validate_album_untitled_song() {
        let mut input = make_valid_album_input();
        input.songs = Some(vec![
            SongInput {
                songtitle: Some("ok".to_string()),
            },
            SongInput { songtitle: None },
        ]);
        let errors = validate_album_input(&input, Presence::Required).unwrap_err();
        assert!(errors.has_param("songs"));
    }

    #[test]
    fn test_validate_album_missing_title() {
        let mut input = make_valid_album_input();
        input.title = None;
        let errors = validate_album_input(&input, Presence::Required).unwrap_err();
        assert_eq!(
            errors.0,
            vec![FieldError {
                msg: "Album title is required".to_string(),
                param: "title"
            }]
        );
    }

    #[test]
    fn test_validate_single_requires_video_flag() {
        let input = SingleInput {
            title: Some("S".to_string()),
            img: Some("s.png".to_string()),
            url: Some("https://listen".to_string()),
            ..Default::default()
        };
        let errors = validate_single_input(&input, Presence::Required).unwrap_err();
        assert!(errors.has_param("is_video"));
        assert!(validate_single_input(&input, Presence::IfPresent).is_ok());
    }

    #[test]
    fn test_validate_genre_and_merch() {
        assert!(validate_genre_input(&GenreInput {
            name: Some("Pop".to_string()),
            img: Some("pop.png".to_string()),
        })
        .is_ok());
        let errors = validate_merch_input(&MerchInput::default()).unwrap_err();
        assert!(errors.has_param("link"));
        assert!(errors.has_param("img"));
    }
}
