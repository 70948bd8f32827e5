//! Admin mutations: validate, check references and ownership, then write.

use super::error::{CatalogError, CatalogResult};
use super::CatalogService;
use crate::catalog_store::validation::{
    validate_album_input, validate_artist_input, validate_genre_input, validate_merch_input,
    validate_references, validate_single_input, Presence,
};
use crate::catalog_store::*;
use tracing::{debug, info};

/// Trimmed value, or `None` for absent and blank strings.
fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(value: &Option<String>) -> String {
    clean(value).unwrap_or_default()
}

fn songs_from(input: &[SongInput]) -> Vec<SongEntry> {
    input
        .iter()
        .map(|song| SongEntry {
            songtitle: required(&song.songtitle),
        })
        .collect()
}

fn rejected<T>(err: impl Into<CatalogError>) -> CatalogResult<T> {
    let err = err.into();
    debug!("Rejected catalog write: {}", err);
    Err(err)
}

fn apply_optional(target: &mut Option<String>, patch: &Option<String>) {
    if patch.is_some() {
        *target = clean(patch);
    }
}

fn apply_required(target: &mut String, patch: &Option<String>) {
    if let Some(value) = clean(patch) {
        *target = value;
    }
}

impl ArtistFields {
    fn from_input(input: &ArtistInput) -> Self {
        ArtistFields {
            name: required(&input.name),
            bio: required(&input.bio),
            img: required(&input.img),
            header_img: clean(&input.header_img),
            gallery: input.gallery.clone().unwrap_or_default(),
            website: clean(&input.website),
            company: clean(&input.company),
            social: SocialLinks {
                youtube: clean(&input.youtube),
                twitter: clean(&input.twitter),
                facebook: clean(&input.facebook),
                instagram: clean(&input.instagram),
                soundcloud: clean(&input.soundcloud),
            },
        }
    }

    fn apply(&mut self, input: &ArtistInput) {
        apply_required(&mut self.name, &input.name);
        apply_required(&mut self.bio, &input.bio);
        apply_required(&mut self.img, &input.img);
        apply_optional(&mut self.header_img, &input.header_img);
        if let Some(gallery) = &input.gallery {
            self.gallery = gallery.clone();
        }
        apply_optional(&mut self.website, &input.website);
        apply_optional(&mut self.company, &input.company);
        apply_optional(&mut self.social.youtube, &input.youtube);
        apply_optional(&mut self.social.twitter, &input.twitter);
        apply_optional(&mut self.social.facebook, &input.facebook);
        apply_optional(&mut self.social.instagram, &input.instagram);
        apply_optional(&mut self.social.soundcloud, &input.soundcloud);
    }
}

impl CatalogService {
    fn require_artist(&self, artist_id: &str) -> CatalogResult<()> {
        if self.store.exists(EntityKind::Artist, artist_id)? {
            Ok(())
        } else {
            rejected(CatalogError::ArtistNotFound(artist_id.to_string()))
        }
    }

    fn check_owner(
        kind: EntityKind,
        id: &str,
        owner: &str,
        artist_id: &str,
    ) -> CatalogResult<()> {
        if owner == artist_id {
            Ok(())
        } else {
            rejected(CatalogError::OwnershipMismatch {
                kind,
                id: id.to_string(),
                artist_id: artist_id.to_string(),
            })
        }
    }

    /// Only lists present in the patch are checked; the owner is always the path artist.
    fn check_patch_references(
        &self,
        artist_id: &str,
        genres: &Option<Vec<String>>,
        features: &Option<Vec<String>>,
    ) -> CatalogResult<()> {
        let genres = genres.as_deref().unwrap_or_default();
        let features = features.as_deref().unwrap_or_default();
        if let Err(err) = validate_references(self.store.as_ref(), artist_id, genres, features) {
            return rejected(err);
        }
        Ok(())
    }

    // =========================================================================
    // Artists
    // =========================================================================

    pub fn create_artist(&self, input: &ArtistInput) -> CatalogResult<Artist> {
        if let Err(errors) = validate_artist_input(input, Presence::Required) {
            return rejected(errors);
        }
        let artist = self.store.create_artist(&ArtistFields::from_input(input))?;
        info!("Created artist {} ({})", artist.id, artist.name);
        Ok(artist)
    }

    pub fn update_artist(&self, id: &str, input: &ArtistInput) -> CatalogResult<Artist> {
        if let Err(errors) = validate_artist_input(input, Presence::IfPresent) {
            return rejected(errors);
        }
        let existing = self
            .store
            .get_artist(id)?
            .ok_or_else(|| StoreError::not_found(EntityKind::Artist, id))?;

        let mut fields = ArtistFields::from(&existing);
        fields.apply(input);
        let artist = self.store.update_artist(id, &fields)?;
        info!("Updated artist {}", artist.id);
        Ok(artist)
    }

    /// Removes the artist with its singles, albums and merch.
    pub fn delete_artist(&self, id: &str) -> CatalogResult<CascadeReport> {
        let report = self.store.delete_artist_cascade(id)?;
        info!(
            "Deleted artist {} with {} single(s), {} album(s), {} merch item(s)",
            id, report.singles, report.albums, report.merch
        );
        Ok(report)
    }

    // =========================================================================
    // Albums
    // =========================================================================

    pub fn create_album(&self, artist_id: &str, input: &AlbumInput) -> CatalogResult<Album> {
        self.require_artist(artist_id)?;
        if let Err(errors) = validate_album_input(input, Presence::Required) {
            return rejected(errors);
        }
        self.check_patch_references(artist_id, &input.genres, &input.features)?;

        let fields = AlbumFields {
            title: required(&input.title),
            img: required(&input.img),
            url: required(&input.url),
            songs: songs_from(input.songs.as_deref().unwrap_or_default()),
            genres: input.genres.clone().unwrap_or_default(),
            features: input.features.clone().unwrap_or_default(),
            date: input.date,
        };
        let album = self.store.create_album(artist_id, &fields)?;
        info!("Created album {} for artist {}", album.id, artist_id);
        Ok(album)
    }

    pub fn update_album(
        &self,
        artist_id: &str,
        album_id: &str,
        input: &AlbumInput,
    ) -> CatalogResult<Album> {
        self.require_artist(artist_id)?;
        if let Err(errors) = validate_album_input(input, Presence::IfPresent) {
            return rejected(errors);
        }
        self.check_patch_references(artist_id, &input.genres, &input.features)?;

        let existing = self
            .store
            .get_album(album_id)?
            .ok_or_else(|| StoreError::not_found(EntityKind::Album, album_id))?;
        Self::check_owner(EntityKind::Album, album_id, &existing.artist, artist_id)?;

        let mut fields = AlbumFields::from(&existing);
        apply_required(&mut fields.title, &input.title);
        apply_required(&mut fields.img, &input.img);
        apply_required(&mut fields.url, &input.url);
        if let Some(songs) = &input.songs {
            fields.songs = songs_from(songs);
        }
        if let Some(genres) = &input.genres {
            fields.genres = genres.clone();
        }
        if let Some(features) = &input.features {
            fields.features = features.clone();
        }
        if input.date.is_some() {
            fields.date = input.date;
        }

        let album = self.store.update_album(album_id, &fields)?;
        info!("Updated album {}", album.id);
        Ok(album)
    }

    /// Returns the removed album.
    pub fn delete_album(&self, artist_id: &str, album_id: &str) -> CatalogResult<Album> {
        let existing = self
            .store
            .get_album(album_id)?
            .ok_or_else(|| StoreError::not_found(EntityKind::Album, album_id))?;
        Self::check_owner(EntityKind::Album, album_id, &existing.artist, artist_id)?;

        self.store.delete_by_id(EntityKind::Album, album_id)?;
        info!("Deleted album {} of artist {}", album_id, artist_id);
        Ok(existing)
    }

    // =========================================================================
    // Singles
    // =========================================================================

    pub fn create_single(&self, artist_id: &str, input: &SingleInput) -> CatalogResult<Single> {
        self.require_artist(artist_id)?;
        if let Err(errors) = validate_single_input(input, Presence::Required) {
            return rejected(errors);
        }
        self.check_patch_references(artist_id, &input.genres, &input.features)?;

        let fields = SingleFields {
            title: required(&input.title),
            img: required(&input.img),
            url: required(&input.url),
            is_video: input.is_video.unwrap_or_default(),
            genres: input.genres.clone().unwrap_or_default(),
            features: input.features.clone().unwrap_or_default(),
            date: input.date,
        };
        let single = self.store.create_single(artist_id, &fields)?;
        info!("Created single {} for artist {}", single.id, artist_id);
        Ok(single)
    }

    pub fn update_single(
        &self,
        artist_id: &str,
        single_id: &str,
        input: &SingleInput,
    ) -> CatalogResult<Single> {
        self.require_artist(artist_id)?;
        if let Err(errors) = validate_single_input(input, Presence::IfPresent) {
            return rejected(errors);
        }
        self.check_patch_references(artist_id, &input.genres, &input.features)?;

        let existing = self
            .store
            .get_single(single_id)?
            .ok_or_else(|| StoreError::not_found(EntityKind::Single, single_id))?;
        Self::check_owner(EntityKind::Single, single_id, &existing.artist, artist_id)?;

        let mut fields = SingleFields::from(&existing);
        apply_required(&mut fields.title, &input.title);
        apply_required(&mut fields.img, &input.img);
        apply_required(&mut fields.url, &input.url);
        if let Some(is_video) = input.is_video {
            fields.is_video = is_video;
        }
        if let Some(genres) = &input.genres {
            fields.genres = genres.clone();
        }
        if let Some(features) = &input.features {
            fields.features = features.clone();
        }
        if input.date.is_some() {
            fields.date = input.date;
        }

        let single = self.store.update_single(single_id, &fields)?;
        info!("Updated single {}", single.id);
        Ok(single)
    }

    pub fn delete_single(&self, artist_id: &str, single_id: &str) -> CatalogResult<Single> {
        let existing = self
            .store
            .get_single(single_id)?
            .ok_or_else(|| StoreError::not_found(EntityKind::Single, single_id))?;
        Self::check_owner(EntityKind::Single, single_id, &existing.artist, artist_id)?;

        self.store.delete_by_id(EntityKind::Single, single_id)?;
        info!("Deleted single {} of artist {}", single_id, artist_id);
        Ok(existing)
    }

    // =========================================================================
    // Genres and merch
    // =========================================================================

    /// A taken name comes back from the store as a constraint failure.
    pub fn create_genre(&self, input: &GenreInput) -> CatalogResult<Genre> {
        if let Err(errors) = validate_genre_input(input) {
            return rejected(errors);
        }
        let genre = self.store.create_genre(&GenreFields {
            name: required(&input.name),
            img: required(&input.img),
        })?;
        info!("Created genre {} ({})", genre.id, genre.name);
        Ok(genre)
    }

    pub fn create_merch(&self, artist_id: &str, input: &MerchInput) -> CatalogResult<Merch> {
        self.require_artist(artist_id)?;
        if let Err(errors) = validate_merch_input(input) {
            return rejected(errors);
        }
        let merch = self.store.create_merch(
            artist_id,
            &MerchFields {
                link: required(&input.link),
                img: required(&input.img),
            },
        )?;
        info!("Created merch {} for artist {}", merch.id, artist_id);
        Ok(merch)
    }
}
