//! CatalogStore trait definition.

use super::error::{StoreError, StoreResult};
use super::models::*;

/// Persistence for the five catalog entity kinds.
///
/// Every method is atomic on its own. Nothing here checks cross-entity
/// references: a stored album may name a genre that was deleted later.
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Artists
    // =========================================================================

    fn create_artist(&self, fields: &ArtistFields) -> StoreResult<Artist>;

    /// Returns Ok(None) if no artist has this id.
    fn get_artist(&self, id: &str) -> StoreResult<Option<Artist>>;

    fn find_artists(&self, filter: &ArtistFilter) -> StoreResult<Vec<Artist>>;

    /// Replaces every mutable field. Fails with `NotFound` for an unknown id.
    fn update_artist(&self, id: &str, fields: &ArtistFields) -> StoreResult<Artist>;

    // =========================================================================
    // Albums
    // =========================================================================

    fn create_album(&self, artist_id: &str, fields: &AlbumFields) -> StoreResult<Album>;

    fn get_album(&self, id: &str) -> StoreResult<Option<Album>>;

    fn find_albums(&self, filter: &ReleaseFilter) -> StoreResult<Vec<Album>>;

    /// The owning artist is never changed. A `None` date keeps the stored one.
    fn update_album(&self, id: &str, fields: &AlbumFields) -> StoreResult<Album>;

    // =========================================================================
    // Singles
    // =========================================================================

    fn create_single(&self, artist_id: &str, fields: &SingleFields) -> StoreResult<Single>;

    fn get_single(&self, id: &str) -> StoreResult<Option<Single>>;

    fn find_singles(&self, filter: &ReleaseFilter) -> StoreResult<Vec<Single>>;

    fn update_single(&self, id: &str, fields: &SingleFields) -> StoreResult<Single>;

    // =========================================================================
    // Genres and merch
    // =========================================================================

    /// Fails with `Constraint` if another genre already has this name.
    fn create_genre(&self, fields: &GenreFields) -> StoreResult<Genre>;

    fn get_genre(&self, id: &str) -> StoreResult<Option<Genre>>;

    fn find_genres(&self, filter: &GenreFilter) -> StoreResult<Vec<Genre>>;

    fn create_merch(&self, artist_id: &str, fields: &MerchFields) -> StoreResult<Merch>;

    fn get_merch(&self, id: &str) -> StoreResult<Option<Merch>>;

    fn find_merch(&self, filter: &MerchFilter) -> StoreResult<Vec<Merch>>;

    // =========================================================================
    // Kind-generic operations
    // =========================================================================

    fn exists(&self, kind: EntityKind, id: &str) -> StoreResult<bool>;

    /// Fails with `NotFound` if nothing was deleted.
    fn delete_by_id(&self, kind: EntityKind, id: &str) -> StoreResult<()>;

    /// Deletes every record of `kind` owned by `artist_id`, returning how many went.
    fn delete_by_owner(&self, kind: OwnedKind, artist_id: &str) -> StoreResult<usize>;

    /// Deletes an artist's singles, then albums, then merch, then the artist.
    ///
    /// This default runs the steps one by one, so a failure after the first
    /// step leaves the catalog partially cleaned; that is reported as
    /// `StoreError::PartialCascade` and nothing is restored. Stores with
    /// transactions should override it.
    fn delete_artist_cascade(&self, artist_id: &str) -> StoreResult<CascadeReport> {
        if !self.exists(EntityKind::Artist, artist_id)? {
            return Err(StoreError::not_found(EntityKind::Artist, artist_id));
        }

        let mut report = CascadeReport::default();
        let partial = |completed: CascadeReport, err: StoreError| StoreError::PartialCascade {
            artist_id: artist_id.to_string(),
            completed,
            source: Box::new(err),
        };

        report.singles = self.delete_by_owner(OwnedKind::Single, artist_id)?;
        report.albums = self
            .delete_by_owner(OwnedKind::Album, artist_id)
            .map_err(|e| partial(report, e))?;
        report.merch = self
            .delete_by_owner(OwnedKind::Merch, artist_id)
            .map_err(|e| partial(report, e))?;
        self.delete_by_id(EntityKind::Artist, artist_id)
            .map_err(|e| partial(report, e))?;

        Ok(report)
    }
}
