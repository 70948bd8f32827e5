use super::error::CatalogResult;
use super::CatalogService;
use crate::catalog_store::*;

impl CatalogService {
    pub fn find_artists(&self, name_contains: Option<&str>) -> CatalogResult<Vec<Artist>> {
        Ok(self.store.find_artists(&ArtistFilter {
            name_contains: name_contains.map(str::to_string),
        })?)
    }

    pub fn get_artist(&self, id: &str) -> CatalogResult<Option<Artist>> {
        Ok(self.store.get_artist(id)?)
    }

    pub fn find_albums(&self, filter: &ReleaseFilter) -> CatalogResult<Vec<Album>> {
        Ok(self.store.find_albums(filter)?)
    }

    pub fn get_album(&self, id: &str) -> CatalogResult<Option<Album>> {
        Ok(self.store.get_album(id)?)
    }

    pub fn find_singles(&self, filter: &ReleaseFilter) -> CatalogResult<Vec<Single>> {
        Ok(self.store.find_singles(filter)?)
    }

    pub fn get_single(&self, id: &str) -> CatalogResult<Option<Single>> {
        Ok(self.store.get_single(id)?)
    }

    pub fn find_genres(&self, name_contains: Option<&str>) -> CatalogResult<Vec<Genre>> {
        Ok(self.store.find_genres(&GenreFilter {
            name_contains: name_contains.map(str::to_string),
        })?)
    }

    pub fn get_genre(&self, id: &str) -> CatalogResult<Option<Genre>> {
        Ok(self.store.get_genre(id)?)
    }

    pub fn merch_of_artist(&self, artist_id: &str) -> CatalogResult<Vec<Merch>> {
        Ok(self.store.find_merch(&MerchFilter {
            artist_id: Some(artist_id.to_string()),
        })?)
    }

    fn resolve_refs(
        &self,
        artist_id: &str,
        genre_ids: &[String],
        feature_ids: &[String],
    ) -> CatalogResult<(Option<Artist>, Vec<Genre>, Vec<Artist>)> {
        let artist = self.store.get_artist(artist_id)?;
        let mut genres = Vec::with_capacity(genre_ids.len());
        for id in genre_ids {
            if let Some(genre) = self.store.get_genre(id)? {
                genres.push(genre);
            }
        }
        let mut features = Vec::with_capacity(feature_ids.len());
        for id in feature_ids {
            if let Some(featured) = self.store.get_artist(id)? {
                features.push(featured);
            }
        }
        Ok((artist, genres, features))
    }

    /// Dangling references are skipped.
    pub fn resolve_album(&self, id: &str) -> CatalogResult<Option<ResolvedAlbum>> {
        let Some(album) = self.store.get_album(id)? else {
            return Ok(None);
        };
        let (artist, genres, features) =
            self.resolve_refs(&album.artist, &album.genres, &album.features)?;
        Ok(Some(ResolvedAlbum {
            album,
            artist,
            genres,
            features,
        }))
    }

    pub fn resolve_single(&self, id: &str) -> CatalogResult<Option<ResolvedSingle>> {
        let Some(single) = self.store.get_single(id)? else {
            return Ok(None);
        };
        let (artist, genres, features) =
            self.resolve_refs(&single.artist, &single.genres, &single.features)?;
        Ok(Some(ResolvedSingle {
            single,
            artist,
            genres,
            features,
        }))
    }
}
