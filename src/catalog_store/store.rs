//! SQLite-backed catalog store.
//!
//! Writes go through a single connection inside `BEGIN IMMEDIATE`
//! transactions; reads are spread over a small pool of read-only
//! connections on the same WAL-mode file.

use super::error::{StoreError, StoreResult};
use super::models::*;
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use crate::sqlite_persistence::{migrate_if_needed, DEFAULT_TIMESTAMP};
use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

/// Table names for one release kind (albums or singles).
struct ReleaseTables {
    main: &'static str,
    genres: &'static str,
    features: &'static str,
    parent_column: &'static str,
}

const ALBUM_TABLES: ReleaseTables = ReleaseTables {
    main: "albums",
    genres: "album_genres",
    features: "album_features",
    parent_column: "album_id",
};

const SINGLE_TABLES: ReleaseTables = ReleaseTables {
    main: "singles",
    genres: "single_genres",
    features: "single_features",
    parent_column: "single_id",
};

fn lock(conn: &Mutex<Connection>) -> StoreResult<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|_| StoreError::Poisoned)
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn load_list(conn: &Connection, sql: &str, parent_id: &str) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let values = stmt
        .query_map(params![parent_id], |r| r.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(values)
}

fn insert_list(
    conn: &Connection,
    table: &str,
    parent_column: &str,
    value_column: &str,
    parent_id: &str,
    values: &[String],
) -> StoreResult<()> {
    let sql = format!(
        "INSERT INTO {} ({}, position, {}) VALUES (?1, ?2, ?3)",
        table, parent_column, value_column
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    for (position, value) in values.iter().enumerate() {
        stmt.execute(params![parent_id, position as i64, value])?;
    }
    Ok(())
}

fn replace_list(
    conn: &Connection,
    table: &str,
    parent_column: &str,
    value_column: &str,
    parent_id: &str,
    values: &[String],
) -> StoreResult<()> {
    conn.execute(
        &format!("DELETE FROM {} WHERE {} = ?1", table, parent_column),
        params![parent_id],
    )?;
    insert_list(conn, table, parent_column, value_column, parent_id, values)
}

fn row_exists(conn: &Connection, table: &str, id: &str) -> StoreResult<bool> {
    let exists = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", table),
        params![id],
        |r| r.get(0),
    )?;
    Ok(exists)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Row loading
// =============================================================================

fn load_artist(conn: &Connection, id: &str) -> StoreResult<Option<Artist>> {
    let artist = conn
        .query_row(
            "SELECT id, name, bio, img, header_img, website, company, youtube, twitter, facebook, instagram, soundcloud, date
             FROM artists WHERE id = ?1",
            params![id],
            |r| {
                Ok(Artist {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    bio: r.get(2)?,
                    img: r.get(3)?,
                    header_img: r.get(4)?,
                    gallery: Vec::new(),
                    website: r.get(5)?,
                    company: r.get(6)?,
                    social: SocialLinks {
                        youtube: r.get(7)?,
                        twitter: r.get(8)?,
                        facebook: r.get(9)?,
                        instagram: r.get(10)?,
                        soundcloud: r.get(11)?,
                    },
                    date: r.get(12)?,
                })
            },
        )
        .optional()?;

    let Some(mut artist) = artist else {
        return Ok(None);
    };
    artist.gallery = load_list(
        conn,
        "SELECT img FROM artist_gallery WHERE artist_id = ?1 ORDER BY position",
        id,
    )?;
    Ok(Some(artist))
}

fn load_release_references(
    conn: &Connection,
    tables: &ReleaseTables,
    id: &str,
) -> StoreResult<(Vec<String>, Vec<String>)> {
    let genres = load_list(
        conn,
        &format!(
            "SELECT genre_id FROM {} WHERE {} = ?1 ORDER BY position",
            tables.genres, tables.parent_column
        ),
        id,
    )?;
    let features = load_list(
        conn,
        &format!(
            "SELECT artist_id FROM {} WHERE {} = ?1 ORDER BY position",
            tables.features, tables.parent_column
        ),
        id,
    )?;
    Ok((genres, features))
}

fn load_album(conn: &Connection, id: &str) -> StoreResult<Option<Album>> {
    let album = conn
        .query_row(
            "SELECT id, artist_id, title, img, url, date FROM albums WHERE id = ?1",
            params![id],
            |r| {
                Ok(Album {
                    id: r.get(0)?,
                    artist: r.get(1)?,
                    title: r.get(2)?,
                    img: r.get(3)?,
                    url: r.get(4)?,
                    songs: Vec::new(),
                    genres: Vec::new(),
                    features: Vec::new(),
                    date: r.get(5)?,
                })
            },
        )
        .optional()?;

    let Some(mut album) = album else {
        return Ok(None);
    };
    album.songs = load_list(
        conn,
        "SELECT songtitle FROM album_songs WHERE album_id = ?1 ORDER BY position",
        id,
    )?
    .into_iter()
    .map(|songtitle| SongEntry { songtitle })
    .collect();
    (album.genres, album.features) = load_release_references(conn, &ALBUM_TABLES, id)?;
    Ok(Some(album))
}

fn load_single(conn: &Connection, id: &str) -> StoreResult<Option<Single>> {
    let single = conn
        .query_row(
            "SELECT id, artist_id, title, img, url, is_video, date FROM singles WHERE id = ?1",
            params![id],
            |r| {
                Ok(Single {
                    id: r.get(0)?,
                    artist: r.get(1)?,
                    title: r.get(2)?,
                    img: r.get(3)?,
                    url: r.get(4)?,
                    is_video: r.get::<_, i64>(5)? != 0,
                    genres: Vec::new(),
                    features: Vec::new(),
                    date: r.get(6)?,
                })
            },
        )
        .optional()?;

    let Some(mut single) = single else {
        return Ok(None);
    };
    (single.genres, single.features) = load_release_references(conn, &SINGLE_TABLES, id)?;
    Ok(Some(single))
}

fn load_genre(conn: &Connection, id: &str) -> StoreResult<Option<Genre>> {
    let genre = conn
        .query_row(
            "SELECT id, name, img, date FROM genres WHERE id = ?1",
            params![id],
            |r| {
                Ok(Genre {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    img: r.get(2)?,
                    date: r.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(genre)
}

fn load_merch(conn: &Connection, id: &str) -> StoreResult<Option<Merch>> {
    let merch = conn
        .query_row(
            "SELECT id, artist_id, link, img FROM merch WHERE id = ?1",
            params![id],
            |r| {
                Ok(Merch {
                    id: r.get(0)?,
                    artist: r.get(1)?,
                    link: r.get(2)?,
                    img: r.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(merch)
}

/// Runs `sql` (selecting ids) and loads every matching record, keeping row order.
fn load_all<T>(
    conn: &Connection,
    sql: &str,
    args: &[String],
    loader: fn(&Connection, &str) -> StoreResult<Option<T>>,
) -> StoreResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map(params_from_iter(args.iter()), |r| r.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(record) = loader(conn, &id)? {
            records.push(record);
        }
    }
    Ok(records)
}

fn release_query(tables: &ReleaseTables, filter: &ReleaseFilter) -> (String, Vec<String>) {
    let mut sql = format!("SELECT id FROM {} WHERE 1 = 1", tables.main);
    let mut args = Vec::new();

    if let Some(artist_id) = &filter.artist_id {
        args.push(artist_id.clone());
        sql.push_str(&format!(" AND artist_id = ?{}", args.len()));
    }
    if let Some(genre_id) = &filter.genre_id {
        args.push(genre_id.clone());
        sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM {} g WHERE g.{} = {}.id AND g.genre_id = ?{})",
            tables.genres,
            tables.parent_column,
            tables.main,
            args.len()
        ));
    }
    if let Some(feature_id) = &filter.feature_id {
        args.push(feature_id.clone());
        sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM {} f WHERE f.{} = {}.id AND f.artist_id = ?{})",
            tables.features,
            tables.parent_column,
            tables.main,
            args.len()
        ));
    }
    if let Some(text) = &filter.title_contains {
        args.push(like_pattern(text));
        sql.push_str(&format!(" AND title LIKE ?{} ESCAPE '\\'", args.len()));
    }
    sql.push_str(" ORDER BY rowid");
    (sql, args)
}

fn write_release_references(
    conn: &Connection,
    tables: &ReleaseTables,
    id: &str,
    genres: &[String],
    features: &[String],
) -> StoreResult<()> {
    replace_list(conn, tables.genres, tables.parent_column, "genre_id", id, genres)?;
    replace_list(
        conn,
        tables.features,
        tables.parent_column,
        "artist_id",
        id,
        features,
    )
}

fn delete_owned(conn: &Connection, kind: OwnedKind, artist_id: &str) -> StoreResult<usize> {
    let table = EntityKind::from(kind).table_name();
    let deleted = conn.execute(
        &format!("DELETE FROM {} WHERE artist_id = ?1", table),
        params![artist_id],
    )?;
    Ok(deleted)
}

impl SqliteCatalogStore {
    /// Opens (creating if needed) the catalog database at `db_path`.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of read-only connections; at least one is opened
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalog database at {:?}", db_path))?;

        migrate_if_needed(&mut write_conn, CATALOG_VERSIONED_SCHEMAS, "catalog")?;
        write_conn.pragma_update(None, "journal_mode", "WAL")?;
        write_conn.pragma_update(None, "foreign_keys", "ON")?;

        let count = |table: &str| -> i64 {
            write_conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
                .unwrap_or(0)
        };
        info!(
            "Opened catalog: {} artists, {} albums, {} singles, {} genres, {} merch",
            count("artists"),
            count("albums"),
            count("singles"),
            count("genres"),
            count("merch")
        );

        let read_pool_size = read_pool_size.max(1);
        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteCatalogStore {
            read_pool,
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    fn read<T>(&self, f: impl FnOnce(&Connection) -> StoreResult<T>) -> StoreResult<T> {
        let conn = self.get_read_conn();
        let guard = lock(&conn)?;
        f(&guard)
    }

    /// Runs `f` inside an immediate transaction on the write connection.
    fn write<T>(&self, f: impl FnOnce(&Connection) -> StoreResult<T>) -> StoreResult<T> {
        let conn = lock(&self.write_conn)?;
        conn.execute("BEGIN IMMEDIATE", [])?;

        match f(&conn) {
            Ok(value) => {
                conn.execute("COMMIT", [])?;
                Ok(value)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }
}

impl CatalogStore for SqliteCatalogStore {
    // =========================================================================
    // Artists
    // =========================================================================

    fn create_artist(&self, fields: &ArtistFields) -> StoreResult<Artist> {
        let id = generate_id();
        self.write(|conn| {
            conn.execute(
                "INSERT INTO artists (id, name, bio, img, header_img, website, company, youtube, twitter, facebook, instagram, soundcloud)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    &id,
                    &fields.name,
                    &fields.bio,
                    &fields.img,
                    &fields.header_img,
                    &fields.website,
                    &fields.company,
                    &fields.social.youtube,
                    &fields.social.twitter,
                    &fields.social.facebook,
                    &fields.social.instagram,
                    &fields.social.soundcloud,
                ],
            )?;
            insert_list(conn, "artist_gallery", "artist_id", "img", &id, &fields.gallery)?;
            load_artist(conn, &id)?.ok_or_else(|| StoreError::not_found(EntityKind::Artist, &id))
        })
    }

    fn get_artist(&self, id: &str) -> StoreResult<Option<Artist>> {
        self.read(|conn| load_artist(conn, id))
    }

    fn find_artists(&self, filter: &ArtistFilter) -> StoreResult<Vec<Artist>> {
        let (sql, args) = match non_blank(filter.name_contains.clone()) {
            Some(text) => (
                "SELECT id FROM artists WHERE name LIKE ?1 ESCAPE '\\' ORDER BY rowid",
                vec![like_pattern(&text)],
            ),
            None => ("SELECT id FROM artists ORDER BY rowid", vec![]),
        };
        self.read(|conn| load_all(conn, sql, &args, load_artist))
    }

    fn update_artist(&self, id: &str, fields: &ArtistFields) -> StoreResult<Artist> {
        self.write(|conn| {
            let updated = conn.execute(
                "UPDATE artists SET name = ?2, bio = ?3, img = ?4, header_img = ?5, website = ?6, company = ?7,
                 youtube = ?8, twitter = ?9, facebook = ?10, instagram = ?11, soundcloud = ?12
                 WHERE id = ?1",
                params![
                    id,
                    &fields.name,
                    &fields.bio,
                    &fields.img,
                    &fields.header_img,
                    &fields.website,
                    &fields.company,
                    &fields.social.youtube,
                    &fields.social.twitter,
                    &fields.social.facebook,
                    &fields.social.instagram,
                    &fields.social.soundcloud,
                ],
            )?;
            if updated == 0 {
                return Err(StoreError::not_found(EntityKind::Artist, id));
            }
            replace_list(conn, "artist_gallery", "artist_id", "img", id, &fields.gallery)?;
            load_artist(conn, id)?.ok_or_else(|| StoreError::not_found(EntityKind::Artist, id))
        })
    }

    // =========================================================================
    // Albums
    // =========================================================================

    fn create_album(&self, artist_id: &str, fields: &AlbumFields) -> StoreResult<Album> {
        let id = generate_id();
        let titles: Vec<String> = fields.songs.iter().map(|s| s.songtitle.clone()).collect();
        self.write(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO albums (id, artist_id, title, img, url, date) VALUES (?1, ?2, ?3, ?4, ?5, COALESCE(?6, {}))",
                    DEFAULT_TIMESTAMP
                ),
                params![&id, artist_id, &fields.title, &fields.img, &fields.url, fields.date],
            )?;
            insert_list(conn, "album_songs", "album_id", "songtitle", &id, &titles)?;
            write_release_references(conn, &ALBUM_TABLES, &id, &fields.genres, &fields.features)?;
            load_album(conn, &id)?.ok_or_else(|| StoreError::not_found(EntityKind::Album, &id))
        })
    }

    fn get_album(&self, id: &str) -> StoreResult<Option<Album>> {
        self.read(|conn| load_album(conn, id))
    }

    fn find_albums(&self, filter: &ReleaseFilter) -> StoreResult<Vec<Album>> {
        let (sql, args) = release_query(&ALBUM_TABLES, filter);
        self.read(|conn| load_all(conn, &sql, &args, load_album))
    }

    fn update_album(&self, id: &str, fields: &AlbumFields) -> StoreResult<Album> {
        let titles: Vec<String> = fields.songs.iter().map(|s| s.songtitle.clone()).collect();
        self.write(|conn| {
            let updated = conn.execute(
                "UPDATE albums SET title = ?2, img = ?3, url = ?4, date = COALESCE(?5, date) WHERE id = ?1",
                params![id, &fields.title, &fields.img, &fields.url, fields.date],
            )?;
            if updated == 0 {
                return Err(StoreError::not_found(EntityKind::Album, id));
            }
            replace_list(conn, "album_songs", "album_id", "songtitle", id, &titles)?;
            write_release_references(conn, &ALBUM_TABLES, id, &fields.genres, &fields.features)?;
            load_album(conn, id)?.ok_or_else(|| StoreError::not_found(EntityKind::Album, id))
        })
    }

    // =========================================================================
    // Singles
    // =========================================================================

    fn create_single(&self, artist_id: &str, fields: &SingleFields) -> StoreResult<Single> {
        let id = generate_id();
        self.write(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO singles (id, artist_id, title, img, url, is_video, date) VALUES (?1, ?2, ?3, ?4, ?5, ?6, COALESCE(?7, {}))",
                    DEFAULT_TIMESTAMP
                ),
                params![
                    &id,
                    artist_id,
                    &fields.title,
                    &fields.img,
                    &fields.url,
                    fields.is_video as i64,
                    fields.date
                ],
            )?;
            write_release_references(conn, &SINGLE_TABLES, &id, &fields.genres, &fields.features)?;
            load_single(conn, &id)?.ok_or_else(|| StoreError::not_found(EntityKind::Single, &id))
        })
    }

    fn get_single(&self, id: &str) -> StoreResult<Option<Single>> {
        self.read(|conn| load_single(conn, id))
    }

    fn find_singles(&self, filter: &ReleaseFilter) -> StoreResult<Vec<Single>> {
        let (sql, args) = release_query(&SINGLE_TABLES, filter);
        self.read(|conn| load_all(conn, &sql, &args, load_single))
    }

    fn update_single(&self, id: &str, fields: &SingleFields) -> StoreResult<Single> {
        self.write(|conn| {
            let updated = conn.execute(
                "UPDATE singles SET title = ?2, img = ?3, url = ?4, is_video = ?5, date = COALESCE(?6, date) WHERE id = ?1",
                params![
                    id,
                    &fields.title,
                    &fields.img,
                    &fields.url,
                    fields.is_video as i64,
                    fields.date
                ],
            )?;
            if updated == 0 {
                return Err(StoreError::not_found(EntityKind::Single, id));
            }
            write_release_references(conn, &SINGLE_TABLES, id, &fields.genres, &fields.features)?;
            load_single(conn, id)?.ok_or_else(|| StoreError::not_found(EntityKind::Single, id))
        })
    }

    // =========================================================================
    // Genres and merch
    // =========================================================================

    fn create_genre(&self, fields: &GenreFields) -> StoreResult<Genre> {
        let id = generate_id();
        self.write(|conn| {
            conn.execute(
                "INSERT INTO genres (id, name, img) VALUES (?1, ?2, ?3)",
                params![&id, &fields.name, &fields.img],
            )?;
            load_genre(conn, &id)?.ok_or_else(|| StoreError::not_found(EntityKind::Genre, &id))
        })
    }

    fn get_genre(&self, id: &str) -> StoreResult<Option<Genre>> {
        self.read(|conn| load_genre(conn, id))
    }

    fn find_genres(&self, filter: &GenreFilter) -> StoreResult<Vec<Genre>> {
        let (sql, args) = match non_blank(filter.name_contains.clone()) {
            Some(text) => (
                "SELECT id FROM genres WHERE name LIKE ?1 ESCAPE '\\' ORDER BY rowid",
                vec![like_pattern(&text)],
            ),
            None => ("SELECT id FROM genres ORDER BY rowid", vec![]),
        };
        self.read(|conn| load_all(conn, sql, &args, load_genre))
    }

    fn create_merch(&self, artist_id: &str, fields: &MerchFields) -> StoreResult<Merch> {
        let id = generate_id();
        self.write(|conn| {
            conn.execute(
                "INSERT INTO merch (id, artist_id, link, img) VALUES (?1, ?2, ?3, ?4)",
                params![&id, artist_id, &fields.link, &fields.img],
            )?;
            load_merch(conn, &id)?.ok_or_else(|| StoreError::not_found(EntityKind::Merch, &id))
        })
    }

    fn get_merch(&self, id: &str) -> StoreResult<Option<Merch>> {
        self.read(|conn| load_merch(conn, id))
    }

    fn find_merch(&self, filter: &MerchFilter) -> StoreResult<Vec<Merch>> {
        let (sql, args) = match &filter.artist_id {
            Some(artist_id) => (
                "SELECT id FROM merch WHERE artist_id = ?1 ORDER BY rowid",
                vec![artist_id.clone()],
            ),
            None => ("SELECT id FROM merch ORDER BY rowid", vec![]),
        };
        self.read(|conn| load_all(conn, sql, &args, load_merch))
    }

    // =========================================================================
    // Kind-generic operations
    // =========================================================================

    fn exists(&self, kind: EntityKind, id: &str) -> StoreResult<bool> {
        self.read(|conn| row_exists(conn, kind.table_name(), id))
    }

    fn delete_by_id(&self, kind: EntityKind, id: &str) -> StoreResult<()> {
        self.write(|conn| {
            let deleted = conn.execute(
                &format!("DELETE FROM {} WHERE id = ?1", kind.table_name()),
                params![id],
            )?;
            if deleted == 0 {
                return Err(StoreError::not_found(kind, id));
            }
            Ok(())
        })
    }

    fn delete_by_owner(&self, kind: OwnedKind, artist_id: &str) -> StoreResult<usize> {
        self.write(|conn| delete_owned(conn, kind, artist_id))
    }

    /// Same steps as the trait default, in one transaction.
    fn delete_artist_cascade(&self, artist_id: &str) -> StoreResult<CascadeReport> {
        self.write(|conn| {
            if !row_exists(conn, "artists", artist_id)? {
                return Err(StoreError::not_found(EntityKind::Artist, artist_id));
            }
            let report = CascadeReport {
                singles: delete_owned(conn, OwnedKind::Single, artist_id)?,
                albums: delete_owned(conn, OwnedKind::Album, artist_id)?,
                merch: delete_owned(conn, OwnedKind::Merch, artist_id)?,
            };
            conn.execute("DELETE FROM artists WHERE id = ?1", params![artist_id])?;
            Ok(report)
        })
    }
}
