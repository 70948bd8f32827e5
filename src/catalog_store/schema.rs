//! SQLite schema for the catalog database.
//!
//! Ordered lists embedded in a record live in child tables keyed by the
//! parent id plus a `position`, and are removed together with the parent.
//! Owner, genre and feature references are plain text columns: the store
//! does not enforce them, the write path validates them before writing.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};

const ARTISTS_TABLE_V_0: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("bio", &SqlType::Text, non_null = true),
        sqlite_column!("img", &SqlType::Text, non_null = true),
        sqlite_column!("header_img", &SqlType::Text),
        sqlite_column!("website", &SqlType::Text),
        sqlite_column!("company", &SqlType::Text),
        sqlite_column!("youtube", &SqlType::Text),
        sqlite_column!("twitter", &SqlType::Text),
        sqlite_column!("facebook", &SqlType::Text),
        sqlite_column!("instagram", &SqlType::Text),
        sqlite_column!("soundcloud", &SqlType::Text),
        sqlite_column!(
            "date",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_artists_name", "name")],
    unique_constraints: &[],
};

const ARTIST_GALLERY_TABLE_V_0: Table = Table {
    name: "artist_gallery",
    columns: &[
        sqlite_column!(
            "artist_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "artists",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
        sqlite_column!("img", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["artist_id", "position"]],
};

const ALBUMS_TABLE_V_0: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("img", &SqlType::Text, non_null = true),
        sqlite_column!("url", &SqlType::Text, non_null = true),
        sqlite_column!(
            "date",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_albums_artist_id", "artist_id")],
    unique_constraints: &[],
};

const ALBUM_SONGS_TABLE_V_0: Table = Table {
    name: "album_songs",
    columns: &[
        sqlite_column!(
            "album_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "albums",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
        sqlite_column!("songtitle", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["album_id", "position"]],
};

const ALBUM_GENRES_TABLE_V_0: Table = Table {
    name: "album_genres",
    columns: &[
        sqlite_column!(
            "album_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "albums",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
        sqlite_column!("genre_id", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_album_genres_genre_id", "genre_id")],
    unique_constraints: &[&["album_id", "position"]],
};

const ALBUM_FEATURES_TABLE_V_0: Table = Table {
    name: "album_features",
    columns: &[
        sqlite_column!(
            "album_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "albums",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_album_features_artist_id", "artist_id")],
    unique_constraints: &[&["album_id", "position"]],
};

const SINGLES_TABLE_V_0: Table = Table {
    name: "singles",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("img", &SqlType::Text, non_null = true),
        sqlite_column!("url", &SqlType::Text, non_null = true),
        sqlite_column!("is_video", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "date",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_singles_artist_id", "artist_id")],
    unique_constraints: &[],
};

const SINGLE_GENRES_TABLE_V_0: Table = Table {
    name: "single_genres",
    columns: &[
        sqlite_column!(
            "single_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "singles",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
        sqlite_column!("genre_id", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_single_genres_genre_id", "genre_id")],
    unique_constraints: &[&["single_id", "position"]],
};

const SINGLE_FEATURES_TABLE_V_0: Table = Table {
    name: "single_features",
    columns: &[
        sqlite_column!(
            "single_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "singles",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_single_features_artist_id", "artist_id")],
    unique_constraints: &[&["single_id", "position"]],
};

const GENRES_TABLE_V_0: Table = Table {
    name: "genres",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("img", &SqlType::Text, non_null = true),
        sqlite_column!(
            "date",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
    unique_constraints: &[],
};

const MERCH_TABLE_V_0: Table = Table {
    name: "merch",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true),
        sqlite_column!("link", &SqlType::Text, non_null = true),
        sqlite_column!("img", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_merch_artist_id", "artist_id")],
    unique_constraints: &[],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        ARTISTS_TABLE_V_0,
        ARTIST_GALLERY_TABLE_V_0,
        ALBUMS_TABLE_V_0,
        ALBUM_SONGS_TABLE_V_0,
        ALBUM_GENRES_TABLE_V_0,
        ALBUM_FEATURES_TABLE_V_0,
        SINGLES_TABLE_V_0,
        SINGLE_GENRES_TABLE_V_0,
        SINGLE_FEATURES_TABLE_V_0,
        GENRES_TABLE_V_0,
        MERCH_TABLE_V_0,
    ],
    migration: None,
}];

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn latest_schema_creates_and_validates() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = CATALOG_VERSIONED_SCHEMAS.last().unwrap();
        schema.create(&conn).unwrap();
        schema.validate(&conn).unwrap();
    }

    #[test]
    fn genre_names_are_unique() {
        let conn = Connection::open_in_memory().unwrap();
        CATALOG_VERSIONED_SCHEMAS[0].create(&conn).unwrap();

        conn.execute(
            "INSERT INTO genres (id, name, img) VALUES ('g1', 'Pop', 'pop.png')",
            [],
        )
        .unwrap();
        let duplicate = conn.execute(
            "INSERT INTO genres (id, name, img) VALUES ('g2', 'Pop', 'other.png')",
            [],
        );
        assert!(duplicate.is_err());
    }
}
