use super::admin_models::Admin;
use super::admin_store::AdminStore;
use super::auth::CatalogHasher;
use crate::sqlite_column;
use crate::sqlite_persistence::{
    migrate_if_needed, Column, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

/// V 0
const ADMIN_TABLE_V_0: Table = Table {
    name: "admin",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("email", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("password_hash", &SqlType::Text, non_null = true),
        sqlite_column!("hasher", &SqlType::Text, non_null = true),
        sqlite_column!(
            "date",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!("last_login", &SqlType::Integer),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub const ADMIN_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[ADMIN_TABLE_V_0],
    migration: None,
}];

const ADMIN_COLUMNS: &str = "id, name, email, password_hash, hasher, date, last_login";

#[derive(Clone)]
pub struct SqliteAdminStore {
    conn: Arc<Mutex<Connection>>,
}

fn parse_admin_row(row: &rusqlite::Row) -> rusqlite::Result<(Admin, String)> {
    let hasher_name: String = row.get(4)?;
    Ok((
        Admin {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            hasher: CatalogHasher::Argon2,
            date: row.get(5)?,
            last_login: row.get(6)?,
        },
        hasher_name,
    ))
}

fn with_hasher((mut admin, hasher_name): (Admin, String)) -> Result<Admin> {
    admin.hasher = hasher_name
        .parse()
        .with_context(|| format!("Admin {} has an unreadable hasher", admin.id))?;
    Ok(admin)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl SqliteAdminStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let db_path = db_path.as_ref();
        let mut conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open admin database at {:?}", db_path))?;
        migrate_if_needed(&mut conn, ADMIN_VERSIONED_SCHEMAS, "admin")?;

        let admin_count: i64 = conn.query_row("SELECT COUNT(*) FROM admin", [], |r| r.get(0))?;
        info!("Opened admin db with {} admin account(s)", admin_count);

        Ok(SqliteAdminStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Finds an `admin.db`, trying `/data/db` first and then the current
    /// directory and its parents.
    pub fn infer_path() -> Option<PathBuf> {
        let data_dir_db = PathBuf::from("/data/db/admin.db");
        if data_dir_db.exists() {
            return Some(data_dir_db);
        }

        let mut current_dir = std::env::current_dir().ok()?;
        loop {
            let candidate = current_dir.join("admin.db");
            if candidate.is_file() {
                return Some(candidate);
            }
            current_dir = current_dir.parent()?.to_path_buf();
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        match self.conn.lock() {
            Ok(guard) => Ok(guard),
            Err(_) => bail!("Admin store connection lock poisoned"),
        }
    }

    fn query_one(&self, filter: &str, value: &str) -> Result<Option<Admin>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM admin WHERE {} = ?1", ADMIN_COLUMNS, filter),
                params![value],
                parse_admin_row,
            )
            .optional()?;
        row.map(with_hasher).transpose()
    }
}

impl AdminStore for SqliteAdminStore {
    fn create_admin(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        hasher: CatalogHasher,
    ) -> Result<Admin> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        {
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO admin (id, name, email, password_hash, hasher) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![&id, name, normalize_email(email), password_hash, hasher.as_str()],
            )
            .with_context(|| format!("Failed to create admin {}", email))?;
        }
        self.get_admin(&id)?
            .with_context(|| format!("Admin {} vanished right after creation", id))
    }

    fn get_admin(&self, id: &str) -> Result<Option<Admin>> {
        self.query_one("id", id)
    }

    fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        self.query_one("email", &normalize_email(email))
    }

    fn list_admins(&self) -> Result<Vec<Admin>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM admin ORDER BY date, email",
            ADMIN_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], parse_admin_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(with_hasher).collect()
    }

    fn delete_admin(&self, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM admin WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    fn update_password(
        &self,
        id: &str,
        password_hash: &str,
        hasher: CatalogHasher,
    ) -> Result<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE admin SET password_hash = ?2, hasher = ?3 WHERE id = ?1",
            params![id, password_hash, hasher.as_str()],
        )?;
        if updated == 0 {
            bail!("Admin {} not found", id);
        }
        Ok(())
    }

    fn touch_last_login(&self, id: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "UPDATE admin SET last_login = {} WHERE id = ?1",
                DEFAULT_TIMESTAMP
            ),
            params![id],
        )?;
        Ok(())
    }
}
