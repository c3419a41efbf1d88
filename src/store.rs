use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::config::{ResolvedSettings, UserContext};
use crate::domain::{InterfaceType, Table};
use crate::error::TrackError;
use crate::schema::{self, FileRow, InterfaceRow, SCHEMA_VERSION, UserRow};

/// Handle to the SQLite file backing the tracker.
///
/// No connection is held between operations: each call opens a session
/// with [`Database::session`] and drops it before returning.
#[derive(Debug, Clone)]
pub struct Database {
    path: Utf8PathBuf,
}

impl Database {
    /// Open a database file, creating it and its schema if needed.
    pub fn open(path: impl Into<Utf8PathBuf>) -> Result<Self, TrackError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_str().is_empty() {
                fs::create_dir_all(parent.as_std_path())
                    .map_err(|err| TrackError::Filesystem(err.to_string()))?;
            }
        }
        let db = Self { path };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Open the configured database and make sure the acting user exists.
    pub fn setup(settings: &ResolvedSettings) -> Result<(Self, UserContext), TrackError> {
        let db = Self::open(settings.database.clone())?;
        let user_id = db.insert_if_not_exists_user(&settings.user_name)?;
        let context = UserContext {
            user_id,
            user_name: settings.user_name.clone(),
        };
        Ok((db, context))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// A scoped session with foreign keys enforced.
    pub fn session(&self) -> Result<Connection, TrackError> {
        debug!(path = %self.path, "opening session");
        let conn = Connection::open(self.path.as_std_path())?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    fn initialize_schema(&self) -> Result<(), TrackError> {
        let mut conn = self.session()?;
        let tx = conn.transaction()?;
        for stmt in schema::all_schema_statements() {
            tx.execute(stmt, [])?;
        }
        tx.execute(
            "INSERT OR IGNORE INTO schema_version (version, migrated_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now()],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<Option<String>, TrackError> {
        let conn = self.session()?;
        let version = conn
            .query_row(
                "SELECT version FROM schema_version ORDER BY migrated_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(version)
    }

    /// First user with this name, in row order.
    pub fn find_user_by_name(&self, name: &str) -> Result<Option<i64>, TrackError> {
        let conn = self.session()?;
        let id = conn
            .query_row(
                r#"SELECT id FROM "user" WHERE name = ?1 ORDER BY rowid LIMIT 1"#,
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn interface_exists(&self, id: &str) -> Result<bool, TrackError> {
        let conn = self.session()?;
        let found: Option<i64> = conn
            .query_row("SELECT 1 FROM interface WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    pub fn count(&self, table: Table) -> Result<usize, TrackError> {
        let sql = match table {
            Table::Users => r#"SELECT COUNT(*) FROM "user""#,
            Table::Interfaces => "SELECT COUNT(*) FROM interface",
            Table::Files => "SELECT COUNT(*) FROM file",
        };
        let conn = self.session()?;
        let count: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn load_users(&self) -> Result<Vec<UserRow>, TrackError> {
        let conn = self.session()?;
        let mut stmt = conn.prepare(r#"SELECT id, name, created_at FROM "user" ORDER BY id"#)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(UserRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn load_interfaces(&self) -> Result<Vec<InterfaceRow>, TrackError> {
        let conn = self.session()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, dependency, type, user, created_at FROM interface ORDER BY created_at, id",
        )?;
        let rows = stmt
            .query_map([], row_to_interface)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn load_files(&self) -> Result<Vec<FileRow>, TrackError> {
        let conn = self.session()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, suffix, checksum, interface, created_at FROM file ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(FileRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    suffix: row.get(2)?,
                    checksum: row.get(3)?,
                    interface: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn row_to_interface(row: &rusqlite::Row) -> rusqlite::Result<InterfaceRow> {
    let type_str: String = row.get(3)?;
    let interface_type: InterfaceType = type_str.parse().map_err(|err: TrackError| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(err))
    })?;
    Ok(InterfaceRow {
        id: row.get(0)?,
        name: row.get(1)?,
        dependency: row.get(2)?,
        interface_type,
        user: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
