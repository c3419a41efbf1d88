use std::path::Path;

use camino::Utf8Path;
use rusqlite::params;
use tracing::{debug, info};

use crate::config::UserContext;
use crate::domain::InterfaceType;
use crate::error::TrackError;
use crate::fs_util::{checksum, split_name_suffix};
use crate::provenance::ProvenanceSource;
use crate::store::{Database, now};

/// Where a file comes from.
pub enum Origin<'a> {
    /// Infer the interface from the running notebook.
    Notebook(&'a dyn ProvenanceSource),
    /// A caller-named script or external process.
    Explicit { id: String, name: Option<String> },
}

impl<'a> Origin<'a> {
    pub fn explicit(id: impl Into<String>, name: Option<String>) -> Self {
        Origin::Explicit {
            id: id.into(),
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedInterface {
    id: String,
    name: Option<String>,
    dependency: Option<String>,
    interface_type: InterfaceType,
}

#[derive(Debug, Default)]
struct FileColumns<'a> {
    suffix: Option<&'a str>,
    checksum: Option<&'a str>,
}

impl Database {
    /// Insert a user row unconditionally and return its id.
    pub fn insert_user(&self, name: &str) -> Result<i64, TrackError> {
        let mut conn = self.session()?;
        let tx = conn.transaction()?;
        tx.execute(
            r#"INSERT INTO "user" (name, created_at) VALUES (?1, ?2)"#,
            params![name, now()],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    pub fn insert_if_not_exists_user(&self, name: &str) -> Result<i64, TrackError> {
        if let Some(user_id) = self.find_user_by_name(name)? {
            info!("user {name} ({user_id}) already exists");
            return Ok(user_id);
        }
        let user_id = self.insert_user(name)?;
        info!("added user {name} ({user_id})");
        Ok(user_id)
    }

    /// Insert a file row under its interface, creating the interface first
    /// when it is not yet known.
    pub fn insert_file(
        &self,
        context: &UserContext,
        name: &str,
        origin: Origin<'_>,
    ) -> Result<i64, TrackError> {
        self.insert_file_with(context, name, origin, FileColumns::default())
    }

    /// Split `path` into name and suffix, hash it and record it as a file.
    pub fn ingest_file(
        &self,
        context: &UserContext,
        path: &Path,
        origin: Origin<'_>,
    ) -> Result<i64, TrackError> {
        let utf8 = Utf8Path::from_path(path)
            .ok_or_else(|| TrackError::Filesystem(format!("non UTF-8 path: {}", path.display())))?;
        let (name, suffix) = split_name_suffix(utf8);
        let digest = checksum(path)?;
        let columns = FileColumns {
            suffix: Some(suffix.as_str()).filter(|suffix| !suffix.is_empty()),
            checksum: Some(digest.as_str()),
        };
        self.insert_file_with(context, &name, origin, columns)
    }

    fn insert_file_with(
        &self,
        context: &UserContext,
        name: &str,
        origin: Origin<'_>,
        columns: FileColumns<'_>,
    ) -> Result<i64, TrackError> {
        let interface = resolve_interface(origin)?;

        if !self.interface_exists(&interface.id)? {
            self.insert_interface(context, &interface)?;
        }

        let mut conn = self.session()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO file (name, suffix, checksum, interface, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name, columns.suffix, columns.checksum, interface.id, now()],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    fn insert_interface(
        &self,
        context: &UserContext,
        interface: &ResolvedInterface,
    ) -> Result<(), TrackError> {
        let mut conn = self.session()?;
        let tx = conn.transaction()?;
        let inserted = tx.execute(
            "INSERT INTO interface (id, name, dependency, type, user, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) ON CONFLICT(id) DO NOTHING",
            params![
                interface.id,
                interface.name,
                interface.dependency,
                interface.interface_type.as_str(),
                context.user_id,
                now(),
            ],
        )?;
        tx.commit()?;

        if inserted == 0 {
            debug!(interface = %interface.id, "interface inserted concurrently");
            return Ok(());
        }
        info!(
            "added interface {:?} ({}) by user {} ({})",
            interface.name.as_deref().unwrap_or(""),
            interface.id,
            context.user_name,
            context.user_id
        );
        Ok(())
    }
}

fn resolve_interface(origin: Origin<'_>) -> Result<ResolvedInterface, TrackError> {
    match origin {
        Origin::Notebook(source) => {
            let meta = source.provenance()?;
            let title = meta.title.ok_or_else(|| {
                TrackError::Configuration(format!("notebook {} has no title", meta.id))
            })?;
            Ok(ResolvedInterface {
                id: meta.id,
                name: Some(title),
                dependency: meta.dependency,
                interface_type: InterfaceType::Nbproject,
            })
        }
        Origin::Explicit { id, name } => Ok(ResolvedInterface {
            id,
            name,
            dependency: None,
            interface_type: InterfaceType::Other,
        }),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use camino::Utf8PathBuf;

    use super::*;
    use crate::domain::Table;
    use crate::provenance::NotebookMeta;

    #[test]
    fn explicit_origin_is_other() {
        let resolved = resolve_interface(Origin::explicit("pipeline-7", None)).unwrap();
        assert_eq!(resolved.interface_type, InterfaceType::Other);
        assert_eq!(resolved.dependency, None);
    }

    #[test]
    fn notebook_origin_requires_title() {
        let meta = NotebookMeta {
            id: "nb-1".to_string(),
            title: None,
            dependency: Some("pandas==1.4.3".to_string()),
        };
        let err = resolve_interface(Origin::Notebook(&meta)).unwrap_err();
        assert_matches!(err, TrackError::Configuration(_));
    }

    #[test]
    fn interface_conflict_keeps_first_row() {
        let temp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().join("track.sqlite")).unwrap();
        let db = Database::open(path).unwrap();
        let user_id = db.insert_user("testuser1").unwrap();
        let context = UserContext {
            user_id,
            user_name: "testuser1".to_string(),
        };
        let first = ResolvedInterface {
            id: "nb-42".to_string(),
            name: Some("First run".to_string()),
            dependency: Some("pandas==1.4.3".to_string()),
            interface_type: InterfaceType::Nbproject,
        };
        let second = ResolvedInterface {
            id: "nb-42".to_string(),
            name: Some("Second run".to_string()),
            dependency: None,
            interface_type: InterfaceType::Other,
        };

        db.insert_interface(&context, &first).unwrap();
        db.insert_interface(&context, &second).unwrap();

        assert_eq!(db.count(Table::Interfaces).unwrap(), 1);
        let stored = db.load_interfaces().unwrap();
        assert_eq!(stored[0].name.as_deref(), Some("First run"));
        assert_eq!(stored[0].dependency.as_deref(), Some("pandas==1.4.3"));
        assert_eq!(stored[0].interface_type, InterfaceType::Nbproject);
    }
}
