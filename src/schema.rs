//! Table definitions and row models.

use serde::Serialize;

use crate::domain::InterfaceType;

pub const SCHEMA_VERSION: &str = "0.1.0";

pub const CREATE_USER_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS "user" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

pub const CREATE_INTERFACE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS interface (
    id TEXT PRIMARY KEY,
    name TEXT,
    dependency TEXT,
    type TEXT NOT NULL,
    user INTEGER NOT NULL REFERENCES "user"(id),
    created_at TEXT NOT NULL
)
"#;

pub const CREATE_FILE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS file (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    suffix TEXT,
    checksum TEXT,
    interface TEXT NOT NULL REFERENCES interface(id),
    created_at TEXT NOT NULL
)
"#;

pub const CREATE_SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version TEXT PRIMARY KEY,
    migrated_at TEXT NOT NULL
)
"#;

pub const CREATE_INDEXES: &[&str] = &[
    r#"CREATE INDEX IF NOT EXISTS idx_user_name ON "user"(name)"#,
    "CREATE INDEX IF NOT EXISTS idx_file_interface ON file(interface)",
];

pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_USER_TABLE,
        CREATE_INTERFACE_TABLE,
        CREATE_FILE_TABLE,
        CREATE_SCHEMA_VERSION_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceRow {
    pub id: String,
    pub name: Option<String>,
    pub dependency: Option<String>,
    #[serde(rename = "type")]
    pub interface_type: InterfaceType,
    pub user: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRow {
    pub id: i64,
    pub name: String,
    pub suffix: Option<String>,
    pub checksum: Option<String>,
    pub interface: String,
    pub created_at: String,
}
