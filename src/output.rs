use std::io::{self, Write};

use serde::Serialize;

use crate::knowledge::EntityDefaults;

#[derive(Debug, Clone, Serialize)]
pub struct InsertResult {
    pub table: &'static str,
    pub id: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub dataset: String,
    pub url: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    #[serde(flatten)]
    pub defaults: EntityDefaults,
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_insert(result: &InsertResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_rows<T: Serialize>(rows: &[T]) -> io::Result<()> {
        Self::print_json(&rows)
    }

    pub fn print_fetch(result: &FetchResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_validation(result: &ValidationResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
