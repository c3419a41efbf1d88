use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::TrackError;

/// Identity of the notebook or script currently producing data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookMeta {
    pub id: String,
    pub title: Option<String>,
    pub dependency: Option<String>,
}

pub trait ProvenanceSource {
    fn provenance(&self) -> Result<NotebookMeta, TrackError>;
}

impl ProvenanceSource for NotebookMeta {
    fn provenance(&self) -> Result<NotebookMeta, TrackError> {
        Ok(self.clone())
    }
}

/// Reads `nbproject` metadata from a Jupyter notebook on disk.
///
/// The id and dependency map live under `metadata.nbproject`; the title is
/// the first markdown cell that opens with a level-one heading.
#[derive(Debug, Clone)]
pub struct NotebookFile {
    path: PathBuf,
}

impl NotebookFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProvenanceSource for NotebookFile {
    fn provenance(&self) -> Result<NotebookMeta, TrackError> {
        let content = fs::read_to_string(&self.path).map_err(|err| {
            TrackError::Filesystem(format!("read {}: {err}", self.path.display()))
        })?;
        let notebook: Value =
            serde_json::from_str(&content).map_err(|err| TrackError::Provenance(err.to_string()))?;
        parse_notebook(&notebook)
    }
}

pub fn parse_notebook(notebook: &Value) -> Result<NotebookMeta, TrackError> {
    let nbproject = notebook
        .get("metadata")
        .and_then(|value| value.get("nbproject"))
        .ok_or_else(|| TrackError::Provenance("notebook has no nbproject metadata".to_string()))?;
    let id = nbproject
        .get("id")
        .and_then(|value| value.as_str())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| TrackError::Provenance("nbproject metadata has no id".to_string()))?;
    let dependency = nbproject.get("dependency").and_then(render_dependency);

    let title = notebook
        .get("cells")
        .and_then(|value| value.as_array())
        .and_then(|cells| cells.iter().find_map(title_from_cell));

    Ok(NotebookMeta {
        id,
        title,
        dependency,
    })
}

fn title_from_cell(cell: &Value) -> Option<String> {
    if cell.get("cell_type").and_then(|value| value.as_str()) != Some("markdown") {
        return None;
    }
    let source = match cell.get("source")? {
        Value::String(text) => text.clone(),
        Value::Array(lines) => lines
            .iter()
            .filter_map(|line| line.as_str())
            .collect::<String>(),
        _ => return None,
    };
    let first = source.lines().find(|line| !line.trim().is_empty())?;
    first
        .trim()
        .strip_prefix("# ")
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

fn render_dependency(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Object(map) if map.is_empty() => None,
        Value::Object(map) => {
            let pinned = map
                .iter()
                .map(|(name, version)| match version.as_str() {
                    Some(version) => format!("{name}=={version}"),
                    None => name.clone(),
                })
                .collect::<Vec<_>>();
            Some(pinned.join(", "))
        }
        other => Some(other.to_string()),
    }
}
