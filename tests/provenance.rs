use assert_matches::assert_matches;
use serde_json::json;

use biotrack::error::TrackError;
use biotrack::provenance::{NotebookFile, ProvenanceSource};

fn write_notebook(dir: &std::path::Path, notebook: serde_json::Value) -> NotebookFile {
    let path = dir.join("analysis.ipynb");
    std::fs::write(&path, serde_json::to_vec_pretty(&notebook).unwrap()).unwrap();
    NotebookFile::new(path)
}

#[test]
fn reads_nbproject_metadata() {
    let temp = tempfile::tempdir().unwrap();
    let notebook = write_notebook(
        temp.path(),
        json!({
            "metadata": {"nbproject": {
                "id": "KD3mJ8nXv1aL",
                "time_init": "2022-07-18T12:32:21.625107+00:00",
                "dependency": {"lamindb": "0.1.0"}
            }},
            "cells": [
                {"cell_type": "markdown", "source": "# Flow cytometry ingest\n\nLoads the FCS example."}
            ]
        }),
    );

    let meta = notebook.provenance().unwrap();
    assert_eq!(meta.id, "KD3mJ8nXv1aL");
    assert_eq!(meta.title.as_deref(), Some("Flow cytometry ingest"));
    assert_eq!(meta.dependency.as_deref(), Some("lamindb==0.1.0"));
}

#[test]
fn untitled_notebook_has_no_title() {
    let temp = tempfile::tempdir().unwrap();
    let notebook = write_notebook(
        temp.path(),
        json!({
            "metadata": {"nbproject": {"id": "abc123"}},
            "cells": [{"cell_type": "markdown", "source": ["Some notes"]}]
        }),
    );

    let meta = notebook.provenance().unwrap();
    assert_eq!(meta.title, None);
}

#[test]
fn notebook_without_nbproject_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let notebook = write_notebook(temp.path(), json!({"metadata": {}, "cells": []}));

    let err = notebook.provenance().unwrap_err();
    assert_matches!(err, TrackError::Provenance(_));
}

#[test]
fn missing_notebook_file() {
    let temp = tempfile::tempdir().unwrap();
    let notebook = NotebookFile::new(temp.path().join("gone.ipynb"));

    let err = notebook.provenance().unwrap_err();
    assert_matches!(err, TrackError::Filesystem(_));
}
