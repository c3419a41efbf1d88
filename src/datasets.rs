use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use tempfile::Builder;
use tracing::debug;

use crate::error::TrackError;
use crate::fs_util::extract_zip;

/// Fetches a URL into a local file.
pub trait Retriever {
    fn retrieve(&self, url: &str, destination: &Path) -> Result<(), TrackError>;
}

#[derive(Clone)]
pub struct HttpRetriever {
    client: Client,
}

impl HttpRetriever {
    pub fn new() -> Result<Self, TrackError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("biotrack/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| TrackError::TransferHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(None::<Duration>)
            .build()
            .map_err(|err| TrackError::TransferHttp(err.to_string()))?;
        Ok(Self { client })
    }
}

impl Retriever for HttpRetriever {
    fn retrieve(&self, url: &str, destination: &Path) -> Result<(), TrackError> {
        debug!(url, destination = %destination.display(), "downloading");
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|err| TrackError::TransferHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "download failed".to_string());
            return Err(TrackError::TransferStatus { status, message });
        }
        let parent = destination
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(|err| TrackError::Filesystem(err.to_string()))?;
        let mut partial = Builder::new()
            .prefix(".biotrack-download")
            .tempfile_in(parent)
            .map_err(|err| TrackError::Filesystem(err.to_string()))?;
        std::io::copy(&mut response, partial.as_file_mut())
            .map_err(|err| TrackError::TransferHttp(err.to_string()))?;
        partial
            .persist(destination)
            .map_err(|err| TrackError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    FileFcs,
    FileJpgParadisi05,
    DirScrnaseqCellranger,
    AnndataMouseScLymphNode,
    Schmidt22CrispraGwsIfng,
    Schmidt22Perturbseq,
    DirScrnaseqCellrangerSchmidt22,
}

impl Dataset {
    pub const ALL: [Dataset; 7] = [
        Dataset::FileFcs,
        Dataset::FileJpgParadisi05,
        Dataset::DirScrnaseqCellranger,
        Dataset::AnndataMouseScLymphNode,
        Dataset::Schmidt22CrispraGwsIfng,
        Dataset::Schmidt22Perturbseq,
        Dataset::DirScrnaseqCellrangerSchmidt22,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dataset::FileFcs => "file_fcs",
            Dataset::FileJpgParadisi05 => "file_jpg_paradisi05",
            Dataset::DirScrnaseqCellranger => "dir_scrnaseq_cellranger",
            Dataset::AnndataMouseScLymphNode => "anndata_mouse_sc_lymph_node",
            Dataset::Schmidt22CrispraGwsIfng => "schmidt22_crispra_gws_ifng",
            Dataset::Schmidt22Perturbseq => "schmidt22_perturbseq",
            Dataset::DirScrnaseqCellrangerSchmidt22 => "dir_scrnaseq_cellranger_schmidt22",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Dataset::FileFcs => "https://lamindb-test.s3.amazonaws.com/example.fcs",
            Dataset::FileJpgParadisi05 => {
                "https://upload.wikimedia.org/wikipedia/commons/2/28/Laminopathic_nuclei.jpg"
            }
            Dataset::DirScrnaseqCellranger => {
                "https://lamindb-test.s3.amazonaws.com/cellranger_run_001.zip"
            }
            Dataset::AnndataMouseScLymphNode => {
                "https://lamindb-test.s3.amazonaws.com/E-MTAB-8414.h5ad"
            }
            Dataset::Schmidt22CrispraGwsIfng => {
                "https://lamindb-test.s3.amazonaws.com/schmidt22-crispra-gws-IFNG.csv"
            }
            Dataset::Schmidt22Perturbseq => {
                "https://lamindb-test.s3.amazonaws.com/schmidt22_perturbseq.h5ad"
            }
            Dataset::DirScrnaseqCellrangerSchmidt22 => {
                "https://lamindb-test.s3.amazonaws.com/scrnaseq-cellranger-schmidt22.zip"
            }
        }
    }

    /// Local filename the download is written to.
    pub fn filename(&self) -> &'static str {
        match self {
            Dataset::FileFcs => "example.fcs",
            Dataset::FileJpgParadisi05 => "paradisi05_laminopathic_nuclei.jpg",
            Dataset::DirScrnaseqCellranger => "cellranger_run_001.zip",
            Dataset::AnndataMouseScLymphNode => "mouse_sc_lymph_node.h5ad",
            Dataset::Schmidt22CrispraGwsIfng => "schmidt22-crispra-gws-IFNG.csv",
            Dataset::Schmidt22Perturbseq => "schmidt22_perturbseq.h5ad",
            Dataset::DirScrnaseqCellrangerSchmidt22 => "scrnaseq-cellranger-schmidt22.zip",
        }
    }

    /// Directory the archive unpacks into, for zipped datasets.
    pub fn extracted_dir(&self) -> Option<&'static str> {
        match self {
            Dataset::DirScrnaseqCellranger => Some("cellranger_run_001"),
            Dataset::DirScrnaseqCellrangerSchmidt22 => Some("scrnaseq-cellranger-schmidt22"),
            _ => None,
        }
    }
}

impl std::str::FromStr for Dataset {
    type Err = TrackError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        Dataset::ALL
            .into_iter()
            .find(|dataset| dataset.name() == normalized)
            .ok_or_else(|| TrackError::UnknownDataset(value.to_string()))
    }
}

/// Example datasets written into a fixed directory.
pub struct Datasets<R: Retriever> {
    retriever: R,
    root: PathBuf,
}

impl Datasets<HttpRetriever> {
    /// Download into the current working directory.
    pub fn in_current_dir() -> Result<Self, TrackError> {
        let root =
            std::env::current_dir().map_err(|err| TrackError::Filesystem(err.to_string()))?;
        Ok(Self::new(HttpRetriever::new()?, root))
    }
}

impl<R: Retriever> Datasets<R> {
    pub fn new(retriever: R, root: impl Into<PathBuf>) -> Self {
        Self {
            retriever,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fetch(&self, dataset: Dataset) -> Result<PathBuf, TrackError> {
        let destination = self.root.join(dataset.filename());
        self.retriever.retrieve(dataset.url(), &destination)?;
        match dataset.extracted_dir() {
            Some(dir) => {
                let extracted = extract_zip(&destination, &self.root)?;
                debug!(dataset = dataset.name(), files = extracted.len(), "extracted archive");
                Ok(self.root.join(dir))
            }
            None => Ok(destination),
        }
    }

    pub fn file_fcs(&self) -> Result<PathBuf, TrackError> {
        self.fetch(Dataset::FileFcs)
    }

    pub fn file_jpg_paradisi05(&self) -> Result<PathBuf, TrackError> {
        self.fetch(Dataset::FileJpgParadisi05)
    }

    pub fn dir_scrnaseq_cellranger(&self) -> Result<PathBuf, TrackError> {
        self.fetch(Dataset::DirScrnaseqCellranger)
    }

    pub fn anndata_mouse_sc_lymph_node(&self) -> Result<PathBuf, TrackError> {
        self.fetch(Dataset::AnndataMouseScLymphNode)
    }

    pub fn schmidt22_crispra_gws_ifng(&self) -> Result<PathBuf, TrackError> {
        self.fetch(Dataset::Schmidt22CrispraGwsIfng)
    }

    pub fn schmidt22_perturbseq(&self) -> Result<PathBuf, TrackError> {
        self.fetch(Dataset::Schmidt22Perturbseq)
    }

    pub fn dir_scrnaseq_cellranger_schmidt22(&self) -> Result<PathBuf, TrackError> {
        self.fetch(Dataset::DirScrnaseqCellrangerSchmidt22)
    }
}
