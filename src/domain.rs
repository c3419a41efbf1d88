use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::TrackError;

/// Where an interface record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceType {
    Nbproject,
    Other,
}

impl InterfaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceType::Nbproject => "nbproject",
            InterfaceType::Other => "other",
        }
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InterfaceType {
    type Err = TrackError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "nbproject" => Ok(InterfaceType::Nbproject),
            "other" => Ok(InterfaceType::Other),
            _ => Err(TrackError::InvalidInterfaceType(value.to_string())),
        }
    }
}

/// Column an ontology table is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdField {
    CommonName,
    EnsemblGeneId,
    UniprotkbId,
    Name,
}

impl IdField {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdField::CommonName => "common_name",
            IdField::EnsemblGeneId => "ensembl_gene_id",
            IdField::UniprotkbId => "uniprotkb_id",
            IdField::Name => "name",
        }
    }
}

impl fmt::Display for IdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IdField {
    type Err = TrackError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "common_name" => Ok(IdField::CommonName),
            "ensembl_gene_id" => Ok(IdField::EnsemblGeneId),
            "uniprotkb_id" => Ok(IdField::UniprotkbId),
            "name" => Ok(IdField::Name),
            _ => Err(TrackError::InvalidIdField(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Table {
    Users,
    Interfaces,
    Files,
}
