//! Ontology entity tables with the defaults this tracker uses.
//!
//! The lookups themselves belong to the ontology service; these types only
//! pin which species and identifier column each table is addressed by.

use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;
use serde::Serialize;

use crate::domain::IdField;
use crate::error::TrackError;

pub const DEFAULT_SPECIES: &str = "human";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDefaults {
    pub entity: &'static str,
    pub species: Option<String>,
    pub id: IdField,
}

pub trait OntologyTable {
    fn entity(&self) -> &'static str;
    fn species(&self) -> Option<&str>;
    fn id_field(&self) -> IdField;

    fn defaults(&self) -> EntityDefaults {
        EntityDefaults {
            entity: self.entity(),
            species: self.species().map(str::to_string),
            id: self.id_field(),
        }
    }

    fn validate_id(&self, value: &str) -> Result<(), TrackError> {
        validate_identifier(self.id_field(), value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Species {
    pub id: IdField,
}

impl Species {
    pub fn new(id: IdField) -> Self {
        Self { id }
    }
}

impl Default for Species {
    fn default() -> Self {
        Self::new(IdField::CommonName)
    }
}

impl OntologyTable for Species {
    fn entity(&self) -> &'static str {
        "species"
    }

    fn species(&self) -> Option<&str> {
        None
    }

    fn id_field(&self) -> IdField {
        self.id
    }
}

/// Genes, keyed by Ensembl gene id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gene {
    pub species: String,
    pub id: IdField,
}

impl Gene {
    pub fn new(species: impl Into<String>, id: IdField) -> Self {
        Self {
            species: species.into(),
            id,
        }
    }
}

impl Default for Gene {
    fn default() -> Self {
        Self::new(DEFAULT_SPECIES, IdField::EnsemblGeneId)
    }
}

impl OntologyTable for Gene {
    fn entity(&self) -> &'static str {
        "gene"
    }

    fn species(&self) -> Option<&str> {
        Some(self.species.as_str())
    }

    fn id_field(&self) -> IdField {
        self.id
    }
}

/// Proteins, keyed by UniProtKB accession.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protein {
    pub species: String,
    pub id: IdField,
}

impl Protein {
    pub fn new(species: impl Into<String>, id: IdField) -> Self {
        Self {
            species: species.into(),
            id,
        }
    }
}

impl Default for Protein {
    fn default() -> Self {
        Self::new(DEFAULT_SPECIES, IdField::UniprotkbId)
    }
}

impl OntologyTable for Protein {
    fn entity(&self) -> &'static str {
        "protein"
    }

    fn species(&self) -> Option<&str> {
        Some(self.species.as_str())
    }

    fn id_field(&self) -> IdField {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMarker {
    pub species: String,
    pub id: IdField,
}

impl CellMarker {
    pub fn new(species: impl Into<String>, id: IdField) -> Self {
        Self {
            species: species.into(),
            id,
        }
    }
}

impl Default for CellMarker {
    fn default() -> Self {
        Self::new(DEFAULT_SPECIES, IdField::Name)
    }
}

impl OntologyTable for CellMarker {
    fn entity(&self) -> &'static str {
        "cell_marker"
    }

    fn species(&self) -> Option<&str> {
        Some(self.species.as_str())
    }

    fn id_field(&self) -> IdField {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    Species,
    Gene,
    Protein,
    CellMarker,
}

impl Entity {
    /// The table with its default species and id field.
    pub fn table(&self) -> Box<dyn OntologyTable> {
        match self {
            Entity::Species => Box::new(Species::default()),
            Entity::Gene => Box::new(Gene::default()),
            Entity::Protein => Box::new(Protein::default()),
            Entity::CellMarker => Box::new(CellMarker::default()),
        }
    }
}

static ENSEMBL_GENE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ENS[A-Z]*G\d{11}(\.\d+)?$").unwrap());
static UNIPROTKB_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([OPQ][0-9][A-Z0-9]{3}[0-9]|[A-NR-Z][0-9]([A-Z][A-Z0-9]{2}[0-9]){1,2})(-\d+)?$",
    )
    .unwrap()
});
static FREE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w[\w .+\-/()']*$").unwrap());

fn id_pattern(field: IdField) -> &'static Regex {
    match field {
        IdField::EnsemblGeneId => &*ENSEMBL_GENE_ID,
        IdField::UniprotkbId => &*UNIPROTKB_ID,
        IdField::CommonName | IdField::Name => &*FREE_NAME,
    }
}

pub fn validate_identifier(field: IdField, value: &str) -> Result<(), TrackError> {
    let trimmed = value.trim();
    if trimmed.len() != value.len() || !id_pattern(field).is_match(trimmed) {
        return Err(TrackError::InvalidIdentifier {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gene_ids_follow_ensembl() {
        let gene = Gene::default();
        assert!(gene.validate_id("ENSG00000139618").is_ok());
        assert!(gene.validate_id("ENSMUSG00000017167.3").is_ok());
        assert!(gene.validate_id("BRCA2").is_err());
    }

    #[test]
    fn entity_names_follow_cli_spelling() {
        assert_eq!(
            Entity::from_str("cell-marker", false).unwrap(),
            Entity::CellMarker
        );
        assert!(Entity::from_str("tissue", false).is_err());
        assert_eq!(Entity::CellMarker.table().entity(), "cell_marker");
    }

    #[test]
    fn repeated_validation_reuses_patterns() {
        let protein = Protein::default();
        for _ in 0..3 {
            assert!(protein.validate_id("P69905").is_ok());
        }
        assert!(std::ptr::eq(
            id_pattern(IdField::Name),
            id_pattern(IdField::CommonName)
        ));
    }
}
