//! Builtin content catalogs (embedded in binary)

use tracing::debug;

use crate::error::LoadError;
use crate::loader::parse_document;
use crate::store::{AuthoredEntry, Source};

const BUILTIN_ONCOLOGY: &str = include_str!("../content/oncology.yml");
const BUILTIN_CANCER_SCREENING: &str = include_str!("../content/cancer-screening.yml");
const BUILTIN_EAR_DISORDERS: &str = include_str!("../content/ear-disorders.yml");

const CATALOGS: [(&str, &str); 3] = [
    ("oncology", BUILTIN_ONCOLOGY),
    ("cancer-screening", BUILTIN_CANCER_SCREENING),
    ("ear-disorders", BUILTIN_EAR_DISORDERS),
];

/// Names of all builtin catalogs, in load order
pub fn names() -> impl Iterator<Item = &'static str> {
    CATALOGS.iter().map(|(name, _)| *name)
}

/// Raw YAML of a builtin catalog
pub fn get(name: &str) -> Option<&'static str> {
    CATALOGS.iter().find(|(n, _)| *n == name).map(|(_, yaml)| *yaml)
}

/// Parse a builtin catalog into authored entries
pub fn load(name: &str) -> Result<Vec<AuthoredEntry>, LoadError> {
    debug!(%name, "catalog::load: called");
    let yaml = get(name).ok_or_else(|| LoadError::UnknownCatalog {
        name: name.to_string(),
        available: names().collect::<Vec<_>>().join(", "),
    })?;
    let entries = parse_document(yaml, &Source::Builtin(name.to_string()))?;
    debug!(%name, count = entries.len(), "catalog::load: complete");
    Ok(entries)
}
