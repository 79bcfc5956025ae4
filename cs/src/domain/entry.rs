//! The store's unit of content and its shared view

use serde::Serialize;

use super::educational::{ContentType, CrossReference, EducationalContent};
use super::oncology::{OncologyCategory, OncologyEntry};

/// Common read-only view over both record formats
pub trait ContentRecord {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn category(&self) -> Category;

    /// Text fields matched by substring search, in a stable order
    fn search_fields(&self) -> Vec<&str>;

    fn cross_references(&self) -> &[CrossReference] {
        &[]
    }
}

impl ContentRecord for OncologyEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Category {
        Category::Oncology(self.category)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.name.as_str(),
            self.name_es.as_str(),
            self.description.as_str(),
            self.category.as_str(),
        ];
        fields.extend(self.risk_factors.iter().map(String::as_str));
        fields.extend(self.clinical_features.iter().map(String::as_str));
        fields.extend(self.diagnostics.iter().map(String::as_str));
        fields
    }
}

impl ContentRecord for EducationalContent {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Category {
        Category::Content(self.content_type)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(name_es) = &self.name_es {
            fields.push(name_es);
        }
        fields.extend(self.alternate_names.iter().map(String::as_str));
        fields.push(self.content_type.as_str());
        for level in self.levels.values() {
            fields.push(&level.summary);
            fields.push(&level.explanation);
            fields.extend(level.key_terms.iter().map(|k| k.term.as_str()));
        }
        fields.extend(self.tags.topics.iter().map(String::as_str));
        fields.extend(self.tags.keywords.iter().map(String::as_str));
        fields
    }

    fn cross_references(&self) -> &[CrossReference] {
        &self.cross_references
    }
}

/// One record in the store, in either format
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", rename_all = "kebab-case")]
pub enum Entry {
    Oncology(OncologyEntry),
    Educational(EducationalContent),
}

impl Entry {
    pub fn as_oncology(&self) -> Option<&OncologyEntry> {
        match self {
            Self::Oncology(entry) => Some(entry),
            Self::Educational(_) => None,
        }
    }

    pub fn as_educational(&self) -> Option<&EducationalContent> {
        match self {
            Self::Educational(content) => Some(content),
            Self::Oncology(_) => None,
        }
    }

    fn record(&self) -> &dyn ContentRecord {
        match self {
            Self::Oncology(entry) => entry,
            Self::Educational(content) => content,
        }
    }
}

impl ContentRecord for Entry {
    fn id(&self) -> &str {
        self.record().id()
    }

    fn name(&self) -> &str {
        self.record().name()
    }

    fn category(&self) -> Category {
        self.record().category()
    }

    fn search_fields(&self) -> Vec<&str> {
        self.record().search_fields()
    }

    fn cross_references(&self) -> &[CrossReference] {
        self.record().cross_references()
    }
}

impl From<OncologyEntry> for Entry {
    fn from(entry: OncologyEntry) -> Self {
        Self::Oncology(entry)
    }
}

impl From<EducationalContent> for Entry {
    fn from(content: EducationalContent) -> Self {
        Self::Educational(content)
    }
}

/// Category an entry is filed under
///
/// Oncology entries carry an [`OncologyCategory`]; educational records use
/// their [`ContentType`]. The two name sets do not overlap. Parsing accepts
/// only the exact kebab-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Category {
    Oncology(OncologyCategory),
    Content(ContentType),
}

impl Category {
    /// Every category name, oncology first
    pub fn all() -> Vec<Category> {
        OncologyCategory::ALL
            .into_iter()
            .map(Self::Oncology)
            .chain(ContentType::ALL.into_iter().map(Self::Content))
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oncology(c) => c.as_str(),
            Self::Content(t) => t.as_str(),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(category) = s.parse::<OncologyCategory>() {
            return Ok(Self::Oncology(category));
        }
        if let Ok(content_type) = s.parse::<ContentType>() {
            return Ok(Self::Content(content_type));
        }
        let valid: Vec<&str> = Self::all().iter().map(|c| c.as_str()).collect();
        Err(format!("Unknown category: {} (expected one of: {})", s, valid.join(", ")))
    }
}

impl From<OncologyCategory> for Category {
    fn from(category: OncologyCategory) -> Self {
        Self::Oncology(category)
    }
}

impl From<ContentType> for Category {
    fn from(content_type: ContentType) -> Self {
        Self::Content(content_type)
    }
}
