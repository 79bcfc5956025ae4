//! Multi-level educational content
//!
//! Each record carries up to five depth tiers of explanation, from
//! patient-friendly (level 1) to expert (level 5), plus key terms,
//! citations, cross-references and classification tags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lowest content depth tier
pub const MIN_LEVEL: u8 = 1;

/// Highest content depth tier
pub const MAX_LEVEL: u8 = 5;

/// Kind of educational record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Structure,
    System,
    Pathway,
    Process,
    Condition,
    Concept,
    Topic,
}

impl ContentType {
    pub const ALL: [ContentType; 7] = [
        Self::Structure,
        Self::System,
        Self::Pathway,
        Self::Process,
        Self::Condition,
        Self::Concept,
        Self::Topic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::System => "system",
            Self::Pathway => "pathway",
            Self::Process => "process",
            Self::Condition => "condition",
            Self::Concept => "concept",
            Self::Topic => "topic",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown content type: {}", s))
    }
}

/// Publication status of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Review,
    Published,
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Review => write!(f, "review"),
            Self::Published => write!(f, "published"),
        }
    }
}

/// How a cross-reference target relates to its source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relationship {
    Parent,
    Child,
    Sibling,
    Related,
    SeeAlso,
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parent => write!(f, "parent"),
            Self::Child => write!(f, "child"),
            Self::Sibling => write!(f, "sibling"),
            Self::Related => write!(f, "related"),
            Self::SeeAlso => write!(f, "see-also"),
        }
    }
}

/// Clinical importance of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClinicalRelevance {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for ClinicalRelevance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// A vocabulary item introduced at some level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyTerm {
    pub term: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
}

/// One depth tier of an educational record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelContent {
    /// Must equal the key this tier is stored under
    pub level: u8,
    pub summary: String,
    /// Marked-up body text, kept verbatim
    pub explanation: String,
    #[serde(default)]
    pub key_terms: Vec<KeyTerm>,
    #[serde(default)]
    pub analogies: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub patient_counseling_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    #[serde(rename = "type")]
    pub citation_type: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A link from one record to another by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReference {
    pub target_id: String,
    pub target_type: ContentType,
    pub relationship: Relationship,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExamRelevance {
    #[serde(default)]
    pub usmle: bool,
    #[serde(default)]
    pub nbme: bool,
    /// Shelf exams (e.g. "pediatrics", "surgery")
    #[serde(default)]
    pub shelf: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTags {
    #[serde(default)]
    pub systems: Vec<String>,
    #[serde(default)]
    pub structures: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub clinical_relevance: ClinicalRelevance,
    #[serde(default)]
    pub exam_relevance: ExamRelevance,
}

impl ContentTags {
    /// All free-form tag values, in field order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.systems
            .iter()
            .chain(&self.structures)
            .chain(&self.topics)
            .chain(&self.keywords)
            .map(String::as_str)
    }
}

/// A rich educational record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationalContent {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_es: Option<String>,
    #[serde(default)]
    pub alternate_names: Vec<String>,
    /// Human Phenotype Ontology id (e.g. "HP:0000388")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hpo_id: Option<String>,
    pub levels: BTreeMap<u8, LevelContent>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub cross_references: Vec<CrossReference>,
    pub tags: ContentTags,
    /// Authored as `YYYY-MM-DD` or RFC 3339
    pub created_at: String,
    pub updated_at: String,
    pub version: u32,
    pub status: ContentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<String>>,
}

impl EducationalContent {
    pub fn level(&self, level: u8) -> Option<&LevelContent> {
        self.levels.get(&level)
    }

    /// Levels in 1..=5 with no content
    pub fn missing_levels(&self) -> Vec<u8> {
        (MIN_LEVEL..=MAX_LEVEL)
            .filter(|l| !self.levels.contains_key(l))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
id: sample-topic
type: topic
name: Sample Topic
alternateNames:
  - Example Topic
levels:
  1:
    level: 1
    summary: Short summary.
    explanation: Longer **explanation**.
    keyTerms:
      - term: sample
        definition: A small part of a whole
  3:
    level: 3
    summary: Deeper summary.
    explanation: Deeper explanation.
crossReferences:
  - targetId: other-topic
    targetType: topic
    relationship: see-also
tags:
  systems: [oncology]
  topics: [screening]
  clinicalRelevance: high
  examRelevance:
    usmle: true
    shelf: [medicine]
createdAt: '2025-01-30'
updatedAt: '2025-01-30'
version: 1
status: published
"#;

    #[test]
    fn test_content_deserialize() {
        let content: EducationalContent = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(content.id, "sample-topic");
        assert_eq!(content.content_type, ContentType::Topic);
        assert_eq!(content.name_es, None);
        assert_eq!(content.levels.len(), 2);
        assert_eq!(content.level(1).unwrap().key_terms[0].term, "sample");
        assert_eq!(content.cross_references[0].relationship, Relationship::SeeAlso);
        assert_eq!(content.tags.clinical_relevance, ClinicalRelevance::High);
        assert!(content.tags.exam_relevance.usmle);
        assert!(!content.tags.exam_relevance.nbme);
        assert_eq!(content.status, ContentStatus::Published);
    }

    #[test]
    fn test_missing_levels() {
        let content: EducationalContent = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(content.missing_levels(), vec![2, 4, 5]);
        assert!(content.level(2).is_none());
    }

    #[test]
    fn test_tag_values_in_field_order() {
        let content: EducationalContent = serde_yaml::from_str(SAMPLE).unwrap();
        let values: Vec<&str> = content.tags.values().collect();
        assert_eq!(values, vec!["oncology", "screening"]);
    }

    #[test]
    fn test_unknown_content_type_rejected() {
        let yaml = SAMPLE.replace("type: topic\nname", "type: lecture\nname");
        assert!(serde_yaml::from_str::<EducationalContent>(&yaml).is_err());
    }

    #[test]
    fn test_content_type_parse() {
        assert_eq!("condition".parse::<ContentType>().unwrap(), ContentType::Condition);
        assert!("Condition".parse::<ContentType>().is_err());
        assert!("disease".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_relationship_display() {
        assert_eq!(Relationship::SeeAlso.to_string(), "see-also");
        assert_eq!(Relationship::Sibling.to_string(), "sibling");
    }

    #[test]
    fn test_clinical_relevance_ordering() {
        assert!(ClinicalRelevance::Low < ClinicalRelevance::Medium);
        assert!(ClinicalRelevance::High < ClinicalRelevance::Critical);
    }
}
