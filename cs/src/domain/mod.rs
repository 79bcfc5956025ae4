//! Content data model

mod educational;
mod entry;
mod oncology;

pub use educational::{
    Citation, ClinicalRelevance, ContentStatus, ContentTags, ContentType, CrossReference, EducationalContent,
    ExamRelevance, KeyTerm, LevelContent, MAX_LEVEL, MIN_LEVEL, MediaItem, Relationship,
};
pub use entry::{Category, ContentRecord, Entry};
pub use oncology::{OncologyCategory, OncologyEntry};
