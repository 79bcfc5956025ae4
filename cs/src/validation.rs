//! Load-time content validation
//!
//! Checks run over a fully built store, so cross-references can be resolved
//! against every loaded id. Errors make a store unusable; warnings are
//! reported and only fail a load when `warnings-as-errors` is set.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::config::ValidationConfig;
use crate::domain::{ContentRecord, EducationalContent, Entry, MAX_LEVEL, MIN_LEVEL, OncologyEntry};
use crate::error::LoadError;
use crate::store::{ContentStore, Source};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(todo|fixme|placeholder)\b").expect("placeholder pattern is valid"));

/// Spanish text only flags upper-case markers; "todo" is an ordinary word there
static PLACEHOLDER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(TODO|FIXME|PLACEHOLDER)\b").expect("marker pattern is valid"));

/// ICD-11 stem code with optional extension, e.g. `2C25` or `2C25.1`
static ICD11_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Z][A-Z][0-9][0-9A-Z](\.[0-9A-Z]{1,2})?$").expect("ICD-11 pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// What a validation issue is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    EmptyField,
    LevelOutOfRange,
    LevelMismatch,
    MissingLevel,
    EmptyKeyTerm,
    MissingKeyTerms,
    Placeholder,
    InvalidDate,
    InvalidVersion,
    MissingTranslation,
    Icd11Format,
    DanglingReference,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::EmptyField => "empty-field",
            Self::LevelOutOfRange => "level-out-of-range",
            Self::LevelMismatch => "level-mismatch",
            Self::MissingLevel => "missing-level",
            Self::EmptyKeyTerm => "empty-key-term",
            Self::MissingKeyTerms => "missing-key-terms",
            Self::Placeholder => "placeholder",
            Self::InvalidDate => "invalid-date",
            Self::InvalidVersion => "invalid-version",
            Self::MissingTranslation => "missing-translation",
            Self::Icd11Format => "icd11-format",
            Self::DanglingReference => "dangling-reference",
        };
        write!(f, "{}", name)
    }
}

/// A single finding against one entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub entry_id: String,
    pub source: Source,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {} ({}): {}",
            self.severity, self.kind, self.entry_id, self.source, self.message
        )
    }
}

/// All issues found in a store, in store order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Fail when the report has errors, or any issue under `warnings_as_errors`
    pub fn check(&self, warnings_as_errors: bool) -> Result<(), LoadError> {
        let failing = if warnings_as_errors {
            self.issues.first()
        } else {
            self.errors().next()
        };
        match failing {
            Some(issue) => Err(LoadError::Validation {
                errors: self.error_count(),
                warnings: self.warning_count(),
                first: issue.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Validate every entry in the store
pub fn validate(store: &ContentStore, config: &ValidationConfig) -> ValidationReport {
    debug!(count = store.len(), ?config, "validate: called");
    let mut report = ValidationReport::default();

    for (entry, source) in store.iter_with_sources() {
        let mut checker = EntryChecker {
            report: &mut report,
            entry_id: entry.id(),
            source,
        };
        match entry {
            Entry::Oncology(oncology) => checker.check_oncology(oncology),
            Entry::Educational(content) => checker.check_educational(content),
        }
        if config.check_cross_references {
            checker.check_cross_references(entry, store);
        }
    }

    debug!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validate: complete"
    );
    report
}

struct EntryChecker<'r, 'e> {
    report: &'r mut ValidationReport,
    entry_id: &'e str,
    source: &'e Source,
}

impl EntryChecker<'_, '_> {
    fn push(&mut self, severity: Severity, kind: IssueKind, message: String) {
        self.report.issues.push(ValidationIssue {
            severity,
            kind,
            entry_id: self.entry_id.to_string(),
            source: self.source.clone(),
            message,
        });
    }

    fn error(&mut self, kind: IssueKind, message: String) {
        self.push(Severity::Error, kind, message);
    }

    fn warning(&mut self, kind: IssueKind, message: String) {
        self.push(Severity::Warning, kind, message);
    }

    fn require_text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.error(IssueKind::EmptyField, format!("{} is empty", field));
        } else if PLACEHOLDER.is_match(value) {
            self.error(IssueKind::Placeholder, format!("{} contains placeholder text", field));
        }
    }

    fn reject_placeholder(&mut self, field: &str, value: &str) {
        if PLACEHOLDER.is_match(value) {
            self.error(IssueKind::Placeholder, format!("{} contains placeholder text", field));
        }
    }

    fn check_common(&mut self, name: &str, name_es: Option<&str>) {
        if self.entry_id.trim().is_empty() {
            self.error(IssueKind::EmptyField, "id is empty".to_string());
        }
        self.require_text("name", name);
        match name_es {
            Some(es) if !es.trim().is_empty() => {
                if PLACEHOLDER_MARKER.is_match(es) {
                    self.error(IssueKind::Placeholder, "nameEs contains placeholder text".to_string());
                }
            }
            _ => self.warning(IssueKind::MissingTranslation, "nameEs is missing".to_string()),
        }
    }

    fn check_oncology(&mut self, entry: &OncologyEntry) {
        self.check_common(&entry.name, Some(entry.name_es.as_str()));
        self.require_text("description", &entry.description);
        self.reject_placeholder("patientExplanation", &entry.patient_explanation);
        if !ICD11_CODE.is_match(&entry.icd11) {
            self.warning(
                IssueKind::Icd11Format,
                format!("icd11 '{}' is not a valid ICD-11 code", entry.icd11),
            );
        }
    }

    fn check_educational(&mut self, content: &EducationalContent) {
        self.check_common(&content.name, content.name_es.as_deref());

        for (&key, level) in &content.levels {
            if !(MIN_LEVEL..=MAX_LEVEL).contains(&key) {
                self.error(
                    IssueKind::LevelOutOfRange,
                    format!("level key {} is outside {}..={}", key, MIN_LEVEL, MAX_LEVEL),
                );
            }
            if level.level != key {
                self.error(
                    IssueKind::LevelMismatch,
                    format!("level {} is stored under key {}", level.level, key),
                );
            }
            self.require_text(&format!("levels.{}.summary", key), &level.summary);
            self.require_text(&format!("levels.{}.explanation", key), &level.explanation);
            if let Some(notes) = &level.clinical_notes {
                self.reject_placeholder(&format!("levels.{}.clinicalNotes", key), notes);
            }
            if level.key_terms.is_empty() {
                self.warning(IssueKind::MissingKeyTerms, format!("level {} has no key terms", key));
            }
            for (i, term) in level.key_terms.iter().enumerate() {
                if term.term.trim().is_empty() || term.definition.trim().is_empty() {
                    self.error(
                        IssueKind::EmptyKeyTerm,
                        format!("levels.{}.keyTerms[{}] has an empty term or definition", key, i),
                    );
                } else {
                    self.reject_placeholder(&format!("levels.{}.keyTerms[{}]", key, i), &term.term);
                    self.reject_placeholder(&format!("levels.{}.keyTerms[{}]", key, i), &term.definition);
                }
            }
        }

        let missing = content.missing_levels();
        if !missing.is_empty() {
            let missing: Vec<String> = missing.iter().map(u8::to_string).collect();
            self.warning(IssueKind::MissingLevel, format!("missing levels: {}", missing.join(", ")));
        }

        for (field, value) in [("createdAt", &content.created_at), ("updatedAt", &content.updated_at)] {
            if !is_valid_date(value) {
                self.error(
                    IssueKind::InvalidDate,
                    format!("{} '{}' is not YYYY-MM-DD or RFC 3339", field, value),
                );
            }
        }

        if content.version < 1 {
            self.error(IssueKind::InvalidVersion, "version must be at least 1".to_string());
        }
    }

    fn check_cross_references(&mut self, entry: &Entry, store: &ContentStore) {
        for reference in entry.cross_references() {
            if !store.contains(&reference.target_id) {
                self.warning(
                    IssueKind::DanglingReference,
                    format!("cross-reference target '{}' does not exist", reference.target_id),
                );
            }
        }
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn is_valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() || DateTime::parse_from_rfc3339(value).is_ok()
}
