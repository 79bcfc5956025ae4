//! Oncology database entries
//!
//! The flat oncology format: one record per tumor, treatment modality,
//! screening topic, supportive-care topic, or paraneoplastic syndrome.

use serde::{Deserialize, Serialize};

/// Category of an oncology entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OncologyCategory {
    SolidTumor,
    HematologicMalignancy,
    TreatmentModality,
    Screening,
    SupportiveCare,
    Paraneoplastic,
}

impl OncologyCategory {
    pub const ALL: [OncologyCategory; 6] = [
        Self::SolidTumor,
        Self::HematologicMalignancy,
        Self::TreatmentModality,
        Self::Screening,
        Self::SupportiveCare,
        Self::Paraneoplastic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SolidTumor => "solid-tumor",
            Self::HematologicMalignancy => "hematologic-malignancy",
            Self::TreatmentModality => "treatment-modality",
            Self::Screening => "screening",
            Self::SupportiveCare => "supportive-care",
            Self::Paraneoplastic => "paraneoplastic",
        }
    }
}

impl std::fmt::Display for OncologyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OncologyCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown oncology category: {}", s))
    }
}

/// A single oncology database record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OncologyEntry {
    pub id: String,
    pub name: String,
    /// Spanish display name
    pub name_es: String,
    pub category: OncologyCategory,
    /// ICD-11 code as authored (e.g. "2C25.1")
    pub icd11: String,
    pub description: String,
    pub epidemiology: String,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub clinical_features: Vec<String>,
    pub staging: String,
    #[serde(default)]
    pub diagnostics: Vec<String>,
    pub treatment: String,
    pub prognosis: String,
    pub patient_explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(OncologyCategory::SolidTumor.to_string(), "solid-tumor");
        assert_eq!(
            OncologyCategory::HematologicMalignancy.to_string(),
            "hematologic-malignancy"
        );
        assert_eq!(OncologyCategory::Paraneoplastic.to_string(), "paraneoplastic");
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            "supportive-care".parse::<OncologyCategory>().unwrap(),
            OncologyCategory::SupportiveCare
        );
        assert!("SCREENING".parse::<OncologyCategory>().is_err());
        assert!("solid_tumor".parse::<OncologyCategory>().is_err());
    }

    #[test]
    fn test_category_serde_matches_display() {
        for category in OncologyCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category));
        }
    }

    #[test]
    fn test_entry_deserialize_camel_case() {
        let yaml = r#"
id: test-tumor
name: Test Tumor
nameEs: Tumor de prueba
category: solid-tumor
icd11: 2C25
description: A tumor used in tests.
epidemiology: Rare.
riskFactors:
  - Smoking
clinicalFeatures:
  - Cough
staging: TNM
diagnostics:
  - CT chest
treatment: Surgery
prognosis: Good
patientExplanation: Nothing to worry about.
"#;
        let entry: OncologyEntry = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(entry.id, "test-tumor");
        assert_eq!(entry.name_es, "Tumor de prueba");
        assert_eq!(entry.category, OncologyCategory::SolidTumor);
        assert_eq!(entry.risk_factors, vec!["Smoking"]);
        assert_eq!(entry.patient_explanation, "Nothing to worry about.");
    }

    #[test]
    fn test_entry_unknown_category_rejected() {
        let yaml = r#"
id: x
name: X
nameEs: X
category: benign
icd11: 2C25
description: d
epidemiology: e
staging: s
treatment: t
prognosis: p
patientExplanation: pe
"#;
        assert!(serde_yaml::from_str::<OncologyEntry>(yaml).is_err());
    }
}
