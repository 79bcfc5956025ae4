//! Read-only queries over a content store

use tracing::debug;

use crate::domain::{Category, ContentRecord, CrossReference, Entry, LevelContent};
use crate::store::ContentStore;

/// A cross-reference with its target looked up in the store
#[derive(Debug, Clone, Copy)]
pub struct ResolvedReference<'a> {
    pub reference: &'a CrossReference,
    /// `None` when the target id is not in the store
    pub target: Option<&'a Entry>,
}

/// Lookup, search and filter operations over a borrowed store
///
/// Every operation is a pure function of the store: repeated calls with the
/// same input return the same entries in the same order.
#[derive(Debug, Clone, Copy)]
pub struct QueryService<'a> {
    store: &'a ContentStore,
}

impl<'a> QueryService<'a> {
    pub fn new(store: &'a ContentStore) -> Self {
        Self { store }
    }

    /// Exact, case-sensitive lookup by id
    pub fn get_entry(&self, id: &str) -> Option<&'a Entry> {
        debug!(%id, "get_entry: called");
        let result = self.store.get(id);
        debug!(%id, found = result.is_some(), "get_entry: returning");
        result
    }

    /// Case-insensitive substring search over each entry's searchable fields
    ///
    /// Results are in store order. The empty query matches every entry.
    pub fn search(&self, query: &str) -> Vec<&'a Entry> {
        debug!(%query, "search: called");
        let needle = query.to_lowercase();
        let results: Vec<&'a Entry> = if needle.is_empty() {
            self.store.iter().collect()
        } else {
            self.store
                .iter()
                .filter(|entry| {
                    entry
                        .search_fields()
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
                })
                .collect()
        };
        debug!(%query, count = results.len(), "search: complete");
        results
    }

    /// Entries whose category equals `category`, in store order
    pub fn filter_by_category(&self, category: Category) -> Vec<&'a Entry> {
        debug!(%category, "filter_by_category: called");
        let results: Vec<&'a Entry> = self.store.iter().filter(|e| e.category() == category).collect();
        debug!(%category, count = results.len(), "filter_by_category: complete");
        results
    }

    /// Number of entries in the store
    pub fn count(&self) -> usize {
        self.store.len()
    }

    /// Educational entries carrying `tag` as a system, structure, topic or keyword
    pub fn filter_by_tag(&self, tag: &str) -> Vec<&'a Entry> {
        debug!(%tag, "filter_by_tag: called");
        self.store
            .iter()
            .filter(|entry| {
                entry
                    .as_educational()
                    .is_some_and(|c| c.tags.values().any(|v| v.eq_ignore_ascii_case(tag)))
            })
            .collect()
    }

    /// Cross-references of `id`, each paired with its target when present
    pub fn related(&self, id: &str) -> Vec<ResolvedReference<'a>> {
        debug!(%id, "related: called");
        let Some(entry) = self.store.get(id) else {
            debug!(%id, "related: entry not found");
            return Vec::new();
        };
        entry
            .cross_references()
            .iter()
            .map(|reference| ResolvedReference {
                reference,
                target: self.store.get(&reference.target_id),
            })
            .collect()
    }

    /// One depth tier of an educational entry
    pub fn level(&self, id: &str, level: u8) -> Option<&'a LevelContent> {
        self.store.get(id)?.as_educational()?.level(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContentType, OncologyCategory};
    use crate::store::tests::oncology_entry;
    use crate::store::{AuthoredEntry, Source};

    fn sample_store() -> ContentStore {
        let mut melanoma = oncology_entry("melanoma", "Melanoma", OncologyCategory::SolidTumor);
        melanoma.risk_factors = vec!["UV exposure".to_string()];
        let mut siadh = oncology_entry("siadh", "SIADH of Malignancy", OncologyCategory::Paraneoplastic);
        siadh.clinical_features = vec!["Hyponatremia".to_string()];
        let mut cml = oncology_entry("cml", "Chronic Myeloid Leukemia", OncologyCategory::HematologicMalignancy);
        cml.diagnostics = vec!["BCR-ABL PCR".to_string()];

        let authored = [melanoma, siadh, cml]
            .into_iter()
            .map(|e| AuthoredEntry::new(e, Source::Builtin("test".to_string())))
            .collect();
        ContentStore::new(authored).unwrap()
    }

    fn ids(entries: &[&Entry]) -> Vec<String> {
        entries.iter().map(|e| e.id().to_string()).collect()
    }

    #[test]
    fn test_get_entry() {
        let store = sample_store();
        let query = QueryService::new(&store);
        assert_eq!(query.get_entry("cml").unwrap().name(), "Chronic Myeloid Leukemia");
        assert!(query.get_entry("CML").is_none());
        assert!(query.get_entry("").is_none());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = sample_store();
        let query = QueryService::new(&store);
        assert_eq!(ids(&query.search("bcr-abl")), vec!["cml"]);
        assert_eq!(ids(&query.search("HYPONATREMIA")), vec!["siadh"]);
        assert_eq!(ids(&query.search("uv exp")), vec!["melanoma"]);
    }

    #[test]
    fn test_search_matches_category_and_spanish_name() {
        let store = sample_store();
        let query = QueryService::new(&store);
        assert_eq!(ids(&query.search("paraneoplastic")), vec!["siadh"]);
        assert_eq!(ids(&query.search("melanoma (es)")), vec!["melanoma"]);
    }

    #[test]
    fn test_search_keeps_store_order_without_duplicates() {
        let store = sample_store();
        let query = QueryService::new(&store);
        // "Description of ..." is in every entry and also in the names
        assert_eq!(ids(&query.search("description of")), vec!["melanoma", "siadh", "cml"]);
        assert_eq!(ids(&query.search("m")), vec!["melanoma", "siadh", "cml"]);
    }

    #[test]
    fn test_empty_query_matches_all() {
        let store = sample_store();
        let query = QueryService::new(&store);
        assert_eq!(query.search("").len(), query.count());
    }

    #[test]
    fn test_search_no_match_is_empty() {
        let store = sample_store();
        let query = QueryService::new(&store);
        assert!(query.search("glioblastoma").is_empty());
    }

    #[test]
    fn test_filter_by_category() {
        let store = sample_store();
        let query = QueryService::new(&store);
        assert_eq!(
            ids(&query.filter_by_category(OncologyCategory::Paraneoplastic.into())),
            vec!["siadh"]
        );
        assert!(query.filter_by_category(OncologyCategory::Screening.into()).is_empty());
        assert!(query.filter_by_category(ContentType::Topic.into()).is_empty());
    }

    #[test]
    fn test_count() {
        let store = sample_store();
        assert_eq!(QueryService::new(&store).count(), 3);
    }

    #[test]
    fn test_related_and_level_on_oncology_entries() {
        let store = sample_store();
        let query = QueryService::new(&store);
        assert!(query.related("melanoma").is_empty());
        assert!(query.related("missing").is_empty());
        assert!(query.level("melanoma", 1).is_none());
    }

    #[test]
    fn test_builtin_related_resolves_targets() {
        let store = ContentStore::builtin().unwrap();
        let query = QueryService::new(&store);

        let related = query.related("cancer-staging-systems");
        assert!(!related.is_empty());
        let screening = related
            .iter()
            .find(|r| r.reference.target_id == "cancer-screening-guidelines")
            .unwrap();
        assert_eq!(screening.target.unwrap().id(), "cancer-screening-guidelines");
    }

    #[test]
    fn test_builtin_filter_by_tag() {
        let store = ContentStore::builtin().unwrap();
        let query = QueryService::new(&store);

        let otology = ids(&query.filter_by_tag("OTOLOGY"));
        assert_eq!(otology.len(), 6);
        assert!(otology.iter().all(|id| id.starts_with("ear-")));
        assert!(query.filter_by_tag("no-such-tag").is_empty());
    }

    #[test]
    fn test_builtin_search_alternate_names() {
        let store = ContentStore::builtin().unwrap();
        let query = QueryService::new(&store);

        assert_eq!(ids(&query.search("hypoacusis")), vec!["ear-hearing-loss"]);
        assert_eq!(ids(&query.search("ringing in the ears")), vec!["ear-tinnitus"]);
    }

    #[test]
    fn test_builtin_level() {
        let store = ContentStore::builtin().unwrap();
        let query = QueryService::new(&store);

        let level = query.level("tumor-markers", 2).unwrap();
        assert_eq!(level.level, 2);
        assert!(query.level("tumor-markers", 6).is_none());
    }
}
