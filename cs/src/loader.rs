//! Authored content loading
//!
//! Content is read from the sources listed in `content.sources`, in order:
//! 1. Builtin catalogs (`builtin:<name>`, embedded in binary)
//! 2. Directories (every `.yml`/`.yaml` file, recursively, by file name)
//! 3. Single files
//! 4. Glob patterns (matches in sorted order)
//!
//! Each file holds one document:
//! ```yaml
//! oncology:
//!   - id: nsclc
//!     ...
//! educational:
//!   - id: tumor-markers
//!     ...
//! ```
//!
//! ## Hot-Reload
//!
//! The loader records the modification time of every file it reads, so
//! `has_changes()` can report edits and new files without re-parsing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Deserialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::catalog;
use crate::config::{ContentConfig, SourceSpec, ValidationConfig};
use crate::domain::{EducationalContent, OncologyEntry};
use crate::error::LoadError;
use crate::store::{AuthoredEntry, ContentStore, Source};
use crate::validation::{self, ValidationReport};

/// One authored YAML document
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ContentDocument {
    #[serde(default)]
    oncology: Vec<OncologyEntry>,
    #[serde(default)]
    educational: Vec<EducationalContent>,
}

/// Parse one document into entries, oncology records first
pub fn parse_document(content: &str, source: &Source) -> Result<Vec<AuthoredEntry>, LoadError> {
    debug!(%source, content_len = content.len(), "parse_document: called");
    if is_blank_document(content) {
        debug!(%source, "parse_document: blank document");
        return Ok(Vec::new());
    }

    let document: ContentDocument = serde_yaml::from_str(content).map_err(|error| LoadError::Parse {
        origin: source.clone(),
        error,
    })?;

    let entries: Vec<AuthoredEntry> = document
        .oncology
        .into_iter()
        .map(|e| AuthoredEntry::new(e, source.clone()))
        .chain(
            document
                .educational
                .into_iter()
                .map(|c| AuthoredEntry::new(c, source.clone())),
        )
        .collect();
    debug!(%source, count = entries.len(), "parse_document: complete");
    Ok(entries)
}

fn is_blank_document(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}

fn is_yaml(path: &Path) -> bool {
    path.extension().map(|e| e == "yml" || e == "yaml").unwrap_or(false)
}

/// Tracked file for hot-reload detection
#[derive(Debug, Clone)]
struct TrackedFile {
    path: PathBuf,
    modified: SystemTime,
}

/// A store that passed validation, with its report
#[derive(Debug, Clone)]
pub struct LoadedContent {
    pub store: ContentStore,
    pub report: ValidationReport,
}

/// Loader for authored content with hot-reload support
pub struct ContentLoader {
    /// Entries in load order, before the store checks ids
    entries: Vec<AuthoredEntry>,

    /// Tracked files for hot-reload
    tracked_files: Vec<TrackedFile>,

    /// Configuration used for loading
    config: ContentConfig,
}

/// Everything read by one pass over the sources
#[derive(Default)]
struct LoadPass {
    entries: Vec<AuthoredEntry>,
    tracked_files: Vec<TrackedFile>,
}

impl ContentLoader {
    /// Create a new loader and read every configured source
    pub fn new(config: &ContentConfig) -> Result<Self, LoadError> {
        debug!(?config, "ContentLoader::new: called");
        let mut loader = Self {
            entries: Vec::new(),
            tracked_files: Vec::new(),
            config: config.clone(),
        };

        let pass = loader.read_sources()?;
        loader.commit(pass);
        debug!(count = loader.entries.len(), "ContentLoader::new: complete");
        Ok(loader)
    }

    /// Read all sources without touching the loader's current state
    fn read_sources(&self) -> Result<LoadPass, LoadError> {
        debug!("read_sources: called");
        let mut pass = LoadPass::default();

        for spec in self.config.source_specs() {
            match spec {
                SourceSpec::Builtin(name) => {
                    debug!(%name, "read_sources: loading builtin catalog");
                    pass.entries.extend(catalog::load(&name)?);
                }
                SourceSpec::Path(path) if path.is_dir() => {
                    debug!(?path, "read_sources: loading from directory");
                    pass.load_from_directory(&path)?;
                }
                SourceSpec::Path(path) if path.exists() => {
                    pass.load_from_file(&path)?;
                }
                SourceSpec::Path(path) => {
                    debug!(?path, "read_sources: path does not exist, skipping");
                }
                SourceSpec::Pattern(pattern) => {
                    debug!(%pattern, "read_sources: expanding pattern");
                    for path in expand_pattern(&pattern)? {
                        pass.load_from_file(&path)?;
                    }
                }
            }
        }

        info!(
            count = pass.entries.len(),
            files = pass.tracked_files.len(),
            "Loaded content entries"
        );
        Ok(pass)
    }

    fn commit(&mut self, pass: LoadPass) {
        self.entries = pass.entries;
        self.tracked_files = pass.tracked_files;
    }

    /// Check if any tracked files have been modified, removed, or added
    pub fn has_changes(&self) -> bool {
        debug!(tracked_count = self.tracked_files.len(), "has_changes: called");
        for tracked in &self.tracked_files {
            match fs::metadata(&tracked.path).and_then(|m| m.modified()) {
                Ok(modified) if modified > tracked.modified => {
                    debug!(path = ?tracked.path, "has_changes: file modified");
                    return true;
                }
                Err(_) => {
                    debug!(path = ?tracked.path, "has_changes: file removed");
                    return true;
                }
                Ok(_) => {}
            }
        }

        // Also check for new files in tracked directories and patterns
        for path in self.candidate_files() {
            if !self.tracked_files.iter().any(|t| t.path == path) {
                debug!(?path, "has_changes: new file detected");
                return true;
            }
        }

        debug!("has_changes: no changes detected");
        false
    }

    /// Files the configured directories and patterns currently resolve to
    fn candidate_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for spec in self.config.source_specs() {
            match spec {
                SourceSpec::Path(path) if path.is_dir() => files.extend(yaml_files_in(&path)),
                SourceSpec::Path(path) if path.exists() => files.push(path),
                SourceSpec::Pattern(pattern) => files.extend(expand_pattern(&pattern).unwrap_or_default()),
                _ => {}
            }
        }
        files
    }

    /// Reload all sources if anything changed (hot-reload)
    ///
    /// The re-read entries are built and validated before the loader adopts
    /// them. Returns `Ok(None)` when nothing changed. On failure the loader
    /// keeps its previous entries and file times, so the same bad edit is
    /// reported again by the next reload.
    pub fn reload(&mut self, config: &ValidationConfig) -> Result<Option<LoadedContent>, LoadError> {
        debug!("reload: called");
        if !self.has_changes() {
            debug!("reload: no changes, skipping");
            return Ok(None);
        }

        info!("Hot-reloading content");
        let pass = self.read_sources()?;
        let loaded = build_content(pass.entries.clone(), config)?;
        self.commit(pass);
        debug!("reload: complete");
        Ok(Some(loaded))
    }

    /// Entries from the last successful load, in load order
    pub fn entries(&self) -> &[AuthoredEntry] {
        &self.entries
    }

    /// Number of files read from disk
    pub fn tracked_file_count(&self) -> usize {
        self.tracked_files.len()
    }

    /// Build a store from the loaded entries and validate it
    pub fn build(&self, config: &ValidationConfig) -> Result<LoadedContent, LoadError> {
        debug!(count = self.entries.len(), "ContentLoader::build: called");
        build_content(self.entries.clone(), config)
    }
}

fn build_content(entries: Vec<AuthoredEntry>, config: &ValidationConfig) -> Result<LoadedContent, LoadError> {
    let store = ContentStore::new(entries)?;
    let report = validation::validate(&store, config);
    for issue in report.warnings() {
        warn!(entry = %issue.entry_id, source = %issue.source, kind = %issue.kind, "{}", issue.message);
    }
    report.check(config.warnings_as_errors)?;
    info!(
        count = store.len(),
        warnings = report.warning_count(),
        "Content store ready"
    );
    Ok(LoadedContent { store, report })
}

impl LoadPass {
    /// Load all .yml/.yaml files under a directory
    fn load_from_directory(&mut self, dir: &Path) -> Result<(), LoadError> {
        debug!(?dir, "load_from_directory: called");
        for path in yaml_files_in(dir) {
            self.load_from_file(&path)?;
        }
        debug!(?dir, "load_from_directory: complete");
        Ok(())
    }

    /// Load the entries of one YAML file
    fn load_from_file(&mut self, path: &Path) -> Result<(), LoadError> {
        debug!(?path, "load_from_file: called");
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // Track file for hot-reload
        if let Ok(metadata) = fs::metadata(path)
            && let Ok(modified) = metadata.modified()
        {
            self.tracked_files.push(TrackedFile {
                path: path.to_path_buf(),
                modified,
            });
        } else {
            debug!(?path, "load_from_file: could not track file metadata");
        }

        let entries = parse_document(&content, &Source::File(path.to_path_buf()))?;
        debug!(?path, count = entries.len(), "load_from_file: parsed");
        self.entries.extend(entries);
        Ok(())
    }
}

/// YAML files under a directory, recursively, ordered by file name
fn yaml_files_in(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_yaml(e.path()))
        .map(|e| e.into_path())
        .collect()
}

/// Files matching a glob pattern, sorted
fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, LoadError> {
    let paths = glob::glob(pattern).map_err(|e| LoadError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    let mut files: Vec<PathBuf> = paths.filter_map(|r| r.ok()).filter(|p| p.is_file()).collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContentRecord;
    use std::time::Duration;
    use tempfile::TempDir;

    const ONE_ONCOLOGY: &str = r#"
oncology:
  - id: local-tumor
    name: Local Tumor
    nameEs: Tumor local
    category: solid-tumor
    icd11: 2C25
    description: A tumor defined on disk.
    epidemiology: Rare.
    staging: TNM
    treatment: Surgery
    prognosis: Good
    patientExplanation: Nothing to worry about.
"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn renamed(content: &str, id: &str) -> String {
        content.replace("local-tumor", id)
    }

    #[test]
    fn test_parse_document_with_empty_section() {
        let yaml = format!("educational: []\n{}", ONE_ONCOLOGY.trim_start());
        let entries = parse_document(&yaml, &Source::Builtin("t".to_string())).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry.id(), "local-tumor");
    }

    #[test]
    fn test_parse_blank_document() {
        let entries = parse_document("# nothing yet\n\n", &Source::Builtin("t".to_string())).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_unknown_top_level_key_fails() {
        let err = parse_document("cardiology: []\n", &Source::Builtin("t".to_string())).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_parse_error_names_source() {
        let source = Source::File(PathBuf::from("/content/broken.yml"));
        let err = parse_document("oncology:\n  - id: [unclosed\n", &source).unwrap_err();
        assert!(err.to_string().contains("/content/broken.yml"));
    }

    #[test]
    fn test_loads_sources_in_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/b.yml", &renamed(ONE_ONCOLOGY, "from-b"));
        write(dir.path(), "content/a.yml", &renamed(ONE_ONCOLOGY, "from-a"));
        write(dir.path(), "content/nested/c.yaml", &renamed(ONE_ONCOLOGY, "from-c"));
        write(dir.path(), "content/notes.txt", "not content");
        let single = write(dir.path(), "single.yml", &renamed(ONE_ONCOLOGY, "single"));

        let config = ContentConfig::with_sources([
            "builtin:ear-disorders".to_string(),
            dir.path().join("content").to_string_lossy().to_string(),
            single.to_string_lossy().to_string(),
        ]);
        let loader = ContentLoader::new(&config).unwrap();

        let ids: Vec<&str> = loader.entries().iter().map(|a| a.entry.id()).collect();
        assert_eq!(ids.len(), 6 + 4);
        assert_eq!(ids[0], "ear-otitis-media");
        assert_eq!(&ids[6..], &["from-a", "from-b", "from-c", "single"]);
        assert_eq!(loader.tracked_file_count(), 4);
    }

    #[test]
    fn test_missing_directory_is_skipped() {
        let dir = TempDir::new().unwrap();
        let config = ContentConfig::with_sources([dir.path().join("absent").to_string_lossy().to_string()]);
        let loader = ContentLoader::new(&config).unwrap();
        assert!(loader.entries().is_empty());
    }

    #[test]
    fn test_glob_pattern_source() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "x-2.yml", &renamed(ONE_ONCOLOGY, "two"));
        write(dir.path(), "x-1.yml", &renamed(ONE_ONCOLOGY, "one"));
        write(dir.path(), "y.yml", &renamed(ONE_ONCOLOGY, "other"));

        let pattern = dir.path().join("x-*.yml").to_string_lossy().to_string();
        let loader = ContentLoader::new(&ContentConfig::with_sources([pattern])).unwrap();
        let ids: Vec<&str> = loader.entries().iter().map(|a| a.entry.id()).collect();
        assert_eq!(ids, vec!["one", "two"]);
    }

    #[test]
    fn test_unknown_builtin_fails() {
        let result = ContentLoader::new(&ContentConfig::with_sources(["builtin:cardiology"]));
        assert!(matches!(result, Err(LoadError::UnknownCatalog { .. })));
    }

    #[test]
    fn test_build_rejects_duplicate_across_files() {
        let dir = TempDir::new().unwrap();
        let first = write(dir.path(), "first.yml", ONE_ONCOLOGY);
        let second = write(dir.path(), "second.yml", ONE_ONCOLOGY);

        let loader = ContentLoader::new(&ContentConfig::with_sources([dir.path().to_string_lossy().to_string()])).unwrap();
        match loader.build(&ValidationConfig::default()) {
            Err(LoadError::DuplicateId { id, first: a, second: b }) => {
                assert_eq!(id, "local-tumor");
                assert_eq!(a, Source::File(first));
                assert_eq!(b, Source::File(second));
            }
            other => panic!("expected duplicate id error, got {:?}", other.map(|c| c.store.len())),
        }
    }

    #[test]
    fn test_build_warnings_as_errors() {
        let dir = TempDir::new().unwrap();
        let bad_icd = ONE_ONCOLOGY.replace("icd11: 2C25", "icd11: '25'");
        write(dir.path(), "a.yml", &bad_icd);
        let loader = ContentLoader::new(&ContentConfig::with_sources([dir.path().to_string_lossy().to_string()])).unwrap();

        let loaded = loader.build(&ValidationConfig::default()).unwrap();
        assert_eq!(loaded.report.warning_count(), 1);

        let strict = ValidationConfig {
            warnings_as_errors: true,
            ..Default::default()
        };
        assert!(matches!(loader.build(&strict), Err(LoadError::Validation { .. })));
    }

    #[test]
    fn test_has_changes_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "a.yml", ONE_ONCOLOGY);
        let config = ContentConfig::with_sources([dir.path().to_string_lossy().to_string()]);
        let mut loader = ContentLoader::new(&config).unwrap();

        let validation = ValidationConfig::default();
        assert!(!loader.has_changes());
        assert!(loader.reload(&validation).unwrap().is_none());

        // New file in a tracked directory
        write(dir.path(), "b.yml", &renamed(ONE_ONCOLOGY, "second"));
        assert!(loader.has_changes());
        let loaded = loader.reload(&validation).unwrap().unwrap();
        assert_eq!(loaded.store.len(), 2);
        assert_eq!(loader.entries().len(), 2);

        // Modified file
        std::thread::sleep(Duration::from_millis(20));
        fs::write(&path, renamed(ONE_ONCOLOGY, "renamed")).unwrap();
        let file = fs::File::options().append(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(5)).unwrap();
        assert!(loader.has_changes());
        assert!(loader.reload(&validation).unwrap().is_some());
        let ids: Vec<&str> = loader.entries().iter().map(|a| a.entry.id()).collect();
        assert_eq!(ids, vec!["renamed", "second"]);
    }

    #[test]
    fn test_failed_reload_keeps_entries() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.yml", ONE_ONCOLOGY);
        let config = ContentConfig::with_sources([dir.path().to_string_lossy().to_string()]);
        let mut loader = ContentLoader::new(&config).unwrap();

        write(dir.path(), "b.yml", "oncology: [ broken");
        assert!(loader.reload(&ValidationConfig::default()).is_err());
        assert_eq!(loader.entries().len(), 1);
        assert_eq!(loader.entries()[0].entry.id(), "local-tumor");
    }

    #[test]
    fn test_rejected_reload_is_reported_again() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.yml", ONE_ONCOLOGY);
        let config = ContentConfig::with_sources([dir.path().to_string_lossy().to_string()]);
        let validation = ValidationConfig::default();
        let mut loader = ContentLoader::new(&config).unwrap();

        write(dir.path(), "b.yml", ONE_ONCOLOGY);
        for _ in 0..2 {
            assert!(matches!(
                loader.reload(&validation),
                Err(LoadError::DuplicateId { .. })
            ));
            assert_eq!(loader.entries().len(), 1);
            assert_eq!(loader.tracked_file_count(), 1);
        }

        fs::write(dir.path().join("b.yml"), renamed(ONE_ONCOLOGY, "second")).unwrap();
        let loaded = loader.reload(&validation).unwrap().unwrap();
        assert_eq!(loaded.store.len(), 2);
        assert!(loader.reload(&validation).unwrap().is_none());
    }
}
