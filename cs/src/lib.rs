//! ContentStore - static medical educational content
//!
//! An immutable, in-memory store of authored content records (oncology
//! database entries and multi-level educational topics) with a small
//! read-only query layer: exact lookup, case-insensitive substring search,
//! category filter and count.
//!
//! # Architecture
//!
//! ```text
//! authored YAML ──► ContentLoader ──► ContentStore ──► validate ──► QueryService
//!  (builtin:, dirs,      (parse)        (unique ids)    (report)      (reads)
//!   files, globs)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use contentstore::{ContentRecord, ContentStore, QueryService};
//!
//! let store = ContentStore::builtin()?;
//! let query = QueryService::new(&store);
//! let nsclc = query.get_entry("nsclc").expect("builtin entry");
//! assert_eq!(nsclc.name(), "Non-Small Cell Lung Cancer");
//! for hit in query.search("brca") {
//!     println!("{}", hit.id());
//! }
//! # Ok::<(), contentstore::LoadError>(())
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
mod error;
pub mod loader;
mod query;
pub mod snapshot;
mod store;
pub mod validation;

pub use domain::{Category, ContentRecord, ContentType, EducationalContent, Entry, OncologyCategory, OncologyEntry};
pub use error::LoadError;
pub use loader::{ContentLoader, LoadedContent};
pub use query::{QueryService, ResolvedReference};
pub use snapshot::SharedStore;
pub use store::{AuthoredEntry, ContentStore, Source};
pub use validation::{ValidationIssue, ValidationReport};
