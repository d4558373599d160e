//! # transmart-copy
//!
//! Writes tranSMART data collections as tab-separated files that can be
//! bulk-loaded with `transmart-copy`.
//!
//! A [`DataCollection`](transmart_types::DataCollection) is validated, then
//! walked once. Every entity is written to its table with a 0-based
//! surrogate key, the ontology tree is rendered into paths, and observation
//! values are spread over the fixed value columns of `observation_fact`.
//!
//! ## Usage
//!
//! ```no_run
//! use transmart_copy::{write_collection, CopyConfig};
//! use transmart_types::DataCollection;
//!
//! let collection = DataCollection::new();
//! let config = CopyConfig::from_env();
//! let stats = write_collection(&collection, &config)?;
//! assert_eq!(stats.observations, 0);
//! # Ok::<(), transmart_copy::CopyError>(())
//! ```
//!
//! Logging goes through `tracing`; installing a subscriber is up to the
//! application.

#![warn(missing_docs)]

pub mod format;
pub mod registry;
pub mod tables;
pub mod types;
pub mod validator;
pub mod visitor;
pub mod writer;

pub use tables::Table;
pub use types::{CopyConfig, CopyError, CopyResult, WriteStats};
pub use validator::CollectionValidator;
pub use visitor::CollectionVisitor;
pub use writer::{write_collection, CopyWriter};

// Re-export transmart-types for convenience
pub use transmart_types;
