//! Persistence collaborators: a collection-oriented document store in the
//! board database and a file-backed object store for uploads.

pub mod documents;
pub mod objects;

pub use documents::{CollectionSummary, Document, DocumentStore, validate_collection_name};
pub use objects::{ObjectStore, StoredObject};
