//! Document operations
//!
//! [`DocumentService`] orchestrates the pointer engine, schema resolver,
//! validator, and storage into the store's six operations: create, read,
//! update, create_node, delete_node, and list. All mutations follow the
//! same protocol: version check, mutate a copy, revalidate the whole
//! document, persist content first and metadata second.

mod documents;

pub use documents::DocumentService;
