//! Mock implementations of the pipeline's storage seams.
//!
//! This module provides in-memory stand-ins for the object store and the
//! metadata store the attachment engine is built on. Both share state
//! across clones, so a test can hand one handle to the engine and keep
//! another for assertions.

mod object_store;
mod repository;

pub use object_store::MockObjectStore;
pub use repository::MemoryMetadata;
