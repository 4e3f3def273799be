//! Document store abstraction
//!
//! The store holds loosely typed documents (JSON field maps) grouped into
//! collections. Typed records are decoded at this boundary in [`records`],
//! so the rest of the crate never reads a raw field map.

mod error;
mod file;
mod memory;
pub mod records;
mod traits;

pub use error::StoreError;
pub use file::JsonFileDocumentStore;
pub use memory::MemoryDocumentStore;
pub use records::SessionRepository;
pub use traits::{Document, DocumentStore, Fields};

/// Collection holding interview sessions
pub const SESSIONS: &str = "interviews";

/// Collection holding user profiles, keyed by uid
pub const USERS: &str = "users";
