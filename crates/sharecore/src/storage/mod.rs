//! In-memory state shared between the handlers and the status server

pub mod membership;
pub mod records;
pub mod sessions;

pub use membership::MembershipCache;
pub use records::{AccessPayload, AccessRecord, AccessStore, MediaKind, StoredFile};
pub use sessions::SessionStore;
