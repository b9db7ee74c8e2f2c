//! # orgsync-core
//!
//! Core types shared across all orgsync crates:
//! - Entity structs mirrored from the backend (organizations, coordinates, addresses)
//! - The organization type enum
//! - Client-side drafts, creation bodies, and partial-update patches
//! - Response bodies of the write and query endpoints
//! - Cross-cutting error types

pub mod drafts;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod responses;

/// Server-assigned identifier. Ids are never generated on the client.
pub type Id = i64;

pub use errors::CoreError;
