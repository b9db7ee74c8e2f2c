//! # orgsync-store
//!
//! In-memory replica of the backend's entity collections.
//!
//! - [`EntityStore`]: a keyed collection for any [`Keyed`] record, with cheap
//!   immutable snapshots and change notification
//! - [`Replica`]: the three stores of a session (organizations, addresses,
//!   coordinates) and the [`Mutation`] reducer applied to them
//!
//! The replica is a pure cache. Every mutation mirrors something the server
//! confirmed: a bulk load, or a push event.

mod entity_store;
mod replica;

pub use entity_store::{EntityStore, Keyed, Snapshot};
pub use replica::{Mutation, Replica, ReplicaCounts};
