use orgsync_core::Id;
use orgsync_core::entities::{Address, Coordinates, Organization};

use crate::EntityStore;

/// A server-confirmed change to the replica.
///
/// Organization creation and update share [`Mutation::UpsertOrganization`]: an
/// update for an id the replica has not seen yet still converges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    UpsertOrganization(Organization),
    RemoveOrganization(Id),
    UpsertCoordinates(Coordinates),
    UpsertAddress(Address),
}

impl Mutation {
    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UpsertOrganization(_) => "upsert_organization",
            Self::RemoveOrganization(_) => "remove_organization",
            Self::UpsertCoordinates(_) => "upsert_coordinates",
            Self::UpsertAddress(_) => "upsert_address",
        }
    }
}

/// Entity stores of one session.
///
/// Shared behind an `Arc`; the stores are only written through
/// [`Replica::apply`] and [`Replica::seed`]. There is no cross-store atomicity:
/// an organization may briefly reference coordinates the coordinates store has
/// not received yet.
#[derive(Debug, Default)]
pub struct Replica {
    pub organizations: EntityStore<Organization>,
    pub addresses: EntityStore<Address>,
    pub coordinates: EntityStore<Coordinates>,
}

/// Number of records per store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplicaCounts {
    pub organizations: usize,
    pub addresses: usize,
    pub coordinates: usize,
}

impl Replica {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all three collections with a full server listing.
    pub fn seed(
        &self,
        organizations: Vec<Organization>,
        addresses: Vec<Address>,
        coordinates: Vec<Coordinates>,
    ) -> ReplicaCounts {
        ReplicaCounts {
            organizations: self.organizations.replace_all(organizations),
            addresses: self.addresses.replace_all(addresses),
            coordinates: self.coordinates.replace_all(coordinates),
        }
    }

    /// Apply one mutation. Every variant is idempotent.
    pub fn apply(&self, mutation: Mutation) {
        tracing::trace!(kind = mutation.kind(), "applying replica mutation");
        match mutation {
            Mutation::UpsertOrganization(org) => {
                self.organizations.upsert(org);
            }
            Mutation::RemoveOrganization(id) => {
                if self.organizations.remove(id).is_none() {
                    tracing::debug!(id, "organization already absent");
                }
            }
            Mutation::UpsertCoordinates(coordinates) => {
                self.coordinates.upsert(coordinates);
            }
            Mutation::UpsertAddress(address) => {
                self.addresses.upsert(address);
            }
        }
    }

    #[must_use]
    pub fn counts(&self) -> ReplicaCounts {
        ReplicaCounts {
            organizations: self.organizations.len(),
            addresses: self.addresses.len(),
            coordinates: self.coordinates.len(),
        }
    }
}
