//! Typed push events and their mapping onto replica mutations.

use orgsync_core::Id;
use orgsync_core::entities::{Address, Coordinates, OrganizationEnvelope};
use orgsync_store::Mutation;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::sse::SseFrame;

pub const ORGANIZATION_CREATED: &str = "ORGANIZATION_CREATED";
pub const ORGANIZATION_UPDATED: &str = "ORGANIZATION_UPDATED";
pub const ORGANIZATION_DELETED: &str = "ORGANIZATION_DELETED";
pub const COORDINATES_CREATED: &str = "COORDINATES_CREATED";
pub const ADDRESS_CREATED: &str = "ADDRESS_CREATED";

/// A decoded server-push event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    OrganizationCreated(OrganizationEnvelope),
    OrganizationUpdated(OrganizationEnvelope),
    OrganizationDeleted(Id),
    CoordinatesCreated(Coordinates),
    AddressCreated(Address),
}

impl StreamEvent {
    /// Decode a frame. Returns `Ok(None)` for event names this client does not
    /// handle.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Parse`] if a known event carries a payload that
    /// does not match its type.
    pub fn decode(frame: &SseFrame) -> Result<Option<Self>, ClientError> {
        let event = match frame.event.as_str() {
            ORGANIZATION_CREATED => Self::OrganizationCreated(payload(frame)?),
            ORGANIZATION_UPDATED => Self::OrganizationUpdated(payload(frame)?),
            ORGANIZATION_DELETED => Self::OrganizationDeleted(payload(frame)?),
            COORDINATES_CREATED => Self::CoordinatesCreated(payload(frame)?),
            ADDRESS_CREATED => Self::AddressCreated(payload(frame)?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OrganizationCreated(_) => ORGANIZATION_CREATED,
            Self::OrganizationUpdated(_) => ORGANIZATION_UPDATED,
            Self::OrganizationDeleted(_) => ORGANIZATION_DELETED,
            Self::CoordinatesCreated(_) => COORDINATES_CREATED,
            Self::AddressCreated(_) => ADDRESS_CREATED,
        }
    }

    /// Created and updated organizations both become an upsert carrying the
    /// owner id.
    #[must_use]
    pub fn into_mutation(self) -> Mutation {
        match self {
            Self::OrganizationCreated(envelope) | Self::OrganizationUpdated(envelope) => {
                Mutation::UpsertOrganization(envelope.into_organization())
            }
            Self::OrganizationDeleted(id) => Mutation::RemoveOrganization(id),
            Self::CoordinatesCreated(coordinates) => Mutation::UpsertCoordinates(coordinates),
            Self::AddressCreated(address) => Mutation::UpsertAddress(address),
        }
    }
}

fn payload<T: DeserializeOwned>(frame: &SseFrame) -> Result<T, ClientError> {
    serde_json::from_str(&frame.data)
        .map_err(|e| ClientError::Parse(format!("{} payload: {e}", frame.event)))
}
