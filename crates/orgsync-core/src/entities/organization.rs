use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Address, Coordinates};
use crate::Id;
use crate::enums::OrganizationType;

/// An organization as held in the local replica.
///
/// `owner_id` is not part of the backend's organization object; it travels
/// next to it in an [`OrganizationEnvelope`] and is attached on conversion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Id,
    pub name: String,
    pub full_name: String,
    pub coordinates: Coordinates,
    /// Server-assigned; kept exactly as the backend formats it.
    pub creation_date: String,
    pub address: Address,
    pub annual_turnover: i64,
    pub employees_count: i64,
    pub rating: i64,
    #[serde(rename = "type", default)]
    pub kind: Option<OrganizationType>,
    pub postal_address: Address,
    #[serde(default)]
    pub owner_id: Id,
}

/// `{organization, ownerId}` pair returned by the list endpoint and carried by
/// organization push events.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationEnvelope {
    pub organization: Organization,
    pub owner_id: Id,
}

impl OrganizationEnvelope {
    /// Attach the owner onto the organization record.
    #[must_use]
    pub fn into_organization(self) -> Organization {
        let mut organization = self.organization;
        organization.owner_id = self.owner_id;
        organization
    }
}

impl From<OrganizationEnvelope> for Organization {
    fn from(envelope: OrganizationEnvelope) -> Self {
        envelope.into_organization()
    }
}
