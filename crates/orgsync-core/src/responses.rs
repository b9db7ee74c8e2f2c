//! Small response bodies returned by the backend's write and query endpoints.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Id;

/// `{id}` returned with a 201 by the sub-resource creation endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CreatedId {
    pub id: Id,
}

/// One row of the group-by-address query.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressCount {
    pub address_id: Id,
    pub organization_count: i64,
}
