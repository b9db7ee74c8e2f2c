use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Id;

/// A street address. Shared between organizations as either `address` or
/// `postalAddress`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Address {
    pub id: Id,
    pub street: String,
    pub zip: String,
}
