//! Organization type enum.
//!
//! Serialized with the backend's SCREAMING_SNAKE_CASE names.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Legal form of an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizationType {
    Commercial,
    Public,
    Government,
    PrivateLimitedCompany,
    OpenJointStockCompany,
}

impl OrganizationType {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Commercial,
        Self::Public,
        Self::Government,
        Self::PrivateLimitedCompany,
        Self::OpenJointStockCompany,
    ];

    /// Return the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Commercial => "COMMERCIAL",
            Self::Public => "PUBLIC",
            Self::Government => "GOVERNMENT",
            Self::PrivateLimitedCompany => "PRIVATE_LIMITED_COMPANY",
            Self::OpenJointStockCompany => "OPEN_JOINT_STOCK_COMPANY",
        }
    }
}

impl fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganizationType {
    type Err = CoreError;

    /// Accepts the wire name in any case, with `-` or `_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| CoreError::Validation(format!("unknown organization type '{s}'")))
    }
}
