//! Client-side input types: drafts for records that do not exist yet, the
//! organization creation body, and the minimal partial-update patch.
//!
//! Drafts check the data-model invariants only. UI-level rules (length limits,
//! formatting hints) belong to whoever collects the input.

use serde::{Deserialize, Serialize};

use crate::Id;
use crate::entities::{Address, Coordinates, Organization};
use crate::enums::OrganizationType;
use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Sub-resource drafts
// ---------------------------------------------------------------------------

/// Body of a create-coordinates call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatesDraft {
    pub x: i32,
    pub y: i64,
}

impl CoordinatesDraft {
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if `x` exceeds [`Coordinates::MAX_X`].
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.x > Coordinates::MAX_X {
            return Err(CoreError::validation(format!(
                "x must be at most {}, got {}",
                Coordinates::MAX_X,
                self.x
            )));
        }
        Ok(())
    }

    /// Whether an existing record holds the same values.
    #[must_use]
    pub const fn matches(&self, existing: &Coordinates) -> bool {
        self.x == existing.x && self.y == existing.y
    }
}

/// Body of a create-address call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDraft {
    pub street: String,
    pub zip: String,
}

impl AddressDraft {
    #[must_use]
    pub fn new(street: impl Into<String>, zip: impl Into<String>) -> Self {
        Self {
            street: street.into(),
            zip: zip.into(),
        }
    }

    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if `street` or `zip` is empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.street.is_empty() {
            return Err(CoreError::validation("street cannot be empty"));
        }
        if self.zip.is_empty() {
            return Err(CoreError::validation("zip cannot be empty"));
        }
        Ok(())
    }

    #[must_use]
    pub fn matches(&self, existing: &Address) -> bool {
        self.street == existing.street && self.zip == existing.zip
    }
}

// ---------------------------------------------------------------------------
// Organization draft
// ---------------------------------------------------------------------------

/// The organization's own scalar fields, as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationDraft {
    pub name: String,
    pub full_name: String,
    pub annual_turnover: i64,
    pub employees_count: i64,
    pub rating: i64,
    pub kind: Option<OrganizationType>,
}

impl OrganizationDraft {
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for a blank name or full name, or a
    /// non-positive turnover, employee count, or rating.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("name cannot be blank"));
        }
        if self.full_name.trim().is_empty() {
            return Err(CoreError::validation("full name cannot be blank"));
        }
        for (field, value) in [
            ("annual turnover", self.annual_turnover),
            ("employees count", self.employees_count),
            ("rating", self.rating),
        ] {
            if value <= 0 {
                return Err(CoreError::validation(format!(
                    "{field} must be greater than 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl From<&Organization> for OrganizationDraft {
    fn from(org: &Organization) -> Self {
        Self {
            name: org.name.clone(),
            full_name: org.full_name.clone(),
            annual_turnover: org.annual_turnover,
            employees_count: org.employees_count,
            rating: org.rating,
            kind: org.kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-resource ids
// ---------------------------------------------------------------------------

/// Sub-resource ids gathered so far during an orchestration.
///
/// On partial failure this holds the ids of records that were created but never
/// attached to an organization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubResourceIds {
    pub coordinates: Option<Id>,
    pub address: Option<Id>,
    pub postal_address: Option<Id>,
}

impl SubResourceIds {
    /// All three ids, if every slot was resolved.
    #[must_use]
    pub const fn resolved(&self) -> Option<ResolvedIds> {
        match (self.coordinates, self.address, self.postal_address) {
            (Some(coordinates), Some(address), Some(postal_address)) => Some(ResolvedIds {
                coordinates,
                address,
                postal_address,
            }),
            _ => None,
        }
    }
}

/// Fully resolved sub-resource ids for an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedIds {
    pub coordinates: Id,
    pub address: Id,
    pub postal_address: Id,
}

impl From<&Organization> for ResolvedIds {
    fn from(org: &Organization) -> Self {
        Self {
            coordinates: org.coordinates.id,
            address: org.address.id,
            postal_address: org.postal_address.id,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire bodies
// ---------------------------------------------------------------------------

/// Body of a create-organization call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrganization {
    pub name: String,
    pub full_name: String,
    pub coordinates_id: Id,
    pub address_id: Id,
    pub postal_address_id: Id,
    pub annual_turnover: i64,
    pub employees_count: i64,
    pub rating: i64,
    #[serde(rename = "type")]
    pub kind: Option<OrganizationType>,
}

impl NewOrganization {
    /// Names are trimmed before they are sent.
    #[must_use]
    pub fn new(draft: &OrganizationDraft, ids: ResolvedIds) -> Self {
        Self {
            name: draft.name.trim().to_string(),
            full_name: draft.full_name.trim().to_string(),
            coordinates_id: ids.coordinates,
            address_id: ids.address,
            postal_address_id: ids.postal_address,
            annual_turnover: draft.annual_turnover,
            employees_count: draft.employees_count,
            rating: draft.rating,
            kind: draft.kind,
        }
    }
}

/// Partial update of an organization. Only `Some` fields are serialized.
///
/// `kind` is tri-state: `None` leaves the type alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_turnover: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Option<OrganizationType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_address_id: Option<Id>,
}

impl OrganizationPatch {
    /// Minimal patch turning `previous` into `draft` + `ids`.
    #[must_use]
    pub fn diff(previous: &Organization, draft: &OrganizationDraft, ids: ResolvedIds) -> Self {
        fn changed<T: PartialEq>(old: T, new: T) -> Option<T> {
            (old != new).then_some(new)
        }

        let name = draft.name.trim();
        let full_name = draft.full_name.trim();

        Self {
            name: (previous.name.trim() != name).then(|| name.to_string()),
            full_name: (previous.full_name.trim() != full_name).then(|| full_name.to_string()),
            annual_turnover: changed(previous.annual_turnover, draft.annual_turnover),
            employees_count: changed(previous.employees_count, draft.employees_count),
            rating: changed(previous.rating, draft.rating),
            kind: changed(previous.kind, draft.kind),
            coordinates_id: changed(previous.coordinates.id, ids.coordinates),
            address_id: changed(previous.address.id, ids.address),
            postal_address_id: changed(previous.postal_address.id, ids.postal_address),
        }
    }

    /// True when nothing differs and no request should be sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
