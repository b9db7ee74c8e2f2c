//! Multi-step creation, update, and deletion of organizations.
//!
//! An organization references three sub-resources (coordinates, address,
//! postal address). Each is either picked from the replica or created inline
//! before the organization itself. Sub-resource calls run one after another and
//! the first failure stops the sequence; ids obtained before the failure are
//! reported, never cleaned up.
//!
//! The orchestrator only reads the replica. The organization appears there
//! when the backend echoes it over the event stream.

use std::sync::Arc;

use orgsync_core::CoreError;
use orgsync_core::Id;
use orgsync_core::drafts::{
    AddressDraft, CoordinatesDraft, NewOrganization, OrganizationDraft, OrganizationPatch,
    ResolvedIds, SubResourceIds,
};
use orgsync_core::entities::{Address, Coordinates, Organization};
use orgsync_core::enums::OrganizationType;
use orgsync_store::{EntityStore, Keyed, Replica};
use thiserror::Error;

use crate::api::OrganizationApi;
use crate::error::ClientError;
use crate::notify::{Notification, NotificationSink};

// ── Request ────────────────────────────────────────────────────────

/// Where a sub-resource comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<D> {
    /// A record already in the replica. `None` means nothing was selected yet.
    Existing(Option<Id>),
    /// A record to create from the draft.
    Manual(D),
}

/// Everything needed to create or update one organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationRequest {
    pub organization: OrganizationDraft,
    pub coordinates: Slot<CoordinatesDraft>,
    pub address: Slot<AddressDraft>,
    pub postal_address: Slot<AddressDraft>,
}

impl OrganizationRequest {
    /// A request that reproduces `org` exactly, referencing its current
    /// sub-resources.
    #[must_use]
    pub fn from_existing(org: &Organization) -> Self {
        Self {
            organization: OrganizationDraft::from(org),
            coordinates: Slot::Existing(Some(org.coordinates.id)),
            address: Slot::Existing(Some(org.address.id)),
            postal_address: Slot::Existing(Some(org.postal_address.id)),
        }
    }

    /// Check every draft and that every slot can be resolved.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] naming the first offending part.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.organization.validate()?;
        match &self.coordinates {
            Slot::Existing(id) => selected("coordinates", *id).map(drop)?,
            Slot::Manual(draft) => draft.validate()?,
        }
        for (label, slot) in [("address", &self.address), ("postal address", &self.postal_address)] {
            match slot {
                Slot::Existing(id) => selected(label, *id).map(drop)?,
                Slot::Manual(draft) => draft.validate().map_err(|e| match e {
                    CoreError::Validation(reason) => CoreError::Validation(format!("{label}: {reason}")),
                    other => other,
                })?,
            }
        }
        Ok(())
    }
}

fn selected(label: &str, id: Option<Id>) -> Result<Id, CoreError> {
    id.ok_or_else(|| CoreError::Validation(format!("no existing {label} selected")))
}

// ── Report ─────────────────────────────────────────────────────────

/// Why an operation did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("not authorized")]
    Unauthorized,

    #[error("rejected by the backend (HTTP {status})")]
    Rejected { status: u16 },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid request: {0}")]
    Invalid(String),
}

impl From<&ClientError> for Failure {
    fn from(error: &ClientError) -> Self {
        match error {
            ClientError::Unauthorized => Self::Unauthorized,
            ClientError::Api { status, .. } | ClientError::UnexpectedStatus { status, .. } => {
                Self::Rejected { status: *status }
            }
            ClientError::Config(reason) => Self::Invalid(reason.clone()),
            ClientError::Http(_) | ClientError::Parse(_) | ClientError::Stream(_) => {
                Self::Transport(error.to_string())
            }
        }
    }
}

impl From<CoreError> for Failure {
    fn from(error: CoreError) -> Self {
        Self::Invalid(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Nothing differed; no request was sent.
    NoOp,
    Failed(Failure),
}

/// Result of one orchestrated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub outcome: Outcome,
    /// Sub-resource ids obtained so far. On failure, the created ones are not
    /// attached to any organization.
    pub ids: SubResourceIds,
    /// Ids the backend reported as deleted.
    pub deleted: Vec<Id>,
}

impl Report {
    const fn new(outcome: Outcome, ids: SubResourceIds) -> Self {
        Self {
            outcome,
            ids,
            deleted: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success | Outcome::NoOp)
    }

    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        match &self.outcome {
            Outcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    const fn verb(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    const fn failed_title(self) -> &'static str {
        match self {
            Self::Create => "Creation failed",
            Self::Update => "Update failed",
            Self::Delete => "Deletion failed",
        }
    }
}

// ── Orchestrator ───────────────────────────────────────────────────

pub struct CreationOrchestrator<A> {
    api: Arc<A>,
    replica: Arc<Replica>,
    sink: Arc<dyn NotificationSink>,
}

impl<A: OrganizationApi> CreationOrchestrator<A> {
    pub fn new(api: Arc<A>, replica: Arc<Replica>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { api, replica, sink }
    }

    /// Resolve the three slots, then create the organization.
    ///
    /// Invalid input fails before any network call.
    pub async fn create(&self, request: &OrganizationRequest) -> Report {
        let mut ids = SubResourceIds::default();
        if let Err(error) = request.validate() {
            return self.fail(Action::Create, ids, error.into());
        }
        let resolved = match self.resolve(request, None, &mut ids).await {
            Ok(resolved) => resolved,
            Err(failure) => return self.fail(Action::Create, ids, failure),
        };

        let body = NewOrganization::new(&request.organization, resolved);
        match self.api.create_organization(&body).await {
            Ok(()) => {
                tracing::info!(name = %body.name, "organization created");
                self.sink.notify(Notification::success(
                    format!("Organization {} created", body.full_name),
                    "You can now manage it",
                ));
                Report::new(Outcome::Success, ids)
            }
            Err(error) => self.fail_with(Action::Create, ids, &error),
        }
    }

    /// Apply `request` to organization `id` with a minimal partial update.
    ///
    /// A manual slot whose values equal the currently embedded record reuses
    /// that record. If nothing differs, no request is sent.
    pub async fn update(&self, id: Id, request: &OrganizationRequest) -> Report {
        let mut ids = SubResourceIds::default();
        let Some(previous) = self.replica.organizations.get(id) else {
            let error = CoreError::NotFound {
                entity_type: "organization".into(),
                id,
            };
            return self.fail(Action::Update, ids, error.into());
        };
        if let Err(error) = request.validate() {
            return self.fail(Action::Update, ids, error.into());
        }
        let resolved = match self.resolve(request, Some(&previous), &mut ids).await {
            Ok(resolved) => resolved,
            Err(failure) => return self.fail(Action::Update, ids, failure),
        };

        let patch = OrganizationPatch::diff(&previous, &request.organization, resolved);
        if patch.is_empty() {
            tracing::debug!(id, "update is a no-op");
            return Report::new(Outcome::NoOp, ids);
        }
        match self.api.update_organization(id, &patch).await {
            Ok(()) => {
                tracing::info!(id, "organization updated");
                self.sink.notify(Notification::success(
                    format!("Organization {} updated", request.organization.full_name.trim()),
                    "Changes saved",
                ));
                Report::new(Outcome::Success, ids)
            }
            Err(error) => self.fail_with(Action::Update, ids, &error),
        }
    }

    /// Delete one organization. The replica changes when the deletion is
    /// echoed over the event stream.
    pub async fn delete(&self, id: Id) -> Report {
        match self.api.delete_organization(id).await {
            Ok(deleted) => {
                tracing::info!(id, count = deleted.len(), "organization deleted");
                self.sink.notify(Notification::success(
                    format!("Organization {id} deleted"),
                    "You will never see it again...",
                ));
                Report {
                    deleted,
                    ..Report::new(Outcome::Success, SubResourceIds::default())
                }
            }
            Err(error) => self.fail_with(Action::Delete, SubResourceIds::default(), &error),
        }
    }

    /// Delete every organization of the given type.
    pub async fn delete_by_type(&self, kind: OrganizationType) -> Report {
        match self.api.delete_by_type(kind).await {
            Ok(deleted) => {
                tracing::info!(%kind, count = deleted.len(), "organizations deleted by type");
                self.sink.notify(Notification::info(
                    format!("{} organizations were deleted", deleted.len()),
                    "You will never see them again...",
                ));
                Report {
                    deleted,
                    ..Report::new(Outcome::Success, SubResourceIds::default())
                }
            }
            Err(error) => self.fail_with(Action::Delete, SubResourceIds::default(), &error),
        }
    }

    /// Coordinates, then address, then postal address. `ids` is filled as each
    /// slot resolves so the caller sees partial progress on failure.
    async fn resolve(
        &self,
        request: &OrganizationRequest,
        previous: Option<&Organization>,
        ids: &mut SubResourceIds,
    ) -> Result<ResolvedIds, Failure> {
        let coordinates = self
            .resolve_coordinates(&request.coordinates, previous.map(|o| &o.coordinates))
            .await?;
        ids.coordinates = Some(coordinates);

        let address = self
            .resolve_address(&request.address, previous.map(|o| &o.address))
            .await?;
        ids.address = Some(address);

        let postal_address = self
            .resolve_address(&request.postal_address, previous.map(|o| &o.postal_address))
            .await?;
        ids.postal_address = Some(postal_address);

        Ok(ResolvedIds {
            coordinates,
            address,
            postal_address,
        })
    }

    async fn resolve_coordinates(
        &self,
        slot: &Slot<CoordinatesDraft>,
        previous: Option<&Coordinates>,
    ) -> Result<Id, Failure> {
        let draft = match slot {
            Slot::Existing(id) => return existing(&self.replica.coordinates, "coordinates", *id),
            Slot::Manual(draft) => draft,
        };
        if let Some(prev) = previous.filter(|prev| draft.matches(prev)) {
            return Ok(prev.id);
        }

        let id = self.api.create_coordinates(draft).await.map_err(|error| {
            tracing::warn!(%error, "coordinates creation failed");
            Failure::from(&error)
        })?;
        tracing::debug!(id, "coordinates created");
        self.sink.notify(Notification::success(
            format!("({}; {}) added to database", draft.x, draft.y),
            "You can now use it",
        ));
        Ok(id)
    }

    async fn resolve_address(
        &self,
        slot: &Slot<AddressDraft>,
        previous: Option<&Address>,
    ) -> Result<Id, Failure> {
        let draft = match slot {
            Slot::Existing(id) => return existing(&self.replica.addresses, "address", *id),
            Slot::Manual(draft) => draft,
        };
        if let Some(prev) = previous.filter(|prev| draft.matches(prev)) {
            return Ok(prev.id);
        }

        let id = self.api.create_address(draft).await.map_err(|error| {
            tracing::warn!(%error, "address creation failed");
            Failure::from(&error)
        })?;
        tracing::debug!(id, "address created");
        self.sink.notify(Notification::success(
            format!("{}:{} added to database", draft.street, draft.zip),
            "You can now use it",
        ));
        Ok(id)
    }

    fn fail_with(&self, action: Action, ids: SubResourceIds, error: &ClientError) -> Report {
        tracing::warn!(action = action.verb(), %error, "backend call failed");
        self.fail(action, ids, Failure::from(error))
    }

    fn fail(&self, action: Action, ids: SubResourceIds, failure: Failure) -> Report {
        tracing::warn!(action = action.verb(), %failure, ?ids, "organization operation failed");
        let notification = match &failure {
            Failure::Unauthorized => Notification::error(
                "Unauthorized",
                format!("You are not authorized to {} organizations", action.verb()),
            ),
            Failure::Invalid(reason) => Notification::error(action.failed_title(), reason.clone()),
            other => Notification::error(
                action.failed_title(),
                format!("Failed to {} organization: {other}", action.verb()),
            ),
        };
        self.sink.notify(notification);
        Report::new(Outcome::Failed(failure), ids)
    }
}

/// An existing selection is used as-is. A record the replica has not seen yet
/// may still exist on the server, so a miss is only logged.
fn existing<T: Keyed + Clone>(
    store: &EntityStore<T>,
    label: &str,
    id: Option<Id>,
) -> Result<Id, Failure> {
    let id = selected(label, id)?;
    if !store.contains(id) {
        tracing::warn!(id, label, "selected record is not in the replica");
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request() -> OrganizationRequest {
        OrganizationRequest {
            organization: OrganizationDraft {
                name: "Acme".into(),
                full_name: "Acme Holdings".into(),
                annual_turnover: 10,
                employees_count: 3,
                rating: 2,
                kind: None,
            },
            coordinates: Slot::Manual(CoordinatesDraft { x: 5, y: 10 }),
            address: Slot::Existing(Some(3)),
            postal_address: Slot::Manual(AddressDraft::new("Main", "00001")),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn unselected_existing_slot_is_invalid() {
        let mut req = request();
        req.address = Slot::Existing(None);
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: no existing address selected");
    }

    #[test]
    fn manual_postal_address_errors_name_the_slot() {
        let mut req = request();
        req.postal_address = Slot::Manual(AddressDraft::new("Main", ""));
        let err = req.validate().unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation("postal address: zip cannot be empty".into())
        );
    }

    #[test]
    fn coordinates_bound_is_checked() {
        let mut req = request();
        req.coordinates = Slot::Manual(CoordinatesDraft { x: 443, y: 0 });
        assert!(req.validate().is_err());
    }

    #[test]
    fn failure_classification() {
        assert_eq!(Failure::from(&ClientError::Unauthorized), Failure::Unauthorized);
        assert_eq!(
            Failure::from(&ClientError::Api {
                status: 500,
                message: String::new()
            }),
            Failure::Rejected { status: 500 }
        );
        assert_eq!(
            Failure::from(&ClientError::UnexpectedStatus {
                expected: 201,
                status: 200
            }),
            Failure::Rejected { status: 200 }
        );
        assert!(matches!(
            Failure::from(&ClientError::Parse("eof".into())),
            Failure::Transport(_)
        ));
    }

    #[test]
    fn report_accessors() {
        let report = Report::new(Outcome::Failed(Failure::Unauthorized), SubResourceIds::default());
        assert!(!report.is_success());
        assert_eq!(report.failure(), Some(&Failure::Unauthorized));
        assert!(Report::new(Outcome::NoOp, SubResourceIds::default()).is_success());
    }
}
