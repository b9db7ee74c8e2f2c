use anyhow::{Context, bail};
use orgsync_client::{LoadOutcome, OrganizationRequest};
use orgsync_core::entities::Organization;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::UpdateArgs;
use crate::commands::report::finish;
use crate::commands::slots::SlotChoice;
use crate::context::AppContext;

/// Handle `orgsync update`.
///
/// The replica is loaded first: the current record is the baseline for the
/// minimal patch.
pub async fn handle(args: &UpdateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let LoadOutcome::Failed(reason) = ctx.loader.load().await {
        bail!("could not load organizations: {reason}");
    }
    let current = ctx
        .replica
        .organizations
        .get(args.id)
        .with_context(|| format!("organization {} not found", args.id))?;

    let request = apply(args, &current);
    let report = ctx.orchestrator().update(args.id, &request).await;
    finish(report, flags)
}

/// Overlay the flags onto a request that reproduces `current`.
fn apply(args: &UpdateArgs, current: &Organization) -> OrganizationRequest {
    let mut request = OrganizationRequest::from_existing(current);

    let draft = &mut request.organization;
    if let Some(name) = &args.name {
        draft.name.clone_from(name);
    }
    if let Some(full_name) = &args.full_name {
        draft.full_name.clone_from(full_name);
    }
    if let Some(value) = args.annual_turnover {
        draft.annual_turnover = value;
    }
    if let Some(value) = args.employees_count {
        draft.employees_count = value;
    }
    if let Some(value) = args.rating {
        draft.rating = value;
    }
    if args.clear_type {
        draft.kind = None;
    } else if let Some(kind) = args.kind {
        draft.kind = Some(kind);
    }

    let slots = SlotChoice::from(&args.slots);
    if let Some(slot) = slots.coordinates {
        request.coordinates = slot;
    }
    if let Some(slot) = slots.address {
        request.address = slot;
    }
    if let Some(slot) = slots.postal_address {
        request.postal_address = slot;
    }
    request
}
