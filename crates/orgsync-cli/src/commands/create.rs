use anyhow::bail;
use orgsync_client::OrganizationRequest;
use orgsync_core::drafts::OrganizationDraft;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CreateArgs;
use crate::commands::report::finish;
use crate::commands::slots::SlotChoice;
use crate::context::AppContext;

/// Handle `orgsync create`.
pub async fn handle(args: &CreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let request = build_request(args)?;
    let report = ctx.orchestrator().create(&request).await;
    finish(report, flags)
}

fn build_request(args: &CreateArgs) -> anyhow::Result<OrganizationRequest> {
    let slots = SlotChoice::from(&args.slots);
    let Some(coordinates) = slots.coordinates else {
        bail!("create needs coordinates: --coordinates-id, or --x with --y");
    };
    let Some(address) = slots.address else {
        bail!("create needs an address: --address-id, or --street with --zip");
    };
    let Some(postal_address) = slots.postal_address else {
        bail!("create needs a postal address: --postal-address-id, or --postal-street with --postal-zip");
    };
    Ok(OrganizationRequest {
        organization: OrganizationDraft {
            name: args.name.clone(),
            full_name: args.full_name.clone(),
            annual_turnover: args.annual_turnover,
            employees_count: args.employees_count,
            rating: args.rating,
            kind: args.kind,
        },
        coordinates,
        address,
        postal_address,
    })
}
