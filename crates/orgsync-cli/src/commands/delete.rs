use orgsync_core::Id;
use orgsync_core::enums::OrganizationType;

use crate::cli::GlobalFlags;
use crate::commands::report::finish;
use crate::context::AppContext;

/// Handle `orgsync delete`.
pub async fn handle_one(id: Id, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.orchestrator().delete(id).await;
    finish(report, flags)
}

/// Handle `orgsync delete-by-type`.
pub async fn handle_by_type(
    kind: OrganizationType,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let report = ctx.orchestrator().delete_by_type(kind).await;
    finish(report, flags)
}
