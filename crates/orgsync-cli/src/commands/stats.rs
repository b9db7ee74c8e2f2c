use anyhow::Context;
use orgsync_core::entities::Organization;
use orgsync_core::responses::AddressCount;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct StatsResponse {
    total_rating: i64,
    average_employees_top10: f64,
    top_turnover: Vec<Organization>,
    organizations_per_address: Vec<AddressCount>,
}

/// Handle `orgsync stats`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let api = &ctx.api;
    let (total_rating, average_employees_top10, top_turnover, organizations_per_address) =
        tokio::try_join!(
            api.total_rating(),
            api.average_employees_top10(),
            api.top_turnover(),
            api.group_by_address(),
        )
        .context("failed to fetch organization statistics")?;

    output(
        &StatsResponse {
            total_rating,
            average_employees_top10,
            top_turnover,
            organizations_per_address,
        },
        flags.format,
    )
}
