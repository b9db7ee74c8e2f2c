use orgsync_client::{Outcome, Report};
use orgsync_core::Id;
use orgsync_core::drafts::SubResourceIds;
use serde::Serialize;

/// Printable form of an orchestrator [`Report`].
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ReportResponse {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub coordinates_id: Option<Id>,
    pub address_id: Option<Id>,
    pub postal_address_id: Option<Id>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<Id>,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        let (outcome, failure) = match report.outcome {
            Outcome::Success => ("success", None),
            Outcome::NoOp => ("no_op", None),
            Outcome::Failed(failure) => ("failed", Some(failure.to_string())),
        };
        let SubResourceIds {
            coordinates,
            address,
            postal_address,
        } = report.ids;
        Self {
            outcome,
            failure,
            coordinates_id: coordinates,
            address_id: address,
            postal_address_id: postal_address,
            deleted: report.deleted,
        }
    }
}

/// Print the report and turn a failed outcome into a non-zero exit.
pub fn finish(report: Report, flags: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let failed = report.failure().cloned();
    crate::output::output(&ReportResponse::from(report), flags.format)?;
    match failed {
        Some(failure) => Err(anyhow::Error::new(failure).context("operation did not complete")),
        None => Ok(()),
    }
}
