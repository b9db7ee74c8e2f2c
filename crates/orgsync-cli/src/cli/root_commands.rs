use clap::{Args, Subcommand};
use orgsync_core::Id;
use orgsync_core::enums::OrganizationType;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Load the replica and follow the live event stream until Ctrl-C.
    Watch(WatchArgs),
    /// Create an organization, creating inline sub-resources first.
    Create(CreateArgs),
    /// Update an organization with only the fields that changed.
    Update(UpdateArgs),
    /// Delete one organization.
    Delete {
        /// Organization id.
        id: Id,
    },
    /// Delete every organization of a type.
    DeleteByType {
        /// COMMERCIAL, PUBLIC, GOVERNMENT, PRIVATE_LIMITED_COMPANY or
        /// OPEN_JOINT_STOCK_COMPANY (case-insensitive, `-` allowed).
        kind: OrganizationType,
    },
    /// Print the backend's aggregate statistics.
    Stats,
}

#[derive(Clone, Debug, Args)]
pub struct WatchArgs {
    /// Reconnect with backoff when the stream drops (overrides `stream.reconnect`).
    #[arg(long)]
    pub reconnect: bool,
}

/// Sub-resource selection shared by create and update.
///
/// Each slot takes either an existing id or the values of a new record.
#[derive(Clone, Debug, Default, Args)]
pub struct SlotArgs {
    /// Use existing coordinates.
    #[arg(long, conflicts_with_all = ["x", "y"])]
    pub coordinates_id: Option<Id>,
    /// X of new coordinates (at most 442).
    #[arg(long, allow_negative_numbers = true, requires = "y")]
    pub x: Option<i32>,
    /// Y of new coordinates.
    #[arg(long, allow_negative_numbers = true, requires = "x")]
    pub y: Option<i64>,

    /// Use an existing address.
    #[arg(long, conflicts_with_all = ["street", "zip"])]
    pub address_id: Option<Id>,
    /// Street of a new address.
    #[arg(long, requires = "zip")]
    pub street: Option<String>,
    /// Zip of a new address.
    #[arg(long, requires = "street")]
    pub zip: Option<String>,

    /// Use an existing postal address.
    #[arg(long, conflicts_with_all = ["postal_street", "postal_zip"])]
    pub postal_address_id: Option<Id>,
    /// Street of a new postal address.
    #[arg(long, requires = "postal_zip")]
    pub postal_street: Option<String>,
    /// Zip of a new postal address.
    #[arg(long, requires = "postal_street")]
    pub postal_zip: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub full_name: String,
    #[arg(long)]
    pub annual_turnover: i64,
    #[arg(long)]
    pub employees_count: i64,
    #[arg(long)]
    pub rating: i64,
    /// Organization type; omit for none.
    #[arg(long = "type")]
    pub kind: Option<OrganizationType>,
    #[command(flatten)]
    pub slots: SlotArgs,
}

#[derive(Clone, Debug, Args)]
pub struct UpdateArgs {
    /// Organization id.
    pub id: Id,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub annual_turnover: Option<i64>,
    #[arg(long)]
    pub employees_count: Option<i64>,
    #[arg(long)]
    pub rating: Option<i64>,
    /// New organization type.
    #[arg(long = "type", conflicts_with = "clear_type")]
    pub kind: Option<OrganizationType>,
    /// Remove the organization type.
    #[arg(long)]
    pub clear_type: bool,
    #[command(flatten)]
    pub slots: SlotArgs,
}
