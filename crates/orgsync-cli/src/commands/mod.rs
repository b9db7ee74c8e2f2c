pub mod create;
pub mod delete;
pub mod report;
pub mod slots;
pub mod stats;
pub mod update;
pub mod watch;

use crate::cli::{Commands, GlobalFlags};
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Watch(args) => watch::handle(&args, ctx, flags).await,
        Commands::Create(args) => create::handle(&args, ctx, flags).await,
        Commands::Update(args) => update::handle(&args, ctx, flags).await,
        Commands::Delete { id } => delete::handle_one(id, ctx, flags).await,
        Commands::DeleteByType { kind } => delete::handle_by_type(kind, ctx, flags).await,
        Commands::Stats => stats::handle(ctx, flags).await,
    }
}
