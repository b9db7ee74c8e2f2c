use anyhow::{Context, bail};
use orgsync_client::ConnectionState;
use orgsync_core::entities::{Address, Coordinates, Organization};
use orgsync_store::{Replica, ReplicaCounts, Snapshot};
use serde::Serialize;
use tokio::sync::watch;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::WatchArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize, PartialEq, Eq)]
struct ReplicaLine {
    state: &'static str,
    organizations: usize,
    addresses: usize,
    coordinates: usize,
}

impl ReplicaLine {
    const fn new(state: ConnectionState, counts: ReplicaCounts) -> Self {
        let state = match state {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        Self {
            state,
            organizations: counts.organizations,
            addresses: counts.addresses,
            coordinates: counts.coordinates,
        }
    }
}

/// Handle `orgsync watch`.
///
/// Opens the event stream, which seeds the replica once connected, and prints
/// one line per replica change until Ctrl-C or, without reconnect, until the
/// stream drops.
pub async fn handle(args: &WatchArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let reconnects = args.reconnect || ctx.config.stream.reconnect;
    let handle = ctx.subscriber(args.reconnect).spawn();
    let mut states = handle.state_changes();
    let mut changes = Changes::new(&ctx.replica);
    let mut seeded = false;
    let mut interrupted = false;

    emit(handle.state(), &ctx.replica, flags)?;
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl-C")?;
                tracing::info!("interrupted, closing event stream");
                interrupted = true;
                break;
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *states.borrow_and_update();
                if state == ConnectionState::Connected && !seeded {
                    if !ctx.loader.is_loaded().await {
                        break;
                    }
                    seeded = true;
                }
                emit(state, &ctx.replica, flags)?;
                if state == ConnectionState::Disconnected && !reconnects {
                    break;
                }
            }
            () = changes.next() => emit(handle.state(), &ctx.replica, flags)?,
        }
    }

    handle.shutdown().await?;
    if !seeded && !interrupted {
        bail!("could not load organizations");
    }
    Ok(())
}

fn emit(state: ConnectionState, replica: &Replica, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ReplicaLine::new(state, replica.counts()), flags.format)
}

/// Resolves whenever any of the three stores changes.
struct Changes {
    organizations: watch::Receiver<Snapshot<Organization>>,
    addresses: watch::Receiver<Snapshot<Address>>,
    coordinates: watch::Receiver<Snapshot<Coordinates>>,
}

impl Changes {
    fn new(replica: &Replica) -> Self {
        Self {
            organizations: replica.organizations.subscribe(),
            addresses: replica.addresses.subscribe(),
            coordinates: replica.coordinates.subscribe(),
        }
    }

    /// Pends forever once every store's sender is gone.
    async fn next(&mut self) {
        let changed = tokio::select! {
            r = self.organizations.changed() => r,
            r = self.addresses.changed() => r,
            r = self.coordinates.changed() => r,
        };
        if changed.is_err() {
            std::future::pending::<()>().await;
        }
        // One line per burst: changes seen so far in any store are consumed.
        self.organizations.borrow_and_update();
        self.addresses.borrow_and_update();
        self.coordinates.borrow_and_update();
    }
}
