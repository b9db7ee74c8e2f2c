//! Initial full-collection fetch.

use std::sync::Arc;

use orgsync_core::entities::OrganizationEnvelope;
use orgsync_store::{Replica, ReplicaCounts};
use tokio::sync::Mutex;

use crate::api::OrganizationApi;
use crate::error::ClientError;
use crate::notify::{Notification, NotificationSink};

/// Record counts seeded by a successful load.
pub type LoadSummary = ReplicaCounts;

/// Result of [`BulkLoader::load`] or [`BulkLoader::resync`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(LoadSummary),
    /// A previous `load` already succeeded; nothing was fetched.
    AlreadyLoaded,
    /// At least one fetch failed; no store was touched.
    Failed(String),
}

/// Seeds the replica from the three list endpoints.
///
/// The three fetches run concurrently and the replica is only written when all
/// three succeed. `load` seeds at most once per loader; `resync` always
/// fetches and is what the event stream subscriber runs after each connect.
pub struct BulkLoader<A> {
    api: Arc<A>,
    replica: Arc<Replica>,
    sink: Arc<dyn NotificationSink>,
    loaded: Mutex<bool>,
}

impl<A: OrganizationApi> BulkLoader<A> {
    pub fn new(api: Arc<A>, replica: Arc<Replica>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            api,
            replica,
            sink,
            loaded: Mutex::new(false),
        }
    }

    /// Seed the replica unless a previous call already did.
    ///
    /// Concurrent callers are serialized: the second one waits and then sees
    /// [`LoadOutcome::AlreadyLoaded`].
    pub async fn load(&self) -> LoadOutcome {
        let mut loaded = self.loaded.lock().await;
        if *loaded {
            tracing::debug!("replica already loaded, skipping bulk fetch");
            return LoadOutcome::AlreadyLoaded;
        }
        let outcome = self.fetch_and_seed().await;
        if matches!(outcome, LoadOutcome::Loaded(_)) {
            *loaded = true;
        }
        outcome
    }

    /// Fetch and replace everything, loaded or not.
    pub async fn resync(&self) -> LoadOutcome {
        let mut loaded = self.loaded.lock().await;
        let outcome = self.fetch_and_seed().await;
        if matches!(outcome, LoadOutcome::Loaded(_)) {
            *loaded = true;
        }
        outcome
    }

    pub async fn is_loaded(&self) -> bool {
        *self.loaded.lock().await
    }

    async fn fetch_and_seed(&self) -> LoadOutcome {
        let (organizations, addresses, coordinates) = tokio::join!(
            self.api.list_organizations(),
            self.api.list_addresses(),
            self.api.list_coordinates(),
        );

        let fetched = organizations.and_then(|orgs| Ok((orgs, addresses?, coordinates?)));
        match fetched {
            Ok((organizations, addresses, coordinates)) => {
                let organizations = organizations
                    .into_iter()
                    .map(OrganizationEnvelope::into_organization)
                    .collect();
                let counts = self.replica.seed(organizations, addresses, coordinates);
                tracing::info!(
                    organizations = counts.organizations,
                    addresses = counts.addresses,
                    coordinates = counts.coordinates,
                    "replica seeded"
                );
                LoadOutcome::Loaded(counts)
            }
            Err(error) => {
                tracing::error!(%error, "bulk load failed");
                self.sink
                    .notify(Notification::error("Failed to load data", describe(&error)));
                LoadOutcome::Failed(error.to_string())
            }
        }
    }
}

fn describe(error: &ClientError) -> String {
    match error {
        ClientError::Unauthorized => "You are not authorized to view organizations".into(),
        other => other.to_string(),
    }
}
