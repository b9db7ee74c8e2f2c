use std::sync::Arc;

use orgsync_client::{
    BulkLoader, CreationOrchestrator, EventStreamSubscriber, HttpApi, NotificationSink,
    ReconnectPolicy,
};
use orgsync_config::OrgsyncConfig;
use orgsync_store::Replica;

use crate::cli::GlobalFlags;
use crate::console::ConsoleSink;

/// Everything a command needs: the backend client, the session replica, and
/// the notification sink, wired once in `main`.
pub struct AppContext {
    pub config: OrgsyncConfig,
    pub api: Arc<HttpApi>,
    pub replica: Arc<Replica>,
    pub sink: Arc<dyn NotificationSink>,
    pub loader: Arc<BulkLoader<HttpApi>>,
}

impl AppContext {
    pub fn init(config: OrgsyncConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let api = Arc::new(HttpApi::new(&config)?);
        let replica = Arc::new(Replica::new());
        let sink: Arc<dyn NotificationSink> = Arc::new(ConsoleSink::new(flags.quiet));
        let loader = Arc::new(BulkLoader::new(
            Arc::clone(&api),
            Arc::clone(&replica),
            Arc::clone(&sink),
        ));
        Ok(Self {
            config,
            api,
            replica,
            sink,
            loader,
        })
    }

    pub fn orchestrator(&self) -> CreationOrchestrator<HttpApi> {
        CreationOrchestrator::new(
            Arc::clone(&self.api),
            Arc::clone(&self.replica),
            Arc::clone(&self.sink),
        )
    }

    /// Subscriber for this session. It seeds the replica through the shared
    /// loader once connected, and reconnects when `force_reconnect` is set or
    /// the configuration enables it.
    pub fn subscriber(&self, force_reconnect: bool) -> EventStreamSubscriber<HttpApi> {
        let subscriber = EventStreamSubscriber::new(
            Arc::clone(&self.api),
            Arc::clone(&self.replica),
            Arc::clone(&self.sink),
        )
        .with_loader(Arc::clone(&self.loader));
        let mut stream = self.config.stream.clone();
        stream.reconnect |= force_reconnect;
        match ReconnectPolicy::from_config(&stream) {
            Some(policy) => subscriber.with_reconnect(policy),
            None => subscriber,
        }
    }
}
