//! Long-lived event stream connection feeding the replica.
//!
//! [`EventStreamSubscriber::spawn`] moves the subscriber onto a task and
//! returns a [`SubscriptionHandle`]. [`SubscriptionHandle::shutdown`] cancels
//! the task, waits for it to drop the connection, and hands the subscriber
//! back. A second connection can therefore only be opened after the first one
//! is gone.
//!
//! With a [`BulkLoader`] attached, the replica is seeded after every connect
//! and before the first event is read. Events the server emits while the
//! listing is fetched wait on the open connection and are applied on top of
//! the fresh snapshot.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt as _;
use orgsync_config::StreamConfig;
use orgsync_store::Replica;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::{EventTransport, OrganizationApi};
use crate::error::ClientError;
use crate::events::StreamEvent;
use crate::loader::{BulkLoader, LoadOutcome};
use crate::notify::{Notification, NotificationSink};
use crate::sse::{SseDecoder, SseFrame};

/// Connection lifecycle as seen by observers.
///
/// `Connected` is only published once the replica has been seeded for the
/// current connection, when a loader is attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Exponential backoff between reconnect attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub initial: Duration,
    pub max: Duration,
}

impl ReconnectPolicy {
    /// `None` unless `stream.reconnect` is enabled.
    #[must_use]
    pub fn from_config(config: &StreamConfig) -> Option<Self> {
        config.reconnect.then(|| Self {
            initial: config.initial_backoff(),
            max: config.max_backoff(),
        })
    }

    /// Delay before reconnect attempt `attempt` (zero-based): `initial`
    /// doubled per attempt, capped at `max`.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1_u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial.saturating_mul(factor).min(self.max)
    }

    /// Start the backoff from the server's `retry:` hint when it sent one.
    #[must_use]
    pub fn honoring(self, retry: Option<Duration>) -> Self {
        match retry {
            Some(initial) => Self {
                initial: initial.min(self.max),
                ..self
            },
            None => self,
        }
    }
}

/// Per-task reconnect bookkeeping carried across sessions.
#[derive(Debug, Default)]
struct Backoff {
    attempt: u32,
    retry: Option<Duration>,
}

/// Applies push events to the replica.
///
/// Events are processed one at a time, in arrival order. A payload that does
/// not decode is logged and skipped.
pub struct EventStreamSubscriber<C> {
    transport: Arc<C>,
    replica: Arc<Replica>,
    sink: Arc<dyn NotificationSink>,
    loader: Option<Arc<BulkLoader<C>>>,
    reconnect: Option<ReconnectPolicy>,
    state: watch::Sender<ConnectionState>,
}

impl<C> EventStreamSubscriber<C>
where
    C: EventTransport + OrganizationApi + 'static,
{
    pub fn new(transport: Arc<C>, replica: Arc<Replica>, sink: Arc<dyn NotificationSink>) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            transport,
            replica,
            sink,
            loader: None,
            reconnect: None,
            state,
        }
    }

    /// Seed the replica through `loader` after every successful connect.
    #[must_use]
    pub fn with_loader(mut self, loader: Arc<BulkLoader<C>>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Reconnect with backoff after the stream drops.
    #[must_use]
    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = Some(policy);
        self
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Open the connection on a new task.
    pub fn spawn(self) -> SubscriptionHandle<C> {
        let cancel = CancellationToken::new();
        let state = self.state.subscribe();
        let task = tokio::spawn(self.run(cancel.clone()));
        SubscriptionHandle {
            cancel,
            task,
            state,
        }
    }

    async fn run(self, cancel: CancellationToken) -> Self {
        let mut backoff = Backoff::default();

        loop {
            let error = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                error = self.session(&mut backoff) => error,
            };

            self.state.send_replace(ConnectionState::Disconnected);
            tracing::warn!(%error, "event stream lost");
            self.sink.notify(Notification::warning(
                "Live updates stopped",
                error.to_string(),
            ));

            let Some(policy) = &self.reconnect else {
                break;
            };
            let delay = policy.honoring(backoff.retry).delay(backoff.attempt);
            backoff.attempt = backoff.attempt.saturating_add(1);
            tracing::info!(
                attempt = backoff.attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "reconnecting to event stream"
            );
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(delay) => {}
            }
        }

        self.state.send_replace(ConnectionState::Disconnected);
        tracing::debug!("event stream subscriber stopped");
        self
    }

    /// Connect once and pump events until the stream fails or ends. Dropping
    /// this future closes the connection.
    async fn session(&self, backoff: &mut Backoff) -> ClientError {
        self.state.send_replace(ConnectionState::Connecting);
        let mut stream = match self.transport.connect().await {
            Ok(stream) => stream,
            Err(error) => return error,
        };
        backoff.attempt = 0;
        tracing::info!("event stream connected");

        if let Some(loader) = &self.loader {
            if let LoadOutcome::Failed(reason) = loader.resync().await {
                tracing::warn!(%reason, "replica not seeded, applying live events only");
            }
        }
        self.state.send_replace(ConnectionState::Connected);

        let mut decoder = SseDecoder::new();
        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(bytes) => bytes,
                Err(error) => return error,
            };
            for frame in decoder.feed(&bytes) {
                self.dispatch(&frame);
            }
            if decoder.retry().is_some() {
                backoff.retry = decoder.retry();
            }
        }
        ClientError::Stream("server closed the event stream".into())
    }

    fn dispatch(&self, frame: &SseFrame) {
        match StreamEvent::decode(frame) {
            Ok(Some(event)) => {
                tracing::debug!(event = event.name(), "applying stream event");
                self.replica.apply(event.into_mutation());
            }
            Ok(None) => tracing::debug!(event = %frame.event, "ignoring unhandled stream event"),
            Err(error) => tracing::warn!(event = %frame.event, %error, "skipping malformed stream event"),
        }
    }
}

/// Owner of a running subscription.
pub struct SubscriptionHandle<C> {
    cancel: CancellationToken,
    task: JoinHandle<EventStreamSubscriber<C>>,
    state: watch::Receiver<ConnectionState>,
}

impl<C> SubscriptionHandle<C> {
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// A receiver that observes every state transition from now on.
    #[must_use]
    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Whether the task has stopped on its own (stream lost, no reconnect).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the subscription and wait for the connection to close.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Stream`] if the subscriber task panicked.
    pub async fn shutdown(self) -> Result<EventStreamSubscriber<C>, ClientError> {
        self.cancel.cancel();
        self.task
            .await
            .map_err(|e| ClientError::Stream(format!("subscriber task failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn policy() -> ReconnectPolicy {
        ReconnectPolicy {
            initial: Duration::from_millis(500),
            max: Duration::from_secs(30),
        }
    }

    #[rstest]
    #[case(0, 500)]
    #[case(1, 1_000)]
    #[case(3, 4_000)]
    #[case(6, 30_000)]
    #[case(40, 30_000)]
    fn backoff_doubles_up_to_cap(#[case] attempt: u32, #[case] millis: u64) {
        assert_eq!(policy().delay(attempt), Duration::from_millis(millis));
    }

    #[test]
    fn server_retry_replaces_initial_delay() {
        let hinted = policy().honoring(Some(Duration::from_secs(2)));
        assert_eq!(hinted.delay(0), Duration::from_secs(2));
        assert_eq!(hinted.delay(1), Duration::from_secs(4));
        assert_eq!(hinted.delay(5), Duration::from_secs(30));

        let capped = policy().honoring(Some(Duration::from_secs(120)));
        assert_eq!(capped.delay(0), Duration::from_secs(30));

        assert_eq!(policy().honoring(None), policy());
    }

    #[test]
    fn reconnect_is_opt_in() {
        let mut config = StreamConfig::default();
        assert_eq!(ReconnectPolicy::from_config(&config), None);

        config.reconnect = true;
        assert_eq!(ReconnectPolicy::from_config(&config), Some(policy()));
    }
}
