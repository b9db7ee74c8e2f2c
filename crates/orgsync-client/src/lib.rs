//! # orgsync-client
//!
//! Everything that talks to the organization backend:
//! - [`HttpApi`]: REST calls and the event stream, behind the
//!   [`OrganizationApi`] and [`EventTransport`] seams
//! - [`BulkLoader`]: seeds the replica from the list endpoints
//! - [`EventStreamSubscriber`]: applies server-push events to the replica
//! - [`CreationOrchestrator`]: multi-step create, minimal-diff update, delete
//!
//! User-facing outcomes go to an injected [`NotificationSink`].

pub mod api;
pub mod endpoints;
pub mod events;
pub mod loader;
pub mod notify;
pub mod orchestrator;
pub mod sse;
pub mod subscriber;

mod error;
mod http;
mod queries;

pub use api::{ByteStream, EventTransport, HttpApi, OrganizationApi};
pub use error::ClientError;
pub use events::StreamEvent;
pub use loader::{BulkLoader, LoadOutcome, LoadSummary};
pub use notify::{Level, Notification, NotificationSink, TracingSink};
pub use orchestrator::{CreationOrchestrator, Failure, OrganizationRequest, Outcome, Report, Slot};
pub use subscriber::{ConnectionState, EventStreamSubscriber, ReconnectPolicy, SubscriptionHandle};
