//! Stream subscriber driving the replica from scripted server events.

mod common;

use std::sync::Arc;
use std::time::Duration;

use orgsync_client::{
    BulkLoader, ClientError, ConnectionState, EventStreamSubscriber, Level, ReconnectPolicy,
};
use orgsync_core::entities::Organization;
use orgsync_store::Replica;
use pretty_assertions::assert_eq;

use common::{
    FakeBackend, Op, RecordingSink, address, coordinates, envelope_json, eventually, frame,
    organization,
};

struct Harness {
    backend: Arc<FakeBackend>,
    replica: Arc<Replica>,
    sink: Arc<RecordingSink>,
}

impl Harness {
    fn new(backend: FakeBackend) -> Self {
        Self {
            backend: Arc::new(backend),
            replica: Arc::new(Replica::new()),
            sink: Arc::new(RecordingSink::default()),
        }
    }

    fn subscriber(&self) -> EventStreamSubscriber<FakeBackend> {
        EventStreamSubscriber::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.replica),
            self.sink.clone(),
        )
    }
}

fn renamed(org: &Organization, name: &str) -> Organization {
    Organization {
        name: name.into(),
        ..org.clone()
    }
}

#[tokio::test]
async fn created_event_becomes_visible() {
    let h = Harness::new(FakeBackend::new());
    let tx = h.backend.open_stream();
    let handle = h.subscriber().spawn();
    let mut changes = h.replica.organizations.subscribe();

    let org = organization(7, "Acme");
    tx.send(Ok(frame("ORGANIZATION_CREATED", &envelope_json(&org))))
        .unwrap();

    tokio::time::timeout(Duration::from_secs(2), changes.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(h.replica.organizations.get(7), Some(org));
    assert_eq!(handle.state(), ConnectionState::Connected);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn events_split_across_chunks_apply_in_order() {
    let h = Harness::new(FakeBackend::new());
    let tx = h.backend.open_stream();
    let handle = h.subscriber().spawn();

    let org = organization(7, "Acme");
    let mut bytes = frame("ORGANIZATION_CREATED", &envelope_json(&org));
    bytes.extend(frame(
        "ORGANIZATION_UPDATED",
        &envelope_json(&renamed(&org, "Acme Two")),
    ));
    bytes.extend(frame("COORDINATES_CREATED", r#"{"id":2,"x":-1,"y":8}"#));
    bytes.extend(frame("ADDRESS_CREATED", r#"{"id":9,"street":"Elm","zip":"12345"}"#));
    for chunk in bytes.chunks(7) {
        tx.send(Ok(chunk.to_vec())).unwrap();
    }

    eventually(|| h.replica.addresses.contains(9)).await;
    assert_eq!(h.replica.organizations.get(7).unwrap().name, "Acme Two");
    assert_eq!(h.replica.coordinates.get(2), Some(coordinates(2, -1, 8)));
    assert_eq!(h.replica.addresses.get(9), Some(address(9, "Elm", "12345")));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn out_of_order_events_converge() {
    let h = Harness::new(FakeBackend::new());
    let tx = h.backend.open_stream();
    let handle = h.subscriber().spawn();

    let org = organization(7, "Acme");
    tx.send(Ok(frame("ORGANIZATION_DELETED", "99"))).unwrap();
    tx.send(Ok(frame("ORGANIZATION_UPDATED", &envelope_json(&org))))
        .unwrap();
    tx.send(Ok(frame("ORGANIZATION_DELETED", "7"))).unwrap();
    tx.send(Ok(frame("ORGANIZATION_DELETED", "7"))).unwrap();
    tx.send(Ok(frame("COORDINATES_CREATED", r#"{"id":1,"x":0,"y":0}"#)))
        .unwrap();

    eventually(|| h.replica.coordinates.contains(1)).await;
    assert!(h.replica.organizations.is_empty());

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn malformed_and_unknown_events_are_skipped() {
    let h = Harness::new(FakeBackend::new());
    let tx = h.backend.open_stream();
    let handle = h.subscriber().spawn();

    tx.send(Ok(frame("ORGANIZATION_CREATED", "{not json"))).unwrap();
    tx.send(Ok(frame("USER_LOGGED_IN", "{}"))).unwrap();
    tx.send(Ok(b"data: plain message\n\n".to_vec())).unwrap();
    tx.send(Ok(frame("ADDRESS_CREATED", r#"{"id":5,"street":"A","zip":"1"}"#)))
        .unwrap();

    eventually(|| h.replica.addresses.contains(5)).await;
    assert!(h.replica.organizations.is_empty());
    assert_eq!(handle.state(), ConnectionState::Connected);
    assert!(h.sink.seen().is_empty());

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_returns_subscriber_disconnected() {
    let h = Harness::new(FakeBackend::new());
    let first = h.backend.open_stream();
    let handle = h.subscriber().spawn();
    let mut states = handle.state_changes();
    states
        .wait_for(|s| *s == ConnectionState::Connected)
        .await
        .unwrap();
    assert!(!first.is_closed());

    let subscriber = handle.shutdown().await.unwrap();

    assert!(first.is_closed(), "connection must be gone once shutdown returns");
    assert_eq!(subscriber.state(), ConnectionState::Disconnected);
    assert_eq!(h.backend.count(Op::Connect), 1);
    assert!(h.sink.seen().is_empty(), "a requested shutdown is not a warning");

    let second = h.backend.open_stream();
    let again = subscriber.spawn();
    let mut states = again.state_changes();
    states
        .wait_for(|s| *s == ConnectionState::Connected)
        .await
        .unwrap();
    assert_eq!(h.backend.count(Op::Connect), 2);
    again.shutdown().await.unwrap();
    assert!(second.is_closed());
}

#[tokio::test]
async fn stream_end_without_reconnect_stops_with_warning() {
    let h = Harness::new(FakeBackend::new());
    let tx = h.backend.open_stream();
    let handle = h.subscriber().spawn();

    tx.send(Err(ClientError::Stream("reset by peer".into())))
        .unwrap();

    eventually(|| handle.is_finished()).await;
    assert_eq!(handle.state(), ConnectionState::Disconnected);
    let seen = h.sink.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].level, Level::Warning);
    assert_eq!(h.backend.count(Op::Connect), 1);

    handle.shutdown().await.unwrap();
}

fn loader(h: &Harness) -> Arc<BulkLoader<FakeBackend>> {
    Arc::new(BulkLoader::new(
        Arc::clone(&h.backend),
        Arc::clone(&h.replica),
        h.sink.clone(),
    ))
}

#[tokio::test]
async fn events_emitted_during_seeding_survive_it() {
    let h = Harness::new(FakeBackend::with_listing(
        vec![organization(7, "Acme")],
        vec![],
        vec![],
    ));
    let tx = h.backend.open_stream();
    // Already waiting on the connection when the listing is fetched.
    let late = organization(9, "Globex");
    tx.send(Ok(frame("ORGANIZATION_CREATED", &envelope_json(&late))))
        .unwrap();

    let handle = h.subscriber().with_loader(loader(&h)).spawn();
    let mut states = handle.state_changes();
    states
        .wait_for(|s| *s == ConnectionState::Connected)
        .await
        .unwrap();
    assert!(h.replica.organizations.contains(7), "seeded before connected");

    eventually(|| h.replica.organizations.contains(9)).await;
    assert!(h.replica.organizations.contains(7));
    assert_eq!(h.backend.count(Op::ListOrganizations), 1);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn reconnect_resyncs_the_replica() {
    let h = Harness::new(FakeBackend::with_listing(
        vec![organization(7, "Acme")],
        vec![],
        vec![],
    ));
    let policy = ReconnectPolicy {
        initial: Duration::from_millis(1),
        max: Duration::from_millis(5),
    };

    let first = h.backend.open_stream();
    let _second = h.backend.open_stream();
    let handle = h
        .subscriber()
        .with_loader(loader(&h))
        .with_reconnect(policy)
        .spawn();
    eventually(|| h.replica.organizations.contains(7)).await;

    // Deleted upstream; only the resync can reveal it.
    h.backend.organizations.lock().unwrap().clear();
    drop(first);

    eventually(|| h.backend.count(Op::Connect) == 2).await;
    eventually(|| h.replica.organizations.is_empty()).await;
    assert_eq!(h.backend.count(Op::ListOrganizations), 2);

    let subscriber = handle.shutdown().await.unwrap();
    assert_eq!(subscriber.state(), ConnectionState::Disconnected);
}
