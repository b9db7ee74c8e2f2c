//! In-memory backend and notification sink shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use futures_util::StreamExt as _;
use orgsync_client::{ByteStream, ClientError, EventTransport, Notification, NotificationSink, OrganizationApi};
use orgsync_core::Id;
use orgsync_core::drafts::{AddressDraft, CoordinatesDraft, NewOrganization, OrganizationPatch};
use orgsync_core::entities::{Address, Coordinates, Organization, OrganizationEnvelope};
use orgsync_core::enums::OrganizationType;
use tokio::sync::mpsc;

pub type Chunk = Result<Vec<u8>, ClientError>;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListOrganizations,
    ListAddresses,
    ListCoordinates,
    CreateCoordinates(CoordinatesDraft),
    CreateAddress(AddressDraft),
    CreateOrganization(NewOrganization),
    UpdateOrganization(Id, OrganizationPatch),
    DeleteOrganization(Id),
    DeleteByType(OrganizationType),
    Connect,
}

impl Call {
    const fn op(&self) -> Op {
        match self {
            Self::ListOrganizations => Op::ListOrganizations,
            Self::ListAddresses => Op::ListAddresses,
            Self::ListCoordinates => Op::ListCoordinates,
            Self::CreateCoordinates(_) => Op::CreateCoordinates,
            Self::CreateAddress(_) => Op::CreateAddress,
            Self::CreateOrganization(_) => Op::CreateOrganization,
            Self::UpdateOrganization(..) => Op::UpdateOrganization,
            Self::DeleteOrganization(_) => Op::DeleteOrganization,
            Self::DeleteByType(_) => Op::DeleteByType,
            Self::Connect => Op::Connect,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListOrganizations,
    ListAddresses,
    ListCoordinates,
    CreateCoordinates,
    CreateAddress,
    CreateOrganization,
    UpdateOrganization,
    DeleteOrganization,
    DeleteByType,
    Connect,
}

/// How a scripted call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Unauthorized,
    Status(u16),
    Transport,
}

impl Fault {
    fn error(self) -> ClientError {
        match self {
            Self::Unauthorized => ClientError::Unauthorized,
            Self::Status(status) => ClientError::Api {
                status,
                message: String::new(),
            },
            Self::Transport => ClientError::Parse("connection reset".into()),
        }
    }
}

/// Records every call; creation calls hand out ids from 100 upward.
#[derive(Default)]
pub struct FakeBackend {
    pub organizations: Mutex<Vec<OrganizationEnvelope>>,
    pub addresses: Mutex<Vec<Address>>,
    pub coordinates: Mutex<Vec<Coordinates>>,
    calls: Mutex<Vec<Call>>,
    faults: Mutex<HashMap<Op, Fault>>,
    streams: Mutex<VecDeque<mpsc::UnboundedReceiver<Chunk>>>,
    next_id: AtomicI64,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(100),
            ..Self::default()
        }
    }

    pub fn with_listing(
        organizations: Vec<Organization>,
        addresses: Vec<Address>,
        coordinates: Vec<Coordinates>,
    ) -> Self {
        let backend = Self::new();
        *backend.organizations.lock().unwrap() = organizations
            .into_iter()
            .map(|org| OrganizationEnvelope {
                owner_id: org.owner_id,
                organization: org,
            })
            .collect();
        *backend.addresses.lock().unwrap() = addresses;
        *backend.coordinates.lock().unwrap() = coordinates;
        backend
    }

    pub fn fail(&self, op: Op, fault: Fault) {
        self.faults.lock().unwrap().insert(op, fault);
    }

    pub fn heal(&self, op: Op) {
        self.faults.lock().unwrap().remove(&op);
    }

    /// Queue a stream for the next `connect`. Dropping the sender ends it.
    pub fn open_stream(&self) -> mpsc::UnboundedSender<Chunk> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.streams.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls().iter().filter(|call| call.op() == op).count()
    }

    fn record(&self, call: Call) -> Result<(), ClientError> {
        let op = call.op();
        self.calls.lock().unwrap().push(call);
        match self.faults.lock().unwrap().get(&op) {
            Some(fault) => Err(fault.error()),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> Id {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl OrganizationApi for FakeBackend {
    async fn list_organizations(&self) -> Result<Vec<OrganizationEnvelope>, ClientError> {
        self.record(Call::ListOrganizations)?;
        Ok(self.organizations.lock().unwrap().clone())
    }

    async fn list_addresses(&self) -> Result<Vec<Address>, ClientError> {
        self.record(Call::ListAddresses)?;
        Ok(self.addresses.lock().unwrap().clone())
    }

    async fn list_coordinates(&self) -> Result<Vec<Coordinates>, ClientError> {
        self.record(Call::ListCoordinates)?;
        Ok(self.coordinates.lock().unwrap().clone())
    }

    async fn create_coordinates(&self, draft: &CoordinatesDraft) -> Result<Id, ClientError> {
        self.record(Call::CreateCoordinates(*draft))?;
        Ok(self.next_id())
    }

    async fn create_address(&self, draft: &AddressDraft) -> Result<Id, ClientError> {
        self.record(Call::CreateAddress(draft.clone()))?;
        Ok(self.next_id())
    }

    async fn create_organization(&self, body: &NewOrganization) -> Result<(), ClientError> {
        self.record(Call::CreateOrganization(body.clone()))
    }

    async fn update_organization(
        &self,
        id: Id,
        patch: &OrganizationPatch,
    ) -> Result<(), ClientError> {
        self.record(Call::UpdateOrganization(id, patch.clone()))
    }

    async fn delete_organization(&self, id: Id) -> Result<Vec<Id>, ClientError> {
        self.record(Call::DeleteOrganization(id))?;
        Ok(vec![id])
    }

    async fn delete_by_type(&self, kind: OrganizationType) -> Result<Vec<Id>, ClientError> {
        self.record(Call::DeleteByType(kind))?;
        Ok(self
            .organizations
            .lock()
            .unwrap()
            .iter()
            .filter(|env| env.organization.kind == Some(kind))
            .map(|env| env.organization.id)
            .collect())
    }
}

impl EventTransport for FakeBackend {
    async fn connect(&self) -> Result<ByteStream, ClientError> {
        self.record(Call::Connect)?;
        let rx = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ClientError::Stream("connection refused".into()))?;
        Ok(futures_util::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|chunk| (chunk, rx))
        })
        .boxed())
    }
}

/// Sink that keeps every notification.
#[derive(Default)]
pub struct RecordingSink {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn seen(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.seen().into_iter().map(|n| n.title).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

// ── Fixtures ───────────────────────────────────────────────────────

pub fn coordinates(id: Id, x: i32, y: i64) -> Coordinates {
    Coordinates { id, x, y }
}

pub fn address(id: Id, street: &str, zip: &str) -> Address {
    Address {
        id,
        street: street.into(),
        zip: zip.into(),
    }
}

pub fn organization(id: Id, name: &str) -> Organization {
    Organization {
        id,
        name: name.into(),
        full_name: format!("{name} Holdings"),
        coordinates: coordinates(1, 5, 10),
        creation_date: "2025-03-01".into(),
        address: address(3, "Main", "00001"),
        annual_turnover: 1000,
        employees_count: 12,
        rating: 4,
        kind: Some(OrganizationType::Commercial),
        postal_address: address(4, "Side", "00002"),
        owner_id: 42,
    }
}

/// One SSE frame as raw bytes.
pub fn frame(event: &str, data: &str) -> Vec<u8> {
    format!("event: {event}\ndata: {data}\n\n").into_bytes()
}

pub fn envelope_json(org: &Organization) -> String {
    serde_json::json!({
        "organization": org,
        "ownerId": org.owner_id,
    })
    .to_string()
}

/// Wait until `condition` holds, polling briefly.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
