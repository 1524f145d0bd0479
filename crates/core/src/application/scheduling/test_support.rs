// In-memory transactional store for engine tests
//
// A transaction works on a private copy of the state and publishes it on
// commit, so rollback (explicit or by drop) leaves the shared state untouched.

use crate::application::{EngineConfig, SchedulingEngine};
use crate::domain::{
    Booking, BookingId, NewBooking, Requester, Resource, ResourceId, Slot,
};
use crate::error::{AppError, Result};
use crate::port::time_provider::SteppingTimeProvider;
use crate::port::{BookingRepository, BookingTransaction, Transaction, TransactionalBookingRepository};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub const TODAY: (i32, u32, u32) = (2030, 6, 1);

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(TODAY.0, TODAY.1, TODAY.2).unwrap()
}

pub fn tomorrow() -> NaiveDate {
    today().succ_opt().unwrap()
}

/// Where to inject a storage failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Insert,
    Update,
    Commit,
}

#[derive(Debug, Clone, Default)]
struct State {
    resources: BTreeMap<ResourceId, Resource>,
    requesters: Vec<Requester>,
    bookings: BTreeMap<BookingId, Booking>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    fail_on: Arc<Mutex<Option<FailPoint>>>,
}

impl InMemoryStore {
    /// Store seeded with Dr. Smith (id 1, 09:00-17:00) and Dr. Jones (id 2, 10:00-18:00)
    pub fn seeded() -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            for (id, name, category, start, end) in [
                (1, "Dr. Smith", "Cardiologist", 9, 17),
                (2, "Dr. Jones", "Dermatologist", 10, 18),
            ] {
                state.resources.insert(
                    id,
                    Resource {
                        id,
                        name: name.to_string(),
                        category: category.to_string(),
                        start_time: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
                        end_time: NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
                    },
                );
            }
        }
        store
    }

    pub fn fail_on(&self, point: Option<FailPoint>) {
        *self.fail_on.lock().unwrap() = point;
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.state.lock().unwrap().bookings.values().cloned().collect()
    }

    pub fn booking(&self, id: BookingId) -> Booking {
        self.state.lock().unwrap().bookings[&id].clone()
    }

    pub fn requester_count(&self) -> usize {
        self.state.lock().unwrap().requesters.len()
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn find_resource(&self, id: ResourceId) -> Result<Option<Resource>> {
        Ok(self.state.lock().unwrap().resources.get(&id).cloned())
    }

    async fn list_resources(&self) -> Result<Vec<Resource>> {
        Ok(self.state.lock().unwrap().resources.values().cloned().collect())
    }

    async fn find_booking_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        Ok(self.state.lock().unwrap().bookings.get(&id).cloned())
    }

    async fn list_active_bookings_ordered(&self) -> Result<Vec<Booking>> {
        let mut active: Vec<Booking> = self
            .state
            .lock()
            .unwrap()
            .bookings
            .values()
            .filter(|b| b.is_active())
            .cloned()
            .collect();
        active.sort_by_key(Booking::queue_key);
        Ok(active)
    }
}

#[async_trait]
impl TransactionalBookingRepository for InMemoryStore {
    async fn begin_transaction(&self) -> Result<Box<dyn BookingTransaction>> {
        let working = self.state.lock().unwrap().clone();
        Ok(Box::new(InMemoryTransaction {
            shared: Arc::clone(&self.state),
            working,
            fail_on: *self.fail_on.lock().unwrap(),
        }))
    }
}

struct InMemoryTransaction {
    shared: Arc<Mutex<State>>,
    working: State,
    fail_on: Option<FailPoint>,
}

impl InMemoryTransaction {
    fn check(&self, point: FailPoint) -> Result<()> {
        if self.fail_on == Some(point) {
            return Err(AppError::Database(format!("injected failure at {point:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.check(FailPoint::Commit)?;
        let InMemoryTransaction { shared, working, .. } = *self;
        *shared.lock().unwrap() = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl BookingTransaction for InMemoryTransaction {
    async fn find_resource(&mut self, id: ResourceId) -> Result<Option<Resource>> {
        Ok(self.working.resources.get(&id).cloned())
    }

    async fn find_requester_by_name(&mut self, name: &str) -> Result<Option<Requester>> {
        Ok(self.working.requesters.iter().find(|r| r.name == name).cloned())
    }

    async fn create_requester(&mut self, name: &str) -> Result<Requester> {
        let requester = Requester {
            id: self.working.requesters.len() as i64 + 1,
            name: name.to_string(),
        };
        self.working.requesters.push(requester.clone());
        Ok(requester)
    }

    async fn count_active_bookings(
        &mut self,
        resource_id: ResourceId,
        date: NaiveDate,
    ) -> Result<i64> {
        Ok(self
            .working
            .bookings
            .values()
            .filter(|b| b.is_active() && b.resource_id == resource_id && b.date == date)
            .count() as i64)
    }

    async fn find_active_booking(
        &mut self,
        resource_id: ResourceId,
        date: NaiveDate,
        slot: &Slot,
        exclude_id: Option<BookingId>,
    ) -> Result<Option<Booking>> {
        Ok(self
            .working
            .bookings
            .values()
            .find(|b| {
                b.is_active()
                    && b.resource_id == resource_id
                    && b.date == date
                    && b.slot == *slot
                    && Some(b.id) != exclude_id
            })
            .cloned())
    }

    async fn find_booking_by_id(&mut self, id: BookingId) -> Result<Option<Booking>> {
        Ok(self.working.bookings.get(&id).cloned())
    }

    async fn insert_booking(&mut self, booking: &NewBooking) -> Result<Booking> {
        self.check(FailPoint::Insert)?;
        let id = self.working.bookings.keys().next_back().copied().unwrap_or(0) + 1;
        let booking = booking.clone().into_booking(id);
        self.working.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    async fn update_booking(&mut self, booking: &Booking) -> Result<()> {
        self.check(FailPoint::Update)?;
        self.working.bookings.insert(booking.id, booking.clone());
        Ok(())
    }
}

/// Engine over a seeded in-memory store with a stepping clock fixed at [`today`]
pub fn engine() -> (Arc<SchedulingEngine>, Arc<InMemoryStore>) {
    engine_with(EngineConfig::default())
}

pub fn engine_with(config: EngineConfig) -> (Arc<SchedulingEngine>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::seeded());
    let clock = Arc::new(SteppingTimeProvider::new(today(), 1_000));
    let engine = Arc::new(SchedulingEngine::new(store.clone(), clock, config));
    (engine, store)
}
