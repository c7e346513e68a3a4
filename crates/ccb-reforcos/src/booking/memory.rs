use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::conflict::{check_conflict, ConflictResult};
use super::domain::{BookingId, Congregation, CongregationId, ProposedBooking, ScheduledBooking};
use super::repository::{BookingStore, CongregationDirectory, RepositoryError};

const ID_PREFIX: &str = "rf-";

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{name} mutex poisoned")))
}

/// Process-local congregation directory.
#[derive(Debug, Default)]
pub struct InMemoryCongregationDirectory {
    records: Mutex<BTreeMap<CongregationId, Congregation>>,
}

impl InMemoryCongregationDirectory {
    pub fn with_congregations(congregations: impl IntoIterator<Item = Congregation>) -> Self {
        let records = congregations
            .into_iter()
            .map(|congregation| (congregation.id.clone(), congregation))
            .collect();
        Self {
            records: Mutex::new(records),
        }
    }
}

impl CongregationDirectory for InMemoryCongregationDirectory {
    fn get(&self, id: &CongregationId) -> Result<Option<Congregation>, RepositoryError> {
        let guard = lock(&self.records, "directory")?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Congregation>, RepositoryError> {
        let guard = lock(&self.records, "directory")?;
        Ok(guard.values().cloned().collect())
    }

    fn upsert(&self, congregation: Congregation) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records, "directory")?;
        guard.insert(congregation.id.clone(), congregation);
        Ok(())
    }
}

/// Process-local booking store.
///
/// The slot check and the insert run under the same lock, so concurrent
/// callers cannot both claim one `(congregation, year, month)` slot.
#[derive(Debug)]
pub struct InMemoryBookingStore {
    bookings: Mutex<Vec<ScheduledBooking>>,
    sequence: AtomicU64,
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::with_bookings(Vec::new())
    }
}

impl InMemoryBookingStore {
    /// Seed the store with already persisted bookings. Seeds are not re-validated;
    /// new ids continue after the highest seeded `rf-` number.
    pub fn with_bookings(bookings: Vec<ScheduledBooking>) -> Self {
        let last = bookings
            .iter()
            .filter_map(|booking| booking.id.0.strip_prefix(ID_PREFIX)?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            sequence: AtomicU64::new(last + 1),
            bookings: Mutex::new(bookings),
        }
    }

    fn next_id(&self) -> BookingId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        BookingId(format!("{ID_PREFIX}{id:06}"))
    }
}

impl BookingStore for InMemoryBookingStore {
    fn snapshot(&self) -> Result<Vec<ScheduledBooking>, RepositoryError> {
        let guard = lock(&self.bookings, "booking store")?;
        Ok(guard.clone())
    }

    fn reserve(&self, booking: ProposedBooking) -> Result<ScheduledBooking, RepositoryError> {
        let mut guard = lock(&self.bookings, "booking store")?;

        if let ConflictResult::Conflict(conflicts) = check_conflict(&booking.request(), &guard) {
            return Err(RepositoryError::SlotTaken { conflicts });
        }

        let stored = ScheduledBooking::from_proposed(self.next_id(), booking);
        guard.push(stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: &BookingId) -> Result<Option<ScheduledBooking>, RepositoryError> {
        let guard = lock(&self.bookings, "booking store")?;
        Ok(guard.iter().find(|booking| &booking.id == id).cloned())
    }

    fn cancel(&self, id: &BookingId) -> Result<ScheduledBooking, RepositoryError> {
        let mut guard = lock(&self.bookings, "booking store")?;
        let index = guard
            .iter()
            .position(|booking| &booking.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(index))
    }
}
