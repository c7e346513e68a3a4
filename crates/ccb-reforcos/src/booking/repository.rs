use super::conflict::BookingConflict;
use super::domain::{BookingId, Congregation, CongregationId, ProposedBooking, ScheduledBooking};

/// Read access to the congregation records maintained by the admin screens.
pub trait CongregationDirectory: Send + Sync {
    fn get(&self, id: &CongregationId) -> Result<Option<Congregation>, RepositoryError>;
    fn list(&self) -> Result<Vec<Congregation>, RepositoryError>;
    fn upsert(&self, congregation: Congregation) -> Result<(), RepositoryError>;
}

/// Storage abstraction for scheduled reinforcement bookings.
///
/// `reserve` is the authoritative uniqueness check: an implementation must
/// refuse, atomically with the insert, a limited-type booking whose
/// `(congregation, year, month)` slot is already taken.
pub trait BookingStore: Send + Sync {
    fn snapshot(&self) -> Result<Vec<ScheduledBooking>, RepositoryError>;
    fn reserve(&self, booking: ProposedBooking) -> Result<ScheduledBooking, RepositoryError>;
    fn fetch(&self, id: &BookingId) -> Result<Option<ScheduledBooking>, RepositoryError>;
    fn cancel(&self, id: &BookingId) -> Result<ScheduledBooking, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("monthly slot already taken by {} booking(s)", .conflicts.len())]
    SlotTaken { conflicts: Vec<BookingConflict> },
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
