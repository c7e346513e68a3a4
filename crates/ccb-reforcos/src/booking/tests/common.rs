use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::booking::conflict::BookingConflict;
use crate::booking::domain::{
    BookingId, Congregation, CongregationId, MeetingType, ProposedBooking, ScheduledBooking,
};
use crate::booking::memory::{InMemoryBookingStore, InMemoryCongregationDirectory};
use crate::booking::repository::{BookingStore, RepositoryError};
use crate::booking::service::ReforcoBookingService;
use crate::booking::validator::BookingPolicy;
use crate::config::BookingConfig;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Reference date used by the service fixtures; every sample booking is after it.
pub(super) fn today() -> NaiveDate {
    date(2024, 1, 1)
}

pub(super) fn policy() -> BookingPolicy {
    BookingPolicy::new(today(), false)
}

pub(super) fn congregation(id: &str, name: &str, city: &str, rjm: bool) -> Congregation {
    Congregation {
        id: CongregationId(id.to_string()),
        name: name.to_string(),
        city: city.to_string(),
        supports_youth_meeting: rjm,
    }
}

pub(super) fn congregations() -> Vec<Congregation> {
    vec![
        congregation("1", "Congregação Central", "São Paulo", true),
        congregation("2", "Congregação Norte", "Guarulhos", true),
        congregation("3", "Congregação Sul", "São Bernardo", false),
        congregation("4", "Congregação Leste", "Santo André", true),
        congregation("5", "Congregação Oeste", "Osasco", false),
    ]
}

pub(super) fn central() -> Congregation {
    congregations().remove(0)
}

pub(super) fn sul() -> Congregation {
    congregations().remove(2)
}

pub(super) fn scheduled(
    id: &str,
    congregation_id: &str,
    on: NaiveDate,
    meeting_type: MeetingType,
) -> ScheduledBooking {
    ScheduledBooking {
        id: BookingId(id.to_string()),
        congregation_id: CongregationId(congregation_id.to_string()),
        congregation_name: format!("Congregação {congregation_id}"),
        date: on,
        meeting_type,
        month: String::new(),
        year: 0,
    }
}

pub(super) type MemoryService =
    ReforcoBookingService<InMemoryCongregationDirectory, InMemoryBookingStore>;

pub(super) fn build_service(
    bookings: Vec<ScheduledBooking>,
) -> (MemoryService, Arc<InMemoryBookingStore>) {
    let directory = Arc::new(InMemoryCongregationDirectory::with_congregations(
        congregations(),
    ));
    let store = Arc::new(InMemoryBookingStore::with_bookings(bookings));
    let service = ReforcoBookingService::new(directory, store.clone(), BookingConfig::default())
        .with_fixed_today(today());
    (service, store)
}

pub(super) struct UnavailableStore;

impl BookingStore for UnavailableStore {
    fn snapshot(&self) -> Result<Vec<ScheduledBooking>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn reserve(&self, _booking: ProposedBooking) -> Result<ScheduledBooking, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &BookingId) -> Result<Option<ScheduledBooking>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn cancel(&self, _id: &BookingId) -> Result<ScheduledBooking, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Accepts every snapshot read but reports the slot as taken on reserve,
/// emulating a concurrent writer winning the race.
pub(super) struct RacingStore;

impl BookingStore for RacingStore {
    fn snapshot(&self) -> Result<Vec<ScheduledBooking>, RepositoryError> {
        Ok(Vec::new())
    }

    fn reserve(&self, booking: ProposedBooking) -> Result<ScheduledBooking, RepositoryError> {
        Err(RepositoryError::SlotTaken {
            conflicts: vec![BookingConflict {
                booking_id: BookingId("concurrent".to_string()),
                date: booking.date,
                meeting_type: MeetingType::Service,
            }],
        })
    }

    fn fetch(&self, _id: &BookingId) -> Result<Option<ScheduledBooking>, RepositoryError> {
        Ok(None)
    }

    fn cancel(&self, _id: &BookingId) -> Result<ScheduledBooking, RepositoryError> {
        Err(RepositoryError::NotFound)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
