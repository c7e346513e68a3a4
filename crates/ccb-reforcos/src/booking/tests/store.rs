use std::sync::{Arc, Barrier};
use std::thread;

use super::common::*;
use crate::booking::domain::{BookingId, MeetingType, ProposedBooking};
use crate::booking::memory::{InMemoryBookingStore, InMemoryCongregationDirectory};
use crate::booking::repository::{BookingStore, CongregationDirectory, RepositoryError};

fn proposed(congregation_id: &str, day: u32, meeting_type: MeetingType) -> ProposedBooking {
    let congregation = congregations()
        .into_iter()
        .find(|congregation| congregation.id.0 == congregation_id)
        .expect("known congregation");
    ProposedBooking::new(
        crate::booking::BookingRequest {
            congregation_id: congregation.id.clone(),
            date: date(2024, 9, day),
            meeting_type,
        },
        &congregation,
    )
}

#[test]
fn reserve_refuses_a_taken_slot_even_without_validation() {
    let store = InMemoryBookingStore::default();
    let first = store
        .reserve(proposed("1", 7, MeetingType::Service))
        .expect("first reservation");

    match store.reserve(proposed("1", 21, MeetingType::YouthMeeting)) {
        Err(RepositoryError::SlotTaken { conflicts }) => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].booking_id, first.id);
        }
        other => panic!("expected slot taken, got {other:?}"),
    }

    store
        .reserve(proposed("1", 14, MeetingType::Collection))
        .expect("collection always fits");
}

#[test]
fn concurrent_reservations_leave_one_winner() {
    let store = Arc::new(InMemoryBookingStore::default());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (1..=8)
        .map(|day| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.reserve(proposed("2", day, MeetingType::Service)).is_ok()
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread finishes"))
        .filter(|won| *won)
        .count();

    assert_eq!(winners, 1);
    assert_eq!(store.snapshot().expect("snapshot").len(), 1);
}

#[test]
fn seeded_ids_do_not_collide_with_new_ones() {
    let store = InMemoryBookingStore::with_bookings(vec![scheduled(
        "rf-000001",
        "4",
        date(2024, 1, 25),
        MeetingType::Collection,
    )]);

    let stored = store
        .reserve(proposed("4", 2, MeetingType::Service))
        .expect("reservation");
    assert_eq!(stored.id, BookingId("rf-000002".to_string()));
}

#[test]
fn new_ids_continue_after_the_highest_seeded_number() {
    let store = InMemoryBookingStore::with_bookings(vec![
        scheduled("rf-000003", "1", date(2024, 1, 15), MeetingType::Service),
        scheduled("legacy-7", "2", date(2024, 1, 20), MeetingType::YouthMeeting),
    ]);

    let first = store
        .reserve(proposed("1", 7, MeetingType::Service))
        .expect("september reservation");
    let second = store
        .reserve(proposed("2", 7, MeetingType::Service))
        .expect("second reservation");

    assert_eq!(first.id, BookingId("rf-000004".to_string()));
    assert_eq!(second.id, BookingId("rf-000005".to_string()));

    let mut ids: Vec<BookingId> = store
        .snapshot()
        .expect("snapshot")
        .into_iter()
        .map(|booking| booking.id)
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);

    let seeded = store
        .fetch(&BookingId("rf-000003".to_string()))
        .expect("fetch")
        .expect("seed still present");
    assert_eq!(seeded.date, date(2024, 1, 15));
}

#[test]
fn cancel_unknown_booking_is_not_found() {
    let store = InMemoryBookingStore::default();
    assert!(matches!(
        store.cancel(&BookingId("missing".to_string())),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn directory_upsert_replaces_records() {
    let directory = InMemoryCongregationDirectory::default();
    directory
        .upsert(congregation("3", "Congregação Sul", "São Bernardo", false))
        .expect("insert");
    directory
        .upsert(congregation("3", "Congregação Sul", "São Bernardo", true))
        .expect("update");

    let record = directory
        .get(&crate::booking::CongregationId("3".to_string()))
        .expect("get")
        .expect("present");
    assert!(record.supports_youth_meeting);
    assert_eq!(directory.list().expect("list").len(), 1);
}
