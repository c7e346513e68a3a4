use ccb_reforcos::booking::{
    BookingId, BookingRequest, Congregation, CongregationId, InMemoryBookingStore,
    InMemoryCongregationDirectory, MeetingType, ProposedBooking, ReforcoBookingService,
    ScheduledBooking,
};
use ccb_reforcos::config::BookingConfig;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type SeededService =
    ReforcoBookingService<InMemoryCongregationDirectory, InMemoryBookingStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Directory used by the demo deployment until a persistent one is wired in.
pub(crate) fn seed_congregations() -> Vec<Congregation> {
    [
        ("1", "Congregação Central", "São Paulo", true),
        ("2", "Congregação Norte", "Guarulhos", true),
        ("3", "Congregação Sul", "São Bernardo", false),
        ("4", "Congregação Leste", "Santo André", true),
        ("5", "Congregação Oeste", "Osasco", false),
    ]
    .into_iter()
    .map(|(id, name, city, supports_youth_meeting)| Congregation {
        id: CongregationId(id.to_string()),
        name: name.to_string(),
        city: city.to_string(),
        supports_youth_meeting,
    })
    .collect()
}

pub(crate) fn seed_bookings() -> Vec<ScheduledBooking> {
    let directory = seed_congregations();
    [
        ("1", (2024, 1, 15), MeetingType::Service),
        ("2", (2024, 1, 20), MeetingType::YouthMeeting),
        ("4", (2024, 1, 25), MeetingType::Collection),
    ]
    .into_iter()
    .enumerate()
    .filter_map(|(index, (congregation_id, (year, month, day), meeting_type))| {
        let congregation = directory
            .iter()
            .find(|congregation| congregation.id.0 == congregation_id)?;
        let request = BookingRequest {
            congregation_id: congregation.id.clone(),
            date: NaiveDate::from_ymd_opt(year, month, day)?,
            meeting_type,
        };
        Some(ScheduledBooking::from_proposed(
            BookingId(format!("rf-{:06}", index + 1)),
            ProposedBooking::new(request, congregation),
        ))
    })
    .collect()
}

pub(crate) fn seeded_service(config: BookingConfig) -> SeededService {
    let directory = Arc::new(InMemoryCongregationDirectory::with_congregations(
        seed_congregations(),
    ));
    let store = Arc::new(InMemoryBookingStore::with_bookings(seed_bookings()));
    ReforcoBookingService::new(directory, store, config)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD or DD/MM/YYYY ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccb_reforcos::booking::{check_conflict, check_eligibility, EligibilityResult};

    #[test]
    fn parse_date_accepts_iso_and_brazilian_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date");
        assert_eq!(parse_date("2024-03-09"), Ok(expected));
        assert_eq!(parse_date(" 09/03/2024 "), Ok(expected));
        assert!(parse_date("March 9th").is_err());
    }

    #[test]
    fn seeded_bookings_satisfy_the_booking_rules() {
        let directory = seed_congregations();
        let bookings = seed_bookings();
        assert_eq!(bookings.len(), 3);

        for (index, booking) in bookings.iter().enumerate() {
            let congregation = directory
                .iter()
                .find(|congregation| congregation.id == booking.congregation_id)
                .expect("seeded congregation exists");
            let request = BookingRequest {
                congregation_id: booking.congregation_id.clone(),
                date: booking.date,
                meeting_type: booking.meeting_type,
            };
            assert_eq!(
                check_eligibility(&request, congregation),
                EligibilityResult::Eligible
            );

            let others: Vec<ScheduledBooking> = bookings
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .map(|(_, booking)| booking.clone())
                .collect();
            assert!(!check_conflict(&request, &others).is_conflict());
        }
    }

    #[test]
    fn seeded_ids_follow_store_numbering() {
        let ids: Vec<String> = seed_bookings()
            .into_iter()
            .map(|booking| booking.id.0)
            .collect();
        assert_eq!(ids, vec!["rf-000001", "rf-000002", "rf-000003"]);
    }
}
