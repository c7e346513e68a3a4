use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{BookingId, BookingRequest, MeetingType, ScheduledBooking};

/// Existing booking occupying the monthly slot a request wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConflict {
    pub booking_id: BookingId,
    pub date: NaiveDate,
    pub meeting_type: MeetingType,
}

impl BookingConflict {
    fn of(booking: &ScheduledBooking) -> Self {
        Self {
            booking_id: booking.id.clone(),
            date: booking.date,
            meeting_type: booking.meeting_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictResult {
    NoConflict,
    /// Monthly limit exceeded; lists every conflicting booking.
    Conflict(Vec<BookingConflict>),
}

impl ConflictResult {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    pub fn conflicts(&self) -> &[BookingConflict] {
        match self {
            Self::NoConflict => &[],
            Self::Conflict(conflicts) => conflicts,
        }
    }
}

/// One limited booking per congregation per calendar month.
///
/// Collection requests never conflict, and collection bookings in `existing`
/// never block anything. Month and year come from the dates, not from the
/// denormalized fields on the stored bookings.
pub fn check_conflict(request: &BookingRequest, existing: &[ScheduledBooking]) -> ConflictResult {
    if !request.meeting_type.is_limited() {
        return ConflictResult::NoConflict;
    }

    let key = request.month_key();
    let conflicts: Vec<BookingConflict> = existing
        .iter()
        .filter(|booking| {
            booking.congregation_id == request.congregation_id
                && booking.meeting_type.is_limited()
                && booking.month_key() == key
        })
        .map(BookingConflict::of)
        .collect();

    if conflicts.is_empty() {
        ConflictResult::NoConflict
    } else {
        ConflictResult::Conflict(conflicts)
    }
}
