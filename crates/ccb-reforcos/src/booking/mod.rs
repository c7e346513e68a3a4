//! Reinforcement-service booking: one limited booking (culto or RJM) per
//! congregation per calendar month, unlimited collection ("coleta") bookings,
//! and RJM only where the congregation hosts it.
//!
//! The rule functions ([`check_eligibility`], [`check_conflict`],
//! [`validate_booking`]) are pure and read a caller-supplied snapshot. The
//! [`ReforcoBookingService`] wires them to a [`CongregationDirectory`] and a
//! [`BookingStore`], whose `reserve` is the authoritative slot check.

pub mod conflict;
pub mod domain;
pub mod eligibility;
pub mod memory;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod validator;

#[cfg(test)]
mod tests;

pub use conflict::{check_conflict, BookingConflict, ConflictResult};
pub use domain::{
    month_label, BookingForm, BookingFormError, BookingId, BookingRequest, BookingView,
    Congregation, CongregationId, MeetingType, MonthKey, ProposedBooking, RequiredField,
    ScheduledBooking, UnknownMeetingType,
};
pub use eligibility::{check_eligibility, EligibilityResult, IneligibilityReason};
pub use memory::{InMemoryBookingStore, InMemoryCongregationDirectory};
pub use report::{MeetingTypeTotal, MonthSchedule, ReportError, ScheduleEntry, ScheduleReport};
pub use repository::{BookingStore, CongregationDirectory, RepositoryError};
pub use router::booking_router;
pub use service::{BookingDecision, BookingServiceError, ReforcoBookingService};
pub use validator::{
    validate_booking, BookingContractError, BookingPolicy, RejectionReason, ValidationResult,
};
