use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{
    BookingForm, BookingId, Congregation, CongregationId, MeetingType, RequiredField,
    ScheduledBooking,
};
use super::report::ScheduleReport;
use super::repository::{BookingStore, CongregationDirectory, RepositoryError};
use super::validator::{
    validate_booking, BookingContractError, BookingPolicy, RejectionReason, ValidationResult,
};
use crate::config::BookingConfig;

/// Result of a booking attempt that reached the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookingDecision {
    Booked { booking: ScheduledBooking },
    Rejected { reason: RejectionReason },
}

/// Service composing the directory, the booking store, and the booking rules.
pub struct ReforcoBookingService<D, S> {
    directory: Arc<D>,
    store: Arc<S>,
    config: BookingConfig,
    fixed_today: Option<NaiveDate>,
}

impl<D, S> ReforcoBookingService<D, S>
where
    D: CongregationDirectory + 'static,
    S: BookingStore + 'static,
{
    pub fn new(directory: Arc<D>, store: Arc<S>, config: BookingConfig) -> Self {
        Self {
            directory,
            store,
            config,
            fixed_today: None,
        }
    }

    /// Pin the reference date instead of reading the clock.
    pub fn with_fixed_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn policy(&self) -> BookingPolicy {
        let today = self
            .fixed_today
            .unwrap_or_else(|| today_in(self.config.utc_offset));
        BookingPolicy::new(today, self.config.allow_past_dates)
    }

    /// Advisory pre-check: evaluates the form without persisting anything.
    pub fn check(&self, form: &BookingForm) -> Result<ValidationResult, BookingServiceError> {
        let Some(congregation) = self.resolve(form)? else {
            return Ok(ValidationResult::Rejected {
                reason: RejectionReason::MissingField {
                    field: RequiredField::CongregationId,
                },
            });
        };

        let snapshot = self.store.snapshot()?;
        debug!(existing = snapshot.len(), "evaluating booking against snapshot");

        Ok(validate_booking(form, &congregation, &snapshot, &self.policy())?)
    }

    /// Validate the form and persist it through the store's slot reservation.
    pub fn book(&self, form: &BookingForm) -> Result<BookingDecision, BookingServiceError> {
        let proposed = match self.check(form)? {
            ValidationResult::Accepted { booking } => booking,
            ValidationResult::Rejected { reason } => {
                warn!(reason = reason.code(), "booking rejected");
                return Ok(BookingDecision::Rejected { reason });
            }
        };

        match self.store.reserve(proposed) {
            Ok(booking) => {
                info!(
                    booking_id = %booking.id,
                    congregation_id = %booking.congregation_id,
                    meeting_type = %booking.meeting_type,
                    date = %booking.date,
                    "reinforcement booking scheduled"
                );
                Ok(BookingDecision::Booked { booking })
            }
            Err(RepositoryError::SlotTaken { conflicts }) => {
                warn!(
                    conflicts = conflicts.len(),
                    "monthly slot claimed between check and reservation"
                );
                Ok(BookingDecision::Rejected {
                    reason: RejectionReason::MonthlyLimitExceeded { conflicts },
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Bookings sorted by date, optionally restricted to one meeting type.
    pub fn list(
        &self,
        meeting_type: Option<MeetingType>,
    ) -> Result<Vec<ScheduledBooking>, BookingServiceError> {
        let mut bookings: Vec<ScheduledBooking> = self
            .store
            .snapshot()?
            .into_iter()
            .filter(|booking| meeting_type.map_or(true, |kind| booking.meeting_type == kind))
            .collect();
        bookings.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(bookings)
    }

    pub fn get(&self, id: &BookingId) -> Result<ScheduledBooking, BookingServiceError> {
        let booking = self.store.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(booking)
    }

    pub fn cancel(&self, id: &BookingId) -> Result<ScheduledBooking, BookingServiceError> {
        let booking = self.store.cancel(id)?;
        info!(booking_id = %booking.id, "reinforcement booking cancelled");
        Ok(booking)
    }

    pub fn congregations(&self) -> Result<Vec<Congregation>, BookingServiceError> {
        let mut congregations = self.directory.list()?;
        congregations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(congregations)
    }

    pub fn schedule_report(&self, year: Option<i32>) -> Result<ScheduleReport, BookingServiceError> {
        let snapshot = self.store.snapshot()?;
        Ok(ScheduleReport::build(&snapshot, year))
    }

    /// `None` when the form carries no congregation; unknown ids are an error.
    fn resolve(&self, form: &BookingForm) -> Result<Option<Congregation>, BookingServiceError> {
        let Some(id) = form.congregation_id() else {
            return Ok(None);
        };

        match self.directory.get(&id)? {
            Some(congregation) => Ok(Some(congregation)),
            None => Err(BookingServiceError::CongregationNotFound(id)),
        }
    }
}

fn today_in(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// Error raised by the booking service.
#[derive(Debug, thiserror::Error)]
pub enum BookingServiceError {
    #[error("congregation {0} not found")]
    CongregationNotFound(CongregationId),
    #[error(transparent)]
    Contract(#[from] BookingContractError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
