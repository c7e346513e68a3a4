use chrono::NaiveDate;
use serde::Serialize;

use super::conflict::{check_conflict, BookingConflict, ConflictResult};
use super::domain::{
    BookingForm, BookingFormError, BookingRequest, Congregation, CongregationId, ProposedBooking,
    RequiredField, ScheduledBooking, UnknownMeetingType,
};
use super::eligibility::{check_eligibility, EligibilityResult, IneligibilityReason};

/// Date policy applied on top of the booking rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    /// Reference date supplied by the caller; the validator never reads a clock.
    pub today: NaiveDate,
    pub allow_past_dates: bool,
}

impl BookingPolicy {
    pub fn new(today: NaiveDate, allow_past_dates: bool) -> Self {
        Self {
            today,
            allow_past_dates,
        }
    }

    /// Policy that accepts any date, matching the bare booking rule.
    pub fn permissive(today: NaiveDate) -> Self {
        Self::new(today, true)
    }
}

/// Single-shot decision for a booking attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationResult {
    Accepted { booking: ProposedBooking },
    Rejected { reason: RejectionReason },
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn rejection(&self) -> Option<&RejectionReason> {
        match self {
            Self::Accepted { .. } => None,
            Self::Rejected { reason } => Some(reason),
        }
    }
}

/// Soft rejection surfaced to the operator. The first failing check wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    MissingField {
        field: RequiredField,
    },
    DateInPast {
        date: NaiveDate,
        today: NaiveDate,
    },
    NoYouthMeetingSupport {
        congregation: String,
    },
    MonthlyLimitExceeded {
        conflicts: Vec<BookingConflict>,
    },
}

impl RejectionReason {
    pub const fn code(&self) -> &'static str {
        match self {
            RejectionReason::MissingField { .. } => "missing_field",
            RejectionReason::DateInPast { .. } => "date_in_past",
            RejectionReason::NoYouthMeetingSupport { .. } => "no_youth_meeting_support",
            RejectionReason::MonthlyLimitExceeded { .. } => "monthly_limit_exceeded",
        }
    }

    pub fn summary(&self) -> String {
        match self {
            RejectionReason::MissingField { field } => {
                format!("please fill in the {} field", field.label())
            }
            RejectionReason::DateInPast { date, today } => {
                format!("booking date {date} is before today ({today})")
            }
            RejectionReason::NoYouthMeetingSupport { congregation } => {
                format!("{congregation} does not hold a Reunião de Jovens e Menores")
            }
            RejectionReason::MonthlyLimitExceeded { conflicts } => {
                let existing = conflicts
                    .iter()
                    .map(|conflict| {
                        format!(
                            "{} on {}",
                            conflict.meeting_type.label(),
                            conflict.date.format("%d/%m/%Y")
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "congregation already has a booking this month ({existing}); \
                     only collection week allows more than one"
                )
            }
        }
    }
}

/// Caller contract violations. These indicate a programming error upstream,
/// not operator input to be corrected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingContractError {
    #[error(transparent)]
    InvalidMeetingType(#[from] UnknownMeetingType),
    #[error("congregation record {found} does not match requested congregation {expected}")]
    CongregationMismatch {
        expected: CongregationId,
        found: CongregationId,
    },
}

/// Required fields, date policy, eligibility, then the monthly limit.
///
/// Evaluation stops at the first failing check. `existing` is a snapshot taken
/// by the caller and is only read.
pub fn validate_booking(
    form: &BookingForm,
    congregation: &Congregation,
    existing: &[ScheduledBooking],
    policy: &BookingPolicy,
) -> Result<ValidationResult, BookingContractError> {
    let request = match BookingRequest::try_from(form) {
        Ok(request) => request,
        Err(BookingFormError::Missing(field)) => {
            return Ok(rejected(RejectionReason::MissingField { field }))
        }
        Err(BookingFormError::InvalidMeetingType(err)) => return Err(err.into()),
    };

    if request.congregation_id != congregation.id {
        return Err(BookingContractError::CongregationMismatch {
            expected: request.congregation_id,
            found: congregation.id.clone(),
        });
    }

    if !policy.allow_past_dates && request.date < policy.today {
        return Ok(rejected(RejectionReason::DateInPast {
            date: request.date,
            today: policy.today,
        }));
    }

    match check_eligibility(&request, congregation) {
        EligibilityResult::Eligible => {}
        EligibilityResult::Ineligible(IneligibilityReason::NoYouthMeetingSupport) => {
            return Ok(rejected(RejectionReason::NoYouthMeetingSupport {
                congregation: congregation.name.clone(),
            }))
        }
    }

    if let ConflictResult::Conflict(conflicts) = check_conflict(&request, existing) {
        return Ok(rejected(RejectionReason::MonthlyLimitExceeded { conflicts }));
    }

    Ok(ValidationResult::Accepted {
        booking: ProposedBooking::new(request, congregation),
    })
}

fn rejected(reason: RejectionReason) -> ValidationResult {
    ValidationResult::Rejected { reason }
}
