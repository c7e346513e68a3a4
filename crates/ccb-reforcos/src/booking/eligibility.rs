use serde::Serialize;

use super::domain::{BookingRequest, Congregation, MeetingType};

/// Outcome of checking whether a congregation may host the requested meeting type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityResult {
    Eligible,
    Ineligible(IneligibilityReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IneligibilityReason {
    NoYouthMeetingSupport,
}

/// RJM may only be booked at congregations flagged as hosting it.
///
/// The caller passes the congregation matching `request.congregation_id`.
pub fn check_eligibility(request: &BookingRequest, congregation: &Congregation) -> EligibilityResult {
    if request.meeting_type == MeetingType::YouthMeeting && !congregation.supports_youth_meeting {
        return EligibilityResult::Ineligible(IneligibilityReason::NoYouthMeetingSupport);
    }

    EligibilityResult::Eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::domain::CongregationId;
    use chrono::NaiveDate;

    fn congregation(supports_youth_meeting: bool) -> Congregation {
        Congregation {
            id: CongregationId("3".to_string()),
            name: "Congregação Sul".to_string(),
            city: "São Bernardo".to_string(),
            supports_youth_meeting,
        }
    }

    fn request(meeting_type: MeetingType) -> BookingRequest {
        BookingRequest {
            congregation_id: CongregationId("3".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date"),
            meeting_type,
        }
    }

    #[test]
    fn youth_meeting_requires_support_flag() {
        assert_eq!(
            check_eligibility(&request(MeetingType::YouthMeeting), &congregation(false)),
            EligibilityResult::Ineligible(IneligibilityReason::NoYouthMeetingSupport)
        );
        assert_eq!(
            check_eligibility(&request(MeetingType::YouthMeeting), &congregation(true)),
            EligibilityResult::Eligible
        );
    }

    #[test]
    fn other_types_are_always_eligible() {
        for meeting_type in [MeetingType::Service, MeetingType::Collection] {
            assert_eq!(
                check_eligibility(&request(meeting_type), &congregation(false)),
                EligibilityResult::Eligible
            );
        }
    }
}
