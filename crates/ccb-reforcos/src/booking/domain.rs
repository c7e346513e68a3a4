use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for congregations in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CongregationId(pub String);

impl fmt::Display for CongregationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier assigned by the booking store once a booking is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookingId(pub String);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Local assembly against which monthly limits and RJM eligibility are tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Congregation {
    pub id: CongregationId,
    pub name: String,
    pub city: String,
    pub supports_youth_meeting: bool,
}

/// Kind of reinforcement service being scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MeetingType {
    #[serde(rename = "culto", alias = "service")]
    Service,
    #[serde(rename = "rjm", alias = "youth_meeting")]
    YouthMeeting,
    #[serde(rename = "coleta", alias = "collection")]
    Collection,
}

impl MeetingType {
    pub const fn ordered() -> [Self; 3] {
        [Self::Service, Self::YouthMeeting, Self::Collection]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Service => "culto",
            Self::YouthMeeting => "rjm",
            Self::Collection => "coleta",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Service => "Culto",
            Self::YouthMeeting => "Reunião de Jovens e Menores",
            Self::Collection => "Coleta",
        }
    }

    /// Limited types share the one-per-month slot; collection week is exempt.
    pub const fn is_limited(self) -> bool {
        !matches!(self, Self::Collection)
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MeetingType {
    type Err = UnknownMeetingType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "culto" | "service" => Ok(Self::Service),
            "rjm" | "youth_meeting" => Ok(Self::YouthMeeting),
            "coleta" | "collection" => Ok(Self::Collection),
            _ => Err(UnknownMeetingType(value.to_string())),
        }
    }
}

/// Raised when a meeting type string falls outside the enumerated set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown meeting type '{0}' (expected culto, rjm, or coleta)")]
pub struct UnknownMeetingType(pub String);

const MONTH_LABELS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Portuguese month name for a 1-based month number.
pub fn month_label(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_LABELS.get(index as usize))
        .copied()
        .unwrap_or("")
}

/// Calendar month a booking falls into. Always derived from the booking date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn label(self) -> &'static str {
        month_label(self.month)
    }
}

/// Form fields that must be filled in before a booking can be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    CongregationId,
    Date,
    MeetingType,
}

impl RequiredField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CongregationId => "congregation",
            Self::Date => "date",
            Self::MeetingType => "meeting type",
        }
    }
}

/// Raw operator input as collected by the booking dialog. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingForm {
    #[serde(default)]
    pub congregation_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub meeting_type: Option<String>,
}

impl BookingForm {
    pub fn new(congregation_id: &str, date: NaiveDate, meeting_type: &str) -> Self {
        Self {
            congregation_id: Some(congregation_id.to_string()),
            date: Some(date),
            meeting_type: Some(meeting_type.to_string()),
        }
    }

    pub fn congregation_id(&self) -> Option<CongregationId> {
        present(&self.congregation_id).map(|id| CongregationId(id.to_string()))
    }

    /// First required field that is absent or blank, in form order.
    pub fn missing_field(&self) -> Option<RequiredField> {
        if present(&self.congregation_id).is_none() {
            return Some(RequiredField::CongregationId);
        }
        if self.date.is_none() {
            return Some(RequiredField::Date);
        }
        if present(&self.meeting_type).is_none() {
            return Some(RequiredField::MeetingType);
        }
        None
    }
}

/// Blank date strings from the dialog are treated as an unfilled field.
fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|err| {
                serde::de::Error::custom(format!("failed to parse '{value}' as YYYY-MM-DD ({err})"))
            }),
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}

/// Complete booking input once every form field is present and typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub congregation_id: CongregationId,
    pub date: NaiveDate,
    pub meeting_type: MeetingType,
}

impl BookingRequest {
    pub fn month_key(&self) -> MonthKey {
        MonthKey::of(self.date)
    }
}

impl TryFrom<&BookingForm> for BookingRequest {
    type Error = BookingFormError;

    fn try_from(form: &BookingForm) -> Result<Self, Self::Error> {
        if let Some(field) = form.missing_field() {
            return Err(BookingFormError::Missing(field));
        }

        let (Some(congregation_id), Some(date), Some(meeting_type)) =
            (form.congregation_id(), form.date, present(&form.meeting_type))
        else {
            return Err(BookingFormError::Missing(RequiredField::CongregationId));
        };

        Ok(Self {
            congregation_id,
            date,
            meeting_type: meeting_type.parse()?,
        })
    }
}

/// Reasons a form cannot be turned into a [`BookingRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingFormError {
    #[error("missing required field: {}", .0.label())]
    Missing(RequiredField),
    #[error(transparent)]
    InvalidMeetingType(#[from] UnknownMeetingType),
}

/// Accepted booking awaiting an identifier from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedBooking {
    pub congregation_id: CongregationId,
    pub congregation_name: String,
    pub date: NaiveDate,
    pub meeting_type: MeetingType,
    pub month: String,
    pub year: i32,
}

impl ProposedBooking {
    pub fn new(request: BookingRequest, congregation: &Congregation) -> Self {
        let key = request.month_key();
        Self {
            congregation_id: request.congregation_id,
            congregation_name: congregation.name.clone(),
            date: request.date,
            meeting_type: request.meeting_type,
            month: key.label().to_string(),
            year: key.year,
        }
    }

    pub fn request(&self) -> BookingRequest {
        BookingRequest {
            congregation_id: self.congregation_id.clone(),
            date: self.date,
            meeting_type: self.meeting_type,
        }
    }
}

/// Persisted reinforcement booking.
///
/// `month` and `year` are kept for display only; every rule recomputes them
/// from `date` through [`ScheduledBooking::month_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledBooking {
    pub id: BookingId,
    pub congregation_id: CongregationId,
    pub congregation_name: String,
    pub date: NaiveDate,
    pub meeting_type: MeetingType,
    pub month: String,
    pub year: i32,
}

impl ScheduledBooking {
    pub fn from_proposed(id: BookingId, proposed: ProposedBooking) -> Self {
        Self {
            id,
            congregation_id: proposed.congregation_id,
            congregation_name: proposed.congregation_name,
            date: proposed.date,
            meeting_type: proposed.meeting_type,
            month: proposed.month,
            year: proposed.year,
        }
    }

    pub fn month_key(&self) -> MonthKey {
        MonthKey::of(self.date)
    }

    pub fn view(&self) -> BookingView {
        BookingView {
            id: self.id.clone(),
            congregation_id: self.congregation_id.clone(),
            congregation_name: self.congregation_name.clone(),
            date: self.date,
            meeting_type: self.meeting_type,
            meeting_type_label: self.meeting_type.label(),
            month: self.month_key().label(),
            year: self.date.year(),
        }
    }
}

/// Serialized shape returned to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingView {
    pub id: BookingId,
    pub congregation_id: CongregationId,
    pub congregation_name: String,
    pub date: NaiveDate,
    pub meeting_type: MeetingType,
    pub meeting_type_label: &'static str,
    pub month: &'static str,
    pub year: i32,
}
