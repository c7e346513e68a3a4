use std::collections::{BTreeMap, BTreeSet};
use std::io;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{BookingId, MeetingType, MonthKey, ScheduledBooking};

const CSV_HEADER: [&str; 5] = ["Mês", "Ano", "Data", "Congregação", "Tipo"];

/// Month-by-month listing of scheduled reinforcement services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub months: Vec<MonthSchedule>,
    pub totals: Vec<MeetingTypeTotal>,
    pub congregations_served: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSchedule {
    pub year: i32,
    pub month: u32,
    pub label: &'static str,
    pub entries: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub booking_id: BookingId,
    pub date: NaiveDate,
    pub congregation_name: String,
    pub meeting_type: MeetingType,
    pub meeting_type_label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeetingTypeTotal {
    pub meeting_type: MeetingType,
    pub label: &'static str,
    pub count: usize,
}

impl ScheduleReport {
    /// Group bookings by calendar month, optionally keeping a single year.
    pub fn build(bookings: &[ScheduledBooking], year: Option<i32>) -> Self {
        let mut selected: Vec<&ScheduledBooking> = bookings
            .iter()
            .filter(|booking| year.map_or(true, |wanted| booking.month_key().year == wanted))
            .collect();
        selected.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.congregation_name.cmp(&b.congregation_name))
        });

        let mut grouped: BTreeMap<MonthKey, Vec<ScheduleEntry>> = BTreeMap::new();
        for booking in &selected {
            grouped
                .entry(booking.month_key())
                .or_default()
                .push(ScheduleEntry {
                    booking_id: booking.id.clone(),
                    date: booking.date,
                    congregation_name: booking.congregation_name.clone(),
                    meeting_type: booking.meeting_type,
                    meeting_type_label: booking.meeting_type.label(),
                });
        }

        let months = grouped
            .into_iter()
            .map(|(key, entries)| MonthSchedule {
                year: key.year,
                month: key.month,
                label: key.label(),
                entries,
            })
            .collect();

        let totals = MeetingType::ordered()
            .into_iter()
            .map(|meeting_type| MeetingTypeTotal {
                meeting_type,
                label: meeting_type.label(),
                count: selected
                    .iter()
                    .filter(|booking| booking.meeting_type == meeting_type)
                    .count(),
            })
            .collect();

        let congregations_served = selected
            .iter()
            .map(|booking| &booking.congregation_id)
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            year,
            months,
            totals,
            congregations_served,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn booking_count(&self) -> usize {
        self.months.iter().map(|month| month.entries.len()).sum()
    }

    /// Tabular export, one row per booking, dates as dd/mm/yyyy.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), ReportError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(CSV_HEADER)?;

        for month in &self.months {
            for entry in &month.entries {
                let year = month.year.to_string();
                let date = entry.date.format("%d/%m/%Y").to_string();
                csv.write_record([
                    month.label,
                    year.as_str(),
                    date.as_str(),
                    entry.congregation_name.as_str(),
                    entry.meeting_type_label,
                ])?;
            }
        }

        csv.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, ReportError> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|err| ReportError::Encoding(err.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write report rows: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush report: {0}")]
    Io(#[from] io::Error),
    #[error("report is not valid UTF-8: {0}")]
    Encoding(String),
}
