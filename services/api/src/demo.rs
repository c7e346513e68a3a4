use crate::infra::{parse_date, seeded_service};
use ccb_reforcos::booking::{BookingDecision, BookingForm, ScheduleReport, ValidationResult};
use ccb_reforcos::config::{AppConfig, BookingConfig};
use ccb_reforcos::error::AppError;
use chrono::{Datelike, Duration, Local, Months, NaiveDate};
use clap::Args;
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Congregation identifier from the directory
    #[arg(long)]
    pub(crate) congregation: String,
    /// Service date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: NaiveDate,
    /// culto, rjm or coleta
    #[arg(long)]
    pub(crate) meeting_type: String,
    /// Reference date for the past-date rule (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Accept dates before the reference date
    #[arg(long)]
    pub(crate) allow_past_dates: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Restrict the report to one calendar year
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Write the report as CSV to this path instead of printing it
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reference date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let CheckArgs {
        congregation,
        date,
        meeting_type,
        today,
        allow_past_dates,
    } = args;

    let mut config = AppConfig::load()?.booking;
    config.allow_past_dates |= allow_past_dates;
    let mut service = seeded_service(config);
    if let Some(today) = today {
        service = service.with_fixed_today(today);
    }

    let form = BookingForm::new(&congregation, date, &meeting_type);
    match service.check(&form)? {
        ValidationResult::Accepted { booking } => println!(
            "Booking accepted: {} | {} on {} ({} {})",
            booking.congregation_name,
            booking.meeting_type.label(),
            booking.date.format("%d/%m/%Y"),
            booking.month,
            booking.year
        ),
        ValidationResult::Rejected { reason } => {
            println!("Booking rejected ({}): {}", reason.code(), reason.summary())
        }
    }

    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let service = seeded_service(BookingConfig::default());
    let report = service.schedule_report(args.year)?;

    match args.csv {
        Some(path) => {
            let file = File::create(&path)?;
            report.write_csv(file)?;
            println!(
                "Wrote {} booking(s) to {}",
                report.booking_count(),
                path.display()
            );
        }
        None => render_report(&report),
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let service = seeded_service(BookingConfig::default()).with_fixed_today(today);
    let start = first_of_next_month(today);

    println!(
        "Reinforcement booking demo (reference date {})",
        today.format("%d/%m/%Y")
    );

    let attempts = [
        (
            "Central culto",
            BookingForm::new("1", start + Duration::days(6), "culto"),
        ),
        (
            "Central RJM in the same month",
            BookingForm::new("1", start + Duration::days(20), "rjm"),
        ),
        (
            "Central coleta in the same month",
            BookingForm::new("1", start + Duration::days(13), "coleta"),
        ),
        (
            "Sul RJM",
            BookingForm::new("3", start + Duration::days(9), "rjm"),
        ),
        (
            "Sul culto",
            BookingForm::new("3", start + Duration::days(9), "culto"),
        ),
        (
            "Norte without a meeting type",
            BookingForm {
                congregation_id: Some("2".to_string()),
                date: Some(start + Duration::days(2)),
                meeting_type: None,
            },
        ),
        (
            "Leste culto last week",
            BookingForm::new("4", today - Duration::days(7), "culto"),
        ),
    ];

    for (label, form) in attempts {
        match service.book(&form) {
            Ok(BookingDecision::Booked { booking }) => println!(
                "+ {label}: booked {} on {}",
                booking.id,
                booking.date.format("%d/%m/%Y")
            ),
            Ok(BookingDecision::Rejected { reason }) => {
                println!("- {label}: refused, {}", reason.summary())
            }
            Err(err) => println!("! {label}: {err}"),
        }
    }

    println!();
    render_report(&service.schedule_report(Some(start.year()))?);
    Ok(())
}

fn first_of_next_month(today: NaiveDate) -> NaiveDate {
    today
        .with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .unwrap_or(today)
}

fn render_report(report: &ScheduleReport) {
    match report.year {
        Some(year) => println!("Reinforcement schedule {year}"),
        None => println!("Reinforcement schedule (all years)"),
    }

    if report.is_empty() {
        println!("  No bookings scheduled.");
        return;
    }

    for month in &report.months {
        println!("{} {}", month.label, month.year);
        for entry in &month.entries {
            println!(
                "  - {} | {} | {}",
                entry.date.format("%d/%m/%Y"),
                entry.congregation_name,
                entry.meeting_type_label
            );
        }
    }

    let totals: Vec<String> = report
        .totals
        .iter()
        .map(|total| format!("{} {}", total.label, total.count))
        .collect();
    println!("Totals: {}", totals.join(" | "));
    println!("Congregations served: {}", report.congregations_served);
}
