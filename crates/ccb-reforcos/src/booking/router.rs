use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{BookingForm, BookingId, MeetingType, ScheduledBooking};
use super::repository::{BookingStore, CongregationDirectory, RepositoryError};
use super::service::{BookingDecision, BookingServiceError, ReforcoBookingService};
use super::validator::{BookingContractError, RejectionReason, ValidationResult};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BookingListQuery {
    #[serde(default)]
    pub(crate) meeting_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    pub(crate) year: Option<i32>,
}

/// Router builder exposing booking, directory, and report endpoints.
pub fn booking_router<D, S>(service: Arc<ReforcoBookingService<D, S>>) -> Router
where
    D: CongregationDirectory + 'static,
    S: BookingStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/bookings",
            get(list_handler::<D, S>).post(submit_handler::<D, S>),
        )
        .route(
            "/api/v1/bookings/check",
            axum::routing::post(check_handler::<D, S>),
        )
        .route(
            "/api/v1/bookings/:booking_id",
            get(get_handler::<D, S>).delete(cancel_handler::<D, S>),
        )
        .route("/api/v1/congregations", get(congregations_handler::<D, S>))
        .route("/api/v1/reports/schedule", get(report_handler::<D, S>))
        .route(
            "/api/v1/reports/schedule.csv",
            get(report_csv_handler::<D, S>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<D, S>(
    State(service): State<Arc<ReforcoBookingService<D, S>>>,
    axum::Json(form): axum::Json<BookingForm>,
) -> Response
where
    D: CongregationDirectory + 'static,
    S: BookingStore + 'static,
{
    match service.book(&form) {
        Ok(BookingDecision::Booked { booking }) => {
            (StatusCode::CREATED, axum::Json(booking.view())).into_response()
        }
        Ok(BookingDecision::Rejected { reason }) => rejection_response(&reason),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn check_handler<D, S>(
    State(service): State<Arc<ReforcoBookingService<D, S>>>,
    axum::Json(form): axum::Json<BookingForm>,
) -> Response
where
    D: CongregationDirectory + 'static,
    S: BookingStore + 'static,
{
    match service.check(&form) {
        Ok(result @ ValidationResult::Accepted { .. }) => {
            (StatusCode::OK, axum::Json(result)).into_response()
        }
        Ok(ValidationResult::Rejected { reason }) => rejection_response(&reason),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn list_handler<D, S>(
    State(service): State<Arc<ReforcoBookingService<D, S>>>,
    Query(query): Query<BookingListQuery>,
) -> Response
where
    D: CongregationDirectory + 'static,
    S: BookingStore + 'static,
{
    let filter = match query.meeting_type.as_deref().map(str::trim) {
        None | Some("") | Some("todos") => None,
        Some(raw) => match raw.parse::<MeetingType>() {
            Ok(meeting_type) => Some(meeting_type),
            Err(err) => {
                let payload = json!({ "error": err.to_string() });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
    };

    match service.list(filter) {
        Ok(bookings) => {
            let views: Vec<_> = bookings.iter().map(ScheduledBooking::view).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn get_handler<D, S>(
    State(service): State<Arc<ReforcoBookingService<D, S>>>,
    Path(booking_id): Path<String>,
) -> Response
where
    D: CongregationDirectory + 'static,
    S: BookingStore + 'static,
{
    match service.get(&BookingId(booking_id)) {
        Ok(booking) => (StatusCode::OK, axum::Json(booking.view())).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn cancel_handler<D, S>(
    State(service): State<Arc<ReforcoBookingService<D, S>>>,
    Path(booking_id): Path<String>,
) -> Response
where
    D: CongregationDirectory + 'static,
    S: BookingStore + 'static,
{
    match service.cancel(&BookingId(booking_id)) {
        Ok(booking) => (StatusCode::OK, axum::Json(booking.view())).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn congregations_handler<D, S>(
    State(service): State<Arc<ReforcoBookingService<D, S>>>,
) -> Response
where
    D: CongregationDirectory + 'static,
    S: BookingStore + 'static,
{
    match service.congregations() {
        Ok(congregations) => (StatusCode::OK, axum::Json(congregations)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn report_handler<D, S>(
    State(service): State<Arc<ReforcoBookingService<D, S>>>,
    Query(query): Query<ReportQuery>,
) -> Response
where
    D: CongregationDirectory + 'static,
    S: BookingStore + 'static,
{
    match service.schedule_report(query.year) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn report_csv_handler<D, S>(
    State(service): State<Arc<ReforcoBookingService<D, S>>>,
    Query(query): Query<ReportQuery>,
) -> Response
where
    D: CongregationDirectory + 'static,
    S: BookingStore + 'static,
{
    let report = match service.schedule_report(query.year) {
        Ok(report) => report,
        Err(err) => return service_error_response(err),
    };

    match report.to_csv_string() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn rejection_response(reason: &RejectionReason) -> Response {
    let mut payload = json!({
        "error": reason.summary(),
        "reason": reason.code(),
    });
    if let RejectionReason::MonthlyLimitExceeded { conflicts } = reason {
        payload["conflicts"] = json!(conflicts);
    }
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

fn service_error_response(err: BookingServiceError) -> Response {
    let status = match &err {
        BookingServiceError::CongregationNotFound(_)
        | BookingServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        BookingServiceError::Contract(BookingContractError::InvalidMeetingType(_)) => {
            StatusCode::BAD_REQUEST
        }
        BookingServiceError::Repository(RepositoryError::SlotTaken { .. }) => StatusCode::CONFLICT,
        BookingServiceError::Contract(BookingContractError::CongregationMismatch { .. })
        | BookingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
