use aide::axum::routing::get_with;
use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::Path;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::database::AppState;
use crate::error::{ServiceError, ServiceResult};
use crate::models;
use crate::request_state::RequestState;

use super::{Created, MessageDto};

const BOOKING_DATE_FORMAT: &str = "%Y-%m-%d";
const BOOKING_TIME_FORMAT: &str = "%H:%M:%S";

pub fn router(app_state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/reservations/:id",
            get_with(get_reservation, get_reservation_docs)
                .patch_with(update_reservation, update_reservation_docs)
                .delete_with(delete_reservation, delete_reservation_docs),
        )
        .api_route(
            "/reservations",
            get_with(list_reservations, list_reservations_docs)
                .post_with(create_reservation, create_reservation_docs),
        )
        .with_state(app_state)
}

fn parse_booking_date(value: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(value, BOOKING_DATE_FORMAT)
        .map_err(|err| ServiceError::BadRequest(format!("Invalid booking_date '{value}': {err}")))
}

fn parse_booking_time(value: &str) -> ServiceResult<NaiveTime> {
    NaiveTime::parse_from_str(value, BOOKING_TIME_FORMAT)
        .map_err(|err| ServiceError::BadRequest(format!("Invalid booking_time '{value}': {err}")))
}

#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct ReservationDto {
    pub id: u64,
    pub user_id: u64,
    pub table_id: u64,
    pub booking_date: String,
    pub booking_time: String,
    pub status: String,
    pub no_of_people: i32,
    pub order_id: Option<u64>,
}

impl From<&models::Reservation> for ReservationDto {
    fn from(value: &models::Reservation) -> Self {
        Self {
            id: value.id.to_owned(),
            user_id: value.user_id.to_owned(),
            table_id: value.table_id.to_owned(),
            booking_date: value.booking_date.format(BOOKING_DATE_FORMAT).to_string(),
            booking_time: value.booking_time.format(BOOKING_TIME_FORMAT).to_string(),
            status: value.status.to_owned(),
            no_of_people: value.no_of_people.to_owned(),
            order_id: value.order_id.to_owned(),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct UserSummaryDto {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone_no: String,
}

impl From<&models::UserSummary> for UserSummaryDto {
    fn from(value: &models::UserSummary) -> Self {
        Self {
            id: value.id.to_owned(),
            name: value.name.to_owned(),
            email: value.email.to_owned(),
            phone_no: value.phone_no.to_owned(),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct TableSummaryDto {
    pub id: u64,
    pub outlet_id: u64,
    pub table_number: i32,
    pub capacity: i32,
}

impl From<&models::TableSummary> for TableSummaryDto {
    fn from(value: &models::TableSummary) -> Self {
        Self {
            id: value.id.to_owned(),
            outlet_id: value.outlet_id.to_owned(),
            table_number: value.table_number.to_owned(),
            capacity: value.capacity.to_owned(),
        }
    }
}

/// List entry: the reservation plus display-ready summaries of its user
/// and table instead of fully nested relations.
#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct ReservationOverviewDto {
    pub id: u64,
    pub user_id: u64,
    pub table_id: u64,
    pub booking_date: String,
    pub booking_time: String,
    pub status: String,
    pub no_of_people: i32,
    pub order_id: Option<u64>,
    pub user: Option<UserSummaryDto>,
    pub table: Option<TableSummaryDto>,
}

impl From<&models::ReservationOverview> for ReservationOverviewDto {
    fn from(value: &models::ReservationOverview) -> Self {
        let reservation = &value.reservation;

        Self {
            id: reservation.id.to_owned(),
            user_id: reservation.user_id.to_owned(),
            table_id: reservation.table_id.to_owned(),
            booking_date: reservation.booking_date.format(BOOKING_DATE_FORMAT).to_string(),
            booking_time: reservation.booking_time.format(BOOKING_TIME_FORMAT).to_string(),
            status: reservation.status.to_owned(),
            no_of_people: reservation.no_of_people.to_owned(),
            order_id: reservation.order_id.to_owned(),
            user: value.user.as_ref().map(|u| u.into()),
            table: value.table.as_ref().map(|t| t.into()),
        }
    }
}

pub async fn list_reservations(
    mut state: RequestState,
) -> ServiceResult<Json<Vec<ReservationOverviewDto>>> {
    let reservations = state.db.get_all_reservations().await?;
    Ok(Json(reservations.iter().map(|r| r.into()).collect()))
}

fn list_reservations_docs(op: TransformOperation) -> TransformOperation {
    op.description("List all reservations with summaries of the linked user and table.")
        .tag("reservations")
        .response::<200, Json<Vec<ReservationOverviewDto>>>()
}

pub async fn get_reservation(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<ReservationDto>> {
    let reservation = state.db.get_reservation_by_id(id).await?;

    if let Some(reservation) = reservation {
        return Ok(Json(ReservationDto::from(&reservation)));
    }

    Err(ServiceError::NotFound("Reservation not found."))
}

fn get_reservation_docs(op: TransformOperation) -> TransformOperation {
    op.description("Get a reservation by id.")
        .tag("reservations")
        .response::<200, Json<ReservationDto>>()
        .response_with::<404, (), _>(|res| {
            res.description("The requested reservation does not exist!")
        })
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct SaveReservationDto {
    pub user_id: u64,
    pub table_id: u64,
    /// `YYYY-MM-DD`
    pub booking_date: String,
    /// `HH:MM:SS`
    pub booking_time: String,
    pub status: Option<String>,
    pub no_of_people: Option<i32>,
    pub order_id: Option<u64>,
}

async fn create_reservation(
    mut state: RequestState,
    form: Json<SaveReservationDto>,
) -> ServiceResult<Created<ReservationDto>> {
    let form = form.0;

    let reservation = models::NewReservation {
        user_id: form.user_id,
        table_id: form.table_id,
        booking_date: parse_booking_date(&form.booking_date)?,
        booking_time: parse_booking_time(&form.booking_time)?,
        status: form.status.unwrap_or_else(|| "Confirmed".to_string()),
        no_of_people: form.no_of_people.unwrap_or(1),
        order_id: form.order_id,
    };

    let reservation = state.db.create_reservation(reservation).await?;
    Ok(Created(ReservationDto::from(&reservation)))
}

fn create_reservation_docs(op: TransformOperation) -> TransformOperation {
    op.description("Reserve a table. The table is claimed and stays unavailable until the reservation is deleted.")
        .tag("reservations")
        .response::<201, Json<ReservationDto>>()
        .response_with::<404, (), _>(|res| res.description("The requested table does not exist!"))
        .response_with::<400, (), _>(|res| {
            res.description("The table is not available or the booking date or time is malformed!")
        })
}

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateReservationDto {
    pub user_id: Option<u64>,
    pub table_id: Option<u64>,
    /// `YYYY-MM-DD`
    pub booking_date: Option<String>,
    /// `HH:MM:SS`
    pub booking_time: Option<String>,
    pub status: Option<String>,
    pub no_of_people: Option<i32>,
}

async fn update_reservation(
    mut state: RequestState,
    Path(id): Path<u64>,
    form: Json<UpdateReservationDto>,
) -> ServiceResult<Json<ReservationDto>> {
    let form = form.0;

    let patch = models::ReservationPatch {
        user_id: form.user_id,
        table_id: form.table_id,
        booking_date: form
            .booking_date
            .as_deref()
            .map(parse_booking_date)
            .transpose()?,
        booking_time: form
            .booking_time
            .as_deref()
            .map(parse_booking_time)
            .transpose()?,
        status: form.status,
        no_of_people: form.no_of_people,
    };

    let reservation = state.db.update_reservation(id, patch).await?;
    Ok(Json(ReservationDto::from(&reservation)))
}

fn update_reservation_docs(op: TransformOperation) -> TransformOperation {
    op.description("Update an existing reservation. Changing the table releases the old table and claims the new one atomically.")
        .tag("reservations")
        .response::<200, Json<ReservationDto>>()
        .response_with::<404, (), _>(|res| {
            res.description("The requested reservation or the new table does not exist!")
        })
        .response_with::<400, (), _>(|res| {
            res.description("The new table is not available or the booking date or time is malformed!")
        })
}

async fn delete_reservation(
    mut state: RequestState,
    Path(id): Path<u64>,
) -> ServiceResult<Json<MessageDto>> {
    state.db.delete_reservation(id).await?;
    Ok(MessageDto::new("Reservation deleted successfully"))
}

fn delete_reservation_docs(op: TransformOperation) -> TransformOperation {
    op.description("Delete an existing reservation and release its table.")
        .tag("reservations")
        .response::<200, Json<MessageDto>>()
        .response_with::<404, (), _>(|res| {
            res.description("The requested reservation does not exist!")
        })
}

#[cfg(test)]
mod parsing_tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::{parse_booking_date, parse_booking_time};
    use crate::error::ServiceError;

    #[test]
    fn test_parse_booking_date() {
        assert_eq!(
            parse_booking_date("2024-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );

        assert!(matches!(
            parse_booking_date("01.06.2024"),
            Err(ServiceError::BadRequest(_))
        ));
        assert!(matches!(
            parse_booking_date("2024-13-01"),
            Err(ServiceError::BadRequest(_))
        ));
        assert!(matches!(
            parse_booking_date(""),
            Err(ServiceError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_booking_time() {
        assert_eq!(
            parse_booking_time("19:30:00").unwrap(),
            NaiveTime::from_hms_opt(19, 30, 0).unwrap()
        );

        // seconds are required
        assert!(matches!(
            parse_booking_time("19:30"),
            Err(ServiceError::BadRequest(_))
        ));
        assert!(matches!(
            parse_booking_time("25:00:00"),
            Err(ServiceError::BadRequest(_))
        ));
    }
}
