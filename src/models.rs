use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Role {
    Customer,
    Owner,
    Admin,
}

#[derive(Debug, PartialEq, Clone)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone_no: String,
    pub role: Role,
    pub password_hash: Vec<u8>,
}

/// A server side login session. The `session` table is the revocation
/// store: deleting the row revokes the token everywhere.
#[derive(Debug, PartialEq, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: u64,
    pub role: Role,
    pub valid_until: DateTime<Utc>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Cuisine {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Outlet {
    pub id: u64,
    pub name: String,
    pub contact: String,
    pub img_url: String,
    pub description: String,
    pub cuisine_id: u64,
    pub owner_id: u64,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MenuItem {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    pub outlet_id: u64,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Order {
    pub id: u64,
    pub user_id: u64,
    pub total_price: i64,
    pub status: String,
}

#[derive(Debug, PartialEq, Clone)]
pub struct OrderItem {
    pub id: u64,
    pub order_id: u64,
    pub menuitem_id: u64,
    pub quantity: i32,
    pub sub_total: i64,
}

/// A physical table of an outlet.
///
/// `is_available` caches "no reservation currently holds this table". It is
/// written only by the reservation operations in the database layer, never
/// by the table endpoints.
#[derive(Debug, PartialEq, Clone)]
pub struct Table {
    pub id: u64,
    pub outlet_id: u64,
    pub table_number: i32,
    pub capacity: i32,
    pub status: String,
    pub is_available: bool,
}

/// While a reservation row exists it holds its table; there is no separate
/// cancelled state that releases the table.
#[derive(Debug, PartialEq, Clone)]
pub struct Reservation {
    pub id: u64,
    pub user_id: u64,
    pub table_id: u64,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: String,
    pub no_of_people: i32,
    pub order_id: Option<u64>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct NewReservation {
    pub user_id: u64,
    pub table_id: u64,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: String,
    pub no_of_people: i32,
    pub order_id: Option<u64>,
}

/// Sparse update for a reservation, every field applied only when present.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ReservationPatch {
    pub user_id: Option<u64>,
    pub table_id: Option<u64>,
    pub booking_date: Option<NaiveDate>,
    pub booking_time: Option<NaiveTime>,
    pub status: Option<String>,
    pub no_of_people: Option<i32>,
}

/// Reduced projection of a user for list responses.
#[derive(Debug, PartialEq, Clone)]
pub struct UserSummary {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone_no: String,
}

/// Reduced projection of a table for list responses.
#[derive(Debug, PartialEq, Clone)]
pub struct TableSummary {
    pub id: u64,
    pub outlet_id: u64,
    pub table_number: i32,
    pub capacity: i32,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ReservationOverview {
    pub reservation: Reservation,
    pub user: Option<UserSummary>,
    pub table: Option<TableSummary>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct OrderOverview {
    pub order: Order,
    pub user: Option<UserSummary>,
}
