use std::ops::Add;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;

use crate::error::ServiceError;
use crate::models;

use super::{AppState, DatabaseConnection};

async fn connect(pool: PgPool) -> DatabaseConnection {
    let app_state = AppState::from_pool(pool).await;
    DatabaseConnection {
        connection: app_state.pool.acquire().await.unwrap(),
    }
}

async fn seed_user(db: &mut DatabaseConnection, email: &str) -> models::User {
    db.store_user(models::User {
        id: 0,
        name: "John Doe".to_string(),
        email: email.to_string(),
        phone_no: "0700000000".to_string(),
        role: models::Role::Customer,
        password_hash: vec![13u8; 48],
    })
    .await
    .unwrap()
}

/// Creates the cuisine/owner/outlet chain a table depends on and returns
/// the outlet id.
async fn seed_outlet(db: &mut DatabaseConnection) -> u64 {
    let owner = seed_user(db, "owner@example.org").await;
    let cuisine = db
        .store_cuisine(models::Cuisine {
            id: 0,
            name: "Coastal".to_string(),
        })
        .await
        .unwrap();
    let outlet = db
        .store_outlet(models::Outlet {
            id: 0,
            name: "Mama Oliech".to_string(),
            contact: "0711000000".to_string(),
            img_url: "https://example.org/outlet.jpg".to_string(),
            description: "Fish and ugali".to_string(),
            cuisine_id: cuisine.id,
            owner_id: owner.id,
        })
        .await
        .unwrap();
    outlet.id
}

async fn seed_table(db: &mut DatabaseConnection, outlet_id: u64, table_number: i32) -> models::Table {
    db.store_table(models::Table {
        id: 0,
        outlet_id,
        table_number,
        capacity: 4,
        status: "available".to_string(),
        is_available: true,
    })
    .await
    .unwrap()
}

fn new_reservation(user_id: u64, table_id: u64) -> models::NewReservation {
    models::NewReservation {
        user_id,
        table_id,
        booking_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        booking_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        status: "Confirmed".to_string(),
        no_of_people: 1,
        order_id: None,
    }
}

#[sqlx::test]
async fn test_create_reservation_claims_table(pool: PgPool) {
    let mut db = connect(pool).await;
    let outlet_id = seed_outlet(&mut db).await;
    let user = seed_user(&mut db, "guest@example.org").await;
    let table = seed_table(&mut db, outlet_id, 1).await;
    assert!(table.is_available);

    let reservation = db
        .create_reservation(models::NewReservation {
            booking_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            booking_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
            no_of_people: 2,
            ..new_reservation(user.id, table.id)
        })
        .await
        .unwrap();

    assert!(reservation.id != 0);
    assert_eq!(reservation.user_id, user.id);
    assert_eq!(reservation.table_id, table.id);
    assert_eq!(reservation.status, "Confirmed");
    assert_eq!(reservation.no_of_people, 2);

    // date and time survive the round-trip exactly
    let stored = db
        .get_reservation_by_id(reservation.id)
        .await
        .unwrap()
        .expect("reservation was stored");
    assert_eq!(
        stored.booking_date,
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    );
    assert_eq!(
        stored.booking_time,
        NaiveTime::from_hms_opt(19, 30, 0).unwrap()
    );

    let table = db.get_table_by_id(table.id).await.unwrap().unwrap();
    assert!(!table.is_available);
}

#[sqlx::test]
async fn test_create_reservation_missing_table(pool: PgPool) {
    let mut db = connect(pool).await;
    let user = seed_user(&mut db, "guest@example.org").await;

    let result = db.create_reservation(new_reservation(user.id, 4711)).await;
    assert_eq!(result, Err(ServiceError::NotFound("Table not found")));
}

#[sqlx::test]
async fn test_create_reservation_conflict(pool: PgPool) {
    let mut db = connect(pool).await;
    let outlet_id = seed_outlet(&mut db).await;
    let user = seed_user(&mut db, "guest@example.org").await;
    let table = seed_table(&mut db, outlet_id, 1).await;

    let first = db
        .create_reservation(new_reservation(user.id, table.id))
        .await
        .unwrap();

    // second booking of the same table fails and changes nothing
    let result = db.create_reservation(new_reservation(user.id, table.id)).await;
    assert_eq!(
        result,
        Err(ServiceError::BadRequest("Table is not available".to_string()))
    );
    assert_eq!(db.get_all_reservations().await.unwrap().len(), 1);
    let stored_table = db.get_table_by_id(table.id).await.unwrap().unwrap();
    assert!(!stored_table.is_available);

    // deleting the first reservation releases the table for the retry
    db.delete_reservation(first.id).await.unwrap();
    let stored_table = db.get_table_by_id(table.id).await.unwrap().unwrap();
    assert!(stored_table.is_available);

    db.create_reservation(new_reservation(user.id, table.id))
        .await
        .unwrap();
    let stored_table = db.get_table_by_id(table.id).await.unwrap().unwrap();
    assert!(!stored_table.is_available);
}

#[sqlx::test]
async fn test_update_reservation_transfers_table(pool: PgPool) {
    let mut db = connect(pool).await;
    let outlet_id = seed_outlet(&mut db).await;
    let user = seed_user(&mut db, "guest@example.org").await;
    let table1 = seed_table(&mut db, outlet_id, 1).await;
    let table2 = seed_table(&mut db, outlet_id, 2).await;

    let reservation = db
        .create_reservation(new_reservation(user.id, table1.id))
        .await
        .unwrap();

    let updated = db
        .update_reservation(
            reservation.id,
            models::ReservationPatch {
                table_id: Some(table2.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.table_id, table2.id);
    let table1 = db.get_table_by_id(table1.id).await.unwrap().unwrap();
    let table2 = db.get_table_by_id(table2.id).await.unwrap().unwrap();
    assert!(table1.is_available);
    assert!(!table2.is_available);
}

#[sqlx::test]
async fn test_update_reservation_rejects_occupied_table(pool: PgPool) {
    let mut db = connect(pool).await;
    let outlet_id = seed_outlet(&mut db).await;
    let user = seed_user(&mut db, "guest@example.org").await;
    let table1 = seed_table(&mut db, outlet_id, 1).await;
    let table2 = seed_table(&mut db, outlet_id, 2).await;

    let reservation = db
        .create_reservation(new_reservation(user.id, table1.id))
        .await
        .unwrap();
    let blocking = db
        .create_reservation(new_reservation(user.id, table2.id))
        .await
        .unwrap();

    let result = db
        .update_reservation(
            reservation.id,
            models::ReservationPatch {
                table_id: Some(table2.id),
                ..Default::default()
            },
        )
        .await;
    assert_eq!(
        result,
        Err(ServiceError::BadRequest(
            "New table is not available".to_string()
        ))
    );

    // both bindings and both flags are unchanged
    let stored = db
        .get_reservation_by_id(reservation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.table_id, table1.id);
    let blocking_stored = db.get_reservation_by_id(blocking.id).await.unwrap().unwrap();
    assert_eq!(blocking_stored.table_id, table2.id);
    assert!(!db.get_table_by_id(table1.id).await.unwrap().unwrap().is_available);
    assert!(!db.get_table_by_id(table2.id).await.unwrap().unwrap().is_available);
}

#[sqlx::test]
async fn test_update_reservation_missing_new_table(pool: PgPool) {
    let mut db = connect(pool).await;
    let outlet_id = seed_outlet(&mut db).await;
    let user = seed_user(&mut db, "guest@example.org").await;
    let table = seed_table(&mut db, outlet_id, 1).await;

    let reservation = db
        .create_reservation(new_reservation(user.id, table.id))
        .await
        .unwrap();

    let result = db
        .update_reservation(
            reservation.id,
            models::ReservationPatch {
                table_id: Some(4711),
                ..Default::default()
            },
        )
        .await;
    assert_eq!(result, Err(ServiceError::NotFound("New table not found")));

    // the old table is still claimed
    assert!(!db.get_table_by_id(table.id).await.unwrap().unwrap().is_available);
}

#[sqlx::test]
async fn test_update_reservation_scalar_fields(pool: PgPool) {
    let mut db = connect(pool).await;
    let outlet_id = seed_outlet(&mut db).await;
    let user = seed_user(&mut db, "guest@example.org").await;
    let other_user = seed_user(&mut db, "other@example.org").await;
    let table = seed_table(&mut db, outlet_id, 1).await;

    let reservation = db
        .create_reservation(new_reservation(user.id, table.id))
        .await
        .unwrap();

    let updated = db
        .update_reservation(
            reservation.id,
            models::ReservationPatch {
                user_id: Some(other_user.id),
                booking_date: NaiveDate::from_ymd_opt(2024, 7, 2),
                booking_time: NaiveTime::from_hms_opt(20, 15, 0),
                status: Some("Seated".to_string()),
                no_of_people: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.user_id, other_user.id);
    assert_eq!(
        updated.booking_date,
        NaiveDate::from_ymd_opt(2024, 7, 2).unwrap()
    );
    assert_eq!(
        updated.booking_time,
        NaiveTime::from_hms_opt(20, 15, 0).unwrap()
    );
    assert_eq!(updated.status, "Seated");
    assert_eq!(updated.no_of_people, 4);
    // the table binding did not change, the table stays claimed
    assert_eq!(updated.table_id, table.id);
    assert!(!db.get_table_by_id(table.id).await.unwrap().unwrap().is_available);
}

#[sqlx::test]
async fn test_update_missing_reservation(pool: PgPool) {
    let mut db = connect(pool).await;

    let result = db
        .update_reservation(4711, models::ReservationPatch::default())
        .await;
    assert_eq!(result, Err(ServiceError::NotFound("Reservation not found")));
}

#[sqlx::test]
async fn test_delete_reservation_releases_table(pool: PgPool) {
    let mut db = connect(pool).await;
    let outlet_id = seed_outlet(&mut db).await;
    let user = seed_user(&mut db, "guest@example.org").await;
    let table = seed_table(&mut db, outlet_id, 1).await;

    let reservation = db
        .create_reservation(new_reservation(user.id, table.id))
        .await
        .unwrap();
    assert!(!db.get_table_by_id(table.id).await.unwrap().unwrap().is_available);

    db.delete_reservation(reservation.id).await.unwrap();
    assert!(db.get_table_by_id(table.id).await.unwrap().unwrap().is_available);
    assert_eq!(db.get_reservation_by_id(reservation.id).await.unwrap(), None);

    // deleting again changes nothing
    let result = db.delete_reservation(reservation.id).await;
    assert_eq!(result, Err(ServiceError::NotFound("Reservation not found")));
    assert!(db.get_table_by_id(table.id).await.unwrap().unwrap().is_available);
}

#[sqlx::test]
async fn test_delete_reservation_tolerates_missing_table(pool: PgPool) {
    let mut db = connect(pool).await;
    let outlet_id = seed_outlet(&mut db).await;
    let user = seed_user(&mut db, "guest@example.org").await;
    let table = seed_table(&mut db, outlet_id, 1).await;

    let reservation = db
        .create_reservation(new_reservation(user.id, table.id))
        .await
        .unwrap();

    // the table disappears out-of-band
    assert!(db.delete_table(table.id).await.unwrap());

    db.delete_reservation(reservation.id).await.unwrap();
    assert_eq!(db.get_reservation_by_id(reservation.id).await.unwrap(), None);
}

#[sqlx::test]
async fn test_reservation_overview_summaries(pool: PgPool) {
    let mut db = connect(pool).await;
    let outlet_id = seed_outlet(&mut db).await;
    let user = seed_user(&mut db, "guest@example.org").await;
    let table = seed_table(&mut db, outlet_id, 7).await;

    let reservation = db
        .create_reservation(new_reservation(user.id, table.id))
        .await
        .unwrap();

    let overviews = db.get_all_reservations().await.unwrap();
    assert_eq!(overviews.len(), 1);
    let overview = &overviews[0];
    assert_eq!(overview.reservation, reservation);
    assert_eq!(
        overview.user,
        Some(models::UserSummary {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone_no: user.phone_no.clone(),
        })
    );
    assert_eq!(
        overview.table,
        Some(models::TableSummary {
            id: table.id,
            outlet_id,
            table_number: 7,
            capacity: 4,
        })
    );

    // a table deleted out-of-band shows up as a missing summary
    assert!(db.delete_table(table.id).await.unwrap());
    let overviews = db.get_all_reservations().await.unwrap();
    assert_eq!(overviews[0].table, None);
}

#[sqlx::test]
async fn test_session_crud(pool: PgPool) {
    let mut db = connect(pool).await;
    let user = seed_user(&mut db, "guest@example.org").await;

    let token = db
        .create_session_token(user.id, Utc::now().add(Duration::hours(24)))
        .await
        .unwrap();

    let session = db
        .get_session_by_session_token(&token)
        .await
        .unwrap()
        .expect("there is a session for the token");
    assert_eq!(session.user_id, user.id);
    assert_eq!(session.role, models::Role::Customer);
    assert_eq!(session.token, token);
    assert!(session.valid_until > Utc::now());

    db.delete_session_token(&token).await.unwrap();
    assert_eq!(db.get_session_by_session_token(&token).await.unwrap(), None);

    // sessions die with their user
    let token = db
        .create_session_token(user.id, Utc::now().add(Duration::hours(24)))
        .await
        .unwrap();
    assert!(db.delete_user(user.id).await.unwrap());
    assert_eq!(db.get_session_by_session_token(&token).await.unwrap(), None);
}

#[sqlx::test]
async fn test_expired_session_is_rejected(pool: PgPool) {
    let mut db = connect(pool).await;
    let user = seed_user(&mut db, "guest@example.org").await;

    let token = db
        .create_session_token(user.id, Utc::now() - Duration::minutes(1))
        .await
        .unwrap();
    assert_eq!(db.get_session_by_session_token(&token).await.unwrap(), None);
}

#[sqlx::test]
async fn test_store_user_rejects_duplicate_email(pool: PgPool) {
    let mut db = connect(pool).await;
    seed_user(&mut db, "guest@example.org").await;

    let result = db
        .store_user(models::User {
            id: 0,
            name: "Jane Doe".to_string(),
            email: "guest@example.org".to_string(),
            phone_no: "0700000001".to_string(),
            role: models::Role::Customer,
            password_hash: vec![7u8; 48],
        })
        .await;
    assert_eq!(
        result,
        Err(ServiceError::BadRequest("User already exists".to_string()))
    );
}

#[sqlx::test]
async fn test_table_update_does_not_touch_availability(pool: PgPool) {
    let mut db = connect(pool).await;
    let outlet_id = seed_outlet(&mut db).await;
    let user = seed_user(&mut db, "guest@example.org").await;
    let table = seed_table(&mut db, outlet_id, 1).await;

    db.create_reservation(new_reservation(user.id, table.id))
        .await
        .unwrap();

    // a direct table update cannot free a claimed table
    let mut patched = db.get_table_by_id(table.id).await.unwrap().unwrap();
    patched.status = "occupied".to_string();
    patched.is_available = true;
    let stored = db.store_table(patched).await.unwrap();

    assert_eq!(stored.status, "occupied");
    assert!(!stored.is_available);
}
