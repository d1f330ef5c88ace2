use base64::engine::general_purpose;
use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rand::RngCore;
use sqlx::migrate::Migrator;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgPool, Pool, Postgres};

use crate::error::{ServiceError, ServiceResult};
use crate::models;

mod migration;
#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<Postgres>,
}

impl AppState {
    pub async fn connect(url: &str) -> AppState {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .expect("connect to database");

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: PgPool) -> AppState {
        let migrator = Migrator::new(migration::postgresql_migrations())
            .await
            .expect("load migrations");
        migrator.run(&pool).await.expect("run migrations");

        AppState { pool }
    }
}

pub struct DatabaseConnection {
    pub connection: PoolConnection<Postgres>,
}

fn role_to_db(role: models::Role) -> &'static str {
    match role {
        models::Role::Customer => "customer",
        models::Role::Owner => "owner",
        models::Role::Admin => "admin",
    }
}

fn role_from_db(value: &str) -> models::Role {
    match value {
        "owner" => models::Role::Owner,
        "admin" => models::Role::Admin,
        _ => models::Role::Customer,
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    phone_no: String,
    role: String,
    password_hash: Vec<u8>,
}

impl From<UserRow> for models::User {
    fn from(row: UserRow) -> Self {
        models::User {
            id: row.id as u64,
            name: row.name,
            email: row.email,
            phone_no: row.phone_no,
            role: role_from_db(&row.role),
            password_hash: row.password_hash,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    token: String,
    user_id: i64,
    valid_until: DateTime<Utc>,
    role: String,
}

impl From<SessionRow> for models::Session {
    fn from(row: SessionRow) -> Self {
        models::Session {
            token: row.token,
            user_id: row.user_id as u64,
            role: role_from_db(&row.role),
            valid_until: row.valid_until,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CuisineRow {
    id: i64,
    name: String,
}

impl From<CuisineRow> for models::Cuisine {
    fn from(row: CuisineRow) -> Self {
        models::Cuisine {
            id: row.id as u64,
            name: row.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OutletRow {
    id: i64,
    name: String,
    contact: String,
    img_url: String,
    description: String,
    cuisine_id: i64,
    owner_id: i64,
}

impl From<OutletRow> for models::Outlet {
    fn from(row: OutletRow) -> Self {
        models::Outlet {
            id: row.id as u64,
            name: row.name,
            contact: row.contact,
            img_url: row.img_url,
            description: row.description,
            cuisine_id: row.cuisine_id as u64,
            owner_id: row.owner_id as u64,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MenuItemRow {
    id: i64,
    name: String,
    description: String,
    price: i64,
    category: String,
    outlet_id: i64,
}

impl From<MenuItemRow> for models::MenuItem {
    fn from(row: MenuItemRow) -> Self {
        models::MenuItem {
            id: row.id as u64,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            outlet_id: row.outlet_id as u64,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    total_price: i64,
    status: String,
}

impl From<OrderRow> for models::Order {
    fn from(row: OrderRow) -> Self {
        models::Order {
            id: row.id as u64,
            user_id: row.user_id as u64,
            total_price: row.total_price,
            status: row.status,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderOverviewRow {
    id: i64,
    user_id: i64,
    total_price: i64,
    status: String,
    user_name: Option<String>,
    user_email: Option<String>,
    user_phone_no: Option<String>,
}

impl From<OrderOverviewRow> for models::OrderOverview {
    fn from(row: OrderOverviewRow) -> Self {
        let user = match (row.user_name, row.user_email, row.user_phone_no) {
            (Some(name), Some(email), Some(phone_no)) => Some(models::UserSummary {
                id: row.user_id as u64,
                name,
                email,
                phone_no,
            }),
            _ => None,
        };

        models::OrderOverview {
            order: models::Order {
                id: row.id as u64,
                user_id: row.user_id as u64,
                total_price: row.total_price,
                status: row.status,
            },
            user,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    menuitem_id: i64,
    quantity: i32,
    sub_total: i64,
}

impl From<OrderItemRow> for models::OrderItem {
    fn from(row: OrderItemRow) -> Self {
        models::OrderItem {
            id: row.id as u64,
            order_id: row.order_id as u64,
            menuitem_id: row.menuitem_id as u64,
            quantity: row.quantity,
            sub_total: row.sub_total,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TableRow {
    id: i64,
    outlet_id: i64,
    table_number: i32,
    capacity: i32,
    status: String,
    is_available: bool,
}

impl From<TableRow> for models::Table {
    fn from(row: TableRow) -> Self {
        models::Table {
            id: row.id as u64,
            outlet_id: row.outlet_id as u64,
            table_number: row.table_number,
            capacity: row.capacity,
            status: row.status,
            is_available: row.is_available,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: i64,
    user_id: i64,
    table_id: i64,
    booking_date: NaiveDate,
    booking_time: NaiveTime,
    status: String,
    no_of_people: i32,
    order_id: Option<i64>,
}

impl From<ReservationRow> for models::Reservation {
    fn from(row: ReservationRow) -> Self {
        models::Reservation {
            id: row.id as u64,
            user_id: row.user_id as u64,
            table_id: row.table_id as u64,
            booking_date: row.booking_date,
            booking_time: row.booking_time,
            status: row.status,
            no_of_people: row.no_of_people,
            order_id: row.order_id.map(|id| id as u64),
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReservationOverviewRow {
    id: i64,
    user_id: i64,
    table_id: i64,
    booking_date: NaiveDate,
    booking_time: NaiveTime,
    status: String,
    no_of_people: i32,
    order_id: Option<i64>,
    user_name: Option<String>,
    user_email: Option<String>,
    user_phone_no: Option<String>,
    table_outlet_id: Option<i64>,
    table_number: Option<i32>,
    table_capacity: Option<i32>,
}

impl From<ReservationOverviewRow> for models::ReservationOverview {
    fn from(row: ReservationOverviewRow) -> Self {
        let user = match (row.user_name, row.user_email, row.user_phone_no) {
            (Some(name), Some(email), Some(phone_no)) => Some(models::UserSummary {
                id: row.user_id as u64,
                name,
                email,
                phone_no,
            }),
            _ => None,
        };
        let table = match (row.table_outlet_id, row.table_number, row.table_capacity) {
            (Some(outlet_id), Some(table_number), Some(capacity)) => Some(models::TableSummary {
                id: row.table_id as u64,
                outlet_id: outlet_id as u64,
                table_number,
                capacity,
            }),
            _ => None,
        };

        models::ReservationOverview {
            reservation: models::Reservation {
                id: row.id as u64,
                user_id: row.user_id as u64,
                table_id: row.table_id as u64,
                booking_date: row.booking_date,
                booking_time: row.booking_time,
                status: row.status,
                no_of_people: row.no_of_people,
                order_id: row.order_id.map(|id| id as u64),
            },
            user,
            table,
        }
    }
}

impl DatabaseConnection {
    pub async fn get_all_users(&mut self) -> ServiceResult<Vec<models::User>> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT * FROM users ORDER BY id")
            .fetch_all(&mut *self.connection)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_user_by_id(&mut self, id: u64) -> ServiceResult<Option<models::User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id as i64)
            .fetch_optional(&mut *self.connection)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn get_user_by_email(&mut self, email: &str) -> ServiceResult<Option<models::User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *self.connection)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn store_user(&mut self, user: models::User) -> ServiceResult<models::User> {
        let result: Result<UserRow, sqlx::Error> = if user.id == 0 {
            sqlx::query_as(
                "INSERT INTO users (name, email, phone_no, role, password_hash)
                 VALUES ($1, $2, $3, $4, $5) RETURNING *",
            )
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone_no)
            .bind(role_to_db(user.role))
            .bind(&user.password_hash)
            .fetch_one(&mut *self.connection)
            .await
        } else {
            sqlx::query_as(
                "UPDATE users SET name = $2, email = $3, phone_no = $4, role = $5, password_hash = $6
                 WHERE id = $1 RETURNING *",
            )
            .bind(user.id as i64)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone_no)
            .bind(role_to_db(user.role))
            .bind(&user.password_hash)
            .fetch_one(&mut *self.connection)
            .await
        };

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(ServiceError::BadRequest("User already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_user(&mut self, id: u64) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id as i64)
            .execute(&mut *self.connection)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn create_session_token(
        &mut self,
        user_id: u64,
        valid_until: DateTime<Utc>,
    ) -> ServiceResult<String> {
        let mut token_bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut token_bytes);
        let token = general_purpose::URL_SAFE_NO_PAD.encode(token_bytes);

        sqlx::query("INSERT INTO session (token, user_id, valid_until) VALUES ($1, $2, $3)")
            .bind(&token)
            .bind(user_id as i64)
            .bind(valid_until)
            .execute(&mut *self.connection)
            .await?;

        Ok(token)
    }

    pub async fn get_session_by_session_token(
        &mut self,
        token: &str,
    ) -> ServiceResult<Option<models::Session>> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT s.token, s.user_id, s.valid_until, u.role
             FROM session s
             INNER JOIN users u ON u.id = s.user_id
             WHERE s.token = $1 AND s.valid_until > NOW()",
        )
        .bind(token)
        .fetch_optional(&mut *self.connection)
        .await?;
        Ok(row.map(Into::into))
    }

    pub async fn delete_session_token(&mut self, token: &str) -> ServiceResult<()> {
        sqlx::query("DELETE FROM session WHERE token = $1")
            .bind(token)
            .execute(&mut *self.connection)
            .await?;
        Ok(())
    }

    pub async fn get_all_cuisines(&mut self) -> ServiceResult<Vec<models::Cuisine>> {
        let rows: Vec<CuisineRow> = sqlx::query_as("SELECT * FROM cuisines ORDER BY id")
            .fetch_all(&mut *self.connection)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_cuisine_by_id(&mut self, id: u64) -> ServiceResult<Option<models::Cuisine>> {
        let row: Option<CuisineRow> = sqlx::query_as("SELECT * FROM cuisines WHERE id = $1")
            .bind(id as i64)
            .fetch_optional(&mut *self.connection)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn store_cuisine(&mut self, cuisine: models::Cuisine) -> ServiceResult<models::Cuisine> {
        let row: CuisineRow = if cuisine.id == 0 {
            sqlx::query_as("INSERT INTO cuisines (name) VALUES ($1) RETURNING *")
                .bind(&cuisine.name)
                .fetch_one(&mut *self.connection)
                .await?
        } else {
            sqlx::query_as("UPDATE cuisines SET name = $2 WHERE id = $1 RETURNING *")
                .bind(cuisine.id as i64)
                .bind(&cuisine.name)
                .fetch_one(&mut *self.connection)
                .await?
        };
        Ok(row.into())
    }

    pub async fn delete_cuisine(&mut self, id: u64) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM cuisines WHERE id = $1")
            .bind(id as i64)
            .execute(&mut *self.connection)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_all_outlets(&mut self) -> ServiceResult<Vec<models::Outlet>> {
        let rows: Vec<OutletRow> = sqlx::query_as("SELECT * FROM outlets ORDER BY id")
            .fetch_all(&mut *self.connection)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_outlet_by_id(&mut self, id: u64) -> ServiceResult<Option<models::Outlet>> {
        let row: Option<OutletRow> = sqlx::query_as("SELECT * FROM outlets WHERE id = $1")
            .bind(id as i64)
            .fetch_optional(&mut *self.connection)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn store_outlet(&mut self, outlet: models::Outlet) -> ServiceResult<models::Outlet> {
        let result: Result<OutletRow, sqlx::Error> = if outlet.id == 0 {
            sqlx::query_as(
                "INSERT INTO outlets (name, contact, img_url, description, cuisine_id, owner_id)
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
            )
            .bind(&outlet.name)
            .bind(&outlet.contact)
            .bind(&outlet.img_url)
            .bind(&outlet.description)
            .bind(outlet.cuisine_id as i64)
            .bind(outlet.owner_id as i64)
            .fetch_one(&mut *self.connection)
            .await
        } else {
            sqlx::query_as(
                "UPDATE outlets SET name = $2, contact = $3, img_url = $4, description = $5, cuisine_id = $6, owner_id = $7
                 WHERE id = $1 RETURNING *",
            )
            .bind(outlet.id as i64)
            .bind(&outlet.name)
            .bind(&outlet.contact)
            .bind(&outlet.img_url)
            .bind(&outlet.description)
            .bind(outlet.cuisine_id as i64)
            .bind(outlet.owner_id as i64)
            .fetch_one(&mut *self.connection)
            .await
        };

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(
                ServiceError::BadRequest("Outlet already exists or invalid data".to_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_outlet(&mut self, id: u64) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM outlets WHERE id = $1")
            .bind(id as i64)
            .execute(&mut *self.connection)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_all_menu_items(
        &mut self,
        outlet_id: Option<u64>,
    ) -> ServiceResult<Vec<models::MenuItem>> {
        let rows: Vec<MenuItemRow> = if let Some(outlet_id) = outlet_id {
            sqlx::query_as("SELECT * FROM menu_items WHERE outlet_id = $1 ORDER BY id")
                .bind(outlet_id as i64)
                .fetch_all(&mut *self.connection)
                .await?
        } else {
            sqlx::query_as("SELECT * FROM menu_items ORDER BY id")
                .fetch_all(&mut *self.connection)
                .await?
        };
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_menu_item_by_id(&mut self, id: u64) -> ServiceResult<Option<models::MenuItem>> {
        let row: Option<MenuItemRow> = sqlx::query_as("SELECT * FROM menu_items WHERE id = $1")
            .bind(id as i64)
            .fetch_optional(&mut *self.connection)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn store_menu_item(
        &mut self,
        menu_item: models::MenuItem,
    ) -> ServiceResult<models::MenuItem> {
        let result: Result<MenuItemRow, sqlx::Error> = if menu_item.id == 0 {
            sqlx::query_as(
                "INSERT INTO menu_items (name, description, price, category, outlet_id)
                 VALUES ($1, $2, $3, $4, $5) RETURNING *",
            )
            .bind(&menu_item.name)
            .bind(&menu_item.description)
            .bind(menu_item.price)
            .bind(&menu_item.category)
            .bind(menu_item.outlet_id as i64)
            .fetch_one(&mut *self.connection)
            .await
        } else {
            sqlx::query_as(
                "UPDATE menu_items SET name = $2, description = $3, price = $4, category = $5, outlet_id = $6
                 WHERE id = $1 RETURNING *",
            )
            .bind(menu_item.id as i64)
            .bind(&menu_item.name)
            .bind(&menu_item.description)
            .bind(menu_item.price)
            .bind(&menu_item.category)
            .bind(menu_item.outlet_id as i64)
            .fetch_one(&mut *self.connection)
            .await
        };

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(
                ServiceError::BadRequest("Menu item already exists or invalid data".to_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_menu_item(&mut self, id: u64) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id as i64)
            .execute(&mut *self.connection)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_all_orders(&mut self) -> ServiceResult<Vec<models::OrderOverview>> {
        let rows: Vec<OrderOverviewRow> = sqlx::query_as(
            "SELECT o.id, o.user_id, o.total_price, o.status,
                    u.name AS user_name, u.email AS user_email, u.phone_no AS user_phone_no
             FROM orders o
             LEFT JOIN users u ON u.id = o.user_id
             ORDER BY o.id",
        )
        .fetch_all(&mut *self.connection)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_order_by_id(&mut self, id: u64) -> ServiceResult<Option<models::Order>> {
        let row: Option<OrderRow> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
            .bind(id as i64)
            .fetch_optional(&mut *self.connection)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn store_order(&mut self, order: models::Order) -> ServiceResult<models::Order> {
        let row: OrderRow = if order.id == 0 {
            sqlx::query_as(
                "INSERT INTO orders (user_id, total_price, status) VALUES ($1, $2, $3) RETURNING *",
            )
            .bind(order.user_id as i64)
            .bind(order.total_price)
            .bind(&order.status)
            .fetch_one(&mut *self.connection)
            .await?
        } else {
            sqlx::query_as(
                "UPDATE orders SET user_id = $2, total_price = $3, status = $4 WHERE id = $1 RETURNING *",
            )
            .bind(order.id as i64)
            .bind(order.user_id as i64)
            .bind(order.total_price)
            .bind(&order.status)
            .fetch_one(&mut *self.connection)
            .await?
        };
        Ok(row.into())
    }

    pub async fn delete_order(&mut self, id: u64) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id as i64)
            .execute(&mut *self.connection)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_all_order_items(&mut self) -> ServiceResult<Vec<models::OrderItem>> {
        let rows: Vec<OrderItemRow> = sqlx::query_as("SELECT * FROM order_items ORDER BY id")
            .fetch_all(&mut *self.connection)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_order_item_by_id(
        &mut self,
        id: u64,
    ) -> ServiceResult<Option<models::OrderItem>> {
        let row: Option<OrderItemRow> = sqlx::query_as("SELECT * FROM order_items WHERE id = $1")
            .bind(id as i64)
            .fetch_optional(&mut *self.connection)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn store_order_item(
        &mut self,
        order_item: models::OrderItem,
    ) -> ServiceResult<models::OrderItem> {
        let result: Result<OrderItemRow, sqlx::Error> = if order_item.id == 0 {
            sqlx::query_as(
                "INSERT INTO order_items (order_id, menuitem_id, quantity, sub_total)
                 VALUES ($1, $2, $3, $4) RETURNING *",
            )
            .bind(order_item.order_id as i64)
            .bind(order_item.menuitem_id as i64)
            .bind(order_item.quantity)
            .bind(order_item.sub_total)
            .fetch_one(&mut *self.connection)
            .await
        } else {
            sqlx::query_as(
                "UPDATE order_items SET order_id = $2, menuitem_id = $3, quantity = $4, sub_total = $5
                 WHERE id = $1 RETURNING *",
            )
            .bind(order_item.id as i64)
            .bind(order_item.order_id as i64)
            .bind(order_item.menuitem_id as i64)
            .bind(order_item.quantity)
            .bind(order_item.sub_total)
            .fetch_one(&mut *self.connection)
            .await
        };

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(ServiceError::BadRequest("Invalid order item data".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_order_item(&mut self, id: u64) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM order_items WHERE id = $1")
            .bind(id as i64)
            .execute(&mut *self.connection)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_all_tables(&mut self) -> ServiceResult<Vec<models::Table>> {
        let rows: Vec<TableRow> = sqlx::query_as("SELECT * FROM tables ORDER BY id")
            .fetch_all(&mut *self.connection)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_table_by_id(&mut self, id: u64) -> ServiceResult<Option<models::Table>> {
        let row: Option<TableRow> = sqlx::query_as("SELECT * FROM tables WHERE id = $1")
            .bind(id as i64)
            .fetch_optional(&mut *self.connection)
            .await?;
        Ok(row.map(Into::into))
    }

    /// The update branch never writes `is_available`: the flag is owned by
    /// the reservation operations below.
    pub async fn store_table(&mut self, table: models::Table) -> ServiceResult<models::Table> {
        let row: TableRow = if table.id == 0 {
            sqlx::query_as(
                "INSERT INTO tables (outlet_id, table_number, capacity, status, is_available)
                 VALUES ($1, $2, $3, $4, $5) RETURNING *",
            )
            .bind(table.outlet_id as i64)
            .bind(table.table_number)
            .bind(table.capacity)
            .bind(&table.status)
            .bind(table.is_available)
            .fetch_one(&mut *self.connection)
            .await?
        } else {
            sqlx::query_as(
                "UPDATE tables SET outlet_id = $2, table_number = $3, capacity = $4, status = $5
                 WHERE id = $1 RETURNING *",
            )
            .bind(table.id as i64)
            .bind(table.outlet_id as i64)
            .bind(table.table_number)
            .bind(table.capacity)
            .bind(&table.status)
            .fetch_one(&mut *self.connection)
            .await?
        };
        Ok(row.into())
    }

    pub async fn delete_table(&mut self, id: u64) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM tables WHERE id = $1")
            .bind(id as i64)
            .execute(&mut *self.connection)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_all_reservations(&mut self) -> ServiceResult<Vec<models::ReservationOverview>> {
        let rows: Vec<ReservationOverviewRow> = sqlx::query_as(
            "SELECT r.id, r.user_id, r.table_id, r.booking_date, r.booking_time,
                    r.status, r.no_of_people, r.order_id,
                    u.name AS user_name, u.email AS user_email, u.phone_no AS user_phone_no,
                    t.outlet_id AS table_outlet_id, t.table_number, t.capacity AS table_capacity
             FROM reservations r
             LEFT JOIN users u ON u.id = r.user_id
             LEFT JOIN tables t ON t.id = r.table_id
             ORDER BY r.id",
        )
        .fetch_all(&mut *self.connection)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_reservation_by_id(
        &mut self,
        id: u64,
    ) -> ServiceResult<Option<models::Reservation>> {
        let row: Option<ReservationRow> = sqlx::query_as("SELECT * FROM reservations WHERE id = $1")
            .bind(id as i64)
            .fetch_optional(&mut *self.connection)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Claim a table for a new reservation.
    ///
    /// The table row is locked before the availability check so that
    /// concurrent check-then-claim sequences against the same table
    /// serialize. Insert and flag update commit together; an early return
    /// drops the transaction and rolls everything back.
    pub async fn create_reservation(
        &mut self,
        reservation: models::NewReservation,
    ) -> ServiceResult<models::Reservation> {
        let mut tx = self.connection.begin().await?;

        let table: Option<TableRow> = sqlx::query_as("SELECT * FROM tables WHERE id = $1 FOR UPDATE")
            .bind(reservation.table_id as i64)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(table) = table else {
            return Err(ServiceError::NotFound("Table not found"));
        };
        if !table.is_available {
            return Err(ServiceError::BadRequest("Table is not available".to_string()));
        }

        let row: ReservationRow = sqlx::query_as(
            "INSERT INTO reservations (user_id, table_id, booking_date, booking_time, status, no_of_people, order_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(reservation.user_id as i64)
        .bind(reservation.table_id as i64)
        .bind(reservation.booking_date)
        .bind(reservation.booking_time)
        .bind(&reservation.status)
        .bind(reservation.no_of_people)
        .bind(reservation.order_id.map(|id| id as i64))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE tables SET is_available = FALSE WHERE id = $1")
            .bind(table.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    /// Apply a sparse update to a reservation.
    ///
    /// A table change releases the old table and claims the new one in the
    /// same transaction; no observer can see one without the other. The old
    /// table may have been deleted out-of-band, in which case only the new
    /// claim is written.
    pub async fn update_reservation(
        &mut self,
        id: u64,
        patch: models::ReservationPatch,
    ) -> ServiceResult<models::Reservation> {
        let mut tx = self.connection.begin().await?;

        let row: Option<ReservationRow> = sqlx::query_as("SELECT * FROM reservations WHERE id = $1")
            .bind(id as i64)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Err(ServiceError::NotFound("Reservation not found"));
        };
        let mut reservation: models::Reservation = row.into();

        if let Some(table_id) = patch.table_id {
            if table_id != reservation.table_id {
                let new_table: Option<TableRow> =
                    sqlx::query_as("SELECT * FROM tables WHERE id = $1 FOR UPDATE")
                        .bind(table_id as i64)
                        .fetch_optional(&mut *tx)
                        .await?;
                let Some(new_table) = new_table else {
                    return Err(ServiceError::NotFound("New table not found"));
                };
                if !new_table.is_available {
                    return Err(ServiceError::BadRequest(
                        "New table is not available".to_string(),
                    ));
                }

                sqlx::query("UPDATE tables SET is_available = TRUE WHERE id = $1")
                    .bind(reservation.table_id as i64)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query("UPDATE tables SET is_available = FALSE WHERE id = $1")
                    .bind(new_table.id)
                    .execute(&mut *tx)
                    .await?;
                reservation.table_id = table_id;
            }
        }

        if let Some(user_id) = patch.user_id {
            reservation.user_id = user_id;
        }
        if let Some(booking_date) = patch.booking_date {
            reservation.booking_date = booking_date;
        }
        if let Some(booking_time) = patch.booking_time {
            reservation.booking_time = booking_time;
        }
        if let Some(status) = patch.status {
            reservation.status = status;
        }
        if let Some(no_of_people) = patch.no_of_people {
            reservation.no_of_people = no_of_people;
        }

        let row: ReservationRow = sqlx::query_as(
            "UPDATE reservations
             SET user_id = $2, table_id = $3, booking_date = $4, booking_time = $5, status = $6, no_of_people = $7
             WHERE id = $1 RETURNING *",
        )
        .bind(reservation.id as i64)
        .bind(reservation.user_id as i64)
        .bind(reservation.table_id as i64)
        .bind(reservation.booking_date)
        .bind(reservation.booking_time)
        .bind(&reservation.status)
        .bind(reservation.no_of_people)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    /// Delete a reservation and release its table.
    ///
    /// The table is locked before the delete; if it was removed out-of-band
    /// the reservation is deleted without a flag update.
    pub async fn delete_reservation(&mut self, id: u64) -> ServiceResult<()> {
        let mut tx = self.connection.begin().await?;

        let row: Option<ReservationRow> = sqlx::query_as("SELECT * FROM reservations WHERE id = $1")
            .bind(id as i64)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Err(ServiceError::NotFound("Reservation not found"));
        };

        let table: Option<TableRow> = sqlx::query_as("SELECT * FROM tables WHERE id = $1 FOR UPDATE")
            .bind(row.table_id)
            .fetch_optional(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;

        if let Some(table) = table {
            sqlx::query("UPDATE tables SET is_available = TRUE WHERE id = $1")
                .bind(table.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
