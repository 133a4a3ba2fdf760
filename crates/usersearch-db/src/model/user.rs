//! Models for the `search_user` table.

use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

/// Stored user row.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::search_user)]
#[diesel(check_for_backend(Pg))]
pub struct SearchUser {
    pub id: i64,
    pub name: String,
    pub comment: String,
    pub visits: f64,
    pub last_visit: chrono::DateTime<chrono::Utc>,
    pub birthday: chrono::DateTime<chrono::Utc>,
    pub mail: Vec<String>,
    pub user_id: i64,
    pub field1: String,
    pub field2: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// New user row for insertion; `id` and `created_at` come from the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::search_user)]
pub struct NewSearchUser {
    pub name: String,
    pub comment: String,
    pub visits: f64,
    pub last_visit: chrono::DateTime<chrono::Utc>,
    pub birthday: chrono::DateTime<chrono::Utc>,
    pub mail: Vec<String>,
    pub user_id: i64,
    pub field1: String,
    pub field2: String,
}
