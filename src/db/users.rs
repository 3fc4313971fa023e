//! Credential record lookup

use crate::error::Result;
use deadpool_postgres::Client;
use tokio_postgres::Row;

/// A row of the `front_users` table.
///
/// The password hash is loaded for verification inside the login handler
/// and must never be copied into a session snapshot or response body.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub password_hash: String,
    pub role_id: i32,
    pub city_id: i32,
    pub age: Option<i32>,
    pub category: Option<String>,
}

impl CredentialRecord {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            surname: row.try_get("surname")?,
            password_hash: row.try_get("password")?,
            role_id: row.try_get("role_id")?,
            city_id: row.try_get("city_id")?,
            age: row.try_get("age")?,
            category: row.try_get("category")?,
        })
    }
}

/// Look up a credential record by the identity tuple.
///
/// The tuple is not assumed unique; rows are ordered by id and the first
/// match wins. This is a deliberate, deterministic policy.
pub async fn find_credential(
    client: &Client,
    name: &str,
    surname: &str,
    role_id: i32,
    city_id: i32,
) -> Result<Option<CredentialRecord>> {
    let row = client
        .query_opt(
            "SELECT id, name, surname, password, role_id, city_id, age, category \
             FROM front_users \
             WHERE name = $1 AND surname = $2 AND role_id = $3 AND city_id = $4 \
             ORDER BY id \
             LIMIT 1",
            &[&name, &surname, &role_id, &city_id],
        )
        .await?;

    row.as_ref().map(CredentialRecord::from_row).transpose()
}
