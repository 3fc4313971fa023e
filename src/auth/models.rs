//! Authentication request and response models

use crate::db::CredentialRecord;
use serde::{Deserialize, Serialize};

/// Login credentials.
///
/// The schema is strict: all five fields are required and payloads with
/// unknown fields are rejected at deserialization time.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub name: String,
    pub surname: String,
    pub password: String,
    pub role_id: i32,
    pub city_id: i32,
}

impl LoginRequest {
    /// Collect every violated field, not just the first one.
    pub fn violations(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if self.name.trim().is_empty() {
            fields.push("name".to_string());
        }
        if self.surname.trim().is_empty() {
            fields.push("surname".to_string());
        }
        if self.password.is_empty() {
            fields.push("password".to_string());
        }
        fields
    }
}

/// Identity snapshot held in the session and returned to the client.
///
/// Mirrors the credential record's public fields; the password hash has
/// no field here at the type level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub role_id: i32,
    pub city_id: i32,
    pub age: Option<i32>,
    pub category: Option<String>,
}

impl From<&CredentialRecord> for SessionUser {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            surname: record.surname.clone(),
            role_id: record.role_id,
            city_id: record.city_id,
            age: record.age,
            category: record.category.clone(),
        }
    }
}

/// Successful login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: SessionUser,
}

/// Generic acknowledgement body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
