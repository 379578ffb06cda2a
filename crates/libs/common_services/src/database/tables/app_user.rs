use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Represents a user in the application.
#[derive(Debug, FromRow, Clone)]
pub struct User {
    pub id: i32,
    pub identity_provider_id: String,
    pub email: String,
    pub display_name: String,
    pub picture_url: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile data of a freshly verified identity, used to create or refresh a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub identity_provider_id: String,
    pub email: String,
    pub display_name: String,
    pub picture_url: Option<String>,
}

/// Public projection of a user.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: i32,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            name: user.display_name,
            picture: user.picture_url,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Maps to the `user_role` Postgres enum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Consumer,
    Creator,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Consumer => write!(f, "consumer"),
            Self::Creator => write!(f, "creator"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid role: {0}")]
pub struct InvalidRole(pub String);

impl FromStr for UserRole {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consumer" => Ok(Self::Consumer),
            "creator" => Ok(Self::Creator),
            "admin" => Ok(Self::Admin),
            other => Err(InvalidRole(other.to_owned())),
        }
    }
}
