#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Onboarding answers. `role` and `skills` stay NULL until the user picks them.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub role: Option<String>,
    /// JSON array of skill names stored as text; decode with `profile::skills::parse_skills`.
    pub skills: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// The chosen role, treating blank as unset.
    pub fn selected_role(&self) -> Option<&str> {
        self.role.as_deref().filter(|r| !r.trim().is_empty())
    }
}
