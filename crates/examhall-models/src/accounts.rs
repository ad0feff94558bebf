//! Account records.
//!
//! Admins and students live in the same table; only the role tells them apart.

use chrono::{DateTime, Utc};
use examhall_core::permissions::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ids::{CampusId, CourseId, UserId};

/// A stored account.
///
/// `role` is decoded from storage on every lookup, so a role change takes
/// effect on the next request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub role: Role,
    pub campus_id: Option<CampusId>,
    pub course_id: Option<CourseId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an account. `password` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub campus_id: Option<CampusId>,
    pub course_id: Option<CourseId>,
}

impl NewAccount {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password_hash.into(),
            role,
            campus_id: None,
            course_id: None,
        }
    }

    pub fn with_campus(mut self, campus_id: CampusId) -> Self {
        self.campus_id = Some(campus_id);
        self
    }

    pub fn with_course(mut self, course_id: CourseId) -> Self {
        self.course_id = Some(course_id);
        self
    }
}
