use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::types::{Staff, StaffFields};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::validation::{validate_payload, validate_phone};
use crate::error::StaffServiceError;

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaff {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "First name is required (max 100 characters)"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Last name is required (max 100 characters)"))]
    pub last_name: String,
    #[serde(default)]
    #[validate(
        email(message = "Email address is not valid"),
        length(min = 1, max = 255, message = "Email is required (max 255 characters)")
    )]
    pub email: String,
    #[validate(
        length(max = 20, message = "Phone must not exceed 20 characters"),
        custom(function = "validate_phone")
    )]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Department is required (max 100 characters)"))]
    pub department: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Position is required (max 100 characters)"))]
    pub position: String,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 999_999_999.0, message = "Salary must be between 0 and 999999999"))]
    pub salary: f64,
    pub hire_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl CreateStaff {
    /// Validates the payload and turns it into storable fields.
    pub fn into_fields(self, today: NaiveDate) -> Result<StaffFields, StaffServiceError> {
        let hire_date = validate_payload(&self, self.hire_date, today)?;

        Ok(StaffFields {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: normalize_phone(self.phone),
            department: self.department,
            position: self.position,
            salary: self.salary,
            hire_date,
            is_active: self.is_active,
        })
    }
}

/// Full replacement of a staff member's mutable fields.
///
/// `isActive` is overwritten like everything else and reads as `false` when
/// the client leaves it out.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaff {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "First name is required (max 100 characters)"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Last name is required (max 100 characters)"))]
    pub last_name: String,
    #[serde(default)]
    #[validate(
        email(message = "Email address is not valid"),
        length(min = 1, max = 255, message = "Email is required (max 255 characters)")
    )]
    pub email: String,
    #[validate(
        length(max = 20, message = "Phone must not exceed 20 characters"),
        custom(function = "validate_phone")
    )]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Department is required (max 100 characters)"))]
    pub department: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Position is required (max 100 characters)"))]
    pub position: String,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 999_999_999.0, message = "Salary must be between 0 and 999999999"))]
    pub salary: f64,
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_active: bool,
}

impl UpdateStaff {
    pub fn into_fields(self, today: NaiveDate) -> Result<StaffFields, StaffServiceError> {
        let hire_date = validate_payload(&self, self.hire_date, today)?;

        Ok(StaffFields {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: normalize_phone(self.phone),
            department: self.department,
            position: self.position,
            salary: self.salary,
            hire_date,
            is_active: self.is_active,
        })
    }
}

fn normalize_phone(phone: Option<String>) -> Option<String> {
    phone
        .map(|phone| phone.trim().to_string())
        .filter(|phone| !phone.is_empty())
}

/// Staff member as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffView {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: String,
    pub position: String,
    pub salary: f64,
    pub hire_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Staff> for StaffView {
    fn from(staff: Staff) -> Self {
        Self {
            full_name: staff.full_name(),
            id: staff.id,
            first_name: staff.first_name,
            last_name: staff.last_name,
            email: staff.email,
            phone: staff.phone,
            department: staff.department,
            position: staff.position,
            salary: staff.salary,
            hire_date: staff.hire_date,
            is_active: staff.is_active,
            created_at: staff.created_at,
            updated_at: staff.updated_at,
        }
    }
}

/// Persistence for staff records.
///
/// Email addresses are unique (case-insensitively); `create` and `update`
/// report a clash as [`StaffServiceError::Conflict`].
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Staff>, StaffServiceError>;
    /// Full scan, ordered by id.
    async fn find_all(&self) -> Result<Vec<Staff>, StaffServiceError>;
    async fn create(&self, staff: StaffFields) -> Result<Staff, StaffServiceError>;
    async fn update(&self, id: i64, staff: StaffFields) -> Result<Staff, StaffServiceError>;
    async fn delete(&self, id: i64) -> Result<(), StaffServiceError>;
}
