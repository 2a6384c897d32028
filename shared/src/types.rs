use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// region: Staff Types

/// A staff record as held by the store.
///
/// `id`, `created_at` and `updated_at` are owned by the store: ids are assigned
/// on insert and never reused, `created_at` never changes after insert and
/// `updated_at` is refreshed on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Staff {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
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

impl Staff {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Mutable fields of a staff record, shared by inserts and full overwrites.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: String,
    pub position: String,
    pub salary: f64,
    pub hire_date: NaiveDate,
    pub is_active: bool,
}

impl StaffFields {
    /// Builds the stored record for a freshly assigned id.
    pub fn into_staff(self, id: i64, now: DateTime<Utc>) -> Staff {
        Staff {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            department: self.department,
            position: self.position,
            salary: self.salary,
            hire_date: self.hire_date,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites every mutable field of `staff`, keeping `id` and `created_at`.
    pub fn apply_to(self, staff: &mut Staff, now: DateTime<Utc>) {
        staff.first_name = self.first_name;
        staff.last_name = self.last_name;
        staff.email = self.email;
        staff.phone = self.phone;
        staff.department = self.department;
        staff.position = self.position;
        staff.salary = self.salary;
        staff.hire_date = self.hire_date;
        staff.is_active = self.is_active;
        staff.updated_at = now;
    }
}

// endregion: Staff Types

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fields() -> StaffFields {
        StaffFields {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@company.com".to_string(),
            phone: None,
            department: "Engineering".to_string(),
            position: "Engineer".to_string(),
            salary: 95000.0,
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
            is_active: true,
        }
    }

    #[test]
    fn full_name_joins_with_single_space() {
        let staff = fields().into_staff(1, Utc::now());
        assert_eq!(staff.full_name(), "John Doe");
    }

    #[test]
    fn apply_to_keeps_identity_and_creation_time() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let mut staff = fields().into_staff(7, created);

        let mut changed = fields();
        changed.position = "Staff Engineer".to_string();
        changed.is_active = false;
        changed.apply_to(&mut staff, later);

        assert_eq!(staff.id, 7);
        assert_eq!(staff.created_at, created);
        assert_eq!(staff.updated_at, later);
        assert_eq!(staff.position, "Staff Engineer");
        assert!(!staff.is_active);
    }
}
