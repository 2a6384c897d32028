use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use shared::types::{Staff, StaffFields};
use tokio::sync::RwLock;

use crate::{domain::staff::StaffRepository, error::StaffServiceError};

#[derive(Debug)]
struct Store {
    records: BTreeMap<i64, Staff>,
    next_id: i64,
}

impl Store {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.records
            .values()
            .any(|staff| Some(staff.id) != except && staff.email.eq_ignore_ascii_case(email))
    }
}

/// Process-local store used when no database is configured.
///
/// Ids start at 1, increase by one per insert and are never reused.
#[derive(Debug)]
pub struct InMemoryStaffRepository {
    store: RwLock<Store>,
}

impl Default for InMemoryStaffRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStaffRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store {
                records: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Store pre-filled with five demo staff members (ids 1 to 5).
    pub fn seeded() -> Self {
        let now = Utc::now();
        let records: BTreeMap<i64, Staff> = demo_staff()
            .into_iter()
            .zip(1..)
            .map(|(fields, id)| (id, fields.into_staff(id, now)))
            .collect();
        let next_id = records.len() as i64 + 1;

        Self {
            store: RwLock::new(Store { records, next_id }),
        }
    }
}

type DemoRow = (&'static str, &'static str, &'static str, &'static str, f64, (i32, u32, u32), bool);

const DEMO_STAFF: [DemoRow; 5] = [
    ("John", "Doe", "Engineering", "Senior Software Engineer", 95000.0, (2020, 1, 15), true),
    ("Jane", "Smith", "Human Resources", "HR Manager", 75000.0, (2019, 6, 10), true),
    ("Michael", "Johnson", "Finance", "Financial Analyst", 65000.0, (2021, 3, 22), true),
    ("Sarah", "Williams", "Marketing", "Marketing Specialist", 58000.0, (2022, 8, 5), true),
    ("David", "Brown", "Engineering", "DevOps Engineer", 88000.0, (2021, 11, 12), false),
];

fn demo_staff() -> Vec<StaffFields> {
    DEMO_STAFF
        .iter()
        .zip(1..)
        .map(
            |(&(first_name, last_name, department, position, salary, (y, m, d), is_active), n)| {
                StaffFields {
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                    email: format!(
                        "{}.{}@company.com",
                        first_name.to_lowercase(),
                        last_name.to_lowercase()
                    ),
                    phone: Some(format!("+1-555-010{n}")),
                    department: department.to_string(),
                    position: position.to_string(),
                    salary,
                    hire_date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
                    is_active,
                }
            },
        )
        .collect()
}

#[async_trait]
impl StaffRepository for InMemoryStaffRepository {
    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Staff>, StaffServiceError> {
        let store = self.store.read().await;

        Ok(store.records.get(&id).cloned())
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Staff>, StaffServiceError> {
        let store = self.store.read().await;

        Ok(store.records.values().cloned().collect())
    }

    #[tracing::instrument(skip(self, staff))]
    async fn create(&self, staff: StaffFields) -> Result<Staff, StaffServiceError> {
        let mut store = self.store.write().await;
        if store.email_taken(&staff.email, None) {
            return Err(StaffServiceError::duplicate_email(&staff.email));
        }

        let id = store.next_id;
        store.next_id += 1;
        let output = staff.into_staff(id, Utc::now());
        store.records.insert(id, output.clone());

        Ok(output)
    }

    #[tracing::instrument(skip(self, staff))]
    async fn update(&self, id: i64, staff: StaffFields) -> Result<Staff, StaffServiceError> {
        let mut store = self.store.write().await;
        if !store.records.contains_key(&id) {
            return Err(StaffServiceError::staff_not_found(id));
        }
        if store.email_taken(&staff.email, Some(id)) {
            return Err(StaffServiceError::duplicate_email(&staff.email));
        }

        let existing = store
            .records
            .get_mut(&id)
            .ok_or_else(|| StaffServiceError::staff_not_found(id))?;
        staff.apply_to(existing, Utc::now());

        Ok(existing.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), StaffServiceError> {
        let mut store = self.store.write().await;

        store
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StaffServiceError::staff_not_found(id))
    }
}
