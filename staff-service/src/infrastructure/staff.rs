use async_trait::async_trait;
use shared::types::{Staff, StaffFields};
use sqlx::PgPool;

use crate::{domain::staff::StaffRepository, error::StaffServiceError};

const STAFF_COLUMNS: &str = "id, first_name, last_name, email, phone, department, position, \
                             salary, hire_date, is_active, created_at, updated_at";

pub struct PgStaffRepository {
    pool: PgPool,
}

impl PgStaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Turns a hit on the `staff_email_lower_key` index into a conflict.
fn map_write_error(err: sqlx::Error, email: &str) -> StaffServiceError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StaffServiceError::duplicate_email(email)
        }
        _ => err.into(),
    }
}

#[async_trait]
impl StaffRepository for PgStaffRepository {
    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Staff>, StaffServiceError> {
        let output = sqlx::query_as::<_, Staff>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(output)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Staff>, StaffServiceError> {
        let output = sqlx::query_as::<_, Staff>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(output)
    }

    #[tracing::instrument(skip(self, staff))]
    async fn create(&self, staff: StaffFields) -> Result<Staff, StaffServiceError> {
        sqlx::query_as::<_, Staff>(&format!(
            r#"
            INSERT INTO staff (first_name, last_name, email, phone, department, position,
                               salary, hire_date, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {STAFF_COLUMNS}
            "#
        ))
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(&staff.email)
        .bind(&staff.phone)
        .bind(&staff.department)
        .bind(&staff.position)
        .bind(staff.salary)
        .bind(staff.hire_date)
        .bind(staff.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &staff.email))
    }

    #[tracing::instrument(skip(self, staff))]
    async fn update(&self, id: i64, staff: StaffFields) -> Result<Staff, StaffServiceError> {
        let output = sqlx::query_as::<_, Staff>(&format!(
            r#"
            UPDATE staff
            SET first_name = $2,
                last_name = $3,
                email = $4,
                phone = $5,
                department = $6,
                position = $7,
                salary = $8,
                hire_date = $9,
                is_active = $10,
                updated_at = now()
            WHERE id = $1
            RETURNING {STAFF_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(&staff.email)
        .bind(&staff.phone)
        .bind(&staff.department)
        .bind(&staff.position)
        .bind(staff.salary)
        .bind(staff.hire_date)
        .bind(staff.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &staff.email))?;

        output.ok_or_else(|| StaffServiceError::staff_not_found(id))
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), StaffServiceError> {
        let output = sqlx::query("DELETE FROM staff WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if output.rows_affected() == 0 {
            return Err(StaffServiceError::staff_not_found(id));
        }

        Ok(())
    }
}
