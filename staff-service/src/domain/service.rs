use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::responses::PagedResult;
use shared::types::Staff;

use crate::domain::export::{self, CsvLayout};
use crate::domain::pipeline;
use crate::domain::search::{SearchCriteria, sanitize};
use crate::domain::staff::{CreateStaff, StaffRepository, StaffView, UpdateStaff};
use crate::error::StaffServiceError;

/// Staff use cases on top of a [`StaffRepository`]: validation, listing through
/// the query pipeline, exports and lookup lists.
pub struct StaffService {
    repo: Arc<dyn StaffRepository>,
    timezone: Tz,
}

impl StaffService {
    pub fn new(repo: Arc<dyn StaffRepository>, timezone: Tz) -> Self {
        Self { repo, timezone }
    }

    fn today(&self) -> NaiveDate {
        shared::time::today_in(self.timezone)
    }

    /// Sanitizes the criteria and runs the pipeline over one snapshot of the
    /// store, so the count and the page always agree.
    #[tracing::instrument(skip(self))]
    pub async fn list(
        &self,
        criteria: SearchCriteria,
    ) -> Result<PagedResult<StaffView>, StaffServiceError> {
        let criteria = sanitize(criteria);
        let snapshot = self.repo.find_all().await?;
        let page = pipeline::execute(snapshot, &criteria);

        tracing::debug!(
            total_count = page.total_count,
            returned = page.items.len(),
            "Staff listing computed"
        );

        Ok(page.map(StaffView::from))
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<StaffView, StaffServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(StaffView::from)
            .ok_or_else(|| StaffServiceError::staff_not_found(id))
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn create(&self, payload: CreateStaff) -> Result<StaffView, StaffServiceError> {
        let fields = payload.into_fields(self.today())?;
        let staff = self.repo.create(fields).await?;
        tracing::info!(staff_id = staff.id, "Staff member created");

        Ok(staff.into())
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn update(
        &self,
        id: i64,
        payload: UpdateStaff,
    ) -> Result<StaffView, StaffServiceError> {
        let fields = payload.into_fields(self.today())?;
        let staff = self.repo.update(id, fields).await?;
        tracing::info!(staff_id = staff.id, "Staff member updated");

        Ok(staff.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), StaffServiceError> {
        self.repo.delete(id).await?;
        tracing::info!(staff_id = id, "Staff member deleted");

        Ok(())
    }

    /// Free-text search: first page of 100, no other filters.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<StaffView>, StaffServiceError> {
        if term.trim().is_empty() {
            return Err(StaffServiceError::BadRequest(
                "Search term is required".to_string(),
            ));
        }

        let page = self.list(SearchCriteria::quick_search(term)).await?;
        Ok(page.items)
    }

    /// Every record, ordered by id, encoded with the given layout.
    #[tracing::instrument(skip(self, layout))]
    pub async fn export(&self, layout: &CsvLayout) -> Result<Vec<u8>, StaffServiceError> {
        let records: Vec<StaffView> = self
            .repo
            .find_all()
            .await?
            .into_iter()
            .map(StaffView::from)
            .collect();
        tracing::info!(record_count = records.len(), "Exporting staff");

        Ok(export::encode(&records, layout))
    }

    /// Distinct departments of active staff, sorted.
    #[tracing::instrument(skip(self))]
    pub async fn departments(&self) -> Result<Vec<String>, StaffServiceError> {
        self.active_values(|staff| &staff.department).await
    }

    /// Distinct positions of active staff, sorted.
    #[tracing::instrument(skip(self))]
    pub async fn positions(&self) -> Result<Vec<String>, StaffServiceError> {
        self.active_values(|staff| &staff.position).await
    }

    async fn active_values(
        &self,
        field: impl Fn(&Staff) -> &String,
    ) -> Result<Vec<String>, StaffServiceError> {
        let staff = self.repo.find_all().await?;
        let values: BTreeSet<String> = staff
            .iter()
            .filter(|staff| staff.is_active)
            .map(|staff| field(staff).clone())
            .collect();

        Ok(values.into_iter().collect())
    }
}
