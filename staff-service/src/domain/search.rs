use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MIN_PAGE_SIZE: i64 = 1;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page size used by the quick search endpoint.
pub const QUICK_SEARCH_PAGE_SIZE: i64 = 100;

/// Fields the listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    FirstName,
    LastName,
    Email,
    Department,
    Position,
    Salary,
    HireDate,
}

/// Canonical names accepted for `sortBy`, matched case-insensitively.
const SORT_FIELDS: [(&str, SortField); 8] = [
    ("Id", SortField::Id),
    ("FirstName", SortField::FirstName),
    ("LastName", SortField::LastName),
    ("Email", SortField::Email),
    ("Department", SortField::Department),
    ("Position", SortField::Position),
    ("Salary", SortField::Salary),
    ("HireDate", SortField::HireDate),
];

impl SortField {
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        SORT_FIELDS
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, field)| *field)
    }

    /// Resolves a `sortBy` value, falling back to [`SortField::Id`].
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        SORT_FIELDS
            .iter()
            .find(|(_, field)| *field == self)
            .map_or("Id", |(name, _)| *name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if name.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    /// Only `desc` sorts descending; every other value sorts ascending.
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filter, sort and paging options for the staff listing.
///
/// Built from the query string as-is; run it through [`sanitize`] before
/// handing it to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchCriteria {
    /// Matched against first name, last name, email, department and position.
    pub search_term: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub is_active: Option<bool>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub hire_date_from: Option<NaiveDate>,
    pub hire_date_to: Option<NaiveDate>,
    pub page: i64,
    pub page_size: i64,
    pub sort_by: String,
    pub sort_direction: String,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            search_term: None,
            department: None,
            position: None,
            is_active: None,
            min_salary: None,
            max_salary: None,
            hire_date_from: None,
            hire_date_to: None,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: SortField::default().name().to_string(),
            sort_direction: SortDirection::default().name().to_string(),
        }
    }
}

impl SearchCriteria {
    /// Criteria used by the quick search endpoint: one large first page, no
    /// other filters.
    pub fn quick_search(term: &str) -> Self {
        Self {
            search_term: Some(term.to_string()),
            page_size: QUICK_SEARCH_PAGE_SIZE,
            ..Self::default()
        }
    }

    pub fn sort_field(&self) -> SortField {
        SortField::resolve(&self.sort_by)
    }

    pub fn direction(&self) -> SortDirection {
        SortDirection::resolve(&self.sort_direction)
    }
}

/// Normalizes raw criteria into something the pipeline can run without checks.
///
/// Text filters are stripped of quote characters, trimmed and lowercased
/// (blank becomes absent). Unknown sort values and out-of-range paging fall
/// back to their defaults. Salary bounds that are not finite numbers are
/// dropped. Never fails, and sanitizing twice changes nothing.
pub fn sanitize(raw: SearchCriteria) -> SearchCriteria {
    let sort_by = SortField::resolve(&raw.sort_by).name().to_string();
    let sort_direction = SortDirection::resolve(&raw.sort_direction)
        .name()
        .to_string();

    let page_size = if (MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&raw.page_size) {
        raw.page_size
    } else {
        DEFAULT_PAGE_SIZE
    };

    SearchCriteria {
        search_term: sanitize_text(raw.search_term),
        department: sanitize_text(raw.department),
        position: sanitize_text(raw.position),
        min_salary: raw.min_salary.filter(|value| value.is_finite()),
        max_salary: raw.max_salary.filter(|value| value.is_finite()),
        page: raw.page.max(DEFAULT_PAGE),
        page_size,
        sort_by,
        sort_direction,
        ..raw
    }
}

fn sanitize_text(value: Option<String>) -> Option<String> {
    let value = value?;
    let cleaned: String = value.chars().filter(|c| !matches!(c, '\'' | '"')).collect();
    let cleaned = cleaned.trim().to_lowercase();

    (!cleaned.is_empty()).then_some(cleaned)
}
