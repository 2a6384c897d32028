use std::cmp::Ordering;

use chrono::NaiveDate;
use shared::{responses::PagedResult, types::Staff};

use crate::domain::search::{SearchCriteria, SortDirection, SortField};

/// One active filter of a listing request. Records must satisfy all of them.
#[derive(Debug, Clone, PartialEq)]
pub enum StaffFilter {
    /// Lowercased term matched against any of the text fields.
    Term(String),
    Department(String),
    Position(String),
    Active(bool),
    MinSalary(f64),
    MaxSalary(f64),
    HiredFrom(NaiveDate),
    HiredTo(NaiveDate),
}

impl StaffFilter {
    pub fn matches(&self, staff: &Staff) -> bool {
        match self {
            Self::Term(term) => [
                &staff.first_name,
                &staff.last_name,
                &staff.email,
                &staff.department,
                &staff.position,
            ]
            .into_iter()
            .any(|field| contains_ignore_case(field, term)),
            Self::Department(needle) => contains_ignore_case(&staff.department, needle),
            Self::Position(needle) => contains_ignore_case(&staff.position, needle),
            Self::Active(active) => staff.is_active == *active,
            Self::MinSalary(min) => staff.salary >= *min,
            Self::MaxSalary(max) => staff.salary <= *max,
            Self::HiredFrom(from) => staff.hire_date >= *from,
            Self::HiredTo(to) => staff.hire_date <= *to,
        }
    }
}

/// `needle` must already be lowercase.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Turns the criteria into the list of filters to apply, skipping blank ones.
pub fn build_filters(criteria: &SearchCriteria) -> Vec<StaffFilter> {
    let text = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase)
    };

    let mut filters = Vec::new();

    if let Some(term) = text(&criteria.search_term) {
        filters.push(StaffFilter::Term(term));
    }
    if let Some(department) = text(&criteria.department) {
        filters.push(StaffFilter::Department(department));
    }
    if let Some(position) = text(&criteria.position) {
        filters.push(StaffFilter::Position(position));
    }
    if let Some(active) = criteria.is_active {
        filters.push(StaffFilter::Active(active));
    }
    if let Some(min) = criteria.min_salary {
        filters.push(StaffFilter::MinSalary(min));
    }
    if let Some(max) = criteria.max_salary {
        filters.push(StaffFilter::MaxSalary(max));
    }
    if let Some(from) = criteria.hire_date_from {
        filters.push(StaffFilter::HiredFrom(from));
    }
    if let Some(to) = criteria.hire_date_to {
        filters.push(StaffFilter::HiredTo(to));
    }

    filters
}

type StaffComparator = fn(&Staff, &Staff) -> Ordering;

fn comparator(field: SortField) -> StaffComparator {
    match field {
        SortField::Id => |a, b| a.id.cmp(&b.id),
        SortField::FirstName => |a, b| a.first_name.cmp(&b.first_name),
        SortField::LastName => |a, b| a.last_name.cmp(&b.last_name),
        SortField::Email => |a, b| a.email.cmp(&b.email),
        SortField::Department => |a, b| a.department.cmp(&b.department),
        SortField::Position => |a, b| a.position.cmp(&b.position),
        SortField::Salary => |a, b| a.salary.total_cmp(&b.salary),
        SortField::HireDate => |a, b| a.hire_date.cmp(&b.hire_date),
    }
}

/// Filters, sorts and pages a snapshot of the store.
///
/// `total_count` is taken from the filtered set, so it is the same on every
/// page. Ties on the sort field are broken by id in the requested direction,
/// which makes `desc` the exact reverse of `asc`. Expects sanitized criteria
/// (`page >= 1`, `page_size >= 1`); a page past the end is empty.
pub fn execute(records: Vec<Staff>, criteria: &SearchCriteria) -> PagedResult<Staff> {
    let filters = build_filters(criteria);
    let mut matched: Vec<Staff> = records
        .into_iter()
        .filter(|staff| filters.iter().all(|filter| filter.matches(staff)))
        .collect();

    let total_count = matched.len();

    let compare = comparator(criteria.sort_field());
    let direction = criteria.direction();
    matched.sort_by(|a, b| {
        let ordering = compare(a, b).then_with(|| a.id.cmp(&b.id));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let page = usize::try_from(criteria.page).unwrap_or(1).max(1);
    let page_size = usize::try_from(criteria.page_size).unwrap_or(1).max(1);
    let skip = (page - 1).saturating_mul(page_size);

    let items = matched.into_iter().skip(skip).take(page_size).collect();

    PagedResult::new(items, total_count, page, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::sanitize;
    use chrono::Utc;

    fn staff(
        id: i64,
        first_name: &str,
        department: &str,
        salary: f64,
        hire_date: (i32, u32, u32),
        is_active: bool,
    ) -> Staff {
        let now = Utc::now();
        Staff {
            id,
            first_name: first_name.to_string(),
            last_name: format!("Last{id}"),
            email: format!("{}@company.com", first_name.to_lowercase()),
            phone: None,
            department: department.to_string(),
            position: format!("{department} Specialist"),
            salary,
            hire_date: NaiveDate::from_ymd_opt(hire_date.0, hire_date.1, hire_date.2).unwrap(),
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// 3 Engineering (only David active), 1 HR, 1 Marketing.
    fn seeded() -> Vec<Staff> {
        vec![
            staff(1, "John", "Engineering", 95000.0, (2020, 1, 15), false),
            staff(2, "Jane", "Human Resources", 75000.0, (2019, 6, 10), true),
            staff(3, "Michael", "Engineering", 65000.0, (2021, 3, 22), false),
            staff(4, "Sarah", "Marketing", 58000.0, (2022, 8, 5), true),
            staff(5, "David", "Engineering", 88000.0, (2021, 11, 12), true),
        ]
    }

    fn ids(result: &PagedResult<Staff>) -> Vec<i64> {
        result.items.iter().map(|s| s.id).collect()
    }

    fn criteria() -> SearchCriteria {
        SearchCriteria::default()
    }

    #[test]
    fn no_filters_returns_everything() {
        let result = execute(seeded(), &criteria());

        assert_eq!(result.total_count, 5);
        assert_eq!(result.total_pages, 1);
        assert!(!result.has_next);
        assert!(!result.has_previous);
        assert_eq!(ids(&result), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn pagination_arithmetic_follows_total_count() {
        for page_size in 1..=6 {
            let result = execute(
                seeded(),
                &SearchCriteria {
                    page_size,
                    ..criteria()
                },
            );
            let expected_pages = 5usize.div_ceil(page_size as usize);
            assert_eq!(result.total_count, 5);
            assert_eq!(result.total_pages, expected_pages);
            assert_eq!(result.has_next, expected_pages > 1);
        }
    }

    #[test]
    fn department_and_active_filters_combine() {
        let raw = SearchCriteria {
            department: Some("engineering".to_string()),
            is_active: Some(true),
            ..criteria()
        };
        let result = execute(seeded(), &sanitize(raw));

        assert_eq!(result.total_count, 1);
        assert_eq!(ids(&result), vec![5]);
    }

    #[test]
    fn text_filters_ignore_case() {
        for needle in ["engineering", "ENGIN", "gInEeR"] {
            let result = execute(
                seeded(),
                &SearchCriteria {
                    department: Some(needle.to_string()),
                    ..criteria()
                },
            );
            assert_eq!(ids(&result), vec![1, 3, 5], "needle {needle}");
        }
    }

    #[test]
    fn search_term_matches_any_text_field() {
        let by_name = execute(
            seeded(),
            &SearchCriteria {
                search_term: Some("SARAH".to_string()),
                ..criteria()
            },
        );
        assert_eq!(ids(&by_name), vec![4]);

        let by_position = execute(
            seeded(),
            &SearchCriteria {
                search_term: Some("resources specialist".to_string()),
                ..criteria()
            },
        );
        assert_eq!(ids(&by_position), vec![2]);

        let by_last_name = execute(
            seeded(),
            &SearchCriteria {
                search_term: Some("last3".to_string()),
                ..criteria()
            },
        );
        assert_eq!(ids(&by_last_name), vec![3]);
    }

    #[test]
    fn search_term_is_anded_with_other_filters() {
        let result = execute(
            seeded(),
            &SearchCriteria {
                search_term: Some("engineering".to_string()),
                is_active: Some(false),
                ..criteria()
            },
        );
        assert_eq!(ids(&result), vec![1, 3]);
    }

    #[test]
    fn salary_bounds_are_inclusive() {
        let result = execute(
            seeded(),
            &SearchCriteria {
                min_salary: Some(65000.0),
                max_salary: Some(88000.0),
                ..criteria()
            },
        );
        assert_eq!(ids(&result), vec![2, 3, 5]);
    }

    #[test]
    fn hire_date_bounds_are_inclusive() {
        let result = execute(
            seeded(),
            &SearchCriteria {
                hire_date_from: NaiveDate::from_ymd_opt(2020, 1, 15),
                hire_date_to: NaiveDate::from_ymd_opt(2021, 11, 12),
                ..criteria()
            },
        );
        assert_eq!(ids(&result), vec![1, 3, 5]);
    }

    #[test]
    fn inverted_ranges_match_nothing() {
        let result = execute(
            seeded(),
            &SearchCriteria {
                min_salary: Some(90000.0),
                max_salary: Some(10000.0),
                ..criteria()
            },
        );
        assert_eq!(result.total_count, 0);
        assert!(result.items.is_empty());
        assert_eq!(result.total_pages, 0);
    }

    #[test]
    fn desc_is_exact_reverse_of_asc() {
        for sort_by in ["Salary", "HireDate", "Id", "Department"] {
            let asc = execute(
                seeded(),
                &SearchCriteria {
                    sort_by: sort_by.to_string(),
                    ..criteria()
                },
            );
            let desc = execute(
                seeded(),
                &SearchCriteria {
                    sort_by: sort_by.to_string(),
                    sort_direction: "desc".to_string(),
                    ..criteria()
                },
            );

            let mut reversed = ids(&asc);
            reversed.reverse();
            assert_eq!(ids(&desc), reversed, "sort by {sort_by}");
        }
    }

    #[test]
    fn sorts_by_requested_field() {
        let result = execute(
            seeded(),
            &SearchCriteria {
                sort_by: "salary".to_string(),
                ..criteria()
            },
        );
        assert_eq!(ids(&result), vec![4, 3, 2, 5, 1]);

        let result = execute(
            seeded(),
            &SearchCriteria {
                sort_by: "FIRSTNAME".to_string(),
                ..criteria()
            },
        );
        assert_eq!(ids(&result), vec![5, 2, 1, 3, 4]);
    }

    #[test]
    fn ties_keep_id_order() {
        let result = execute(
            seeded(),
            &SearchCriteria {
                sort_by: "Department".to_string(),
                ..criteria()
            },
        );
        assert_eq!(ids(&result), vec![1, 3, 5, 2, 4]);
    }

    #[test]
    fn unknown_sort_options_fall_back_to_id_ascending() {
        let result = execute(
            seeded(),
            &SearchCriteria {
                sort_by: "Nickname".to_string(),
                sort_direction: "upwards".to_string(),
                ..criteria()
            },
        );
        assert_eq!(ids(&result), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn second_page_of_two() {
        let result = execute(
            seeded(),
            &SearchCriteria {
                page: 2,
                page_size: 2,
                ..criteria()
            },
        );

        assert_eq!(ids(&result), vec![3, 4]);
        assert_eq!(result.total_count, 5);
        assert_eq!(result.total_pages, 3);
        assert!(result.has_previous);
        assert!(result.has_next);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let result = execute(
            seeded(),
            &SearchCriteria {
                page: 9,
                page_size: 2,
                ..criteria()
            },
        );

        assert!(result.items.is_empty());
        assert_eq!(result.total_count, 5);
        assert_eq!(result.page, 9);
    }

    #[test]
    fn repeated_queries_return_identical_order() {
        let query = SearchCriteria {
            sort_by: "Department".to_string(),
            sort_direction: "desc".to_string(),
            ..criteria()
        };
        let first = execute(seeded(), &query);
        let second = execute(seeded(), &query);
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn blank_text_filters_are_ignored() {
        let filters = build_filters(&SearchCriteria {
            search_term: Some("   ".to_string()),
            department: Some(String::new()),
            is_active: Some(true),
            ..criteria()
        });
        assert_eq!(filters, vec![StaffFilter::Active(true)]);
    }
}
