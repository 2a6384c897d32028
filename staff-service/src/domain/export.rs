use std::borrow::Cow;

use shared::time::{format_date, format_timestamp};

use crate::domain::staff::StaffView;

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const EXCEL_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const EXPORT_FILE_BASE: &str = "staff_export";

/// Header row and boolean wording of one export flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvLayout {
    pub headers: [&'static str; 12],
    pub active_label: &'static str,
    pub inactive_label: &'static str,
}

impl CsvLayout {
    /// Column names follow the field names; status is `True`/`False`.
    pub const COMPACT: Self = Self {
        headers: [
            "Id",
            "FirstName",
            "LastName",
            "Email",
            "Phone",
            "Department",
            "Position",
            "Salary",
            "HireDate",
            "IsActive",
            "CreatedAt",
            "UpdatedAt",
        ],
        active_label: "True",
        inactive_label: "False",
    };

    /// Human-readable column names; status is `Active`/`Inactive`.
    pub const REPORT: Self = Self {
        headers: [
            "ID",
            "First Name",
            "Last Name",
            "Email",
            "Phone",
            "Department",
            "Position",
            "Salary",
            "Hire Date",
            "Status",
            "Created At",
            "Updated At",
        ],
        active_label: "Active",
        inactive_label: "Inactive",
    };
}

/// Quotes a field only when it holds a comma, a double quote or a line break.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Encodes records as UTF-8 CSV, one row per record in the given order.
pub fn encode(records: &[StaffView], layout: &CsvLayout) -> Vec<u8> {
    let mut csv = String::new();
    push_row(&mut csv, layout.headers.iter().copied());

    for staff in records {
        let status = if staff.is_active {
            layout.active_label
        } else {
            layout.inactive_label
        };

        let id = staff.id.to_string();
        let salary = staff.salary.to_string();
        let hire_date = format_date(staff.hire_date);
        let created_at = format_timestamp(staff.created_at);
        let updated_at = format_timestamp(staff.updated_at);

        let row: [&str; 12] = [
            id.as_str(),
            &staff.first_name,
            &staff.last_name,
            &staff.email,
            staff.phone.as_deref().unwrap_or_default(),
            &staff.department,
            &staff.position,
            &salary,
            &hire_date,
            status,
            &created_at,
            &updated_at,
        ];
        push_row(&mut csv, row);
    }

    csv.into_bytes()
}

fn push_row<'a>(csv: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (index, field) in fields.into_iter().enumerate() {
        if index > 0 {
            csv.push(',');
        }
        csv.push_str(&escape_field(field));
    }
    csv.push('\n');
}
