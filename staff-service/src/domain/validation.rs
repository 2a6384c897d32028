use chrono::NaiveDate;
use shared::responses::FieldViolation;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::StaffServiceError;

const PHONE_SYMBOLS: [char; 6] = [' ', '+', '-', '(', ')', '.'];

/// Phone numbers may only hold digits and common separators, and need at
/// least one digit.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Ok(());
    }

    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || PHONE_SYMBOLS.contains(&c));
    if allowed && phone.chars().any(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message("Phone number is not valid".into()))
    }
}

/// Runs the declarative rules of `payload` plus the hire date checks, which
/// need the current date of the configured timezone.
///
/// Returns the hire date on success so callers don't have to unwrap it again.
pub fn validate_payload<P: Validate>(
    payload: &P,
    hire_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<NaiveDate, StaffServiceError> {
    let mut violations = match payload.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => violations_from(&errors),
    };

    let hire_date = match hire_date {
        Some(date) if date > today => {
            violations.push(FieldViolation {
                field: "hireDate".to_string(),
                message: "Hire date cannot be a future date".to_string(),
            });
            None
        }
        Some(date) => Some(date),
        None => {
            violations.push(FieldViolation {
                field: "hireDate".to_string(),
                message: "Hire date is required".to_string(),
            });
            None
        }
    };

    match hire_date {
        Some(date) if violations.is_empty() => Ok(date),
        _ => {
            violations.sort_by(|a, b| a.field.cmp(&b.field));
            Err(StaffServiceError::Validation(violations))
        }
    }
}

/// Flattens validator output into one violation per failed rule, with
/// camelCase field names to match the JSON payload.
pub fn violations_from(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            let field = to_camel_case(&field.to_string());
            errors.iter().map(move |error| FieldViolation {
                field: field.clone(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
            })
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}

fn to_camel_case(field: &str) -> String {
    let mut output = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            output.extend(c.to_uppercase());
            upper_next = false;
        } else {
            output.push(c);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "First name is required"))]
        first_name: String,
        #[validate(email(message = "Email is not valid"))]
        email: String,
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn phone_accepts_common_formats() {
        for phone in ["+1-555-0101", "(028) 3822 1234", "0901234567", "555.0101", ""] {
            assert!(validate_phone(phone).is_ok(), "{phone}");
        }
    }

    #[test]
    fn phone_rejects_letters_and_symbol_only_values() {
        for phone in ["call me", "555-CALL", "+-()"] {
            assert!(validate_phone(phone).is_err(), "{phone}");
        }
    }

    #[test]
    fn camel_case_conversion() {
        assert_eq!(to_camel_case("first_name"), "firstName");
        assert_eq!(to_camel_case("hire_date"), "hireDate");
        assert_eq!(to_camel_case("email"), "email");
    }

    #[test]
    fn collects_declarative_and_hire_date_violations() {
        let sample = Sample {
            first_name: String::new(),
            email: "not-an-email".to_string(),
        };

        let err = validate_payload(&sample, None, today()).unwrap_err();
        let StaffServiceError::Validation(violations) = err else {
            panic!("expected validation error");
        };

        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "firstName", "hireDate"]);
        assert_eq!(violations[1].message, "First name is required");
    }

    #[test]
    fn future_hire_date_is_rejected() {
        let sample = Sample {
            first_name: "Jane".to_string(),
            email: "jane@company.com".to_string(),
        };
        let tomorrow = today().succ_opt().unwrap();

        let err = validate_payload(&sample, Some(tomorrow), today()).unwrap_err();
        assert!(matches!(err, StaffServiceError::Validation(ref v) if v.len() == 1));
    }

    #[test]
    fn valid_payload_returns_hire_date() {
        let sample = Sample {
            first_name: "Jane".to_string(),
            email: "jane@company.com".to_string(),
        };

        let hire_date = validate_payload(&sample, Some(today()), today()).unwrap();
        assert_eq!(hire_date, today());
    }
}
