//! Cross-field and field-level input validation.
//!
//! Every write path (create and partial update) funnels through these
//! functions before touching the record store, so the date-ordering rules
//! live in exactly one place.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::ApiError;
use crate::models::{project, task};

pub const PROJECT_DATE_ORDER_MSG: &str = "End date cannot be earlier than start date.";
pub const TASK_DATE_ORDER_MSG: &str = "Due date cannot be earlier than start date.";

/// Project date ordering: end date must not precede start date.
///
/// When either side is absent (a partial update touching only one of the
/// pair) the check is skipped; the stored counterpart is deliberately not
/// consulted.
pub fn check_project_dates(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<(), ApiError> {
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            return Err(ApiError::validation(PROJECT_DATE_ORDER_MSG));
        }
    }
    Ok(())
}

/// Task date ordering: due date must not precede start date.
pub fn check_task_dates(
    start_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
) -> Result<(), ApiError> {
    if let (Some(start), Some(due)) = (start_date, due_date) {
        if due < start {
            return Err(ApiError::validation(TASK_DATE_ORDER_MSG));
        }
    }
    Ok(())
}

/// Bounded-string check for project names.
pub fn check_project_name(name: &str) -> Result<(), ApiError> {
    check_max_len("name", name, project::NAME_MAX_LEN)
}

/// Bounded-string check for task titles.
pub fn check_task_title(title: &str) -> Result<(), ApiError> {
    check_max_len("title", title, task::TITLE_MAX_LEN)
}

fn check_max_len(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.chars().count() > max {
        let mut field_errors = HashMap::new();
        field_errors.insert(
            field.to_string(),
            format!("Ensure this field has no more than {} characters.", max),
        );
        return Err(ApiError::field_errors("Invalid input", field_errors));
    }
    Ok(())
}
