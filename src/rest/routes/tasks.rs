//! Task CRUD handlers. Validation happens here; everything below this layer
//! is a single parameterized statement against the store.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::storage::{TaskRow, TaskStore};

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub due_date: Option<String>,
}

/// GET /tasks — full list, ordered by due date then status.
pub async fn list_tasks(State(store): State<TaskStore>) -> Result<Json<Vec<TaskRow>>, ApiError> {
    let tasks = store.list_tasks().await?;
    Ok(Json(tasks))
}

/// POST /tasks — create a pending task from `{title, due_date}`.
pub async fn create_task(
    State(store): State<TaskStore>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskRow>), ApiError> {
    let Json(body) = body.map_err(|_| ApiError::validation("Title and due date are required."))?;

    let title = non_empty(body.title.as_deref())
        .ok_or_else(|| ApiError::validation("Title and due date are required."))?;
    let due_date = non_empty(body.due_date.as_deref())
        .ok_or_else(|| ApiError::validation("Title and due date are required."))?;
    validate_due_date(due_date)?;

    let task = store.create_task(title, due_date).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /tasks/{id}/done — set status when the body carries a boolean,
/// otherwise toggle it store-side.
pub async fn update_status(
    State(store): State<TaskStore>,
    Path(id): Path<i64>,
    body: Result<Option<Json<Value>>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = body.map_err(|_| ApiError::validation("Request body must be valid JSON."))?;

    let affected = match body.as_ref().and_then(|json| json.0.get("status")) {
        Some(Value::Bool(status)) => store.set_status(id, *status).await?,
        None | Some(Value::Null) => store.toggle_status(id).await?,
        Some(_) => {
            return Err(ApiError::validation("Field 'status' must be a boolean."));
        }
    };

    if affected == 0 {
        return Err(ApiError::not_found("Task not found."));
    }
    Ok(Json(json!({ "message": "Task status updated successfully." })))
}

/// PUT /tasks/{id} — partial update of title and/or due date.
pub async fn update_task(
    State(store): State<TaskStore>,
    Path(id): Path<i64>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(|_| {
        ApiError::validation("At least one field (title or due_date) must be provided.")
    })?;

    // Empty strings count as absent, matching the create-side rule that
    // neither field may be blank.
    let title = non_empty(body.title.as_deref());
    let due_date = non_empty(body.due_date.as_deref());
    if title.is_none() && due_date.is_none() {
        return Err(ApiError::validation(
            "At least one field (title or due_date) must be provided.",
        ));
    }
    if let Some(due_date) = due_date {
        validate_due_date(due_date)?;
    }

    let affected = store.update_fields(id, title, due_date).await?;
    if affected == 0 {
        return Err(ApiError::not_found("Task not found."));
    }
    Ok(Json(json!({ "message": "Task updated successfully." })))
}

/// DELETE /tasks/{id}
pub async fn delete_task(
    State(store): State<TaskStore>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let affected = store.delete_task(id).await?;
    if affected == 0 {
        return Err(ApiError::not_found("Task not found."));
    }
    Ok(Json(json!({ "message": "Task removed successfully." })))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    match value.map(str::trim) {
        Some("") | None => None,
        Some(v) => Some(v),
    }
}

fn validate_due_date(due_date: &str) -> Result<(), ApiError> {
    NaiveDate::parse_from_str(due_date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ApiError::validation("Field 'due_date' must be a YYYY-MM-DD date."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_trims_and_rejects_blank() {
        assert_eq!(non_empty(Some("  Buy milk ")), Some("Buy milk"));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn due_date_must_be_iso() {
        assert!(validate_due_date("2025-01-01").is_ok());
        assert!(validate_due_date("01/01/2025").is_err());
        assert!(validate_due_date("not a date").is_err());
        assert!(validate_due_date("2025-13-40").is_err());
    }
}
