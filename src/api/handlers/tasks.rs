//! Task list handlers.
//!
//! Every handler is scoped to the caller bound by the auth middleware. A task
//! id that is unknown, deleted, or owned by someone else is reported the same
//! way as any other bad parameter.

use crate::auth::middleware::AuthUser;
use crate::db::TaskRecord;
use crate::types::{
    ApiResponse, AppError, AppJson, CreateTaskRequest, Identity, Result, Task, UpdateTaskRequest,
};
use crate::AppState;
use axum::extract::{Path, State};
use chrono::{DateTime, SecondsFormat};

const MAX_TITLE_LEN: usize = 512;

fn parse_task_id(raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| AppError::InvalidInput(format!("task id {:?} is not an integer", raw)))
}

fn to_rfc3339(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            status: record.status,
            created_at: to_rfc3339(record.created_at),
            updated_at: to_rfc3339(record.updated_at),
        }
    }
}

/// Create a task owned by the caller
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    AppJson(payload): AppJson<CreateTaskRequest>,
) -> Result<ApiResponse<Task>> {
    let title = payload.title.trim();
    if title.is_empty() || title.len() > MAX_TITLE_LEN {
        return Err(AppError::InvalidInput(format!(
            "title must be 1 to {} bytes",
            MAX_TITLE_LEN
        )));
    }

    let record = state.db.create_task(identity.user_id, title).await?;

    Ok(ApiResponse::success("success", record.into()))
}

/// List the caller's live tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<ApiResponse<Vec<Task>>> {
    let tasks = state
        .db
        .list_tasks(identity.user_id)
        .await?
        .into_iter()
        .map(Task::from)
        .collect();

    Ok(ApiResponse::success("success", tasks))
}

/// Fetch one of the caller's live tasks
pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Task>> {
    let id = parse_task_id(&id)?;

    let record = state
        .db
        .get_task(identity.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("task {}", id)))?;

    Ok(ApiResponse::success("success", record.into()))
}

/// Set the completion status of one of the caller's tasks
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    AppJson(payload): AppJson<UpdateTaskRequest>,
) -> Result<ApiResponse> {
    let updated = state
        .db
        .update_task_status(identity.user_id, payload.id, payload.status)
        .await?;

    if !updated {
        return Err(AppError::NotFound(format!("task {}", payload.id)));
    }

    Ok(ApiResponse::ok("success"))
}

/// Soft-delete one of the caller's tasks
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse> {
    let id = parse_task_id(&id)?;

    if !state.db.delete_task(identity.user_id, id).await? {
        return Err(AppError::NotFound(format!("task {}", id)));
    }

    Ok(ApiResponse::ok("success"))
}

/// The identity bound to this request
pub async fn me(AuthUser(identity): AuthUser) -> ApiResponse<Identity> {
    ApiResponse::success("success", identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_timestamps_are_rfc3339_utc() {
        let task = Task::from(TaskRecord {
            id: 1,
            owner_id: 2,
            title: "buy milk".to_string(),
            status: true,
            created_at: 0,
            updated_at: 1_700_000_000,
        });

        assert_eq!(task.created_at, "1970-01-01T00:00:00Z");
        assert_eq!(task.updated_at, "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_parse_task_id() {
        assert_eq!(parse_task_id("42").unwrap(), 42);
        assert!(matches!(parse_task_id("abc"), Err(AppError::InvalidInput(_))));
        assert!(matches!(parse_task_id(""), Err(AppError::InvalidInput(_))));
    }
}
