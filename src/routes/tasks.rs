use crate::{
    auth::CurrentAccount,
    error::AppError,
    models::{ListQuery, NewTask, TaskPatch},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

const TASK_NOT_FOUND: &str = "Task not found";

/// Retrieves a page of the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `skip` (default 0): number of tasks to skip, must be >= 0.
/// - `limit` (default 100): maximum number of tasks to return, 1..=100.
/// - `status` (optional): only tasks with this status ("Pending", "In Progress", "Completed").
///
/// ## Responses:
/// - `200 OK`: JSON array of tasks in creation order.
/// - `400 Bad Request`: paging parameters out of range.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    current: CurrentAccount,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let page = query.page()?;
    let tasks = state.tasks.list(current.id(), page, query.status).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Responses:
/// - `200 OK`: the created task.
/// - `401 Unauthorized`: missing or invalid token.
/// - `422 Unprocessable Entity`: title empty or too long, description too long.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    current: CurrentAccount,
    task_data: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state
        .tasks
        .create(current.id(), task_data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Retrieves one of the authenticated user's tasks.
///
/// ## Responses:
/// - `404 Not Found`: no such task, or it belongs to someone else.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    current: CurrentAccount,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .get_one(task_id.into_inner(), current.id())
        .await?
        .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task. Fields missing from the body keep their current value.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `404 Not Found`: no such task, or it belongs to someone else.
/// - `422 Unprocessable Entity`: a supplied field fails validation.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    current: CurrentAccount,
    task_id: web::Path<i64>,
    patch: web::Json<TaskPatch>,
) -> Result<impl Responder, AppError> {
    patch.validate()?;

    let task = state
        .tasks
        .update(task_id.into_inner(), current.id(), patch.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted successfully"}`.
/// - `404 Not Found`: no such task, or it belongs to someone else.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    current: CurrentAccount,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    if !state.tasks.delete(task_id.into_inner(), current.id()).await? {
        return Err(AppError::NotFound(TASK_NOT_FOUND.into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}
