use axum::extract::{Path, State};

use super::utils::{parse_item_id, parse_list_id};
use crate::auth::AuthUser;
use crate::database::models::{NewTodoItem, TodoItem, TodoItemPatch};
use crate::middleware::{ApiResponse, ApiResult, DataResponse, IdResponse, StatusResponse, ValidatedJson};
use crate::routes::AppState;

fn parse_ids((list_id, item_id): (String, String)) -> Result<(i64, i64), crate::error::ApiError> {
    Ok((parse_list_id(&list_id)?, parse_item_id(&item_id)?))
}

/// POST /api/lists/:id/items
pub async fn create_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(list_id): Path<String>,
    ValidatedJson(input): ValidatedJson<NewTodoItem>,
) -> ApiResult<IdResponse> {
    let list_id = parse_list_id(&list_id)?;
    let id = state.services.items.create(user, list_id, input).await?;
    Ok(ApiResponse::created_id(id))
}

/// GET /api/lists/:id/items
pub async fn get_items(
    State(state): State<AppState>,
    user: AuthUser,
    Path(list_id): Path<String>,
) -> ApiResult<DataResponse<Vec<TodoItem>>> {
    let list_id = parse_list_id(&list_id)?;
    let items = state.services.items.get_all(user, list_id).await?;
    Ok(ApiResponse::data(items))
}

/// GET /api/lists/:id/items/:item_id
pub async fn get_item_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(ids): Path<(String, String)>,
) -> ApiResult<DataResponse<TodoItem>> {
    let (list_id, item_id) = parse_ids(ids)?;
    let item = state.services.items.get_by_id(user, list_id, item_id).await?;
    Ok(ApiResponse::data(item))
}

/// PUT /api/lists/:id/items/:item_id - partial update of title, description, done
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(ids): Path<(String, String)>,
    ValidatedJson(patch): ValidatedJson<TodoItemPatch>,
) -> ApiResult<StatusResponse> {
    let (list_id, item_id) = parse_ids(ids)?;
    state.services.items.update(user, list_id, item_id, patch).await?;
    Ok(ApiResponse::status_ok())
}

/// PATCH /api/lists/:id/items/:item_id/done - flip the completion flag
pub async fn toggle_item_done(
    State(state): State<AppState>,
    user: AuthUser,
    Path(ids): Path<(String, String)>,
) -> ApiResult<DataResponse<TodoItem>> {
    let (list_id, item_id) = parse_ids(ids)?;
    let item = state.services.items.toggle_done(user, list_id, item_id).await?;
    Ok(ApiResponse::data(item))
}

/// DELETE /api/lists/:id/items/:item_id
pub async fn delete_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(ids): Path<(String, String)>,
) -> ApiResult<StatusResponse> {
    let (list_id, item_id) = parse_ids(ids)?;
    state.services.items.delete(user, list_id, item_id).await?;
    Ok(ApiResponse::status_ok())
}
