use axum::extract::{Path, State};

use super::utils::parse_list_id;
use crate::auth::AuthUser;
use crate::database::models::{NewTodoList, TodoList, TodoListPatch};
use crate::middleware::{ApiResponse, ApiResult, DataResponse, IdResponse, StatusResponse, ValidatedJson};
use crate::routes::AppState;

/// POST /api/lists - create a list owned by the caller (201 `{"id"}`)
pub async fn create_list(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<NewTodoList>,
) -> ApiResult<IdResponse> {
    let id = state.services.lists.create(user, input).await?;
    Ok(ApiResponse::created_id(id))
}

/// GET /api/lists
pub async fn get_lists(State(state): State<AppState>, user: AuthUser) -> ApiResult<DataResponse<Vec<TodoList>>> {
    let lists = state.services.lists.get_all(user).await?;
    Ok(ApiResponse::data(lists))
}

/// GET /api/lists/:id - 404 when missing or owned by someone else
pub async fn get_list_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<DataResponse<TodoList>> {
    let id = parse_list_id(&id)?;
    let list = state.services.lists.get_by_id(user, id).await?;
    Ok(ApiResponse::data(list))
}

/// PUT /api/lists/:id - partial update; absent fields are left alone
pub async fn update_list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<TodoListPatch>,
) -> ApiResult<StatusResponse> {
    let id = parse_list_id(&id)?;
    state.services.lists.update(user, id, patch).await?;
    Ok(ApiResponse::status_ok())
}

/// DELETE /api/lists/:id - removes the list and its items
pub async fn delete_list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusResponse> {
    let id = parse_list_id(&id)?;
    state.services.lists.delete(user, id).await?;
    Ok(ApiResponse::status_ok())
}
