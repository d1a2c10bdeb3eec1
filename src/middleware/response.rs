use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// `{"data": ...}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{"id": ...}`
#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: i64,
}

/// `{"status": "ok"}`
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// `{"token": ...}`
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// A JSON body with a status code, 200 unless stated otherwise
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub body: T,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(body: T) -> Self {
        Self::with_status(body, StatusCode::OK)
    }

    pub fn with_status(body: T, status_code: StatusCode) -> Self {
        Self { body, status_code }
    }

    /// Create a 201 Created response
    pub fn created(body: T) -> Self {
        Self::with_status(body, StatusCode::CREATED)
    }
}

impl<T: Serialize> ApiResponse<DataResponse<T>> {
    pub fn data(data: T) -> Self {
        Self::ok(DataResponse { data })
    }
}

impl ApiResponse<IdResponse> {
    pub fn id(id: i64) -> Self {
        Self::ok(IdResponse { id })
    }

    pub fn created_id(id: i64) -> Self {
        Self::created(IdResponse { id })
    }
}

impl ApiResponse<StatusResponse> {
    pub fn status_ok() -> Self {
        Self::ok(StatusResponse { status: "ok" })
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code, Json(self.body)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
