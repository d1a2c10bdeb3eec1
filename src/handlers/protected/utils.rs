use crate::error::ApiError;

/// Parse a numeric path segment; anything else is the client's fault
pub(crate) fn parse_id(raw: &str, message: &'static str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::bad_request(message))
}

pub(crate) fn parse_list_id(raw: &str) -> Result<i64, ApiError> {
    parse_id(raw, "invalid id param")
}

pub(crate) fn parse_item_id(raw: &str) -> Result<i64, ApiError> {
    parse_id(raw, "invalid item id param")
}
