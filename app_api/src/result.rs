use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use utoipa::ToSchema;

/// Success envelope; failures are rendered by `AppError` with the same shape.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn result() -> ApiResponse<()> {
    result_msg("ok")
}

pub fn result_msg(msg: &str) -> ApiResponse<()> {
    ApiResponse { success: true, message: msg.to_string(), data: None }
}

pub fn result_data<T: Serialize + Debug>(msg: &str, data: T) -> ApiResponse<T> {
    ApiResponse { success: true, message: msg.to_string(), data: Some(data) }
}
