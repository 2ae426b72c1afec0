// Standard response envelope
//
// Success: { success: true,  message, data }
// Failure: { success: false, message, error }
//
// The presentation layer depends on this exact shape.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::with_message(data, "Success")
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorBody {
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::success(json!({"a": 1}))).unwrap();
        assert_eq!(
            body,
            json!({"success": true, "message": "Success", "data": {"a": 1}})
        );
    }

    #[test]
    fn test_error_envelope_keeps_null_error() {
        let body = serde_json::to_value(ApiErrorBody::new("Company not found", None)).unwrap();
        assert_eq!(
            body,
            json!({"success": false, "message": "Company not found", "error": null})
        );
    }
}
