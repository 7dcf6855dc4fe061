//! Standard API response wrappers.

use serde::Serialize;

/// Message-only response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_response_serializes_flat() {
        let value = serde_json::to_value(MessageResponse::new("deleted")).unwrap();
        assert_eq!(value, serde_json::json!({"message": "deleted"}));
    }
}
