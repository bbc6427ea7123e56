/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout
/// - `tasks`: Task CRUD for authenticated users
/// - `admin`: Admin-only user/task management

pub mod admin;
pub mod auth;
pub mod health;
pub mod tasks;

use serde::Serialize;

/// Message-only response body, shared by every mutation endpoint that has
/// nothing else to return
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

impl MessageResponse {
    /// Builds a message body
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
    fn test_message_response_shape() {
        let json = serde_json::to_value(MessageResponse::new("Task deleted")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Task deleted" }));
    }
}
