//! Response DTOs.

use serde::Serialize;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Status of an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// The message was handed to the relay.
    Sent,
    /// The message was empty and nothing was sent.
    Skipped,
}

/// Body of a successful `POST /api/contact`.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub status: SubmissionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_response_json() {
        let body = ApiResponse::new(SubmissionResponse {
            status: SubmissionStatus::Sent,
        });
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"data":{"status":"sent"}}"#
        );
    }
}
