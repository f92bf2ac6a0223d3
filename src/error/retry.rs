use reqwest::StatusCode;

use super::Error;

/// Strategy for handling errors in a retry context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorRetryStrategy {
    /// Back off and try again (transient upstream trouble)
    Retry,
    /// Failed permanently, retrying cannot help
    Fail,
}

/// Statuses that signal a transient upstream condition.
fn is_transient_status(status: StatusCode) -> bool {
    // 429 - rate limiting, the upstream concurrency ceiling was hit
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

impl Error {
    /// Determine error retry strategy based upon the error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::Reqwest(reqwest_error) => {
                // A timeout is treated exactly like a 5xx
                if reqwest_error.is_timeout() || reqwest_error.is_connect() {
                    return ErrorRetryStrategy::Retry;
                }

                if let Some(status) = reqwest_error.status() {
                    if is_transient_status(status) {
                        ErrorRetryStrategy::Retry
                    } else {
                        ErrorRetryStrategy::Fail
                    }
                } else if reqwest_error.is_decode() || reqwest_error.is_builder() {
                    // Malformed body or request, the same call will fail the same way
                    ErrorRetryStrategy::Fail
                } else {
                    // Other network trouble (reset connection, truncated body)
                    ErrorRetryStrategy::Retry
                }
            }

            Self::UpstreamStatus { status, .. } => match StatusCode::from_u16(*status) {
                Ok(status) if is_transient_status(status) => ErrorRetryStrategy::Retry,
                _ => ErrorRetryStrategy::Fail,
            },

            // Credential failures have already been retried by the token manager
            Self::Auth(_) => ErrorRetryStrategy::Fail,

            // Already the outcome of a retry loop
            Self::Query(_) => ErrorRetryStrategy::Fail,

            // Parse and shape errors - the same response will parse the same way
            Self::Json(_) => ErrorRetryStrategy::Fail,
            Self::UnexpectedShape(_) => ErrorRetryStrategy::Fail,

            Self::NotFound(_) => ErrorRetryStrategy::Fail,
            Self::Partition(_) => ErrorRetryStrategy::Fail,
            Self::Geometry(_) => ErrorRetryStrategy::Fail,
            Self::Config(_) => ErrorRetryStrategy::Fail,
            Self::Limiter(_) => ErrorRetryStrategy::Fail,
            Self::Store(_) => ErrorRetryStrategy::Fail,
        }
    }
}
