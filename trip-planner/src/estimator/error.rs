//! Leg estimator error types.

/// Errors from a [`RouteEstimator`](super::RouteEstimator).
#[derive(Debug, thiserror::Error)]
pub enum EstimatorError {
    /// HTTP request failed (network error, client-side timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The call did not finish within the allotted time.
    #[error("estimator timed out after {0}s")]
    Timeout(u64),

    /// The routing service answered with a non-success status.
    #[error("routing service error {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The service found no route between the points.
    #[error("no route: {0}")]
    NoRoute(String),

    /// The estimator cannot serve requests right now.
    #[error("estimator unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            EstimatorError::Timeout(10).to_string(),
            "estimator timed out after 10s"
        );

        let err = EstimatorError::Status {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "routing service error 502: Bad Gateway");

        let err = EstimatorError::NoRoute("NoSegment".into());
        assert_eq!(err.to_string(), "no route: NoSegment");

        let err = EstimatorError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("expected value"));
    }
}
