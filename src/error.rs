use thiserror::Error;

/// Errors that can occur while selecting transformations or fetching a transformed recipe
#[derive(Error, Debug)]
pub enum TransformError {
    /// Transport-level failure talking to the transformation service
    #[error("Failed to fetch transformed recipe: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Transformation service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered 2xx but the body is not a `{new, old}` recipe pair
    #[error("Malformed response from transformation service: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// The task running the service call panicked or was cancelled
    #[error("Transformation call did not finish: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    /// Submit was attempted with an empty recipe address
    #[error("Recipe address required")]
    EmptyQuery,

    /// Transformation axis name not one of veg, cuisine, health
    #[error("Unknown transformation axis: {0}")]
    UnknownAxis(String),

    /// Option value not valid for the named axis
    #[error("Unknown {axis} option: {value}")]
    UnknownOption { axis: &'static str, value: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
