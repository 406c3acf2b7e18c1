//! Error types for the Cogwork domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The taxonomy mirrors
//! the propagation policy: tool failures are contained by dispatch and
//! converted into failed results, gateway failures and the iteration limit
//! abort the surrounding `run`.

use thiserror::Error;

/// The top-level error type for all Cogwork operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Model gateway errors (fatal for the current run) ---
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    // --- Tool errors (fatal only when raised outside dispatch) ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Iteration bound reached without a final answer ---
    #[error("Agent reached max iterations ({0})")]
    MaxIterationsExceeded(usize),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by backend, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    /// Requested name absent from the catalog. Dispatch recovers this into
    /// a failed result whose error text is exactly this rendering.
    #[error("Tool '{0}' not found")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Tool '{tool_name}' execution failed: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },
}
