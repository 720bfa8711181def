//! # Service Errors
//!
//! The only failures allowed to cross the service boundary. Everything
//! below the pipeline degrades to empty results and a log line instead.

use thiserror::Error;

/// User-visible service failure
#[derive(Debug, Error)]
pub enum ReviveError {
    /// The LLM provider key is missing - checked before any work starts
    #[error("LLM provider not configured (set GROQ_API_KEY)")]
    NotConfigured,

    /// The whole-request deadline elapsed; partial work is discarded
    #[error("request exceeded the {0} second deadline")]
    DeadlineExceeded(u64),

    /// Anything else that escaped the pipeline boundary
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = ReviveError::NotConfigured;
        assert!(e.to_string().contains("GROQ_API_KEY"));

        let e = ReviveError::DeadlineExceeded(120);
        assert!(e.to_string().contains("120 second"));
    }
}
