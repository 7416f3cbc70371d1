/*!
 * Error types for the capdeck application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * The taxonomy follows the pipeline's failure model: acquisition errors are
 * fatal to the whole run, provider errors are recoverable per card, and
 * everything else rolls up into `AppError`.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Fatal errors from the transcript acquisition state machine.
///
/// Any of these aborts the whole extraction run; none of them is retried.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// No "show transcript" control could be located anywhere in the
    /// rendered tree. The media most likely has no transcript at all.
    #[error("Could not find a 'Show transcript' control - the video may have no transcript")]
    TranscriptControlNotFound,

    /// Segment nodes never appeared within the polling budget
    #[error("Timed out after {waited_secs}s waiting for transcript segments to render")]
    RenderTimeout {
        /// Total seconds spent polling before giving up
        waited_secs: u64,
    },

    /// The panel rendered but produced zero usable text segments
    #[error("Could not find any transcript text - is the transcript panel empty?")]
    NoTranscriptText,

    /// The surface itself failed (lost connection, detached node, ...)
    #[error("UI surface error: {0}")]
    Surface(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The configured provider is missing a required credential
    #[error("Missing API key for provider: {0}")]
    MissingApiKey(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Fatal error from transcript acquisition
    #[error("Acquisition error: {0}")]
    Acquisition(#[from] AcquisitionError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
