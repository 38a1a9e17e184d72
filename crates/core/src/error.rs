//! Error types for Pagelens operations.
//!
//! This module defines the main error type [`PagelensError`] which represents
//! all possible errors that can occur while resolving favicons, reading the
//! tiered cache stores, and walking captured HTML.
//!
//! Transient network failures during favicon validation are deliberately
//! absent from this enum: a candidate that fails to fetch settles into the
//! `Invalid` state instead of surfacing an error (see
//! [`crate::favicon::candidate`]).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for favicon resolution and salience extraction.
///
/// # Example
///
/// ```rust
/// use pagelens_core::{PagelensError, PageUrl};
///
/// match PageUrl::parse("not a url") {
///     Ok(page) => println!("host: {}", page.host()),
///     Err(PagelensError::InvalidUrl(msg)) => println!("bad url: {}", msg),
///     Err(e) => println!("error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum PagelensError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other transport-level problems. HTTP error *statuses* are not
    /// errors; they surface in [`crate::fetch::FetchedResource::status`].
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, typically an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// A cache store file could not be written.
    ///
    /// Read-side problems (missing file, malformed YAML) are treated as an
    /// empty store and logged, never raised.
    #[error("Cache store error for {path}: {message}")]
    StoreError { path: PathBuf, message: String },

    /// File I/O errors.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for PagelensError.
pub type Result<T> = std::result::Result<T, PagelensError>;
