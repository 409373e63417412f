//! # Error Types
//!
//! Domain-specific error types for lumen-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lumen-core errors (this file)                                         │
//! │  ├── CoreError        - Mapping / parsing failures                     │
//! │  └── ValidationError  - Missing or malformed fields                    │
//! │                                                                         │
//! │  lumen-flow errors (separate crate)                                    │
//! │  └── FlowError        - Collaborator, config and queue failures        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → FlowError → store event / log     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store transitions never fail. These errors only come out of the mapping
//! helpers (raw notification → record, deep link → pairing link).

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while turning external input into domain records.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The node reported a notification kind this client does not know.
    #[error("Unknown notification kind: {0}")]
    UnknownNotificationKind(String),

    /// A pairing deep link could not be parsed.
    ///
    /// ## When This Occurs
    /// - The link is not a URL at all
    /// - The link has no query string
    /// - The `key` parameter is missing or empty
    #[error("Invalid pairing link: {reason}")]
    InvalidPairingLink { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g., unparseable timestamp).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
