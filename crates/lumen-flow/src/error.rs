//! # Flow Error Types
//!
//! Error types for workflow steps.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Flow Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │  Collaborator   │  │     Payload             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Collaborator   │  │  PayloadDecode          │ │
//! │  │  ConfigLoad     │  │  Offline        │  │  Core (mapping)         │ │
//! │  │  ConfigSave     │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │    Internal     │   No workflow lets one of these escape: they are  │
//! │  │  ChannelError   │   turned into store events or diagnostics at the  │
//! │  │  ShuttingDown   │   workflow boundary.                              │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for workflow steps.
pub type FlowResult<T> = Result<T, FlowError>;

#[derive(Debug, Error)]
pub enum FlowError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid flow configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    /// An external collaborator (node, preferences, display, ...) failed.
    #[error("{collaborator} failed: {message}")]
    Collaborator {
        collaborator: &'static str,
        message: String,
    },

    /// The Online-Gate timed out and the gate policy says abort.
    #[error("Still offline after {0} ms")]
    Offline(u64),

    // =========================================================================
    // Payload Errors
    // =========================================================================
    #[error("Payload decode failed: {0}")]
    PayloadDecode(String),

    #[error(transparent)]
    Core(#[from] lumen_core::CoreError),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Orchestrator is shutting down")]
    ShuttingDown,
}

impl FlowError {
    /// Builds a collaborator error from anything displayable.
    pub fn collaborator(collaborator: &'static str, message: impl std::fmt::Display) -> Self {
        FlowError::Collaborator {
            collaborator,
            message: message.to_string(),
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            FlowError::InvalidConfig(_) | FlowError::ConfigLoadFailed(_) | FlowError::ConfigSaveFailed(_)
        )
    }

    pub fn is_collaborator_error(&self) -> bool {
        matches!(self, FlowError::Collaborator { .. } | FlowError::Offline(_))
    }

    /// The action queue is gone; the orchestrator has stopped.
    pub fn is_channel_closed(&self) -> bool {
        matches!(self, FlowError::ChannelError(_) | FlowError::ShuttingDown)
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for FlowError {
    fn from(err: serde_json::Error) -> Self {
        FlowError::PayloadDecode(err.to_string())
    }
}

impl From<std::io::Error> for FlowError {
    fn from(err: std::io::Error) -> Self {
        FlowError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for FlowError {
    fn from(err: toml::de::Error) -> Self {
        FlowError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for FlowError {
    fn from(err: toml::ser::Error) -> Self {
        FlowError::ConfigSaveFailed(err.to_string())
    }
}
