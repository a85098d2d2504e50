//! Collaborator error types
//!
//! Error definitions with transient/permanent classification. Collaborator
//! failures are never handled inside the reconciliation engine: they must be
//! resolved (or retried by the caller) before inventories are handed in.

use thiserror::Error;

/// Error that can occur in a collaborator operation.
#[derive(Debug, Error)]
pub enum CatalogError {
    // Connection errors (usually transient)
    /// Failed to establish a connection to the remote system.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Connection timed out.
    #[error("connection timeout after {timeout_secs} seconds")]
    ConnectionTimeout { timeout_secs: u64 },

    /// Remote system is temporarily unavailable.
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String },

    // Authentication errors (permanent)
    /// Invalid credentials presented to the remote system.
    #[error("authentication failed: invalid credentials")]
    AuthenticationFailed,

    // Configuration errors (permanent)
    /// Endpoint or collaborator configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    // Data errors
    /// Metadata query against the source system failed.
    #[error("metadata query failed: {message}")]
    QueryFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A catalog entity addressed by qualified name does not exist.
    #[error("entity not found: {qualified_name}")]
    EntityNotFound { qualified_name: String },

    /// A tracking ticket addressed by identifier does not exist.
    #[error("ticket not found: {ticket}")]
    TicketNotFound { ticket: u64 },

    /// Payload could not be serialized or deserialized.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    // Internal errors
    /// Internal collaborator error.
    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CatalogError {
    /// Check if this error is transient and the operation may be retried.
    ///
    /// Transient errors are caused by temporary conditions (network issues,
    /// temporary unavailability) that may resolve themselves.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CatalogError::ConnectionFailed { .. }
                | CatalogError::ConnectionTimeout { .. }
                | CatalogError::ServiceUnavailable { .. }
        )
    }

    /// Check if this error is permanent and retry won't help.
    ///
    /// Permanent errors require human intervention or configuration changes.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            CatalogError::ConnectionTimeout { .. } => "CONNECTION_TIMEOUT",
            CatalogError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            CatalogError::AuthenticationFailed => "AUTH_FAILED",
            CatalogError::InvalidConfiguration { .. } => "INVALID_CONFIG",
            CatalogError::QueryFailed { .. } => "QUERY_FAILED",
            CatalogError::EntityNotFound { .. } => "ENTITY_NOT_FOUND",
            CatalogError::TicketNotFound { .. } => "TICKET_NOT_FOUND",
            CatalogError::Serialization { .. } => "SERIALIZATION_ERROR",
            CatalogError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    // Convenience constructors

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        CatalogError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CatalogError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a service unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        CatalogError::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        CatalogError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a metadata query error.
    pub fn query_failed(message: impl Into<String>) -> Self {
        CatalogError::QueryFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a metadata query error with source.
    pub fn query_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CatalogError::QueryFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CatalogError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error with source.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CatalogError::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for collaborator operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
