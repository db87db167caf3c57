//! Error types and classification for harbor.
//!
//! This crate provides:
//! - [`HbError`] - Top-level error enum for the connector
//! - Domain-specific errors ([`StorageError`], [`DeliveryError`])
//! - [`ErrorKind`] mapping every error onto the sync failure taxonomy

use thiserror::Error;

/// Top-level error type for harbor.
#[derive(Error, Debug)]
pub enum HbError {
    /// Storage provider errors (client setup, discovery, listing)
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Sink delivery errors
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Storage-provider errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The storage client could not be constructed
    #[error("Client setup failed: {0}")]
    Client(String),

    /// Listing the visible containers failed
    #[error("Container discovery failed: {0}")]
    Discovery(String),

    /// Fetching one page of a container listing failed
    #[error("Listing {container} failed: {message}")]
    ListObjects { container: String, message: String },
}

/// Sink delivery errors.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The sink received the page but refused it
    #[error("Page rejected: {0}")]
    Rejected(String),

    /// The page never reached the sink
    #[error("Transport failed: {0}")]
    Transport(String),

    /// The page could not be encoded for the sink
    #[error("Serialization failed: {0}")]
    Serialize(String),
}

/// Failure taxonomy of a sync run.
///
/// Only [`ErrorKind::DiscoveryFailed`] (and [`ErrorKind::Internal`] failures
/// that happen before discovery) abort a sync. The others are contained and
/// surface through logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The inbound configuration payload could not be parsed
    ConfigurationMalformed,

    /// The container listing call failed
    DiscoveryFailed,

    /// A single page fetch failed
    PageFetchFailed,

    /// The sink reported failure for a page
    DeliveryRejected,

    /// Anything else (client setup, unexpected failures)
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigurationMalformed => write!(f, "ConfigurationMalformed"),
            Self::DiscoveryFailed => write!(f, "DiscoveryFailed"),
            Self::PageFetchFailed => write!(f, "PageFetchFailed"),
            Self::DeliveryRejected => write!(f, "DeliveryRejected"),
            Self::Internal => write!(f, "Internal"),
        }
    }
}

impl HbError {
    /// Classifies this error into the sync failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HbError::Storage(e) => e.kind(),
            HbError::Delivery(_) => ErrorKind::DeliveryRejected,
            HbError::Config(_) => ErrorKind::ConfigurationMalformed,
        }
    }

    /// Returns true if this error must abort the whole sync.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::DiscoveryFailed | ErrorKind::Internal)
    }
}

impl StorageError {
    /// Classifies a storage error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::Client(_) => ErrorKind::Internal,
            StorageError::Discovery(_) => ErrorKind::DiscoveryFailed,
            StorageError::ListObjects { .. } => ErrorKind::PageFetchFailed,
        }
    }
}

/// Result type alias using HbError.
pub type Result<T> = std::result::Result<T, HbError>;
