//! Error types for the cobbler client

use thiserror::Error;

use cobbler_xmlrpc::{Fault, XmlRpcError};

/// Errors that can occur when using the cobbler client
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Endpoint answered with a non-success HTTP status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body from the server
        message: String,
    },

    /// The server answered with an XML-RPC fault
    #[error(transparent)]
    Fault(#[from] Fault),

    /// Failed to encode the request or decode the response
    #[error("XML-RPC codec error: {0}")]
    Codec(XmlRpcError),

    /// An authenticated operation was attempted without credentials
    #[error("operation requires credentials but none were configured")]
    MissingCredentials,

    /// The server answered with a shape the client does not understand
    #[error("unexpected response to {method}: {detail}")]
    UnexpectedResponse {
        /// Remote method that was called
        method: &'static str,
        /// What was wrong with the response
        detail: String,
    },

    /// The server's update preflight reported failure
    #[error("server update failed prior to saving")]
    UpdateFailed,
}

impl From<XmlRpcError> for ClientError {
    fn from(err: XmlRpcError) -> Self {
        match err {
            XmlRpcError::Fault(fault) => ClientError::Fault(fault),
            other => ClientError::Codec(other),
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
