//! Error types for the XML-RPC codec

use thiserror::Error;

/// A `<fault>` response from the server.
///
/// Cobbler raises these for bad method names, failed logins, and invalid
/// tokens; the fault string usually carries a Python traceback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("fault {code}: {message}")]
pub struct Fault {
    /// Server-side fault code
    pub code: i32,
    /// Server-side fault string
    pub message: String,
}

/// Errors that can occur while encoding or decoding XML-RPC documents
#[derive(Error, Debug)]
pub enum XmlRpcError {
    /// Underlying XML parse error
    #[error("XML parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    /// Document parsed as XML but does not follow the XML-RPC grammar
    #[error("malformed XML-RPC document: {0}")]
    Malformed(String),

    /// A scalar element held text that does not parse as its declared type
    #[error("invalid {kind} value: {text:?}")]
    InvalidScalar {
        /// Declared scalar type (`int`, `boolean`, ...)
        kind: &'static str,
        /// Offending text content
        text: String,
    },

    /// Failed to write the request document
    #[error("XML write error: {0}")]
    Write(String),

    /// The server answered with a `<fault>`
    #[error(transparent)]
    Fault(#[from] Fault),
}
