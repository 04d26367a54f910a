//! cobbler-xmlrpc: XML-RPC wire codec
//!
//! Implements the value model, request serialization, and response parsing
//! for the XML-RPC dialect spoken by a Cobbler server. The server runs on
//! Python's xmlrpclib with `allow_none`, so the `<nil/>` extension is
//! accepted and emitted alongside the standard scalar and compound types.

pub mod decode;
pub mod encode;
pub mod error;
pub mod value;

pub use decode::parse_response;
pub use encode::MethodCall;
pub use error::{Fault, XmlRpcError};
pub use value::Value;
