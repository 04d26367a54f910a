//! Transport seam between the connection manager and the remote endpoint

use async_trait::async_trait;
use cobbler_xmlrpc::{MethodCall, Value, parse_response};
use reqwest::Client;
use url::Url;

use crate::error::{ClientError, Result};

/// Which API endpoint a call goes to.
///
/// The server exposes a read-only endpoint for finds and a read-write
/// endpoint for everything that needs a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `/cobbler_api` — unauthenticated reads
    ReadOnly,
    /// `/cobbler_api_rw` — authenticated mutations
    ReadWrite,
}

/// A way to issue one XML-RPC call against the server.
///
/// The connection manager is written against this trait so tests can
/// substitute a scripted transport for the HTTP one.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, endpoint: Endpoint, call: MethodCall) -> Result<Value>;
}

/// HTTP transport posting XML-RPC documents with reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    read_url: Url,
    write_url: Url,
}

impl HttpTransport {
    /// Create a transport for a server host.
    ///
    /// `host` is a bare hostname (`cobbler.example.com`) or a base URL when
    /// a scheme or port is needed (`https://cobbler.example.com:8080`).
    ///
    /// # Errors
    /// Returns an error if the host does not form a valid URL.
    pub fn new(host: impl AsRef<str>) -> Result<Self> {
        Self::with_client(host, Client::new())
    }

    /// Create a transport with a custom `reqwest::Client`.
    ///
    /// # Errors
    /// Returns an error if the host does not form a valid URL.
    pub fn with_client(host: impl AsRef<str>, client: Client) -> Result<Self> {
        let host = host.as_ref();
        let base = if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{host}")
        };
        let base = Url::parse(&base)?;
        Ok(Self {
            client,
            read_url: base.join("cobbler_api")?,
            write_url: base.join("cobbler_api_rw")?,
        })
    }

    fn url(&self, endpoint: Endpoint) -> &Url {
        match endpoint {
            Endpoint::ReadOnly => &self.read_url,
            Endpoint::ReadWrite => &self.write_url,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, endpoint: Endpoint, call: MethodCall) -> Result<Value> {
        let body = call.to_xml()?;
        tracing::debug!("calling {} on {:?} endpoint", call.name, endpoint);

        let response = self
            .client
            .post(self.url(endpoint).clone())
            .header("Content-Type", "text/xml")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, message });
        }

        let text = response.text().await?;
        Ok(parse_response(&text)?)
    }
}
