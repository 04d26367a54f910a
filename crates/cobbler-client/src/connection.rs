//! Connection manager for a Cobbler server

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use cobbler_api::{Attrs, Distro, Image, Profile, Record, System};
use cobbler_xmlrpc::{MethodCall, Value};

use crate::error::{ClientError, Result};
use crate::save;
use crate::transport::{Endpoint, HttpTransport, Transport};

/// Credentials for the read-write endpoint.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection manager for a Cobbler server.
///
/// Holds the transport, the credentials, and the cached session token.
/// Finds go unauthenticated to the read-only endpoint; removes and saves
/// log in on the read-write endpoint first. The token is fetched once and
/// reused until [`Connection::end_session`].
///
/// # Example
/// ```no_run
/// use cobbler_client::Connection;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let conn = Connection::new("cobbler.example.com")?;
/// let systems = conn.systems().await?;
/// println!("{} systems registered", systems.len());
/// # Ok(())
/// # }
/// ```
pub struct Connection {
    transport: Arc<dyn Transport>,
    credentials: Option<Credentials>,
    token: Mutex<Option<String>>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Connect to a server for read-only use.
    ///
    /// # Errors
    /// Returns an error if the host does not form a valid URL.
    pub fn new(host: impl AsRef<str>) -> Result<Self> {
        Ok(Self::with_transport(
            Arc::new(HttpTransport::new(host)?),
            None,
        ))
    }

    /// Connect to a server with credentials for authenticated operations.
    ///
    /// # Errors
    /// Returns an error if the host does not form a valid URL.
    pub fn with_credentials(
        host: impl AsRef<str>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::with_transport(
            Arc::new(HttpTransport::new(host)?),
            Some(Credentials {
                username: username.into(),
                password: password.into(),
            }),
        ))
    }

    /// Build a connection over an arbitrary transport. This is the seam
    /// unit tests use to script the server side.
    pub fn with_transport(transport: Arc<dyn Transport>, credentials: Option<Credentials>) -> Self {
        Self {
            transport,
            credentials,
            token: Mutex::new(None),
        }
    }

    async fn call(&self, endpoint: Endpoint, call: MethodCall) -> Result<Value> {
        self.transport.call(endpoint, call).await
    }

    // Session handling

    /// Log in and return the session token. The token is cached; repeated
    /// calls do not touch the server again until [`Connection::end_session`].
    ///
    /// # Errors
    /// Returns `MissingCredentials` when the connection has none, or the
    /// server's fault when the login is rejected.
    pub async fn login(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if let Some(token) = token.as_ref() {
            return Ok(token.clone());
        }

        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ClientError::MissingCredentials)?;

        let call = MethodCall::new("login")
            .arg(credentials.username.as_str())
            .arg(credentials.password.as_str());
        let value = self.call(Endpoint::ReadWrite, call).await?;

        let fresh = value
            .as_str()
            .ok_or_else(|| ClientError::UnexpectedResponse {
                method: "login",
                detail: format!("expected a token string, got {value:?}"),
            })?
            .to_string();

        *token = Some(fresh.clone());
        Ok(fresh)
    }

    /// Drop the cached session token. The next authenticated operation
    /// logs in again.
    pub async fn end_session(&self) {
        self.token.lock().await.take();
    }

    // Server utilities

    /// Remote server version.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn version(&self) -> Result<String> {
        let value = self
            .call(Endpoint::ReadOnly, MethodCall::new("version"))
            .await?;
        match value {
            Value::Str(s) => Ok(s),
            Value::Double(d) => Ok(d.to_string()),
            Value::Int(i) => Ok(i.to_string()),
            other => Err(ClientError::UnexpectedResponse {
                method: "version",
                detail: format!("expected a version scalar, got {other:?}"),
            }),
        }
    }

    /// Run the server's update preflight and return its verdict.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn update(&self) -> Result<bool> {
        let value = self
            .call(Endpoint::ReadWrite, MethodCall::new("update"))
            .await?;
        Ok(value.is_truthy())
    }

    // Generic lifecycle operations

    /// Fetch every record of a type, in server order.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response is not a list.
    pub async fn find_all<R: Record>(&self) -> Result<Vec<R>> {
        let value = self
            .call(Endpoint::ReadOnly, MethodCall::new(R::FIND_ALL))
            .await?;

        let items = match value {
            Value::Array(items) => items,
            Value::Nil => Vec::new(),
            other => {
                return Err(ClientError::UnexpectedResponse {
                    method: R::FIND_ALL,
                    detail: format!("expected an array, got {other:?}"),
                });
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for item in &items {
            match Attrs::from_value(item) {
                Some(attrs) => records.push(R::from_attrs(&attrs)),
                None => tracing::warn!("skipping malformed {} record", R::KIND),
            }
        }
        Ok(records)
    }

    /// Fetch a single record by name. The server answers an unknown name
    /// with an empty record, which maps to `None`.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn find_one<R: Record>(&self, name: &str) -> Result<Option<R>> {
        let call = MethodCall::new(R::FIND_ONE).arg(name).arg(false);
        let value = self.call(Endpoint::ReadOnly, call).await?;

        match &value {
            Value::Nil => Ok(None),
            // Newer servers marshal a missing record as "~"
            Value::Str(s) if s == "~" => Ok(None),
            _ => match Attrs::from_value(&value) {
                Some(attrs) if attrs.is_empty() => Ok(None),
                Some(attrs) => Ok(Some(R::from_attrs(&attrs))),
                None => Err(ClientError::UnexpectedResponse {
                    method: R::FIND_ONE,
                    detail: format!("expected a record struct, got {value:?}"),
                }),
            },
        }
    }

    /// Remove a record by name. Logs in first.
    ///
    /// # Errors
    /// Returns an error if login or the request fails.
    pub async fn remove<R: Record>(&self, name: &str) -> Result<bool> {
        let token = self.login().await?;
        let call = MethodCall::new(R::REMOVE).arg(name).arg(token);
        let value = self.call(Endpoint::ReadWrite, call).await?;
        Ok(value.is_truthy())
    }

    // Typed wrappers

    /// List all distros.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn distros(&self) -> Result<Vec<Distro>> {
        self.find_all().await
    }

    /// Get a single distro by name.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn distro(&self, name: &str) -> Result<Option<Distro>> {
        self.find_one(name).await
    }

    /// Remove a distro by name.
    ///
    /// # Errors
    /// Returns an error if login or the request fails.
    pub async fn remove_distro(&self, name: &str) -> Result<bool> {
        self.remove::<Distro>(name).await
    }

    /// List all profiles.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn profiles(&self) -> Result<Vec<Profile>> {
        self.find_all().await
    }

    /// Get a single profile by name.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn profile(&self, name: &str) -> Result<Option<Profile>> {
        self.find_one(name).await
    }

    /// Remove a profile by name.
    ///
    /// # Errors
    /// Returns an error if login or the request fails.
    pub async fn remove_profile(&self, name: &str) -> Result<bool> {
        self.remove::<Profile>(name).await
    }

    /// List all systems.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn systems(&self) -> Result<Vec<System>> {
        self.find_all().await
    }

    /// Get a single system by name.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn system(&self, name: &str) -> Result<Option<System>> {
        self.find_one(name).await
    }

    /// Remove a system by name.
    ///
    /// # Errors
    /// Returns an error if login or the request fails.
    pub async fn remove_system(&self, name: &str) -> Result<bool> {
        self.remove::<System>(name).await
    }

    /// List all images.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn images(&self) -> Result<Vec<Image>> {
        self.find_all().await
    }

    /// Get a single image by name.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn image(&self, name: &str) -> Result<Option<Image>> {
        self.find_one(name).await
    }

    /// Remove an image by name.
    ///
    /// # Errors
    /// Returns an error if login or the request fails.
    pub async fn remove_image(&self, name: &str) -> Result<bool> {
        self.remove::<Image>(name).await
    }

    // Save sequences

    /// Save a system: log in, run the update preflight, create the
    /// placeholder record, write each populated field, attach interface
    /// bundles, and commit.
    ///
    /// # Errors
    /// Returns `UpdateFailed` when the preflight reports failure (nothing
    /// is written in that case), or the first error any call produces.
    pub async fn save_system(&self, system: &System) -> Result<()> {
        let token = self.login().await?;

        if !self.update().await? {
            return Err(ClientError::UpdateFailed);
        }

        let handle = self
            .call(
                Endpoint::ReadWrite,
                MethodCall::new("new_system").arg(token.as_str()),
            )
            .await?;

        self.modify(
            "modify_system",
            &handle,
            "name",
            Value::from(system.name.as_str()),
            &token,
        )
        .await?;

        if let Some(profile) = &system.profile {
            self.modify(
                "modify_system",
                &handle,
                "profile",
                Value::from(profile.as_str()),
                &token,
            )
            .await?;
        }
        if let Some(image) = &system.image {
            self.modify(
                "modify_system",
                &handle,
                "image",
                Value::from(image.as_str()),
                &token,
            )
            .await?;
        }

        for (field, value) in save::system_fields(system) {
            self.modify("modify_system", &handle, field, value, &token)
                .await?;
        }

        // Bundle indices count only interfaces that carry data.
        let mut index = 0;
        for interface in system.interfaces.values() {
            let bundle = interface.bundle_for_saving(index);
            if bundle.is_empty() {
                continue;
            }
            let bundle = Value::Struct(
                bundle
                    .into_iter()
                    .map(|(key, value)| (key, Value::Str(value)))
                    .collect(),
            );
            self.modify("modify_system", &handle, "modify-interface", bundle, &token)
                .await?;
            index += 1;
        }

        self.call(
            Endpoint::ReadWrite,
            MethodCall::new("save_system").arg(handle).arg(token),
        )
        .await?;
        Ok(())
    }

    /// Save an image: log in, create the placeholder record, write each
    /// populated field, and commit.
    ///
    /// # Errors
    /// Returns the first error any call produces.
    pub async fn save_image(&self, image: &Image) -> Result<()> {
        let token = self.login().await?;

        let handle = self
            .call(
                Endpoint::ReadWrite,
                MethodCall::new("new_image").arg(token.as_str()),
            )
            .await?;

        self.modify(
            "modify_image",
            &handle,
            "name",
            Value::from(image.name.as_str()),
            &token,
        )
        .await?;

        for (field, value) in save::image_fields(image) {
            self.modify("modify_image", &handle, field, value, &token)
                .await?;
        }

        self.call(
            Endpoint::ReadWrite,
            MethodCall::new("save_image").arg(handle).arg(token),
        )
        .await?;
        Ok(())
    }

    /// One `modify_*` call. The placeholder handle is passed back verbatim
    /// since servers have returned both ints and opaque strings for it.
    async fn modify(
        &self,
        method: &'static str,
        handle: &Value,
        field: &str,
        value: Value,
        token: &str,
    ) -> Result<()> {
        let call = MethodCall {
            name: method.to_string(),
            params: vec![
                handle.clone(),
                Value::from(field),
                value,
                Value::from(token),
            ],
        };
        self.call(Endpoint::ReadWrite, call).await?;
        Ok(())
    }
}
