//! cobbler-client: async client for the Cobbler XML-RPC API
//!
//! Provides the connection manager and typed entity operations for talking
//! to a Cobbler provisioning server.
//!
//! # Examples
//!
//! ## Finding records
//!
//! ```no_run
//! use cobbler_client::Connection;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = Connection::new("cobbler.example.com")?;
//!
//! for distro in conn.distros().await? {
//!     println!("{} ({})", distro.name, distro.arch.as_deref().unwrap_or("?"));
//! }
//!
//! if let Some(system) = conn.system("Web-Server").await? {
//!     println!("profile: {:?}", system.profile);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Saving a system
//!
//! ```no_run
//! use cobbler_client::Connection;
//! use cobbler_api::{NetworkInterface, System};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = Connection::with_credentials("cobbler.example.com", "admin", "secret")?;
//!
//! let mut system = System::new("virt1").with_profile("Fedora-9-i386");
//! system.interfaces.insert(
//!     "intf0".to_string(),
//!     NetworkInterface {
//!         mac_address: Some("00:11:22:33:44:55".to_string()),
//!         ..Default::default()
//!     },
//! );
//!
//! conn.save_system(&system).await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
mod save;
pub mod transport;

pub use connection::{Connection, Credentials};
pub use error::{ClientError, Result};
pub use transport::{Endpoint, HttpTransport, Transport};
