//! cobbler-api: Typed views over Cobbler records
//!
//! Each entity type (distro, profile, system, image) is a thin typed view
//! over the attribute dictionary the server returns, bound to its three
//! remote lifecycle methods through the [`Record`] trait. Network
//! interfaces are nested sub-records of systems and are not independently
//! findable.

pub mod attrs;
pub mod distro;
pub mod image;
pub mod interface;
pub mod profile;
pub mod record;
pub mod system;

pub use attrs::{Attrs, INHERIT, Inheritable, KeyValues};
pub use distro::Distro;
pub use image::Image;
pub use interface::NetworkInterface;
pub use profile::Profile;
pub use record::Record;
pub use system::System;
