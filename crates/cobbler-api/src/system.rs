//! System records

use std::collections::BTreeMap;

use serde::Serialize;

use crate::attrs::{Attrs, Inheritable, KeyValues};
use crate::interface::NetworkInterface;
use crate::record::Record;

/// A system registered on the server, built from either a profile or an
/// image, with its network interfaces as nested sub-records.
///
/// # Example
/// ```
/// use cobbler_api::{NetworkInterface, System};
///
/// let mut system = System::new("system1").with_profile("profile1");
/// system.interfaces.insert(
///     "intf0".to_string(),
///     NetworkInterface {
///         mac_address: Some("00:11:22:33:44:55".to_string()),
///         ..Default::default()
///     },
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct System {
    pub name: String,
    pub parent: Option<String>,
    pub profile: Option<String>,
    pub image: Option<String>,
    pub depth: Option<String>,
    pub kernel_options: KeyValues,
    pub kickstart: Option<Inheritable<String>>,
    pub ks_meta: KeyValues,
    pub netboot_enabled: Option<String>,
    pub owners: Vec<String>,
    pub server: Option<Inheritable<String>>,
    pub interfaces: BTreeMap<String, NetworkInterface>,
    pub virt_cpus: Option<Inheritable<String>>,
    pub virt_file_size: Option<Inheritable<String>>,
    pub virt_path: Option<Inheritable<String>>,
    pub virt_ram: Option<Inheritable<String>>,
    pub virt_type: Option<Inheritable<String>>,
    pub virt_bridge: Option<Inheritable<String>>,
}

impl System {
    /// Create an empty system with a name, ready to be saved.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build this system from a profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Build this system from an image.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

impl Record for System {
    const FIND_ALL: &'static str = "get_systems";
    const FIND_ONE: &'static str = "get_system";
    const REMOVE: &'static str = "remove_system";
    const KIND: &'static str = "system";

    fn from_attrs(attrs: &Attrs) -> Self {
        Self {
            name: attrs.string("name").unwrap_or_default(),
            parent: attrs.string("parent"),
            profile: attrs.string("profile"),
            image: attrs.string("image"),
            depth: attrs.string("depth"),
            kernel_options: attrs.key_values("kernel_options"),
            kickstart: attrs.inheritable("kickstart"),
            ks_meta: attrs.key_values("ks_meta"),
            netboot_enabled: attrs.string("netboot_enabled"),
            owners: attrs.string_list("owners"),
            server: attrs.inheritable("server"),
            interfaces: attrs
                .sub_records("interfaces")
                .iter()
                .map(|(name, sub)| (name.clone(), NetworkInterface::from_attrs(sub)))
                .collect(),
            virt_cpus: attrs.inheritable("virt_cpus"),
            virt_file_size: attrs.inheritable("virt_file_size"),
            virt_path: attrs.inheritable("virt_path"),
            virt_ram: attrs.inheritable("virt_ram"),
            virt_type: attrs.inheritable("virt_type"),
            virt_bridge: attrs.inheritable("virt_bridge"),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
