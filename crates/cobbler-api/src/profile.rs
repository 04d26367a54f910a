//! Profile records

use serde::Serialize;

use crate::attrs::{Attrs, Inheritable, KeyValues};
use crate::record::Record;

/// A provisioning profile: a distro plus the kickstart and virt settings
/// applied to systems built from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub distro: Option<String>,
    pub dhcp_tag: Option<String>,
    pub enable_menu: Option<String>,
    pub kernel_options: KeyValues,
    pub kickstart: Option<Inheritable<String>>,
    pub ks_meta: KeyValues,
    pub name_servers: Vec<String>,
    pub owners: Vec<String>,
    pub parent: Option<String>,
    pub repos: Vec<String>,
    pub server: Option<Inheritable<String>>,
    pub virt_bridge: Option<Inheritable<String>>,
    pub virt_cpus: Option<Inheritable<String>>,
    pub virt_file_size: Option<Inheritable<String>>,
    pub virt_path: Option<Inheritable<String>>,
    pub virt_ram: Option<Inheritable<String>>,
    pub virt_type: Option<Inheritable<String>>,
}

impl Record for Profile {
    const FIND_ALL: &'static str = "get_profiles";
    const FIND_ONE: &'static str = "get_profile";
    const REMOVE: &'static str = "remove_profile";
    const KIND: &'static str = "profile";

    fn from_attrs(attrs: &Attrs) -> Self {
        Self {
            name: attrs.string("name").unwrap_or_default(),
            distro: attrs.string("distro"),
            dhcp_tag: attrs.string("dhcp_tag"),
            enable_menu: attrs.string("enable_menu"),
            kernel_options: attrs.key_values("kernel_options"),
            kickstart: attrs.inheritable("kickstart"),
            ks_meta: attrs.key_values("ks_meta"),
            name_servers: attrs.string_list("name_servers"),
            owners: attrs.string_list("owners"),
            parent: attrs.string("parent"),
            repos: attrs.string_list("repos"),
            server: attrs.inheritable("server"),
            virt_bridge: attrs.inheritable("virt_bridge"),
            virt_cpus: attrs.inheritable("virt_cpus"),
            virt_file_size: attrs.inheritable("virt_file_size"),
            virt_path: attrs.inheritable("virt_path"),
            virt_ram: attrs.inheritable("virt_ram"),
            virt_type: attrs.inheritable("virt_type"),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
