//! Network interface sub-records

use std::collections::BTreeMap;

use serde::Serialize;

use crate::attrs::Attrs;

/// A network interface attached to a system.
///
/// Interfaces are nested sub-records of a system's `interfaces` dictionary;
/// they have no lifecycle of their own and are saved through
/// `modify_system` with a flattened key bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkInterface {
    pub mac_address: Option<String>,
    pub ip_address: Option<String>,
    pub dns_name: Option<String>,
    pub dhcp_tag: Option<String>,
    pub subnet: Option<String>,
    pub gateway: Option<String>,
    pub virt_bridge: Option<String>,
}

impl NetworkInterface {
    /// Build the view from an interface sub-dictionary.
    #[must_use]
    pub fn from_attrs(attrs: &Attrs) -> Self {
        Self {
            mac_address: attrs.string("mac_address"),
            ip_address: attrs.string("ip_address"),
            dns_name: attrs.string("dns_name"),
            dhcp_tag: attrs.string("dhcp_tag"),
            subnet: attrs.string("subnet"),
            gateway: attrs.string("gateway"),
            virt_bridge: attrs.string("virt_bridge"),
        }
    }

    /// Flatten set fields into the `modify-interface` key bundle for the
    /// interface at position `index`. An interface with no set fields
    /// produces an empty bundle and is skipped during save.
    #[must_use]
    pub fn bundle_for_saving(&self, index: usize) -> BTreeMap<String, String> {
        let mut bundle = BTreeMap::new();
        let mut put = |prefix: &str, field: &Option<String>| {
            if let Some(value) = field {
                bundle.insert(format!("{prefix}-intf{index}"), value.clone());
            }
        };

        put("macaddress", &self.mac_address);
        put("ipaddress", &self.ip_address);
        put("dnsname", &self.dns_name);
        put("dhcptag", &self.dhcp_tag);
        put("subnet", &self.subnet);
        put("gateway", &self.gateway);
        put("virtbridge", &self.virt_bridge);
        bundle
    }
}
