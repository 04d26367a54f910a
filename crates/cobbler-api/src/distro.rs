//! Distro records

use serde::Serialize;

use crate::attrs::{Attrs, KeyValues};
use crate::record::Record;

/// A distribution registered on the server: a kernel/initrd pair plus the
/// metadata needed to netboot it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Distro {
    pub name: String,
    pub owners: Vec<String>,
    pub kernel: Option<String>,
    pub initrd: Option<String>,
    pub arch: Option<String>,
    pub breed: Option<String>,
    pub depth: Option<String>,
    pub source_repos: Vec<String>,
    pub kernel_options: KeyValues,
    pub ks_meta: KeyValues,
    pub parent: Option<String>,
}

impl Record for Distro {
    const FIND_ALL: &'static str = "get_distros";
    const FIND_ONE: &'static str = "get_distro";
    const REMOVE: &'static str = "remove_distro";
    const KIND: &'static str = "distro";

    fn from_attrs(attrs: &Attrs) -> Self {
        Self {
            name: attrs.string("name").unwrap_or_default(),
            owners: attrs.string_list("owners"),
            kernel: attrs.string("kernel"),
            initrd: attrs.string("initrd"),
            arch: attrs.string("arch"),
            breed: attrs.string("breed"),
            depth: attrs.string("depth"),
            source_repos: attrs.string_list("source_repos"),
            kernel_options: attrs.key_values("kernel_options"),
            ks_meta: attrs.key_values("ks_meta"),
            parent: attrs.string("parent"),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
