//! Image records

use serde::Serialize;

use crate::attrs::{Attrs, Inheritable};
use crate::record::Record;

/// A standalone boot image (ISO, virt-image) registered on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Image {
    pub name: String,
    pub arch: Option<String>,
    pub breed: Option<String>,
    pub depth: Option<String>,
    pub file: Option<String>,
    pub image_type: Option<String>,
    pub owners: Vec<String>,
    pub parent: Option<String>,
    pub virt_auto_boot: Option<Inheritable<String>>,
    pub virt_bridge: Option<Inheritable<String>>,
    pub virt_cpus: Option<Inheritable<String>>,
    pub virt_file_size: Option<Inheritable<String>>,
    pub virt_path: Option<Inheritable<String>>,
    pub virt_ram: Option<Inheritable<String>>,
}

impl Image {
    /// Create an empty image with a name, ready to be saved.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the image file path.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl Record for Image {
    const FIND_ALL: &'static str = "get_images";
    const FIND_ONE: &'static str = "get_image";
    const REMOVE: &'static str = "remove_image";
    const KIND: &'static str = "image";

    fn from_attrs(attrs: &Attrs) -> Self {
        Self {
            name: attrs.string("name").unwrap_or_default(),
            arch: attrs.string("arch"),
            breed: attrs.string("breed"),
            depth: attrs.string("depth"),
            file: attrs.string("file"),
            image_type: attrs.string("image_type"),
            owners: attrs.string_list("owners"),
            parent: attrs.string("parent"),
            virt_auto_boot: attrs.inheritable("virt_auto_boot"),
            virt_bridge: attrs.inheritable("virt_bridge"),
            virt_cpus: attrs.inheritable("virt_cpus"),
            virt_file_size: attrs.inheritable("virt_file_size"),
            virt_path: attrs.inheritable("virt_path"),
            virt_ram: attrs.inheritable("virt_ram"),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
