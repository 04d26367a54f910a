//! Field sequences for multi-call saves
//!
//! A save writes each populated field with its own modify call. Inherited
//! markers are never written back; the server keeps those fields bound to
//! the parent object.

use cobbler_api::{Image, Inheritable, KeyValues, System};
use cobbler_xmlrpc::Value;

/// Fields written after `name`/`profile`/`image` when saving a system.
pub(crate) fn system_fields(system: &System) -> Vec<(&'static str, Value)> {
    let mut fields = Vec::new();
    push_inheritable(&mut fields, "kickstart", &system.kickstart);
    push_key_values(&mut fields, "kernel_options", &system.kernel_options);
    push_key_values(&mut fields, "ks_meta", &system.ks_meta);
    push_string(&mut fields, "netboot_enabled", &system.netboot_enabled);
    push_list(&mut fields, "owners", &system.owners);
    push_inheritable(&mut fields, "server", &system.server);
    push_inheritable(&mut fields, "virt_bridge", &system.virt_bridge);
    push_inheritable(&mut fields, "virt_cpus", &system.virt_cpus);
    push_inheritable(&mut fields, "virt_file_size", &system.virt_file_size);
    push_inheritable(&mut fields, "virt_path", &system.virt_path);
    push_inheritable(&mut fields, "virt_ram", &system.virt_ram);
    push_inheritable(&mut fields, "virt_type", &system.virt_type);
    fields
}

/// Fields written after `name` when saving an image.
pub(crate) fn image_fields(image: &Image) -> Vec<(&'static str, Value)> {
    let mut fields = Vec::new();
    push_string(&mut fields, "file", &image.file);
    push_string(&mut fields, "image_type", &image.image_type);
    push_string(&mut fields, "arch", &image.arch);
    push_string(&mut fields, "breed", &image.breed);
    push_list(&mut fields, "owners", &image.owners);
    push_inheritable(&mut fields, "virt_auto_boot", &image.virt_auto_boot);
    push_inheritable(&mut fields, "virt_bridge", &image.virt_bridge);
    push_inheritable(&mut fields, "virt_cpus", &image.virt_cpus);
    push_inheritable(&mut fields, "virt_file_size", &image.virt_file_size);
    push_inheritable(&mut fields, "virt_path", &image.virt_path);
    push_inheritable(&mut fields, "virt_ram", &image.virt_ram);
    fields
}

fn push_string(
    fields: &mut Vec<(&'static str, Value)>,
    name: &'static str,
    value: &Option<String>,
) {
    if let Some(value) = value {
        fields.push((name, Value::from(value.as_str())));
    }
}

fn push_inheritable(
    fields: &mut Vec<(&'static str, Value)>,
    name: &'static str,
    value: &Option<Inheritable<String>>,
) {
    if let Some(Inheritable::Value(value)) = value {
        fields.push((name, Value::from(value.as_str())));
    }
}

fn push_list(fields: &mut Vec<(&'static str, Value)>, name: &'static str, values: &[String]) {
    if !values.is_empty() {
        fields.push((
            name,
            Value::Array(values.iter().map(|v| Value::from(v.as_str())).collect()),
        ));
    }
}

fn push_key_values(
    fields: &mut Vec<(&'static str, Value)>,
    name: &'static str,
    values: &KeyValues,
) {
    if !values.is_empty() {
        fields.push((name, values.to_value()));
    }
}
