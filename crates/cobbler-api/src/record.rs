//! Declarative binding between entity types and remote lifecycle methods

use crate::attrs::Attrs;

/// A typed view over a remote record dictionary.
///
/// Implementors declare the remote method names the server exposes for the
/// entity's lifecycle; the client's generic find and remove operations are
/// written once against this trait. For example:
///
/// ```
/// use cobbler_api::{Attrs, Record};
///
/// struct Repo {
///     name: String,
/// }
///
/// impl Record for Repo {
///     const FIND_ALL: &'static str = "get_repos";
///     const FIND_ONE: &'static str = "get_repo";
///     const REMOVE: &'static str = "remove_repo";
///     const KIND: &'static str = "repo";
///
///     fn from_attrs(attrs: &Attrs) -> Self {
///         Repo {
///             name: attrs.string("name").unwrap_or_default(),
///         }
///     }
///
///     fn name(&self) -> &str {
///         &self.name
///     }
/// }
/// ```
pub trait Record: Sized {
    /// Remote method returning every record of this type
    const FIND_ALL: &'static str;
    /// Remote method returning a single record by name
    const FIND_ONE: &'static str;
    /// Remote method removing a record by name
    const REMOVE: &'static str;
    /// Noun used in log and error output
    const KIND: &'static str;

    /// Build the typed view from a record dictionary.
    fn from_attrs(attrs: &Attrs) -> Self;

    /// The record name, which is its primary key on the server.
    fn name(&self) -> &str;
}
