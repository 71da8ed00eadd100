//! Helpers for qualified XML names of the form `prefix:local`.
//!
//! Only the first `:` is significant; names are assumed to carry at most one
//! prefix segment.

pub const SEPARATOR: char = ':';

pub fn split_namespaced_name(prefixed_name: &str) -> (Option<&str>, &str) {
    match prefixed_name.split_once(SEPARATOR) {
        Some((prefix, local_name)) => (Some(prefix), local_name),
        None => (None, prefixed_name),
    }
}

/// Returns the local part of a qualified name, or the name itself when it has
/// no prefix.
pub fn strip_namespace(prefixed_name: &str) -> &str {
    split_namespaced_name(prefixed_name).1
}

/// Returns the prefix of a qualified name, or an empty string.
///
/// With `with_separator` a non-empty prefix keeps its trailing `:` so it can be
/// glued onto a local name to rebuild a lookup key, e.g. `wsdl:` + `types`.
pub fn extract_namespace(prefixed_name: &str, with_separator: bool) -> String {
    match split_namespaced_name(prefixed_name).0 {
        Some(prefix) if with_separator => format!("{}{}", prefix, SEPARATOR),
        Some(prefix) => prefix.to_owned(),
        None => String::new(),
    }
}

/// `true` for `xmlns` and `xmlns:*` attribute names.
pub fn is_namespace_declaration(attribute_name: &str) -> bool {
    match split_namespaced_name(attribute_name) {
        (Some(prefix), _) => prefix == "xmlns",
        (None, name) => name == "xmlns",
    }
}
