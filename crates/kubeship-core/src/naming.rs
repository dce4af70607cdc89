//! REST path segments for entity kinds
//!
//! The API addresses collections by the lower-cased, pluralized kind. This is
//! not a general pluralization algorithm: it reproduces the segments the API
//! server actually exposes.

use phf::phf_map;

/// Namespace used when a manifest does not name one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Kinds whose REST segment is not `kind + "s"`
static IRREGULAR_SEGMENTS: phf::Map<&'static str, &'static str> = phf_map! {
    "componentstatus" => "componentstatus",
};

/// Kinds the core API group serves
pub const KNOWN_KINDS: &[&str] = &[
    "Pod",
    "Service",
    "ReplicationController",
    "Node",
    "Event",
    "Endpoint",
    "Namespace",
    "Secret",
    "ResourceQuota",
    "LimitRange",
    "PersistentVolume",
    "PersistentVolumeClaim",
    "ComponentStatus",
    "ServiceAccount",
];

/// Map an entity kind to its collection segment
///
/// ```
/// use kubeship_core::naming::resource_name;
/// assert_eq!(resource_name("Pod"), "pods");
/// assert_eq!(resource_name("ResourceQuota"), "resourcequotas");
/// assert_eq!(resource_name("ComponentStatus"), "componentstatus");
/// ```
pub fn resource_name(kind: &str) -> String {
    pluralize(&kind.to_lowercase())
}

fn pluralize(name: &str) -> String {
    if name.ends_with("quota") {
        return format!("{}s", name);
    }
    match IRREGULAR_SEGMENTS.get(name) {
        Some(segment) => (*segment).to_string(),
        None => format!("{}s", name),
    }
}

/// Resolve an optional namespace, falling back to `default`
pub fn effective_namespace(namespace: Option<&str>) -> &str {
    match namespace {
        Some(ns) if !ns.is_empty() => ns,
        _ => DEFAULT_NAMESPACE,
    }
}

/// `namespaces/{ns}/` prefix for namespace-scoped paths
pub fn namespace_prefix(namespace: Option<&str>) -> String {
    format!("namespaces/{}/", effective_namespace(namespace))
}

/// Path of an entity collection, or of a single entity when `name` is given
pub fn entity_path(kind: &str, namespace: Option<&str>, name: Option<&str>) -> String {
    let collection = format!("{}{}", namespace_prefix(namespace), resource_name(kind));
    match name {
        Some(name) => format!("{}/{}", collection, name),
        None => collection,
    }
}

/// Whether a kind belongs to the core group served by this client
pub fn is_known_kind(kind: &str) -> bool {
    KNOWN_KINDS.iter().any(|k| k.eq_ignore_ascii_case(kind))
}
