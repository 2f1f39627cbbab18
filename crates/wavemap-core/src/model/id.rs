//! Node identifier normalization.
//!
//! Identifiers have the shape `<namespace>:<name>`. The namespace decides the
//! [`NodeKind`]:
//!
//! | namespace                                  | kind             |
//! |--------------------------------------------|------------------|
//! | `c`                                        | `Component`      |
//! | `page`                                     | `Page`           |
//! | `controller`                               | `Controller`     |
//! | `lightning`, `ui`, `aura`, `force`, ...    | `BaseComponent`  |
//! | `resource`                                 | `StaticResource` |
//! | `label`                                    | `Label`          |
//! | `channel`                                  | `MessageChannel` |
//! | anything else (package namespace)          | `Component`      |
//! | no namespace at all                        | `Component`      |
//!
//! Inference is total: every string maps to exactly one kind.

use crate::model::kind::{DependencyKind, NodeKind};

/// Namespaces owned by the platform. References into them are base components.
pub const BASE_NAMESPACES: &[&str] = &[
    "apex",
    "aura",
    "force",
    "forcechatter",
    "forcecommunity",
    "lightning",
    "lightningcommunity",
    "ltng",
    "ui",
    "wave",
];

/// Split an identifier into `(namespace, name)`.
///
/// Only the first `:` separates; names may themselves contain colons.
#[must_use]
pub fn split_id(id: &str) -> (Option<&str>, &str) {
    match id.split_once(':') {
        Some((ns, name)) => (Some(ns), name),
        None => (None, id),
    }
}

/// Map a namespace to the kind it denotes, if it is one of ours.
#[must_use]
pub fn kind_for_namespace(namespace: &str) -> Option<NodeKind> {
    let ns = namespace.to_ascii_lowercase();
    match ns.as_str() {
        "c" => Some(NodeKind::Component),
        "page" => Some(NodeKind::Page),
        "controller" => Some(NodeKind::Controller),
        "resource" => Some(NodeKind::StaticResource),
        "label" => Some(NodeKind::Label),
        "channel" => Some(NodeKind::MessageChannel),
        other if BASE_NAMESPACES.contains(&other) => Some(NodeKind::BaseComponent),
        _ => None,
    }
}

/// Infer the kind of a node from its identifier alone.
#[must_use]
pub fn infer_kind(id: &str) -> NodeKind {
    match split_id(id) {
        (Some(ns), _) => kind_for_namespace(ns).unwrap_or(NodeKind::Component),
        (None, _) => NodeKind::Component,
    }
}

/// The display name part of an identifier (everything after the namespace).
#[must_use]
pub fn display_name(id: &str) -> &str {
    split_id(id).1
}

/// Mint an identifier for `name` under the canonical prefix of `kind`.
#[must_use]
pub fn make_id(kind: NodeKind, name: &str) -> String {
    format!("{}:{name}", kind.prefix())
}

/// Normalize an analyzed component's own identifier.
///
/// Shares the rules of [`normalize_target`], except that a bare identifier
/// takes the prefix of the component's own `kind`. An analysis of `card`
/// and a reference to `card` therefore land on the same node.
#[must_use]
pub fn normalize_id(id: &str, kind: NodeKind) -> Option<String> {
    let id = id.trim();
    match split_id(id) {
        _ if id.is_empty() => None,
        (Some(ns), name) if ns.trim().is_empty() || name.trim().is_empty() => None,
        (Some(_), _) => Some(id.to_string()),
        (None, name) => Some(make_id(kind, name)),
    }
}

/// Normalize a raw dependency target into a node identifier.
///
/// Namespaced targets are kept verbatim (after trimming). A bare target is
/// given the prefix implied by the dependency tag that mentioned it, so a
/// controller binding to `AccountController` becomes
/// `controller:AccountController`.
///
/// Returns `None` for targets that cannot name a node: empty strings, or a
/// namespace with an empty name (`"c:"`).
#[must_use]
pub fn normalize_target(target: &str, dep_kind: DependencyKind) -> Option<String> {
    let target = target.trim();
    if target.is_empty() {
        return None;
    }

    match split_id(target) {
        (Some(ns), name) => {
            if ns.trim().is_empty() || name.trim().is_empty() {
                None
            } else {
                Some(target.to_string())
            }
        }
        (None, name) => Some(make_id(dep_kind.implied_target_kind(), name)),
    }
}
