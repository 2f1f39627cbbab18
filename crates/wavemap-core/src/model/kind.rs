use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The closed set of component kinds a node can have.
///
/// Declaration order is the display/sort order: custom components sort
/// ahead of pages, and both ahead of anything that is only ever referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Custom markup component (`c:`).
    Component,
    /// Server-rendered page (`page:`).
    Page,
    /// Server-side logic unit backing a component or page (`controller:`).
    Controller,
    /// Platform-provided component (`lightning:`, `ui:`, `aura:`, ...).
    BaseComponent,
    /// Static resource bundle (`resource:`).
    StaticResource,
    /// Custom label (`label:`).
    Label,
    /// Message channel (`channel:`).
    MessageChannel,
}

impl NodeKind {
    /// Every variant, in sort order.
    pub const ALL: [Self; 7] = [
        Self::Component,
        Self::Page,
        Self::Controller,
        Self::BaseComponent,
        Self::StaticResource,
        Self::Label,
        Self::MessageChannel,
    ];

    /// Stable lowercase name used in serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Page => "page",
            Self::Controller => "controller",
            Self::BaseComponent => "base-component",
            Self::StaticResource => "static-resource",
            Self::Label => "label",
            Self::MessageChannel => "message-channel",
        }
    }

    /// Identifier prefix used when minting an id for a bare name.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Component => "c",
            Self::Page => "page",
            Self::Controller => "controller",
            Self::BaseComponent => "lightning",
            Self::StaticResource => "resource",
            Self::Label => "label",
            Self::MessageChannel => "channel",
        }
    }

    /// Whether nodes of this kind are scheduled for conversion.
    #[must_use]
    pub const fn is_convertible(self) -> bool {
        matches!(self, Self::Component | Self::Page)
    }
}

/// Tag describing why one component depends on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    ComponentReference,
    Event,
    ControllerBinding,
    InterfaceImplementation,
    Inheritance,
    PageInclude,
    MessageChannel,
    StaticResource,
    Label,
    BaseComponent,
    /// Any tag the extractor emitted that this version does not know.
    ///
    /// Kept so one odd mention does not fail deserialization of a whole
    /// input file; the graph builder drops these.
    #[serde(other)]
    Unrecognized,
}

impl DependencyKind {
    /// Every recognized variant (excludes [`DependencyKind::Unrecognized`]).
    pub const RECOGNIZED: [Self; 10] = [
        Self::ComponentReference,
        Self::Event,
        Self::ControllerBinding,
        Self::InterfaceImplementation,
        Self::Inheritance,
        Self::PageInclude,
        Self::MessageChannel,
        Self::StaticResource,
        Self::Label,
        Self::BaseComponent,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ComponentReference => "component-reference",
            Self::Event => "event",
            Self::ControllerBinding => "controller-binding",
            Self::InterfaceImplementation => "interface-implementation",
            Self::Inheritance => "inheritance",
            Self::PageInclude => "page-include",
            Self::MessageChannel => "message-channel",
            Self::StaticResource => "static-resource",
            Self::Label => "label",
            Self::BaseComponent => "base-component",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Kind assumed for a bare (un-namespaced) target mentioned with this tag.
    #[must_use]
    pub const fn implied_target_kind(self) -> NodeKind {
        match self {
            Self::ControllerBinding => NodeKind::Controller,
            Self::PageInclude => NodeKind::Page,
            Self::StaticResource => NodeKind::StaticResource,
            Self::Label => NodeKind::Label,
            Self::MessageChannel => NodeKind::MessageChannel,
            Self::BaseComponent => NodeKind::BaseComponent,
            Self::ComponentReference
            | Self::Event
            | Self::InterfaceImplementation
            | Self::Inheritance
            | Self::Unrecognized => NodeKind::Component,
        }
    }

    #[must_use]
    pub const fn is_recognized(self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

/// Error returned when parsing a kind from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {expected}: '{got}'")]
pub struct ParseKindError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase().replace('_', "-")
}

impl FromStr for NodeKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseKindError {
                expected: "node kind",
                got: s.to_string(),
            })
    }
}

impl FromStr for DependencyKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        Self::RECOGNIZED
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseKindError {
                expected: "dependency kind",
                got: s.to_string(),
            })
    }
}
