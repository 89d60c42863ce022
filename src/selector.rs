//! Typed selector and attribute names handed to the host's query facility.
//!
//! Hosts receive these instead of ad hoc strings so that the data-attribute
//! prefix and the counter/current forms are built in exactly one place.

use std::fmt;
use std::sync::Arc;

/// A CSS-style selector understood by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector(Arc<str>);

impl Selector {
    pub fn new(raw: impl Into<Arc<str>>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Matches elements of `self` whose counter attribute equals `counter`,
    /// e.g. `.slide[data-counter=3]`.
    pub fn with_counter(&self, attr: &DataAttribute, counter: usize) -> Self {
        Self::new(format!("{}[{}={}]", self.0, attr, counter))
    }

    /// Matches elements of `self` carrying `class`, e.g. `.slide.active`.
    pub fn with_class(&self, class: &ClassName) -> Self {
        Self::new(format!("{}.{}", self.0, class))
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `data-*` attribute; the prefix is added on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataAttribute(Arc<str>);

impl DataAttribute {
    pub fn new(name: &str) -> Self {
        Self(format!("data-{name}").into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Class used as the "is current" marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassName(Arc<str>);

impl ClassName {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Locates one track: a container and the items inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackQuery {
    pub container: Selector,
    pub item: Selector,
}

impl TrackQuery {
    pub fn new(container: Selector, item: Selector) -> Self {
        Self { container, item }
    }

    /// Selector for the item tagged with `counter` inside this track.
    pub fn item_at(&self, attr: &DataAttribute, counter: usize) -> Selector {
        self.item.with_counter(attr, counter)
    }

    /// Selector for the item flagged current inside this track.
    pub fn current_item(&self, class: &ClassName) -> Selector {
        self.item.with_class(class)
    }
}

impl fmt::Display for TrackQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.container, self.item)
    }
}
