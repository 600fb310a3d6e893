//! Predicates deciding which ways become part of the network.

use std::collections::BTreeSet;
use std::fmt;

use waygraph_core::Way;

/// Accepts or rejects a fully parsed way before it is committed.
pub trait WayFilter: fmt::Debug + Send + Sync {
    /// Whether `way` should be added to the network.
    fn accept(&self, way: &Way) -> bool;
}

/// Accepts every way.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl WayFilter for AcceptAll {
    fn accept(&self, _way: &Way) -> bool {
        true
    }
}

/// Accepts ways whose `highway` tag is one of a configured set of classes.
///
/// # Examples
///
/// ```
/// use waygraph_core::{NodeId, Way, WayId};
/// use waygraph_data::{HighwayFilter, WayFilter};
///
/// let filter = HighwayFilter::default();
/// let road = Way::road(WayId(1), "tertiary", vec![NodeId(1), NodeId(2)]);
/// let path = Way::road(WayId(2), "footway", vec![NodeId(1), NodeId(2)]);
/// assert!(filter.accept(&road));
/// assert!(!filter.accept(&path));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighwayFilter {
    classes: BTreeSet<String>,
}

impl HighwayFilter {
    /// Road classes accepted by [`HighwayFilter::default`].
    pub const DEFAULT_CLASSES: [&'static str; 5] = [
        "primary",
        "secondary",
        "tertiary",
        "residential",
        "unclassified",
    ];

    /// Accepts the given `highway` values.
    #[must_use]
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Accepted `highway` values in sorted order.
    pub fn classes(&self) -> impl Iterator<Item = &str> + '_ {
        self.classes.iter().map(String::as_str)
    }
}

impl Default for HighwayFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CLASSES)
    }
}

impl WayFilter for HighwayFilter {
    fn accept(&self, way: &Way) -> bool {
        way.highway()
            .is_some_and(|class| self.classes.contains(class))
    }
}

/// Conjunction of filters, evaluated in insertion order with short-circuit.
///
/// An empty chain accepts everything.
#[derive(Debug, Default)]
pub struct WayFilterChain {
    filters: Vec<Box<dyn WayFilter>>,
}

impl WayFilterChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter and returns the chain.
    #[must_use]
    pub fn with<F>(mut self, filter: F) -> Self
    where
        F: WayFilter + 'static,
    {
        self.push(filter);
        self
    }

    /// Appends a filter.
    pub fn push<F>(&mut self, filter: F)
    where
        F: WayFilter + 'static,
    {
        self.filters.push(Box::new(filter));
    }

    /// Number of filters in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the chain holds no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl WayFilter for WayFilterChain {
    fn accept(&self, way: &Way) -> bool {
        self.filters.iter().all(|filter| filter.accept(way))
    }
}
