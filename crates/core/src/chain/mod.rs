//! Chain search engine
//!
//! Enumerates and validates candidate converter chains for transform
//! routes. The generator walks the space of fixed-length chains in
//! mixed-radix counter order, the validators report how deep a candidate
//! stays consistent, and the search drives both across increasing lengths
//! until the first (therefore shortest) valid chain is found.

pub mod generator;
pub mod search;
pub mod validator;

use crate::caps::CapsSet;
use crate::catalogue::{ConverterCatalogue, EntryId};

pub use generator::ChainGenerator;
pub use search::{CancellationToken, ChainSearch, SearchConfig};
pub use validator::{CapsContinuityRule, ChainRule, ChainVerdict, DistinctNeighboursRule, RuleSet};

/// One requested conversion goal: data arriving with `sink` capabilities
/// must leave matching `src` capabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRoute {
    /// Capabilities on the sink (incoming) side
    pub sink: CapsSet,
    /// Capabilities on the src (outgoing) side
    pub src: CapsSet,
}

impl TransformRoute {
    /// Create a route from its two endpoint capability sets.
    pub fn new(sink: CapsSet, src: CapsSet) -> Self {
        Self { sink, src }
    }
}

/// An ordered sequence of catalogue entries proposed as a conversion path.
///
/// Position 0 is adjacent to the route's sink side; the last position is
/// adjacent to the route's src side. The empty chain is a legal path when
/// the route's endpoints already intersect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    entries: Vec<EntryId>,
}

impl Chain {
    /// Build a chain from catalogue entry ids.
    pub fn new(entries: Vec<EntryId>) -> Self {
        Self { entries }
    }

    /// Number of stages in the chain.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for the zero-stage chain.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The catalogue entry ids, sink side first.
    pub fn entries(&self) -> &[EntryId] {
        &self.entries
    }

    /// Stage type names in chain order, resolved against a catalogue.
    pub fn stage_names<'a>(&self, catalogue: &'a ConverterCatalogue) -> Vec<&'a str> {
        self.entries
            .iter()
            .map(|&id| catalogue.descriptor(id).name())
            .collect()
    }
}
