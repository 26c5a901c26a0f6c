//! Chain validation rules
//!
//! A rule scores a candidate chain against a route and reports either full
//! validity or the depth at which the first disqualifying condition was
//! found, scanning from the route's src end toward its sink end. The depth
//! is a search hint: it names the shallowest chain position that must
//! change before re-validation can possibly succeed, which lets the
//! generator skip whole subtrees of the enumeration.

use crate::catalogue::{ConverterCatalogue, EntryId};

use super::TransformRoute;

/// Outcome of checking one candidate chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainVerdict {
    /// The chain satisfies the rule end to end.
    Valid,
    /// The first violation was found at this depth. Depth `d` in
    /// `0..chain.len()` is a chain position; depth `chain.len()` is the
    /// external link at the route's src end.
    InvalidAt(usize),
}

/// A pluggable chain rule. Rules are pure: no side effects, no state.
///
/// Additional rules (e.g. cost-based pruning) can be added to a [`RuleSet`]
/// without touching the generator.
pub trait ChainRule: Send + Sync {
    /// Check a candidate chain for this route.
    fn check(
        &self,
        catalogue: &ConverterCatalogue,
        route: &TransformRoute,
        chain: &[EntryId],
    ) -> ChainVerdict;
}

/// Checks capability continuity across the extended adjacency sequence
/// `[route.sink, chain[0].sink_caps .. chain[L-1].src_caps, route.src]`.
///
/// Scans from the src end backward: at depth `d` the caps produced above
/// (the route's sink caps when `d == 0`, otherwise entry `d-1`'s src caps)
/// must intersect the caps accepted below (the route's src caps when
/// `d == len`, otherwise entry `d`'s sink caps).
pub struct CapsContinuityRule;

impl ChainRule for CapsContinuityRule {
    fn check(
        &self,
        catalogue: &ConverterCatalogue,
        route: &TransformRoute,
        chain: &[EntryId],
    ) -> ChainVerdict {
        let len = chain.len();

        for depth in (0..=len).rev() {
            let produced = if depth == 0 {
                &route.sink
            } else {
                &catalogue.descriptor(chain[depth - 1]).src_caps
            };
            let accepted = if depth == len {
                &route.src
            } else {
                &catalogue.descriptor(chain[depth]).sink_caps
            };

            if !produced.can_intersect(accepted) {
                return ChainVerdict::InvalidAt(depth);
            }
        }

        ChainVerdict::Valid
    }
}

/// Rejects chains where two adjacent positions reference the identical
/// descriptor handle. A stage chained directly to itself is redundant.
///
/// Identity is entry identity, not capability equality: two distinct
/// catalogue entries with equal caps may still sit next to each other.
pub struct DistinctNeighboursRule;

impl ChainRule for DistinctNeighboursRule {
    fn check(
        &self,
        _catalogue: &ConverterCatalogue,
        _route: &TransformRoute,
        chain: &[EntryId],
    ) -> ChainVerdict {
        if chain.len() < 2 {
            return ChainVerdict::Valid;
        }

        for depth in (0..chain.len() - 1).rev() {
            if chain[depth] == chain[depth + 1] {
                return ChainVerdict::InvalidAt(depth);
            }
        }

        ChainVerdict::Valid
    }
}

/// An ordered collection of rules. Rules run in insertion order and the
/// first non-valid verdict wins; a chain is valid only when every rule
/// reports it valid.
pub struct RuleSet {
    rules: Vec<Box<dyn ChainRule>>,
}

impl RuleSet {
    /// An empty rule set. Accepts every chain; mostly useful in tests.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The standard rules: capability continuity, then distinct neighbours.
    pub fn standard() -> Self {
        Self {
            rules: vec![Box::new(CapsContinuityRule), Box::new(DistinctNeighboursRule)],
        }
    }

    /// Append a rule to run after the existing ones.
    pub fn with_rule(mut self, rule: Box<dyn ChainRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Run all rules over a candidate chain.
    pub fn check(
        &self,
        catalogue: &ConverterCatalogue,
        route: &TransformRoute,
        chain: &[EntryId],
    ) -> ChainVerdict {
        for rule in &self.rules {
            match rule.check(catalogue, route, chain) {
                ChainVerdict::Valid => continue,
                invalid => return invalid,
            }
        }
        ChainVerdict::Valid
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}
