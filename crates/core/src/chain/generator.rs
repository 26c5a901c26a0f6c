//! Candidate chain enumeration
//!
//! The generator enumerates every chain of a fixed length over the
//! catalogue's entries, in mixed-radix counter order with position 0 as the
//! least-significant digit. Unlike a plain odometer it supports re-rolling
//! from an arbitrary digit position: when a validator reports that a chain
//! is broken at depth `d`, everything below `d` is unreachable and the next
//! increment targets `d` directly, resetting the lower digits.

use tracing::trace;

use crate::catalogue::{ConverterCatalogue, EntryId};

use super::validator::{ChainVerdict, RuleSet};
use super::{Chain, TransformRoute};

/// Mixed-radix enumerator over fixed-length chains.
///
/// State is one cursor per chain position, each an index into the
/// catalogue's entry list; the whole generator is plain value data and can
/// be dropped at any point without cleanup.
#[derive(Debug, Clone)]
pub struct ChainGenerator {
    cursors: Vec<usize>,
    fresh: bool,
}

impl ChainGenerator {
    /// A fresh generator for chains of the given length. The first
    /// candidate is the all-first-entries chain; it is consumed without an
    /// advance.
    pub fn new(length: usize) -> Self {
        Self {
            cursors: vec![0; length],
            fresh: true,
        }
    }

    /// The chain length this generator enumerates.
    pub fn length(&self) -> usize {
        self.cursors.len()
    }

    /// Return to the fresh all-first-entries state.
    pub fn reset(&mut self) {
        self.cursors.fill(0);
        self.fresh = true;
    }

    /// The current cursor state as a chain.
    pub fn current(&self) -> Chain {
        Chain::new(self.cursors.iter().map(|&i| EntryId(i)).collect())
    }

    /// Advance to the next cursor state, incrementing at `starting_depth`.
    ///
    /// The increment carries upward while cursors overflow the catalogue;
    /// when every position from `starting_depth` up overflows the
    /// enumeration for this length is exhausted and `false` is returned.
    /// After a successful increment every cursor below `starting_depth` is
    /// reset to the first entry, so combinations a validator has already
    /// disproven below that depth are never revisited.
    pub fn advance(&mut self, catalogue_size: usize, starting_depth: usize) -> bool {
        let length = self.cursors.len();

        let mut depth = starting_depth;
        while depth < length {
            self.cursors[depth] += 1;
            if self.cursors[depth] < catalogue_size {
                break;
            }
            self.cursors[depth] = 0;
            depth += 1;
        }

        if depth == length {
            return false;
        }

        for cursor in &mut self.cursors[..starting_depth] {
            *cursor = 0;
        }

        true
    }

    /// Produce the next candidate that passes the rule set, or `None` when
    /// the enumeration for this length is exhausted.
    ///
    /// Each failed validation feeds the reported depth back into
    /// [`advance`](Self::advance): a failure detected at depth `d` can only
    /// be repaired by changing the entry at position `d - 1` relative to
    /// the validator's counting, so the re-roll targets `max(0, d - 1)`.
    pub fn next_valid(
        &mut self,
        catalogue: &ConverterCatalogue,
        route: &TransformRoute,
        rules: &RuleSet,
    ) -> Option<Chain> {
        // A non-empty chain needs entries to draw from. The empty chain is
        // still a real candidate: its validity depends only on the route.
        if catalogue.is_empty() && self.length() > 0 {
            self.fresh = false;
            return None;
        }

        let mut hint = 0;
        loop {
            if self.fresh {
                self.fresh = false;
            } else if !self.advance(catalogue.len(), hint) {
                return None;
            }

            let chain = self.current();
            match rules.check(catalogue, route, chain.entries()) {
                ChainVerdict::Valid => return Some(chain),
                ChainVerdict::InvalidAt(depth) => {
                    trace!(depth, cursors = ?self.cursors, "candidate rejected");
                    hint = depth.saturating_sub(1);
                }
            }
        }
    }
}
