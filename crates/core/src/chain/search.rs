//! Route resolution across increasing chain lengths
//!
//! Drives a fresh generator per length, shortest first. The first length
//! that produces any valid chain wins; among equal-length chains the one
//! the catalogue-order enumeration reaches first wins. There is no cost
//! metric.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::catalogue::ConverterCatalogue;
use crate::error::{Error, Result};

use super::generator::ChainGenerator;
use super::validator::RuleSet;
use super::{Chain, TransformRoute};

/// Default bound on chain length. Deep chains are almost never useful and
/// the search space grows as `catalogue_size^length`.
pub const DEFAULT_MAX_CHAIN_LENGTH: usize = 4;

/// Search configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum chain length to try before a route is reported
    /// unsatisfiable.
    #[serde(default = "default_max_chain_length")]
    pub max_chain_length: usize,
}

fn default_max_chain_length() -> usize {
    DEFAULT_MAX_CHAIN_LENGTH
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_chain_length: DEFAULT_MAX_CHAIN_LENGTH,
        }
    }
}

/// Shared flag used to abandon an in-flight search, typically because a
/// newer capability change superseded it. Checked between valid-chain
/// requests, before each generator run; the generator state it abandons is
/// plain value data, so cancellation never leaks resources.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// True once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Chain search over one catalogue.
///
/// The search runs single-threaded and takes no locks; the caller
/// serializes structural rebuilds externally. The catalogue must stay
/// read-only for the search's lifetime.
pub struct ChainSearch<'a> {
    catalogue: &'a ConverterCatalogue,
    rules: RuleSet,
    config: SearchConfig,
}

impl<'a> ChainSearch<'a> {
    /// A search over the catalogue with the standard rule set.
    pub fn new(catalogue: &'a ConverterCatalogue, config: SearchConfig) -> Self {
        Self {
            catalogue,
            rules: RuleSet::standard(),
            config,
        }
    }

    /// Replace the rule set, e.g. to add extra pruning rules.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Resolve a route to its shortest valid chain.
    ///
    /// Tries lengths `0..=max_chain_length` in order and accepts the first
    /// valid chain found. Length 0 succeeds when the route's endpoints
    /// already intersect. Returns [`Error::RouteUnsatisfiable`] when every
    /// length is exhausted and [`Error::SearchCancelled`] when the token
    /// fires between valid-chain requests.
    pub fn resolve(&self, route: &TransformRoute, token: &CancellationToken) -> Result<Chain> {
        for length in 0..=self.config.max_chain_length {
            trace!(length, "searching chains");
            let mut generator = ChainGenerator::new(length);

            loop {
                if token.is_cancelled() {
                    debug!(length, "search cancelled");
                    return Err(Error::SearchCancelled);
                }

                match generator.next_valid(self.catalogue, route, &self.rules) {
                    Some(chain) => {
                        debug!(
                            length,
                            stages = ?chain.stage_names(self.catalogue),
                            "route resolved"
                        );
                        return Ok(chain);
                    }
                    None => break,
                }
            }
        }

        debug!(
            max_length = self.config.max_chain_length,
            "route unsatisfiable"
        );
        Err(Error::RouteUnsatisfiable {
            max_length: self.config.max_chain_length,
        })
    }
}
