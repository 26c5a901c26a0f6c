//! Graph rebuild orchestration
//!
//! Bridges the capability-change notifications coming from the framework
//! collaborator to the chain search, and hands resolved chains to the
//! materialization collaborator. Structural rebuilds are serialized behind
//! one lock per builder; a notification arriving while a pass is running
//! cancels the in-flight search before taking the lock, so a superseded
//! pass can never publish a stale chain.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::catalogue::ConverterCatalogue;
use crate::chain::{CancellationToken, Chain, ChainSearch, SearchConfig, TransformRoute};
use crate::error::{Error, Result};

/// Consumes resolved chains and turns them into live, linked stage
/// instances. Implemented by the surrounding framework; the engine never
/// owns stage instances itself.
pub trait Materializer {
    /// Link the chain for one route. Called once per satisfiable route per
    /// rebuild pass. Must either link the whole chain or fail without
    /// leaving partial links behind.
    fn link(
        &mut self,
        route_index: usize,
        route: &TransformRoute,
        chain: &Chain,
        catalogue: &ConverterCatalogue,
    ) -> Result<()>;
}

/// Outcome of one rebuild pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Routes that were resolved and linked
    pub linked: Vec<usize>,
    /// Routes with no valid chain within the length bound
    pub unsatisfiable: Vec<usize>,
}

impl BuildReport {
    /// True when every route was linked.
    pub fn all_linked(&self) -> bool {
        self.unsatisfiable.is_empty()
    }
}

/// Orchestrates rebuild passes over a fixed catalogue.
pub struct GraphBuilder {
    catalogue: Arc<ConverterCatalogue>,
    config: SearchConfig,
    /// Serializes structural rebuilds; searches themselves are
    /// single-threaded and lock-free.
    rebuild_lock: Mutex<()>,
    /// Token of the in-flight pass, if any. Replaced (and the predecessor
    /// cancelled) whenever a newer capability change arrives.
    active: Mutex<Option<CancellationToken>>,
}

impl GraphBuilder {
    /// A builder over an indexed catalogue.
    pub fn new(catalogue: Arc<ConverterCatalogue>, config: SearchConfig) -> Self {
        Self {
            catalogue,
            config,
            rebuild_lock: Mutex::new(()),
            active: Mutex::new(None),
        }
    }

    /// The catalogue this builder searches.
    pub fn catalogue(&self) -> &ConverterCatalogue {
        &self.catalogue
    }

    /// Resolve a single route without materializing, using a caller-owned
    /// token.
    pub fn resolve(&self, route: &TransformRoute, token: &CancellationToken) -> Result<Chain> {
        ChainSearch::new(&self.catalogue, self.config).resolve(route, token)
    }

    /// Run a rebuild pass for the given routes, superseding any pass still
    /// in flight.
    ///
    /// Called when the collaborator reports that all sink ports have known
    /// capabilities. Unsatisfiable routes are reported (and logged), not
    /// fatal: remaining routes still link. A cancelled pass returns
    /// [`Error::SearchCancelled`] and materializes nothing further; a
    /// materialization failure aborts the pass.
    pub fn caps_changed(
        &self,
        routes: &[TransformRoute],
        materializer: &mut dyn Materializer,
    ) -> Result<BuildReport> {
        // Supersede before blocking on the rebuild lock, so the pass that
        // currently holds it observes the cancellation at its next chain
        // request.
        let token = CancellationToken::new();
        if let Some(previous) = self.active.lock().replace(token.clone()) {
            previous.cancel();
        }

        let _guard = self.rebuild_lock.lock();

        let search = ChainSearch::new(&self.catalogue, self.config);
        let mut report = BuildReport {
            linked: Vec::new(),
            unsatisfiable: Vec::new(),
        };

        for (index, route) in routes.iter().enumerate() {
            match search.resolve(route, &token) {
                Ok(chain) => {
                    debug!(
                        route = index,
                        stages = ?chain.stage_names(&self.catalogue),
                        "linking chain"
                    );
                    materializer.link(index, route, &chain, &self.catalogue)?;
                    report.linked.push(index);
                }
                Err(Error::RouteUnsatisfiable { max_length }) => {
                    warn!(route = index, max_length, "no conversion chain found");
                    report.unsatisfiable.push(index);
                }
                Err(err) => return Err(err),
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::caps::{AudioConstraints, CapsSet, ConstraintValue, FormatSpec};
    use crate::catalogue::{DeclaredStage, StageHandle};

    fn rate(hz: u32) -> CapsSet {
        CapsSet::new(FormatSpec::Audio(AudioConstraints {
            sample_rate: Some(ConstraintValue::Exact(hz)),
            ..Default::default()
        }))
    }

    fn converter(name: &str, sink: CapsSet, src: CapsSet) -> StageHandle {
        Arc::new(DeclaredStage::converter(name, sink, src))
    }

    /// Records linked chains by stage name.
    #[derive(Default)]
    struct RecordingMaterializer {
        linked: Vec<(usize, Vec<String>)>,
    }

    impl Materializer for RecordingMaterializer {
        fn link(
            &mut self,
            route_index: usize,
            _route: &TransformRoute,
            chain: &Chain,
            catalogue: &ConverterCatalogue,
        ) -> Result<()> {
            let names = chain
                .stage_names(catalogue)
                .into_iter()
                .map(String::from)
                .collect();
            self.linked.push((route_index, names));
            Ok(())
        }
    }

    fn builder() -> GraphBuilder {
        let catalogue = Arc::new(ConverterCatalogue::index(vec![
            converter("x", rate(1000), rate(2000)),
            converter("y", rate(2000), rate(3000)),
        ]));
        GraphBuilder::new(catalogue, SearchConfig::default())
    }

    #[test]
    fn test_rebuild_links_satisfiable_routes() {
        let builder = builder();
        let mut materializer = RecordingMaterializer::default();

        let routes = vec![
            TransformRoute::new(rate(1000), rate(3000)),
            TransformRoute::new(rate(1000), rate(9999)),
            TransformRoute::new(rate(2000), rate(3000)),
        ];

        let report = builder.caps_changed(&routes, &mut materializer).unwrap();
        assert_eq!(report.linked, vec![0, 2]);
        assert_eq!(report.unsatisfiable, vec![1]);
        assert!(!report.all_linked());

        assert_eq!(
            materializer.linked,
            vec![
                (0, vec!["x".to_string(), "y".to_string()]),
                (2, vec!["y".to_string()]),
            ]
        );
    }

    #[test]
    fn test_newer_notification_cancels_previous_token() {
        let builder = builder();
        let mut materializer = RecordingMaterializer::default();

        // First pass installs a token...
        let routes = vec![TransformRoute::new(rate(1000), rate(2000))];
        builder.caps_changed(&routes, &mut materializer).unwrap();
        let first = builder.active.lock().clone().unwrap();
        assert!(!first.is_cancelled());

        // ...which the next notification cancels.
        builder.caps_changed(&routes, &mut materializer).unwrap();
        assert!(first.is_cancelled());
    }

    #[test]
    fn test_materializer_failure_aborts_pass() {
        struct FailingMaterializer;
        impl Materializer for FailingMaterializer {
            fn link(
                &mut self,
                _route_index: usize,
                _route: &TransformRoute,
                _chain: &Chain,
                _catalogue: &ConverterCatalogue,
            ) -> Result<()> {
                Err(Error::Materialize("link refused".to_string()))
            }
        }

        let builder = builder();
        let routes = vec![TransformRoute::new(rate(1000), rate(2000))];
        let err = builder
            .caps_changed(&routes, &mut FailingMaterializer)
            .unwrap_err();
        assert!(matches!(err, Error::Materialize(_)));
    }
}
