//! # autoconvert-core
//!
//! Capability-driven conversion chain resolution for media pipelines.
//!
//! Given a catalogue of converter stage types (each accepting one
//! capability set and producing another) and a transform route (the
//! capabilities data arrives with and the capabilities it must leave
//! with), the engine finds the shortest ordered chain of converters that
//! bridges the route, treating capability compatibility as set
//! intersection.
//!
//! ## Architecture
//!
//! - [`caps`] — capability sets and the constraint algebra behind
//!   set-intersection compatibility
//! - [`catalogue`] — indexes stage types into converter descriptors and
//!   answers capability queries from aggregate unions
//! - [`chain`] — the search engine: mixed-radix candidate enumeration,
//!   pluggable validation rules with depth hints, shortest-first search
//!   with cooperative cancellation
//! - [`graph`] — rebuild orchestration: resolves routes on capability
//!   changes and hands chains to a [`graph::Materializer`]
//! - [`manifest`] — declarative catalogue descriptions in YAML or JSON
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use autoconvert_core::caps::{AudioConstraints, CapsSet, ConstraintValue, FormatSpec};
//! use autoconvert_core::catalogue::{ConverterCatalogue, DeclaredStage, StageHandle};
//! use autoconvert_core::chain::{CancellationToken, ChainSearch, SearchConfig, TransformRoute};
//!
//! fn rate(hz: u32) -> CapsSet {
//!     CapsSet::new(FormatSpec::Audio(AudioConstraints {
//!         sample_rate: Some(ConstraintValue::Exact(hz)),
//!         ..Default::default()
//!     }))
//! }
//!
//! let catalogue = ConverterCatalogue::index(vec![
//!     Arc::new(DeclaredStage::converter("resample", rate(8000), rate(48000))) as StageHandle,
//! ]);
//!
//! let search = ChainSearch::new(&catalogue, SearchConfig::default());
//! let route = TransformRoute::new(rate(8000), rate(48000));
//! let chain = search.resolve(&route, &CancellationToken::new()).unwrap();
//! assert_eq!(chain.stage_names(&catalogue), vec!["resample"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod caps;
pub mod catalogue;
pub mod chain;
pub mod error;
pub mod graph;
pub mod manifest;

pub use caps::{CapsSet, FormatSpec};
pub use catalogue::{ConverterCatalogue, EntryId, StageFactory, StageHandle};
pub use chain::{CancellationToken, Chain, ChainSearch, SearchConfig, TransformRoute};
pub use error::{Error, Result};
pub use graph::{GraphBuilder, Materializer};
pub use manifest::CatalogueManifest;
