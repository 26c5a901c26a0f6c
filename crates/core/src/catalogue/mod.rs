//! Converter catalogue
//!
//! Indexes the framework's stage types into converter descriptors and keeps
//! the aggregate capability unions used to answer capability queries without
//! touching the search. Built once at construction; read-only afterwards.

pub mod stage;

use tracing::debug;

use crate::caps::CapsSet;

pub use stage::{DeclaredStage, PortDirection, PortTemplate, StageFactory, StageHandle};

/// Identity of a catalogue entry: an index into the catalogue's arena.
///
/// Two chain positions referencing the same `EntryId` reference the same
/// converter descriptor; identity comparison is an integer compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(pub usize);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable record for one indexed converter stage type.
pub struct ConverterDescriptor {
    /// Capabilities accepted on the stage's sink port
    pub sink_caps: CapsSet,
    /// Capabilities produced on the stage's src port
    pub src_caps: CapsSet,
    /// Handle to the underlying stage type
    pub stage: StageHandle,
}

impl ConverterDescriptor {
    /// The stage type name, for logs and materialization.
    pub fn name(&self) -> &str {
        self.stage.name()
    }
}

/// Indexed collection of converter descriptors.
///
/// Entry order is significant: it defines chain enumeration order and
/// therefore the tie-break among equally short valid chains.
pub struct ConverterCatalogue {
    entries: Vec<ConverterDescriptor>,
    aggregate_sink_caps: CapsSet,
    aggregate_src_caps: CapsSet,
    rejected: Vec<String>,
}

impl ConverterCatalogue {
    /// Index a list of stage types, in order.
    ///
    /// Only stages exposing exactly one sink and one src port template are
    /// indexed; anything else (no ports, missing a side, multiple ports on
    /// a side) is logged and skipped. Rejection is policy, not an error.
    pub fn index<I>(stages: I) -> Self
    where
        I: IntoIterator<Item = StageHandle>,
    {
        let mut entries = Vec::new();
        let mut rejected = Vec::new();
        let mut aggregate_sink_caps = CapsSet::empty();
        let mut aggregate_src_caps = CapsSet::empty();

        for stage in stages {
            match single_sink_src(&stage) {
                Some((sink_caps, src_caps)) => {
                    debug!(stage = stage.name(), "indexed converter stage");
                    aggregate_sink_caps = aggregate_sink_caps.merge(&sink_caps);
                    aggregate_src_caps = aggregate_src_caps.merge(&src_caps);
                    entries.push(ConverterDescriptor {
                        sink_caps,
                        src_caps,
                        stage,
                    });
                }
                None => {
                    debug!(
                        stage = stage.name(),
                        "stage excluded from catalogue: needs exactly one sink and one src port"
                    );
                    rejected.push(stage.name().to_string());
                }
            }
        }

        Self {
            entries,
            aggregate_sink_caps,
            aggregate_src_caps,
            rejected,
        }
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no stage qualified as a converter.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The descriptor behind an entry id.
    ///
    /// Ids handed out by this catalogue are always in range; `get` exists
    /// for callers holding ids of unknown provenance.
    pub fn descriptor(&self, id: EntryId) -> &ConverterDescriptor {
        &self.entries[id.0]
    }

    /// Fallible descriptor lookup.
    pub fn get(&self, id: EntryId) -> Option<&ConverterDescriptor> {
        self.entries.get(id.0)
    }

    /// Iterate descriptors in catalogue order with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &ConverterDescriptor)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, d)| (EntryId(i), d))
    }

    /// Union of all indexed sink capabilities.
    pub fn aggregate_sink_caps(&self) -> &CapsSet {
        &self.aggregate_sink_caps
    }

    /// Union of all indexed src capabilities.
    pub fn aggregate_src_caps(&self) -> &CapsSet {
        &self.aggregate_src_caps
    }

    /// Names of the stages that did not qualify for indexing.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// Answer a capability query on one side of the element.
    ///
    /// Merges capability sets reported by the peers on the opposite side
    /// (the collaborator queries peers with the filter already applied) with
    /// this catalogue's aggregate for the queried side, the aggregate
    /// intersected against the filter first when one is present. The result
    /// is normalized. Side-effect free; safe to call concurrently with a
    /// search as the catalogue is read-only after construction.
    pub fn query_caps<I>(
        &self,
        side: PortDirection,
        filter: Option<&CapsSet>,
        peer_caps: I,
    ) -> CapsSet
    where
        I: IntoIterator<Item = CapsSet>,
    {
        let aggregate = match side {
            PortDirection::Sink => &self.aggregate_sink_caps,
            PortDirection::Src => &self.aggregate_src_caps,
        };

        let mut caps = CapsSet::empty();
        for peer in peer_caps {
            caps = caps.merge(&peer);
        }

        caps = match filter {
            Some(filter) => caps.merge(&aggregate.filtered(filter)),
            None => caps.merge(aggregate),
        };

        caps.normalize()
    }
}

/// Extract the single (sink, src) capability pair from a stage's templates,
/// or `None` if the stage's port shape does not qualify.
fn single_sink_src(stage: &StageHandle) -> Option<(CapsSet, CapsSet)> {
    let mut sink = None;
    let mut src = None;

    for template in stage.port_templates() {
        let slot = match template.direction {
            PortDirection::Sink => &mut sink,
            PortDirection::Src => &mut src,
        };
        if slot.is_some() {
            // More than one template on one side: ambiguous, reject.
            return None;
        }
        *slot = Some(template.caps);
    }

    Some((sink?, src?))
}
