//! Capability sets
//!
//! A `CapsSet` is a possibly-unbounded set of concrete formats, represented
//! structurally as a list of [`FormatSpec`]s plus an explicit wildcard form.
//! Sets are immutable once constructed and cheap to clone (the spec list is
//! shared behind an `Arc`).

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::constraints::FormatSpec;

/// An immutable set of format descriptions.
///
/// The empty set intersects with nothing (including the wildcard); the
/// wildcard set intersects with every non-empty set.
///
/// # Serialized form
///
/// Either the string `"ANY"` (wildcard) or a list of format specs:
///
/// ```yaml
/// caps:
///   - type: audio
///     sample_rate: { min: 8000, max: 48000 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CapsSetRepr", into = "CapsSetRepr")]
pub struct CapsSet {
    any: bool,
    specs: Arc<[FormatSpec]>,
}

impl CapsSet {
    /// The empty set: no format matches.
    pub fn empty() -> Self {
        Self {
            any: false,
            specs: Arc::from(Vec::new()),
        }
    }

    /// The wildcard set: every format matches.
    pub fn any() -> Self {
        Self {
            any: true,
            specs: Arc::from(Vec::new()),
        }
    }

    /// A set holding a single format spec.
    pub fn new(spec: FormatSpec) -> Self {
        Self::from_specs(vec![spec])
    }

    /// A set holding the given format specs.
    pub fn from_specs(specs: Vec<FormatSpec>) -> Self {
        Self {
            any: false,
            specs: Arc::from(specs),
        }
    }

    /// True if no format matches this set.
    pub fn is_empty(&self) -> bool {
        !self.any && self.specs.is_empty()
    }

    /// True if this is the wildcard set.
    pub fn is_any(&self) -> bool {
        self.any
    }

    /// The structural specs of this set (empty for the wildcard form).
    pub fn specs(&self) -> &[FormatSpec] {
        &self.specs
    }

    /// Non-empty overlap test between two sets. Pure and total; the
    /// materialization step computes the actual intersection later, so this
    /// must never report an overlap the intersection would not have.
    pub fn can_intersect(&self, other: &CapsSet) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        if self.any || other.any {
            return true;
        }
        self.specs
            .iter()
            .any(|a| other.specs.iter().any(|b| a.can_intersect(b)))
    }

    /// Set union, used for aggregate capability reporting. Duplicate specs
    /// from the right-hand side are dropped.
    pub fn merge(&self, other: &CapsSet) -> CapsSet {
        if self.any || other.any {
            return CapsSet::any();
        }
        let mut specs: Vec<FormatSpec> = self.specs.to_vec();
        for spec in other.specs.iter() {
            if !specs.contains(spec) {
                specs.push(spec.clone());
            }
        }
        CapsSet::from_specs(specs)
    }

    /// Keep only the specs that overlap the filter. The wildcard filtered by
    /// `f` is `f`; filtering by the wildcard is the identity.
    pub fn filtered(&self, filter: &CapsSet) -> CapsSet {
        if filter.any {
            return self.clone();
        }
        if self.any {
            return filter.clone();
        }
        let specs = self
            .specs
            .iter()
            .filter(|a| filter.specs.iter().any(|b| a.can_intersect(b)))
            .cloned()
            .collect();
        CapsSet::from_specs(specs)
    }

    /// Drop duplicate specs, keeping first occurrences.
    pub fn normalize(&self) -> CapsSet {
        if self.any {
            return self.clone();
        }
        let mut specs: Vec<FormatSpec> = Vec::with_capacity(self.specs.len());
        for spec in self.specs.iter() {
            if !specs.contains(spec) {
                specs.push(spec.clone());
            }
        }
        CapsSet::from_specs(specs)
    }
}

impl fmt::Display for CapsSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.any {
            write!(f, "ANY")
        } else if self.specs.is_empty() {
            write!(f, "EMPTY")
        } else {
            let types: Vec<&str> = self.specs.iter().map(|s| s.media_type()).collect();
            write!(f, "[{}]", types.join(", "))
        }
    }
}

/// Wire representation: `"ANY"` or a list of specs.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CapsSetRepr {
    Any(String),
    Specs(Vec<FormatSpec>),
}

impl TryFrom<CapsSetRepr> for CapsSet {
    type Error = String;

    fn try_from(repr: CapsSetRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            CapsSetRepr::Any(s) if s == "ANY" => Ok(CapsSet::any()),
            CapsSetRepr::Any(s) => Err(format!("expected \"ANY\" or a spec list, got {s:?}")),
            CapsSetRepr::Specs(specs) => Ok(CapsSet::from_specs(specs)),
        }
    }
}

impl From<CapsSet> for CapsSetRepr {
    fn from(caps: CapsSet) -> Self {
        if caps.any {
            CapsSetRepr::Any("ANY".to_string())
        } else {
            CapsSetRepr::Specs(caps.specs.to_vec())
        }
    }
}
