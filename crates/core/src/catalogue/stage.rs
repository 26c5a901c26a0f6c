//! Stage type descriptions supplied by the surrounding framework
//!
//! The engine never owns live stage instances. It only sees stage *types*,
//! each advertising a list of port templates; the catalogue decides which
//! types qualify as converters.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::caps::CapsSet;

/// Direction of a stage port, named from the stage's point of view: data
/// enters through sink ports and leaves through src ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    /// Accepts data
    Sink,
    /// Produces data
    Src,
}

/// A port template: direction plus the capability set the port supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortTemplate {
    /// Port direction
    pub direction: PortDirection,
    /// Capabilities the port accepts or produces
    pub caps: CapsSet,
}

impl PortTemplate {
    /// A sink-side template.
    pub fn sink(caps: CapsSet) -> Self {
        Self {
            direction: PortDirection::Sink,
            caps,
        }
    }

    /// A src-side template.
    pub fn src(caps: CapsSet) -> Self {
        Self {
            direction: PortDirection::Src,
            caps,
        }
    }
}

/// A stage type offered to the catalogue.
///
/// Implementations are provided by the framework collaborator; the engine
/// only reads the name (for logs and materialization) and the port
/// templates (to decide whether the type indexes as a converter).
pub trait StageFactory: Send + Sync {
    /// Stage type name, unique within the collaborator's universe.
    fn name(&self) -> &str;

    /// All port templates this stage type exposes.
    fn port_templates(&self) -> Vec<PortTemplate>;
}

/// A stage type declared by data rather than code, e.g. from a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredStage {
    /// Stage type name
    pub name: String,
    /// Port templates
    pub ports: Vec<PortTemplate>,
}

impl DeclaredStage {
    /// A converter-shaped stage: one sink template, one src template.
    pub fn converter(name: impl Into<String>, sink_caps: CapsSet, src_caps: CapsSet) -> Self {
        Self {
            name: name.into(),
            ports: vec![PortTemplate::sink(sink_caps), PortTemplate::src(src_caps)],
        }
    }
}

impl StageFactory for DeclaredStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn port_templates(&self) -> Vec<PortTemplate> {
        self.ports.clone()
    }
}

/// Shared handle to a stage factory.
pub type StageHandle = Arc<dyn StageFactory>;
