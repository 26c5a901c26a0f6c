//! Catalogue manifests
//!
//! A manifest declares a catalogue's stage types as data, so deployments can
//! ship their converter universe as YAML or JSON instead of code. Stage
//! order in the manifest is catalogue order.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalogue::{ConverterCatalogue, DeclaredStage, StageHandle};
use crate::error::{Error, Result};

/// A declarative catalogue description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueManifest {
    /// Stage type declarations, in catalogue order
    pub stages: Vec<DeclaredStage>,
}

impl CatalogueManifest {
    /// Parse a manifest from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let manifest: Self = serde_yaml::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse a manifest from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load a manifest from a file, dispatching on the extension. `.json`
    /// parses as JSON; everything else parses as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::InvalidManifest(format!("{}: {e}", path.display())))?;

        debug!(path = %path.display(), "loading catalogue manifest");
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_yaml_str(&contents),
        }
    }

    /// Structural validation beyond what serde enforces.
    pub fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(Error::InvalidManifest(
                "manifest declares no stages".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for stage in &self.stages {
            if stage.name.is_empty() {
                return Err(Error::InvalidManifest(
                    "stage with empty name".to_string(),
                ));
            }
            if !seen.insert(stage.name.as_str()) {
                return Err(Error::InvalidManifest(format!(
                    "duplicate stage name: {}",
                    stage.name
                )));
            }
        }

        Ok(())
    }

    /// Index the declared stages into a catalogue.
    ///
    /// Declarations whose port shape does not qualify as a converter are
    /// skipped by the catalogue, not rejected here; a manifest may describe
    /// stage types the engine merely observes.
    pub fn build_catalogue(&self) -> ConverterCatalogue {
        ConverterCatalogue::index(
            self.stages
                .iter()
                .map(|stage| Arc::new(stage.clone()) as StageHandle),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::{AudioConstraints, CapsSet, ConstraintValue, FormatSpec};
    use crate::catalogue::EntryId;
    use std::io::Write;

    const MANIFEST_YAML: &str = r#"
stages:
  - name: resample
    ports:
      - direction: sink
        caps:
          - type: audio
            sample_rate: { min: 8000, max: 96000 }
      - direction: src
        caps:
          - type: audio
            sample_rate: { min: 8000, max: 96000 }
  - name: tee
    ports:
      - direction: sink
        caps: ANY
      - direction: src
        caps: ANY
      - direction: src
        caps: ANY
"#;

    #[test]
    fn test_yaml_round_trip() {
        let manifest = CatalogueManifest::from_yaml_str(MANIFEST_YAML).unwrap();
        assert_eq!(manifest.stages.len(), 2);
        assert_eq!(manifest.stages[0].name, "resample");

        let yaml = serde_yaml::to_string(&manifest).unwrap();
        let reparsed = CatalogueManifest::from_yaml_str(&yaml).unwrap();
        assert_eq!(reparsed, manifest);
    }

    #[test]
    fn test_build_catalogue_skips_non_converters() {
        // "tee" has two src ports; it parses fine but never indexes.
        let manifest = CatalogueManifest::from_yaml_str(MANIFEST_YAML).unwrap();
        let catalogue = manifest.build_catalogue();

        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue.descriptor(EntryId(0)).name(), "resample");
        assert_eq!(catalogue.rejected(), &["tee"]);
    }

    #[test]
    fn test_indexed_caps_match_declaration() {
        let manifest = CatalogueManifest::from_yaml_str(MANIFEST_YAML).unwrap();
        let catalogue = manifest.build_catalogue();

        let probe = CapsSet::new(FormatSpec::Audio(AudioConstraints {
            sample_rate: Some(ConstraintValue::Exact(44100)),
            ..Default::default()
        }));
        assert!(catalogue.descriptor(EntryId(0)).sink_caps.can_intersect(&probe));
    }

    #[test]
    fn test_rejects_empty_manifest() {
        let err = CatalogueManifest::from_yaml_str("stages: []").unwrap_err();
        assert!(matches!(err, Error::InvalidManifest(_)));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let yaml = r#"
stages:
  - name: x
    ports: []
  - name: x
    ports: []
"#;
        let err = CatalogueManifest::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidManifest(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_from_file_dispatches_on_extension() {
        let manifest = CatalogueManifest::from_yaml_str(MANIFEST_YAML).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("catalogue.json");
        let yaml_path = dir.path().join("catalogue.yaml");

        std::fs::File::create(&json_path)
            .unwrap()
            .write_all(serde_json::to_string(&manifest).unwrap().as_bytes())
            .unwrap();
        std::fs::File::create(&yaml_path)
            .unwrap()
            .write_all(serde_yaml::to_string(&manifest).unwrap().as_bytes())
            .unwrap();

        assert_eq!(CatalogueManifest::from_file(&json_path).unwrap(), manifest);
        assert_eq!(CatalogueManifest::from_file(&yaml_path).unwrap(), manifest);
    }

    #[test]
    fn test_missing_file_is_invalid_manifest() {
        let err = CatalogueManifest::from_file("/nonexistent/catalogue.yaml").unwrap_err();
        assert!(matches!(err, Error::InvalidManifest(_)));
    }
}
