//! Model bundle handles for classifier backends.
//!
//! Classifier implementations are external collaborators; the engine only
//! resolves the on-disk artifacts they need. Loading is an explicit
//! initialization step that produces a [`ModelBundle`] handle, which the
//! caller passes into whichever classifier backend it constructs. There is
//! no global model cache.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NavError, NavResult};

/// Manifest file expected next to the model file.
const CLASS_NAMES_FILE: &str = "class_names.json";

/// Resolved model artifacts: the model file plus its class-name manifest.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    model_path: PathBuf,
    class_names: Vec<String>,
}

impl ModelBundle {
    /// Load a bundle from a model file path.
    ///
    /// The class-name manifest (`class_names.json`, a JSON array of strings
    /// in model output order) must live in the same directory.
    pub fn load(model_path: impl AsRef<Path>) -> NavResult<Self> {
        let model_path = model_path.as_ref().to_path_buf();

        if !model_path.is_file() {
            return Err(NavError::Config(format!(
                "Model file not found: {}",
                model_path.display()
            )));
        }

        let manifest_path = model_path.with_file_name(CLASS_NAMES_FILE);
        let raw = fs::read_to_string(&manifest_path).map_err(|e| {
            NavError::Config(format!(
                "Missing class manifest {}: {}",
                manifest_path.display(),
                e
            ))
        })?;

        let class_names: Vec<String> = serde_json::from_str(&raw).map_err(|e| {
            NavError::Config(format!(
                "Invalid class manifest {}: {}",
                manifest_path.display(),
                e
            ))
        })?;

        if class_names.is_empty() {
            return Err(NavError::Config(format!(
                "Class manifest {} lists no classes",
                manifest_path.display()
            )));
        }

        tracing::info!(
            model = %model_path.display(),
            classes = class_names.len(),
            "model bundle loaded"
        );

        Ok(Self {
            model_path,
            class_names,
        })
    }

    /// Path to the model file.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Class names in model output order.
    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    /// Label for a model output index.
    pub fn class_name(&self, index: usize) -> Option<&str> {
        self.class_names.get(index).map(String::as_str)
    }
}
